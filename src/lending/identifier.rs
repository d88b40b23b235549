//! Borrower school ID scheme: `<PREFIX>-<YEAR>-<SEQ>`
//!
//! Sequences are partitioned by prefix (borrower type) and calendar year.
//! The sequence is zero-padded to three digits and simply widens past 999.

use chrono::{DateTime, Utc};

use crate::models::enums::BorrowerType;

/// Prefix for a borrower type; unspecified types are students
pub fn prefix_for(borrower_type: Option<BorrowerType>) -> &'static str {
    BorrowerType::from(borrower_type).prefix()
}

/// Leading part shared by every ID of a `(prefix, year)` scope, e.g. `STU-2025-`
pub fn scope_prefix(prefix: &str, year: i32) -> String {
    format!("{}-{}-", prefix, year)
}

/// Format a complete school ID
pub fn format_id(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:03}", prefix, year, sequence)
}

/// Numeric suffix (third dash-delimited segment) of a school ID
pub fn parse_sequence(school_id: &str) -> Option<u32> {
    school_id.split('-').nth(2)?.trim().parse().ok()
}

/// Next sequence number after the highest well-formed suffix, starting at 1.
///
/// A suffix with no successor (`u32::MAX`) counts as malformed.
pub fn next_sequence<I, S>(existing: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    existing
        .into_iter()
        .filter_map(|id| parse_sequence(id.as_ref())?.checked_add(1))
        .max()
        .unwrap_or(1)
}

/// Next ID of a scope given the IDs already issued in it
pub fn next_id<I, S>(prefix: &str, year: i32, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format_id(prefix, year, next_sequence(existing))
}

/// Timestamp-derived ID used when the sequential lookup is unavailable.
/// Uniqueness is weak: two calls within the same millisecond modulo 10^6 collide.
pub fn fallback_id(prefix: &str, year: i32, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{}-{}-{:06}", prefix, year, millis)
}

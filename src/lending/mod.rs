//! Borrow/return consistency rules
//!
//! Pure functions only: storage implementations and services call into
//! these so that every backend enforces the same invariants.

pub mod identifier;
pub mod ledger;
pub mod lifecycle;
pub mod settlement;

pub use lifecycle::{is_overdue, BorrowState};
pub use settlement::ReturnSettlement;

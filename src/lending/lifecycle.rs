//! Borrow state machine: Open -> Closed, nothing else
//!
//! Overdue is a function of `(state, due_date, now)` and is never stored.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{borrow::BorrowView, enums::BorrowStatus, Borrow},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowState {
    Open,
    Closed,
}

/// A borrow is closed as soon as either the status or the return date says so
pub fn state(borrow: &Borrow) -> BorrowState {
    if borrow.status == BorrowStatus::Returned || borrow.date_returned.is_some() {
        BorrowState::Closed
    } else {
        BorrowState::Open
    }
}

pub fn is_open(borrow: &Borrow) -> bool {
    state(borrow) == BorrowState::Open
}

pub fn is_overdue(borrow: &Borrow, now: DateTime<Utc>) -> bool {
    is_open(borrow) && now > borrow.due_date
}

/// Whole days past the due date, 0 when not overdue
pub fn days_overdue(borrow: &Borrow, now: DateTime<Utc>) -> i64 {
    if is_overdue(borrow, now) {
        (now - borrow.due_date).num_days()
    } else {
        0
    }
}

/// The single post-creation transition of a borrow
pub fn close(borrow: &mut Borrow, returned_at: DateTime<Utc>) -> AppResult<()> {
    if state(borrow) == BorrowState::Closed {
        return Err(AppError::AlreadyReturned {
            borrow_id: borrow.id,
        });
    }
    borrow.status = BorrowStatus::Returned;
    borrow.date_returned = Some(returned_at);
    Ok(())
}

pub fn view(borrow: Borrow, now: DateTime<Utc>) -> BorrowView {
    BorrowView {
        is_overdue: is_overdue(&borrow, now),
        days_overdue: days_overdue(&borrow, now),
        borrow,
    }
}

//! Data models for Lendtrack

pub mod borrow;
pub mod borrower;
pub mod claims;
pub mod enums;
pub mod item;
pub mod return_record;
pub mod room;

// Re-export commonly used types
pub use borrow::{Borrow, BorrowView};
pub use borrower::Borrower;
pub use claims::Claims;
pub use enums::{BorrowStatus, BorrowerType, ItemStatus, RecordStatus, Role};
pub use item::Item;
pub use return_record::ReturnRecord;
pub use room::{Room, RoomItem};

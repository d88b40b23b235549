//! Repository layer for storage operations

pub mod borrowers;
pub mod borrows;
pub mod items;
pub mod memory;
pub mod returns;
pub mod rooms;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    lending::ReturnSettlement,
    models::{
        borrow::{BorrowQuery, NewBorrow},
        borrower::NewBorrower,
        item::{CreateItem, UpdateItem},
        room::{CreateRoom, OccupiedSlot},
        Borrow, Borrower, BorrowerType, Item, RecordStatus, ReturnRecord, Room,
    },
};

pub use memory::MemoryStore;

/// Storage operations the lending core depends on
///
/// `open_borrow` and `apply_return` are atomic: either every write they
/// describe is visible afterwards or none is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingStore: Send + Sync {
    async fn get_item(&self, id: i32) -> AppResult<Item>;
    async fn list_items(&self) -> AppResult<Vec<Item>>;
    async fn create_item(&self, data: &CreateItem) -> AppResult<Item>;
    /// Update descriptive fields; `raw_stock` is left untouched
    async fn update_item(&self, id: i32, data: &UpdateItem) -> AppResult<Item>;

    async fn get_borrower(&self, id: i32) -> AppResult<Borrower>;
    async fn list_borrowers(&self) -> AppResult<Vec<Borrower>>;
    /// School IDs starting with `scope` for one borrower type, descending
    async fn school_ids_in_scope(
        &self,
        scope: &str,
        borrower_type: BorrowerType,
    ) -> AppResult<Vec<String>>;
    /// Fails with `Conflict` when the school ID is already taken
    async fn insert_borrower(&self, data: &NewBorrower) -> AppResult<Borrower>;
    async fn set_borrower_status(&self, id: i32, status: RecordStatus) -> AppResult<Borrower>;

    async fn get_room(&self, id: i32) -> AppResult<Room>;
    async fn list_rooms(&self) -> AppResult<Vec<Room>>;
    async fn create_room(&self, data: &CreateRoom) -> AppResult<Room>;

    async fn get_borrow(&self, id: i32) -> AppResult<Borrow>;
    /// Borrows matching the stored-column filters, ordered by due date
    async fn list_borrows(&self, query: &BorrowQuery) -> AppResult<Vec<Borrow>>;
    /// Debit the item's stock and insert an open borrow
    async fn open_borrow(&self, data: &NewBorrow) -> AppResult<Borrow>;
    /// Open borrows held in a room, with their item and borrower
    async fn room_occupancy(&self, room_id: i32) -> AppResult<Vec<OccupiedSlot>>;

    /// Close the borrow, insert its return record and credit the item's stock
    async fn apply_return(&self, settlement: &ReturnSettlement) -> AppResult<ReturnRecord>;
    async fn get_return_for_borrow(&self, borrow_id: i32) -> AppResult<Option<ReturnRecord>>;
    async fn list_returns(&self) -> AppResult<Vec<ReturnRecord>>;
}

/// PostgreSQL-backed repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub borrowers: borrowers::BorrowersRepository,
    pub rooms: rooms::RoomsRepository,
    pub borrows: borrows::BorrowsRepository,
    pub returns: returns::ReturnsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            borrowers: borrowers::BorrowersRepository::new(pool.clone()),
            rooms: rooms::RoomsRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            returns: returns::ReturnsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl LendingStore for Repository {
    async fn get_item(&self, id: i32) -> AppResult<Item> {
        self.items.get_by_id(id).await
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.items.list().await
    }

    async fn create_item(&self, data: &CreateItem) -> AppResult<Item> {
        self.items.create(data).await
    }

    async fn update_item(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        self.items.update(id, data).await
    }

    async fn get_borrower(&self, id: i32) -> AppResult<Borrower> {
        self.borrowers.get_by_id(id).await
    }

    async fn list_borrowers(&self) -> AppResult<Vec<Borrower>> {
        self.borrowers.list().await
    }

    async fn school_ids_in_scope(
        &self,
        scope: &str,
        borrower_type: BorrowerType,
    ) -> AppResult<Vec<String>> {
        self.borrowers.school_ids_in_scope(scope, borrower_type).await
    }

    async fn insert_borrower(&self, data: &NewBorrower) -> AppResult<Borrower> {
        self.borrowers.create(data).await
    }

    async fn set_borrower_status(&self, id: i32, status: RecordStatus) -> AppResult<Borrower> {
        self.borrowers.set_status(id, status).await
    }

    async fn get_room(&self, id: i32) -> AppResult<Room> {
        self.rooms.get_by_id(id).await
    }

    async fn list_rooms(&self) -> AppResult<Vec<Room>> {
        self.rooms.list().await
    }

    async fn create_room(&self, data: &CreateRoom) -> AppResult<Room> {
        self.rooms.create(data).await
    }

    async fn get_borrow(&self, id: i32) -> AppResult<Borrow> {
        self.borrows.get_by_id(id).await
    }

    async fn list_borrows(&self, query: &BorrowQuery) -> AppResult<Vec<Borrow>> {
        self.borrows.list(query).await
    }

    async fn open_borrow(&self, data: &NewBorrow) -> AppResult<Borrow> {
        self.borrows.open(data).await
    }

    async fn room_occupancy(&self, room_id: i32) -> AppResult<Vec<OccupiedSlot>> {
        self.borrows.room_occupancy(room_id).await
    }

    async fn apply_return(&self, settlement: &ReturnSettlement) -> AppResult<ReturnRecord> {
        self.returns.apply(settlement).await
    }

    async fn get_return_for_borrow(&self, borrow_id: i32) -> AppResult<Option<ReturnRecord>> {
        self.returns.get_by_borrow(borrow_id).await
    }

    async fn list_returns(&self) -> AppResult<Vec<ReturnRecord>> {
        self.returns.list().await
    }
}

//! In-process store with the same semantics as the PostgreSQL repository
//!
//! Each operation runs under one lock, so multi-record writes are atomic:
//! every check is made against the current state before anything is
//! written back.

use async_trait::async_trait;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;

use super::LendingStore;
use crate::{
    clock::Clock,
    error::{AppError, AppResult, Resource},
    lending::{ledger, lifecycle, ReturnSettlement},
    models::{
        borrow::{BorrowQuery, NewBorrow},
        borrower::{BorrowerShort, NewBorrower},
        item::{CreateItem, ItemShort, UpdateItem},
        room::{CreateRoom, OccupiedSlot},
        Borrow, BorrowStatus, Borrower, BorrowerType, Item, RecordStatus, ReturnRecord, Room,
    },
};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
struct State {
    items: Table<Item>,
    borrowers: Table<Borrower>,
    rooms: Table<Room>,
    borrows: Table<Borrow>,
    returns: Table<ReturnRecord>,
}

pub struct MemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Insert a borrow row as-is, bypassing stock movement (legacy data import)
    pub async fn seed_borrow(&self, mut borrow: Borrow) -> Borrow {
        let mut state = self.state.lock().await;
        borrow.id = state.borrows.next_id();
        state.borrows.rows.insert(borrow.id, borrow.clone());
        borrow
    }
}

#[async_trait]
impl LendingStore for MemoryStore {
    async fn get_item(&self, id: i32) -> AppResult<Item> {
        let state = self.state.lock().await;
        state
            .items
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Item(id)))
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let state = self.state.lock().await;
        let mut items: Vec<Item> = state.items.rows.values().cloned().collect();
        items.sort_by(|a, b| a.device_tag.cmp(&b.device_tag));
        Ok(items)
    }

    async fn create_item(&self, data: &CreateItem) -> AppResult<Item> {
        let mut state = self.state.lock().await;
        if state.items.rows.values().any(|i| i.device_tag == data.device_tag) {
            return Err(AppError::Conflict(format!(
                "Device tag {} already exists",
                data.device_tag
            )));
        }
        if data.raw_stock < 0 {
            return Err(AppError::Validation("Stock must not be negative".to_string()));
        }

        let now = self.clock.now();
        let item = Item {
            id: state.items.next_id(),
            device_tag: data.device_tag.clone(),
            model: data.model.clone(),
            category: data.category.clone(),
            brand: data.brand.clone(),
            description: data.description.clone(),
            item_type: data.item_type.clone(),
            raw_stock: data.raw_stock,
            status: data.status.unwrap_or_default(),
            price: data.price,
            photo: data.photo.clone(),
            item_count: None,
            remarks: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.items.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let item = state
            .items
            .rows
            .get_mut(&id)
            .ok_or(AppError::NotFound(Resource::Item(id)))?;
        data.apply_to(item);
        item.updated_at = Some(now);
        Ok(item.clone())
    }

    async fn get_borrower(&self, id: i32) -> AppResult<Borrower> {
        let state = self.state.lock().await;
        state
            .borrowers
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Borrower(id)))
    }

    async fn list_borrowers(&self) -> AppResult<Vec<Borrower>> {
        let state = self.state.lock().await;
        let mut borrowers: Vec<Borrower> = state.borrowers.rows.values().cloned().collect();
        borrowers.sort_by(|a, b| (&a.lastname, &a.firstname).cmp(&(&b.lastname, &b.firstname)));
        Ok(borrowers)
    }

    async fn school_ids_in_scope(
        &self,
        scope: &str,
        borrower_type: BorrowerType,
    ) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        let mut ids: Vec<String> = state
            .borrowers
            .rows
            .values()
            .filter(|b| b.borrower_type == borrower_type && b.school_id.starts_with(scope))
            .map(|b| b.school_id.clone())
            .collect();
        ids.sort_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    async fn insert_borrower(&self, data: &NewBorrower) -> AppResult<Borrower> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.borrowers.rows.values().any(|b| b.school_id == data.school_id) {
            return Err(AppError::Conflict(format!(
                "School ID {} already exists",
                data.school_id
            )));
        }

        let borrower = Borrower {
            id: state.borrowers.next_id(),
            school_id: data.school_id.clone(),
            firstname: data.firstname.clone(),
            lastname: data.lastname.clone(),
            gender: data.gender.clone(),
            contact: data.contact.clone(),
            department: data.department.clone(),
            year_section: data.year_section.clone(),
            borrower_type: data.borrower_type,
            password: data.password_hash.clone(),
            status: RecordStatus::Active,
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.borrowers.rows.insert(borrower.id, borrower.clone());
        Ok(borrower)
    }

    async fn set_borrower_status(&self, id: i32, status: RecordStatus) -> AppResult<Borrower> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let borrower = state
            .borrowers
            .rows
            .get_mut(&id)
            .ok_or(AppError::NotFound(Resource::Borrower(id)))?;
        borrower.status = status;
        borrower.updated_at = Some(now);
        Ok(borrower.clone())
    }

    async fn get_room(&self, id: i32) -> AppResult<Room> {
        let state = self.state.lock().await;
        state
            .rooms
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Room(id)))
    }

    async fn list_rooms(&self) -> AppResult<Vec<Room>> {
        let state = self.state.lock().await;
        let mut rooms: Vec<Room> = state.rooms.rows.values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }

    async fn create_room(&self, data: &CreateRoom) -> AppResult<Room> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let room = Room {
            id: state.rooms.next_id(),
            name: data.name.clone(),
            description: data.description.clone(),
            status: RecordStatus::Active,
            created_at: Some(now),
        };
        state.rooms.rows.insert(room.id, room.clone());
        Ok(room)
    }

    async fn get_borrow(&self, id: i32) -> AppResult<Borrow> {
        let state = self.state.lock().await;
        state
            .borrows
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Borrow(id)))
    }

    async fn list_borrows(&self, query: &BorrowQuery) -> AppResult<Vec<Borrow>> {
        let state = self.state.lock().await;
        let mut borrows: Vec<Borrow> = state
            .borrows
            .rows
            .values()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        borrows.sort_by(|a, b| (a.due_date, a.id).cmp(&(b.due_date, b.id)));
        Ok(borrows)
    }

    async fn open_borrow(&self, data: &NewBorrow) -> AppResult<Borrow> {
        let mut state = self.state.lock().await;
        let available = state
            .items
            .rows
            .get(&data.item_id)
            .map(|i| i.raw_stock)
            .ok_or(AppError::NotFound(Resource::Item(data.item_id)))?;
        let remaining = ledger::debit(data.item_id, available, data.quantity)?;

        let borrow = Borrow {
            id: state.borrows.next_id(),
            borrower_id: Some(data.borrower_id),
            item_id: Some(data.item_id),
            room_id: data.room_id,
            quantity: data.quantity,
            date_borrowed: data.date_borrowed,
            due_date: data.due_date,
            date_returned: None,
            status: BorrowStatus::Borrowed,
            purpose: data.purpose.clone(),
            notes: data.notes.clone(),
        };

        if let Some(item) = state.items.rows.get_mut(&data.item_id) {
            item.raw_stock = remaining;
            item.updated_at = Some(data.date_borrowed);
        }
        state.borrows.rows.insert(borrow.id, borrow.clone());
        Ok(borrow)
    }

    async fn room_occupancy(&self, room_id: i32) -> AppResult<Vec<OccupiedSlot>> {
        let state = self.state.lock().await;
        let mut slots: Vec<OccupiedSlot> = state
            .borrows
            .rows
            .values()
            .filter(|b| b.room_id == Some(room_id) && lifecycle::is_open(b))
            .filter_map(|b| {
                let item = state.items.rows.get(&b.item_id?)?;
                let borrower = state.borrowers.rows.get(&b.borrower_id?)?;
                Some(OccupiedSlot {
                    borrow: b.clone(),
                    item: ItemShort::from(item),
                    borrower: BorrowerShort::from(borrower),
                })
            })
            .collect();
        slots.sort_by(|a, b| (a.borrow.due_date, a.borrow.id).cmp(&(b.borrow.due_date, b.borrow.id)));
        Ok(slots)
    }

    async fn apply_return(&self, settlement: &ReturnSettlement) -> AppResult<ReturnRecord> {
        let mut state = self.state.lock().await;

        let mut borrow = state
            .borrows
            .rows
            .get(&settlement.borrow_id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Borrow(settlement.borrow_id)))?;
        lifecycle::close(&mut borrow, settlement.returned_at)?;

        let available = state
            .items
            .rows
            .get(&settlement.item_id)
            .map(|i| i.raw_stock)
            .ok_or(AppError::NotFound(Resource::Item(settlement.item_id)))?;
        let restocked = ledger::credit(settlement.item_id, available, settlement.quantity)?;

        // All checks passed; write everything
        let record = settlement.clone().into_record(state.returns.next_id());
        state.returns.rows.insert(record.id, record.clone());
        state.borrows.rows.insert(borrow.id, borrow);
        if let Some(item) = state.items.rows.get_mut(&settlement.item_id) {
            item.raw_stock = restocked;
            item.updated_at = Some(settlement.returned_at);
        }
        Ok(record)
    }

    async fn get_return_for_borrow(&self, borrow_id: i32) -> AppResult<Option<ReturnRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .returns
            .rows
            .values()
            .find(|r| r.borrow_id == borrow_id)
            .cloned())
    }

    async fn list_returns(&self) -> AppResult<Vec<ReturnRecord>> {
        let state = self.state.lock().await;
        let mut records: Vec<ReturnRecord> = state.returns.rows.values().cloned().collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }
}

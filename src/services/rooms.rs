//! Rooms service and occupancy view

use std::sync::Arc;
use validator::Validate;

use crate::{
    clock::Clock,
    error::AppResult,
    lending::lifecycle,
    models::{room::CreateRoom, Room, RoomItem},
    repository::LendingStore,
};

#[derive(Clone)]
pub struct RoomsService {
    store: Arc<dyn LendingStore>,
    clock: Arc<dyn Clock>,
}

impl RoomsService {
    pub fn new(store: Arc<dyn LendingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Room> {
        self.store.get_room(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Room>> {
        self.store.list_rooms().await
    }

    pub async fn create(&self, data: &CreateRoom) -> AppResult<Room> {
        data.validate()?;
        let room = self.store.create_room(data).await?;
        tracing::info!("Created room {} ({})", room.id, room.name);
        Ok(room)
    }

    /// Items currently held in a room, with overdue state computed now
    pub async fn list_room_items(&self, room_id: i32) -> AppResult<Vec<RoomItem>> {
        self.store.get_room(room_id).await?;
        let now = self.clock.now();

        let slots = self.store.room_occupancy(room_id).await?;
        Ok(slots
            .into_iter()
            .map(|slot| RoomItem {
                borrow_id: slot.borrow.id,
                quantity: slot.borrow.quantity,
                date_borrowed: slot.borrow.date_borrowed,
                due_date: slot.borrow.due_date,
                purpose: slot.borrow.purpose.clone(),
                is_overdue: lifecycle::is_overdue(&slot.borrow, now),
                days_overdue: lifecycle::days_overdue(&slot.borrow, now),
                item: slot.item,
                borrower: slot.borrower,
            })
            .collect())
    }
}

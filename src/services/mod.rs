//! Business logic services

pub mod borrowers;
pub mod borrows;
pub mod inventory;
pub mod returns;
pub mod rooms;

use std::sync::Arc;

use crate::{clock::Clock, config::LendingConfig, repository::LendingStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub borrowers: borrowers::BorrowersService,
    pub inventory: inventory::InventoryService,
    pub rooms: rooms::RoomsService,
    pub borrows: borrows::BorrowsService,
    pub returns: returns::ReturnsService,
}

impl Services {
    /// Create all services over one store and one clock
    pub fn new(store: Arc<dyn LendingStore>, clock: Arc<dyn Clock>, lending: LendingConfig) -> Self {
        let inventory = inventory::InventoryService::new(store.clone());
        Self {
            borrowers: borrowers::BorrowersService::new(store.clone(), clock.clone(), lending),
            rooms: rooms::RoomsService::new(store.clone(), clock.clone()),
            borrows: borrows::BorrowsService::new(store.clone(), clock.clone(), inventory.clone()),
            returns: returns::ReturnsService::new(store, clock),
            inventory,
        }
    }
}

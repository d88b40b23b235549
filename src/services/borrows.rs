//! Borrow lifecycle service

use std::sync::Arc;
use validator::Validate;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    lending::lifecycle,
    models::{
        borrow::{BorrowQuery, BorrowStats, CreateBorrow, NewBorrow},
        Borrow, BorrowStatus, BorrowView,
    },
    repository::LendingStore,
};

use super::inventory::InventoryService;

#[derive(Clone)]
pub struct BorrowsService {
    store: Arc<dyn LendingStore>,
    clock: Arc<dyn Clock>,
    inventory: InventoryService,
}

impl BorrowsService {
    pub fn new(store: Arc<dyn LendingStore>, clock: Arc<dyn Clock>, inventory: InventoryService) -> Self {
        Self {
            store,
            clock,
            inventory,
        }
    }

    /// Lend `quantity` units of an item to a borrower
    #[tracing::instrument(skip(self, data), fields(borrower_id = data.borrower_id, item_id = data.item_id, quantity = data.quantity))]
    pub async fn create_borrow(&self, data: CreateBorrow) -> AppResult<BorrowView> {
        data.validate()?;
        let now = self.clock.now();

        let borrower = self.store.get_borrower(data.borrower_id).await?;
        if !borrower.is_active() {
            return Err(AppError::BusinessRule(format!(
                "Borrower {} is inactive",
                borrower.school_id
            )));
        }
        if let Some(room_id) = data.room_id {
            self.store.get_room(room_id).await?;
        }
        if data.due_date <= now {
            return Err(AppError::Validation(
                "Due date must be after the borrow date".to_string(),
            ));
        }
        self.inventory.ensure_available(data.item_id, data.quantity).await?;

        let borrow = self
            .store
            .open_borrow(&NewBorrow {
                borrower_id: data.borrower_id,
                item_id: data.item_id,
                room_id: data.room_id,
                quantity: data.quantity,
                date_borrowed: now,
                due_date: data.due_date,
                purpose: data.purpose,
                notes: data.notes,
            })
            .await?;

        tracing::info!(
            "Borrow {} opened: {} x item {} to borrower {}",
            borrow.id,
            borrow.quantity,
            data.item_id,
            borrower.school_id
        );
        Ok(lifecycle::view(borrow, now))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowView> {
        let borrow = self.store.get_borrow(id).await?;
        Ok(lifecycle::view(borrow, self.clock.now()))
    }

    /// Borrows matching a filter, overdue state derived now
    pub async fn list(&self, query: &BorrowQuery) -> AppResult<Vec<BorrowView>> {
        let now = self.clock.now();
        let borrows = self.store.list_borrows(query).await?;
        Ok(borrows
            .into_iter()
            .map(|b| lifecycle::view(b, now))
            .filter(|v| !query.overdue_only || v.is_overdue)
            .collect())
    }

    /// Open borrows of one borrower
    pub async fn borrower_borrows(&self, borrower_id: i32) -> AppResult<Vec<BorrowView>> {
        self.store.get_borrower(borrower_id).await?;
        self.list(&BorrowQuery {
            borrower_id: Some(borrower_id),
            status: Some(BorrowStatus::Borrowed),
            ..Default::default()
        })
        .await
    }

    pub fn is_overdue(&self, borrow: &Borrow) -> bool {
        lifecycle::is_overdue(borrow, self.clock.now())
    }

    /// Count open and overdue borrows
    pub async fn stats(&self) -> AppResult<BorrowStats> {
        let open = self
            .list(&BorrowQuery {
                status: Some(BorrowStatus::Borrowed),
                ..Default::default()
            })
            .await?;
        Ok(BorrowStats {
            active: open.len() as i64,
            overdue: open.iter().filter(|v| v.is_overdue).count() as i64,
        })
    }
}

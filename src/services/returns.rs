//! Return recorder: closes borrows and restores stock

use std::sync::Arc;
use validator::Validate;

use crate::{
    clock::Clock,
    error::{AppError, AppResult, Resource},
    lending::settlement,
    models::{return_record::ReturnDetails, ReturnRecord},
    repository::LendingStore,
};

#[derive(Clone)]
pub struct ReturnsService {
    store: Arc<dyn LendingStore>,
    clock: Arc<dyn Clock>,
}

impl ReturnsService {
    pub fn new(store: Arc<dyn LendingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record the return of a borrow.
    ///
    /// Closing the borrow, writing the return record and crediting stock
    /// happen as one unit in the store; a second return of the same borrow
    /// fails with `AlreadyReturned` and changes nothing.
    #[tracing::instrument(skip(self, details))]
    pub async fn record_return(&self, borrow_id: i32, details: ReturnDetails) -> AppResult<ReturnRecord> {
        details.validate()?;

        let borrow = self.store.get_borrow(borrow_id).await?;
        let settlement = settlement::settle(&borrow, details, self.clock.now())?;
        let record = self.store.apply_return(&settlement).await?;

        tracing::info!(
            "Borrow {} returned: {} x item {} in condition {} (late fee {}, damage fee {})",
            borrow_id,
            record.quantity,
            record.item_id,
            record.condition,
            record.late_fee,
            record.damage_fee
        );
        Ok(record)
    }

    pub async fn get_for_borrow(&self, borrow_id: i32) -> AppResult<ReturnRecord> {
        self.store
            .get_return_for_borrow(borrow_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Return(borrow_id)))
    }

    pub async fn list(&self) -> AppResult<Vec<ReturnRecord>> {
        self.store.list_returns().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        models::{item::CreateItem, Borrow, BorrowStatus},
        repository::MemoryStore,
    };
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        service: ReturnsService,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap()));
        let store = Arc::new(MemoryStore::new(clock.clone()));
        let service = ReturnsService::new(store.clone(), clock.clone());
        Fixture { store, clock, service }
    }

    async fn item(store: &MemoryStore, tag: &str, stock: i32) -> i32 {
        store
            .create_item(&CreateItem {
                device_tag: tag.to_string(),
                model: None,
                category: None,
                brand: None,
                description: None,
                item_type: None,
                raw_stock: stock,
                status: None,
                price: None,
                photo: None,
            })
            .await
            .unwrap()
            .id
    }

    fn legacy_borrow(item_id: Option<i32>, borrower_id: Option<i32>, quantity: i32) -> Borrow {
        let borrowed = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
        Borrow {
            id: 0,
            borrower_id,
            item_id,
            room_id: None,
            quantity,
            date_borrowed: borrowed,
            due_date: borrowed + Duration::days(5),
            date_returned: None,
            status: BorrowStatus::Borrowed,
            purpose: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_missing_borrow() {
        let f = fixture();
        assert!(matches!(
            f.service.record_return(404, ReturnDetails::default()).await,
            Err(AppError::NotFound(Resource::Borrow(404)))
        ));
        assert!(matches!(
            f.service.get_for_borrow(404).await,
            Err(AppError::NotFound(Resource::Return(404)))
        ));
    }

    #[tokio::test]
    async fn test_return_credits_stock_and_snapshots_references() {
        let f = fixture();
        let item_id = item(&f.store, "PRJ-01", 0).await;
        let borrow = f.store.seed_borrow(legacy_borrow(Some(item_id), Some(7), 2)).await;

        let record = f
            .service
            .record_return(
                borrow.id,
                ReturnDetails {
                    late_fee: Some(dec!(25.00)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(record.borrower_id, 7);
        assert_eq!(record.item_id, item_id);
        assert_eq!(record.quantity, 2);
        assert_eq!(record.condition, "Good");
        assert_eq!(record.late_fee, dec!(25.00));
        assert_eq!(record.created_at, f.clock.now());

        assert_eq!(f.store.get_item(item_id).await.unwrap().raw_stock, 2);
        let closed = f.store.get_borrow(borrow.id).await.unwrap();
        assert_eq!(closed.status, BorrowStatus::Returned);
        assert_eq!(closed.date_returned, Some(f.clock.now()));
        assert_eq!(f.service.get_for_borrow(borrow.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_missing_references_leave_no_trace() {
        let f = fixture();
        let item_id = item(&f.store, "PRJ-01", 3).await;
        let no_borrower = f.store.seed_borrow(legacy_borrow(Some(item_id), None, 1)).await;
        let no_item = f.store.seed_borrow(legacy_borrow(None, Some(1), 1)).await;

        for (id, missing) in [(no_borrower.id, "borrower"), (no_item.id, "item")] {
            match f.service.record_return(id, ReturnDetails::default()).await {
                Err(AppError::InvalidBorrowRecord { borrow_id, missing: m }) => {
                    assert_eq!(borrow_id, id);
                    assert_eq!(m, missing);
                }
                other => panic!("expected InvalidBorrowRecord, got {:?}", other),
            }
        }

        assert!(f.service.list().await.unwrap().is_empty());
        assert_eq!(f.store.get_item(item_id).await.unwrap().raw_stock, 3);
        assert_eq!(f.store.get_borrow(no_borrower.id).await.unwrap(), no_borrower);
        assert_eq!(f.store.get_borrow(no_item.id).await.unwrap(), no_item);
    }

    #[tokio::test]
    async fn test_failed_credit_rolls_back_the_whole_return() {
        let f = fixture();
        let item_id = item(&f.store, "CABLE-01", i32::MAX).await;
        let borrow = f.store.seed_borrow(legacy_borrow(Some(item_id), Some(1), 1)).await;

        assert!(f.service.record_return(borrow.id, ReturnDetails::default()).await.is_err());

        assert_eq!(f.store.get_borrow(borrow.id).await.unwrap(), borrow);
        assert!(f.service.list().await.unwrap().is_empty());
        assert_eq!(f.store.get_item(item_id).await.unwrap().raw_stock, i32::MAX);
    }

    #[tokio::test]
    async fn test_concurrent_returns_settle_once() {
        let f = fixture();
        let item_id = item(&f.store, "CAM-01", 0).await;
        let borrow = f.store.seed_borrow(legacy_borrow(Some(item_id), Some(1), 3)).await;

        let (a, b) = tokio::join!(
            f.service.record_return(borrow.id, ReturnDetails::default()),
            f.service.record_return(borrow.id, ReturnDetails::default())
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::AlreadyReturned { .. }))));
        assert_eq!(f.store.get_item(item_id).await.unwrap().raw_stock, 3);
        assert_eq!(f.service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overlong_condition_is_rejected() {
        let f = fixture();
        let item_id = item(&f.store, "MIC-01", 0).await;
        let borrow = f.store.seed_borrow(legacy_borrow(Some(item_id), Some(1), 1)).await;

        let result = f
            .service
            .record_return(
                borrow.id,
                ReturnDetails {
                    condition: Some("x".repeat(65)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(f.store.get_borrow(borrow.id).await.unwrap(), borrow);
        assert_eq!(f.store.get_item(item_id).await.unwrap().raw_stock, 0);

        let record = f
            .service
            .record_return(
                borrow.id,
                ReturnDetails {
                    condition: Some("x".repeat(64)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(record.condition.len(), 64);
    }
}

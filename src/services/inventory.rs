//! Inventory service: items and their available stock

use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppResult,
    lending::ledger,
    models::{
        item::{CreateItem, UpdateItem},
        Item,
    },
    repository::LendingStore,
};

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn LendingStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn LendingStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        self.store.get_item(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Item>> {
        self.store.list_items().await
    }

    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        data.validate()?;
        let item = self.store.create_item(data).await?;
        tracing::info!("Created item {} ({}) with stock {}", item.id, item.device_tag, item.raw_stock);
        Ok(item)
    }

    /// Update descriptive fields and status annotations; stock is not writable here
    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        data.validate()?;
        let item = self.store.update_item(id, data).await?;
        if data.status.is_some() {
            tracing::info!(
                "Item {} status changed to {:?} ({:?} units: {:?})",
                id,
                item.status,
                item.item_count,
                item.remarks
            );
        }
        Ok(item)
    }

    /// Check that `quantity` units can currently be lent.
    ///
    /// Advisory only: the authoritative check is repeated atomically when
    /// the borrow is opened.
    pub async fn ensure_available(&self, item_id: i32, quantity: i32) -> AppResult<Item> {
        let item = self.store.get_item(item_id).await?;
        ledger::debit(item.id, item.raw_stock, quantity)?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        error::{AppError, Resource},
        models::ItemStatus,
        repository::MemoryStore,
    };
    use chrono::Utc;

    fn service() -> InventoryService {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        InventoryService::new(Arc::new(MemoryStore::new(clock)))
    }

    fn laptop(stock: i32) -> CreateItem {
        CreateItem {
            device_tag: "DEV-001".to_string(),
            model: Some("ThinkPad T14".to_string()),
            category: Some("Laptop".to_string()),
            brand: Some("Lenovo".to_string()),
            description: None,
            item_type: None,
            raw_stock: stock,
            status: None,
            price: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate_tag() {
        let service = service();
        let item = service.create(&laptop(5)).await.unwrap();
        assert_eq!(item.raw_stock, 5);
        assert_eq!(item.status, ItemStatus::New);

        assert!(matches!(service.create(&laptop(1)).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_negative_initial_stock_is_rejected() {
        let service = service();
        assert!(matches!(service.create(&laptop(-1)).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_status_change_keeps_stock() {
        let service = service();
        let item = service.create(&laptop(5)).await.unwrap();

        let update = UpdateItem {
            status: Some(ItemStatus::Damaged),
            item_count: Some(1),
            remarks: Some("Dropped during lab".to_string()),
            ..Default::default()
        };
        let updated = service.update(item.id, &update).await.unwrap();
        assert_eq!(updated.status, ItemStatus::Damaged);
        assert_eq!(updated.item_count, Some(1));
        assert_eq!(updated.raw_stock, 5);
        assert_eq!(updated.model.as_deref(), Some("ThinkPad T14"));
    }

    #[tokio::test]
    async fn test_ensure_available() {
        let service = service();
        let item = service.create(&laptop(4)).await.unwrap();

        assert!(service.ensure_available(item.id, 4).await.is_ok());
        assert!(matches!(
            service.ensure_available(item.id, 10).await,
            Err(AppError::InsufficientStock { requested: 10, available: 4, .. })
        ));
        assert!(matches!(
            service.ensure_available(77, 1).await,
            Err(AppError::NotFound(Resource::Item(77)))
        ));
    }
}

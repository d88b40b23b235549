//! Item (borrowable equipment) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ItemStatus;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    /// Unique business key, e.g. "DEV-001"
    pub device_tag: String,
    pub model: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub item_type: Option<String>,
    /// Units currently available (never negative)
    pub raw_stock: i32,
    pub status: ItemStatus,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub photo: Option<String>,
    /// Units concerned by the last status change
    pub item_count: Option<i32>,
    /// Annotation of the last status change
    pub remarks: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Short item representation embedded in borrow views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemShort {
    pub id: i32,
    pub device_tag: String,
    pub model: Option<String>,
    pub category: Option<String>,
    pub raw_stock: i32,
}

impl From<&Item> for ItemShort {
    fn from(item: &Item) -> Self {
        ItemShort {
            id: item.id,
            device_tag: item.device_tag.clone(),
            model: item.model.clone(),
            category: item.category.clone(),
            raw_stock: item.raw_stock,
        }
    }
}

/// Create item request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 64))]
    pub device_tag: String,
    pub model: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub item_type: Option<String>,
    /// Initial available stock
    #[validate(range(min = 0))]
    pub raw_stock: i32,
    pub status: Option<ItemStatus>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub photo: Option<String>,
}

/// Update item request. Stock is not writable here; it only moves through borrows and returns.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    pub model: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub item_type: Option<String>,
    pub status: Option<ItemStatus>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub photo: Option<String>,
    #[validate(range(min = 0))]
    pub item_count: Option<i32>,
    pub remarks: Option<String>,
}

impl UpdateItem {
    /// Apply the present fields onto an item
    pub fn apply_to(&self, item: &mut Item) {
        macro_rules! set_field {
            ($field:ident) => {
                if let Some(ref val) = self.$field {
                    item.$field = Some(val.clone());
                }
            };
        }

        set_field!(model);
        set_field!(category);
        set_field!(brand);
        set_field!(description);
        set_field!(item_type);
        set_field!(price);
        set_field!(photo);
        set_field!(item_count);
        set_field!(remarks);

        if let Some(status) = self.status {
            item.status = status;
        }
    }
}

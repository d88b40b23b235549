//! Items repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Resource},
    lending::ledger,
    models::item::{CreateItem, Item, UpdateItem},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(Resource::Item(id)))
    }

    /// List all items
    pub async fn list(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY device_tag")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Create item
    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE device_tag = $1)")
                .bind(&data.device_tag)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(AppError::Conflict(format!(
                "Device tag {} already exists",
                data.device_tag
            )));
        }

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (device_tag, model, category, brand, description, item_type,
                               raw_stock, status, price, photo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&data.device_tag)
        .bind(&data.model)
        .bind(&data.category)
        .bind(&data.brand)
        .bind(&data.description)
        .bind(&data.item_type)
        .bind(data.raw_stock)
        .bind(data.status.unwrap_or_default())
        .bind(data.price)
        .bind(&data.photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    /// Update descriptive fields of an item
    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.model, "model");
        add_field!(data.category, "category");
        add_field!(data.brand, "brand");
        add_field!(data.description, "description");
        add_field!(data.item_type, "item_type");
        add_field!(data.status, "status");
        add_field!(data.price, "price");
        add_field!(data.photo, "photo");
        add_field!(data.item_count, "item_count");
        add_field!(data.remarks, "remarks");

        let query = format!(
            "UPDATE items SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Item>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.model);
        bind_field!(data.category);
        bind_field!(data.brand);
        bind_field!(data.description);
        bind_field!(data.item_type);
        bind_field!(data.status);
        bind_field!(data.price);
        bind_field!(data.photo);
        bind_field!(data.item_count);
        bind_field!(data.remarks);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(Resource::Item(id)))
    }
}

/// Atomically move an item's stock by `delta` inside the caller's transaction.
///
/// The conditional update is the only write path to `raw_stock`; it never
/// lets the count drop below zero, whatever the interleaving.
pub(crate) async fn adjust_stock(conn: &mut PgConnection, item_id: i32, delta: i32) -> AppResult<i32> {
    ledger::validate_quantity(delta.saturating_abs())?;

    let updated: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE items SET raw_stock = raw_stock + $1, updated_at = NOW()
        WHERE id = $2 AND raw_stock + $1 >= 0
        RETURNING raw_stock
        "#,
    )
    .bind(delta)
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(stock) = updated {
        return Ok(stock);
    }

    let available: Option<i32> = sqlx::query_scalar("SELECT raw_stock FROM items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?;

    match available {
        None => Err(AppError::NotFound(Resource::Item(item_id))),
        Some(available) => Err(AppError::InsufficientStock {
            item_id,
            requested: delta.saturating_abs(),
            available,
        }),
    }
}

//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrowers, borrows, health, items, rooms};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendtrack API",
        version = "1.0.0",
        description = "School property lending REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Borrowers
        borrowers::list_borrowers,
        borrowers::get_borrower,
        borrowers::create_borrower,
        borrowers::update_borrower_status,
        borrowers::get_borrower_borrows,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::list_room_items,
        // Borrows
        borrows::list_borrows,
        borrows::get_borrow,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::get_borrow_return,
        borrows::list_returns,
        // Stats
        borrows::get_borrow_stats,
    ),
    components(
        schemas(
            // Borrowers
            crate::models::borrower::Borrower,
            crate::models::borrower::BorrowerShort,
            crate::models::borrower::CreateBorrower,
            crate::models::borrower::UpdateBorrowerStatus,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemShort,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            // Rooms
            crate::models::room::Room,
            crate::models::room::CreateRoom,
            crate::models::room::RoomItem,
            // Borrows
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowView,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::BorrowStats,
            crate::models::return_record::ReturnRecord,
            crate::models::return_record::ReturnDetails,
            // Enums
            crate::models::enums::BorrowerType,
            crate::models::enums::RecordStatus,
            crate::models::enums::ItemStatus,
            crate::models::enums::BorrowStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "borrowers", description = "Borrower registry"),
        (name = "items", description = "Inventory items"),
        (name = "rooms", description = "Rooms and their occupancy"),
        (name = "borrows", description = "Borrow lifecycle and returns"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

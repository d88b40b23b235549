//! API integration tests
//!
//! The router runs in-process over the memory store with a pinned clock.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use lendtrack_server::{
    api,
    clock::{Clock, FixedClock},
    config::{AppConfig, LendingConfig},
    models::{Claims, Role},
    repository::MemoryStore,
    services::Services,
    AppState,
};

const SECRET: &str = "integration-secret";

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
}

fn app() -> TestApp {
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap()));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let services = Services::new(store, clock.clone(), LendingConfig::default());

    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };
    TestApp {
        router: api::router(state),
        clock,
    }
}

fn token(role: Role) -> String {
    let now = Utc::now().timestamp();
    Claims {
        sub: "tester".to_string(),
        staff_id: 1,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(SECRET)
    .unwrap()
}

impl TestApp {
    async fn call(&self, method: &str, uri: &str, role: Option<Role>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(role)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn seed(&self, stock: i32) -> (i64, i64, i64) {
        let (status, borrower) = self
            .call(
                "POST",
                "/borrowers",
                Some(Role::Admin),
                Some(json!({ "firstname": "Alan", "lastname": "Turing", "borrower_type": "faculty" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, item) = self
            .call(
                "POST",
                "/items",
                Some(Role::Admin),
                Some(json!({ "device_tag": "PROJ-7", "category": "Projector", "raw_stock": stock })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, room) = self
            .call("POST", "/rooms", Some(Role::Admin), Some(json!({ "name": "Room 101" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        (
            borrower["id"].as_i64().unwrap(),
            item["id"].as_i64().unwrap(),
            room["id"].as_i64().unwrap(),
        )
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.call("GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unauthorized_access() {
    let app = app();
    let (status, _) = app.call("GET", "/borrows", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call("POST", "/rooms", Some(Role::Staff), Some(json!({ "name": "Gym" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_borrower_gets_generated_school_id() {
    let app = app();
    app.seed(1).await;

    let (status, body) = app
        .call(
            "POST",
            "/borrowers",
            Some(Role::Admin),
            Some(json!({ "firstname": "Katherine", "lastname": "Johnson", "borrower_type": "faculty" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["school_id"], "FAC-2025-002");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = app();
    let (borrower_id, item_id, room_id) = app.seed(5).await;
    let due = app.clock.now() + Duration::days(7);

    let (status, borrow) = app
        .call(
            "POST",
            "/borrows",
            Some(Role::Staff),
            Some(json!({
                "borrower_id": borrower_id,
                "item_id": item_id,
                "room_id": room_id,
                "quantity": 3,
                "due_date": due,
                "purpose": "Thesis defense"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(borrow["status"], "borrowed");
    assert_eq!(borrow["is_overdue"], false);
    let borrow_id = borrow["id"].as_i64().unwrap();

    let (_, item) = app.call("GET", &format!("/items/{}", item_id), Some(Role::Staff), None).await;
    assert_eq!(item["raw_stock"], 2);

    let (status, held) = app
        .call("GET", &format!("/rooms/{}/items", room_id), Some(Role::Staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(held.as_array().unwrap().len(), 1);
    assert_eq!(held[0]["item"]["device_tag"], "PROJ-7");

    let (status, record) = app
        .call("POST", &format!("/borrows/{}/return", borrow_id), Some(Role::Staff), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["condition"], "Good");
    assert_eq!(record["quantity"], 3);
    assert_eq!(record["late_fee"], "0.00");

    let (_, item) = app.call("GET", &format!("/items/{}", item_id), Some(Role::Staff), None).await;
    assert_eq!(item["raw_stock"], 5);

    let (status, body) = app
        .call("POST", &format!("/borrows/{}/return", borrow_id), Some(Role::Staff), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyReturned");

    let (status, fetched) = app
        .call("GET", &format!("/borrows/{}/return", borrow_id), Some(Role::Staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, record);

    let (_, returns) = app.call("GET", "/returns", Some(Role::Staff), None).await;
    assert_eq!(returns.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_insufficient_stock_is_conflict() {
    let app = app();
    let (borrower_id, item_id, _) = app.seed(2).await;

    let (status, body) = app
        .call(
            "POST",
            "/borrows",
            Some(Role::Faculty),
            Some(json!({
                "borrower_id": borrower_id,
                "item_id": item_id,
                "quantity": 3,
                "due_date": app.clock.now() + Duration::days(1)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InsufficientStock");

    let (_, item) = app.call("GET", &format!("/items/{}", item_id), Some(Role::Staff), None).await;
    assert_eq!(item["raw_stock"], 2);
}

#[tokio::test]
async fn test_overdue_filter_and_stats() {
    let app = app();
    let (borrower_id, item_id, _) = app.seed(5).await;

    for days in [1, 10] {
        let (status, _) = app
            .call(
                "POST",
                "/borrows",
                Some(Role::Staff),
                Some(json!({
                    "borrower_id": borrower_id,
                    "item_id": item_id,
                    "quantity": 1,
                    "due_date": app.clock.now() + Duration::days(days)
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    app.clock.advance(Duration::days(3));

    let (_, overdue) = app
        .call("GET", "/borrows?overdue_only=true", Some(Role::Staff), None)
        .await;
    let overdue = overdue.as_array().unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0]["days_overdue"], 2);

    let (_, stats) = app.call("GET", "/stats/borrows", Some(Role::Staff), None).await;
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["overdue"], 1);

    let (_, open) = app
        .call("GET", &format!("/borrowers/{}/borrows", borrower_id), Some(Role::Staff), None)
        .await;
    assert_eq!(open.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_not_found() {
    let app = app();
    let (status, body) = app.call("GET", "/borrows/42", Some(Role::Staff), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBorrow");

    let (status, _) = app.call("POST", "/borrows/42/return", Some(Role::Staff), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_return_details_leave_borrow_open() {
    let app = app();
    let (borrower_id, item_id, _) = app.seed(5).await;

    let (status, borrow) = app
        .call(
            "POST",
            "/borrows",
            Some(Role::Staff),
            Some(json!({
                "borrower_id": borrower_id,
                "item_id": item_id,
                "quantity": 3,
                "due_date": app.clock.now() + Duration::days(7)
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let borrow_id = borrow["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            "POST",
            &format!("/borrows/{}/return", borrow_id),
            Some(Role::Staff),
            Some(json!({ "quantity": "two", "condition": "Damaged", "damage_fee": "150.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (_, fetched) = app.call("GET", &format!("/borrows/{}", borrow_id), Some(Role::Staff), None).await;
    assert_eq!(fetched["status"], "borrowed");
    assert!(fetched["date_returned"].is_null());

    let (_, item) = app.call("GET", &format!("/items/{}", item_id), Some(Role::Staff), None).await;
    assert_eq!(item["raw_stock"], 2);

    let (status, _) = app
        .call("GET", &format!("/borrows/{}/return", borrow_id), Some(Role::Staff), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, record) = app
        .call(
            "POST",
            &format!("/borrows/{}/return", borrow_id),
            Some(Role::Staff),
            Some(json!({ "quantity": 2, "condition": "Damaged", "damage_fee": "150.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["quantity"], 2);
    assert_eq!(record["condition"], "Damaged");
    assert_eq!(record["damage_fee"], "150.00");
}

#[tokio::test]
async fn test_oversized_return_details_are_rejected() {
    let app = app();
    let (borrower_id, item_id, _) = app.seed(1).await;

    let (_, borrow) = app
        .call(
            "POST",
            "/borrows",
            Some(Role::Staff),
            Some(json!({
                "borrower_id": borrower_id,
                "item_id": item_id,
                "quantity": 1,
                "due_date": app.clock.now() + Duration::days(1)
            })),
        )
        .await;
    let uri = format!("/borrows/{}/return", borrow["id"].as_i64().unwrap());

    for details in [
        json!({ "condition": "x".repeat(65) }),
        json!({ "late_fee": "0.001" }),
        json!({ "damage_fee": "100000000" }),
    ] {
        let (status, body) = app.call("POST", &uri, Some(Role::Staff), Some(details)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
    }

    let (_, fetched) = app.call("GET", &uri.replace("/return", ""), Some(Role::Staff), None).await;
    assert_eq!(fetched["status"], "borrowed");
}

//! Router tests over in-memory SQLite using tower's `oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use migration::{Migrator, MigratorTrait};
use packhouse_server::{api, setup_app_state};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    api::create_router(setup_app_state(db, 16))
}

fn request(method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder
            .header("x-tenant-id", "finca-norte")
            .header("x-user-id", "u-1")
            .header("x-role", role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_identity_and_role_gate() {
    let app = app().await;

    let (status, body) = send(&app, request("GET", "/api/packing/chambers", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        request("GET", "/api/packing/chambers", Some("OPERATOR"), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("GET", "/api/packing/chambers", Some("SUPERVISOR"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_bin_lifecycle_over_http() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/packing/bins",
            Some("ADMIN"),
            Some(json!({
                "fieldName": "Finca Norte",
                "fruitType": "Limón",
                "lotName": "L1",
                "netWeight": 0
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("netWeight"));

    let (status, bin) = send(
        &app,
        request(
            "POST",
            "/api/packing/bins",
            Some("ADMIN"),
            Some(json!({
                "fieldName": "Finca Norte",
                "fruitType": "Limón",
                "lotName": "L1",
                "netWeight": 420.5
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bin["status"], "IN_YARD");
    let bin_id = bin["id"].as_str().unwrap().to_string();

    let (status, yard) = send(
        &app,
        request("GET", "/api/packing/bins?status=IN_YARD", Some("ADMIN"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(yard.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/packing/bins/{bin_id}/egress"),
            Some("ADMIN"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/packing/bins/{}/discard", uuid_like()),
            Some("ADMIN"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dispatch_status_over_http() {
    let app = app().await;

    let (status, dispatch) = send(
        &app,
        request(
            "POST",
            "/api/packing/dispatches",
            Some("SUPERVISOR"),
            Some(json!({ "clientName": "Mercado Central" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dispatch["status"], "PREPARING");
    let uri = format!("/api/packing/dispatches/{}/status", dispatch["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        request("PUT", &uri, Some("SUPERVISOR"), Some(json!({ "status": "DELIVERED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = send(
        &app,
        request("PUT", &uri, Some("SUPERVISOR"), Some(json!({ "status": "LOADED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "LOADED");
}

#[tokio::test]
async fn test_dashboard_and_lot_summary() {
    let app = app().await;

    let (status, dashboard) = send(
        &app,
        request("GET", "/api/packing/dashboard", Some("ADMIN"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["binsInYard"], 0);
    assert_eq!(dashboard["lineEfficiency"], 0.0);

    let (status, lots) = send(
        &app,
        request(
            "POST",
            "/api/field/lots/summary",
            Some("ADMIN"),
            Some(json!([{
                "name": "L1",
                "tasks": [{
                    "taskType": "Poda",
                    "costValue": 1500.0,
                    "startDate": null,
                    "completedAt": "2024-03-01T10:00:00Z",
                    "createdAt": "2024-02-20T10:00:00Z"
                }],
                "harvests": [{ "cropType": "Limón", "kilos": 800.0 }]
            }])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lots[0]["taskCost"], 1500.0);
    assert_eq!(lots[0]["totalHarvestKilos"], 800.0);
}

fn uuid_like() -> &'static str {
    "6f1c1b2e-3d4a-4b5c-8d9e-0f1a2b3c4d5e"
}

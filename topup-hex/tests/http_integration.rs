//! HTTP-level tests for the top-up API.
//!
//! Drives the full router (SQLite in memory, scripted provider) through
//! `tower::ServiceExt::oneshot`.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use topup_hex::{TopUpService, inbound::HttpServer};
use topup_repo::SqliteRepo;
use topup_types::{AuthToken, ProviderError, TopUpProvider, TopUpReceipt, TopUpRequest};
use tower::ServiceExt;

/// Provider that accepts every top-up except those for two phone numbers.
struct ScriptedProvider;

const DECLINED_PHONE: &str = "3009999999";
const VERBOSE_DECLINE_PHONE: &str = "3009999998";

#[async_trait]
impl TopUpProvider for ScriptedProvider {
    async fn authenticate(&self) -> Result<AuthToken, ProviderError> {
        Ok(AuthToken::new("test-token").unwrap())
    }

    async fn execute_top_up(
        &self,
        request: &TopUpRequest,
        _token: &AuthToken,
    ) -> Result<TopUpReceipt, ProviderError> {
        if request.phone_number().as_str() == DECLINED_PHONE {
            return Err(ProviderError::Declined("Número no habilitado".into()));
        }
        if request.phone_number().as_str() == VERBOSE_DECLINE_PHONE {
            return Err(ProviderError::Declined("x".repeat(600)));
        }
        Ok(TopUpReceipt {
            external_transaction_id: format!("EXT-{}", request.phone_number()),
            message: Some("Recarga exitosa".into()),
            raw_response: None,
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

async fn create_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = TopUpService::new(repo, ScriptedProvider);
    HttpServer::new(service).router()
}

fn request(method: Method, uri: &str, user: Option<i64>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user.to_string());
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn top_up_body(phone: &str, value: Value, supplier: &str) -> Option<Value> {
    Some(json!({ "cellPhone": phone, "value": value, "supplierId": supplier }))
}

#[tokio::test]
async fn test_health() {
    let app = create_app().await;

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            None,
            top_up_body("3001234567", json!(5000), "8753"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn test_successful_top_up_returns_created() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(42),
            top_up_body("3001234567", json!(5000), "8753"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["external_transaction_id"], "EXT-3001234567");
    assert_eq!(body["supplier_name"], "Claro");
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["formatted_amount"], "$ 5.000,00");

    let (status, page) = send(
        &app,
        request(Method::GET, "/api/transactions", Some(42), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_elements"], 1);
    assert_eq!(page["content"][0]["id"], body["id"]);
}

#[tokio::test]
async fn test_validation_error_is_bad_request() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(1),
            top_up_body("3001234567", json!(500), "8753"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("mayor o igual"));

    let (_, page) = send(&app, request(Method::GET, "/api/transactions", Some(1), None)).await;
    assert_eq!(page["total_elements"], 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_app().await;

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(1),
            Some(json!({ "cellPhone": "3001234567" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway_with_transaction_id() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(5),
            top_up_body(DECLINED_PHONE, json!("2000"), "8753"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error procesando la recarga")
    );
    let id = body["transaction_id"].as_i64().unwrap();

    let (status, tx) = send(
        &app,
        request(Method::GET, &format!("/api/transactions/{}", id), Some(5), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["status"], "FAILED");
    assert!(
        tx["response_message"]
            .as_str()
            .unwrap()
            .contains("Número no habilitado")
    );
}

#[tokio::test]
async fn test_long_decline_message_still_records_failed() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(5),
            top_up_body(VERBOSE_DECLINE_PHONE, json!(5000), "8753"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let id = body["transaction_id"].as_i64().unwrap();

    let (status, tx) = send(
        &app,
        request(Method::GET, &format!("/api/transactions/{}", id), Some(5), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["status"], "FAILED");
    assert!(tx["response_message"].as_str().unwrap().len() > 600);
}

#[tokio::test]
async fn test_transaction_access_rules() {
    let app = create_app().await;
    let (_, created) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(1),
            top_up_body("3101234567", json!(10000), "9773"),
        ),
    )
    .await;
    let uri = format!("/api/transactions/{}", created["id"]);

    let (status, _) = send(&app, request(Method::GET, &uri, Some(2), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/transactions/9999", Some(1), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/transactions/abc", Some(1), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_soft_delete_and_reactivate() {
    let app = create_app().await;
    let (_, created) = send(
        &app,
        request(
            Method::POST,
            "/api/topups",
            Some(1),
            top_up_body("3201234567", json!(3000), "3398"),
        ),
    )
    .await;
    let uri = format!("/api/transactions/{}", created["id"]);

    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(1), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, request(Method::GET, &uri, Some(1), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, by_phone) = send(
        &app,
        request(Method::GET, "/api/transactions/phone/3201234567", Some(1), None),
    )
    .await;
    assert_eq!(by_phone.as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        request(Method::POST, &format!("{}/reactivate", uri), Some(1), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);
    assert_eq!(body["status"], "COMPLETED");
}

#[tokio::test]
async fn test_page_size_out_of_range() {
    let app = create_app().await;

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/transactions?page=0&size=500", Some(1), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_suppliers() {
    let app = create_app().await;

    let (status, body) = send(&app, request(Method::GET, "/api/suppliers", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["8753", "9773", "3398", "4689"]);
}

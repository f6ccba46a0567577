//! Client tests against an in-process API server.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use mpfm_api::{AlarmQuery, ApiClient, ApiConfig, ApiError, DeviceQuery, MemoryStorage, TokenStore};
use mpfm_model::alarm::AlarmStatus;
use mpfm_model::auth::{LoginRequest, SignupRequest};
use mpfm_model::envelope::FieldError;
use mpfm_model::hierarchy::Level;
use serde_json::{json, Value};
use std::collections::HashMap;

const TOKEN: &str = "tok-1";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Token expired"})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "token": TOKEN,
                "expiresIn": 3600,
                "user": {"id": 1, "name": "Ops", "email": body["email"]}
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid password"})),
        )
            .into_response()
    }
}

async fn signup() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "message": "Validation failed",
            "errors": [
                {"param": "email", "msg": "Email is invalid"},
                {"param": "password", "msg": "Password too short"}
            ]
        })),
    )
        .into_response()
}

async fn tree(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "message": "",
        "data": [{
            "id": 1, "name": "Acme", "level": "company",
            "children": [{
                "id": 2, "name": "East", "level": "region",
                "children": [{"id": 3, "name": "W1", "level": "well", "canAttachDevice": true}]
            }]
        }]
    }))
    .into_response()
}

fn all_devices() -> Vec<Value> {
    vec![
        json!({"id": "d1", "serialNumber": "SN-1", "location": "W1", "hierarchyId": "3"}),
        json!({"id": "d2", "serialNumber": "SN-2", "location": "W2", "hierarchyId": "4"}),
        json!({"id": "d3", "serialNumber": "SN-3", "location": "W1", "hierarchyId": "3"}),
    ]
}

fn number(query: &HashMap<String, String>, key: &str, default: usize) -> usize {
    query
        .get(key)
        .and_then(|value| value.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

async fn devices(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let matching: Vec<Value> = match query.get("hierarchyId") {
        Some(id) => all_devices()
            .into_iter()
            .filter(|d| d["hierarchyId"] == id.as_str())
            .collect(),
        None => all_devices(),
    };
    let page = number(&query, "page", 1);
    let limit = number(&query, "limit", 10);
    let total_pages = matching.len().div_ceil(limit);
    let devices: Vec<Value> = matching
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .cloned()
        .collect();
    Json(json!({
        "success": true,
        "message": "",
        "data": {
            "devices": devices,
            "statistics": {"total": matching.len(), "online": 1, "offline": 0},
            "pagination": {
                "page": page, "limit": limit, "total": matching.len(), "totalPages": total_pages
            }
        }
    }))
    .into_response()
}

/// Wells answer a bare list, other nodes a device page.
async fn node_devices(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let under: Vec<Value> = all_devices()
        .into_iter()
        .filter(|d| id != "3" || d["hierarchyId"] == "3")
        .filter(|d| id != "2" || d["location"] == "W1")
        .collect();
    let data = if id == "3" {
        json!(under)
    } else {
        json!({
            "devices": under,
            "pagination": {"page": 1, "limit": 10, "total": under.len(), "totalPages": 1}
        })
    };
    Json(json!({"success": true, "message": "", "data": data})).into_response()
}

async fn alarms(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let status = query.get("status").cloned().unwrap_or_else(|| "active".into());
    Json(json!({
        "success": true,
        "message": "",
        "data": {
            "alarms": [{
                "id": 9, "deviceId": query.get("deviceId"), "severity": "major",
                "status": status, "message": "High GVF"
            }],
            "statistics": {"total": 1, "active": 1}
        }
    }))
    .into_response()
}

async fn alarm_status(
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "message": "Alarm updated",
        "data": {"id": id, "severity": "minor", "status": body["status"], "message": "Low pressure"}
    }))
    .into_response()
}

async fn start_server() -> String {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/hierarchy/tree", get(tree))
        .route("/hierarchy/:id/devices", get(node_devices))
        .route("/devices", get(devices))
        .route("/alarms", get(alarms))
        .route("/alarms/:id/status", patch(alarm_status));
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: &str) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

fn login_request(password: &str) -> LoginRequest {
    LoginRequest {
        email: "ops@acme.test".into(),
        password: password.into(),
        remember_me: true,
    }
}

#[tokio::test]
async fn login_then_load_tree_with_bearer_token() {
    let base = start_server().await;
    let anonymous = client(&base);

    let payload = anonymous.login(&login_request("secret")).await.unwrap();
    assert_eq!(payload.token, TOKEN);
    assert_eq!(payload.expires_in, Some(3600));

    let mut store = TokenStore::new(MemoryStorage::default());
    store
        .save_login(&payload, true, chrono::Utc::now())
        .unwrap();
    let token = store.token().unwrap();

    let api = anonymous.with_token(token);
    let hierarchy = api.hierarchy().await.unwrap();
    assert_eq!(hierarchy.len(), 3);
    let well = hierarchy.find("3").unwrap();
    assert_eq!(hierarchy[well].level, Level::Well);
    assert_eq!(hierarchy.breadcrumb(well), "Acme / East / W1");
}

#[tokio::test]
async fn failed_login_message_is_translated() {
    let base = start_server().await;
    let err = client(&base).login(&login_request("wrong")).await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("password"), "{}", message);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn validation_errors_are_joined() {
    let base = start_server().await;
    let request = SignupRequest {
        name: "Ops".into(),
        email: "nope".into(),
        password: "x".into(),
        company: None,
    };
    let err = client(&base).signup(&request).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Validation(vec![
            FieldError::new("email", "Email is invalid"),
            FieldError::new("password", "Password too short"),
        ])
    );
    assert_eq!(
        err.to_string(),
        "email: Email is invalid; password: Password too short"
    );
}

#[tokio::test]
async fn rejected_token_maps_to_unauthorized() {
    let base = start_server().await;
    let api = client(&base).with_token("stale");
    let err = api.hierarchy_tree().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(err.requires_login());
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let base = start_server().await;
    let err = client(&base).devices(&DeviceQuery::default()).await.unwrap_err();
    assert_eq!(err, ApiError::NotAuthenticated);
}

#[tokio::test]
async fn scoped_queries_reach_the_server() {
    let base = start_server().await;
    let api = client(&base).with_token(TOKEN);

    let query = DeviceQuery {
        hierarchy_id: Some("3".into()),
        ..DeviceQuery::default()
    };
    let page = api.devices(&query).await.unwrap();
    assert_eq!(page.devices.len(), 2);
    assert_eq!(page.devices[0].serial_number, "SN-1");
    assert_eq!(page.statistics.total, 2);

    let alarms = api
        .alarms(&AlarmQuery {
            device_id: Some("d1".into()),
            status: Some(AlarmStatus::Acknowledged),
            ..AlarmQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(alarms.alarms[0].device_id.as_deref(), Some("d1"));
    assert_eq!(alarms.alarms[0].status, AlarmStatus::Acknowledged);
    assert_eq!(alarms.statistics.resolved, 0);
}

#[tokio::test]
async fn alarm_status_update() {
    let base = start_server().await;
    let api = client(&base).with_token(TOKEN);
    let alarm = api
        .update_alarm_status("42", AlarmStatus::Resolved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alarm.id, "42");
    assert_eq!(alarm.status, AlarmStatus::Resolved);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/api", addr))
        .login(&login_request("secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), mpfm_api::error::NETWORK_MESSAGE);
}

#[tokio::test]
async fn every_device_page_is_fetched() {
    let base = start_server().await;
    let api = client(&base).with_token(TOKEN);

    let first = api
        .devices(&DeviceQuery {
            page: mpfm_model::pagination::PageRequest { page: 1, limit: 2 },
            ..DeviceQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(first.devices.len(), 2);
    assert!(first.pagination.has_next());

    let devices = api.all_devices(None, 2).await.unwrap();
    let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);

    let scoped = api.all_devices(Some("3"), 1).await.unwrap();
    assert_eq!(scoped.len(), 2);
}

#[tokio::test]
async fn node_devices_accept_page_and_bare_shapes() {
    let base = start_server().await;
    let api = client(&base).with_token(TOKEN);

    let well = api.hierarchy_devices("3").await.unwrap();
    assert_eq!(well.len(), 2);

    let region = api.hierarchy_devices("2").await.unwrap();
    let serials: Vec<&str> = region.iter().map(|d| d.serial_number.as_str()).collect();
    assert_eq!(serials, vec!["SN-1", "SN-3"]);

    let err = client(&base).hierarchy_devices("3").await.unwrap_err();
    assert_eq!(err, ApiError::NotAuthenticated);
}

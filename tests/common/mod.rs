#![allow(dead_code)]

// In-process stand-in for the Tronity platform API

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tronity_vehicle::AdapterContext;
use tronity_vehicle::config::{ClientCredentials, TronityConfig, TronityEndpoints};

pub struct FakeTronity {
    pub token_requests: AtomicUsize,
    pub list_requests: AtomicUsize,
    pub bulk_requests: AtomicUsize,
    pub start_requests: AtomicUsize,
    pub stop_requests: AtomicUsize,
    pub unauthorized: AtomicUsize,
    pub token_bodies: Mutex<Vec<String>>,
    pub valid_token: Mutex<String>,
    pub vehicles: Mutex<Value>,
    pub bulk: Mutex<Value>,
    pub token_status: AtomicU16,
    pub bulk_status: AtomicU16,
    pub control_status: AtomicU16,
    pub bulk_delay_ms: AtomicU64,
    pub refuse_all: AtomicBool,
    pub expires_in: AtomicU64,
}

impl FakeTronity {
    pub fn new(vehicles: Value, bulk: Value) -> Arc<Self> {
        Arc::new(Self {
            token_requests: AtomicUsize::new(0),
            list_requests: AtomicUsize::new(0),
            bulk_requests: AtomicUsize::new(0),
            start_requests: AtomicUsize::new(0),
            stop_requests: AtomicUsize::new(0),
            unauthorized: AtomicUsize::new(0),
            token_bodies: Mutex::new(Vec::new()),
            valid_token: Mutex::new(String::new()),
            vehicles: Mutex::new(vehicles),
            bulk: Mutex::new(bulk),
            token_status: AtomicU16::new(200),
            bulk_status: AtomicU16::new(200),
            control_status: AtomicU16::new(200),
            bulk_delay_ms: AtomicU64::new(0),
            refuse_all: AtomicBool::new(false),
            expires_in: AtomicU64::new(3600),
        })
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn set_bulk(&self, bulk: Value) {
        *self.bulk.lock().unwrap() = bulk;
    }

    pub fn revoke_token(&self) {
        *self.valid_token.lock().unwrap() = "revoked".to_string();
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_token.lock().unwrap());
        let presented = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
        let ok = !self.refuse_all.load(Ordering::SeqCst) && presented == Some(expected.as_str());
        if !ok {
            self.unauthorized.fetch_add(1, Ordering::SeqCst);
        }
        ok
    }
}

fn status(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
}

async fn token(State(fake): State<Arc<FakeTronity>>, body: String) -> (StatusCode, Json<Value>) {
    let n = fake.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    fake.token_bodies.lock().unwrap().push(body);

    let code = status(&fake.token_status);
    if !code.is_success() {
        return (code, Json(json!({"error": "invalid_grant"})));
    }

    let access = format!("token-{}", n);
    *fake.valid_token.lock().unwrap() = access.clone();
    let expires_in = fake.expires_in.load(Ordering::SeqCst);
    (
        StatusCode::OK,
        Json(json!({"access_token": access, "token_type": "Bearer", "expires_in": expires_in})),
    )
}

async fn list(
    State(fake): State<Arc<FakeTronity>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !fake.authorized(&headers) {
        return unauthorized();
    }
    fake.list_requests.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(fake.vehicles.lock().unwrap().clone()))
}

async fn last_record(
    State(fake): State<Arc<FakeTronity>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !fake.authorized(&headers) {
        return unauthorized();
    }
    fake.bulk_requests.fetch_add(1, Ordering::SeqCst);

    let delay = fake.bulk_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let code = status(&fake.bulk_status);
    if !code.is_success() {
        return (code, Json(json!({"message": "unavailable"})));
    }
    (StatusCode::OK, Json(fake.bulk.lock().unwrap().clone()))
}

async fn start(
    State(fake): State<Arc<FakeTronity>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !fake.authorized(&headers) {
        return unauthorized();
    }
    fake.start_requests.fetch_add(1, Ordering::SeqCst);
    (status(&fake.control_status), Json(json!({})))
}

async fn stop(
    State(fake): State<Arc<FakeTronity>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !fake.authorized(&headers) {
        return unauthorized();
    }
    fake.stop_requests.fetch_add(1, Ordering::SeqCst);
    (status(&fake.control_status), Json(json!({})))
}

/// Serve the fake on an ephemeral port and return its base URL
pub async fn spawn(fake: Arc<FakeTronity>) -> String {
    let app = Router::new()
        .route("/authentication", post(token))
        .route("/tronity/vehicles", get(list))
        .route("/tronity/vehicles/{id}/last_record", get(last_record))
        .route("/tronity/vehicles/{id}/start_charging", post(start))
        .route("/tronity/vehicles/{id}/stop_charging", post(stop))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub const ALL_SCOPES: [&str; 3] = ["read_charge", "read_odometer", "write_charge_start_stop"];

pub fn vehicle(id: &str, vin: &str, scopes: &[&str]) -> Value {
    json!({"id": id, "vin": vin, "scopes": scopes})
}

pub fn vehicles(list: Vec<Value>) -> Value {
    json!({ "data": list })
}

pub fn bulk(level: f64, range: f64, odometer: f64, charging: &str, plugged: bool) -> Value {
    json!({
        "level": level,
        "range": range,
        "odometer": odometer,
        "charging": charging,
        "plugged": plugged,
    })
}

pub fn config(base: &str) -> TronityConfig {
    TronityConfig {
        credentials: ClientCredentials {
            id: "client-id".to_string(),
            secret: "client-secret".to_string(),
        },
        endpoints: TronityEndpoints {
            uri: base.to_string(),
            token_url: format!("{}/authentication", base),
        },
        cache_ms: Some(60_000),
        ..TronityConfig::default()
    }
}

pub fn ctx() -> AdapterContext {
    AdapterContext::new(Duration::from_secs(300)).with_sponsor(true)
}

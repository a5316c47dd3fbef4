//! Test Helper Utilities
//!
//! Local stand-ins for the external classifiers plus app construction over
//! an in-memory database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use persona_common::config::ClassifierEndpoints;
use persona_common::db::init_database;
use persona_svc::classifiers::HttpClassifiers;
use persona_svc::enrichment::EnrichmentOrchestrator;
use persona_svc::repository::SqlitePersonRepository;
use persona_svc::AppState;
use serde_json::{json, Value};
use sqlx::SqlitePool;

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    names: Arc<Mutex<Vec<String>>>,
}

/// Classifier stub served on an ephemeral local port
pub struct StubClassifier {
    pub url: String,
    names: Arc<Mutex<Vec<String>>>,
}

impl StubClassifier {
    /// Serve `body` as JSON with `status` for every request
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::raw(status, body.to_string()).await
    }

    /// Serve `body` verbatim with `status` for every request
    pub async fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        let names = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            body: body.into(),
            names: Arc::clone(&names),
        };

        let app = Router::new().route("/", get(respond)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });

        Self {
            url: format!("http://{}", addr),
            names,
        }
    }

    /// Names received so far, in arrival order
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.names.lock().unwrap().len()
    }
}

async fn respond(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state
        .names
        .lock()
        .unwrap()
        .push(params.get("name").cloned().unwrap_or_default());

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// URL of a local port with nothing listening on it
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn age_body(age: u32) -> Value {
    json!({"count": 3800, "name": "Dmitriy", "age": age})
}

pub fn gender_body(gender: &str) -> Value {
    json!({"count": 34891, "name": "Dmitriy", "gender": gender, "probability": 1.0})
}

pub fn nationality_body() -> Value {
    json!({
        "count": 1295,
        "name": "Dmitriy",
        "country": [
            {"country_id": "UA", "probability": 0.36},
            {"country_id": "RU", "probability": 0.16},
            {"country_id": "KZ", "probability": 0.05}
        ]
    })
}

/// The three classifiers answering for "Dmitriy" (44, male, UA)
pub struct Stubs {
    pub age: StubClassifier,
    pub gender: StubClassifier,
    pub nationality: StubClassifier,
}

impl Stubs {
    pub async fn healthy() -> Self {
        Self {
            age: StubClassifier::json(StatusCode::OK, age_body(44)).await,
            gender: StubClassifier::json(StatusCode::OK, gender_body("male")).await,
            nationality: StubClassifier::json(StatusCode::OK, nationality_body()).await,
        }
    }

    pub fn endpoints(&self) -> ClassifierEndpoints {
        ClassifierEndpoints {
            age_url: self.age.url.clone(),
            gender_url: self.gender.url.clone(),
            nationality_url: self.nationality.url.clone(),
        }
    }
}

/// Router over an in-memory database, enriching through `endpoints`
pub async fn create_test_app(endpoints: &ClassifierEndpoints) -> (Router, SqlitePool) {
    let pool = init_database("sqlite::memory:", 1)
        .await
        .expect("Failed to create in-memory database");

    let classifiers = HttpClassifiers::new(endpoints).expect("Invalid stub endpoints");
    let state = AppState::new(
        Arc::new(SqlitePersonRepository::new(pool.clone())),
        EnrichmentOrchestrator::from_http(classifiers),
    );

    (persona_svc::build_router(state), pool)
}

/// JSON request with the given method and body
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON
pub async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

//! External name classifiers
//!
//! Three independent services guess a demographic attribute from a given name:
//! - **age**: `{"count": 3800, "name": "Dmitriy", "age": 44}`
//! - **gender**: `{"count": 34891, "name": "Dmitriy", "gender": "male", "probability": 1.0}`
//! - **nationality**: `{"count": 1295, "name": "Dmitriy", "country": [{"country_id": "UA", "probability": 0.35}, ...]}`
//!
//! Each client issues exactly one GET per lookup with the given name as a
//! URL-encoded `name` query parameter. No retries and no explicit timeout.

mod age;
mod gender;
mod http;
mod nationality;

pub use age::AgeClient;
pub use gender::GenderClient;
pub use http::HttpLookup;
pub use nationality::{CountryCandidate, NationalityClient};

use persona_common::config::ClassifierEndpoints;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

const USER_AGENT: &str = concat!("persona-svc/", env!("CARGO_PKG_VERSION"));

/// Which attribute a classifier produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Age,
    Gender,
    Nationality,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Age => "age",
            ClassifierKind::Gender => "gender",
            ClassifierKind::Nationality => "nationality",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("invalid {kind} classifier endpoint '{url}': {reason}")]
    InvalidEndpoint {
        kind: ClassifierKind,
        url: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to reach {kind} classifier: {message}")]
    Transport { kind: ClassifierKind, message: String },

    #[error("failed to get {kind}: status code is {status}")]
    Status { kind: ClassifierKind, status: u16 },

    #[error("failed to decode {kind} response: {message}")]
    Decode { kind: ClassifierKind, message: String },

    #[error("{kind} classifier returned an invalid result: {value}")]
    InvalidResult { kind: ClassifierKind, value: String },

    #[error("{kind} lookup task failed: {message}")]
    TaskFailed { kind: ClassifierKind, message: String },
}

impl ClassifierError {
    /// Classifier the error belongs to (`None` for client construction failures)
    pub fn kind(&self) -> Option<ClassifierKind> {
        match self {
            ClassifierError::InvalidEndpoint { kind, .. }
            | ClassifierError::Transport { kind, .. }
            | ClassifierError::Status { kind, .. }
            | ClassifierError::Decode { kind, .. }
            | ClassifierError::InvalidResult { kind, .. }
            | ClassifierError::TaskFailed { kind, .. } => Some(*kind),
            ClassifierError::Client(_) => None,
        }
    }
}

/// A single name lookup against one external classifier
///
/// Implementations must be cheap to share: the orchestrator holds them in
/// `Arc`s and moves clones into spawned tasks.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Value produced by one successful lookup
    type Output: Send + 'static;

    fn kind(&self) -> ClassifierKind;

    /// Look up `name`. Exactly one outbound request per call.
    async fn classify(&self, name: &str) -> Result<Self::Output, ClassifierError>;
}

pub type SharedAgeClassifier = Arc<dyn Classifier<Output = u32>>;
pub type SharedGenderClassifier = Arc<dyn Classifier<Output = String>>;
pub type SharedNationalityClassifier = Arc<dyn Classifier<Output = Vec<CountryCandidate>>>;

/// Build the shared HTTP client used by all three classifier clients
pub fn build_http_client() -> Result<reqwest::Client, ClassifierError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ClassifierError::Client(e.to_string()))
}

/// HTTP-backed classifiers for the configured endpoints
pub struct HttpClassifiers {
    pub age: SharedAgeClassifier,
    pub gender: SharedGenderClassifier,
    pub nationality: SharedNationalityClassifier,
}

impl HttpClassifiers {
    /// Construct all three clients. Endpoints are validated here, not per lookup.
    pub fn new(endpoints: &ClassifierEndpoints) -> Result<Self, ClassifierError> {
        let http_client = build_http_client()?;

        Ok(Self {
            age: Arc::new(AgeClient::new(&endpoints.age_url, http_client.clone())?),
            gender: Arc::new(GenderClient::new(&endpoints.gender_url, http_client.clone())?),
            nationality: Arc::new(NationalityClient::new(
                &endpoints.nationality_url,
                http_client,
            )?),
        })
    }
}

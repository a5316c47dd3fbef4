//! Nationality classifier client

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Classifier, ClassifierError, ClassifierKind, HttpLookup};

/// One nationality guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCandidate {
    /// Country code, e.g. "UA"
    pub country_id: String,
    pub probability: f64,
}

impl CountryCandidate {
    pub fn new(country_id: impl Into<String>, probability: f64) -> Self {
        Self {
            country_id: country_id.into(),
            probability,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NationalityEnvelope {
    country: Vec<CountryCandidate>,
}

pub struct NationalityClient {
    lookup: HttpLookup,
}

impl NationalityClient {
    pub fn new(endpoint: &str, http_client: reqwest::Client) -> Result<Self, ClassifierError> {
        Ok(Self {
            lookup: HttpLookup::new(ClassifierKind::Nationality, endpoint, http_client)?,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for NationalityClient {
    type Output = Vec<CountryCandidate>;

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Nationality
    }

    /// Candidates in the order the service listed them
    async fn classify(&self, name: &str) -> Result<Vec<CountryCandidate>, ClassifierError> {
        let envelope: NationalityEnvelope = self.lookup.fetch(name).await?;

        debug!(
            name = %name,
            countries_count = envelope.country.len(),
            "Country candidates determined"
        );

        Ok(envelope.country)
    }
}

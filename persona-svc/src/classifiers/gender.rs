//! Gender classifier client
//!
//! Returns the raw label; membership in {male, female} is decided by the
//! enrichment orchestrator.

use serde::Deserialize;
use tracing::debug;

use super::{Classifier, ClassifierError, ClassifierKind, HttpLookup};

#[derive(Debug, Deserialize)]
struct GenderEnvelope {
    gender: Option<String>,
}

pub struct GenderClient {
    lookup: HttpLookup,
}

impl GenderClient {
    pub fn new(endpoint: &str, http_client: reqwest::Client) -> Result<Self, ClassifierError> {
        Ok(Self {
            lookup: HttpLookup::new(ClassifierKind::Gender, endpoint, http_client)?,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for GenderClient {
    type Output = String;

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Gender
    }

    async fn classify(&self, name: &str) -> Result<String, ClassifierError> {
        let envelope: GenderEnvelope = self.lookup.fetch(name).await?;

        let gender = envelope.gender.ok_or_else(|| ClassifierError::InvalidResult {
            kind: ClassifierKind::Gender,
            value: "null".to_string(),
        })?;

        debug!(name = %name, gender = %gender, "Gender label received");
        Ok(gender)
    }
}

//! Age classifier client

use serde::Deserialize;
use tracing::debug;

use super::{Classifier, ClassifierError, ClassifierKind, HttpLookup};

/// Age response envelope. `age` is null for names the service has no data on.
#[derive(Debug, Deserialize)]
struct AgeEnvelope {
    age: Option<u32>,
}

pub struct AgeClient {
    lookup: HttpLookup,
}

impl AgeClient {
    pub fn new(endpoint: &str, http_client: reqwest::Client) -> Result<Self, ClassifierError> {
        Ok(Self {
            lookup: HttpLookup::new(ClassifierKind::Age, endpoint, http_client)?,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for AgeClient {
    type Output = u32;

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Age
    }

    /// Reported age, verbatim
    async fn classify(&self, name: &str) -> Result<u32, ClassifierError> {
        let envelope: AgeEnvelope = self.lookup.fetch(name).await?;

        let age = envelope.age.ok_or_else(|| ClassifierError::InvalidResult {
            kind: ClassifierKind::Age,
            value: "null".to_string(),
        })?;

        debug!(name = %name, age = age, "Age successfully determined");
        Ok(age)
    }
}

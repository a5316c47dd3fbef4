//! Shared GET-and-decode plumbing for the classifier clients

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::{ClassifierError, ClassifierKind};

/// One configured classifier endpoint
#[derive(Debug, Clone)]
pub struct HttpLookup {
    kind: ClassifierKind,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpLookup {
    /// Validate `endpoint` (absolute http/https URL) and bind it to `kind`
    pub fn new(
        kind: ClassifierKind,
        endpoint: &str,
        http_client: reqwest::Client,
    ) -> Result<Self, ClassifierError> {
        let invalid = |reason: String| ClassifierError::InvalidEndpoint {
            kind,
            url: endpoint.to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        Ok(Self {
            kind,
            endpoint: url,
            http_client,
        })
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    /// Request URL for `name`: the endpoint with a URL-encoded `name` query pair appended
    pub fn url_for(&self, name: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("name", name);
        url
    }

    /// Issue one GET for `name` and decode the JSON envelope
    pub async fn fetch<T: DeserializeOwned>(&self, name: &str) -> Result<T, ClassifierError> {
        let kind = self.kind;
        let url = self.url_for(name);

        debug!(classifier = %kind, url = %url, "Querying classifier");

        let response = self.http_client.get(url.clone()).send().await.map_err(|e| {
            error!(classifier = %kind, url = %url, error = %e, "Classifier request failed");
            ClassifierError::Transport {
                kind,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        debug!(classifier = %kind, status = status.as_u16(), "Classifier response received");

        if !status.is_success() {
            error!(
                classifier = %kind,
                url = %url,
                status = status.as_u16(),
                "Classifier returned non-success status"
            );
            return Err(ClassifierError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!(classifier = %kind, url = %url, error = %e, "Failed to read classifier body");
            ClassifierError::Transport {
                kind,
                message: e.to_string(),
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            error!(
                classifier = %kind,
                body = %String::from_utf8_lossy(&body),
                error = %e,
                "Failed to decode classifier body"
            );
            ClassifierError::Decode {
                kind,
                message: e.to_string(),
            }
        })
    }
}

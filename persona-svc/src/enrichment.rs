//! Enrichment orchestrator
//!
//! Fans a given name out to the age, gender and nationality classifiers as
//! three independent tokio tasks, then fans the outcomes back in.
//!
//! # Join order
//! Outcomes are awaited in the fixed order age -> gender -> nationality and
//! every task is drained before a result is returned, even when an earlier
//! slot has already failed. The first failure in that order is reported.
//! Completion order never affects which error wins, only latency.
//!
//! Enrichment is all-or-nothing: a partial triple is never returned.

use persona_common::Gender;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::classifiers::{
    Classifier, ClassifierError, ClassifierKind, CountryCandidate, HttpClassifiers,
    SharedAgeClassifier, SharedGenderClassifier, SharedNationalityClassifier,
};

/// Attributes assembled from the three classifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub age: u32,
    pub gender: Gender,
    pub country: String,
}

/// Concurrent classifier fan-out / fan-in
#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    age: SharedAgeClassifier,
    gender: SharedGenderClassifier,
    nationality: SharedNationalityClassifier,
}

impl EnrichmentOrchestrator {
    pub fn new(
        age: SharedAgeClassifier,
        gender: SharedGenderClassifier,
        nationality: SharedNationalityClassifier,
    ) -> Self {
        Self {
            age,
            gender,
            nationality,
        }
    }

    pub fn from_http(classifiers: HttpClassifiers) -> Self {
        Self::new(classifiers.age, classifiers.gender, classifiers.nationality)
    }

    /// Classify `name` with all three classifiers
    pub async fn enrich(&self, name: &str) -> Result<Enrichment, ClassifierError> {
        debug!(name = %name, "Starting classifier lookups");

        let age_task = spawn_lookup(Arc::clone(&self.age), name);
        let gender_task = spawn_lookup(Arc::clone(&self.gender), name);
        let nationality_task = spawn_lookup(Arc::clone(&self.nationality), name);

        // Drain all three slots before deciding
        let age = join_slot(ClassifierKind::Age, age_task).await;
        let gender = join_slot(ClassifierKind::Gender, gender_task).await;
        let candidates = join_slot(ClassifierKind::Nationality, nationality_task).await;

        let age = age.map_err(|e| report(name, e))?;
        let gender = gender.and_then(parse_gender).map_err(|e| report(name, e))?;
        let country = candidates
            .and_then(|candidates| {
                select_country(&candidates)
                    .map(|c| c.country_id.clone())
                    .ok_or(ClassifierError::InvalidResult {
                        kind: ClassifierKind::Nationality,
                        value: "no country candidates".to_string(),
                    })
            })
            .map_err(|e| report(name, e))?;

        debug!(
            name = %name,
            age = age,
            gender = %gender,
            country = %country,
            "Enrichment complete"
        );

        Ok(Enrichment {
            age,
            gender,
            country,
        })
    }
}

fn spawn_lookup<T: Send + 'static>(
    classifier: Arc<dyn Classifier<Output = T>>,
    name: &str,
) -> JoinHandle<Result<T, ClassifierError>> {
    let name = name.to_string();
    tokio::spawn(async move {
        debug!(classifier = %classifier.kind(), name = %name, "Fetching");
        classifier.classify(&name).await
    })
}

/// Await one result slot. A panicked or aborted task counts as a failure of its classifier.
async fn join_slot<T>(
    kind: ClassifierKind,
    task: JoinHandle<Result<T, ClassifierError>>,
) -> Result<T, ClassifierError> {
    debug!(classifier = %kind, "Waiting for result");
    match task.await {
        Ok(result) => result,
        Err(e) => Err(ClassifierError::TaskFailed {
            kind,
            message: e.to_string(),
        }),
    }
}

fn report(name: &str, e: ClassifierError) -> ClassifierError {
    error!(
        name = %name,
        classifier = e.kind().map(|k| k.as_str()).unwrap_or("unknown"),
        error = %e,
        "Enrichment failed"
    );
    e
}

/// Gender label must be exactly `male` or `female`
fn parse_gender(label: String) -> Result<Gender, ClassifierError> {
    label
        .parse::<Gender>()
        .map_err(|_| ClassifierError::InvalidResult {
            kind: ClassifierKind::Gender,
            value: label,
        })
}

/// Highest-probability candidate; ties go to the first listed
pub fn select_country(candidates: &[CountryCandidate]) -> Option<&CountryCandidate> {
    let mut best = candidates.first()?;
    for candidate in &candidates[1..] {
        if candidate.probability > best.probability {
            best = candidate;
        }
    }
    Some(best)
}

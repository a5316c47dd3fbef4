//! Person service
//!
//! Upward library interface. Composes enrichment, the fragment builders and
//! the repository; returns structured values or classified errors and leaves
//! status-code mapping to the HTTP layer.

use persona_common::PersonRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::criteria::{FilterCriteria, NewPerson, UpdateCriteria};
use crate::enrichment::EnrichmentOrchestrator;
use crate::error::{Error, Result};
use crate::query::{build_assignments, build_predicates};
use crate::repository::PersonRepository;

pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
    enrichment: EnrichmentOrchestrator,
}

impl PersonService {
    pub fn new(repository: Arc<dyn PersonRepository>, enrichment: EnrichmentOrchestrator) -> Self {
        Self {
            repository,
            enrichment,
        }
    }

    /// Enrich and store a new person
    ///
    /// Nothing is stored unless all three classifiers succeed.
    pub async fn create(&self, person: NewPerson) -> Result<PersonRecord> {
        info!(name = %person.name, surname = %person.surname, "Creating person");

        let enrichment = self.enrichment.enrich(&person.name).await?;

        let record = PersonRecord {
            id: Uuid::new_v4(),
            name: person.name,
            surname: person.surname,
            patronymic: person.patronymic,
            age: enrichment.age,
            gender: enrichment.gender,
            country: enrichment.country,
        };

        self.repository.create(&record).await?;

        info!(person_id = %record.id, "Person created");
        Ok(record)
    }

    /// Apply a partial update; the returned record reflects the new state
    pub async fn update(&self, id: Uuid, update: UpdateCriteria) -> Result<PersonRecord> {
        let assignments = build_assignments(&update).map_err(|e| {
            warn!(person_id = %id, "Update rejected: no fields to update");
            Error::from(e)
        })?;

        debug!(person_id = %id, assignments = %assignments.join(", "), "Updating person");

        match self.repository.update(id, &assignments).await? {
            Some(record) => {
                info!(person_id = %id, "Person updated");
                Ok(record)
            }
            None => {
                warn!(person_id = %id, "Update target not found");
                Err(Error::NotFound(id))
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.repository.delete(id).await? {
            info!(person_id = %id, "Person deleted");
            Ok(())
        } else {
            warn!(person_id = %id, "Delete target not found");
            Err(Error::NotFound(id))
        }
    }

    /// Persons matching every present filter field, ordered by id
    pub async fn list(&self, filter: FilterCriteria) -> Result<Vec<PersonRecord>> {
        let predicates = build_predicates(&filter);

        debug!(
            clauses = predicates.clauses.len(),
            limit = ?filter.limit,
            offset = ?filter.offset,
            "Listing persons"
        );

        let persons = self
            .repository
            .list(&predicates, filter.limit, filter.offset)
            .await?;

        info!(count = persons.len(), "Persons listed");
        Ok(persons)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PersonRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(Error::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{Classifier, ClassifierError, ClassifierKind, CountryCandidate};
    use crate::query::SqlFragment;
    use persona_common::Gender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory repository recording how it was called
    #[derive(Default)]
    struct MockRepository {
        stored: Mutex<Vec<PersonRecord>>,
        update_calls: AtomicUsize,
        last_list: Mutex<Option<(SqlFragment, Option<u32>, Option<u32>)>>,
    }

    #[async_trait::async_trait]
    impl PersonRepository for MockRepository {
        async fn create(&self, record: &PersonRecord) -> persona_common::Result<()> {
            self.stored.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn update(
            &self,
            id: Uuid,
            _assignments: &SqlFragment,
        ) -> persona_common::Result<Option<PersonRecord>> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn delete(&self, id: Uuid) -> persona_common::Result<bool> {
            let mut stored = self.stored.lock().unwrap();
            let before = stored.len();
            stored.retain(|p| p.id != id);
            Ok(stored.len() != before)
        }

        async fn list(
            &self,
            predicates: &SqlFragment,
            limit: Option<u32>,
            offset: Option<u32>,
        ) -> persona_common::Result<Vec<PersonRecord>> {
            *self.last_list.lock().unwrap() = Some((predicates.clone(), limit, offset));
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: Uuid) -> persona_common::Result<Option<PersonRecord>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }
    }

    struct Fixed<T> {
        kind: ClassifierKind,
        result: std::result::Result<T, ClassifierError>,
    }

    #[async_trait::async_trait]
    impl<T: Clone + Send + Sync + 'static> Classifier for Fixed<T> {
        type Output = T;

        fn kind(&self) -> ClassifierKind {
            self.kind
        }

        async fn classify(&self, _name: &str) -> std::result::Result<T, ClassifierError> {
            self.result.clone()
        }
    }

    fn enrichment(gender_status: Option<u16>) -> EnrichmentOrchestrator {
        let gender = match gender_status {
            Some(status) => Err(ClassifierError::Status {
                kind: ClassifierKind::Gender,
                status,
            }),
            None => Ok("female".to_string()),
        };

        EnrichmentOrchestrator::new(
            Arc::new(Fixed {
                kind: ClassifierKind::Age,
                result: Ok(29u32),
            }),
            Arc::new(Fixed {
                kind: ClassifierKind::Gender,
                result: gender,
            }),
            Arc::new(Fixed {
                kind: ClassifierKind::Nationality,
                result: Ok(vec![
                    CountryCandidate::new("UA", 0.36),
                    CountryCandidate::new("RU", 0.16),
                ]),
            }),
        )
    }

    fn new_person() -> NewPerson {
        NewPerson {
            name: "Olga".to_string(),
            surname: "Ivanova".to_string(),
            patronymic: None,
        }
    }

    #[tokio::test]
    async fn test_create_stores_enriched_record() {
        let repository = Arc::new(MockRepository::default());
        let service = PersonService::new(repository.clone(), enrichment(None));

        let record = service.create(new_person()).await.unwrap();

        assert_eq!(record.age, 29);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.country, "UA");
        assert_eq!(repository.stored.lock().unwrap().as_slice(), &[record]);
    }

    #[tokio::test]
    async fn test_create_stores_nothing_on_classifier_failure() {
        let repository = Arc::new(MockRepository::default());
        let service = PersonService::new(repository.clone(), enrichment(Some(503)));

        let err = service.create(new_person()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Classifier(ClassifierError::Status { status: 503, .. })
        ));
        assert!(repository.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_fields_never_reaches_repository() {
        let repository = Arc::new(MockRepository::default());
        let service = PersonService::new(repository.clone(), enrichment(None));

        let err = service
            .update(Uuid::new_v4(), UpdateCriteria::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoFieldsToUpdate(_)));
        assert_eq!(repository.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_person_is_not_found() {
        let service = PersonService::new(Arc::new(MockRepository::default()), enrichment(None));
        let id = Uuid::new_v4();

        let update = UpdateCriteria {
            age: Some(3),
            ..Default::default()
        };
        assert!(matches!(service.update(id, update).await, Err(Error::NotFound(x)) if x == id));
        assert!(matches!(service.delete(id).await, Err(Error::NotFound(x)) if x == id));
        assert!(matches!(service.get_by_id(id).await, Err(Error::NotFound(x)) if x == id));
    }

    #[tokio::test]
    async fn test_list_passes_predicates_and_pagination() {
        let repository = Arc::new(MockRepository::default());
        let service = PersonService::new(repository.clone(), enrichment(None));

        let filter = FilterCriteria {
            names: Some(vec!["Ivan".to_string()]),
            low_age: Some(25),
            limit: Some(10),
            ..Default::default()
        };
        service.list(filter).await.unwrap();

        let (predicates, limit, offset) = repository.last_list.lock().unwrap().clone().unwrap();
        assert_eq!(predicates.clauses, vec!["name IN ($1)", "age >= $2"]);
        assert_eq!(predicates.next_index, 3);
        assert_eq!(limit, Some(10));
        assert_eq!(offset, None);
    }
}

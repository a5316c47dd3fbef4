//! Person CRUD endpoints
//!
//! - `POST /persons` create (enriched)
//! - `PUT /persons` partial update, target id in the body
//! - `GET /persons` list, filter as JSON body (empty body = no filter)
//! - `GET /persons/:id`
//! - `DELETE /persons/:id`

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use persona_common::PersonRecord;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::dto::{CreatePersonRequest, ListPersonsRequest, UpdatePersonRequest};
use super::request_id::RequestId;
use crate::criteria::{FilterCriteria, NewPerson};
use crate::error::{Error, Result, ValidationError};
use crate::AppState;

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Log a failed request at a level matching who caused it
fn log_failure(request_id: RequestId, operation: &str, e: &Error) {
    if e.is_user_error() {
        warn!(request_id = %request_id, error = %e, "{} rejected", operation);
    } else {
        error!(request_id = %request_id, error = %e, "{} failed", operation);
    }
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}

fn path_id(id: std::result::Result<Path<Uuid>, PathRejection>) -> Result<Uuid> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ValidationError::InvalidId(rejection.body_text()).into())
}

/// POST /persons
pub async fn create_person(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: std::result::Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PersonRecord>)> {
    let result = async {
        let person = NewPerson::try_from(json_body(payload)?)?;
        debug!(request_id = %request_id, name = %person.name, "Attempting to create person");
        state.service.create(person).await
    }
    .await;

    match result {
        Ok(record) => {
            info!(request_id = %request_id, person_id = %record.id, "Person created successfully");
            Ok((StatusCode::CREATED, Json(record)))
        }
        Err(e) => {
            log_failure(request_id, "Create person", &e);
            Err(e)
        }
    }
}

/// PUT /persons
pub async fn update_person(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: std::result::Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> Result<Json<PersonRecord>> {
    let result = async {
        let (id, update) = json_body(payload)?.into_parts()?;
        debug!(request_id = %request_id, person_id = %id, "Attempting to update person");
        state.service.update(id, update).await
    }
    .await;

    match result {
        Ok(record) => {
            info!(request_id = %request_id, person_id = %record.id, "Person updated successfully");
            Ok(Json(record))
        }
        Err(e) => {
            log_failure(request_id, "Update person", &e);
            Err(e)
        }
    }
}

/// GET /persons
///
/// The filter travels in the request body. A missing body lists everyone.
pub async fn list_persons(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<Vec<PersonRecord>>> {
    let result = async {
        let request: ListPersonsRequest = if body.iter().all(u8::is_ascii_whitespace) {
            ListPersonsRequest::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| ValidationError::MalformedBody(e.to_string()))?
        };
        let filter = FilterCriteria::try_from(request)?;
        state.service.list(filter).await
    }
    .await;

    match result {
        Ok(persons) => {
            info!(request_id = %request_id, found_count = persons.len(), "Persons retrieved successfully");
            Ok(Json(persons))
        }
        Err(e) => {
            log_failure(request_id, "List persons", &e);
            Err(e)
        }
    }
}

/// GET /persons/:id
pub async fn get_person(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<PersonRecord>> {
    let result = async { state.service.get_by_id(path_id(id)?).await }.await;

    match result {
        Ok(record) => {
            debug!(request_id = %request_id, person_id = %record.id, "Person retrieved successfully");
            Ok(Json(record))
        }
        Err(e) => {
            log_failure(request_id, "Get person", &e);
            Err(e)
        }
    }
}

/// DELETE /persons/:id
pub async fn delete_person(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteResponse>> {
    let result = async {
        let id = path_id(id)?;
        state.service.delete(id).await.map(|()| id)
    }
    .await;

    match result {
        Ok(id) => {
            info!(request_id = %request_id, person_id = %id, "Person deleted successfully");
            Ok(Json(DeleteResponse {
                message: format!("person {} deleted successfully", id),
            }))
        }
        Err(e) => {
            log_failure(request_id, "Delete person", &e);
            Err(e)
        }
    }
}

/// Build person routes
pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/persons",
            get(list_persons).post(create_person).put(update_person),
        )
        .route("/persons/:id", get(get_person).delete(delete_person))
}

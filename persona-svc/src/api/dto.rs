//! Request bodies and their conversion into criteria
//!
//! Numeric fields arrive as signed integers and gender as free text so that
//! negative bounds and unknown gender literals surface as validation errors
//! instead of opaque decode failures.

use persona_common::Gender;
use serde::Deserialize;
use uuid::Uuid;

use crate::criteria::{FilterCriteria, NewPerson, UpdateCriteria};
use crate::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPersonsRequest {
    pub ids: Option<Vec<Uuid>>,
    pub names: Option<Vec<String>>,
    pub surnames: Option<Vec<String>>,
    pub patronymics: Option<Vec<String>>,
    pub low_age: Option<i64>,
    pub high_age: Option<i64>,
    pub gender: Option<String>,
    pub countries: Option<Vec<String>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Partial update; `id` selects the person, every other field is optional
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePersonRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub country: Option<String>,
}

fn non_negative(field: &'static str, value: Option<i64>) -> Result<Option<u32>, ValidationError> {
    value
        .map(|v| {
            if v < 0 {
                return Err(ValidationError::NegativeValue { field, value: v });
            }
            u32::try_from(v).map_err(|_| ValidationError::OutOfRange { field, value: v })
        })
        .transpose()
}

fn gender(value: Option<String>) -> Result<Option<Gender>, ValidationError> {
    value
        .map(|g| g.parse::<Gender>().map_err(|e| ValidationError::InvalidGender(e.0)))
        .transpose()
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value)
}

fn present_not_empty(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    value.map(|v| required(field, v)).transpose()
}

impl TryFrom<CreatePersonRequest> for NewPerson {
    type Error = ValidationError;

    fn try_from(request: CreatePersonRequest) -> Result<Self, Self::Error> {
        Ok(NewPerson {
            name: required("name", request.name)?,
            surname: required("surname", request.surname)?,
            patronymic: request.patronymic,
        })
    }
}

impl TryFrom<ListPersonsRequest> for FilterCriteria {
    type Error = ValidationError;

    fn try_from(request: ListPersonsRequest) -> Result<Self, Self::Error> {
        Ok(FilterCriteria {
            ids: request.ids,
            names: request.names,
            surnames: request.surnames,
            patronymics: request.patronymics,
            low_age: non_negative("low_age", request.low_age)?,
            high_age: non_negative("high_age", request.high_age)?,
            gender: gender(request.gender)?,
            countries: request.countries,
            limit: non_negative("limit", request.limit)?,
            offset: non_negative("offset", request.offset)?,
        })
    }
}

impl UpdatePersonRequest {
    /// Split into the target identity and the validated update
    pub fn into_parts(self) -> Result<(Uuid, UpdateCriteria), ValidationError> {
        let update = UpdateCriteria {
            name: present_not_empty("name", self.name)?,
            surname: present_not_empty("surname", self.surname)?,
            patronymic: self.patronymic,
            age: non_negative("age", self.age)?,
            gender: gender(self.gender)?,
            country: present_not_empty("country", self.country)?,
        };
        Ok((self.id, update))
    }
}

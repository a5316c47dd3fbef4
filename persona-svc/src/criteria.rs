//! Sparse filter and update inputs
//!
//! Every field is independently optional; `None` means "no constraint" (for
//! filters) or "leave unchanged" (for updates). For set-valued filters an
//! explicit empty `Vec` is a present constraint matching nothing.

use persona_common::Gender;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub ids: Option<Vec<Uuid>>,
    pub names: Option<Vec<String>>,
    pub surnames: Option<Vec<String>>,
    pub patronymics: Option<Vec<String>>,
    pub low_age: Option<u32>,
    pub high_age: Option<u32>,
    pub gender: Option<Gender>,
    pub countries: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCriteria {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub country: Option<String>,
}

/// Create input; the remaining attributes come from enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
}

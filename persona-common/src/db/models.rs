//! Person domain model shared by the service and its store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categorical gender, closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Textual form used on the wire and in the `persons.gender` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a literal is not exactly `male` or `female`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGender(pub String);

impl fmt::Display for InvalidGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gender must be either 'male' or 'female', got '{}'", self.0)
    }
}

impl std::error::Error for InvalidGender {}

impl FromStr for Gender {
    type Err = InvalidGender;

    /// Exact, case-sensitive match. No trimming or coercion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(InvalidGender(other.to_string())),
        }
    }
}

/// Stored person
///
/// `id` is assigned once at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: Uuid,
    /// Given name (also the classifier lookup key)
    pub name: String,
    /// Family name
    pub surname: String,
    /// Middle name
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: Gender,
    /// Country code, e.g. "UA"
    pub country: String,
}

//! # Persona Common Library
//!
//! Shared code for the persona service crates:
//! - Person domain model (record and gender)
//! - Configuration resolution (CLI/ENV overrides, TOML file, defaults)
//! - Database pool construction and schema initialization
//! - Common error and result types

pub mod config;
pub mod db;
pub mod error;

pub use db::models::{Gender, PersonRecord};
pub use error::{Error, Result};

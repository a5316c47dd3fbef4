//! HTTP API handlers for persona-svc

pub mod dto;
pub mod health;
pub mod persons;
pub mod request_id;

pub use health::health_routes;
pub use persons::person_routes;
pub use request_id::{assign_request_id, RequestId, REQUEST_ID_HEADER};

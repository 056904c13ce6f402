//! HTTP handlers for the GenAI relay.

pub mod generate;
pub mod health;
pub mod upload;

pub use generate::{generate_from_document, generate_image, generate_text};
pub use health::{health_check, metrics_endpoint, readiness_check};

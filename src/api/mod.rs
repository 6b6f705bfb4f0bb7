//! HTTP access to the PropCRM backend REST API.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiMessage, CreatedProperty};
pub use error::ApiError;

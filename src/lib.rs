//! PropCRM client library.
//!
//! This crate is the client side of the PropCRM real-estate platform. It
//! owns the authenticated-session lifecycle (token persistence, expiry
//! checks, Google/Microsoft login exchanges, role predicates), a typed
//! client for the backend REST API, route-guard decisions for the UI
//! layer, and the engagement-tracking beacon.
//!
//! The UI layer itself (pages, layout) lives elsewhere; everything here is
//! host-agnostic and exercised through plain async calls.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod tracker;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, SessionManager, SessionView, TokenStore};
pub use config::{Config, RouteTargets};
pub use guard::GuardDecision;
pub use models::{Role, User};

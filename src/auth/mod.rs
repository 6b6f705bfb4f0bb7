//! Authentication: session lifecycle, token persistence, and provider seams.
//!
//! - `SessionManager`: single source of truth for "who is logged in"
//! - `TokenStore`: the one persisted bearer token
//! - `claims`: local JWT expiry inspection (no network, no verification)
//! - `provider`: narrow adapter over interactive identity SDKs

pub mod claims;
pub mod provider;
pub mod session;
pub mod store;

pub use claims::Claims;
pub use provider::{IdentityProvider, ProviderError, ProviderTokens};
pub use session::{AuthApi, AuthError, Loading, LoginProvider, SessionManager, SessionView};
pub use store::TokenStore;

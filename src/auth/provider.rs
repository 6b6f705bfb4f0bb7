//! Adapter seam over the interactive identity provider SDKs.
//!
//! The actual popup/redirect dance (including silent-refresh falling back
//! to interactive acquisition) belongs to the provider SDK on the host
//! side. The session manager only ever sees the resulting tokens through
//! this trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Microsoft identity platform common-tenant authority
const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com/common";

/// Scopes requested for the Microsoft Graph access token
const MICROSOFT_SCOPES: &[&str] = &["User.Read", "email", "profile", "openid"];

/// Tokens handed back by an interactive provider flow.
#[derive(Debug, Clone)]
pub struct ProviderTokens {
    pub access_token: String,
    pub id_token: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("login popup was blocked")]
    PopupBlocked,

    #[error("login was cancelled")]
    Cancelled,

    #[error("provider error: {0}")]
    Failed(String),
}

/// Narrow interface the session manager uses to obtain provider tokens.
///
/// Implementations wrap the vendor SDK (MSAL and friends); tests use a
/// canned implementation.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn acquire_tokens(&self) -> Result<ProviderTokens, ProviderError>;
}

/// Static configuration for the Microsoft identity SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrosoftAuthConfig {
    pub client_id: String,
    pub authority: String,
    /// `None` means "current origin"
    pub redirect_uri: Option<String>,
    pub scopes: Vec<String>,
}

impl MicrosoftAuthConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authority: MICROSOFT_AUTHORITY.to_string(),
            redirect_uri: None,
            scopes: MICROSOFT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Static configuration for the Google identity SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuthConfig {
    pub client_id: String,
}

impl GoogleAuthConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }
}

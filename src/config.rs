//! Application configuration management.
//!
//! Configuration comes from the environment at build/deploy time: the API
//! base URL (or the hostname it is derived from), OAuth client identifiers
//! for both identity providers, and the directory used for token storage.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for storage directory paths
const APP_NAME: &str = "propcrm";

/// Backend URL used when running against a local API
const LOCAL_API_URL: &str = "http://localhost:8000";

/// Redirect targets used by the route guards.
///
/// These are configuration data rather than hardcoded literals so a
/// deployment can remap them without touching guard logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTargets {
    pub login: String,
    pub dashboard: String,
    pub properties: String,
}

impl Default for RouteTargets {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            dashboard: "/dashboard".to_string(),
            properties: "/properties".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: String,
    pub google_client_id: Option<String>,
    pub microsoft_client_id: Option<String>,
    /// OAuth redirect URI; `None` means "current origin"
    pub redirect_uri: Option<String>,
    pub routes: RouteTargets,
    /// Override for the token storage directory (tests, sandboxes)
    pub storage_dir: Option<PathBuf>,
}

impl Config {
    /// Build a config from the process environment.
    ///
    /// Reads `CRM_API_URL`, `CRM_HOSTNAME`, `CRM_GOOGLE_CLIENT_ID`,
    /// `CRM_MICROSOFT_CLIENT_ID` and `CRM_REDIRECT_URI`. A `.env` file is
    /// loaded first if present.
    pub fn from_env() -> Self {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = std::env::var("CRM_API_URL").unwrap_or_else(|_| {
            let hostname =
                std::env::var("CRM_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
            resolve_base_url(&hostname)
        });

        Self {
            api_base_url,
            google_client_id: std::env::var("CRM_GOOGLE_CLIENT_ID").ok(),
            microsoft_client_id: std::env::var("CRM_MICROSOFT_CLIENT_ID").ok(),
            redirect_uri: std::env::var("CRM_REDIRECT_URI").ok(),
            routes: RouteTargets::default(),
            storage_dir: None,
        }
    }

    /// Directory holding the persisted bearer token.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

/// Resolve the API base URL from the deployment hostname.
///
/// Local hostnames talk to a local backend; deployed hosts follow the
/// `web.<domain>` / `api.<domain>` naming convention.
pub fn resolve_base_url(hostname: &str) -> String {
    if hostname.contains("localhost") {
        LOCAL_API_URL.to_string()
    } else if let Some(rest) = hostname.strip_prefix("web.") {
        format!("https://api.{}", rest)
    } else {
        format!("https://{}", hostname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url_localhost() {
        assert_eq!(resolve_base_url("localhost"), "http://localhost:8000");
        assert_eq!(resolve_base_url("app.localhost"), "http://localhost:8000");
    }

    #[test]
    fn test_resolve_base_url_web_prefix() {
        assert_eq!(
            resolve_base_url("web.propcrm.example.com"),
            "https://api.propcrm.example.com"
        );
    }

    #[test]
    fn test_resolve_base_url_plain_host() {
        assert_eq!(
            resolve_base_url("propcrm.example.com"),
            "https://propcrm.example.com"
        );
    }

    #[test]
    fn test_default_route_targets() {
        let routes = RouteTargets::default();
        assert_eq!(routes.login, "/login");
        assert_eq!(routes.dashboard, "/dashboard");
        assert_eq!(routes.properties, "/properties");
    }
}

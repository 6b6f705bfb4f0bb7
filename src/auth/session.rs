//! The session manager: single source of truth for "who is logged in".
//!
//! One `SessionManager` exists per process. It is constructed at
//! application start, bootstraps once from the persisted token, and is
//! handed (by cheap clone, shared state) to every consumer that needs
//! session state or a login/logout entry point. Nothing else mutates
//! authentication state.

use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::models::{LoginResponse, User};

use super::claims::Claims;
use super::provider::{IdentityProvider, ProviderError};
use super::store::TokenStore;

/// Bootstrap progress. Transitions `Pending -> Ready` exactly once per
/// process, on every bootstrap outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    Pending,
    Ready,
}

/// Identity provider a login exchange went through, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProvider {
    Google,
    Microsoft,
}

impl fmt::Display for LoginProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginProvider::Google => write!(f, "Google"),
            LoginProvider::Microsoft => write!(f, "Microsoft"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend rejected the credential; carries its `detail` message.
    #[error("{provider} login failed: {detail}")]
    Rejected {
        provider: LoginProvider,
        detail: String,
    },

    #[error("{provider} login failed: {source}")]
    Network {
        provider: LoginProvider,
        #[source]
        source: ApiError,
    },

    /// The interactive provider flow itself failed (popup blocked, user
    /// cancelled) before any backend exchange happened.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Logout happened while the exchange was in flight; the result was
    /// dropped rather than resurrecting the session.
    #[error("login discarded: logged out while the exchange was in flight")]
    Superseded,
}

impl AuthError {
    fn exchange(provider: LoginProvider, source: ApiError) -> Self {
        match source {
            ApiError::NetworkError(_) => AuthError::Network { provider, source },
            other => AuthError::Rejected {
                provider,
                detail: other.detail(),
            },
        }
    }
}

/// Snapshot of session state consumed by route guards and views.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub loading: Loading,
    pub user: Option<User>,
}

impl SessionView {
    pub fn is_ready(&self) -> bool {
        self.loading == Loading::Ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True only for a present user with the admin role. Safe to call in
    /// any state.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.role.is_admin()).unwrap_or(false)
    }

    /// True only for a present user with the agent role. Safe to call in
    /// any state.
    pub fn is_agent(&self) -> bool {
        self.user.as_ref().map(|u| u.role.is_agent()).unwrap_or(false)
    }
}

/// The slice of the backend API the session manager depends on.
///
/// `ApiClient` is the production implementation; tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn fetch_me(&self, token: &str) -> Result<User, ApiError>;
    async fn exchange_google(&self, id_token: &str) -> Result<LoginResponse, ApiError>;
    async fn exchange_microsoft(
        &self,
        access_token: &str,
        id_token: &str,
    ) -> Result<LoginResponse, ApiError>;
}

impl AuthApi for ApiClient {
    async fn fetch_me(&self, token: &str) -> Result<User, ApiError> {
        self.me(token).await
    }

    async fn exchange_google(&self, id_token: &str) -> Result<LoginResponse, ApiError> {
        self.login_google(id_token).await
    }

    async fn exchange_microsoft(
        &self,
        access_token: &str,
        id_token: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.login_microsoft(access_token, id_token).await
    }
}

#[derive(Debug)]
struct State {
    token: Option<String>,
    user: Option<User>,
    loading: Loading,
    bootstrapped: bool,
    /// Bumped on every logout. An exchange captures the value at entry and
    /// drops its result if the value moved, so a response resolving after
    /// logout cannot resurrect the session.
    generation: u64,
}

#[derive(Clone)]
pub struct SessionManager<A = ApiClient> {
    api: A,
    store: TokenStore,
    state: Arc<Mutex<State>>,
}

impl SessionManager<ApiClient> {
    /// Build the production session manager from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url.clone())
            .context("Failed to build API client")?;
        let store = TokenStore::new(config.storage_dir()?);
        Ok(Self::new(api, store))
    }
}

impl<A: AuthApi> SessionManager<A> {
    pub fn new(api: A, store: TokenStore) -> Self {
        Self {
            api,
            store,
            state: Arc::new(Mutex::new(State {
                token: None,
                user: None,
                loading: Loading::Pending,
                bootstrapped: false,
                generation: 0,
            })),
        }
    }

    /// Resolve the persisted session, once per process.
    ///
    /// Order of checks: storage read, local expiry claim (no network),
    /// then profile fetch. Every path ends with the session marked ready;
    /// any rejection of the persisted token lands in the logged-out state
    /// without surfacing an error (an expired session is expected, not
    /// exceptional).
    pub async fn bootstrap(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.bootstrapped {
                return;
            }
            state.bootstrapped = true;
        }

        let saved = match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        let Some(token) = saved else {
            self.mark_ready();
            return;
        };

        let expired = match Claims::decode_unverified(&token) {
            Ok(claims) => claims.is_expired(),
            Err(e) => {
                debug!(error = %e, "Persisted token is not a decodable JWT");
                true
            }
        };
        if expired {
            debug!("Persisted token expired; starting logged out");
            self.discard_persisted_token();
            self.mark_ready();
            return;
        }

        let generation = {
            let mut state = self.state.lock().unwrap();
            state.token = Some(token.clone());
            state.generation
        };

        match self.api.fetch_me(&token).await {
            Ok(user) => {
                let mut state = self.state.lock().unwrap();
                if state.generation == generation {
                    info!(email = %user.email, "Session restored");
                    state.user = Some(user);
                }
            }
            Err(e) => {
                debug!(error = %e, "Persisted token rejected by backend");
                let current = {
                    let mut state = self.state.lock().unwrap();
                    let current = state.generation == generation;
                    if current {
                        state.token = None;
                        state.user = None;
                    }
                    current
                };
                // A logout during the fetch may have been followed by a new
                // login; only the generation that wrote the token clears it
                if current {
                    self.discard_persisted_token();
                }
            }
        }

        self.mark_ready();
    }

    /// Exchange a Google identity credential for a session.
    pub async fn login_google(&self, credential: &str) -> Result<(), AuthError> {
        let generation = self.generation();
        let response = self
            .api
            .exchange_google(credential)
            .await
            .map_err(|e| AuthError::exchange(LoginProvider::Google, e))?;
        self.apply_login(LoginProvider::Google, generation, response)
    }

    /// Exchange Microsoft access and ID tokens for a session.
    pub async fn login_microsoft(
        &self,
        access_token: &str,
        id_token: &str,
    ) -> Result<(), AuthError> {
        let generation = self.generation();
        let response = self
            .api
            .exchange_microsoft(access_token, id_token)
            .await
            .map_err(|e| AuthError::exchange(LoginProvider::Microsoft, e))?;
        self.apply_login(LoginProvider::Microsoft, generation, response)
    }

    /// Run the interactive Microsoft flow through the provider adapter,
    /// then exchange the resulting tokens.
    pub async fn login_microsoft_interactive<P: IdentityProvider>(
        &self,
        provider: &P,
    ) -> Result<(), AuthError> {
        let tokens = provider.acquire_tokens().await?;
        self.login_microsoft(&tokens.access_token, &tokens.id_token)
            .await
    }

    /// Clear persisted and in-memory session state. Always succeeds
    /// locally; no network call is made.
    pub fn logout(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.token = None;
            state.user = None;
        }
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        info!("Logged out");
    }

    pub fn view(&self) -> SessionView {
        let state = self.state.lock().unwrap();
        SessionView {
            loading: state.loading,
            user: state.user.clone(),
        }
    }

    /// Current bearer token for API calls, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.view().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.view().is_admin()
    }

    pub fn is_agent(&self) -> bool {
        self.view().is_agent()
    }

    fn apply_login(
        &self,
        provider: LoginProvider,
        generation: u64,
        response: LoginResponse,
    ) -> Result<(), AuthError> {
        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            info!(%provider, "Discarding login response that resolved after logout");
            return Err(AuthError::Superseded);
        }

        if let Err(e) = self.store.save(&response.access_token) {
            // The in-memory session is still usable for this process
            warn!(error = %e, "Failed to persist session token");
        }
        state.token = Some(response.access_token);
        state.user = Some(response.user);
        info!(%provider, "Login succeeded");
        Ok(())
    }

    fn mark_ready(&self) {
        self.state.lock().unwrap().loading = Loading::Ready;
    }

    fn discard_persisted_token(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
    }

    fn generation(&self) -> u64 {
        self.state.lock().unwrap().generation
    }
}

//! API client for the PropCRM backend.
//!
//! One thin, typed method per REST endpoint the UI consumes. Endpoints that
//! return loose shapes (bare arrays vs. wrapper objects) are parsed
//! tolerantly, trying the direct form first.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AdminStats, AgentStats, BulkDeleteResponse, EnquiryCreate, EnquiryReceipt, Lead, LeadStats,
    LoginResponse, MessageRequest, Property, PropertyCreate, PropertyUpdate, Role,
    SendMessageResponse, User,
};
use crate::tracker::Interaction;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Plain acknowledgement body used by most mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Acknowledgement for property creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProperty {
    pub message: String,
    #[serde(default)]
    pub property_id: Option<i64>,
}

/// API client for the PropCRM backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token; subsequent requests go out unauthenticated
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with the body's
    /// `detail` message if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} (from {})", e, url)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.authed(self.client.get(&url)).send().await?;
        Self::parse_json(response, &url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.authed(self.client.post(&url)).json(body).send().await?;
        Self::parse_json(response, &url).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.authed(self.client.put(&url)).json(body).send().await?;
        Self::parse_json(response, &url).await
    }

    // ===== Authentication =====

    /// Identity introspection: who does the backend say this token belongs to.
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        let url = self.url("/auth/me");
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        Self::parse_json(response, &url).await
    }

    /// Exchange a Google identity credential for a backend session token.
    pub async fn login_google(&self, id_token: &str) -> Result<LoginResponse, ApiError> {
        self.post("/auth/google", &serde_json::json!({ "id_token": id_token }))
            .await
    }

    /// Exchange Microsoft access and ID tokens for a backend session token.
    pub async fn login_microsoft(
        &self,
        access_token: &str,
        id_token: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.post(
            "/auth/microsoft",
            &serde_json::json!({
                "access_token": access_token,
                "id_token": id_token,
            }),
        )
        .await
    }

    // ===== Public listings =====

    pub async fn list_properties(&self) -> Result<Vec<Property>, ApiError> {
        self.get_list("/properties", "properties").await
    }

    pub async fn property_detail(&self, property_id: i64) -> Result<Property, ApiError> {
        self.get(&format!("/properties/{}", property_id)).await
    }

    pub async fn submit_enquiry(&self, enquiry: &EnquiryCreate) -> Result<EnquiryReceipt, ApiError> {
        self.post("/enquiry", enquiry).await
    }

    // ===== Leads (CRM view) =====

    pub async fn list_leads(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_list("/leads", "leads").await
    }

    pub async fn lead_detail(&self, lead_id: i64) -> Result<Lead, ApiError> {
        self.get(&format!("/leads/{}", lead_id)).await
    }

    pub async fn update_lead_status(
        &self,
        lead_id: i64,
        status: &str,
    ) -> Result<ApiMessage, ApiError> {
        self.put(
            &format!("/leads/{}/status", lead_id),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    pub async fn lead_stats(&self) -> Result<LeadStats, ApiError> {
        self.get("/leads/stats/summary").await
    }

    pub async fn bulk_delete_leads(&self, lead_ids: &[i64]) -> Result<BulkDeleteResponse, ApiError> {
        let url = self.url("/leads/bulk-delete");
        let response = self
            .authed(self.client.delete(&url))
            .json(&serde_json::json!({ "lead_ids": lead_ids }))
            .send()
            .await?;
        Self::parse_json(response, &url).await
    }

    pub async fn send_lead_message(
        &self,
        request: &MessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        self.post("/leads/send-message", request).await
    }

    // ===== Interaction tracking =====

    /// Post one engagement beacon. The response body is ignored.
    pub async fn track_interaction(&self, interaction: &Interaction) -> Result<(), ApiError> {
        let url = self.url("/track-interaction");
        let response = self
            .authed(self.client.post(&url))
            .json(interaction)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Agent dashboard =====

    pub async fn agent_stats(&self) -> Result<AgentStats, ApiError> {
        self.get("/agent/stats").await
    }

    pub async fn agent_properties(&self) -> Result<Vec<Property>, ApiError> {
        self.get_list("/agent/properties", "properties").await
    }

    pub async fn agent_leads(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_list("/agent/leads", "leads").await
    }

    // ===== Admin dashboard =====

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get("/admin/stats").await
    }

    pub async fn admin_properties(&self) -> Result<Vec<Property>, ApiError> {
        self.get_list("/admin/properties", "properties").await
    }

    pub async fn admin_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_list("/admin/users", "users").await
    }

    pub async fn create_property(
        &self,
        property: &PropertyCreate,
    ) -> Result<CreatedProperty, ApiError> {
        self.post("/admin/properties", property).await
    }

    pub async fn update_property(
        &self,
        property_id: i64,
        update: &PropertyUpdate,
    ) -> Result<ApiMessage, ApiError> {
        self.put(&format!("/admin/properties/{}", property_id), update)
            .await
    }

    pub async fn assign_property(
        &self,
        property_id: i64,
        agent_id: i64,
    ) -> Result<ApiMessage, ApiError> {
        self.post(
            &format!("/admin/properties/{}/assign", property_id),
            &serde_json::json!({ "agent_id": agent_id }),
        )
        .await
    }

    pub async fn update_user_role(&self, user_id: i64, role: Role) -> Result<ApiMessage, ApiError> {
        self.put(
            &format!("/admin/users/{}/role", user_id),
            &serde_json::json!({ "role": role }),
        )
        .await
    }

    /// GET a list endpoint, accepting either a bare array or a wrapper
    /// object keyed by `wrapper_key`.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        wrapper_key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.url(path);
        let response = self.authed(self.client.get(&url)).send().await?;
        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        if let Ok(items) = serde_json::from_str::<Vec<T>>(&text) {
            return Ok(items);
        }

        // Fall back to a wrapper object
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} (from {})", e, url)))?;
        if let Some(inner) = value.get(wrapper_key) {
            debug!(url = %url, key = wrapper_key, "List response was wrapped");
            return serde_json::from_value(inner.clone())
                .map_err(|e| ApiError::InvalidResponse(format!("{} (from {})", e, url)));
        }

        Err(ApiError::InvalidResponse(format!(
            "Expected an array or a `{}` wrapper from {}",
            wrapper_key, url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.url("/auth/me"), "http://localhost:8000/auth/me");
    }

    #[test]
    fn test_with_token_keeps_base_url() {
        let client = ApiClient::new("https://api.propcrm.example.com").unwrap();
        let authed = client.with_token("tok".to_string());
        assert_eq!(authed.base_url(), "https://api.propcrm.example.com");
        assert_eq!(authed.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_parse_wrapped_property_list() {
        let text = r#"{"properties": [{"property_id": 1, "label": "Unit A"}], "total_count": 1}"#;
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        let inner = value.get("properties").unwrap();
        let items: Vec<Property> = serde_json::from_value(inner.clone()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Unit A");
    }
}

//! CRM lead rows, stats summaries, and bulk operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row in the CRM lead table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub lead_id: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lead_score: Option<f64>,
    #[serde(default)]
    pub property_interested: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lead_comments: Option<String>,
}

/// `/leads/stats/summary` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadStats {
    pub total_leads: i64,
    #[serde(default)]
    pub status_breakdown: HashMap<String, i64>,
    #[serde(default)]
    pub average_lead_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted_count: i64,
    #[serde(default)]
    pub deleted_ids: Vec<i64>,
}

/// Outbound message to one or more leads (email or SMS).
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub recipients: Vec<i64>,
    /// "email" or "sms"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub message: String,
    pub sent_count: i64,
    pub failed_count: i64,
}

/// Admin dashboard counters (wire names are camelCase).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminStats {
    #[serde(rename = "totalProperties")]
    pub total_properties: i64,
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "totalLeads")]
    pub total_leads: i64,
    #[serde(rename = "pendingProperties")]
    pub pending_properties: i64,
}

/// Agent dashboard counters (wire names are camelCase).
#[derive(Debug, Clone, Deserialize)]
pub struct AgentStats {
    #[serde(rename = "totalProperties")]
    pub total_properties: i64,
    #[serde(rename = "totalLeads")]
    pub total_leads: i64,
    #[serde(rename = "pendingLeads")]
    pub pending_leads: i64,
    #[serde(rename = "conversionRate")]
    pub conversion_rate: f64,
}

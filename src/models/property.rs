//! Property listings and the public enquiry flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub property_id: i64,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub beds: Option<i32>,
    #[serde(default)]
    pub baths: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_agent_id: Option<i64>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyCreate {
    pub label: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub area: Option<String>,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub price: Option<f64>,
    pub property_type: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PropertyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Lead-capture form submitted from a property page.
#[derive(Debug, Clone, Serialize)]
pub struct EnquiryCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub property_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryReceipt {
    pub message: String,
    #[serde(default)]
    pub lead_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property_with_agent_join() {
        let json = r#"{
            "property_id": 12,
            "label": "2BR apartment, Elm St",
            "description": null,
            "address": "14 Elm St",
            "area": "Downtown",
            "beds": 2,
            "baths": 1,
            "price": 425000.0,
            "property_type": "apartment",
            "status": "active",
            "assigned_agent_id": 3,
            "agent_name": "Sam Ortiz",
            "created_by": 1,
            "created_at": "2024-03-01T09:30:00Z",
            "updated_at": null,
            "image_url": null
        }"#;
        let p: Property = serde_json::from_str(json).expect("parse property");
        assert_eq!(p.property_id, 12);
        assert_eq!(p.agent_name.as_deref(), Some("Sam Ortiz"));
    }

    #[test]
    fn test_property_update_skips_unset_fields() {
        let update = PropertyUpdate {
            status: Some("sold".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"status":"sold"}"#);
    }
}

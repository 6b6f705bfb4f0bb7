//! Engagement tracking beacons.
//!
//! Interactions (page views, property views, contact clicks) are posted to
//! the backend for lead scoring. Beacons are strictly fire-and-forget:
//! failures are logged and swallowed, and no caller ever blocks on or
//! errors from tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ApiClient;

/// Length of the random suffix in a tracker session id
const SESSION_ID_SUFFIX_LEN: usize = 9;

/// Interaction kinds the backend scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAction {
    PageView,
    PropertyView,
    PropertyDetailView,
    ContactClick,
    EnquiryFormOpen,
    EnquirySubmitted,
    PhoneClick,
    EmailClick,
}

/// One beacon payload. Wire field names match what the backend ingests.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub action: TrackAction,
    pub timestamp: DateTime<Utc>,
    pub page: String,
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_label: Option<String>,
}

impl Interaction {
    fn new(session_id: &str, action: TrackAction, page: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            action,
            timestamp: Utc::now(),
            page: page.to_string(),
            user_agent: None,
            referrer: None,
            element: None,
            phone: None,
            email: None,
            property_id: None,
            property_label: None,
        }
    }
}

/// Per-session interaction counts.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_interactions: usize,
    pub actions: HashMap<TrackAction, usize>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Fire-and-forget interaction tracker, one per page session.
#[derive(Clone)]
pub struct InteractionTracker {
    api: ApiClient,
    session_id: String,
    log: Arc<Mutex<Vec<Interaction>>>,
}

impl InteractionTracker {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session_id: generate_session_id(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Record and post one interaction. Never fails from the caller's
    /// point of view.
    pub async fn track(&self, action: TrackAction, page: &str) {
        self.track_with(Interaction::new(&self.session_id, action, page))
            .await;
    }

    /// Record a page view with its referrer.
    pub async fn track_page_view(&self, page: &str, referrer: Option<&str>) {
        let mut interaction = Interaction::new(&self.session_id, TrackAction::PageView, page);
        interaction.referrer = referrer.map(str::to_string);
        self.track_with(interaction).await;
    }

    /// Record a property interaction carrying the property context.
    pub async fn track_property(
        &self,
        action: TrackAction,
        page: &str,
        property_id: i64,
        property_label: Option<&str>,
    ) {
        let mut interaction = Interaction::new(&self.session_id, action, page);
        interaction.property_id = Some(property_id);
        interaction.property_label = property_label.map(str::to_string);
        self.track_with(interaction).await;
    }

    pub async fn track_with(&self, interaction: Interaction) {
        self.log.lock().unwrap().push(interaction.clone());

        match self.api.track_interaction(&interaction).await {
            Ok(()) => debug!(action = ?interaction.action, "Interaction tracked"),
            Err(e) => warn!(error = %e, action = ?interaction.action, "Failed to track interaction"),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let log = self.log.lock().unwrap();
        let mut actions: HashMap<TrackAction, usize> = HashMap::new();
        for interaction in log.iter() {
            *actions.entry(interaction.action).or_insert(0) += 1;
        }
        SessionSummary {
            session_id: self.session_id.clone(),
            total_interactions: log.len(),
            actions,
            start_time: log.first().map(|i| i.timestamp),
            end_time: log.last().map(|i| i.timestamp),
        }
    }
}

/// Build a session id of the form `session_<millis>_<alnum suffix>`.
fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SESSION_ID_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..36u32);
            char::from_digit(idx, 36).unwrap_or('0')
        })
        .collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), SESSION_ID_SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_interaction_wire_shape() {
        let mut interaction =
            Interaction::new("session_1_abc", TrackAction::PropertyView, "/properties");
        interaction.property_id = Some(4);

        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["sessionId"], "session_1_abc");
        assert_eq!(json["action"], "property_view");
        assert_eq!(json["page"], "/properties");
        assert_eq!(json["property_id"], 4);
        // Unset optionals stay off the wire
        assert!(json.get("phone").is_none());
        assert!(json.get("userAgent").is_none());
    }

    #[test]
    fn test_summary_counts_actions() {
        let api = ApiClient::new("http://localhost:8000").unwrap();
        let tracker = InteractionTracker::new(api);
        {
            let mut log = tracker.log.lock().unwrap();
            log.push(Interaction::new(tracker.session_id(), TrackAction::PageView, "/"));
            log.push(Interaction::new(
                tracker.session_id(),
                TrackAction::PageView,
                "/properties",
            ));
            log.push(Interaction::new(
                tracker.session_id(),
                TrackAction::ContactClick,
                "/property/3",
            ));
        }

        let summary = tracker.summary();
        assert_eq!(summary.total_interactions, 3);
        assert_eq!(summary.actions.get(&TrackAction::PageView), Some(&2));
        assert_eq!(summary.actions.get(&TrackAction::ContactClick), Some(&1));
        assert!(summary.start_time.is_some());
    }
}

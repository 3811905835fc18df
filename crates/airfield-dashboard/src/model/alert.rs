use chrono::{DateTime, Utc};
use resource_sync::RecordId;
use serde::{Deserialize, Serialize};

/// An operational alert (`alerts` resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `emergency`, `warning`, `ongoing`, anything else reads as informational.
    #[serde(default)]
    pub alert_type: String,
    /// `critical`, `high`, `medium`, `low`.
    #[serde(default)]
    pub severity: String,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::flag::deserialize")]
    pub is_active: bool,
}

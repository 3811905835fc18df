use chrono::{DateTime, Utc};
use resource_sync::RecordId;
use serde::{Deserialize, Serialize};

/// A safety management system report (`sms` resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `open`, `in-progress` or `resolved`.
    pub status: String,
    #[serde(default)]
    pub category: Option<String>,
    /// `low`, `medium`, `high` or `critical`.
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Profile id of the reporter.
    #[serde(default)]
    pub reported_by: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub reported_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_option")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Status change submitted from the report page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

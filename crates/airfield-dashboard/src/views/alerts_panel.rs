//! # Alerts Panel
//!
//! The "ALERTS" overlay: a trigger button that only exists while there are active alerts,
//! and a list of alert cards with an icon, a severity chip and an end-time hint.

use super::{decode_records, Tone};
use crate::clients::AlertClient;
use crate::error::DashboardError;
use crate::model::Alert;
use chrono::{DateTime, Utc};
use resource_sync::{QueryResult, RecordId, ResourceClient};

pub const LOADING_ALERTS: &str = "Loading alerts...";
pub const ALERTS_FAILED: &str = "Failed to load alerts";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts at this time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertIcon {
    Emergency,
    Warning,
    Ongoing,
    Info,
}

impl AlertIcon {
    pub fn for_type(alert_type: &str) -> Self {
        match alert_type {
            "emergency" => AlertIcon::Emergency,
            "warning" => AlertIcon::Warning,
            "ongoing" => AlertIcon::Ongoing,
            _ => AlertIcon::Info,
        }
    }
}

/// Chip colour for an alert severity.
pub fn severity_tone(severity: &str) -> Tone {
    match severity {
        "critical" => Tone::Error,
        "high" => Tone::Warning,
        "medium" => Tone::Info,
        _ => Tone::Success,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertItem {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub icon: AlertIcon,
    pub severity: String,
    pub tone: Tone,
    pub end_label: String,
}

impl AlertItem {
    pub fn new(alert: &Alert, now: DateTime<Utc>) -> Self {
        Self {
            id: alert.id.clone(),
            title: alert.title.clone(),
            description: alert.description.clone(),
            icon: AlertIcon::for_type(&alert.alert_type),
            severity: alert.severity.clone(),
            tone: severity_tone(&alert.severity),
            end_label: end_label(alert.end_time, now),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlertsContent {
    Loading,
    Error,
    Empty,
    List(Vec<AlertItem>),
}

impl AlertsContent {
    /// Placeholder text, `None` when there are cards to show.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AlertsContent::Loading => Some(LOADING_ALERTS),
            AlertsContent::Error => Some(ALERTS_FAILED),
            AlertsContent::Empty => Some(NO_ACTIVE_ALERTS),
            AlertsContent::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsPanel {
    pub content: AlertsContent,
    /// The trigger is hidden whenever the list is empty, including while loading.
    pub trigger_visible: bool,
}

/// Builds the panel from a snapshot of [`AlertClient::active_query`].
pub fn alerts_panel(result: &QueryResult, now: DateTime<Utc>) -> Result<AlertsPanel, DashboardError> {
    let content = if result.is_loading() {
        AlertsContent::Loading
    } else if result.is_error() {
        AlertsContent::Error
    } else {
        let alerts: Vec<Alert> = decode_records(result, AlertClient::RESOURCE)?;
        if alerts.is_empty() {
            AlertsContent::Empty
        } else {
            AlertsContent::List(alerts.iter().map(|a| AlertItem::new(a, now)).collect())
        }
    };
    let trigger_visible = matches!(content, AlertsContent::List(_));
    Ok(AlertsPanel { content, trigger_visible })
}

/// "Ends: in about 3 hours", "Ends: 5 minutes ago", or "Ongoing" without an end time.
pub fn end_label(end_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match end_time {
        Some(end) => format!("Ends: {}", relative_to(end, now)),
        None => "Ongoing".to_string(),
    }
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43200;

/// Distance between `at` and `now` in words, with an "in"/"ago" suffix.
pub fn relative_to(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (at - now).num_seconds();
    let words = distance_in_words(seconds.unsigned_abs() as i64);
    if seconds >= 0 {
        format!("in {}", words)
    } else {
        format!("{} ago", words)
    }
}

fn distance_in_words(seconds: i64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as i64;
    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return format!("{} minutes", minutes);
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {} hours", hours);
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return format!("{} days", days);
    }
    if minutes < 2 * MINUTES_IN_MONTH {
        return "about 1 month".to_string();
    }
    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("{} months", nearest);
    }
    let years = months / 12;
    let plural = |n: i64| if n == 1 { "year" } else { "years" };
    match months % 12 {
        m if m < 3 => format!("about {} {}", years, plural(years)),
        m if m < 9 => format!("over {} {}", years, plural(years)),
        _ => format!("almost {} years", years + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use resource_sync::{record, SyncError};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_list_hides_trigger() {
        let panel = alerts_panel(&QueryResult::success(vec![]), now()).unwrap();
        assert_eq!(panel.content, AlertsContent::Empty);
        assert_eq!(panel.content.message(), Some("No active alerts at this time"));
        assert!(!panel.trigger_visible);
    }

    #[test]
    fn test_loading_and_error_states() {
        let loading = alerts_panel(&QueryResult::loading(), now()).unwrap();
        assert_eq!(loading.content.message(), Some("Loading alerts..."));
        assert!(!loading.trigger_visible);

        let failed = alerts_panel(&QueryResult::failure(SyncError::Network("down".into())), now()).unwrap();
        assert_eq!(failed.content.message(), Some("Failed to load alerts"));
        assert!(!failed.trigger_visible);
    }

    #[test]
    fn test_alert_cards() {
        let end = (now() + Duration::hours(3)).to_rfc3339();
        let result = QueryResult::success(vec![
            record(json!({
                "id": 1, "title": "Runway 09 closed", "description": "Resurfacing",
                "alert_type": "emergency", "severity": "critical", "end_time": end, "is_active": true
            })),
            record(json!({
                "id": 2, "title": "Birds", "alert_type": "unknown", "severity": "low", "is_active": "true"
            })),
        ]);

        let panel = alerts_panel(&result, now()).unwrap();
        assert!(panel.trigger_visible);
        let AlertsContent::List(items) = panel.content else {
            panic!("expected alert cards");
        };
        assert_eq!(items[0].icon, AlertIcon::Emergency);
        assert_eq!(items[0].tone, Tone::Error);
        assert_eq!(items[0].end_label, "Ends: in about 3 hours");
        assert_eq!(items[1].icon, AlertIcon::Info);
        assert_eq!(items[1].tone, Tone::Success);
        assert_eq!(items[1].end_label, "Ongoing");
    }

    #[test]
    fn test_icons_and_tones() {
        assert_eq!(AlertIcon::for_type("warning"), AlertIcon::Warning);
        assert_eq!(AlertIcon::for_type("ongoing"), AlertIcon::Ongoing);
        assert_eq!(severity_tone("high"), Tone::Warning);
        assert_eq!(severity_tone("medium"), Tone::Info);
    }

    #[test]
    fn test_relative_wording() {
        let n = now();
        assert_eq!(relative_to(n + Duration::seconds(20), n), "in less than a minute");
        assert_eq!(relative_to(n + Duration::minutes(1), n), "in 1 minute");
        assert_eq!(relative_to(n - Duration::minutes(5), n), "5 minutes ago");
        assert_eq!(relative_to(n + Duration::minutes(60), n), "in about 1 hour");
        assert_eq!(relative_to(n + Duration::days(1), n), "in 1 day");
        assert_eq!(relative_to(n + Duration::days(10), n), "in 10 days");
        assert_eq!(relative_to(n + Duration::days(40), n), "in about 1 month");
        assert_eq!(relative_to(n + Duration::days(100), n), "in 3 months");
        assert_eq!(relative_to(n - Duration::days(400), n), "about 1 year ago");
    }
}

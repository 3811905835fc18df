//! # Report View
//!
//! Detail page of one safety report.

use super::Tone;
use crate::clients::ReportClient;
use crate::error::DashboardError;
use crate::model::SafetyReport;
use chrono::{DateTime, Utc};
use resource_sync::{decode, QueryResult, RecordId, ResourceClient};

pub const LOADING_REPORT: &str = "Loading report...";
pub const REPORT_NOT_FOUND: &str = "Report not found";

pub fn status_tone(status: &str) -> Tone {
    match status {
        "open" => Tone::Warning,
        "in-progress" => Tone::Info,
        "resolved" => Tone::Success,
        _ => Tone::Default,
    }
}

/// Hex colour of the severity chip.
pub fn severity_color(severity: &str) -> &'static str {
    match severity {
        "low" => "#4caf50",
        "medium" => "#ff9800",
        "high" => "#f44336",
        "critical" => "#d32f2f",
        _ => "#9e9e9e",
    }
}

/// `in-progress` reads as `in progress`. Only the first hyphen is replaced.
pub fn status_label(status: &str) -> String {
    status.replacen('-', " ", 1)
}

fn format_report_date(at: DateTime<Utc>) -> String {
    at.format("%b %d, %Y %H:%M").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetails {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub status_label: String,
    pub status_tone: Tone,
    pub severity: String,
    pub severity_color: &'static str,
    pub category: Option<String>,
    pub location: String,
    pub reported_by: Option<String>,
    pub reported_at: String,
    pub resolved_at: Option<String>,
    pub comments: Option<String>,
}

impl From<&SafetyReport> for ReportDetails {
    fn from(report: &SafetyReport) -> Self {
        Self {
            id: report.id.clone(),
            title: report.title.clone(),
            description: report.description.clone(),
            status: report.status.clone(),
            status_label: status_label(&report.status),
            status_tone: status_tone(&report.status),
            severity: report.severity.clone(),
            severity_color: severity_color(&report.severity),
            category: report.category.clone(),
            location: report
                .location
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Not specified".to_string()),
            reported_by: report.reported_by.clone(),
            reported_at: format_report_date(report.reported_at),
            resolved_at: report.resolved_at.map(format_report_date),
            comments: report.comments.clone().filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportView {
    Loading,
    NotFound,
    Error(String),
    Loaded(Box<ReportDetails>),
}

impl ReportView {
    pub fn message(&self) -> Option<String> {
        match self {
            ReportView::Loading => Some(LOADING_REPORT.to_string()),
            ReportView::NotFound => Some(REPORT_NOT_FOUND.to_string()),
            ReportView::Error(message) => Some(message.clone()),
            ReportView::Loaded(_) => None,
        }
    }
}

/// Builds the page from a snapshot of [`ReportClient::report_query`].
///
/// A disabled query (no id) and a missing record both read as not found.
pub fn report_view(result: &QueryResult) -> Result<ReportView, DashboardError> {
    if result.is_loading() {
        return Ok(ReportView::Loading);
    }
    if let Some(error) = &result.error {
        let error = DashboardError::from(error.clone());
        return Ok(if error.is_not_found() {
            ReportView::NotFound
        } else {
            ReportView::Error(error.to_string())
        });
    }
    match result.record() {
        Some(record) => {
            let report: SafetyReport =
                decode(record).map_err(|e| DashboardError::decode(ReportClient::RESOURCE, e))?;
            Ok(ReportView::Loaded(Box::new(ReportDetails::from(&report))))
        }
        None => Ok(ReportView::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_sync::{record, SyncError};
    use serde_json::json;

    #[test]
    fn test_loaded_report() {
        let result = QueryResult::success(vec![record(json!({
            "id": 7,
            "title": "FOD on taxiway B",
            "description": "Loose panel",
            "status": "in-progress",
            "severity": "high",
            "reported_at": "2024-01-15T14:30:00Z",
            "comments": ""
        }))]);

        let ReportView::Loaded(details) = report_view(&result).unwrap() else {
            panic!("expected a loaded report");
        };
        assert_eq!(details.status_label, "in progress");
        assert_eq!(details.status_tone, Tone::Info);
        assert_eq!(details.severity_color, "#f44336");
        assert_eq!(details.location, "Not specified");
        assert_eq!(details.reported_at, "Jan 15, 2024 14:30");
        assert_eq!(details.resolved_at, None);
        assert_eq!(details.comments, None);
    }

    #[test]
    fn test_resolved_report_shows_resolution_date() {
        let result = QueryResult::success(vec![record(json!({
            "id": 8,
            "title": "Lighting fault",
            "status": "resolved",
            "severity": "unknown",
            "location": "Apron 2",
            "reported_at": "2024-02-01",
            "resolved_at": "2024-02-03T09:05:00Z"
        }))]);

        let ReportView::Loaded(details) = report_view(&result).unwrap() else {
            panic!("expected a loaded report");
        };
        assert_eq!(details.status_tone, Tone::Success);
        assert_eq!(details.severity_color, "#9e9e9e");
        assert_eq!(details.location, "Apron 2");
        assert_eq!(details.reported_at, "Feb 01, 2024 00:00");
        assert_eq!(details.resolved_at.as_deref(), Some("Feb 03, 2024 09:05"));
    }

    #[test]
    fn test_placeholder_states() {
        assert_eq!(report_view(&QueryResult::loading()).unwrap(), ReportView::Loading);
        assert_eq!(report_view(&QueryResult::idle()).unwrap(), ReportView::NotFound);

        let missing = QueryResult::failure(SyncError::not_found("sms", 3));
        assert_eq!(report_view(&missing).unwrap().message().as_deref(), Some("Report not found"));

        let failed = QueryResult::failure(SyncError::Network("timeout".into()));
        assert_eq!(
            report_view(&failed).unwrap(),
            ReportView::Error("Network error: timeout".to_string())
        );
    }

    #[test]
    fn test_status_tones() {
        assert_eq!(status_tone("open"), Tone::Warning);
        assert_eq!(status_tone("closed"), Tone::Default);
        assert_eq!(severity_color("critical"), "#d32f2f");
        assert_eq!(severity_color("low"), "#4caf50");
    }
}

use airfield_dashboard::views::{alerts_panel, report_view, AlertIcon, AlertsContent, FuelPage, ReportView, Tone};
use airfield_dashboard::{DashboardError, DashboardSystem, SyncConfig};
use chrono::Utc;
use resource_sync::{record, Identity, Record, RecordId, ResourceClient, StaticIdentity};
use serde_json::json;

fn fuels() -> Vec<Record> {
    vec![
        record(json!({ "id": 1, "label": "Jet A-1", "capacity": 1000, "remaining": 250 })),
        record(json!({ "id": 2, "label": "Avgas", "capacity": 500 })),
    ]
}

fn fuelings() -> Vec<Record> {
    vec![
        record(json!({
            "id": 1, "aircraft": "OH-OLD", "amount": 10, "fuel": 1, "uid": "U1",
            "created_at": "2024-01-01T08:00:00Z"
        })),
        record(json!({
            "id": 2, "aircraft": "OH-OTHER", "amount": 20, "fuel": 2, "uid": "U2",
            "created_at": "2024-01-02T08:00:00Z"
        })),
    ]
}

async fn seeded_system() -> DashboardSystem {
    let system = DashboardSystem::in_memory(SyncConfig::default());
    system.seed("fuels", fuels()).await.unwrap();
    system.seed("fuelings", fuelings()).await.unwrap();
    system
}

/// Full fuel page flow against the in-memory backend: mount, record, see the history refresh.
#[tokio::test]
async fn test_fuel_page_records_and_refreshes_history() {
    let system = seeded_system().await;
    let identity = StaticIdentity::signed_in("U1");
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &identity).await.unwrap();
    page.settled().await.unwrap();

    let history = page.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].aircraft, "OH-OLD");
    assert_eq!(history[0].fuel_label, "Jet A-1");

    let estimates = page.estimates().unwrap();
    assert_eq!(estimates[0].percent_label, "25%");
    assert_eq!(estimates[1].estimated_label, "No data");

    page.form.open_for(RecordId::from(1u32));
    assert_eq!(page.adding_to().as_deref(), Some("Jet A-1"));

    let item = page.submit_fueling("N123", "42.5").await.unwrap();
    assert_eq!(item.aircraft, "N123");
    assert_eq!(item.uid.as_deref(), Some("U1"));
    assert!(!page.form.is_open(), "a stored fueling closes the form");
    assert!(page.form.error().is_none());

    page.settled().await.unwrap();
    let history = page.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].aircraft, "N123", "newest first");
    assert_eq!(history[0].amount_label, "42.5L");
    assert_eq!(history[1].aircraft, "OH-OLD");

    drop(page);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_history_waits_for_identity() {
    let system = seeded_system().await;
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &StaticIdentity::anonymous())
        .await
        .unwrap();
    page.settled().await.unwrap();
    assert!(page.history().unwrap().is_empty());
    assert_eq!(page.options().unwrap().len(), 2);

    let reissued = page.set_identity(Some(Identity { id: "U2".into() })).await.unwrap();
    assert!(reissued);
    page.settled().await.unwrap();
    let history = page.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].aircraft, "OH-OTHER");

    // Same identity again: same key, nothing re-issued.
    assert!(!page.set_identity(Some(Identity { id: "U2".into() })).await.unwrap());

    drop(page);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_form_is_not_submitted() {
    let system = seeded_system().await;
    let identity = StaticIdentity::signed_in("U1");
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &identity).await.unwrap();
    page.settled().await.unwrap();

    page.form.open_for(RecordId::from(2u32));
    let result = page.submit_fueling("N123", "0").await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));
    assert!(page.form.is_open());
    assert!(page.form.error().is_some());

    let stored = system.fuelings.list(system.fuelings.query()).await.unwrap();
    assert_eq!(stored.len(), 2);

    drop(page);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_alerts_panel_lists_active_alerts_by_severity() {
    let system = DashboardSystem::in_memory(SyncConfig::default());

    let mut empty = system.alerts.watch_active().await.unwrap();
    let panel = alerts_panel(&empty.settled().await.unwrap(), Utc::now()).unwrap();
    assert_eq!(panel.content.message(), Some("No active alerts at this time"));
    assert!(!panel.trigger_visible);
    empty.close().await;

    system
        .seed(
            "alerts",
            vec![
                record(json!({ "id": 1, "title": "Birds", "alert_type": "warning", "severity": "low", "is_active": "true" })),
                record(json!({ "id": 2, "title": "Runway closed", "alert_type": "emergency", "severity": "critical", "is_active": true })),
                record(json!({ "id": 3, "title": "Old notice", "severity": "high", "is_active": "false" })),
            ],
        )
        .await
        .unwrap();

    let mut alerts = system.alerts.watch_active().await.unwrap();
    let panel = alerts_panel(&alerts.settled().await.unwrap(), Utc::now()).unwrap();
    assert!(panel.trigger_visible);
    let AlertsContent::List(items) = panel.content else {
        panic!("expected alert cards");
    };
    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Runway closed", "Birds"]);
    assert_eq!(items[0].icon, AlertIcon::Emergency);
    assert_eq!(items[0].tone, Tone::Error);
    assert_eq!(items[0].end_label, "Ongoing");

    drop(alerts);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_report_view_states_and_status_update() {
    let system = DashboardSystem::in_memory(SyncConfig::default());
    system
        .seed(
            "sms",
            vec![record(json!({
                "id": 1, "title": "FOD on taxiway B", "status": "open", "severity": "medium",
                "reported_at": "2024-05-28T16:45:00Z"
            }))],
        )
        .await
        .unwrap();

    let mut no_id = system.reports.watch_report(None).await.unwrap();
    assert_eq!(report_view(&no_id.settled().await.unwrap()).unwrap(), ReportView::NotFound);

    let mut missing = system.reports.watch_report(Some(RecordId::from(99u32))).await.unwrap();
    assert_eq!(report_view(&missing.settled().await.unwrap()).unwrap(), ReportView::NotFound);

    let id = RecordId::from(1u32);
    let mut report = system.reports.watch_report(Some(id.clone())).await.unwrap();
    let ReportView::Loaded(before) = report_view(&report.settled().await.unwrap()).unwrap() else {
        panic!("expected a loaded report");
    };
    assert_eq!(before.status_tone, Tone::Warning);
    assert_eq!(before.severity_color, "#ff9800");
    assert_eq!(before.reported_at, "May 28, 2024 16:45");
    assert!(before.resolved_at.is_none());

    let mut update = system.reports.update_status(id, "resolved").await.unwrap();
    update.settled().await.unwrap();

    let ReportView::Loaded(after) = report_view(&report.settled().await.unwrap()).unwrap() else {
        panic!("expected a loaded report");
    };
    assert_eq!(after.status_label, "resolved");
    assert_eq!(after.status_tone, Tone::Success);
    assert!(after.resolved_at.is_some());

    drop((no_id, missing, report));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seed_requires_in_memory_backend() {
    let provider = resource_sync::mock::MockProvider::new();
    let system = DashboardSystem::new(SyncConfig::default(), std::sync::Arc::new(provider.clone()));
    let result = system.seed("fuels", fuels()).await;
    assert!(matches!(result, Err(DashboardError::Task(_))));
    provider.verify();
    system.shutdown().await.unwrap();
}

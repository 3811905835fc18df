//! # Airfield Dashboard Demo
//!
//! Runs every dashboard page against the in-memory backend and logs what each would show.
//!
//! ```bash
//! RUST_LOG=info cargo run -p airfield-dashboard
//! DASHBOARD_USER=pilot-7 SYNC_PAGE_SIZE=5 RUST_LOG=debug cargo run -p airfield-dashboard
//! ```

use airfield_dashboard::views::{alerts_panel, report_view, ClockView, FuelPage};
use airfield_dashboard::{DashboardError, DashboardSystem, SyncConfig};
use chrono::{Duration, Utc};
use resource_sync::{record, setup_tracing, Record, RecordId, StaticIdentity};
use serde_json::json;
use tracing::{error, info, Instrument};

const USER_VAR: &str = "DASHBOARD_USER";

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = SyncConfig::from_env();
    let user = std::env::var(USER_VAR).unwrap_or_else(|_| "pilot-1".to_string());
    info!(%user, ?config, "Starting dashboard demo");

    let system = DashboardSystem::in_memory(config);
    system.seed("fuels", fuel_fixtures()).await?;
    system.seed("alerts", alert_fixtures()).await?;
    system.seed("sms", report_fixtures()).await?;

    let span = tracing::info_span!("fuel_page", %user);
    async {
        let identity = StaticIdentity::signed_in(user.clone());
        let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &identity).await?;
        page.settled().await?;

        page.form.open_for(RecordId::from(1u32));
        info!(adding_to = ?page.adding_to(), "Form opened");
        match page.submit_fueling("OH-ABC", "42.5").await {
            Ok(item) => info!(id = %item.id, form_open = page.form.is_open(), "Fueling stored"),
            Err(e) => error!(error = %e, "Fueling failed"),
        }
        page.settled().await?;

        for tank in page.estimates()? {
            info!(
                fuel = %tank.label,
                capacity = %tank.capacity_label,
                estimated = %tank.estimated_label,
                percent = %tank.percent_label,
                last_added = %tank.last_added,
                "Tank"
            );
        }
        for entry in page.history()? {
            info!(aircraft = %entry.aircraft, fuel = %entry.fuel_label, amount = %entry.amount_label, date = %entry.date_label, "History");
        }
        Ok::<_, DashboardError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("alerts");
    async {
        let mut alerts = system.alerts.watch_active().await?;
        let panel = alerts_panel(&alerts.settled().await?, Utc::now())?;
        info!(trigger_visible = panel.trigger_visible, message = ?panel.content.message(), "Alerts panel");
        if let airfield_dashboard::views::AlertsContent::List(items) = &panel.content {
            for item in items {
                info!(title = %item.title, icon = ?item.icon, tone = ?item.tone, ends = %item.end_label, "Alert");
            }
        }
        Ok::<_, DashboardError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("report");
    async {
        let id = RecordId::from(1u32);
        let mut report = system.reports.watch_report(Some(id.clone())).await?;
        info!(view = ?report_view(&report.settled().await?)?, "Report before update");

        let mut update = system.reports.update_status(id, "resolved").await?;
        update.settled().await?;
        info!(view = ?report_view(&report.settled().await?)?, "Report after update");
        Ok::<_, DashboardError>(())
    }
    .instrument(span)
    .await?;

    let clock = ClockView::now();
    info!(local = %format!("{} {}", clock.local_date, clock.local_time), utc = %format!("{} {}", clock.utc_date, clock.utc_time), "Clock");

    system.shutdown().await?;
    info!("Dashboard demo completed");
    Ok(())
}

fn fuel_fixtures() -> Vec<Record> {
    vec![
        record(json!({
            "id": 1, "label": "Jet A-1", "value": "jet-a1", "color": "#1976d2",
            "price": 1.92, "capacity": 20000, "remaining": 12450.5, "lastFueling": "2024-05-30T08:10:00Z"
        })),
        record(json!({
            "id": 2, "label": "Avgas 100LL", "value": "avgas", "color": "#2e7d32",
            "price": 2.65, "capacity": 5000, "remaining": 5400
        })),
        record(json!({ "id": 3, "label": "Diesel", "value": "diesel" })),
    ]
}

fn alert_fixtures() -> Vec<Record> {
    let in_three_hours = (Utc::now() + Duration::hours(3)).to_rfc3339();
    vec![
        record(json!({
            "id": 1, "title": "Runway 09/27 closed", "description": "Surface repairs",
            "alert_type": "emergency", "severity": "critical", "end_time": in_three_hours, "is_active": "true"
        })),
        record(json!({
            "id": 2, "title": "Bird activity", "description": "Flocks reported near threshold 27",
            "alert_type": "warning", "severity": "high", "is_active": "true"
        })),
        record(json!({
            "id": 3, "title": "Fuel truck maintenance", "alert_type": "ongoing",
            "severity": "low", "is_active": "false"
        })),
    ]
}

fn report_fixtures() -> Vec<Record> {
    vec![record(json!({
        "id": 1, "title": "FOD on taxiway B", "description": "Loose access panel found near B2",
        "status": "in-progress", "category": "FOD", "severity": "high",
        "reported_by": "pilot-1", "reported_at": "2024-05-28T16:45:00Z"
    }))]
}

use airfield_dashboard::views::FuelPage;
use airfield_dashboard::{DashboardError, DashboardSystem, SyncConfig};
use resource_sync::mock::{MockProvider, RecordedCall};
use resource_sync::{record, RecordId, StaticIdentity, SyncError};
use serde_json::json;
use std::sync::Arc;

fn system_with(provider: &MockProvider) -> DashboardSystem {
    DashboardSystem::new(SyncConfig::default(), Arc::new(provider.clone()))
}

/// Pattern: real sync actor, mocked backend.
/// A stored fueling sends exactly the form's values and closes the form.
#[tokio::test]
async fn test_record_fueling_sends_form_values() {
    let provider = MockProvider::new();
    provider
        .expect_list("fuels")
        .return_records(vec![record(json!({ "id": "jet-a", "label": "Jet A" }))]);
    provider.expect_create("fuelings").return_ok(record(json!({
        "id": 9, "aircraft": "N123", "amount": 42.5, "fuel": "jet-a",
        "created_at": "2024-06-01T10:00:00Z"
    })));

    let system = system_with(&provider);
    // Anonymous: the history query stays disabled and never reaches the backend.
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &StaticIdentity::anonymous())
        .await
        .unwrap();
    page.settled().await.unwrap();

    page.form.open_for(RecordId::from("jet-a"));
    let item = page.submit_fueling("N123", "42.5").await.unwrap();
    assert_eq!(item.id, RecordId::from(9u32));
    assert!(!page.form.is_open());

    let creates: Vec<_> = provider
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::Create { resource, payload } => Some((resource, payload)),
            _ => None,
        })
        .collect();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].0, "fuelings");
    assert_eq!(
        creates[0].1,
        record(json!({ "aircraft": "N123", "amount": 42.5, "fuel": "jet-a" }))
    );
    assert_eq!(provider.call_count("fuelings"), 1);

    drop(page);
    provider.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_fueling_keeps_form_open() {
    let provider = MockProvider::new();
    provider
        .expect_list("fuels")
        .return_records(vec![record(json!({ "id": 1, "label": "Jet A-1" }))]);
    provider.expect_list("fuelings").return_records(vec![]);
    provider
        .expect_create("fuelings")
        .return_err(SyncError::Network("offline".into()));

    let system = system_with(&provider);
    let identity = StaticIdentity::signed_in("U1");
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &identity).await.unwrap();
    page.settled().await.unwrap();

    page.form.open_for(RecordId::from(1u32));
    let result = page.submit_fueling("OH-ABC", "12").await;
    assert_eq!(result, Err(DashboardError::Sync(SyncError::Network("offline".into()))));
    assert!(page.form.is_open());
    assert_eq!(
        page.form.error(),
        Some(&DashboardError::Sync(SyncError::Network("offline".into())))
    );

    // No invalidation after a failure: the history was read once.
    page.settled().await.unwrap();
    assert_eq!(provider.call_count("fuelings"), 2);
    assert!(page.history().unwrap().is_empty());

    drop(page);
    provider.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fuel_options_error_surfaces_on_estimates() {
    let provider = MockProvider::new();
    provider
        .expect_list("fuels")
        .return_err(SyncError::Network("502".into()));

    let system = system_with(&provider);
    let mut page = FuelPage::mount(&system.fuels, &system.fuelings, &StaticIdentity::anonymous())
        .await
        .unwrap();
    page.settled().await.unwrap();

    // A failed read holds no data, so the table is empty rather than stale.
    assert!(page.estimates().unwrap().is_empty());

    drop(page);
    provider.verify();
    system.shutdown().await.unwrap();
}

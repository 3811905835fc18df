//! # Fuel Page
//!
//! Fuel options, the signed-in user's fueling history, the tank estimates table and the
//! "Record Fuel Addition" form.

use super::decode_records;
use crate::clients::{FuelClient, FuelingClient};
use crate::error::DashboardError;
use crate::model::{FuelItem, FuelOption, FuelingValues};
use chrono::{DateTime, Utc};
use resource_sync::{decode, Identity, IdentityProvider, QueryHandle, RecordId, ResourceClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Smallest amount the form accepts, in litres.
pub const MIN_FUELING_AMOUNT: f64 = 0.1;

/// How full a tank is, in percent, or `None` when nothing is known about its contents.
///
/// A missing or non-positive capacity counts as 1 so the division is always defined.
/// The result is not clamped; see [`gauge_value`].
pub fn percent_full(remaining: Option<f64>, capacity: Option<f64>) -> Option<f64> {
    let remaining = remaining?;
    let capacity = capacity.filter(|c| *c > 0.0).unwrap_or(1.0);
    Some(remaining / capacity * 100.0)
}

/// Percentage as drawn on a progress bar: clamped to `[0, 100]`, empty when unknown.
pub fn gauge_value(percent: Option<f64>) -> f64 {
    percent.map(|p| p.clamp(0.0, 100.0)).unwrap_or(0.0)
}

/// One row of the "Fuel Tank Estimates" table.
#[derive(Debug, Clone, PartialEq)]
pub struct TankEstimate {
    pub fuel_id: RecordId,
    pub label: String,
    pub color: Option<String>,
    pub capacity_label: String,
    pub estimated_label: String,
    pub percent: Option<f64>,
    pub gauge: f64,
    pub percent_label: String,
    pub last_added: String,
}

impl TankEstimate {
    pub fn from_option(fuel: &FuelOption) -> Self {
        let percent = percent_full(fuel.remaining, fuel.capacity);
        Self {
            fuel_id: fuel.id.clone(),
            label: fuel.label.clone(),
            color: fuel.color.clone(),
            capacity_label: fuel
                .capacity
                .map(|c| format!("{}L", c))
                .unwrap_or_else(|| "Unknown".to_string()),
            estimated_label: fuel
                .remaining
                .map(|r| format!("~{:.1}L", r))
                .unwrap_or_else(|| "No data".to_string()),
            percent,
            gauge: gauge_value(percent),
            percent_label: percent
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "No data".to_string()),
            last_added: fuel
                .last_fueling
                .map(|t| t.format("%-m/%-d/%Y").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        }
    }
}

pub fn tank_estimates(fuels: &[FuelOption]) -> Vec<TankEstimate> {
    fuels.iter().map(TankEstimate::from_option).collect()
}

/// Label of the fuel with `id`.
pub fn fuel_label<'a>(fuels: &'a [FuelOption], id: &RecordId) -> Option<&'a str> {
    fuels.iter().find(|f| &f.id == id).map(|f| f.label.as_str())
}

/// One card of the fueling history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub aircraft: String,
    /// Fuel label, or the raw fuel id when the fuel is not among the loaded options.
    pub fuel_label: String,
    pub amount_label: String,
    pub date_label: String,
}

/// Builds history cards in the order the backend returned them.
pub fn history_entries(items: &[FuelItem], fuels: &[FuelOption]) -> Vec<HistoryEntry> {
    items
        .iter()
        .map(|item| HistoryEntry {
            id: item.id.clone(),
            aircraft: item.aircraft.clone(),
            fuel_label: fuel_label(fuels, &item.fuel)
                .map(str::to_string)
                .unwrap_or_else(|| item.fuel.to_string()),
            amount_label: format!("{}L", item.amount),
            date_label: format_history_date(item.created_at),
        })
        .collect()
}

fn format_history_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %I:%M %p UTC").to_string()
}

/// State of the "Record Fuel Addition" modal.
///
/// The open flag is shared with the success callback of a submitted mutation, so a stored
/// fueling closes the form without the page polling for it.
#[derive(Debug, Default)]
pub struct FuelingForm {
    selected_fuel: Option<RecordId>,
    open: Arc<AtomicBool>,
    error: Option<DashboardError>,
}

impl FuelingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the form for one fuel type, clearing any previous error.
    pub fn open_for(&mut self, fuel: RecordId) {
        self.selected_fuel = Some(fuel);
        self.error = None;
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn selected_fuel(&self) -> Option<&RecordId> {
        self.selected_fuel.as_ref()
    }

    /// Error of the last submission, shown inside the still-open form.
    pub fn error(&self) -> Option<&DashboardError> {
        self.error.as_ref()
    }

    /// Checks the raw inputs the way the form's field constraints do.
    pub fn validate(&self, aircraft: &str, amount: &str, identity: Option<&Identity>) -> Result<FuelingValues, DashboardError> {
        let fuel = self
            .selected_fuel
            .clone()
            .ok_or_else(|| DashboardError::Validation("Select a fuel type".into()))?;
        let aircraft = aircraft.trim();
        if aircraft.is_empty() {
            return Err(DashboardError::Validation("Aircraft/Vehicle is required".into()));
        }
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| DashboardError::Validation(format!("Amount must be a number, got {:?}", amount)))?;
        if !amount.is_finite() || amount < MIN_FUELING_AMOUNT {
            return Err(DashboardError::Validation(format!(
                "Amount must be at least {} L",
                MIN_FUELING_AMOUNT
            )));
        }
        Ok(FuelingValues {
            aircraft: aircraft.to_string(),
            amount,
            fuel,
            uid: identity.map(|i| i.id.clone()),
        })
    }

    /// Validates and submits the form, then waits for the backend.
    ///
    /// On success the mutation's callback closes the form. On failure the form stays open
    /// and keeps the error for display.
    #[instrument(skip(self, client, identity))]
    pub async fn submit(
        &mut self,
        client: &FuelingClient,
        aircraft: &str,
        amount: &str,
        identity: Option<&Identity>,
    ) -> Result<FuelItem, DashboardError> {
        let outcome = self.try_submit(client, aircraft, amount, identity).await;
        match &outcome {
            Ok(item) => {
                info!(id = %item.id, amount = item.amount, "Fueling recorded");
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Fueling not recorded");
                self.error = Some(e.clone());
            }
        }
        outcome
    }

    async fn try_submit(
        &self,
        client: &FuelingClient,
        aircraft: &str,
        amount: &str,
        identity: Option<&Identity>,
    ) -> Result<FuelItem, DashboardError> {
        let values = self.validate(aircraft, amount, identity)?;
        let open = Arc::clone(&self.open);
        let mut mutation = client
            .record_fueling(values, move || open.store(false, Ordering::SeqCst))
            .await?;
        let stored = mutation.settled().await?;
        decode(&stored).map_err(|e| DashboardError::decode(FuelingClient::RESOURCE, e))
    }
}

/// The mounted fuel page: two live queries plus the form.
pub struct FuelPage {
    fuels: QueryHandle,
    history: QueryHandle,
    fuelings: FuelingClient,
    identity: Option<Identity>,
    pub form: FuelingForm,
}

impl FuelPage {
    /// Subscribes to fuel options and, once an identity is known, to the user's history.
    pub async fn mount(
        fuels: &FuelClient,
        fuelings: &FuelingClient,
        identity: &dyn IdentityProvider,
    ) -> Result<Self, DashboardError> {
        let identity = identity.current().await?;
        let options = fuels.watch_options().await?;
        let history = fuelings.watch(fuelings.history_query(identity.as_ref())).await?;
        Ok(Self {
            fuels: options,
            history,
            fuelings: fuelings.clone(),
            identity,
            form: FuelingForm::new(),
        })
    }

    /// Re-targets the history query when authentication resolves or changes.
    /// Returns whether the query was re-issued.
    pub async fn set_identity(&mut self, identity: Option<Identity>) -> Result<bool, DashboardError> {
        let query = self.fuelings.history_query(identity.as_ref());
        self.identity = identity;
        Ok(self.history.set_query(query).await?)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Waits until neither query has a request in flight.
    pub async fn settled(&mut self) -> Result<(), DashboardError> {
        self.fuels.settled().await?;
        self.history.settled().await?;
        Ok(())
    }

    pub fn options(&self) -> Result<Vec<FuelOption>, DashboardError> {
        decode_records(&self.fuels.current(), FuelClient::RESOURCE)
    }

    pub fn estimates(&self) -> Result<Vec<TankEstimate>, DashboardError> {
        Ok(tank_estimates(&self.options()?))
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>, DashboardError> {
        let items: Vec<FuelItem> = decode_records(&self.history.current(), FuelingClient::RESOURCE)?;
        Ok(history_entries(&items, &self.options()?))
    }

    /// Label shown as "Adding to: ..." in the open form.
    pub fn adding_to(&self) -> Option<String> {
        let fuel = self.form.selected_fuel()?;
        let options = self.options().ok()?;
        fuel_label(&options, fuel).map(str::to_string)
    }

    pub async fn submit_fueling(&mut self, aircraft: &str, amount: &str) -> Result<FuelItem, DashboardError> {
        let identity = self.identity.clone();
        self.form
            .submit(&self.fuelings, aircraft, amount, identity.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn option(id: u32, remaining: Option<f64>, capacity: Option<f64>) -> FuelOption {
        FuelOption {
            id: RecordId::from(id),
            label: format!("Fuel {}", id),
            value: None,
            color: None,
            price: None,
            capacity,
            remaining,
            last_fueling: None,
        }
    }

    #[test]
    fn test_percent_full() {
        assert_eq!(percent_full(Some(250.0), Some(1000.0)), Some(25.0));
        assert_eq!(percent_full(Some(0.5), None), Some(50.0));
        assert_eq!(percent_full(Some(0.5), Some(0.0)), Some(50.0));
        assert_eq!(percent_full(None, Some(1000.0)), None);
    }

    #[test]
    fn test_gauge_is_clamped_but_label_is_not() {
        let estimate = TankEstimate::from_option(&option(1, Some(1200.0), Some(1000.0)));
        assert_eq!(estimate.gauge, 100.0);
        assert_eq!(estimate.percent_label, "120%");

        let empty = TankEstimate::from_option(&option(2, Some(-5.0), Some(1000.0)));
        assert_eq!(empty.gauge, 0.0);
    }

    #[test]
    fn test_estimate_labels() {
        let mut fuel = option(1, Some(1234.56), Some(5000.0));
        fuel.last_fueling = Some(Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap());
        let estimate = TankEstimate::from_option(&fuel);
        assert_eq!(estimate.capacity_label, "5000L");
        assert_eq!(estimate.estimated_label, "~1234.6L");
        assert_eq!(estimate.percent_label, "25%");
        assert_eq!(estimate.last_added, "3/7/2024");

        let unknown = TankEstimate::from_option(&option(2, None, None));
        assert_eq!(unknown.estimated_label, "No data");
        assert_eq!(unknown.percent_label, "No data");
        assert_eq!(unknown.gauge, 0.0);
        assert_eq!(unknown.last_added, "Never");
    }

    #[test]
    fn test_history_entries_keep_order_and_resolve_labels() {
        let fuels = vec![option(1, None, None)];
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let items = vec![
            FuelItem {
                id: RecordId::from(2u32),
                aircraft: "OH-ABC".into(),
                amount: 42.5,
                fuel: RecordId::from(1u32),
                uid: None,
                created_at: at,
            },
            FuelItem {
                id: RecordId::from(1u32),
                aircraft: "OH-XYZ".into(),
                amount: 10.0,
                fuel: RecordId::from(9u32),
                uid: None,
                created_at: at,
            },
        ];

        let entries = history_entries(&items, &fuels);
        assert_eq!(entries[0].id, RecordId::from(2u32));
        assert_eq!(entries[0].fuel_label, "Fuel 1");
        assert_eq!(entries[0].amount_label, "42.5L");
        assert_eq!(entries[0].date_label, "January 15, 2024, 02:30 PM UTC");
        assert_eq!(entries[1].fuel_label, "9");
        assert_eq!(entries[1].amount_label, "10L");
    }

    #[test]
    fn test_form_validation() {
        let mut form = FuelingForm::new();
        assert!(matches!(form.validate("OH-ABC", "10", None), Err(DashboardError::Validation(_))));

        form.open_for(RecordId::from(1u32));
        assert!(form.is_open());
        assert!(matches!(form.validate("  ", "10", None), Err(DashboardError::Validation(_))));
        assert!(matches!(form.validate("OH-ABC", "0.05", None), Err(DashboardError::Validation(_))));
        assert!(matches!(form.validate("OH-ABC", "lots", None), Err(DashboardError::Validation(_))));

        let identity = Identity { id: "U1".into() };
        let values = form.validate(" OH-ABC ", "0.1", Some(&identity)).unwrap();
        assert_eq!(values.aircraft, "OH-ABC");
        assert_eq!(values.amount, 0.1);
        assert_eq!(values.uid.as_deref(), Some("U1"));
    }
}

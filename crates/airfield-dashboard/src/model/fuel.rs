use chrono::{DateTime, Utc};
use resource_sync::RecordId;
use serde::{Deserialize, Serialize};

/// A fuel type offered at the airfield, with its tank figures (`fuels` resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelOption {
    pub id: RecordId,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Display colour of the fuel's chip.
    #[serde(default)]
    pub color: Option<String>,
    /// Price per litre.
    #[serde(default)]
    pub price: Option<f64>,
    /// Tank capacity in litres.
    #[serde(default)]
    pub capacity: Option<f64>,
    /// Estimated litres in the tank.
    #[serde(default)]
    pub remaining: Option<f64>,
    #[serde(
        default,
        rename = "lastFueling",
        alias = "last_fueling",
        deserialize_with = "super::timestamp::deserialize_option"
    )]
    pub last_fueling: Option<DateTime<Utc>>,
}

/// One recorded fuel addition (`fuelings` resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelItem {
    pub id: RecordId,
    #[serde(default)]
    pub aircraft: String,
    pub amount: f64,
    /// Id of the [`FuelOption`] that was added.
    pub fuel: RecordId,
    /// Id of the user who recorded it.
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Payload of the "Record Fuel Addition" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelingValues {
    pub aircraft: String,
    /// Litres added.
    pub amount: f64,
    pub fuel: RecordId,
    /// Set from the signed-in identity when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

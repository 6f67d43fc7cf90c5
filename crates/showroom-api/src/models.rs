// Backend wire types
//
// Request and response shapes for the dealership REST API. Field names
// follow the backend's camelCase JSON; documents carry their Mongo-style
// `_id` which is accepted as `id` too.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ── Vehicles ────────────────────────────────────────────────────────

/// Availability of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Sold,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Sold => "Sold",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inventory item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: i64,
    pub odometer: i64,
    pub condition: String,
    pub status: VehicleStatus,
    pub body_type: String,
    pub assembly: String,
    pub fuel_type: String,
    pub transmission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<VehicleImage>,
    #[serde(default)]
    pub specification: Vec<String>,
    #[serde(default, rename = "user", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// Image reference attached to a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleImage {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub url: String,
}

/// Create/update payload for a vehicle. Sale fields are set when selling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: i64,
    pub odometer: i64,
    pub condition: String,
    pub status: VehicleStatus,
    pub body_type: String,
    pub assembly: String,
    pub fuel_type: String,
    pub transmission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub specification: Vec<String>,
}

/// Body of `POST /api/vehicle/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySearch {
    pub search: String,
    pub status: Vec<String>,
    pub condition: Vec<String>,
    pub body_type: Vec<String>,
    pub assembly: Vec<String>,
    pub fuel_type: Vec<String>,
    pub transmission: Vec<String>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub price_range: [i64; 2],
    pub year_range: [i64; 2],
    pub odometer_range: [i64; 2],
}

/// Body of `POST /api/vehicle/sales`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

// ── Contacts ────────────────────────────────────────────────────────

/// A buyer or lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// Create/update payload for a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// 409 body of `POST /api/contact/delete`: contacts still referenced by
/// vehicles, with the offending identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConflict {
    pub message: String,
    #[serde(default)]
    pub associated_buyer_ids: Vec<String>,
    #[serde(default)]
    pub associated_vehicle_ids: Vec<String>,
}

// ── Auth ────────────────────────────────────────────────────────────

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealership: Option<String>,
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub dealership: Option<String>,
}

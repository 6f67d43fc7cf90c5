// ── Domain model ──
//
// Wire entities are shared with showroom-api unchanged; this module adds
// the client-only state types the store and scheduler work with.

mod dashboard;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use dashboard::{DateWindow, MonthlySales, monthly_windows};
pub use showroom_api::{
    Contact, ContactConflict, ContactDraft, Credentials, InventorySearch, Registration,
    SalesWindow, User, Vehicle, VehicleDraft, VehicleImage, VehicleStatus,
};

/// Alert text used when a failure carries no server message.
pub const FALLBACK_ALERT_MESSAGE: &str = "Something went wrong. Please try again.";

/// Fetch lifecycle of one collection concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
}

/// A dismissible user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub level: AlertLevel,
    pub message: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Which table a row selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Table {
    Inventory,
    Contacts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

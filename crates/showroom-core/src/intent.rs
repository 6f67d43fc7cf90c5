// ── Intents ──
//
// The only way state changes. Consumers dispatch filter, selection and
// session intents; effects dispatch the loading/ingest ones.

use chrono::{DateTime, Utc};
use strum::IntoStaticStr;

use crate::model::{
    AlertLevel, AuthMode, Contact, ContactConflict, DateWindow, MonthlySales, Table, User,
    Vehicle, VehicleImage,
};
use crate::query::{Facet, RangeField};

/// A named state transition.
#[derive(Debug, Clone, IntoStaticStr)]
pub enum Intent {
    // ── Session ──────────────────────────────────────────────────────
    LoginStarted,
    LoginSucceeded {
        user: User,
        session_marker: bool,
    },
    LoginFailed {
        message: String,
    },
    /// A cached user record, e.g. on cold start.
    SessionRestored {
        user: User,
        session_marker: bool,
    },
    Logout,
    /// The backend answered 401.
    SessionLost,
    SetAuthMode(AuthMode),

    // ── Inventory ────────────────────────────────────────────────────
    InventoryLoading,
    /// A full load: replaces the collection and rebuilds the query view.
    InventoryLoaded(Vec<Vehicle>),
    /// Search results: replaces the collection only.
    InventorySearchLoaded(Vec<Vehicle>),
    InventoryFailed,
    ToggleFacetValue {
        facet: Facet,
        value: String,
    },
    ToggleAllFacet(Facet),
    SetRange {
        field: RangeField,
        low: i64,
        high: i64,
    },
    SetInventorySearch(String),
    ClearFilters,
    TeardownQueryView,
    SetCurrentVehicle(Vehicle),
    ClearCurrentVehicle,
    CurrentVehicleImagesLoaded {
        vehicle_id: String,
        images: Vec<VehicleImage>,
    },

    // ── Contacts ─────────────────────────────────────────────────────
    ContactsLoading,
    ContactsLoaded(Vec<Contact>),
    ContactsFailed,
    SetContactSearch(String),
    ContactConflict(ContactConflict),
    DismissConflict,

    // ── Dashboard ────────────────────────────────────────────────────
    InitDashboardWindow(DateWindow),
    SetDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    SetPastRange(u32),
    DashboardLoading,
    SalesLoaded {
        current: Vec<Vehicle>,
        past: Vec<Vehicle>,
    },
    MonthlySalesLoaded {
        current: Vec<MonthlySales>,
        past: Vec<MonthlySales>,
    },
    DashboardFailed,

    // ── Row selection ────────────────────────────────────────────────
    ToggleRow {
        table: Table,
        id: String,
    },
    /// Select every row of the table's current collection, or none.
    SetAllRows {
        table: Table,
        selected: bool,
    },
    ClearRows(Table),

    // ── Alerts ───────────────────────────────────────────────────────
    RaiseAlert {
        level: AlertLevel,
        message: String,
    },
    DismissAlert(u64),
}

impl Intent {
    /// Variant name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn error_alert(message: impl Into<String>) -> Self {
        Self::RaiseAlert {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

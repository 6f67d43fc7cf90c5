// ── Application state ──
//
// One immutable snapshot per transition. Collections sit behind `Arc` so
// a reduction only clones the slices it touches.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{
    Alert, AuthMode, Contact, ContactConflict, DateWindow, LoadStatus, MonthlySales, Table, User,
    Vehicle,
};
use crate::query::QueryView;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub user: Option<User>,
    /// Whether the session cookie is present.
    pub marker: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Authenticated, verified, and holding a session cookie.
    pub fn is_active(&self) -> bool {
        self.marker && self.user.as_ref().is_some_and(|u| u.verified)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryState {
    pub vehicles: Arc<Vec<Vehicle>>,
    /// `None` until the first full load, and after teardown.
    pub query: Option<Arc<QueryView>>,
    /// Bumped on every full load so consumers can tell a rebuild from a
    /// filter edit.
    pub generation: u64,
    pub status: LoadStatus,
    pub selected_rows: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactsState {
    pub contacts: Arc<Vec<Contact>>,
    pub search: String,
    pub status: LoadStatus,
    pub selected_rows: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub window: Option<DateWindow>,
    pub current_sales: Arc<Vec<Vehicle>>,
    pub past_sales: Arc<Vec<Vehicle>>,
    pub current_monthly: Arc<Vec<MonthlySales>>,
    pub past_monthly: Arc<Vec<MonthlySales>>,
    pub status: LoadStatus,
}

impl DashboardState {
    pub fn current_revenue(&self) -> i64 {
        self.current_monthly
            .iter()
            .map(|m| m.revenue)
            .fold(0, i64::saturating_add)
    }

    pub fn past_revenue(&self) -> i64 {
        self.past_monthly
            .iter()
            .map(|m| m.revenue)
            .fold(0, i64::saturating_add)
    }
}

/// Everything the view layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub session: SessionState,
    pub auth_form: AuthForm,
    pub inventory: InventoryState,
    pub contacts: ContactsState,
    pub dashboard: DashboardState,
    pub current_vehicle: Option<Arc<Vehicle>>,
    pub conflict: Option<ContactConflict>,
    pub alerts: Vec<Alert>,
    pub(crate) next_alert_id: u64,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Vehicles passing the current filter, without a round trip.
    pub fn visible_vehicles(&self) -> Vec<&Vehicle> {
        match &self.inventory.query {
            Some(query) => self
                .inventory
                .vehicles
                .iter()
                .filter(|v| query.matches(v))
                .collect(),
            None => self.inventory.vehicles.iter().collect(),
        }
    }

    pub fn selected_rows(&self, table: Table) -> &BTreeSet<String> {
        match table {
            Table::Inventory => &self.inventory.selected_rows,
            Table::Contacts => &self.contacts.selected_rows,
        }
    }

    pub(crate) fn selected_rows_mut(&mut self, table: Table) -> &mut BTreeSet<String> {
        match table {
            Table::Inventory => &mut self.inventory.selected_rows,
            Table::Contacts => &mut self.contacts.selected_rows,
        }
    }

    /// Ids present in the table's collection.
    pub(crate) fn row_ids(&self, table: Table) -> BTreeSet<String> {
        match table {
            Table::Inventory => self.inventory.vehicles.iter().map(|v| v.id.clone()).collect(),
            Table::Contacts => self.contacts.contacts.iter().map(|c| c.id.clone()).collect(),
        }
    }
}

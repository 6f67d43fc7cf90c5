// ── Reducer ──
//
// Pure `(state, intent) -> state`. Malformed input is rejected with
// `InvariantViolation` and leaves the previous snapshot in place.

use std::sync::Arc;

use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::intent::Intent;
use crate::model::{Alert, DateWindow, LoadStatus, Table, Vehicle};
use crate::query::QueryView;

use super::state::{AppState, ContactsState, DashboardState, InventoryState};

pub(crate) fn reduce(
    state: &AppState,
    intent: Intent,
    config: &CoreConfig,
) -> Result<AppState, CoreError> {
    let mut next = state.clone();

    match intent {
        // ── Session ──────────────────────────────────────────────────
        Intent::LoginStarted => {
            next.auth_form.submitting = true;
            next.auth_form.error = None;
        }
        Intent::LoginSucceeded {
            user,
            session_marker,
        } => {
            next.auth_form.submitting = false;
            next.auth_form.error = None;
            next.session.user = Some(user);
            next.session.marker = session_marker;
        }
        Intent::LoginFailed { message } => {
            next.auth_form.submitting = false;
            next.auth_form.error = Some(message);
        }
        Intent::SessionRestored {
            user,
            session_marker,
        } => {
            next.session.user = Some(user);
            next.session.marker = session_marker;
        }
        Intent::Logout | Intent::SessionLost => sign_out(&mut next),
        Intent::SetAuthMode(mode) => {
            next.auth_form.mode = mode;
            next.auth_form.error = None;
        }

        // ── Inventory ────────────────────────────────────────────────
        Intent::InventoryLoading => next.inventory.status = LoadStatus::Loading,
        Intent::InventoryLoaded(vehicles) => {
            let query = QueryView::rebuild_from_collection(&vehicles, config.vocabulary.clone());
            next.inventory.query = Some(Arc::new(query));
            next.inventory.generation += 1;
            next.inventory.vehicles = Arc::new(vehicles);
            next.inventory.status = LoadStatus::Ready;
            prune_rows(&mut next, Table::Inventory);
        }
        Intent::InventorySearchLoaded(vehicles) => {
            next.inventory.vehicles = Arc::new(vehicles);
            next.inventory.status = LoadStatus::Ready;
            prune_rows(&mut next, Table::Inventory);
        }
        Intent::InventoryFailed => next.inventory.status = LoadStatus::Failed,
        Intent::ToggleFacetValue { facet, value } => {
            update_query(&mut next, |q| q.toggle_facet_value(facet, &value))?;
        }
        Intent::ToggleAllFacet(facet) => {
            update_query(&mut next, |q| Ok(q.toggle_all_facet(facet)))?;
        }
        Intent::SetRange { field, low, high } => {
            let clamp = config.clamp_ranges;
            update_query(&mut next, |q| {
                let (low, high) = if clamp {
                    q.range(field).clamp(low, high)
                } else {
                    (low, high)
                };
                q.set_range(field, low, high)
            })?;
        }
        Intent::SetInventorySearch(text) => {
            update_query(&mut next, |q| Ok(q.set_search(text)))?;
        }
        Intent::ClearFilters => update_query(&mut next, |q| Ok(q.clear()))?,
        Intent::TeardownQueryView => next.inventory.query = None,
        Intent::SetCurrentVehicle(vehicle) => next.current_vehicle = Some(Arc::new(vehicle)),
        Intent::ClearCurrentVehicle => next.current_vehicle = None,
        Intent::CurrentVehicleImagesLoaded { vehicle_id, images } => {
            if let Some(current) = next.current_vehicle.as_ref().filter(|v| v.id == vehicle_id) {
                let mut vehicle = Vehicle::clone(current);
                vehicle.images = images;
                next.current_vehicle = Some(Arc::new(vehicle));
            }
        }

        // ── Contacts ─────────────────────────────────────────────────
        Intent::ContactsLoading => next.contacts.status = LoadStatus::Loading,
        Intent::ContactsLoaded(contacts) => {
            next.contacts.contacts = Arc::new(contacts);
            next.contacts.status = LoadStatus::Ready;
            prune_rows(&mut next, Table::Contacts);
        }
        Intent::ContactsFailed => next.contacts.status = LoadStatus::Failed,
        Intent::SetContactSearch(text) => next.contacts.search = text,
        Intent::ContactConflict(conflict) => next.conflict = Some(conflict),
        Intent::DismissConflict => next.conflict = None,

        // ── Dashboard ────────────────────────────────────────────────
        Intent::InitDashboardWindow(window) => {
            check_window(&window)?;
            next.dashboard.window = Some(window);
        }
        Intent::SetDateRange { start, end } => {
            let past_range = next
                .dashboard
                .window
                .map_or(config.default_past_range, |w| w.past_range);
            let window = DateWindow {
                start,
                end,
                past_range,
            };
            check_window(&window)?;
            next.dashboard.window = Some(window);
        }
        Intent::SetPastRange(past_range) => {
            let Some(window) = next.dashboard.window else {
                return Err(CoreError::invariant("dashboard window is not set"));
            };
            let window = DateWindow {
                past_range,
                ..window
            };
            check_window(&window)?;
            next.dashboard.window = Some(window);
        }
        Intent::DashboardLoading => next.dashboard.status = LoadStatus::Loading,
        Intent::SalesLoaded { current, past } => {
            next.dashboard.current_sales = Arc::new(current);
            next.dashboard.past_sales = Arc::new(past);
        }
        Intent::MonthlySalesLoaded { current, past } => {
            next.dashboard.current_monthly = Arc::new(current);
            next.dashboard.past_monthly = Arc::new(past);
            next.dashboard.status = LoadStatus::Ready;
        }
        Intent::DashboardFailed => next.dashboard.status = LoadStatus::Failed,

        // ── Row selection ────────────────────────────────────────────
        Intent::ToggleRow { table, id } => {
            if !next.row_ids(table).contains(&id) {
                return Err(CoreError::invariant(format!("no {table} row with id '{id}'")));
            }
            let rows = next.selected_rows_mut(table);
            if !rows.remove(&id) {
                rows.insert(id);
            }
        }
        Intent::SetAllRows { table, selected } => {
            let ids = if selected {
                next.row_ids(table)
            } else {
                Default::default()
            };
            *next.selected_rows_mut(table) = ids;
        }
        Intent::ClearRows(table) => next.selected_rows_mut(table).clear(),

        // ── Alerts ───────────────────────────────────────────────────
        Intent::RaiseAlert { level, message } => {
            next.next_alert_id += 1;
            next.alerts.push(Alert {
                id: next.next_alert_id,
                level,
                message,
            });
        }
        Intent::DismissAlert(id) => next.alerts.retain(|a| a.id != id),
    }

    Ok(next)
}

/// Drop the session and everything fetched under it. Alerts and the
/// auth form mode survive.
fn sign_out(state: &mut AppState) {
    let generation = state.inventory.generation + 1;

    state.session = Default::default();
    state.auth_form.submitting = false;
    state.inventory = InventoryState {
        generation,
        ..InventoryState::default()
    };
    state.contacts = ContactsState::default();
    state.dashboard = DashboardState::default();
    state.current_vehicle = None;
    state.conflict = None;
}

fn update_query<F>(state: &mut AppState, f: F) -> Result<(), CoreError>
where
    F: FnOnce(QueryView) -> Result<QueryView, CoreError>,
{
    let Some(current) = state.inventory.query.as_ref() else {
        return Err(CoreError::invariant("query view is torn down"));
    };
    let updated = f(QueryView::clone(current))?;
    // An unchanged view keeps its identity so nothing re-fires.
    if updated != **current {
        state.inventory.query = Some(Arc::new(updated));
    }
    Ok(())
}

fn prune_rows(state: &mut AppState, table: Table) {
    let ids = state.row_ids(table);
    state.selected_rows_mut(table).retain(|id| ids.contains(id));
}

fn check_window(window: &DateWindow) -> Result<(), CoreError> {
    if window.start > window.end {
        return Err(CoreError::invariant(format!(
            "dashboard window starts {} after it ends {}",
            window.start, window.end
        )));
    }
    if window.past_range == 0 {
        return Err(CoreError::invariant("past range must be at least one year"));
    }
    Ok(())
}

// ── Trigger catalogue ──
//
// Evaluated in this order after every transition.

use std::sync::Arc;

use chrono::Utc;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::warn;

use crate::controller::Controller;
use crate::intent::Intent;
use crate::model::DateWindow;
use crate::store::AppState;

use super::{Concern, PendingRequest, Trigger, effects};

pub(super) fn catalogue() -> Vec<Trigger> {
    vec![
        Trigger {
            name: "session_activation",
            concern: None,
            predicate: session_activated,
            effect: bootstrap,
        },
        Trigger {
            name: "dashboard_range",
            concern: Some(Concern::Dashboard),
            predicate: dashboard_window_changed,
            effect: reload_dashboard,
        },
        Trigger {
            name: "vehicle_images",
            concern: None,
            predicate: vehicle_opened,
            effect: fetch_images,
        },
        Trigger {
            name: "inventory_search",
            concern: Some(Concern::InventorySearch),
            predicate: filters_changed,
            effect: search_inventory,
        },
        Trigger {
            name: "contact_search",
            concern: Some(Concern::ContactSearch),
            predicate: contact_search_changed,
            effect: search_contacts,
        },
    ]
}

// ── Predicates ───────────────────────────────────────────────────────

fn session_activated(previous: &AppState, next: &AppState) -> bool {
    !previous.is_active() && next.is_active()
}

fn dashboard_window_changed(previous: &AppState, next: &AppState) -> bool {
    if !(previous.is_authenticated() && next.is_authenticated()) {
        return false;
    }
    next.dashboard.window.is_some() && previous.dashboard.window != next.dashboard.window
}

fn vehicle_opened(previous: &AppState, next: &AppState) -> bool {
    previous.current_vehicle.is_none() && next.current_vehicle.is_some()
}

/// A filter edit: same rebuild generation, new view identity.
fn filters_changed(previous: &AppState, next: &AppState) -> bool {
    if !next.is_authenticated() || previous.inventory.generation != next.inventory.generation {
        return false;
    }
    match (&previous.inventory.query, &next.inventory.query) {
        (Some(before), Some(after)) => !Arc::ptr_eq(before, after),
        _ => false,
    }
}

fn contact_search_changed(previous: &AppState, next: &AppState) -> bool {
    next.is_authenticated() && previous.contacts.search != next.contacts.search
}

// ── Effects ──────────────────────────────────────────────────────────

/// Seed the dashboard window, then load inventory and contacts side by
/// side. Seeding the window fires the range trigger, which loads the
/// dashboard.
fn bootstrap(
    ctrl: Controller,
    _state: Arc<AppState>,
    _request: Option<PendingRequest>,
) -> BoxFuture<'static, ()> {
    async move {
        let past_range = ctrl.config().default_past_range;
        let Some(window) = DateWindow::year_to_date(Utc::now(), past_range) else {
            warn!("could not derive the default dashboard window");
            return;
        };
        if let Err(err) = ctrl.dispatch(Intent::InitDashboardWindow(window)) {
            warn!(error = %err, "could not seed dashboard window");
            return;
        }

        let inventory = ctrl.begin(Concern::InventorySearch);
        let contacts = ctrl.begin(Concern::ContactSearch);

        tokio::join!(
            effects::sync_inventory(&ctrl, &inventory),
            effects::sync_contacts(&ctrl, &contacts, String::new()),
        );
    }
    .boxed()
}

fn reload_dashboard(
    ctrl: Controller,
    state: Arc<AppState>,
    request: Option<PendingRequest>,
) -> BoxFuture<'static, ()> {
    async move {
        if let (Some(request), Some(window)) = (request, state.dashboard.window) {
            effects::sync_dashboard(&ctrl, &request, window).await;
        }
    }
    .boxed()
}

fn fetch_images(
    ctrl: Controller,
    state: Arc<AppState>,
    _request: Option<PendingRequest>,
) -> BoxFuture<'static, ()> {
    async move {
        let Some(vehicle) = state.current_vehicle.as_ref() else {
            return;
        };
        let cancel = ctrl.shutdown_token().child_token();
        effects::load_images(&ctrl, vehicle.id.clone(), cancel).await;
    }
    .boxed()
}

fn search_inventory(
    ctrl: Controller,
    state: Arc<AppState>,
    request: Option<PendingRequest>,
) -> BoxFuture<'static, ()> {
    async move {
        if let (Some(request), Some(query)) = (request, state.inventory.query.as_ref()) {
            effects::search_inventory(&ctrl, &request, query.to_search_params()).await;
        }
    }
    .boxed()
}

fn search_contacts(
    ctrl: Controller,
    state: Arc<AppState>,
    request: Option<PendingRequest>,
) -> BoxFuture<'static, ()> {
    async move {
        if let Some(request) = request {
            let search = state.contacts.search.clone();
            effects::sync_contacts(&ctrl, &request, search).await;
        }
    }
    .boxed()
}

// ── Effect bodies ──
//
// Fetch, then ingest through the controller's guarded path. Every
// failure stops here: cancellations vanish, a 401 ends the session, and
// anything else becomes one alert plus a `Failed` status.

use futures_util::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::controller::Controller;
use crate::error::CoreError;
use crate::intent::Intent;
use crate::model::{DateWindow, InventorySearch, MonthlySales, SalesWindow, monthly_windows};

use super::PendingRequest;

// ── Inventory ────────────────────────────────────────────────────────

/// Full load; the store rebuilds the query view from the result.
pub(crate) async fn sync_inventory(ctrl: &Controller, request: &PendingRequest) {
    ctrl.ingest(request, [Intent::InventoryLoading]);
    match ctrl.backend().list_vehicles(request.token()).await {
        Ok(vehicles) => {
            debug!(count = vehicles.len(), "inventory loaded");
            ctrl.ingest(request, [Intent::InventoryLoaded(vehicles)]);
        }
        Err(err) => report(ctrl, Some(request), Some(Intent::InventoryFailed), err),
    }
}

/// Faceted search; replaces the collection, keeps the query view.
pub(crate) async fn search_inventory(
    ctrl: &Controller,
    request: &PendingRequest,
    params: InventorySearch,
) {
    ctrl.ingest(request, [Intent::InventoryLoading]);
    match ctrl
        .backend()
        .search_vehicles(&params, request.token())
        .await
    {
        Ok(vehicles) => {
            debug!(count = vehicles.len(), request = request.id(), "search results");
            ctrl.ingest(request, [Intent::InventorySearchLoaded(vehicles)]);
        }
        Err(err) => report(ctrl, Some(request), Some(Intent::InventoryFailed), err),
    }
}

/// Lazy image load for the vehicle in the detail slot.
pub(crate) async fn load_images(ctrl: &Controller, vehicle_id: String, cancel: CancellationToken) {
    match ctrl.backend().vehicle_images(&vehicle_id, &cancel).await {
        Ok(images) => {
            let intent = Intent::CurrentVehicleImagesLoaded { vehicle_id, images };
            if let Err(err) = ctrl.dispatch(intent) {
                warn!(error = %err, "could not merge vehicle images");
            }
        }
        Err(err) => report(ctrl, None, None, err),
    }
}

// ── Contacts ─────────────────────────────────────────────────────────

/// List all contacts, or search when `search` is non-empty.
pub(crate) async fn sync_contacts(ctrl: &Controller, request: &PendingRequest, search: String) {
    ctrl.ingest(request, [Intent::ContactsLoading]);
    let backend = ctrl.backend();
    let result = if search.is_empty() {
        backend.list_contacts(request.token()).await
    } else {
        backend.search_contacts(&search, request.token()).await
    };
    match result {
        Ok(contacts) => {
            ctrl.ingest(request, [Intent::ContactsLoaded(contacts)]);
        }
        Err(err) => report(ctrl, Some(request), Some(Intent::ContactsFailed), err),
    }
}

// ── Dashboard ────────────────────────────────────────────────────────

/// Current and past sales plus their monthly breakdowns, fetched
/// together and ingested only if all succeed.
pub(crate) async fn sync_dashboard(ctrl: &Controller, request: &PendingRequest, window: DateWindow) {
    ctrl.ingest(request, [Intent::DashboardLoading]);
    match fetch_dashboard(&**ctrl.backend(), &window, request.token()).await {
        Ok([sales, monthly]) => {
            ctrl.ingest(request, [sales, monthly]);
        }
        Err(err) => report(ctrl, Some(request), Some(Intent::DashboardFailed), err),
    }
}

async fn fetch_dashboard(
    backend: &dyn Backend,
    window: &DateWindow,
    cancel: &CancellationToken,
) -> Result<[Intent; 2], CoreError> {
    let current = window.current();
    let past = window
        .past()
        .ok_or_else(|| CoreError::invariant("comparison window is out of range"))?;

    let (current_sales, past_sales, current_monthly, past_monthly) = tokio::try_join!(
        backend.vehicle_sales(current, cancel),
        backend.vehicle_sales(past, cancel),
        monthly_sales(backend, current, cancel),
        monthly_sales(backend, past, cancel),
    )?;

    Ok([
        Intent::SalesLoaded {
            current: current_sales,
            past: past_sales,
        },
        Intent::MonthlySalesLoaded {
            current: current_monthly,
            past: past_monthly,
        },
    ])
}

/// One sub-fetch per calendar month of `window`.
async fn monthly_sales(
    backend: &dyn Backend,
    window: SalesWindow,
    cancel: &CancellationToken,
) -> Result<Vec<MonthlySales>, CoreError> {
    let fetches = monthly_windows(window).into_iter().map(|month| async move {
        let sold = backend.vehicle_sales(month, cancel).await?;
        Ok::<_, CoreError>(MonthlySales::from_sales(month, &sold))
    });
    try_join_all(fetches).await
}

// ── Failure routing ──────────────────────────────────────────────────

/// Turn an effect failure into state.
///
/// A superseded request stays silent even when its fetch ignored the
/// token and failed late.
pub(crate) fn report(
    ctrl: &Controller,
    request: Option<&PendingRequest>,
    failed: Option<Intent>,
    err: CoreError,
) {
    if matches!(err, CoreError::Cancelled) || request.is_some_and(|r| !r.is_live()) {
        debug!(error = %err, "dropping result of superseded request");
        return;
    }

    if matches!(err, CoreError::SessionExpired) {
        info!("backend rejected the session");
        if let Err(err) = ctrl.dispatch(Intent::SessionLost) {
            warn!(error = %err, "could not clear session");
        }
        return;
    }

    warn!(error = %err, "effect failed");
    let intents = failed
        .into_iter()
        .chain(std::iter::once(Intent::error_alert(err.alert_message())));

    match request {
        Some(request) => {
            ctrl.ingest(request, intents);
        }
        None => {
            for intent in intents {
                if let Err(err) = ctrl.dispatch(intent) {
                    warn!(error = %err, "could not record failure");
                }
            }
        }
    }
}

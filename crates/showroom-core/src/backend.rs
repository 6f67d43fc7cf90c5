// ── Backend seam ──
//
// Everything the controller needs from the dealership backend, behind a
// dyn-compatible trait so tests can script responses and resolution
// order. Reads take a cancellation token; writes are never superseded.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use showroom_api::ApiClient;

use crate::error::CoreError;
use crate::model::{
    Contact, ContactDraft, Credentials, InventorySearch, Registration, SalesWindow, User, Vehicle,
    VehicleDraft, VehicleImage,
};

/// Asynchronous dealership backend.
///
/// Returns `BoxFuture` rather than `async fn` so it can live behind
/// `Arc<dyn Backend>`.
pub trait Backend: Send + Sync {
    /// Whether a session marker (cookie) is currently held.
    fn has_session(&self) -> bool;

    // ── Auth ─────────────────────────────────────────────────────────

    fn login<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<User, CoreError>>;

    fn register<'a>(
        &'a self,
        registration: &'a Registration,
    ) -> BoxFuture<'a, Result<User, CoreError>>;

    fn logout(&self) -> BoxFuture<'_, Result<(), CoreError>>;

    // ── Inventory ────────────────────────────────────────────────────

    fn list_vehicles<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>>;

    fn search_vehicles<'a>(
        &'a self,
        query: &'a InventorySearch,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>>;

    /// Vehicles sold inside `window`.
    fn vehicle_sales<'a>(
        &'a self,
        window: SalesWindow,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>>;

    fn vehicle_images<'a>(
        &'a self,
        vehicle_id: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<VehicleImage>, CoreError>>;

    fn add_vehicle<'a>(&'a self, draft: &'a VehicleDraft)
    -> BoxFuture<'a, Result<Vehicle, CoreError>>;

    fn update_vehicle<'a>(
        &'a self,
        id: &'a str,
        draft: &'a VehicleDraft,
    ) -> BoxFuture<'a, Result<Vehicle, CoreError>>;

    fn delete_vehicles<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>>;

    // ── Contacts ─────────────────────────────────────────────────────

    fn list_contacts<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>>;

    fn search_contacts<'a>(
        &'a self,
        search: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>>;

    fn add_contact<'a>(&'a self, draft: &'a ContactDraft)
    -> BoxFuture<'a, Result<Contact, CoreError>>;

    fn update_contact<'a>(
        &'a self,
        id: &'a str,
        draft: &'a ContactDraft,
    ) -> BoxFuture<'a, Result<Contact, CoreError>>;

    /// Fails with [`CoreError::ContactConflict`] when a contact is still
    /// a vehicle's buyer.
    fn delete_contacts<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>>;
}

// ── REST implementation ──────────────────────────────────────────────

impl Backend for ApiClient {
    fn has_session(&self) -> bool {
        self.session_cookie().is_some()
    }

    fn login<'a>(&'a self, credentials: &'a Credentials) -> BoxFuture<'a, Result<User, CoreError>> {
        async move { Ok(ApiClient::login(self, credentials).await?) }.boxed()
    }

    fn register<'a>(
        &'a self,
        registration: &'a Registration,
    ) -> BoxFuture<'a, Result<User, CoreError>> {
        async move { Ok(ApiClient::register(self, registration).await?) }.boxed()
    }

    fn logout(&self) -> BoxFuture<'_, Result<(), CoreError>> {
        async move { Ok(ApiClient::logout(self).await?) }.boxed()
    }

    fn list_vehicles<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move { Ok(ApiClient::list_vehicles(self, cancel).await?) }.boxed()
    }

    fn search_vehicles<'a>(
        &'a self,
        query: &'a InventorySearch,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move { Ok(ApiClient::search_vehicles(self, query, cancel).await?) }.boxed()
    }

    fn vehicle_sales<'a>(
        &'a self,
        window: SalesWindow,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move { Ok(ApiClient::vehicle_sales(self, &window, cancel).await?) }.boxed()
    }

    fn vehicle_images<'a>(
        &'a self,
        vehicle_id: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<VehicleImage>, CoreError>> {
        async move { Ok(ApiClient::vehicle_images(self, vehicle_id, cancel).await?) }.boxed()
    }

    fn add_vehicle<'a>(
        &'a self,
        draft: &'a VehicleDraft,
    ) -> BoxFuture<'a, Result<Vehicle, CoreError>> {
        async move { Ok(ApiClient::add_vehicle(self, draft).await?) }.boxed()
    }

    fn update_vehicle<'a>(
        &'a self,
        id: &'a str,
        draft: &'a VehicleDraft,
    ) -> BoxFuture<'a, Result<Vehicle, CoreError>> {
        async move { Ok(ApiClient::update_vehicle(self, id, draft).await?) }.boxed()
    }

    fn delete_vehicles<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>> {
        async move { Ok(ApiClient::delete_vehicles(self, ids).await?) }.boxed()
    }

    fn list_contacts<'a>(
        &'a self,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>> {
        async move { Ok(ApiClient::list_contacts(self, cancel).await?) }.boxed()
    }

    fn search_contacts<'a>(
        &'a self,
        search: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>> {
        async move { Ok(ApiClient::search_contacts(self, search, cancel).await?) }.boxed()
    }

    fn add_contact<'a>(
        &'a self,
        draft: &'a ContactDraft,
    ) -> BoxFuture<'a, Result<Contact, CoreError>> {
        async move { Ok(ApiClient::add_contact(self, draft).await?) }.boxed()
    }

    fn update_contact<'a>(
        &'a self,
        id: &'a str,
        draft: &'a ContactDraft,
    ) -> BoxFuture<'a, Result<Contact, CoreError>> {
        async move { Ok(ApiClient::update_contact(self, id, draft).await?) }.boxed()
    }

    fn delete_contacts<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>> {
        async move { Ok(ApiClient::delete_contacts(self, ids).await?) }.boxed()
    }
}

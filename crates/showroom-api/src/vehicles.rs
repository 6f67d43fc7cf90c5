// Vehicle endpoints
//
// Inventory listing, faceted search, sales windows, lazy image loading,
// and CRUD. Read calls take a cancellation token so a superseded fetch
// can be abandoned by the caller.

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{InventorySearch, SalesWindow, Vehicle, VehicleDraft, VehicleImage};

impl ApiClient {
    /// `GET /api/vehicle`
    pub async fn list_vehicles(&self, cancel: &CancellationToken) -> Result<Vec<Vehicle>, Error> {
        let url = self.api_url("vehicle")?;
        debug!("listing inventory");
        self.send(self.http().get(url), cancel).await
    }

    /// `POST /api/vehicle/search`
    pub async fn search_vehicles(
        &self,
        query: &InventorySearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vehicle>, Error> {
        let url = self.api_url("vehicle/search")?;
        debug!(search = %query.search, makes = query.makes.len(), "searching inventory");
        self.send(self.http().post(url).json(query), cancel).await
    }

    /// `POST /api/vehicle/sales`: vehicles sold inside the window.
    pub async fn vehicle_sales(
        &self,
        window: &SalesWindow,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vehicle>, Error> {
        let url = self.api_url("vehicle/sales")?;
        debug!(start = %window.start_date, end = %window.end_date, "fetching sales");
        self.send(self.http().post(url).json(window), cancel).await
    }

    /// `GET /api/vehicle/{id}/images`
    pub async fn vehicle_images(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<VehicleImage>, Error> {
        let url = self.api_url(&format!("vehicle/{id}/images"))?;
        debug!(vehicle = id, "fetching vehicle images");
        self.send(self.http().get(url), cancel).await
    }

    /// `POST /api/vehicle/add`
    pub async fn add_vehicle(&self, draft: &VehicleDraft) -> Result<Vehicle, Error> {
        let url = self.api_url("vehicle/add")?;
        let request = self.http().post(url).json(draft);
        self.send(request, &CancellationToken::new()).await
    }

    /// `POST /api/vehicle/update/{id}`
    pub async fn update_vehicle(&self, id: &str, draft: &VehicleDraft) -> Result<Vehicle, Error> {
        let url = self.api_url(&format!("vehicle/update/{id}"))?;
        let request = self.http().post(url).json(draft);
        self.send(request, &CancellationToken::new()).await
    }

    /// `POST /api/vehicle/delete`
    pub async fn delete_vehicles(&self, ids: &[String]) -> Result<(), Error> {
        let url = self.api_url("vehicle/delete")?;
        let request = self.http().post(url).json(&json!({ "vehicleIds": ids }));
        self.send_empty(request, &CancellationToken::new()).await
    }
}

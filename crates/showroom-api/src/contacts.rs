// Contact endpoints
//
// Listing, text search, and CRUD. Deleting contacts that are still
// referenced as buyers answers 409 with a structured conflict body,
// surfaced as `Error::Conflict`.

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Contact, ContactDraft};

impl ApiClient {
    /// `GET /api/contact`
    pub async fn list_contacts(&self, cancel: &CancellationToken) -> Result<Vec<Contact>, Error> {
        let url = self.api_url("contact")?;
        debug!("listing contacts");
        self.send(self.http().get(url), cancel).await
    }

    /// `POST /api/contact/search`
    pub async fn search_contacts(
        &self,
        search: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Contact>, Error> {
        let url = self.api_url("contact/search")?;
        debug!(search, "searching contacts");
        let request = self.http().post(url).json(&json!({ "search": search }));
        self.send(request, cancel).await
    }

    /// `POST /api/contact/add`
    pub async fn add_contact(&self, draft: &ContactDraft) -> Result<Contact, Error> {
        let url = self.api_url("contact/add")?;
        let request = self.http().post(url).json(draft);
        self.send(request, &CancellationToken::new()).await
    }

    /// `POST /api/contact/update/{id}`
    pub async fn update_contact(&self, id: &str, draft: &ContactDraft) -> Result<Contact, Error> {
        let url = self.api_url(&format!("contact/update/{id}"))?;
        let request = self.http().post(url).json(draft);
        self.send(request, &CancellationToken::new()).await
    }

    /// `POST /api/contact/delete`
    pub async fn delete_contacts(&self, ids: &[String]) -> Result<(), Error> {
        let url = self.api_url("contact/delete")?;
        debug!(count = ids.len(), "deleting contacts");
        let request = self.http().post(url).json(&json!({ "contactIds": ids }));
        self.send_empty(request, &CancellationToken::new()).await
    }
}

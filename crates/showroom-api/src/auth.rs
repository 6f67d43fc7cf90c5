// Session authentication
//
// Cookie-based login/register/logout. A successful login stores the
// session cookie in the client's jar; later requests reuse it.

use secrecy::ExposeSecret;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Credentials, Registration, User};

impl ApiClient {
    /// `POST /api/auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<User, Error> {
        let url = self.api_url("auth/login")?;
        debug!(email = %credentials.email, "logging in");

        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });

        let request = self.http().post(url).json(&body);
        self.send(request, &CancellationToken::new()).await
    }

    /// `POST /api/auth/register`
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let url = self.api_url("auth/register")?;
        debug!(email = %registration.email, "registering account");

        let body = json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password.expose_secret(),
            "dealership": registration.dealership,
        });

        let request = self.http().post(url).json(&body);
        self.send(request, &CancellationToken::new()).await
    }

    /// `DELETE /api/auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("auth/logout")?;
        debug!("logging out");
        let request = self.http().delete(url);
        self.send_empty(request, &CancellationToken::new()).await
    }
}

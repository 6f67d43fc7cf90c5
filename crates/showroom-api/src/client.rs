// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction, status mapping, and
// cooperative cancellation. Endpoint groups (auth, vehicles, contacts)
// are inherent methods in their own modules.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ContactConflict;
use crate::transport::{Transport, TransportConfig};

/// Raw HTTP client for the dealership backend.
///
/// Every request races against a [`CancellationToken`]; a fired token
/// resolves the call with [`Error::Cancelled`] and drops the in-flight
/// response future.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_jar: Option<Arc<Jar>>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let Transport { http, jar } = transport.connect()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar: Some(jar),
        })
    }

    /// Create a client around a pre-built `reqwest::Client` (no cookie access).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            cookie_jar: None,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session cookie ───────────────────────────────────────────────

    /// The `Cookie` header value currently held for the backend, if any.
    pub fn session_cookie(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let value = jar.cookies(&self.base_url)?;
        value.to_str().ok().map(str::to_owned)
    }

    /// Seed the jar with a cookie persisted by a previous process.
    pub fn restore_session_cookie(&self, cookie: &str) {
        if let Some(ref jar) = self.cookie_jar {
            for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &self.base_url);
            }
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request and decode a JSON body, honoring `cancel`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<T, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("request cancelled before completion");
                Err(Error::Cancelled)
            }
            result = self.execute(request) => result,
        }
    }

    /// Send a request whose response body is ignored on success.
    pub(crate) async fn send_empty(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let _: serde_json::Value = self.send(request, cancel).await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        if status == StatusCode::CONFLICT {
            if let Ok(conflict) = serde_json::from_str::<ContactConflict>(&body) {
                return Err(Error::Conflict(conflict));
            }
        }

        if !status.is_success() {
            let message = serde_json::from_str::<MessageBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Some endpoints answer with an empty body (logout, delete).
        let body = if body.trim().is_empty() {
            "null".to_owned()
        } else {
            body
        };

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

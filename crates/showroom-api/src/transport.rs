// ── HTTP transport ──
//
// The backend keeps the session in a cookie, so every transport owns a
// jar. Pass one in to share a session between clients.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;
use reqwest::cookie::Jar;

use crate::error::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("showroom/", env!("CARGO_PKG_VERSION"));

/// How the backend's certificate is checked.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    #[default]
    System,
    /// Trust the CA bundle in this PEM file on top of the system store.
    CustomCa(PathBuf),
    /// Skip verification. Only for self-signed staging backends.
    AcceptInvalid,
}

impl TlsMode {
    fn configure(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        match self {
            Self::System => Ok(builder),
            Self::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("cannot read CA bundle {}: {e}", path.display()))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))?;
                Ok(builder.add_root_certificate(cert))
            }
            Self::AcceptInvalid => Ok(builder.danger_accept_invalid_certs(true)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout. Expiry surfaces as a transient failure.
    pub timeout: Duration,
    /// Jar to keep the session cookie in. A fresh one is made when unset.
    pub session_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            session_jar: None,
        }
    }
}

impl TransportConfig {
    pub fn with_session_jar(mut self, jar: Arc<Jar>) -> Self {
        self.session_jar = Some(jar);
        self
    }

    /// Build the HTTP client together with the jar its session lives in.
    pub fn connect(&self) -> Result<Transport, Error> {
        let jar: Arc<Jar> = self.session_jar.clone().unwrap_or_default();
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&jar));

        let http = self
            .tls
            .configure(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("could not build the HTTP client: {e}")))?;
        Ok(Transport { http, jar })
    }
}

/// A built client and the cookie jar it reads and writes.
#[derive(Clone)]
pub struct Transport {
    pub http: reqwest::Client,
    pub jar: Arc<Jar>,
}

//! Building a `Controller` for one CLI invocation and carrying the
//! backend session across invocations via the session cache.

use std::sync::Arc;

use tracing::{debug, warn};

use showroom_api::ApiClient;
use showroom_config::{CachedSession, SessionCache};
use showroom_core::{AppState, Backend, Controller, CoreError, LoadStatus, User};

use crate::cli::GlobalOpts;
use crate::config::{self, ResolvedProfile};
use crate::error::CliError;
use crate::output;

/// A controller wired to the active profile's backend.
pub struct Session {
    pub resolved: ResolvedProfile,
    pub controller: Controller,
    client: Arc<ApiClient>,
    cache: SessionCache,
    color: bool,
}

impl Session {
    /// Build a controller without touching the session cache.
    pub fn connect(global: &GlobalOpts) -> Result<Self, CliError> {
        let resolved = config::resolve(global)?;
        let url = showroom_config::server_url(&resolved.profile)?;
        let transport = showroom_config::profile_transport(&resolved.profile, &resolved.defaults);
        let core_config =
            showroom_config::profile_core_config(&resolved.profile, &resolved.defaults)?;

        let client = Arc::new(ApiClient::new(url, &transport).map_err(CoreError::from)?);
        let backend: Arc<dyn Backend> = client.clone();
        let controller = Controller::new(core_config, backend);
        debug!(profile = %resolved.name, server = %resolved.profile.server, "controller ready");

        Ok(Self {
            resolved,
            controller,
            client,
            cache: SessionCache::default_location(),
            color: output::should_color(&global.color),
        })
    }

    /// Connect and resume the cached session, waiting for the initial
    /// inventory, contacts and dashboard loads.
    pub async fn resume(global: &GlobalOpts) -> Result<Self, CliError> {
        let session = Self::connect(global)?;
        let profile = session.resolved.name.clone();

        let Some(cached) = session.cache.load(&profile, &session.resolved.profile.server)? else {
            return Err(CliError::NotLoggedIn { profile });
        };
        if !cached.user.verified {
            return Err(CliError::Unverified {
                email: cached.user.email,
            });
        }

        session.client.restore_session_cookie(&cached.cookie);
        session.controller.restore_session(cached.user)?;
        session.controller.settle().await;

        if !session.controller.snapshot().is_authenticated() {
            session.cache.clear(&profile)?;
            return Err(CliError::SessionExpired { profile });
        }
        Ok(session)
    }

    /// The cached user for this profile, if any. No network.
    pub fn cached_user(&self) -> Result<Option<User>, CliError> {
        Ok(self
            .cache
            .load(&self.resolved.name, &self.resolved.profile.server)?
            .map(|cached| cached.user))
    }

    /// Put the cached cookie back on the client without restoring state.
    pub fn restore_cookie(&self) -> Result<bool, CliError> {
        match self
            .cache
            .load(&self.resolved.name, &self.resolved.profile.server)?
        {
            Some(cached) => {
                self.client.restore_session_cookie(&cached.cookie);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save the signed-in user and the client's cookie for later runs.
    pub fn persist(&self, user: &User) -> Result<(), CliError> {
        let Some(cookie) = self.client.session_cookie() else {
            warn!("backend issued no session cookie; nothing cached");
            return Ok(());
        };
        self.cache.save(
            &self.resolved.name,
            CachedSession {
                server: self.resolved.profile.server.clone(),
                user: user.clone(),
                cookie,
            },
        )?;
        Ok(())
    }

    pub fn forget(&self) -> Result<(), CliError> {
        self.cache.clear(&self.resolved.name)?;
        Ok(())
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Wait for in-flight effects, then turn a failed load into an error
    /// carrying the latest alert.
    pub async fn settled(
        &self,
        status: impl Fn(&AppState) -> LoadStatus,
    ) -> Result<Arc<AppState>, CliError> {
        self.controller.settle().await;
        let state = self.controller.snapshot();

        if !state.is_authenticated() {
            self.cache.clear(&self.resolved.name)?;
            return Err(CliError::SessionExpired {
                profile: self.resolved.name.clone(),
            });
        }
        if status(&state) == LoadStatus::Failed {
            let message = state
                .alerts
                .last()
                .map_or_else(|| "request failed".to_owned(), |a| a.message.clone());
            return Err(CliError::ApiError {
                status: "-".into(),
                message,
            });
        }
        Ok(state)
    }

    /// Print alerts raised during the run and stop the controller.
    pub async fn finish(self, quiet: bool) {
        self.controller.shutdown().await;
        if quiet {
            return;
        }
        for alert in &self.controller.snapshot().alerts {
            output::warning(&alert.message, self.color);
        }
    }
}

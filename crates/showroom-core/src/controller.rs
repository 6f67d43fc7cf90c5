// ── Controller ──
//
// Owns the store, the effect scheduler and the backend. Every transition
// runs as one serialized turn: reduce, evaluate triggers, rotate pending
// requests, spawn effects. Effects re-enter through `dispatch` or the
// liveness-guarded `ingest`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::backend::Backend;
use crate::command::{Command, CommandResult};
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::intent::Intent;
use crate::model::{Credentials, Registration, Table, User};
use crate::scheduler::{Concern, Job, PendingRequest, Scheduler, effects};
use crate::store::{AppState, Store};
use crate::stream::StateStream;
use crate::validation::validate_contact;

// ── Controller ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Must be driven from
/// inside a tokio runtime: dispatching may spawn effects.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: CoreConfig,
    backend: Arc<dyn Backend>,
    store: Store,
    scheduler: Scheduler,
    /// Serializes reduce + observe and guarded ingests.
    turn: Mutex<()>,
    tracker: TaskTracker,
    settling: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
}

impl Controller {
    pub fn new(config: CoreConfig, backend: Arc<dyn Backend>) -> Self {
        let cancel = CancellationToken::new();
        Self {
            inner: Arc::new(ControllerInner {
                config,
                backend,
                store: Store::new(),
                scheduler: Scheduler::new(cancel.clone()),
                turn: Mutex::new(()),
                tracker: TaskTracker::new(),
                settling: tokio::sync::Mutex::new(()),
                cancel,
            }),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub(crate) fn backend(&self) -> &Arc<dyn Backend> {
        &self.inner.backend
    }

    pub(crate) fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    // ── State observation ────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.inner.store.subscribe()
    }

    pub fn stream(&self) -> StateStream {
        self.inner.store.stream()
    }

    /// The live request for a concern, if one is in flight.
    pub fn pending(&self, concern: Concern) -> Option<PendingRequest> {
        self.inner.scheduler.pending().current(concern)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply an intent and start whatever effects it triggers.
    ///
    /// Malformed intents fail with `InvariantViolation` and change nothing.
    pub fn dispatch(&self, intent: Intent) -> Result<Arc<AppState>, CoreError> {
        let _turn = self.lock_turn();
        self.apply_in_turn(intent)
    }

    /// Apply `intents` only if `request` has not been superseded. The
    /// check and the writes share one turn.
    pub(crate) fn ingest<I>(&self, request: &PendingRequest, intents: I) -> bool
    where
        I: IntoIterator<Item = Intent>,
    {
        let _turn = self.lock_turn();
        if !request.is_live() {
            debug!(
                concern = %request.concern(),
                request = request.id(),
                "discarding stale result"
            );
            return false;
        }
        for intent in intents {
            if let Err(err) = self.apply_in_turn(intent) {
                warn!(error = %err, "ingest rejected");
            }
        }
        true
    }

    /// Start a fresh request for `concern`, superseding any in flight.
    pub(crate) fn begin(&self, concern: Concern) -> PendingRequest {
        let _turn = self.lock_turn();
        self.inner.scheduler.pending().rotate(concern)
    }

    fn apply_in_turn(&self, intent: Intent) -> Result<Arc<AppState>, CoreError> {
        let (previous, next) = self.inner.store.apply(intent, &self.inner.config)?;
        for job in self.inner.scheduler.observe(&previous, &next) {
            self.spawn(job, Arc::clone(&next));
        }
        Ok(next)
    }

    fn spawn(&self, job: Job, state: Arc<AppState>) {
        let span = info_span!(
            "effect",
            trigger = job.trigger,
            request = job.request.as_ref().map(PendingRequest::id)
        );
        let effect = (job.effect)(self.clone(), state, job.request);
        self.inner.tracker.spawn(effect.instrument(span));
    }

    fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.inner
            .turn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Wait until every spawned effect, including effects they chained,
    /// has finished.
    pub async fn settle(&self) {
        let _settling = self.inner.settling.lock().await;
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        self.inner.tracker.reopen();
    }

    /// Cancel every pending request and wait for effects to wind down.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.settle().await;
        debug!("controller shut down");
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn login(&self, credentials: &Credentials) -> Result<User, CoreError> {
        self.dispatch(Intent::LoginStarted)?;
        let result = self.inner.backend.login(credentials).await;
        self.finish_auth(result)
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, CoreError> {
        self.dispatch(Intent::LoginStarted)?;
        let result = self.inner.backend.register(registration).await;
        self.finish_auth(result)
    }

    /// Resume from a cached user record without a network round trip.
    pub fn restore_session(&self, user: User) -> Result<Arc<AppState>, CoreError> {
        info!(user = %user.email, "restoring cached session");
        self.dispatch(Intent::SessionRestored {
            user,
            session_marker: self.inner.backend.has_session(),
        })
    }

    /// End the session remotely (best effort) and clear local state.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(err) = self.inner.backend.logout().await {
            warn!(error = %err, "logout failed (non-fatal)");
        }
        self.dispatch(Intent::Logout)?;
        info!("logged out");
        Ok(())
    }

    fn finish_auth(&self, result: Result<User, CoreError>) -> Result<User, CoreError> {
        match result {
            Ok(user) => {
                info!(user = %user.email, verified = user.verified, "logged in");
                self.dispatch(Intent::LoginSucceeded {
                    user: user.clone(),
                    session_marker: self.inner.backend.has_session(),
                })?;
                Ok(user)
            }
            Err(err) => {
                let message = match &err {
                    CoreError::SessionExpired => "Invalid email or password".to_owned(),
                    other => other.alert_message(),
                };
                self.dispatch(Intent::LoginFailed {
                    message: message.clone(),
                })?;
                match err {
                    CoreError::Api { .. } | CoreError::SessionExpired => {
                        Err(CoreError::AuthenticationFailed { message })
                    }
                    other => Err(other),
                }
            }
        }
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a write. A 401 ends the session before the error returns.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        if !self.snapshot().is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }

        let result = route_command(self, command).await;
        if matches!(result, Err(CoreError::SessionExpired)) {
            self.dispatch(Intent::SessionLost)?;
        }
        result
    }

    async fn refresh_inventory(&self) {
        let request = self.begin(Concern::InventorySearch);
        effects::sync_inventory(self, &request).await;
    }

    async fn refresh_contacts(&self) {
        let request = self.begin(Concern::ContactSearch);
        let search = self.snapshot().contacts.search.clone();
        effects::sync_contacts(self, &request, search).await;
    }
}

// ── Command routing ──────────────────────────────────────────────────

async fn route_command(
    controller: &Controller,
    command: Command,
) -> Result<CommandResult, CoreError> {
    let backend = controller.backend();

    match command {
        // ── Contacts ─────────────────────────────────────────────────
        Command::AddContact(draft) => {
            validate_contact(&draft)?;
            let contact = backend.add_contact(&draft).await?;
            controller.refresh_contacts().await;
            Ok(CommandResult::Contact(contact))
        }

        Command::UpdateContact { id, draft } => {
            validate_contact(&draft)?;
            let contact = backend.update_contact(&id, &draft).await?;
            controller.refresh_contacts().await;
            Ok(CommandResult::Contact(contact))
        }

        Command::DeleteContacts { ids } => {
            match backend.delete_contacts(&ids).await {
                Ok(()) => {}
                Err(CoreError::ContactConflict(conflict)) => {
                    info!(
                        buyers = conflict.associated_buyer_ids.len(),
                        vehicles = conflict.associated_vehicle_ids.len(),
                        "contacts still referenced by vehicles"
                    );
                    controller.dispatch(Intent::ContactConflict(conflict.clone()))?;
                    return Err(CoreError::ContactConflict(conflict));
                }
                Err(err) => return Err(err),
            }
            controller.dispatch(Intent::DismissConflict)?;
            controller.dispatch(Intent::ClearRows(Table::Contacts))?;
            controller.refresh_contacts().await;
            Ok(CommandResult::Ok)
        }

        Command::RefreshContacts => {
            controller.refresh_contacts().await;
            Ok(CommandResult::Ok)
        }

        // ── Inventory ────────────────────────────────────────────────
        Command::AddVehicle(draft) => {
            let vehicle = backend.add_vehicle(&draft).await?;
            controller.refresh_inventory().await;
            Ok(CommandResult::Vehicle(vehicle))
        }

        Command::UpdateVehicle { id, draft } => {
            let vehicle = backend.update_vehicle(&id, &draft).await?;
            controller.refresh_inventory().await;
            Ok(CommandResult::Vehicle(vehicle))
        }

        Command::DeleteVehicles { ids } => {
            backend.delete_vehicles(&ids).await?;
            controller.dispatch(Intent::ClearRows(Table::Inventory))?;
            controller.refresh_inventory().await;
            Ok(CommandResult::Ok)
        }

        Command::RefreshInventory => {
            controller.refresh_inventory().await;
            Ok(CommandResult::Ok)
        }
    }
}

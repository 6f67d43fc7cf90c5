// ── Reactive state store ──
//
// Holds the current `AppState` snapshot in a `watch` channel. Every
// applied intent publishes a new snapshot; subscribers see each one.

mod reducer;
mod state;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::intent::Intent;
use crate::stream::StateStream;

pub use state::{AppState, AuthForm, ContactsState, DashboardState, InventoryState, SessionState};

/// Single-writer snapshot store.
///
/// Callers serialize `apply`; reads are lock-free clones of the latest
/// `Arc<AppState>`.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
}

impl Store {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(AppState::default()));
        Self { state }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    pub fn stream(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    /// Reduce `intent` over the current snapshot and publish the result.
    ///
    /// Returns `(previous, next)`. On error nothing is published.
    pub fn apply(
        &self,
        intent: Intent,
        config: &CoreConfig,
    ) -> Result<(Arc<AppState>, Arc<AppState>), CoreError> {
        let previous = self.snapshot();
        let name = intent.name();
        let next = Arc::new(reducer::reduce(&previous, intent, config)?);
        self.state.send_replace(Arc::clone(&next));
        debug!(intent = name, "state transition");
        Ok((previous, next))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

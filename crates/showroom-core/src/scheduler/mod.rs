// ── Effect scheduler ──
//
// After every transition the controller hands `(previous, next)` to the
// scheduler. Each registered trigger whose predicate holds gets a fresh
// pending request for its concern (cancelling the one it supersedes) and
// an effect to spawn. Predicates never do I/O.

pub(crate) mod effects;
mod pending;
mod triggers;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::controller::Controller;
use crate::store::AppState;

pub use pending::{Concern, PendingRequest};
pub(crate) use pending::PendingRequests;

/// Async work spawned when a trigger fires. Receives the snapshot that
/// fired it and, for concern-bound triggers, the request it owns.
pub(crate) type Effect =
    fn(Controller, Arc<AppState>, Option<PendingRequest>) -> BoxFuture<'static, ()>;

/// A declared `(predicate, effect)` pair.
pub(crate) struct Trigger {
    pub name: &'static str,
    pub concern: Option<Concern>,
    pub predicate: fn(&AppState, &AppState) -> bool,
    pub effect: Effect,
}

/// A fired trigger, ready to spawn.
pub(crate) struct Job {
    pub trigger: &'static str,
    pub effect: Effect,
    pub request: Option<PendingRequest>,
}

pub(crate) struct Scheduler {
    triggers: Vec<Trigger>,
    pending: PendingRequests,
}

impl Scheduler {
    pub fn new(root: CancellationToken) -> Self {
        Self {
            triggers: triggers::catalogue(),
            pending: PendingRequests::new(root),
        }
    }

    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Evaluate every trigger over one transition, in registration order.
    ///
    /// Must run inside the controller's turn so that superseded requests
    /// are cancelled before any later ingest is checked.
    pub fn observe(&self, previous: &AppState, next: &AppState) -> Vec<Job> {
        if previous.is_authenticated() && !next.is_authenticated() {
            self.pending.cancel_all();
        }

        self.triggers
            .iter()
            .filter(|trigger| (trigger.predicate)(previous, next))
            .map(|trigger| {
                let request = trigger.concern.map(|concern| self.pending.rotate(concern));
                debug!(
                    trigger = trigger.name,
                    request = request.as_ref().map(PendingRequest::id),
                    "trigger fired"
                );
                Job {
                    trigger: trigger.name,
                    effect: trigger.effect,
                    request,
                }
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn fired(&self, previous: &AppState, next: &AppState) -> Vec<&'static str> {
        self.triggers
            .iter()
            .filter(|trigger| (trigger.predicate)(previous, next))
            .map(|trigger| trigger.name)
            .collect()
    }
}

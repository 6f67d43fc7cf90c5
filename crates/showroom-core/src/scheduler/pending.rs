// ── Pending requests ──
//
// At most one live request per concern. Rotating a concern cancels the
// request it replaces before handing out the new one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A class of fetch that must never have two instances in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Concern {
    Dashboard,
    InventorySearch,
    ContactSearch,
}

impl Concern {
    fn slot(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::InventorySearch => 1,
            Self::ContactSearch => 2,
        }
    }
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    concern: Concern,
    id: u64,
    token: CancellationToken,
}

impl PendingRequest {
    pub fn concern(&self) -> Concern {
        self.concern
    }

    /// Monotonic across all concerns.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Not yet superseded or shut down.
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }
}

pub(crate) struct PendingRequests {
    root: CancellationToken,
    next_id: AtomicU64,
    slots: [Mutex<Option<PendingRequest>>; Concern::COUNT],
}

impl PendingRequests {
    /// Every request is a child of `root`; cancelling it cancels them all.
    pub fn new(root: CancellationToken) -> Self {
        Self {
            root,
            next_id: AtomicU64::new(1),
            slots: std::array::from_fn(|_| Mutex::new(None)),
        }
    }

    /// Cancel the concern's live request, if any, and register a new one.
    pub fn rotate(&self, concern: Concern) -> PendingRequest {
        let mut slot = self.lock(concern);

        if let Some(previous) = slot.take() {
            previous.token.cancel();
            debug!(%concern, id = previous.id, "request superseded");
        }

        let request = PendingRequest {
            concern,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: self.root.child_token(),
        };
        *slot = Some(request.clone());
        request
    }

    pub fn current(&self, concern: Concern) -> Option<PendingRequest> {
        self.lock(concern).clone()
    }

    pub fn cancel_all(&self) {
        for concern in Concern::iter() {
            if let Some(previous) = self.lock(concern).take() {
                previous.token.cancel();
                debug!(%concern, id = previous.id, "request cancelled");
            }
        }
    }

    fn lock(&self, concern: Concern) -> std::sync::MutexGuard<'_, Option<PendingRequest>> {
        self.slots[concern.slot()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cancels_previous_request() {
        let pending = PendingRequests::new(CancellationToken::new());

        let first = pending.rotate(Concern::InventorySearch);
        let second = pending.rotate(Concern::InventorySearch);

        assert!(!first.is_live());
        assert!(second.is_live());
        assert!(second.id() > first.id());
        assert_eq!(
            pending.current(Concern::InventorySearch).unwrap().id(),
            second.id()
        );
    }

    #[test]
    fn concerns_are_independent() {
        let pending = PendingRequests::new(CancellationToken::new());

        let search = pending.rotate(Concern::ContactSearch);
        let dashboard = pending.rotate(Concern::Dashboard);

        assert!(search.is_live());
        assert!(dashboard.is_live());
    }

    #[test]
    fn cancel_all_empties_every_slot() {
        let pending = PendingRequests::new(CancellationToken::new());
        let requests: Vec<_> = Concern::iter().map(|c| pending.rotate(c)).collect();

        pending.cancel_all();

        assert!(requests.iter().all(|r| !r.is_live()));
        assert!(Concern::iter().all(|c| pending.current(c).is_none()));
    }

    #[test]
    fn root_cancellation_reaches_new_requests() {
        let root = CancellationToken::new();
        let pending = PendingRequests::new(root.clone());
        root.cancel();
        assert!(!pending.rotate(Concern::Dashboard).is_live());
    }
}

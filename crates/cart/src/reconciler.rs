//! Identity-transition state machine.
//!
//! Decides, on each identity-provider update, whether to do nothing, pull
//! the remote cart and replace the ledger wholesale, or leave the local
//! cart alone while disarming future pushes. The decision logic is a pure
//! function over `(current, previous, loading)`; the side effects (spawning
//! the fetch, applying the result) live in [`crate::state`].
//!
//! On login the remote cart replaces the local one - no merge. Merging
//! would silently attribute a previous anonymous visitor's items to
//! whichever account logs in next on the same device, so correctness wins
//! over convenience here.

use rouse_core::AccountId;

use crate::identity::IdentityUpdate;

/// Where the cart sits relative to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No authenticated account; the local cart is the source of truth.
    Anonymous,
    /// A remote fetch for the current account is in flight. Pushes stay
    /// disarmed so a transient local state cannot overwrite the server cart.
    Syncing,
    /// The ledger is authoritative for the current account; pushes are armed.
    Synced,
}

/// Action decided by observing one identity update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Nothing to do: still loading, no real identity change, or a logout
    /// that only disarms sync.
    None,
    /// Start a remote fetch for `account`, tagged with the epoch it was
    /// issued under.
    BeginSync { account: AccountId, epoch: u64 },
}

/// Tracks the previously observed identity and the current sync phase.
///
/// The epoch counter is bumped on every real identity transition. A fetch
/// carries the epoch it was issued under; if the epoch has moved on by the
/// time the fetch resolves, its result is stale and must be discarded.
#[derive(Debug)]
pub(crate) struct SessionTracker {
    previous: Option<AccountId>,
    phase: SyncPhase,
    epoch: u64,
}

impl SessionTracker {
    pub(crate) const fn new() -> Self {
        Self {
            previous: None,
            phase: SyncPhase::Anonymous,
            epoch: 0,
        }
    }

    pub(crate) const fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Whether ledger changes are currently eligible to be pushed remotely.
    pub(crate) fn is_armed(&self) -> bool {
        self.phase == SyncPhase::Synced
    }

    /// Whether a fetch issued at `epoch` is still the current one.
    pub(crate) const fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Observe one identity update and decide what to do.
    ///
    /// The current identifier is recorded as the previous one *before* any
    /// fetch resolves, so a rapid second transition during an in-flight
    /// fetch is compared against the identity at call time, not the
    /// pre-transition one.
    pub(crate) fn observe(&mut self, update: &IdentityUpdate) -> Transition {
        if update.loading {
            return Transition::None;
        }

        let previous = std::mem::replace(&mut self.previous, update.account_id.clone());
        let changed = previous != update.account_id;
        if changed {
            self.epoch += 1;
        }

        match update.account_id.clone() {
            // Logout or first anonymous observation: disarm and leave the
            // local cart as-is.
            None => {
                self.phase = SyncPhase::Anonymous;
                Transition::None
            }
            // Same account re-observed (e.g. a re-render); nothing changed.
            Some(_) if !changed => Transition::None,
            // Fresh login, account switch, or reload with an existing session.
            Some(account) => {
                self.phase = SyncPhase::Syncing;
                Transition::BeginSync {
                    account,
                    epoch: self.epoch,
                }
            }
        }
    }

    /// Mark the fetch issued at `epoch` complete, arming pushes.
    ///
    /// Returns false when a later transition superseded the fetch, in which
    /// case the caller must discard its result.
    pub(crate) fn finish_sync(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch {
            return false;
        }
        self.phase = SyncPhase::Synced;
        true
    }
}

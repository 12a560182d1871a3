//! Identity-provider contract consumed by the reconciler.
//!
//! The core does not define how identity is produced (login forms, token
//! refresh) - it only reacts to the current account identifier and a
//! settled/loading flag. The application layer pushes each change into an
//! [`IdentityProvider`], which invokes its subscribers synchronously.

use std::sync::{Arc, Mutex, PoisonError};

use rouse_core::AccountId;

/// A point-in-time view of the identity provider's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUpdate {
    /// The authenticated account, or `None` when anonymous.
    pub account_id: Option<AccountId>,
    /// True while the provider has not settled yet (e.g. a session restore
    /// is still in flight). Observers take no action until it clears.
    pub loading: bool,
}

impl IdentityUpdate {
    /// The provider has not settled yet.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            account_id: None,
            loading: true,
        }
    }

    /// Settled, no authenticated account.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            account_id: None,
            loading: false,
        }
    }

    /// Settled, authenticated as `account_id`.
    #[must_use]
    pub fn authenticated(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            loading: false,
        }
    }
}

type Subscriber = Box<dyn Fn(&IdentityUpdate) + Send + Sync>;

/// Handle distributing identity updates to registered subscribers.
///
/// Cheaply cloneable; all clones share the same subscriber list and current
/// state. Subscribers run synchronously, in registration order, on the
/// thread calling [`IdentityProvider::update`].
#[derive(Clone)]
pub struct IdentityProvider {
    inner: Arc<IdentityInner>,
}

struct IdentityInner {
    current: Mutex<IdentityUpdate>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl IdentityProvider {
    /// Create a provider in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(IdentityInner {
                current: Mutex::new(IdentityUpdate::loading()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The most recently published identity state.
    #[must_use]
    pub fn current(&self) -> IdentityUpdate {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a callback invoked synchronously on every update.
    ///
    /// Registering from within a callback would deadlock; subscribe during
    /// setup, before updates start flowing.
    pub fn subscribe(&self, subscriber: impl Fn(&IdentityUpdate) + Send + Sync + 'static) {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    /// Publish a new identity state and notify all subscribers.
    pub fn update(&self, update: IdentityUpdate) {
        *self
            .inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = update.clone();

        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(&update);
        }
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_starts_loading() {
        let provider = IdentityProvider::new();
        assert_eq!(provider.current(), IdentityUpdate::loading());
    }

    #[test]
    fn test_update_notifies_subscribers_in_order() {
        let provider = IdentityProvider::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            provider.subscribe(move |update| {
                assert_eq!(update.account_id, Some(AccountId::new("acct_1")));
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        provider.update(IdentityUpdate::authenticated("acct_1"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(provider.current(), IdentityUpdate::authenticated("acct_1"));
    }
}

//! The cart state handle: mutations, persistence, and sync wiring.
//!
//! [`Cart`] is an explicitly constructed state object passed by handle to
//! the UI layer - no ambient global. All mutations apply synchronously to
//! the in-memory ledger and render immediately. The durable save and the
//! push handoff happen before the mutation's lock is released, so the
//! snapshot store and the push worker observe states in ledger order; the
//! network push itself runs on a background worker and never blocks or
//! rolls back a mutation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rouse_core::{LineItem, ProductId, ProductSnapshot};
use rust_decimal::Decimal;

use crate::identity::{IdentityProvider, IdentityUpdate};
use crate::ledger::Ledger;
use crate::reconciler::{SessionTracker, SyncPhase, Transition};
use crate::remote::{RemoteCart, RemoteCartError};
use crate::storage::{SnapshotStore, StorageBackend};
use crate::sync::{self, PushSender};

/// Client-side cart state manager.
///
/// Cheaply cloneable via `Arc`; all clones share the same ledger, drawer
/// flag, and sync session.
pub struct Cart<R: RemoteCart> {
    inner: Arc<CartInner<R>>,
}

impl<R: RemoteCart> Clone for Cart<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartInner<R> {
    core: Mutex<CartCore>,
    snapshots: SnapshotStore,
    remote: Arc<R>,
    push_tx: PushSender,
}

/// Everything mutable, under a single lock so each mutation is atomic with
/// respect to identity observations and fetch completions.
struct CartCore {
    ledger: Ledger,
    drawer_open: bool,
    session: SessionTracker,
}

impl<R: RemoteCart + 'static> Cart<R> {
    /// Create a cart handle.
    ///
    /// Loads the locally persisted anonymous cart and spawns the background
    /// push worker, so this must be called within a Tokio runtime.
    #[must_use]
    pub fn new(remote: R, storage: impl StorageBackend + 'static) -> Self {
        let snapshots = SnapshotStore::new(storage);
        let ledger = Ledger::from_items(snapshots.load());
        let remote = Arc::new(remote);
        let push_tx = sync::spawn_push_worker(Arc::clone(&remote));

        Self {
            inner: Arc::new(CartInner {
                core: Mutex::new(CartCore {
                    ledger,
                    drawer_open: false,
                    session: SessionTracker::new(),
                }),
                snapshots,
                remote,
                push_tx,
            }),
        }
    }

    /// Register this cart's reconciler with the identity provider.
    ///
    /// The transition logic runs synchronously inside each identity update;
    /// the remote fetch it may start runs as a detached task, so updates
    /// must be delivered from within the Tokio runtime.
    pub fn attach_identity(&self, identity: &IdentityProvider) {
        let inner = Arc::clone(&self.inner);
        identity.subscribe(move |update| CartInner::observe_identity(&inner, update));
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`; opens the cart drawer.
    ///
    /// If the product is already in the cart its quantity is incremented and
    /// the supplied snapshot is discarded (first-seen snapshot wins).
    pub fn add_item(&self, product: ProductSnapshot) {
        let mut core = self.inner.core();
        core.ledger.add(product);
        core.drawer_open = true;
        self.inner.after_change(&core);
    }

    /// Remove one unit of `product_id`; the line disappears at quantity zero.
    pub fn remove_item(&self, product_id: &ProductId) {
        let mut core = self.inner.core();
        core.ledger.decrement(product_id);
        self.inner.after_change(&core);
    }

    /// Remove the line for `product_id` entirely, regardless of quantity.
    pub fn delete_item(&self, product_id: &ProductId) {
        let mut core = self.inner.core();
        core.ledger.delete(product_id);
        self.inner.after_change(&core);
    }

    /// Set the quantity for `product_id` exactly; zero deletes the line.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) {
        let mut core = self.inner.core();
        core.ledger.set_quantity(product_id, quantity);
        self.inner.after_change(&core);
    }

    /// Empty the cart and purge the durable snapshot immediately.
    pub fn clear_cart(&self) {
        let mut core = self.inner.core();
        core.ledger.clear();
        // Clearing removes the durable key outright instead of writing an
        // empty list through the generic save-on-change path.
        self.inner.snapshots.clear();
        if core.session.is_armed() {
            let _ = self.inner.push_tx.send(Some(Vec::new()));
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Point-in-time copy of the line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.inner.core().ledger.items().to_vec()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.inner.core().ledger.total_items()
    }

    /// Total price across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.inner.core().ledger.total_price()
    }

    /// Current phase of the sync session.
    #[must_use]
    pub fn sync_phase(&self) -> SyncPhase {
        self.inner.core().session.phase()
    }

    // =========================================================================
    // Drawer visibility
    // =========================================================================

    /// Whether the cart drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.core().drawer_open
    }

    /// Open the cart drawer.
    pub fn open_cart(&self) {
        self.inner.core().drawer_open = true;
    }

    /// Close the cart drawer.
    pub fn close_cart(&self) {
        self.inner.core().drawer_open = false;
    }
}

impl<R: RemoteCart + 'static> CartInner<R> {
    fn core(&self) -> MutexGuard<'_, CartCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the new full state and, when armed, hand it to the push
    /// worker. Called with the core lock still held: the save and the
    /// channel send are ordered by the lock, so a slow save cannot let a
    /// later mutation's state be overwritten by an earlier one. The send
    /// never blocks; the network push happens on the worker.
    fn after_change(&self, core: &CartCore) {
        self.snapshots.save(core.ledger.items());
        if core.session.is_armed() {
            // Send only fails when the worker is gone at shutdown.
            let _ = self.push_tx.send(Some(core.ledger.items().to_vec()));
        }
    }

    /// Reconciler callback body: decide the transition, then run its side
    /// effects. Called synchronously on every identity update.
    fn observe_identity(inner: &Arc<Self>, update: &IdentityUpdate) {
        let transition = inner.core().session.observe(update);
        let Transition::BeginSync { account, epoch } = transition else {
            return;
        };

        tracing::debug!(account = %account, "identity transition, fetching remote cart");
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let fetched = inner.remote.fetch().await;
            inner.apply_fetch_result(fetched, epoch);
        });
    }

    /// Apply the outcome of the fetch issued at `epoch`.
    ///
    /// Success replaces the ledger wholesale with the server's cart; failure
    /// replaces it with an empty one so stale or foreign data is never left
    /// visible. Either way the session is armed afterwards, so future local
    /// mutations push and self-heal the server state. A result whose epoch
    /// has been superseded by a later transition is discarded outright.
    fn apply_fetch_result(&self, fetched: Result<Vec<LineItem>, RemoteCartError>, epoch: u64) {
        let items = match fetched {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(%error, "remote cart fetch failed, starting from empty");
                Vec::new()
            }
        };

        let mut core = self.core();
        if !core.session.is_current(epoch) {
            tracing::debug!("discarding stale cart fetch result");
            return;
        }
        core.ledger.replace(items);
        // Arm only after the replace: the fetched cart must not be
        // echoed straight back to the server as a push. Saving under the
        // same lock keeps the snapshot ordered against concurrent
        // mutations.
        core.session.finish_sync(epoch);
        self.snapshots.save(core.ledger.items());
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::storage::MemoryBackend;

    use super::*;

    /// Remote stand-in for tests that never reach the network.
    struct OfflineRemote;

    impl RemoteCart for OfflineRemote {
        async fn fetch(&self) -> Result<Vec<LineItem>, RemoteCartError> {
            Err(RemoteCartError::NotAuthenticated)
        }

        async fn replace(&self, _items: Vec<LineItem>) -> Result<(), RemoteCartError> {
            Err(RemoteCartError::NotAuthenticated)
        }
    }

    fn product(id: &str) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), dec!(2.00), format!("/img/{id}.jpg"))
    }

    #[tokio::test]
    async fn test_add_item_opens_the_drawer() {
        let cart = Cart::new(OfflineRemote, MemoryBackend::new());
        assert!(!cart.is_open());

        cart.add_item(product("concha"));
        assert!(cart.is_open());

        cart.close_cart();
        assert!(!cart.is_open());

        // Only add_item opens the drawer implicitly.
        cart.remove_item(&ProductId::new("concha"));
        assert!(!cart.is_open());
    }

    #[tokio::test]
    async fn test_mutations_persist_and_reload() {
        let backend = MemoryBackend::new();
        {
            let cart = Cart::new(OfflineRemote, backend.clone());
            cart.add_item(product("concha"));
            cart.add_item(product("concha"));
            cart.add_item(product("flan"));
        }

        let reloaded = Cart::new(OfflineRemote, backend);
        assert_eq!(reloaded.total_items(), 3);
        assert_eq!(reloaded.total_price(), dec!(6.00));
    }

    #[tokio::test]
    async fn test_clear_cart_purges_durable_storage() {
        let backend = MemoryBackend::new();
        let cart = Cart::new(OfflineRemote, backend.clone());

        cart.add_item(product("concha"));
        assert!(backend.get("rouse_cart").expect("get").is_some());

        cart.clear_cart();
        assert!(cart.items().is_empty());
        assert!(backend.get("rouse_cart").expect("get").is_none());
    }

    #[tokio::test]
    async fn test_totals_recompute_on_read() {
        let cart = Cart::new(OfflineRemote, MemoryBackend::new());
        cart.add_item(product("a"));
        cart.add_item(product("b"));
        cart.update_quantity(&ProductId::new("b"), 4);

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), dec!(10.00));

        cart.delete_item(&ProductId::new("b"));
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), dec!(2.00));
    }

    #[tokio::test]
    async fn test_starts_anonymous() {
        let cart = Cart::new(OfflineRemote, MemoryBackend::new());
        assert_eq!(cart.sync_phase(), SyncPhase::Anonymous);
    }
}

//! Best-effort background replication of ledger state.
//!
//! Every armed ledger change hands the full new state to a single worker
//! task through a `watch` channel. The worker pushes sequentially, so at
//! most one push is ever in flight; mutations arriving while a push is in
//! flight coalesce into a single follow-up push of the newest state. The
//! server therefore always converges to the latest armed snapshot, without
//! any wire-level sequence token.
//!
//! Push failures are logged and dropped - no retry queue, no user-visible
//! error. The next mutation's push naturally re-attempts with fresher state.

use std::sync::Arc;

use rouse_core::LineItem;
use tokio::sync::watch;

use crate::remote::RemoteCart;

/// Sender half feeding the push worker; `None` is the initial empty state.
pub(crate) type PushSender = watch::Sender<Option<Vec<LineItem>>>;

/// Spawn the push worker. Must be called within a Tokio runtime.
///
/// The worker exits when the sender side is dropped (cart shutdown).
pub(crate) fn spawn_push_worker<R>(remote: Arc<R>) -> PushSender
where
    R: RemoteCart + 'static,
{
    let (tx, mut rx) = watch::channel(None::<Vec<LineItem>>);

    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let Some(items) = snapshot else { continue };

            if let Err(error) = remote.replace(items).await {
                tracing::debug!(%error, "cart push failed, will retry on next change");
            }
        }
    });

    tx
}

//! Shared helpers for cart integration tests.
//!
//! [`ScriptedRemote`] stands in for the remote cart store: fetch results are
//! served from a queue, an optional gate holds each fetch in flight until
//! the test releases it, and every push is recorded for inspection.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rouse_cart::{RemoteCart, RemoteCartError};
use rouse_core::{LineItem, ProductSnapshot};
use rust_decimal::Decimal;
use tokio::sync::Notify;

/// Scripted stand-in for the remote cart store.
#[derive(Clone, Default)]
pub struct ScriptedRemote {
    inner: Arc<ScriptedRemoteInner>,
}

#[derive(Default)]
struct ScriptedRemoteInner {
    fetches: Mutex<VecDeque<Result<Vec<LineItem>, reqwest::StatusCode>>>,
    gate: Mutex<Option<Arc<Notify>>>,
    pushes: Mutex<Vec<Vec<LineItem>>>,
}

impl ScriptedRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch result.
    pub fn enqueue_fetch(&self, items: Vec<LineItem>) {
        lock(&self.inner.fetches).push_back(Ok(items));
    }

    /// Queue a failed fetch.
    pub fn enqueue_fetch_error(&self, status: reqwest::StatusCode) {
        lock(&self.inner.fetches).push_back(Err(status));
    }

    /// Install a gate: every subsequent fetch waits on the returned handle
    /// until the test calls `notify_one` for it.
    #[must_use]
    pub fn gate_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.inner.gate) = Some(Arc::clone(&gate));
        gate
    }

    /// All pushed cart states, oldest first.
    #[must_use]
    pub fn pushes(&self) -> Vec<Vec<LineItem>> {
        lock(&self.inner.pushes).clone()
    }

    /// Number of pushes observed so far.
    #[must_use]
    pub fn push_count(&self) -> usize {
        lock(&self.inner.pushes).len()
    }
}

impl RemoteCart for ScriptedRemote {
    async fn fetch(&self) -> Result<Vec<LineItem>, RemoteCartError> {
        let gate = lock(&self.inner.gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match lock(&self.inner.fetches).pop_front() {
            Some(Ok(items)) => Ok(items),
            Some(Err(status)) => Err(RemoteCartError::Status(status)),
            None => Ok(Vec::new()),
        }
    }

    async fn replace(&self, items: Vec<LineItem>) -> Result<(), RemoteCartError> {
        lock(&self.inner.pushes).push(items);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a product snapshot for tests.
#[must_use]
pub fn product(id: &str, price: Decimal) -> ProductSnapshot {
    ProductSnapshot::new(id, format!("Product {id}"), price, format!("/img/{id}.jpg"))
}

/// Build a line item with the given quantity.
#[must_use]
pub fn line_item(id: &str, price: Decimal, quantity: u32) -> LineItem {
    LineItem {
        product: product(id, price),
        quantity,
    }
}

/// Poll `cond` until it holds, panicking after 500ms.
///
/// Detached fetch/push tasks settle between polls; this keeps the tests
/// deterministic without reaching into the cart's internals.
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 500ms");
}

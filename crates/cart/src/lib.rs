//! Rouse Cart - client-side shopping cart state manager.
//!
//! Maintains an in-memory, locally persisted cart of product line items,
//! synchronizes it with the per-account remote cart store while a user is
//! authenticated, and reconciles identity transitions (anonymous login,
//! logout, account switch) without leaking one account's cart contents into
//! another's session.
//!
//! # Architecture
//!
//! - [`ledger`] - the authoritative in-memory collection of line items
//! - [`storage`] - durable local snapshots for crash/reload survival
//! - [`reconciler`] - the identity-transition state machine
//! - `sync` - best-effort background pushes to the remote store
//! - [`remote`] - the remote cart store client (`reqwest`)
//! - [`state`] - the [`Cart`] handle tying everything together
//!
//! # Sync rules
//!
//! The local cart is the source of truth while anonymous. On login the
//! remote cart replaces the local one wholesale - no merge - so a previous
//! visitor's items are never silently attributed to whoever logs in next.
//! On logout the local cart is kept and only future pushes are disarmed.
//! All remote failures degrade to a valid (possibly empty) cart; nothing in
//! this crate surfaces an error to the UI layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use rouse_cart::{Cart, CartConfig, HttpCartClient, IdentityProvider, IdentityUpdate, MemoryBackend};
//!
//! let config = CartConfig::from_env()?;
//! let client = HttpCartClient::new(&config);
//!
//! let cart = Cart::new(client.clone(), MemoryBackend::new());
//! let identity = IdentityProvider::new();
//! cart.attach_identity(&identity);
//!
//! // The login flow stores the token and announces the account.
//! client.set_access_token("eyJ...".into());
//! identity.update(IdentityUpdate::authenticated("acct_123"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod identity;
pub mod ledger;
pub mod reconciler;
pub mod remote;
pub mod state;
pub mod storage;
mod sync;

pub use config::{CartConfig, ConfigError};
pub use identity::{IdentityProvider, IdentityUpdate};
pub use ledger::Ledger;
pub use reconciler::SyncPhase;
pub use remote::{HttpCartClient, RemoteCart, RemoteCartError};
pub use state::Cart;
pub use storage::{FileBackend, MemoryBackend, SnapshotStore, StorageBackend, StorageError};

//! End-to-end wiring demo: config -> HTTP client -> cart -> identity updates.
//!
//! Stands in for the UI layer. Requires `ROUSE_API_BASE_URL`; set
//! `ROUSE_CART_STORAGE_PATH` to persist the cart across runs.
//!
//! Run with: cargo run -p rouse-cart --example demo

use rouse_cart::{Cart, CartConfig, FileBackend, HttpCartClient, IdentityProvider, IdentityUpdate, MemoryBackend};
use rouse_core::ProductSnapshot;
use rust_decimal::dec;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rouse_cart=debug,demo=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CartConfig::from_env().expect("Failed to load configuration");
    let client = HttpCartClient::new(&config);

    let cart = match &config.storage_path {
        Some(dir) => Cart::new(client.clone(), FileBackend::new(dir)),
        None => Cart::new(client.clone(), MemoryBackend::new()),
    };

    let identity = IdentityProvider::new();
    cart.attach_identity(&identity);

    // The session restore has settled: nobody is logged in.
    identity.update(IdentityUpdate::anonymous());

    cart.add_item(
        ProductSnapshot::new("concha-vainilla", "Concha de Vainilla", dec!(2.50), "/img/concha.jpg")
            .with_badge("Popular"),
    );
    cart.add_item(ProductSnapshot::new(
        "flan-napolitano",
        "Flan Napolitano",
        dec!(4.00),
        "/img/flan.jpg",
    ));

    tracing::info!(
        total_items = cart.total_items(),
        total_price = %cart.total_price(),
        drawer_open = cart.is_open(),
        "anonymous cart ready"
    );

    // A real login flow would obtain the token from the auth service and
    // then announce the account; the reconciler replaces the cart with the
    // account's server-side one.
    //
    // client.set_access_token(token);
    // identity.update(IdentityUpdate::authenticated("acct_123"));
}

//! Location tracking server.
//!
//! Run the server with
//! ```not_rust
//! cargo run
//! ```
//!
//! and post a fix with
//! ```not_rust
//! curl -X POST localhost:3000/api/location \
//!     -H 'content-type: application/json' \
//!     -d '{"latitude": 37.7749, "longitude": -122.4194, "accuracy": 5}'
//! ```

use std::error::Error;
use std::net::SocketAddr;

use axum::Server;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use location_tracker::config::Config;
use location_tracker::store::location_store::LocationStore;
use location_tracker::store::store_actor::StoreActor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "location_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr: SocketAddr = config.bind_address().parse()?;

    let store = LocationStore::open(&config.data_file);
    info!("Data file: {} ({} locations)", store.path().display(), store.len());
    let (store, _actor) = StoreActor::spawn(store);

    info!("Environment: {}", config.environment);
    info!("Location API listening on {}", addr);

    Server::bind(&addr)
        .serve(location_tracker::app(store).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutting down");
}

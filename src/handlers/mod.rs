pub mod health;
pub mod location;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::store::store_actor::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
}

/// All routes of the service, bound to `store`.
pub fn app(store: StoreHandle) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/api/health", get(health::health))
        .route("/api/location", get(location::recent).post(location::ingest))
        .route("/api/location/latest", get(location::latest))
        .fallback(health::not_found)
        // logging so we can see whats going on
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

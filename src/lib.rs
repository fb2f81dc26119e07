//! Location tracking service.
//!
//! Clients post GPS fixes to `POST /api/location`; the service keeps the last
//! hundred in a JSON-backed log and serves them back through
//! `GET /api/location`, `GET /api/location/latest` and `GET /api/health`.

pub mod config;
pub mod handlers;
pub mod models;
pub mod store;

pub use handlers::app;

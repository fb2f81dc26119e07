pub mod location_store;
pub mod store_actor;

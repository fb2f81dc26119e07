pub mod error;
pub mod location_record;
pub mod payload;

//! sea-orm entities for the Reading Store tables.

pub mod alerts;
pub mod pool_readings;
pub mod readings;
pub mod sensors;

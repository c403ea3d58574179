//! SmartCEU dashboard - occupancy and sensor dashboard API for the CEU
//! recreation center.
//!
//! This library exposes the core modules for testing and reuse.

pub mod aggregator;
pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod routes;
pub mod store;

//! Priority classification and queue ordering for the rideshare dispatch dashboard.
//!
//! Orders are routed into one of three priority classes by pricing model and kept in
//! class-specific order: contracted orders first-come first-served, standard and custom
//! orders by descending revenue score.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod telemetry;

//! Reliability scoring for agricultural freight trips.
//!
//! A pre-trained classifier estimates the probability that a delivery fails;
//! the workflows turn that into a trip analysis, a driver rating, and a price
//! suggestion. Everything here is synchronous and read-only once the model
//! bundle is loaded.

pub mod config;
pub mod error;
pub mod model;
pub mod scoring;
pub mod telemetry;
pub mod workflows;

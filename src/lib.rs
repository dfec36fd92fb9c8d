//! District-level electricity forecasting service.
//!
//! Trains three regression models per district (load demand, price,
//! blackout risk) from a historical CSV at startup, then serves chained
//! point-in-time predictions over HTTP.

pub mod api;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod model;
pub mod state;
pub mod telemetry;

//! CoffeeCloud app server
//!
//! Wires the configuration store, the sync scheduler and the control-plane HTTP API.

pub mod api;
pub mod model;
pub mod startup;

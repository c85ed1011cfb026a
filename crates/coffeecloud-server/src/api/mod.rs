//! Control plane HTTP API

pub mod configuration;
pub mod route;
pub mod version;

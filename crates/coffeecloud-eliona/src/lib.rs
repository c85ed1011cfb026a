//! Client for the Eliona asset platform
//!
//! Assets are upserted by their global asset identifier and return the platform id;
//! attribute values are upserted per asset and subtype.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{AssetPlatform, ElionaClient};
pub use config::ElionaClientConfig;
pub use error::ElionaError;
pub use model::{Asset, Data, DataSubtype};

//! CoffeeCloud Client - Rust client for the CoffeeCloud machine telemetry API
//!
//! This crate provides:
//! - HTTP transport carrying the tenant API key and request timeout
//! - Per-cycle bearer token sessions
//! - Offset/limit pagination with natural-key deduplication
//! - Record models for groups, machines, machine errors and health KPIs
//! - `SourceConnector`/`SourceSession` seams consumed by the sync engine

pub mod api;
pub mod auth;
pub mod error;
pub mod http;
pub mod model;
pub mod paging;

pub use api::{CoffeeCloudApiClient, CoffeeCloudConnector, SourceConnector, SourceSession};
pub use auth::AuthSession;
pub use error::ClientError;
pub use http::{CoffeeCloudHttpClient, HttpClientConfig};
pub use model::*;
pub use paging::{NaturalKey, PAGE_SIZE, Page, PageRequest};

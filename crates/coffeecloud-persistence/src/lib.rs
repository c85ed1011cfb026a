//! CoffeeCloud Persistence - storage for tenant configurations and asset identities
//!
//! This crate provides:
//! - The validated tenant `Configuration` model
//! - SeaORM entity definitions
//! - Persistence trait abstractions for unified storage
//! - SQL (MySQL/PostgreSQL) and in-memory backends

pub mod entity;
pub mod memory;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export persistence traits
pub use traits::{AssetPersistence, ConfigurationPersistence, PersistenceService};

// Re-export backends
pub use memory::MemoryPersistService;
pub use sql::ExternalDbPersistService;

// Re-export model types
pub use model::{
    AssetMapping, Configuration, ConfigurationDraft, ConfigurationError, FilterExpression,
    FilterRule, StorageMode,
};

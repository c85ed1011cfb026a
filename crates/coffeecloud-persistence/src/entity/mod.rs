//! SeaORM entities for the CoffeeCloud app tables

pub mod asset;
pub mod configuration;

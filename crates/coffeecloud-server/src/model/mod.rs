//! Data models shared across the server
//!
//! - `config` - application configuration (CLI, environment, `conf/application.yml`)
//! - `response` - HTTP error bodies
//! - `app_state` - state shared by the request handlers

pub mod app_state;
pub mod config;
pub mod response;

pub use app_state::AppState;
pub use config::AppConfiguration;
pub use response::ErrorResult;

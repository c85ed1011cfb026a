//! Application configuration
//!
//! Sources, lowest precedence first: `conf/application.yml` (optional),
//! `COFFEECLOUD_*` environment variables, command line arguments and their
//! environment fallbacks (`API_SERVER_PORT`, `CONNECTION_STRING`, `API_ENDPOINT`,
//! `API_TOKEN`).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use coffeecloud_eliona::ElionaClientConfig;
use coffeecloud_sync::SchedulerConfig;
use coffeecloud_persistence::StorageMode;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::startup::LoggingConfig;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "coffeecloud-server", version, about)]
struct Cli {
    #[arg(short = 'p', long = "port", env = "API_SERVER_PORT")]
    port: Option<u16>,
    #[arg(long = "db-url", env = "CONNECTION_STRING")]
    database_url: Option<String>,
    #[arg(long = "eliona-endpoint", env = "API_ENDPOINT")]
    eliona_endpoint: Option<String>,
    #[arg(long = "eliona-token", env = "API_TOKEN")]
    eliona_token: Option<String>,
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct AppConfiguration {
    pub config: Config,
}

impl AppConfiguration {
    /// Build from the process arguments and environment
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Build from explicit arguments; the first item is the binary name
    pub fn from_args<I, T>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_cli(Cli::try_parse_from(args)?)
    }

    fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix("coffeecloud")
                    .separator(".")
                    .try_parsing(true),
            );

        if let Some(v) = args.port {
            config_builder = config_builder.set_override("server.port", i64::from(v))?;
        }
        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override("db.url", v)?;
        }
        if let Some(v) = args.eliona_endpoint {
            config_builder = config_builder.set_override("eliona.endpoint", v)?;
        }
        if let Some(v) = args.eliona_token {
            config_builder = config_builder.set_override("eliona.token", v)?;
        }

        Ok(AppConfiguration {
            config: config_builder.build()?,
        })
    }

    pub fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    /// Database URL; the in-memory store is used when unset
    pub fn database_url(&self) -> Option<String> {
        self.config
            .get_string("db.url")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    /// External database when `db.url` is set, in-memory otherwise
    pub fn persistence_mode(&self) -> StorageMode {
        if self.database_url().is_some() {
            StorageMode::ExternalDb
        } else {
            StorageMode::Memory
        }
    }

    pub fn db_init_schema(&self) -> bool {
        self.config.get_bool("db.init_schema").unwrap_or(true)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let url = self
            .database_url()
            .ok_or_else(|| anyhow::anyhow!("db.url is not configured"))?;
        let max_connections = self.config.get_int("db.max_connections").unwrap_or(10) as u32;
        let connect_timeout = self.config.get_int("db.connect_timeout").unwrap_or(30) as u64;
        let sqlx_logging = self.config.get_bool("db.sqlx_logging").unwrap_or(false);

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            connect_timeout = connect_timeout,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        Ok(Database::connect(opt).await?)
    }

    // ========================================================================
    // Eliona Configuration
    // ========================================================================

    pub fn eliona_config(&self) -> ElionaClientConfig {
        let defaults = ElionaClientConfig::default();
        ElionaClientConfig {
            endpoint: self
                .config
                .get_string("eliona.endpoint")
                .unwrap_or(defaults.endpoint),
            api_token: self
                .config
                .get_string("eliona.token")
                .unwrap_or(defaults.api_token),
            timeout_ms: self
                .config
                .get_int("eliona.timeout_ms")
                .map(|v| v as u64)
                .unwrap_or(defaults.timeout_ms),
        }
    }

    // ========================================================================
    // Scheduler Configuration
    // ========================================================================

    pub fn scheduler_config(&self) -> SchedulerConfig {
        let tick_interval_ms = self
            .config
            .get_int("scheduler.tick_interval_ms")
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(1000) as u64;
        SchedulerConfig {
            tick_interval: Duration::from_millis(tick_interval_ms),
        }
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    /// `logging.*` keys, falling back to the `COFFEECLOUD_LOG_*` variables
    pub fn logging_config(&self) -> LoggingConfig {
        let defaults = LoggingConfig::from_env();
        let level = self
            .config
            .get_string("logging.level")
            .ok()
            .and_then(|v| v.parse().ok());

        LoggingConfig {
            log_dir: self
                .config
                .get_string("logging.dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            console_output: self
                .config
                .get_bool("logging.console")
                .unwrap_or(defaults.console_output),
            console_level: level.unwrap_or(defaults.console_level),
            file_logging: self
                .config
                .get_bool("logging.file")
                .unwrap_or(defaults.file_logging),
            file_level: level.unwrap_or(defaults.file_level),
            rotation: defaults.rotation,
        }
    }
}

//! Multi-file logging
//!
//! Every component writes to its own daily rotated file next to the root log:
//!
//! | Log File          | Component                          | Target Prefixes           |
//! |-------------------|------------------------------------|---------------------------|
//! | coffeecloud.log   | Root logger (all components)       | (all)                     |
//! | sync.log          | Scheduler and sync cycles          | coffeecloud_sync          |
//! | source.log        | CoffeeCloud API client             | coffeecloud_client        |
//! | eliona.log        | Eliona API client                  | coffeecloud_eliona        |
//! | persistence.log   | Configuration and identity storage | coffeecloud_persistence   |
//! | api.log           | Control plane HTTP API             | coffeecloud_server::api   |
//!
//! Log files are stored in `~/coffeecloud/logs` by default.
//! Override with `COFFEECLOUD_LOG_DIR` or `logging.dir`.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const ROOT_LOG_FILE: &str = "coffeecloud.log";

struct ComponentLogDef {
    file_name: &'static str,
    targets: &'static [&'static str],
}

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "sync.log",
        targets: &["coffeecloud_sync"],
    },
    ComponentLogDef {
        file_name: "source.log",
        targets: &["coffeecloud_client"],
    },
    ComponentLogDef {
        file_name: "eliona.log",
        targets: &["coffeecloud_eliona"],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["coffeecloud_persistence", "sea_orm", "sqlx"],
    },
    ComponentLogDef {
        file_name: "api.log",
        targets: &["coffeecloud_server::api", "actix_web"],
    },
];

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/coffeecloud/logs", home))
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(default)
}

/// Log rotation policy
#[derive(Debug, Clone, Copy)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Read `COFFEECLOUD_LOG_DIR`, `COFFEECLOUD_LOG_LEVEL`,
    /// `COFFEECLOUD_LOG_CONSOLE` and `COFFEECLOUD_LOG_FILE`
    pub fn from_env() -> Self {
        let log_dir = std::env::var("COFFEECLOUD_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_dir());

        let level = std::env::var("COFFEECLOUD_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::INFO);

        Self {
            log_dir,
            console_output: env_flag("COFFEECLOUD_LOG_CONSOLE", true),
            console_level: level,
            file_logging: env_flag("COFFEECLOUD_LOG_FILE", true),
            file_level: level,
            rotation: LogRotation::Daily,
        }
    }
}

/// Keeps the non-blocking file writers alive; buffered output is flushed on drop
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn file_layer(
    config: &LoggingConfig,
    file_name: &str,
    guards: &mut Vec<WorkerGuard>,
) -> fmt::Layer<Registry, fmt::format::DefaultFields, fmt::format::Format, tracing_appender::non_blocking::NonBlocking> {
    let appender = RollingFileAppender::new(config.rotation.into(), &config.log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);

    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .with_ansi(false)
}

/// Install the global subscriber: console, root file and component files
///
/// `RUST_LOG` overrides the configured level of the console and root file
/// layers; component files capture everything from their targets.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        layers.push(Box::new(
            file_layer(config, ROOT_LOG_FILE, &mut guards).with_filter(root_filter),
        ));

        for component in COMPONENT_LOGS {
            let targets = component
                .targets
                .iter()
                .fold(Targets::new(), |targets, target| {
                    targets.with_target(*target, LevelFilter::TRACE)
                });
            layers.push(Box::new(
                file_layer(config, component.file_name, &mut guards).with_filter(targets),
            ));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            "File logging initialized: {} (root) + {} component log files",
            ROOT_LOG_FILE,
            COMPONENT_LOGS.len()
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

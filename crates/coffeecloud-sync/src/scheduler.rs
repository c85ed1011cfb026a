//! Per-configuration task scheduling
//!
//! Every tick reads all configurations, maintains their `active` flags and starts
//! a collection task for each enabled configuration that has none running. A task
//! runs one cycle, sleeps the refresh interval and then clears its own handle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use coffeecloud_persistence::{Configuration, ConfigurationPersistence};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::engine::CycleRunner;
use crate::error::{Result, SyncError};

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Interval between configuration enumerations (default: 1s)
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
        }
    }
}

pub struct Scheduler {
    configurations: Arc<dyn ConfigurationPersistence>,
    runner: Arc<dyn CycleRunner>,
    config: SchedulerConfig,
    /// Live collection tasks (configuration id -> handle)
    tasks: Arc<DashMap<i64, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        configurations: Arc<dyn ConfigurationPersistence>,
        runner: Arc<dyn CycleRunner>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            configurations,
            runner,
            config,
            tasks: Arc::new(DashMap::new()),
        }
    }

    /// Tick until a store error occurs
    pub async fn run(&self) -> Result<()> {
        info!(
            "Scheduler started, tick interval {:?}",
            self.config.tick_interval
        );
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await?;
        }
    }

    /// One enumeration pass; store errors are returned and are fatal
    pub async fn tick(&self) -> Result<()> {
        let configurations = self
            .configurations
            .configuration_find_all()
            .await
            .map_err(|e| SyncError::Store(e.context("loading configurations")))?;

        for mut configuration in configurations {
            if !configuration.enable {
                if configuration.active {
                    self.set_active(configuration.id, false).await?;
                    info!(configuration_id = configuration.id, "Collecting stopped");
                }
                continue;
            }

            if !configuration.active {
                self.set_active(configuration.id, true).await?;
                configuration.active = true;
                info!(
                    configuration_id = configuration.id,
                    refresh_interval = configuration.refresh_interval,
                    request_timeout = configuration.request_timeout,
                    project_ids = ?configuration.project_ids,
                    "Collecting initialized"
                );
            }

            self.trigger(configuration);
        }

        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        self.configurations
            .configuration_set_active(id, active)
            .await
            .map_err(|e| SyncError::Store(e.context(format!("setting active state of configuration {}", id))))?;
        Ok(())
    }

    /// Start a collection task unless one is live for this configuration;
    /// returns whether a task was started
    pub fn trigger(&self, configuration: Configuration) -> bool {
        match self.tasks.entry(configuration.id) {
            Entry::Occupied(mut entry) => {
                if !entry.get().is_finished() {
                    debug!(configuration_id = configuration.id, "Collection still running");
                    return false;
                }
                entry.insert(self.spawn(configuration));
            }
            Entry::Vacant(entry) => {
                entry.insert(self.spawn(configuration));
            }
        }
        true
    }

    fn spawn(&self, configuration: Configuration) -> JoinHandle<()> {
        let runner = self.runner.clone();
        let tasks = self.tasks.clone();

        tokio::spawn(async move {
            let id = configuration.id;
            let started = Instant::now();
            info!(configuration_id = id, "Collecting started");

            match runner.run_cycle(&configuration).await {
                Ok(report) => info!(
                    configuration_id = id,
                    groups = report.groups,
                    machines = report.machines,
                    projects_published = report.publish.projects_published,
                    projects_failed = report.publish.projects_failed,
                    "Collecting finished in {:?}",
                    started.elapsed()
                ),
                Err(e) => error!(configuration_id = id, "Collecting failed: {}", e),
            }

            tokio::time::sleep(configuration.refresh_interval()).await;

            let current = tokio::task::id();
            tasks.remove_if(&id, |_, handle| handle.id() == current);
        })
    }

    pub fn is_running(&self, configuration_id: i64) -> bool {
        self.tasks
            .get(&configuration_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.iter().filter(|entry| !entry.value().is_finished()).count()
    }

    /// Abort all collection tasks without waiting for them
    pub fn shutdown(&self) {
        for entry in self.tasks.iter() {
            entry.value().abort();
        }
        self.tasks.clear();
        info!("Scheduler stopped");
    }
}

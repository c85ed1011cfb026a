//! CoffeeCloud Sync - the periodic CoffeeCloud to Eliona synchronization engine
//!
//! One cycle per configuration:
//! - authenticate against CoffeeCloud and discover groups
//! - fetch machines, errors and health KPIs per retained group and merge them
//! - evaluate the configured asset filter on groups and machines
//! - create-or-reuse the root/group/machine asset hierarchy per project
//! - publish the current machine attributes
//!
//! The `Scheduler` runs at most one such cycle per configuration at a time.

pub mod attribute;
pub mod collector;
pub mod engine;
pub mod error;
pub mod filter;
pub mod identity;
pub mod model;
pub mod publisher;
pub mod scheduler;

pub use attribute::{AttributeDef, AttributeValue, Attributed};
pub use collector::{collect_machine_groups, merge_machines};
pub use engine::{CycleReport, CycleRunner, SyncEngine};
pub use error::{Result, SyncError};
pub use filter::{CompiledFilter, FilterError, matches};
pub use identity::AssetIdentityCache;
pub use model::{Machine, MachineGroup};
pub use publisher::{PublishReport, Publisher};
pub use scheduler::{Scheduler, SchedulerConfig};

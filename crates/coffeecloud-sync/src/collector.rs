//! Discovery and enrichment: groups, then per retained group the machine,
//! error and health listings merged into `Machine` records

use std::collections::HashMap;

use coffeecloud_client::{
    HealthRecord, MachineErrorRecord, MachineRecord, NaturalKey, SourceSession,
};
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::filter::CompiledFilter;
use crate::model::{Machine, MachineGroup};

/// Left join of machines with errors and health statuses on the serial number
pub fn merge_machines(
    machines: Vec<MachineRecord>,
    errors: Vec<MachineErrorRecord>,
    health: Vec<HealthRecord>,
) -> Vec<Machine> {
    let mut errors_by_serial: HashMap<String, MachineErrorRecord> = HashMap::new();
    for record in errors {
        errors_by_serial.entry(record.natural_key()).or_insert(record);
    }
    let mut health_by_serial: HashMap<String, HealthRecord> = HashMap::new();
    for record in health {
        health_by_serial.entry(record.natural_key()).or_insert(record);
    }

    machines
        .into_iter()
        .map(|record| {
            let serial_number = record.natural_key();
            let mut machine = Machine {
                machine_id: record.id,
                machine_name: record.machine_name,
                firmware: record.origin.fw,
                cup_count: record.number_of_cups,
                hours_since_cleaned: record.hours_since_clean,
                serial_number,
                ..Default::default()
            };
            if let Some(error) = errors_by_serial.get(&machine.serial_number) {
                machine.error_code = error.error_code;
                machine.error = error.error.clone();
                machine.error_description = error.error_short.clone();
            }
            if let Some(health) = health_by_serial.get(&machine.serial_number) {
                machine.engine_status = health.health_status.clone();
            }
            machine
        })
        .collect()
}

/// Fetch and filter everything one cycle publishes
///
/// Groups rejected by the filter are not enriched. Entities whose filter
/// evaluation fails are skipped with a warning; any listing failure aborts.
pub async fn collect_machine_groups(
    session: &dyn SourceSession,
    filter: &CompiledFilter,
    configuration_id: i64,
) -> Result<Vec<MachineGroup>> {
    let groups = session.groups().await.map_err(SyncError::fetch("groups"))?;

    let mut retained = Vec::new();
    for group in groups {
        let mut machine_group = MachineGroup::new(group.id, &group.name);
        debug!(configuration_id, group_id = group.id, "Found group {}", group.name);

        match filter.matches(&machine_group) {
            Ok(true) => {}
            Ok(false) => {
                debug!(configuration_id, group_id = group.id, "Group filtered out");
                continue;
            }
            Err(e) => {
                warn!(configuration_id, group_id = group.id, "Skipping group: {}", SyncError::from(e));
                continue;
            }
        }

        let (machines, errors, health) = tokio::try_join!(
            async { session.machines(group.id).await.map_err(SyncError::fetch("machines")) },
            async {
                session
                    .machine_errors(group.id)
                    .await
                    .map_err(SyncError::fetch("machine errors"))
            },
            async {
                session
                    .health_statuses(group.id)
                    .await
                    .map_err(SyncError::fetch("health statuses"))
            },
        )?;

        for machine in merge_machines(machines, errors, health) {
            match filter.matches(&machine) {
                Ok(true) => machine_group.machines.push(machine),
                Ok(false) => {
                    debug!(configuration_id, machine_id = %machine.machine_id, "Machine filtered out");
                }
                Err(e) => {
                    warn!(
                        configuration_id,
                        machine_id = %machine.machine_id,
                        "Skipping machine: {}",
                        SyncError::from(e)
                    );
                }
            }
        }

        retained.push(machine_group);
    }

    Ok(retained)
}

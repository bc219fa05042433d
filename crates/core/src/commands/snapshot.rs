use std::io::Write;

use tracing::{debug, info, warn};

use super::{
    CommandSummary, Progress,
    guard::{MISSING_PROJECT_MESSAGE, project_or_force},
};
use crate::{
    cloud_provider::{
        CloudProvider, CreateSnapshotParams, InstanceInfo, InstanceState, SnapshotState,
    },
    error::Result,
    resolver::{InstanceFilter, resolve_instances},
    wait::{WaitConfig, require_instance_state},
};

pub const SNAPSHOT_DESCRIPTION: &str = "Created by Shotty";

/// True when the first snapshot the provider lists for the volume is still pending.
pub async fn has_pending_snapshot(provider: &dyn CloudProvider, volume_id: &str) -> Result<bool> {
    let snapshots = provider.list_snapshots(volume_id).await?;
    Ok(snapshots
        .first()
        .is_some_and(|snapshot| snapshot.state == SnapshotState::Pending))
}

/// Snapshots every volume of each resolved instance while the instance is stopped.
///
/// Instances that were running (or starting) beforehand are started again
/// afterwards; instances that were already stopped are left stopped. A failed
/// progress write ends the command, but only after the current instance has
/// been restarted.
pub async fn create_snapshots(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
    wait: &WaitConfig,
    out: &mut dyn Write,
) -> Result<CommandSummary> {
    let mut summary = CommandSummary::default();
    if !project_or_force(filter, force) {
        writeln!(out, "{MISSING_PROJECT_MESSAGE}")?;
        return Ok(summary);
    }

    let mut progress = Progress::new(out);
    for instance in resolve_instances(provider, filter).await? {
        let result = snapshot_instance(provider, &instance, wait, &mut progress).await;
        if let Err(error) = &result {
            warn!(instance_id = %instance.id, %error, "snapshot run failed");
            progress.line(format_args!("Error creating snapshot {}: {}", instance.id, error));
        }
        summary.record(&result);
        progress.check()?;
    }

    progress.line(format_args!("Job Done"));
    progress.check()?;
    Ok(summary)
}

async fn snapshot_instance(
    provider: &dyn CloudProvider,
    instance: &InstanceInfo,
    wait: &WaitConfig,
    progress: &mut Progress<'_>,
) -> Result<()> {
    let restart = instance.state.is_active();

    if instance.state != InstanceState::Stopped {
        progress.line(format_args!("Stopping {}...", instance.id));
        provider.stop_instance(&instance.id).await?;
        require_instance_state(provider, &instance.id, InstanceState::Stopped, wait).await?;
    }

    for volume in provider.list_volumes(&instance.id).await? {
        if has_pending_snapshot(provider, &volume.id).await? {
            progress.line(format_args!(
                "  Skipping {}, snapshot already in progress",
                volume.id
            ));
            continue;
        }

        progress.line(format_args!("  Creating snapshot of {}", volume.id));
        let snapshot_id = provider
            .create_snapshot(&CreateSnapshotParams {
                volume_id: &volume.id,
                description: SNAPSHOT_DESCRIPTION,
            })
            .await?;
        info!(
            instance_id = %instance.id,
            volume_id = %volume.id,
            %snapshot_id,
            "snapshot requested"
        );
    }

    if restart {
        progress.line(format_args!("Starting {}...", instance.id));
        provider.start_instance(&instance.id).await?;
        require_instance_state(provider, &instance.id, InstanceState::Running, wait).await?;
    } else {
        debug!(instance_id = %instance.id, state = %instance.state, "leaving instance stopped");
    }

    Ok(())
}

use std::io::Write;

use tracing::{info, warn};

use super::{
    CommandSummary, Progress,
    guard::{MISSING_PROJECT_MESSAGE, project_or_force},
};
use crate::{
    cloud_provider::{CloudProvider, InstanceState},
    error::Result,
    resolver::{InstanceFilter, resolve_instances},
    wait::{WaitConfig, require_instance_state},
};

pub async fn start_instances(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
    out: &mut dyn Write,
) -> Result<CommandSummary> {
    let mut summary = CommandSummary::default();
    if !project_or_force(filter, force) {
        writeln!(out, "{MISSING_PROJECT_MESSAGE}")?;
        return Ok(summary);
    }

    for instance in resolve_instances(provider, filter).await? {
        writeln!(out, "Starting {}...", instance.id)?;
        let result = provider.start_instance(&instance.id).await;
        if let Err(error) = &result {
            warn!(instance_id = %instance.id, %error, "start failed");
            writeln!(out, "Could not start {}: {}", instance.id, error)?;
        }
        summary.record(&result);
    }

    Ok(summary)
}

pub async fn stop_instances(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
    out: &mut dyn Write,
) -> Result<CommandSummary> {
    let mut summary = CommandSummary::default();
    if !project_or_force(filter, force) {
        writeln!(out, "{MISSING_PROJECT_MESSAGE}")?;
        return Ok(summary);
    }

    for instance in resolve_instances(provider, filter).await? {
        writeln!(out, "Stopping {}...", instance.id)?;
        let result = provider.stop_instance(&instance.id).await;
        if let Err(error) = &result {
            warn!(instance_id = %instance.id, %error, "stop failed");
            writeln!(out, "Could not stop {}: {}", instance.id, error)?;
        }
        summary.record(&result);
    }

    Ok(summary)
}

/// Stops each instance, waits for it to stop, then starts it and waits for it
/// to run. Instances are handled one after another; a failure on one is
/// reported and the rest are still rebooted. A failed progress write ends the
/// command once the current instance is back up.
pub async fn reboot_instances(
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
        progress.line(format_args!("Rebooting {}", instance.id));
        let result = reboot_instance(provider, &instance.id, wait, &mut progress).await;
        match &result {
            Ok(()) => {
                info!(instance_id = %instance.id, "reboot complete");
                progress.line(format_args!("Reboot for {} complete", instance.id));
            }
            Err(error) => {
                warn!(instance_id = %instance.id, %error, "reboot failed");
                progress.line(format_args!("Could not reboot {}: {}", instance.id, error));
            }
        }
        summary.record(&result);
        progress.check()?;
    }

    progress.line(format_args!("Rebooting complete"));
    progress.check()?;
    Ok(summary)
}

async fn reboot_instance(
    provider: &dyn CloudProvider,
    instance_id: &str,
    wait: &WaitConfig,
    progress: &mut Progress<'_>,
) -> Result<()> {
    progress.line(format_args!("Stopping {instance_id}..."));
    provider.stop_instance(instance_id).await?;
    require_instance_state(provider, instance_id, InstanceState::Stopped, wait).await?;

    progress.line(format_args!("Restarting {instance_id}..."));
    provider.start_instance(instance_id).await?;
    require_instance_state(provider, instance_id, InstanceState::Running, wait).await
}

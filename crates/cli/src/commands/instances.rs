use std::io;

use shotty_core::{
    CloudProvider, InstanceFilter, WaitConfig,
    commands::{CommandSummary, lifecycle, list, snapshot},
};
use tracing::info;

pub async fn list(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    for row in list::list_instances(provider, filter).await? {
        println!("{row}");
    }
    Ok(())
}

pub async fn stop(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = lifecycle::stop_instances(provider, filter, force, &mut io::stdout()).await?;
    report("stop", summary);
    Ok(())
}

pub async fn start(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = lifecycle::start_instances(provider, filter, force, &mut io::stdout()).await?;
    report("start", summary);
    Ok(())
}

pub async fn reboot(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
    wait: &WaitConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary =
        lifecycle::reboot_instances(provider, filter, force, wait, &mut io::stdout()).await?;
    report("reboot", summary);
    Ok(())
}

pub async fn snapshot(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    force: bool,
    wait: &WaitConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary =
        snapshot::create_snapshots(provider, filter, force, wait, &mut io::stdout()).await?;
    report("snapshot", summary);
    Ok(())
}

fn report(command: &str, summary: CommandSummary) {
    info!(
        command,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "command finished"
    );
}

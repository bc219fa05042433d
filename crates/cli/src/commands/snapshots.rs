use shotty_core::{CloudProvider, InstanceFilter, commands::list};

pub async fn list(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    list_all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for row in list::list_snapshots(provider, filter, list_all).await? {
        println!("{row}");
    }
    Ok(())
}

use shotty_core::{CloudProvider, InstanceFilter, commands::list};

pub async fn list(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    for row in list::list_volumes(provider, filter).await? {
        println!("{row}");
    }
    Ok(())
}

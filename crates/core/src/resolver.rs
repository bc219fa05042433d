use tracing::debug;

use crate::{
    cloud_provider::{CloudProvider, InstanceInfo},
    error::Result,
};

/// Selects the instances a command acts upon.
#[derive(Debug, Clone, Default)]
pub struct InstanceFilter {
    pub project: Option<String>,
    pub instance_id: Option<String>,
}

impl InstanceFilter {
    pub fn new(project: Option<String>, instance_id: Option<String>) -> Self {
        Self {
            project: project.filter(|p| !p.is_empty()),
            instance_id: instance_id.filter(|i| !i.is_empty()),
        }
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }
}

/// Lists instances for the filter's project (or all instances), then keeps at
/// most the one matching the filter's instance id. An empty result is not an error.
pub async fn resolve_instances(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
) -> Result<Vec<InstanceInfo>> {
    let mut instances = provider.list_instances(filter.project()).await?;

    if let Some(instance_id) = filter.instance_id() {
        instances.retain(|instance| instance.id == instance_id);
        instances.truncate(1);
    }

    debug!(
        project = filter.project().unwrap_or("<any>"),
        instance_id = filter.instance_id().unwrap_or("<any>"),
        count = instances.len(),
        "resolved instances"
    );

    Ok(instances)
}

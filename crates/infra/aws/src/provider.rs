use async_trait::async_trait;
use aws_sdk_ec2::Client as Ec2Client;
use shotty_core::{
    cloud_provider::{
        CloudProvider, CreateSnapshotParams, InstanceInfo, InstanceState, SnapshotInfo,
        VolumeInfo,
    },
    error::Result,
};

use crate::{config, instance, snapshot, volume};

/// Connection options for [`AwsProvider`].
#[derive(Debug, Clone)]
pub struct AwsProviderConfig {
    pub profile: String,
    pub region: Option<String>,
}

pub struct AwsProvider {
    pub ec2_client: Ec2Client,
}

impl AwsProvider {
    pub async fn new(provider_config: &AwsProviderConfig) -> Self {
        let config =
            config::get_config(&provider_config.profile, provider_config.region.as_deref()).await;
        let ec2_client = Ec2Client::new(&config);
        Self { ec2_client }
    }
}

#[async_trait]
impl CloudProvider for AwsProvider {
    async fn list_instances(&self, project: Option<&str>) -> Result<Vec<InstanceInfo>> {
        instance::list_instances(&self.ec2_client, project).await
    }

    async fn instance_state(&self, instance_id: &str) -> Result<Option<InstanceState>> {
        instance::instance_state(&self.ec2_client, instance_id).await
    }

    async fn list_volumes(&self, instance_id: &str) -> Result<Vec<VolumeInfo>> {
        volume::list_volumes(&self.ec2_client, instance_id).await
    }

    async fn list_snapshots(&self, volume_id: &str) -> Result<Vec<SnapshotInfo>> {
        snapshot::list_snapshots(&self.ec2_client, volume_id).await
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        instance::start_instance(&self.ec2_client, instance_id).await
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        instance::stop_instance(&self.ec2_client, instance_id).await
    }

    async fn create_snapshot(&self, params: &CreateSnapshotParams<'_>) -> Result<String> {
        snapshot::create_snapshot(&self.ec2_client, params).await
    }
}

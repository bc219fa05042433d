use aws_sdk_ec2::{
    Client as Ec2Client,
    types::{Filter, Volume},
};
use shotty_core::{cloud_provider::VolumeInfo, error::Result};

use crate::aws_error::map_aws_error;

pub(super) async fn list_volumes(
    ec2_client: &Ec2Client,
    instance_id: &str,
) -> Result<Vec<VolumeInfo>> {
    let pages = ec2_client
        .describe_volumes()
        .filters(
            Filter::builder()
                .name("attachment.instance-id")
                .values(instance_id)
                .build(),
        )
        .into_paginator()
        .send()
        .try_collect()
        .await
        .map_err(|error| map_aws_error("DescribeVolumes", error))?;

    Ok(pages
        .iter()
        .flat_map(|page| page.volumes())
        .filter_map(volume_info)
        .collect())
}

pub(crate) fn volume_info(volume: &Volume) -> Option<VolumeInfo> {
    Some(VolumeInfo {
        id: volume.volume_id()?.to_string(),
        instance_id: volume
            .attachments()
            .iter()
            .find_map(|attachment| attachment.instance_id())
            .map(str::to_string),
        state: volume
            .state()
            .map(|state| state.as_str().to_string())
            .unwrap_or_default(),
        size_gib: volume.size().unwrap_or_default(),
        encrypted: volume.encrypted().unwrap_or(false),
    })
}

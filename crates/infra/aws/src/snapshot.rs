use aws_sdk_ec2::{
    Client as Ec2Client,
    types::{Filter, Snapshot},
};
use chrono::DateTime;
use shotty_core::{
    cloud_provider::{CreateSnapshotParams, SnapshotInfo, SnapshotState},
    error::{ComputeError, Result},
};
use tracing::debug;

use crate::aws_error::map_aws_error;

pub(super) async fn list_snapshots(
    ec2_client: &Ec2Client,
    volume_id: &str,
) -> Result<Vec<SnapshotInfo>> {
    let pages = ec2_client
        .describe_snapshots()
        .filters(Filter::builder().name("volume-id").values(volume_id).build())
        .into_paginator()
        .send()
        .try_collect()
        .await
        .map_err(|error| map_aws_error("DescribeSnapshots", error))?;

    Ok(pages
        .iter()
        .flat_map(|page| page.snapshots())
        .filter_map(snapshot_info)
        .collect())
}

pub(super) async fn create_snapshot(
    ec2_client: &Ec2Client,
    params: &CreateSnapshotParams<'_>,
) -> Result<String> {
    let resp = ec2_client
        .create_snapshot()
        .volume_id(params.volume_id)
        .description(params.description)
        .send()
        .await
        .map_err(|error| map_aws_error("CreateSnapshot", error))?;

    let snapshot_id = resp
        .snapshot_id()
        .ok_or(ComputeError::MissingIdentifier {
            resource: "snapshot",
        })?
        .to_string();
    debug!(volume_id = params.volume_id, %snapshot_id, "snapshot created");
    Ok(snapshot_id)
}

pub(crate) fn snapshot_info(snapshot: &Snapshot) -> Option<SnapshotInfo> {
    Some(SnapshotInfo {
        id: snapshot.snapshot_id()?.to_string(),
        volume_id: snapshot.volume_id().unwrap_or_default().to_string(),
        state: snapshot
            .state()
            .map(|state| SnapshotState::from_name(state.as_str()))
            .unwrap_or_else(|| SnapshotState::Other("unknown".to_string())),
        progress: snapshot.progress().unwrap_or_default().to_string(),
        start_time: snapshot
            .start_time()
            .and_then(|start| DateTime::from_timestamp(start.secs(), start.subsec_nanos())),
    })
}

#[cfg(test)]
mod tests {
    use aws_sdk_ec2::{
        primitives::DateTime as SmithyDateTime, types::SnapshotState as Ec2SnapshotState,
    };

    use super::*;

    #[test]
    fn converts_described_snapshot() {
        let snapshot = Snapshot::builder()
            .snapshot_id("snap-1")
            .volume_id("vol-1")
            .state(Ec2SnapshotState::Pending)
            .progress("42%")
            .start_time(SmithyDateTime::from_secs(1_700_000_000))
            .build();

        let info = snapshot_info(&snapshot).unwrap();

        assert_eq!(info.id, "snap-1");
        assert_eq!(info.volume_id, "vol-1");
        assert_eq!(info.state, SnapshotState::Pending);
        assert_eq!(info.progress, "42%");
        assert_eq!(info.start_time.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn unknown_snapshot_states_are_kept() {
        let snapshot = Snapshot::builder()
            .snapshot_id("snap-2")
            .state(Ec2SnapshotState::from("recoverable"))
            .build();

        let info = snapshot_info(&snapshot).unwrap();

        assert_eq!(info.state, SnapshotState::Other("recoverable".to_string()));
        assert_eq!(info.start_time, None);
    }
}

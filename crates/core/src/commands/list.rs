use std::fmt::{self, Display, Formatter};

use crate::{
    cloud_provider::{CloudProvider, InstanceInfo, SnapshotInfo, SnapshotState, VolumeInfo},
    error::Result,
    resolver::{InstanceFilter, resolve_instances},
};

pub const NO_PROJECT: &str = "<no project>";

#[derive(Debug, Clone)]
pub struct InstanceRow {
    pub instance: InstanceInfo,
}

impl Display for InstanceRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let instance = &self.instance;
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            instance.id,
            instance.instance_type,
            instance.availability_zone,
            instance.state,
            instance.project().unwrap_or(NO_PROJECT),
            instance.public_dns_name
        )
    }
}

#[derive(Debug, Clone)]
pub struct VolumeRow {
    pub instance_id: String,
    pub volume: VolumeInfo,
}

impl Display for VolumeRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let volume = &self.volume;
        write!(
            f,
            "{}, {}, {}, {}GiB, {}",
            volume.id,
            self.instance_id,
            volume.state,
            volume.size_gib,
            if volume.encrypted {
                "Encrypted"
            } else {
                "Not Encrypted"
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub instance_id: String,
    pub snapshot: SnapshotInfo,
}

impl Display for SnapshotRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let snapshot = &self.snapshot;
        write!(
            f,
            "{}, {}, {}, {}, {}, ",
            snapshot.id, snapshot.volume_id, self.instance_id, snapshot.state, snapshot.progress
        )?;
        match snapshot.start_time {
            Some(start_time) => write!(f, "{}", start_time.format("%c")),
            None => Ok(()),
        }
    }
}

pub async fn list_instances(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
) -> Result<Vec<InstanceRow>> {
    let instances = resolve_instances(provider, filter).await?;
    Ok(instances
        .into_iter()
        .map(|instance| InstanceRow { instance })
        .collect())
}

pub async fn list_volumes(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
) -> Result<Vec<VolumeRow>> {
    let mut rows = Vec::new();
    for instance in resolve_instances(provider, filter).await? {
        for volume in provider.list_volumes(&instance.id).await? {
            rows.push(VolumeRow {
                instance_id: instance.id.clone(),
                volume,
            });
        }
    }
    Ok(rows)
}

/// Lists snapshots per volume. Unless `list_all` is set, each volume's listing
/// stops after its first completed snapshot, relying on the provider returning
/// newest first.
pub async fn list_snapshots(
    provider: &dyn CloudProvider,
    filter: &InstanceFilter,
    list_all: bool,
) -> Result<Vec<SnapshotRow>> {
    let mut rows = Vec::new();
    for instance in resolve_instances(provider, filter).await? {
        for volume in provider.list_volumes(&instance.id).await? {
            for snapshot in provider.list_snapshots(&volume.id).await? {
                let completed = snapshot.state == SnapshotState::Completed;
                rows.push(SnapshotRow {
                    instance_id: instance.id.clone(),
                    snapshot,
                });
                if completed && !list_all {
                    break;
                }
            }
        }
    }
    Ok(rows)
}

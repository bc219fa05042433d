use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

pub const PROJECT_TAG: &str = "Project";

pub struct CreateSnapshotParams<'a> {
    pub volume_id: &'a str,
    pub description: &'a str,
}

/// Capabilities the commands need from a compute provider.
///
/// One value is built at startup and handed to every command by reference,
/// so tests can substitute an in-memory implementation.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Instances tagged `Project = project`, or every visible instance when `None`.
    async fn list_instances(&self, project: Option<&str>) -> Result<Vec<InstanceInfo>>;
    /// Current state of one instance, `None` if the provider no longer knows it.
    async fn instance_state(&self, instance_id: &str) -> Result<Option<InstanceState>>;
    async fn list_volumes(&self, instance_id: &str) -> Result<Vec<VolumeInfo>>;
    /// Snapshots of a volume in the order the provider returns them.
    async fn list_snapshots(&self, volume_id: &str) -> Result<Vec<SnapshotInfo>>;
    async fn start_instance(&self, instance_id: &str) -> Result<()>;
    async fn stop_instance(&self, instance_id: &str) -> Result<()>;
    /// Requests a new snapshot and returns its identifier.
    async fn create_snapshot(&self, params: &CreateSnapshotParams<'_>) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Unknown(String),
}

impl InstanceState {
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => InstanceState::Pending,
            "running" => InstanceState::Running,
            "shutting-down" => InstanceState::ShuttingDown,
            "terminated" => InstanceState::Terminated,
            "stopping" => InstanceState::Stopping,
            "stopped" => InstanceState::Stopped,
            other => InstanceState::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Terminated => "terminated",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::Unknown(name) => name,
        }
    }

    /// Whether the instance is up or on its way up.
    pub fn is_active(&self) -> bool {
        matches!(self, InstanceState::Pending | InstanceState::Running)
    }

    /// Whether the instance can never again become `running` or `stopped`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceState::ShuttingDown | InstanceState::Terminated)
    }
}

impl FromStr for InstanceState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(InstanceState::from_name(s))
    }
}

impl Display for InstanceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    Pending,
    Completed,
    Error,
    Other(String),
}

impl SnapshotState {
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => SnapshotState::Pending,
            "completed" => SnapshotState::Completed,
            "error" => SnapshotState::Error,
            other => SnapshotState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SnapshotState::Pending => "pending",
            SnapshotState::Completed => "completed",
            SnapshotState::Error => "error",
            SnapshotState::Other(name) => name,
        }
    }
}

impl FromStr for SnapshotState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SnapshotState::from_name(s))
    }
}

impl Display for SnapshotState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    pub id: String,
    pub instance_type: String,
    pub availability_zone: String,
    pub state: InstanceState,
    pub public_dns_name: String,
    pub tags: BTreeMap<String, String>,
}

impl InstanceInfo {
    pub fn project(&self) -> Option<&str> {
        self.tags.get(PROJECT_TAG).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    pub id: String,
    pub instance_id: Option<String>,
    pub state: String,
    pub size_gib: i32,
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub id: String,
    pub volume_id: String,
    pub state: SnapshotState,
    pub progress: String,
    pub start_time: Option<DateTime<Utc>>,
}

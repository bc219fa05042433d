#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    io::{self, Write},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shotty_core::{
    cloud_provider::{
        CloudProvider, CreateSnapshotParams, InstanceInfo, InstanceState, PROJECT_TAG,
        SnapshotInfo, SnapshotState, VolumeInfo,
    },
    error::{Error, Result},
};

/// A mutation the fake provider was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Stop(String),
    CreateSnapshot {
        volume_id: String,
        description: String,
    },
}

#[derive(Default)]
struct State {
    instances: Vec<InstanceInfo>,
    volumes: HashMap<String, Vec<VolumeInfo>>,
    snapshots: HashMap<String, Vec<SnapshotInfo>>,
    calls: Vec<Call>,
    failing_stops: HashSet<String>,
    failing_starts: HashSet<String>,
    stuck: HashSet<String>,
    next_snapshot: u32,
}

/// In-memory provider: stop and start take effect immediately unless the
/// instance is marked stuck.
#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<State>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(self, id: &str, project: Option<&str>, state: InstanceState) -> Self {
        let mut tags = BTreeMap::from([("Name".to_string(), format!("{id}-name"))]);
        if let Some(project) = project {
            tags.insert(PROJECT_TAG.to_string(), project.to_string());
        }
        self.state.lock().unwrap().instances.push(InstanceInfo {
            id: id.to_string(),
            instance_type: "t3.micro".to_string(),
            availability_zone: "us-east-1a".to_string(),
            state,
            public_dns_name: format!("{id}.compute.example"),
            tags,
        });
        self
    }

    pub fn with_volume(self, instance_id: &str, volume_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .volumes
            .entry(instance_id.to_string())
            .or_default()
            .push(VolumeInfo {
                id: volume_id.to_string(),
                instance_id: Some(instance_id.to_string()),
                state: "in-use".to_string(),
                size_gib: 8,
                encrypted: false,
            });
        self
    }

    /// Appends a snapshot; the first one added per volume is listed first.
    pub fn with_snapshot(self, volume_id: &str, snapshot_id: &str, state: SnapshotState) -> Self {
        self.state
            .lock()
            .unwrap()
            .snapshots
            .entry(volume_id.to_string())
            .or_default()
            .push(SnapshotInfo {
                id: snapshot_id.to_string(),
                volume_id: volume_id.to_string(),
                state,
                progress: "100%".to_string(),
                start_time: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            });
        self
    }

    pub fn failing_stop(self, instance_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_stops
            .insert(instance_id.to_string());
        self
    }

    pub fn failing_start(self, instance_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_starts
            .insert(instance_id.to_string());
        self
    }

    /// The instance accepts stop/start calls but never changes state.
    pub fn stuck(self, instance_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .stuck
            .insert(instance_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn state_of(&self, instance_id: &str) -> Option<InstanceState> {
        let state = self.state.lock().unwrap();
        state
            .instances
            .iter()
            .find(|instance| instance.id == instance_id)
            .map(|instance| instance.state.clone())
    }

    fn transition(&self, instance_id: &str, call: Call, target: InstanceState) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let failing = match call {
            Call::Stop(_) => &state.failing_stops,
            _ => &state.failing_starts,
        };
        if failing.contains(instance_id) {
            return Err(client_error(instance_id));
        }
        state.calls.push(call);

        if state.stuck.contains(instance_id) {
            return Ok(());
        }
        if let Some(instance) = state
            .instances
            .iter_mut()
            .find(|instance| instance.id == instance_id)
        {
            instance.state = target;
        }
        Ok(())
    }
}

fn client_error(instance_id: &str) -> Error {
    Error::Provider {
        operation_name: "ChangeInstanceState".to_string(),
        code: "IncorrectInstanceState".to_string(),
        detail: format!("The instance '{instance_id}' is not in a valid state"),
    }
}

#[async_trait]
impl CloudProvider for FakeProvider {
    async fn list_instances(&self, project: Option<&str>) -> Result<Vec<InstanceInfo>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .instances
            .iter()
            .filter(|instance| project.is_none() || instance.project() == project)
            .cloned()
            .collect())
    }

    async fn instance_state(&self, instance_id: &str) -> Result<Option<InstanceState>> {
        Ok(self.state_of(instance_id))
    }

    async fn list_volumes(&self, instance_id: &str) -> Result<Vec<VolumeInfo>> {
        let state = self.state.lock().unwrap();
        Ok(state.volumes.get(instance_id).cloned().unwrap_or_default())
    }

    async fn list_snapshots(&self, volume_id: &str) -> Result<Vec<SnapshotInfo>> {
        let state = self.state.lock().unwrap();
        Ok(state.snapshots.get(volume_id).cloned().unwrap_or_default())
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.transition(
            instance_id,
            Call::Start(instance_id.to_string()),
            InstanceState::Running,
        )
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.transition(
            instance_id,
            Call::Stop(instance_id.to_string()),
            InstanceState::Stopped,
        )
    }

    async fn create_snapshot(&self, params: &CreateSnapshotParams<'_>) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.next_snapshot += 1;
        let snapshot_id = format!("snap-new-{}", state.next_snapshot);
        state.calls.push(Call::CreateSnapshot {
            volume_id: params.volume_id.to_string(),
            description: params.description.to_string(),
        });
        state
            .snapshots
            .entry(params.volume_id.to_string())
            .or_default()
            .insert(
                0,
                SnapshotInfo {
                    id: snapshot_id.clone(),
                    volume_id: params.volume_id.to_string(),
                    state: SnapshotState::Pending,
                    progress: "0%".to_string(),
                    start_time: None,
                },
            );
        Ok(snapshot_id)
    }
}

/// Collects command output into a string.
pub fn output(buffer: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(buffer)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Accepts a fixed number of lines, then fails every write with `BrokenPipe`,
/// like stdout piped into `head`.
pub struct ClosingWriter {
    lines_left: usize,
    pub written: Vec<u8>,
}

impl ClosingWriter {
    pub fn after_lines(lines: usize) -> Self {
        Self {
            lines_left: lines,
            written: Vec::new(),
        }
    }
}

impl Write for ClosingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.lines_left == 0 {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.written.extend_from_slice(buf);
        let newlines = buf.iter().filter(|&&byte| byte == b'\n').count();
        self.lines_left = self.lines_left.saturating_sub(newlines);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

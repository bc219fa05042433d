//! Bounded polling for instance state transitions.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::{
    cloud_provider::{CloudProvider, InstanceState},
    error::{ComputeError, Result},
};

#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Delay between state checks
    pub poll_interval: Duration,
    /// Maximum total time to wait before giving up
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Reached,
    TimedOut,
}

/// Polls the provider until `instance_id` reports `target` or the timeout elapses.
///
/// Provider errors are returned as `Err`. An instance that vanishes or enters a
/// terminal state is an error as well, since waiting longer cannot help.
pub async fn wait_for_instance_state(
    provider: &dyn CloudProvider,
    instance_id: &str,
    target: InstanceState,
    config: &WaitConfig,
) -> Result<WaitOutcome> {
    let deadline = Instant::now() + config.timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let current = provider.instance_state(instance_id).await?.ok_or_else(|| {
            ComputeError::InstanceNotFound {
                instance_identifier: instance_id.to_string(),
            }
        })?;

        if current == target {
            debug!(instance_id, target = %target, attempts, "instance reached state");
            return Ok(WaitOutcome::Reached);
        }

        if current.is_terminal() && !target.is_terminal() {
            return Err(ComputeError::InstanceUnreachableState {
                instance_identifier: instance_id.to_string(),
                target,
                current,
            }
            .into());
        }

        let now = Instant::now();
        if now >= deadline {
            debug!(instance_id, target = %target, attempts, "gave up waiting");
            return Ok(WaitOutcome::TimedOut);
        }

        debug!(
            instance_id,
            current = %current,
            target = %target,
            attempt = attempts,
            "instance not ready, polling again"
        );
        tokio::time::sleep(config.poll_interval.min(deadline - now)).await;
    }
}

/// Like [`wait_for_instance_state`] but turns a timeout into an error.
pub async fn require_instance_state(
    provider: &dyn CloudProvider,
    instance_id: &str,
    target: InstanceState,
    config: &WaitConfig,
) -> Result<()> {
    match wait_for_instance_state(provider, instance_id, target.clone(), config).await? {
        WaitOutcome::Reached => Ok(()),
        WaitOutcome::TimedOut => Err(ComputeError::InstanceWaitTimedOut {
            instance_identifier: instance_id.to_string(),
            target,
            seconds: config.timeout.as_secs(),
        }
        .into()),
    }
}

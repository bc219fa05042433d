use thiserror::Error;

use crate::cloud_provider::InstanceState;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("timed out after {seconds} seconds waiting for {instance_identifier} to be {target}")]
    InstanceWaitTimedOut {
        instance_identifier: String,
        target: InstanceState,
        seconds: u64,
    },

    #[error("instance {instance_identifier} cannot reach {target} from {current}")]
    InstanceUnreachableState {
        instance_identifier: String,
        target: InstanceState,
        current: InstanceState,
    },

    #[error("instance {instance_identifier} no longer exists")]
    InstanceNotFound { instance_identifier: String },

    #[error("{resource} missing required identifier")]
    MissingIdentifier { resource: &'static str },
}

mod compute;
mod config;

pub use compute::ComputeError;
pub use config::ConfigurationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InputOutput(#[from] std::io::Error),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("authorization denied: {operation}")]
    Authorization { operation: String },

    #[error("authentication failed during {operation_name}")]
    Authentication { operation_name: String },

    #[error("rate limit or quota exceeded during {operation_name}")]
    Quota { operation_name: String },

    #[error("transient error during {operation_name}: {detail}")]
    Transient {
        operation_name: String,
        detail: String,
    },

    #[error("{operation_name} failed ({code}): {detail}")]
    Provider {
        operation_name: String,
        code: String,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

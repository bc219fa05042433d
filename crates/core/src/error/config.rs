use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("credential profile '{profile}' not found in {searched}")]
    ProfileNotFound { profile: String, searched: String },
}

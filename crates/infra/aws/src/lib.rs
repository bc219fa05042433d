mod aws_error;
mod config;
mod instance;
mod provider;
mod snapshot;
mod volume;

pub use provider::{AwsProvider, AwsProviderConfig};

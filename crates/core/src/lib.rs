//! Provider-neutral core of `shotty`: instance resolution, listing, power
//! state changes and volume snapshots.

pub mod cloud_provider;
pub mod commands;
pub mod credentials;
pub mod error;
pub mod resolver;
pub mod wait;

pub use cloud_provider::CloudProvider;
pub use resolver::InstanceFilter;
pub use wait::WaitConfig;

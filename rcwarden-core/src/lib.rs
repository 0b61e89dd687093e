//! rcwarden core library — service data model, YAML configuration, errors.
//!
//! Public API surface:
//! - [`types`] — service name, descriptor, flavor, resolved paths, outcomes
//! - [`config`] — [`ServiceConfig`] loading and descriptor construction
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::ServiceConfig;
pub use error::ConfigError;
pub use types::{
    DescriptorBuilder, Flavor, HostDefaults, LifecycleOutcome, ResolvedPaths, ServiceDescriptor,
    ServiceName, DEFAULT_STOP_TIMEOUT,
};

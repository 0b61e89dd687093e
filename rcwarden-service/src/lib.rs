//! Service lifecycle: path resolution, control-script installation, and
//! start/stop through the host's init flavor.
//!
//! [`Service`] is the entry point. It binds one [`InitDriver`] at construction
//! (by host detection or explicit override) and returns exactly one
//! [`LifecycleOutcome`](rcwarden_core::LifecycleOutcome) per operation.

pub mod driver;
mod error;
pub mod paths;
mod service;
pub mod shell;
mod writer;

pub use driver::{driver_for, BsdRcDriver, DriverContext, InitDriver, SysVDriver};
pub use error::ServiceError;
pub use service::{Host, Service};
pub use shell::{CommandOutput, CommandRunner, ShellCommand, SystemRunner};

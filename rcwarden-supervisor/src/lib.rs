//! Supervisor for rcwarden control scripts.
//!
//! Starts a script as a detached session leader with its PID recorded in a
//! file, stops it by signal escalation, and reports liveness. Every action
//! ends in one [`Outcome`] that the binary prints as a `<name>: OK|ERROR: ...`
//! status line.

pub mod error;
pub mod identity;
pub mod pidfile;
pub mod process;
pub mod supervise;

pub use error::SupervisorError;
pub use supervise::{run, Action, Options, Outcome};

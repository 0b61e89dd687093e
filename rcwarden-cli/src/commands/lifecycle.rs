//! `rcwarden install|uninstall|start|stop|restart`.

use anyhow::Result;

use rcwarden_core::LifecycleOutcome;
use rcwarden_service::Service;

use super::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Install,
    Uninstall,
    Start,
    Stop,
    Restart,
}

pub fn run(op: Lifecycle, service: &Service) -> Result<u8> {
    let outcome = match op {
        Lifecycle::Install => service.install()?,
        Lifecycle::Uninstall => service.uninstall()?,
        Lifecycle::Start => service.start()?,
        Lifecycle::Stop => service.stop()?,
        Lifecycle::Restart => service.restart()?,
    };
    report(
        outcome.is_success(),
        service.descriptor().name().as_str(),
        &outcome.to_string(),
    );
    Ok(exit_code(&outcome))
}

/// `0` done, `1` already in the requested state, `2` anything else.
pub fn exit_code(outcome: &LifecycleOutcome) -> u8 {
    match outcome {
        LifecycleOutcome::Installed
        | LifecycleOutcome::Uninstalled
        | LifecycleOutcome::Started
        | LifecycleOutcome::Stopped => 0,
        LifecycleOutcome::AlreadyRunning | LifecycleOutcome::NotRunning => 1,
        LifecycleOutcome::AlreadyInstalled
        | LifecycleOutcome::InvalidInstallation
        | LifecycleOutcome::Failed(_) => 2,
    }
}

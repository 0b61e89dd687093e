//! Init-flavor drivers.
//!
//! One [`InitDriver`] per supported flavor. Both share the install/uninstall
//! and start/stop plumbing in this module; they differ in where the control
//! script lives, how it is registered with the host, and whether `start`/`stop`
//! check for the script first.

mod bsd_rc;
mod sysv;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rcwarden_core::{Flavor, LifecycleOutcome, ResolvedPaths, ServiceDescriptor};
use rcwarden_renderer::Renderer;

use crate::error::ServiceError;
use crate::paths;
use crate::shell::{CommandOutput, CommandRunner, ShellCommand};
use crate::writer;

pub use bsd_rc::BsdRcDriver;
pub use sysv::SysVDriver;

/// Supervisor status line printed when `start` finds the service up.
pub const ALREADY_RUNNING_MARKER: &str = "cannot start -- already running";
/// Supervisor status line printed when `stop` finds nothing to stop.
pub const NOT_RUNNING_MARKER: &str = "cannot stop -- not running";

/// Lifecycle operations against one init flavor.
///
/// Every call resolves paths afresh, so a missing host directory surfaces as
/// [`ServiceError::Environment`] before anything is touched.
pub trait InitDriver: Send + Sync {
    fn flavor(&self) -> Flavor;

    /// Resolved artifact paths for `descriptor`.
    fn paths(&self, descriptor: &ServiceDescriptor) -> Result<ResolvedPaths, ServiceError>;

    fn install(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError>;

    fn uninstall(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError>;

    /// Whether the control script exists. No process interaction.
    fn installed(&self, descriptor: &ServiceDescriptor) -> Result<bool, ServiceError> {
        Ok(self.paths(descriptor)?.control_script.exists())
    }

    fn start(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError>;

    fn stop(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError>;

    /// `stop` then `start`, whatever `stop` reported. Identical on every flavor.
    fn restart(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        let stopped = self.stop(descriptor)?;
        tracing::debug!(service = %descriptor.name(), outcome = %stopped, "restart: stop finished");
        self.start(descriptor)
    }
}

/// Host access shared by every driver.
#[derive(Clone)]
pub struct DriverContext {
    /// Filesystem root all flavor paths are derived below.
    pub root: PathBuf,
    pub runner: Arc<dyn CommandRunner>,
}

impl DriverContext {
    pub fn new(root: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }
}

/// Construct the driver for `flavor`.
pub fn driver_for(flavor: Flavor, ctx: DriverContext) -> Result<Box<dyn InitDriver>, ServiceError> {
    Ok(match flavor {
        Flavor::SysV => Box::new(SysVDriver::new(ctx)?),
        Flavor::BsdRc => Box::new(BsdRcDriver::new(ctx)?),
    })
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Control-script action driven by `start`/`stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Start,
    Stop,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }

    fn done(self) -> LifecycleOutcome {
        match self {
            Action::Start => LifecycleOutcome::Started,
            Action::Stop => LifecycleOutcome::Stopped,
        }
    }
}

pub(crate) fn control_command(paths: &ResolvedPaths, action: Action) -> ShellCommand {
    ShellCommand::new(&paths.control_script).arg(action.as_str())
}

/// Invoke the control script's `action` and normalize its exit into an outcome.
pub(crate) fn run_action(
    runner: &dyn CommandRunner,
    paths: &ResolvedPaths,
    action: Action,
) -> LifecycleOutcome {
    let cmd = control_command(paths, action);
    let outcome = match runner.run(&cmd) {
        Err(err) => LifecycleOutcome::Failed(format!("failed to execute `{cmd}`: {err}")),
        Ok(out) if out.success() => action.done(),
        Ok(out) => classify_failure(&cmd, &out, action),
    };
    tracing::info!(command = %cmd, %outcome, "control script action finished");
    outcome
}

fn classify_failure(cmd: &ShellCommand, out: &CommandOutput, action: Action) -> LifecycleOutcome {
    match action {
        Action::Start if out.stdout.contains(ALREADY_RUNNING_MARKER) => {
            LifecycleOutcome::AlreadyRunning
        }
        Action::Stop if out.stdout.contains(NOT_RUNNING_MARKER) => LifecycleOutcome::NotRunning,
        _ => {
            let stderr = out.stderr.trim_end();
            let last_stdout = out.stdout.lines().map(str::trim).rfind(|l| !l.is_empty());
            let detail = if !stderr.is_empty() {
                stderr.to_string()
            } else if let Some(line) = last_stdout {
                line.to_string()
            } else {
                format!("`{cmd}` failed with {}", out.status_label())
            };
            LifecycleOutcome::Failed(detail)
        }
    }
}

/// Run `steps` in order, stopping at the first failure.
///
/// Returns the failure detail (command plus captured stderr), if any.
pub(crate) fn run_steps(runner: &dyn CommandRunner, steps: &[ShellCommand]) -> Option<String> {
    for cmd in steps {
        match runner.run(cmd) {
            Ok(out) if out.success() => {
                tracing::info!(command = %cmd, "registration step succeeded");
            }
            Ok(out) => {
                let stderr = out.stderr.trim_end();
                let detail = if stderr.is_empty() {
                    format!("`{cmd}` failed with {}", out.status_label())
                } else {
                    format!("`{cmd}` failed: {stderr}")
                };
                tracing::warn!(command = %cmd, status = ?out.status, "registration step failed");
                return Some(detail);
            }
            Err(err) => {
                tracing::warn!(command = %cmd, error = %err, "registration step could not run");
                return Some(format!("failed to execute `{cmd}`: {err}"));
            }
        }
    }
    None
}

/// Render and write the control script, then run the flavor's registration.
///
/// An existing script is left untouched. Registration failure is reported but
/// the written script is not rolled back; `uninstall` clears that state.
pub(crate) fn install_with(
    ctx: &DriverContext,
    renderer: &Renderer,
    flavor: Flavor,
    descriptor: &ServiceDescriptor,
    registration: impl FnOnce(&ServiceDescriptor) -> Vec<ShellCommand>,
) -> Result<LifecycleOutcome, ServiceError> {
    let paths = paths::resolve_at(&ctx.root, flavor, descriptor.name())?;
    if paths.control_script.exists() {
        tracing::info!(service = %descriptor.name(), "control script already present");
        return Ok(LifecycleOutcome::AlreadyInstalled);
    }

    let text = renderer.render(flavor, descriptor, &paths)?;
    if let Err(err) = writer::write_executable(&paths.control_script, &text) {
        return Ok(LifecycleOutcome::Failed(format!(
            "failed to write {}: {err}",
            paths.control_script.display()
        )));
    }

    Ok(match run_steps(ctx.runner.as_ref(), &registration(descriptor)) {
        Some(detail) => LifecycleOutcome::Failed(detail),
        None => LifecycleOutcome::Installed,
    })
}

/// Best-effort stop, de-registration, then removal of every artifact.
///
/// Stop failures are swallowed. When no control script exists there is
/// nothing to stop or de-register; leftover PID and log files are still removed.
pub(crate) fn uninstall_with(
    ctx: &DriverContext,
    flavor: Flavor,
    descriptor: &ServiceDescriptor,
    deregistration: impl FnOnce(&ServiceDescriptor) -> Vec<ShellCommand>,
) -> Result<LifecycleOutcome, ServiceError> {
    let paths = paths::resolve_at(&ctx.root, flavor, descriptor.name())?;

    let mut failure = None;
    if paths.control_script.exists() {
        let stopped = run_action(ctx.runner.as_ref(), &paths, Action::Stop);
        tracing::debug!(service = %descriptor.name(), outcome = %stopped, "uninstall: stop attempted");
        failure = run_steps(ctx.runner.as_ref(), &deregistration(descriptor));
    }

    for path in [
        &paths.control_script,
        &paths.pid_file,
        &paths.stdout_log,
        &paths.stderr_log,
    ] {
        if let Err(err) = remove_if_present(path) {
            if failure.is_none() {
                failure = Some(format!("failed to remove {}: {err}", path.display()));
            }
        }
    }

    Ok(match failure {
        Some(detail) => LifecycleOutcome::Failed(detail),
        None => LifecycleOutcome::Uninstalled,
    })
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use rcwarden_core::HostDefaults;

    /// Driver whose start/stop only record the order they were called in.
    struct RecordingDriver {
        calls: Mutex<Vec<&'static str>>,
        stop_outcome: LifecycleOutcome,
    }

    impl RecordingDriver {
        fn new(stop_outcome: LifecycleOutcome) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                stop_outcome,
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InitDriver for RecordingDriver {
        fn flavor(&self) -> Flavor {
            Flavor::SysV
        }

        fn paths(&self, descriptor: &ServiceDescriptor) -> Result<ResolvedPaths, ServiceError> {
            Ok(paths::derive_at(Path::new("/"), Flavor::SysV, descriptor.name()))
        }

        fn install(&self, _: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
            unreachable!()
        }

        fn uninstall(&self, _: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
            unreachable!()
        }

        fn start(&self, _: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
            self.calls.lock().unwrap().push("start");
            Ok(LifecycleOutcome::Started)
        }

        fn stop(&self, _: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
            self.calls.lock().unwrap().push("stop");
            Ok(self.stop_outcome.clone())
        }
    }

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor::builder("sample", "/opt/sample/run.js")
            .build(&HostDefaults {
                user: "0".into(),
                group: "0".into(),
                working_directory: PathBuf::from("/"),
                supervisor: PathBuf::from("/usr/bin/rcwarden-supervise"),
            })
            .unwrap()
    }

    #[test]
    fn restart_stops_then_starts() {
        let driver = RecordingDriver::new(LifecycleOutcome::Stopped);
        let outcome = driver.restart(&descriptor()).unwrap();
        assert_eq!(driver.calls(), vec!["stop", "start"]);
        assert_eq!(outcome, LifecycleOutcome::Started);
    }

    #[test]
    fn restart_starts_even_when_stop_fails() {
        let driver = RecordingDriver::new(LifecycleOutcome::Failed("not running".into()));
        let outcome = driver.restart(&descriptor()).unwrap();
        assert_eq!(driver.calls(), vec!["stop", "start"]);
        assert_eq!(outcome, LifecycleOutcome::Started);
    }

    fn output(status: i32, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            status: Some(status),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn supervisor_status_lines_map_to_expected_outcomes() {
        let cmd = ShellCommand::new("/etc/init.d/sample").arg("start");
        let running = output(1, "sample: ERROR: cannot start -- already running\n", "");
        assert_eq!(
            classify_failure(&cmd, &running, Action::Start),
            LifecycleOutcome::AlreadyRunning
        );
        let stopped = output(1, "sample: ERROR: cannot stop -- not running\n", "");
        assert_eq!(
            classify_failure(&cmd, &stopped, Action::Stop),
            LifecycleOutcome::NotRunning
        );
    }

    #[test]
    fn stderr_becomes_failure_detail() {
        let cmd = ShellCommand::new("/etc/init.d/sample").arg("start");
        let out = output(1, "", "already running\n");
        assert_eq!(
            classify_failure(&cmd, &out, Action::Start),
            LifecycleOutcome::Failed("already running".into())
        );
    }

    #[test]
    fn last_stdout_line_is_detail_when_stderr_is_empty() {
        let cmd = ShellCommand::new("/etc/init.d/sample").arg("start");
        let out = output(
            1,
            "starting\nsample: ERROR: cannot spawn /opt/run.sh: Permission denied\n\n",
            "",
        );
        assert_eq!(
            classify_failure(&cmd, &out, Action::Start),
            LifecycleOutcome::Failed(
                "sample: ERROR: cannot spawn /opt/run.sh: Permission denied".into()
            )
        );
    }

    #[test]
    fn silent_failure_names_command_and_status() {
        let cmd = ShellCommand::new("/etc/init.d/sample").arg("stop");
        let out = output(3, "", "");
        assert_eq!(
            classify_failure(&cmd, &out, Action::Stop),
            LifecycleOutcome::Failed("`/etc/init.d/sample stop` failed with exit status 3".into())
        );
    }
}

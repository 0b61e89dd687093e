//! The `start`, `stop` and `status` actions.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use nix::unistd::{setsid, Pid};

use crate::error::{io_err, SupervisorError};
use crate::identity::Identity;
use crate::{pidfile, process};

/// Log destination that discards output instead of opening a file.
pub const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    Start,
    Stop,
    Status,
}

/// Everything one supervised service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub name: String,
    pub file: PathBuf,
    pub pidfile: PathBuf,
    pub cwd: PathBuf,
    pub stdout: PathBuf,
    pub stderr: PathBuf,
    pub user: String,
    pub group: String,
    pub timeout: Duration,
}

/// Result of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Started,
    AlreadyRunning,
    Stopped,
    NotRunning,
    /// The process outlived SIGKILL plus the remaining timeout.
    Survived(i32),
    Status { running: bool },
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            Outcome::Started | Outcome::Stopped | Outcome::Status { .. }
        )
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Started | Outcome::Stopped | Outcome::Status { running: true } => 0,
            _ => 1,
        }
    }

    /// The status line, e.g. `web: OK: started`.
    pub fn line(&self, name: &str) -> String {
        let level = if self.is_ok() { "OK" } else { "ERROR" };
        format!("{name}: {level}: {self}")
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Started => write!(f, "started"),
            Outcome::AlreadyRunning => write!(f, "cannot start -- already running"),
            Outcome::Stopped => write!(f, "stopped"),
            Outcome::NotRunning => write!(f, "cannot stop -- not running"),
            Outcome::Survived(pid) => write!(f, "cannot stop -- process {pid} is still running"),
            Outcome::Status { running: true } => write!(f, "status: running"),
            Outcome::Status { running: false } => write!(f, "status: not running"),
        }
    }
}

pub fn run(options: &Options, action: Action) -> Result<Outcome, SupervisorError> {
    let outcome = match action {
        Action::Start => start(options)?,
        Action::Stop => stop(options)?,
        Action::Status => Outcome::Status {
            running: running_pid(options)?.is_some(),
        },
    };
    tracing::info!(service = %options.name, ?action, %outcome, "action finished");
    Ok(outcome)
}

fn running_pid(options: &Options) -> Result<Option<Pid>, SupervisorError> {
    match pidfile::read(&options.pidfile)? {
        Some(pid) if process::is_alive(pid)? => Ok(Some(pid)),
        _ => Ok(None),
    }
}

fn start(options: &Options) -> Result<Outcome, SupervisorError> {
    if let Some(pid) = running_pid(options)? {
        tracing::info!(service = %options.name, pid = pid.as_raw(), "already running");
        return Ok(Outcome::AlreadyRunning);
    }

    let identity = Identity::resolve(&options.user, &options.group)?;
    let file = std::path::absolute(&options.file).map_err(|e| io_err(&options.file, e))?;

    let mut cmd = Command::new(&file);
    cmd.current_dir(&options.cwd)
        .stdin(Stdio::null())
        .stdout(log_target(&options.stdout)?)
        .stderr(log_target(&options.stderr)?);
    if let Some(gid) = identity.gid {
        cmd.gid(gid.as_raw());
    }
    if let Some(uid) = identity.uid {
        cmd.uid(uid.as_raw());
    }
    // SAFETY: setsid is async-signal-safe and touches no parent state.
    unsafe {
        cmd.pre_exec(|| setsid().map(drop).map_err(io::Error::from));
    }

    let mut child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
        file: file.clone(),
        source,
    })?;
    let pid = Pid::from_raw(child.id() as i32);
    tracing::info!(
        service = %options.name,
        pid = pid.as_raw(),
        file = %file.display(),
        ?identity,
        "spawned"
    );
    if let Err(err) = pidfile::write(&options.pidfile, pid) {
        // No daemon may outlive a failed PID file write.
        tracing::warn!(pid = pid.as_raw(), error = %err, "pid file not written, killing child");
        let _ = child.kill();
        let _ = child.wait();
        return Err(err);
    }
    Ok(Outcome::Started)
}

fn stop(options: &Options) -> Result<Outcome, SupervisorError> {
    let Some(pid) = running_pid(options)? else {
        pidfile::remove(&options.pidfile)?;
        return Ok(Outcome::NotRunning);
    };
    if !process::terminate(pid, options.timeout)? {
        return Ok(Outcome::Survived(pid.as_raw()));
    }
    pidfile::remove(&options.pidfile)?;
    Ok(Outcome::Stopped)
}

fn log_target(path: &Path) -> Result<Stdio, SupervisorError> {
    if path == Path::new(DEV_NULL) {
        return Ok(Stdio::null());
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    Ok(Stdio::from(file))
}

//! Where each init flavor keeps a service's control script, PID file and logs.
//!
//! Every path is derived below a filesystem `root` (normally `/`). Resolution
//! is recomputed per operation and checks that the flavor's base directories
//! exist, so a misconfigured host is reported at the point of use.

use std::path::{Path, PathBuf};

use rcwarden_core::{Flavor, ResolvedPaths, ServiceName};

use crate::error::ServiceError;

pub const PID_FILE_SUFFIX: &str = ".pid";
pub const STDOUT_LOG_SUFFIX: &str = "-out.log";
pub const STDERR_LOG_SUFFIX: &str = "-err.log";

/// Base directories of one flavor, relative to the filesystem root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlavorLayout {
    pub script_dir: &'static str,
    pub pid_dir: &'static str,
    pub log_dir: &'static str,
}

pub const SYSV_LAYOUT: FlavorLayout = FlavorLayout {
    script_dir: "etc/init.d",
    pid_dir: "var/run",
    log_dir: "var/log",
};

pub const BSD_RC_LAYOUT: FlavorLayout = FlavorLayout {
    script_dir: "etc/rc.d",
    pid_dir: "var/run",
    log_dir: "var/log",
};

pub fn layout(flavor: Flavor) -> &'static FlavorLayout {
    match flavor {
        Flavor::SysV => &SYSV_LAYOUT,
        Flavor::BsdRc => &BSD_RC_LAYOUT,
    }
}

pub fn script_dir(root: &Path, flavor: Flavor) -> PathBuf {
    root.join(layout(flavor).script_dir)
}

pub fn pid_dir(root: &Path, flavor: Flavor) -> PathBuf {
    root.join(layout(flavor).pid_dir)
}

pub fn log_dir(root: &Path, flavor: Flavor) -> PathBuf {
    root.join(layout(flavor).log_dir)
}

/// Derive the four artifact paths. Pure, no I/O.
pub fn derive_at(root: &Path, flavor: Flavor, name: &ServiceName) -> ResolvedPaths {
    let logs = log_dir(root, flavor);
    ResolvedPaths {
        control_script: script_dir(root, flavor).join(name.as_str()),
        pid_file: pid_dir(root, flavor).join(format!("{name}{PID_FILE_SUFFIX}")),
        stdout_log: logs.join(format!("{name}{STDOUT_LOG_SUFFIX}")),
        stderr_log: logs.join(format!("{name}{STDERR_LOG_SUFFIX}")),
    }
}

/// Derive the artifact paths after checking the flavor's base directories exist.
pub fn resolve_at(
    root: &Path,
    flavor: Flavor,
    name: &ServiceName,
) -> Result<ResolvedPaths, ServiceError> {
    for dir in [
        script_dir(root, flavor),
        pid_dir(root, flavor),
        log_dir(root, flavor),
    ] {
        if !dir.is_dir() {
            return Err(ServiceError::Environment { flavor, dir });
        }
    }
    let paths = derive_at(root, flavor, name);
    tracing::debug!(
        service = %name,
        %flavor,
        control_script = %paths.control_script.display(),
        "resolved service paths"
    );
    Ok(paths)
}

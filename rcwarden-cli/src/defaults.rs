//! Process-derived fallbacks for unset descriptor fields.

use std::path::PathBuf;

use anyhow::{Context, Result};
use nix::unistd::{getegid, geteuid};

use rcwarden_core::HostDefaults;

/// Supervisor binary name, expected next to `rcwarden`.
pub const SUPERVISOR_BIN: &str = "rcwarden-supervise";

pub fn host_defaults() -> Result<HostDefaults> {
    let working_directory =
        std::env::current_dir().context("could not determine current directory")?;
    Ok(HostDefaults {
        user: geteuid().to_string(),
        group: getegid().to_string(),
        working_directory,
        supervisor: supervisor_path()?,
    })
}

fn supervisor_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("could not locate the rcwarden executable")?;
    let dir = exe
        .parent()
        .context("rcwarden executable has no parent directory")?;
    Ok(dir.join(SUPERVISOR_BIN))
}

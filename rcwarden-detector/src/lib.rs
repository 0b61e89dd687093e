//! Host detection for `rcwarden-detector`.
//!
//! `detect_flavor(os)` maps an operating-system identifier to the init flavor
//! rcwarden drives on it. `detect_registrar_at(root)` looks for the native
//! service-registration tooling a SysV host ships with. Checks are ordered by
//! preference: `insserv` wins over `chkconfig`.

use std::path::{Path, PathBuf};

use rcwarden_core::Flavor;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Native tool used to register a SysV control script with the runlevels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registrar {
    /// `insserv <name>` / `insserv -r <name>`.
    Insserv { program: PathBuf },
    /// `chkconfig --add <name>` + `chkconfig <name> on`, and the inverse.
    Chkconfig { program: PathBuf },
    /// No registration tooling present; the script is only placed on disk.
    None,
}

/// Errors from host detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("unsupported host platform '{os}': rcwarden supports linux (sysv) and freebsd (bsd-rc) only")]
    UnsupportedPlatform { os: String },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Map an OS identifier (as in `std::env::consts::OS`) to its init flavor.
pub fn detect_flavor(os: &str) -> Result<Flavor, DetectError> {
    match os {
        "linux" => Ok(Flavor::SysV),
        "freebsd" => Ok(Flavor::BsdRc),
        other => Err(DetectError::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}

/// Find the preferred registration tool below `root`.
///
/// Runs on every call; nothing is cached so a tool installed between two
/// operations is picked up by the second.
pub fn detect_registrar_at(root: &Path) -> Registrar {
    if let Some(program) = find_program(root, "insserv") {
        return Registrar::Insserv { program };
    }
    if let Some(program) = find_program(root, "chkconfig") {
        return Registrar::Chkconfig { program };
    }
    Registrar::None
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

const SBIN_DIRS: &[&str] = &["sbin", "usr/sbin"];

fn find_program(root: &Path, name: &str) -> Option<PathBuf> {
    SBIN_DIRS
        .iter()
        .map(|dir| root.join(dir).join(name))
        .find(|candidate| candidate.is_file())
}

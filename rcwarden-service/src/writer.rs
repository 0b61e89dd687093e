//! Atomic writer for control scripts.
//!
//! 1. Write the rendered text to `.<name>.rcwarden.tmp` beside the target.
//! 2. Set mode `0755` on the temp file.
//! 3. Rename onto the final path (atomic on POSIX).
//!
//! The temp file is removed if any step fails.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const CONTROL_SCRIPT_MODE: u32 = 0o755;

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.rcwarden.tmp"))
}

/// Atomically place `content` at `path` as an executable file.
pub(crate) fn write_executable(path: &Path, content: &str) -> io::Result<()> {
    let tmp = tmp_path(path);
    let result = fs::write(&tmp, content)
        .and_then(|()| fs::set_permissions(&tmp, fs::Permissions::from_mode(CONTROL_SCRIPT_MODE)))
        .and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        tracing::info!(path = %path.display(), "wrote control script");
    }
    result
}

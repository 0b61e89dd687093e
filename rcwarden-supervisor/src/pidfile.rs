//! PID file handling. A file that is missing or does not hold a positive
//! integer means "no recorded process".

use std::fs;
use std::io;
use std::path::Path;

use nix::unistd::Pid;

use crate::error::{io_err, SupervisorError};

pub fn read(path: &Path) -> Result<Option<Pid>, SupervisorError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(path, err)),
    };
    match content.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(Some(Pid::from_raw(pid))),
        _ => {
            tracing::warn!(file = %path.display(), "ignoring malformed pid file");
            Ok(None)
        }
    }
}

pub fn write(path: &Path, pid: Pid) -> Result<(), SupervisorError> {
    fs::write(path, format!("{pid}\n")).map_err(|e| io_err(path, e))?;
    tracing::info!(pid = pid.as_raw(), file = %path.display(), "pid file written");
    Ok(())
}

pub fn remove(path: &Path) -> Result<(), SupervisorError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(path, err)),
    }
}

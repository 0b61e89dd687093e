use std::path::{Path, PathBuf};

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot spawn {}: {source}", file.display())]
    Spawn {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown {kind} '{name}'")]
    UnknownIdentity { kind: &'static str, name: String },

    #[error("cannot look up {kind} '{name}': {source}")]
    Lookup {
        kind: &'static str,
        name: String,
        #[source]
        source: Errno,
    },

    #[error("cannot probe process {pid}: {source}")]
    Probe {
        pid: i32,
        #[source]
        source: Errno,
    },

    #[error("cannot signal process {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: Errno,
    },
}

pub(crate) fn io_err(path: &Path, source: std::io::Error) -> SupervisorError {
    SupervisorError::Io {
        path: path.to_path_buf(),
        source,
    }
}

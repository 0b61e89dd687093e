//! Error types for rcwarden-core.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or missing service configuration.
///
/// These are fatal: they surface before any lifecycle operation touches the host.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required descriptor field was not supplied.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The service name cannot be turned into a filename and shell identifier.
    #[error("invalid service name '{raw}': {reason}")]
    InvalidName { raw: String, reason: &'static str },

    /// A relative path was given and the base it should resolve against is relative too.
    #[error("cannot resolve '{path}' against relative base directory '{base}'")]
    RelativeBase { path: PathBuf, base: PathBuf },

    /// Flavor string did not name a supported init flavor.
    #[error("unknown init flavor '{0}'; expected: sysv, bsd-rc")]
    UnknownFlavor(String),

    /// Underlying I/O failure while reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load.
    #[error("failed to parse service config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Attach `path` to an I/O failure.
pub(crate) fn io_err(path: &std::path::Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

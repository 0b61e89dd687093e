//! Template context — serializable rendering payload built from a
//! [`ServiceDescriptor`] and its [`ResolvedPaths`].

use serde::{Deserialize, Serialize};

use rcwarden_core::{Flavor, ResolvedPaths, ServiceDescriptor};

use crate::error::RenderError;

/// Flat rendering payload shared by every control-script template.
///
/// Paths are stringified here so templates never deal with `OsStr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptContext {
    pub flavor: String,
    pub name: String,
    /// Single line; newlines would break the comment header.
    pub description: String,
    pub script: String,
    pub user: String,
    pub group: String,
    pub cwd: String,
    pub supervisor: String,
    pub stop_timeout_ms: u64,
    pub control_script: String,
    pub pid_file: String,
    pub stdout_log: String,
    pub stderr_log: String,
}

impl ScriptContext {
    /// Build a [`ScriptContext`] for one flavor.
    pub fn new(flavor: Flavor, descriptor: &ServiceDescriptor, paths: &ResolvedPaths) -> Self {
        ScriptContext {
            flavor: flavor.to_string(),
            name: descriptor.name().to_string(),
            description: single_line(descriptor.description()),
            script: descriptor.script().display().to_string(),
            user: descriptor.user().to_string(),
            group: descriptor.group().to_string(),
            cwd: descriptor.working_directory().display().to_string(),
            supervisor: descriptor.supervisor().display().to_string(),
            stop_timeout_ms: u64::try_from(descriptor.stop_timeout().as_millis()).unwrap_or(u64::MAX),
            control_script: paths.control_script.display().to_string(),
            pid_file: paths.pid_file.display().to_string(),
            stdout_log: paths.stdout_log.display().to_string(),
            stderr_log: paths.stderr_log.display().to_string(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

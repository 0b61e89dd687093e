//! Domain types for rcwarden services.
//!
//! All path fields use `PathBuf` and are absolute once a [`ServiceDescriptor`]
//! exists. Nothing in here reads ambient process state; callers supply
//! [`HostDefaults`] explicitly.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stop timeout handed to the supervisor when none is configured.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(2000);

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A service name that is both a legal filename and a legal shell identifier.
///
/// Every character outside `[A-Za-z0-9_]` is replaced with `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Sanitize `raw` into a [`ServiceName`].
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingField("name"));
        }
        let sanitized: String = trimmed
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidName {
                raw: raw.to_string(),
                reason: "must not start with a digit",
            });
        }
        if sanitized.chars().all(|c| c == '_') {
            return Err(ConfigError::InvalidName {
                raw: raw.to_string(),
                reason: "contains no letters or digits",
            });
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Supported host init ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    /// SysV-style `/etc/init.d` scripts registered via insserv or chkconfig.
    #[serde(rename = "sysv")]
    SysV,
    /// BSD-style `/etc/rc.d` scripts driven by `rc.subr`.
    #[serde(rename = "bsd-rc")]
    BsdRc,
}

impl Flavor {
    /// All flavors in a stable order.
    pub fn all() -> &'static [Flavor] {
        &[Flavor::SysV, Flavor::BsdRc]
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::SysV => write!(f, "sysv"),
            Flavor::BsdRc => write!(f, "bsd-rc"),
        }
    }
}

impl FromStr for Flavor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sysv" | "sysvinit" | "init.d" => Ok(Flavor::SysV),
            "bsd-rc" | "bsdrc" | "rc.d" => Ok(Flavor::BsdRc),
            other => Err(ConfigError::UnknownFlavor(other.to_string())),
        }
    }
}

/// The single result of a lifecycle operation.
///
/// Expected conditions are variants here, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum LifecycleOutcome {
    Installed,
    AlreadyInstalled,
    Uninstalled,
    Started,
    AlreadyRunning,
    Stopped,
    NotRunning,
    InvalidInstallation,
    Failed(String),
}

impl LifecycleOutcome {
    /// `true` for the variants that mean the requested transition happened.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            LifecycleOutcome::Installed
                | LifecycleOutcome::Uninstalled
                | LifecycleOutcome::Started
                | LifecycleOutcome::Stopped
        )
    }
}

impl fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleOutcome::Installed => write!(f, "installed"),
            LifecycleOutcome::AlreadyInstalled => write!(f, "already installed"),
            LifecycleOutcome::Uninstalled => write!(f, "uninstalled"),
            LifecycleOutcome::Started => write!(f, "started"),
            LifecycleOutcome::AlreadyRunning => write!(f, "already running"),
            LifecycleOutcome::Stopped => write!(f, "stopped"),
            LifecycleOutcome::NotRunning => write!(f, "not running"),
            LifecycleOutcome::InvalidInstallation => write!(f, "invalid installation"),
            LifecycleOutcome::Failed(detail) => write!(f, "{detail}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// The four well-known artifact paths of one service under one flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub control_script: PathBuf,
    pub pid_file: PathBuf,
    pub stdout_log: PathBuf,
    pub stderr_log: PathBuf,
}

/// Process identity and locations used when a descriptor leaves a field unset.
///
/// Built once at the program boundary; the core never queries the running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDefaults {
    /// Effective user (name or numeric uid).
    pub user: String,
    /// Effective group (name or numeric gid).
    pub group: String,
    /// Absolute working directory.
    pub working_directory: PathBuf,
    /// Absolute path of the supervisor executable.
    pub supervisor: PathBuf,
}

/// Immutable description of one supervised script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: ServiceName,
    description: String,
    script: PathBuf,
    user: String,
    group: String,
    working_directory: PathBuf,
    supervisor: PathBuf,
    stop_timeout: Duration,
}

impl ServiceDescriptor {
    /// Start building a descriptor for `name` running `script`.
    pub fn builder(name: impl Into<String>, script: impl Into<PathBuf>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            script: script.into(),
            ..DescriptorBuilder::default()
        }
    }

    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn supervisor(&self) -> &Path {
        &self.supervisor
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }
}

/// Builder for [`ServiceDescriptor`]; unset fields fall back to [`HostDefaults`].
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    name: String,
    script: PathBuf,
    description: Option<String>,
    user: Option<String>,
    group: Option<String>,
    working_directory: Option<PathBuf>,
    supervisor: Option<PathBuf>,
    stop_timeout: Option<Duration>,
}

impl DescriptorBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn supervisor(mut self, supervisor: impl Into<PathBuf>) -> Self {
        self.supervisor = Some(supervisor.into());
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = Some(timeout);
        self
    }

    /// Validate, sanitize and absolutize into a [`ServiceDescriptor`].
    ///
    /// Relative paths resolve against the (absolute) working directory.
    pub fn build(self, defaults: &HostDefaults) -> Result<ServiceDescriptor, ConfigError> {
        let name = ServiceName::new(&self.name)?;
        if self.script.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("script"));
        }

        let working_directory = absolutize(
            &self
                .working_directory
                .unwrap_or_else(|| defaults.working_directory.clone()),
            &defaults.working_directory,
        )?;
        let script = absolutize(&self.script, &working_directory)?;
        let supervisor = absolutize(
            &self.supervisor.unwrap_or_else(|| defaults.supervisor.clone()),
            &working_directory,
        )?;

        Ok(ServiceDescriptor {
            name,
            description: self.description.unwrap_or_default(),
            script,
            user: non_empty(self.user).unwrap_or_else(|| defaults.user.clone()),
            group: non_empty(self.group).unwrap_or_else(|| defaults.group.clone()),
            working_directory,
            supervisor,
            stop_timeout: self.stop_timeout.unwrap_or(DEFAULT_STOP_TIMEOUT),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lexically resolve `path` against `base` and drop `.`/`..` components.
///
/// No filesystem access; symlinks are not followed.
pub fn absolutize(path: &Path, base: &Path) -> Result<PathBuf, ConfigError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else if base.is_absolute() {
        base.join(path)
    } else {
        return Err(ConfigError::RelativeBase {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        });
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

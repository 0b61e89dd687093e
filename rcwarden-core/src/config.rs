//! YAML service configuration.
//!
//! # File format
//!
//! ```yaml
//! name: sample
//! description: Sample Service
//! script: /opt/sample/run.sh
//! user: www-data        # or a numeric uid
//! group: 33             # or a group name
//! cwd: /opt/sample
//! stop_timeout_ms: 5000
//! flavor: sysv          # optional; otherwise detected from the host
//! ```
//!
//! Every field is optional at parse time so that command-line flags can fill
//! the gaps; [`ServiceConfig::to_descriptor`] enforces what is required.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::{Flavor, HostDefaults, ServiceDescriptor};

/// Partially-specified service, as read from YAML or assembled from flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    #[serde(
        default,
        deserialize_with = "id_or_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<String>,
    #[serde(
        default,
        deserialize_with = "id_or_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<Flavor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrName {
    Id(u32),
    Name(String),
}

fn id_or_name<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdOrName>::deserialize(d)?.map(|v| match v {
        IdOrName::Id(id) => id.to_string(),
        IdOrName::Name(name) => name,
    }))
}

impl ServiceConfig {
    /// Load a config file. Relative paths inside it stay relative until
    /// [`ServiceConfig::to_descriptor`] resolves them.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merge(self, overrides: ServiceConfig) -> ServiceConfig {
        ServiceConfig {
            name: overrides.name.or(self.name),
            description: overrides.description.or(self.description),
            script: overrides.script.or(self.script),
            user: overrides.user.or(self.user),
            group: overrides.group.or(self.group),
            cwd: overrides.cwd.or(self.cwd),
            supervisor: overrides.supervisor.or(self.supervisor),
            stop_timeout_ms: overrides.stop_timeout_ms.or(self.stop_timeout_ms),
            flavor: overrides.flavor.or(self.flavor),
        }
    }

    /// Build the immutable descriptor, filling unset fields from `defaults`.
    pub fn to_descriptor(&self, defaults: &HostDefaults) -> Result<ServiceDescriptor, ConfigError> {
        let name = self.name.as_deref().ok_or(ConfigError::MissingField("name"))?;
        let script = self
            .script
            .as_deref()
            .ok_or(ConfigError::MissingField("script"))?;

        let mut builder = ServiceDescriptor::builder(name, script);
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }
        if let Some(user) = &self.user {
            builder = builder.user(user.clone());
        }
        if let Some(group) = &self.group {
            builder = builder.group(group.clone());
        }
        if let Some(cwd) = &self.cwd {
            builder = builder.working_directory(cwd.clone());
        }
        if let Some(supervisor) = &self.supervisor {
            builder = builder.supervisor(supervisor.clone());
        }
        if let Some(ms) = self.stop_timeout_ms {
            builder = builder.stop_timeout(Duration::from_millis(ms));
        }
        builder.build(defaults)
    }
}

//! Service selection flags shared by every subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rcwarden_core::{Flavor, ServiceConfig};
use rcwarden_service::{Host, Service};

use crate::defaults::host_defaults;

/// Where the service definition comes from. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// YAML service definition.
    #[arg(long, short = 'c', global = true, env = "RCWARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Service name; sanitized to letters, digits and `_`.
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Script the service runs.
    #[arg(long, global = true)]
    pub script: Option<PathBuf>,

    /// One-line description for the init headers.
    #[arg(long, global = true)]
    pub description: Option<String>,

    /// User the script runs as (name or uid).
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Group the script runs as (name or gid).
    #[arg(long, global = true)]
    pub group: Option<String>,

    /// Working directory of the script.
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Supervisor executable embedded in the control script.
    #[arg(long, global = true)]
    pub supervisor: Option<PathBuf>,

    /// Milliseconds `stop` waits before escalating to SIGKILL.
    #[arg(long, global = true)]
    pub stop_timeout_ms: Option<u64>,

    /// Init flavor (sysv, bsd-rc) instead of detecting it.
    #[arg(long, global = true)]
    pub flavor: Option<Flavor>,

    /// Filesystem root all service paths are derived below.
    #[arg(long, global = true, env = "RCWARDEN_ROOT", hide = true)]
    pub root: Option<PathBuf>,
}

impl ServiceArgs {
    fn overrides(&self) -> ServiceConfig {
        ServiceConfig {
            name: self.name.clone(),
            description: self.description.clone(),
            script: self.script.clone(),
            user: self.user.clone(),
            group: self.group.clone(),
            cwd: self.cwd.clone(),
            supervisor: self.supervisor.clone(),
            stop_timeout_ms: self.stop_timeout_ms,
            flavor: self.flavor,
        }
    }

    /// The config file, if any, with flags layered on top.
    pub fn config(&self) -> Result<ServiceConfig> {
        let base = match &self.config {
            Some(path) => ServiceConfig::load_at(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        Ok(base.merge(self.overrides()))
    }

    /// Bind the configured service to this host.
    pub fn service(&self) -> Result<Service> {
        let config = self.config()?;
        tracing::debug!(?config, "effective service configuration");

        let defaults = host_defaults()?;
        let descriptor = config
            .to_descriptor(&defaults)
            .context("invalid service definition")?;

        let mut host = Host::system();
        if let Some(root) = &self.root {
            host = host.with_root(root);
        }
        if let Some(flavor) = config.flavor {
            host = host.with_flavor(flavor);
        }
        Ok(Service::with_host(descriptor, host)?)
    }
}

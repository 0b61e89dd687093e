//! `rcwarden status` — installation state.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use rcwarden_core::{Flavor, ResolvedPaths};
use rcwarden_service::Service;

use super::report;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    name: &'a str,
    flavor: Flavor,
    installed: bool,
    paths: ResolvedPaths,
}

impl StatusArgs {
    pub fn run(self, service: &Service) -> Result<u8> {
        let name = service.descriptor().name().as_str();
        let installed = service.installed()?;
        let paths = service.paths()?;

        if self.json {
            let payload = StatusJson {
                name,
                flavor: service.flavor(),
                installed,
                paths,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
        } else if installed {
            report(
                true,
                name,
                &format!(
                    "installed ({}) at {}",
                    service.flavor(),
                    paths.control_script.display()
                ),
            );
        } else {
            report(false, name, "not installed");
        }

        Ok(if installed { 0 } else { 1 })
    }
}

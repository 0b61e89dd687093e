//! SysV-style driver: `/etc/init.d/<name>`, registered with insserv or chkconfig.

use rcwarden_core::{Flavor, LifecycleOutcome, ResolvedPaths, ServiceDescriptor};
use rcwarden_detector::{detect_registrar_at, Registrar};
use rcwarden_renderer::Renderer;

use super::{install_with, run_action, uninstall_with, Action, DriverContext, InitDriver};
use crate::error::ServiceError;
use crate::paths;
use crate::shell::ShellCommand;

pub struct SysVDriver {
    ctx: DriverContext,
    renderer: Renderer,
}

impl SysVDriver {
    pub fn new(ctx: DriverContext) -> Result<Self, ServiceError> {
        Ok(Self {
            ctx,
            renderer: Renderer::new()?,
        })
    }

    /// Registration steps for whatever tooling the host has right now.
    fn registration(&self, descriptor: &ServiceDescriptor) -> Vec<ShellCommand> {
        let name = descriptor.name().as_str();
        match detect_registrar_at(&self.ctx.root) {
            Registrar::Insserv { program } => vec![ShellCommand::new(program).arg(name)],
            Registrar::Chkconfig { program } => vec![
                ShellCommand::new(&program).arg("--add").arg(name),
                ShellCommand::new(&program).arg(name).arg("on"),
            ],
            Registrar::None => Vec::new(),
        }
    }

    /// Inverse of [`SysVDriver::registration`], in reverse order.
    fn deregistration(&self, descriptor: &ServiceDescriptor) -> Vec<ShellCommand> {
        let name = descriptor.name().as_str();
        match detect_registrar_at(&self.ctx.root) {
            Registrar::Insserv { program } => {
                vec![ShellCommand::new(program).arg("-r").arg(name)]
            }
            Registrar::Chkconfig { program } => vec![
                ShellCommand::new(&program).arg(name).arg("off"),
                ShellCommand::new(&program).arg("--del").arg(name),
            ],
            Registrar::None => Vec::new(),
        }
    }
}

impl InitDriver for SysVDriver {
    fn flavor(&self) -> Flavor {
        Flavor::SysV
    }

    fn paths(&self, descriptor: &ServiceDescriptor) -> Result<ResolvedPaths, ServiceError> {
        paths::resolve_at(&self.ctx.root, Flavor::SysV, descriptor.name())
    }

    fn install(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        install_with(&self.ctx, &self.renderer, Flavor::SysV, descriptor, |d| {
            self.registration(d)
        })
    }

    fn uninstall(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        uninstall_with(&self.ctx, Flavor::SysV, descriptor, |d| self.deregistration(d))
    }

    // No existence pre-check: a missing script surfaces as a failed execution.
    fn start(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        let paths = self.paths(descriptor)?;
        Ok(run_action(self.ctx.runner.as_ref(), &paths, Action::Start))
    }

    fn stop(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        let paths = self.paths(descriptor)?;
        Ok(run_action(self.ctx.runner.as_ref(), &paths, Action::Stop))
    }
}

//! BSD rc driver: `/etc/rc.d/<name>` sourcing `rc.subr`.
//!
//! `rc.subr` discovers scripts by convention, so there is no registration step.
//! `start`/`stop` refuse to run without an installed script.

use rcwarden_core::{Flavor, LifecycleOutcome, ResolvedPaths, ServiceDescriptor};
use rcwarden_renderer::Renderer;

use super::{install_with, run_action, uninstall_with, Action, DriverContext, InitDriver};
use crate::error::ServiceError;
use crate::paths;

pub struct BsdRcDriver {
    ctx: DriverContext,
    renderer: Renderer,
}

impl BsdRcDriver {
    pub fn new(ctx: DriverContext) -> Result<Self, ServiceError> {
        Ok(Self {
            ctx,
            renderer: Renderer::new()?,
        })
    }

    fn drive(
        &self,
        descriptor: &ServiceDescriptor,
        action: Action,
    ) -> Result<LifecycleOutcome, ServiceError> {
        let paths = self.paths(descriptor)?;
        if !paths.control_script.exists() {
            tracing::warn!(
                service = %descriptor.name(),
                path = %paths.control_script.display(),
                "control script missing"
            );
            return Ok(LifecycleOutcome::InvalidInstallation);
        }
        Ok(run_action(self.ctx.runner.as_ref(), &paths, action))
    }
}

impl InitDriver for BsdRcDriver {
    fn flavor(&self) -> Flavor {
        Flavor::BsdRc
    }

    fn paths(&self, descriptor: &ServiceDescriptor) -> Result<ResolvedPaths, ServiceError> {
        paths::resolve_at(&self.ctx.root, Flavor::BsdRc, descriptor.name())
    }

    fn install(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        install_with(&self.ctx, &self.renderer, Flavor::BsdRc, descriptor, |_| Vec::new())
    }

    fn uninstall(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        uninstall_with(&self.ctx, Flavor::BsdRc, descriptor, |_| Vec::new())
    }

    fn start(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        self.drive(descriptor, Action::Start)
    }

    fn stop(&self, descriptor: &ServiceDescriptor) -> Result<LifecycleOutcome, ServiceError> {
        self.drive(descriptor, Action::Stop)
    }
}

//! Binds one service definition to the init driver of the host it runs on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rcwarden_core::{Flavor, LifecycleOutcome, ResolvedPaths, ServiceDescriptor};
use rcwarden_detector::detect_flavor;

use crate::driver::{driver_for, DriverContext, InitDriver};
use crate::error::ServiceError;
use crate::shell::{CommandRunner, SystemRunner};

/// The host a [`Service`] operates on.
///
/// Defaults to the real system: root `/`, the compile-time OS, and
/// [`SystemRunner`]. Each piece can be replaced for staging or tests.
#[derive(Clone)]
pub struct Host {
    root: PathBuf,
    os: String,
    flavor: Option<Flavor>,
    runner: Arc<dyn CommandRunner>,
}

impl Host {
    pub fn system() -> Self {
        Self {
            root: PathBuf::from("/"),
            os: std::env::consts::OS.to_string(),
            flavor: None,
            runner: Arc::new(SystemRunner),
        }
    }

    /// Derive every path below `root` instead of `/`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Identify the host by `os` instead of the compile-time OS.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Skip detection and use `flavor`.
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The flavor this host resolves to; fails for unsupported platforms.
    pub fn flavor(&self) -> Result<Flavor, ServiceError> {
        match self.flavor {
            Some(flavor) => Ok(flavor),
            None => Ok(detect_flavor(&self.os)?),
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("root", &self.root)
            .field("os", &self.os)
            .field("flavor", &self.flavor)
            .finish_non_exhaustive()
    }
}

/// A managed service: lifecycle operations for one [`ServiceDescriptor`].
///
/// The driver is chosen once, here; an unsupported host fails construction.
/// Operations are meant to be called serially and each returns exactly one
/// [`LifecycleOutcome`].
pub struct Service {
    descriptor: ServiceDescriptor,
    driver: Box<dyn InitDriver>,
}

impl Service {
    /// Bind `descriptor` to the driver for the running system.
    pub fn new(descriptor: ServiceDescriptor) -> Result<Self, ServiceError> {
        Self::with_host(descriptor, Host::system())
    }

    /// Bind `descriptor` to the driver for `host`.
    pub fn with_host(descriptor: ServiceDescriptor, host: Host) -> Result<Self, ServiceError> {
        let flavor = host.flavor()?;
        let driver = driver_for(flavor, DriverContext::new(host.root, host.runner))?;
        tracing::debug!(service = %descriptor.name(), %flavor, "service bound to driver");
        Ok(Self { descriptor, driver })
    }

    /// Bind `descriptor` to an already-constructed driver.
    pub fn with_driver(descriptor: ServiceDescriptor, driver: Box<dyn InitDriver>) -> Self {
        Self { descriptor, driver }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn flavor(&self) -> Flavor {
        self.driver.flavor()
    }

    pub fn paths(&self) -> Result<ResolvedPaths, ServiceError> {
        self.driver.paths(&self.descriptor)
    }

    pub fn install(&self) -> Result<LifecycleOutcome, ServiceError> {
        self.finish("install", self.driver.install(&self.descriptor))
    }

    pub fn uninstall(&self) -> Result<LifecycleOutcome, ServiceError> {
        self.finish("uninstall", self.driver.uninstall(&self.descriptor))
    }

    pub fn installed(&self) -> Result<bool, ServiceError> {
        self.driver.installed(&self.descriptor)
    }

    pub fn start(&self) -> Result<LifecycleOutcome, ServiceError> {
        self.finish("start", self.driver.start(&self.descriptor))
    }

    pub fn stop(&self) -> Result<LifecycleOutcome, ServiceError> {
        self.finish("stop", self.driver.stop(&self.descriptor))
    }

    pub fn restart(&self) -> Result<LifecycleOutcome, ServiceError> {
        self.finish("restart", self.driver.restart(&self.descriptor))
    }

    fn finish(
        &self,
        operation: &'static str,
        result: Result<LifecycleOutcome, ServiceError>,
    ) -> Result<LifecycleOutcome, ServiceError> {
        match &result {
            Ok(outcome) => tracing::info!(
                service = %self.descriptor.name(),
                flavor = %self.flavor(),
                operation,
                %outcome,
                "lifecycle operation finished"
            ),
            Err(err) => tracing::warn!(
                service = %self.descriptor.name(),
                operation,
                error = %err,
                "lifecycle operation aborted"
            ),
        }
        result
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("descriptor", &self.descriptor)
            .field("flavor", &self.flavor())
            .finish()
    }
}

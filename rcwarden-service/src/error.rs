use std::path::PathBuf;

use rcwarden_core::{ConfigError, Flavor};
use rcwarden_detector::DetectError;
use rcwarden_renderer::RenderError;
use thiserror::Error;

/// Fatal errors that stop an operation before any external command runs.
///
/// Expected conditions and command failures are not errors; they come back as
/// [`LifecycleOutcome`](rcwarden_core::LifecycleOutcome) variants.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("configuration error: {0}")]
    UnsupportedPlatform(#[from] DetectError),

    #[error("environment error: {flavor} host has no directory {}", dir.display())]
    Environment { flavor: Flavor, dir: PathBuf },

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

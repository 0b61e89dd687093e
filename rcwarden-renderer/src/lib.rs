//! # rcwarden-renderer
//!
//! Tera-based generator for the per-flavor control scripts rcwarden installs
//! into a host's init directory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rcwarden_core::{Flavor, ResolvedPaths, ServiceDescriptor};
//! use rcwarden_renderer::Renderer;
//!
//! fn print_script(descriptor: &ServiceDescriptor, paths: &ResolvedPaths) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(script) = renderer.render(Flavor::SysV, descriptor, paths) {
//!             println!("{script}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::ScriptContext;
pub use engine::{template_name, Renderer};
pub use error::RenderError;

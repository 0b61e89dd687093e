//! Tera rendering engine — per-flavor template selection and [`Renderer`].
//!
//! # Template mapping
//!
//! | Flavor  | Template                 | Installed at          |
//! |---------|--------------------------|-----------------------|
//! | SysV    | `sysv/control.sh.tera`   | `<init.d>/<name>`     |
//! | BSD rc  | `bsd_rc/control.sh.tera` | `<rc.d>/<name>`       |
//!
//! Both include `shared/_supervisor_fn.tera`, the shell function that invokes
//! the supervisor with the service's flags.

use std::collections::HashMap;

use tera::{Tera, Value};

use rcwarden_core::{Flavor, ResolvedPaths, ServiceDescriptor};

use crate::context::ScriptContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked in via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    (
        "shared/_supervisor_fn.tera",
        include_str!("templates/_partials/supervisor_fn.tera"),
    ),
    ("sysv/control.sh.tera", include_str!("templates/sysv.sh.tera")),
    ("bsd_rc/control.sh.tera", include_str!("templates/bsd_rc.sh.tera")),
];

/// Template rendered for `flavor`.
pub fn template_name(flavor: Flavor) -> &'static str {
    match flavor {
        Flavor::SysV => "sysv/control.sh.tera",
        Flavor::BsdRc => "bsd_rc/control.sh.tera",
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// `dq`: escape a value for a double-quoted shell word.
fn shell_double_quote(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    Ok(Value::String(out))
}

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    tera.register_filter("dq", shell_double_quote);
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based control-script renderer.
///
/// Rendering is a pure function of its inputs: no timestamps, no randomness.
/// Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    /// Render the control script for `descriptor` under `flavor`.
    pub fn render(
        &self,
        flavor: Flavor,
        descriptor: &ServiceDescriptor,
        paths: &ResolvedPaths,
    ) -> Result<String, RenderError> {
        let ctx = ScriptContext::new(flavor, descriptor, paths);
        self.render_with_context(flavor, &ctx)
    }

    /// Render using a caller-provided [`ScriptContext`].
    pub fn render_with_context(
        &self,
        flavor: Flavor,
        ctx: &ScriptContext,
    ) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(template_name(flavor), &tera_ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

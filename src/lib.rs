//! prompty: load and render `.prompty` chat template assets.
//!
//! A `.prompty` asset is a static file: YAML metadata front matter (name,
//! description, target model, declared inputs) followed by a natural-language
//! prompt body with `{{placeholder}}` substitutions and a repeating
//! `{{#documents}}...{{/documents}}` block that expands once per retrieved
//! document. This crate parses those assets and renders them against a
//! per-invocation [`RenderContext`]. Calling a model and retrieving documents
//! belong to the surrounding orchestration, not to this crate.

pub mod body;
pub mod check;
pub mod context;
pub mod document;
pub mod error;
pub mod render;
pub mod templates;

use std::path::Path;

pub use check::{CheckReport, Finding, Severity, check};
pub use context::{Document, InputValue, Message, RenderContext, Role};
pub use document::{InputKind, InputSpec, Metadata, ModelApi, ModelSpec, TemplateDocument};
pub use error::TemplateError;
pub use render::render;

/// Parse a template from source text and render it in one step.
pub fn render_str(source: &str, context: &RenderContext) -> Result<String, TemplateError> {
    let template = TemplateDocument::parse(source)?;
    render::render(&template, context)
}

/// Load a template file and render it in one step.
pub fn render_file(
    path: impl AsRef<Path>,
    context: &RenderContext,
) -> Result<String, TemplateError> {
    let template = TemplateDocument::load(path.as_ref())?;
    render::render(&template, context)
}

/// Load a template file and run authoring checks on it.
pub fn check_file(path: impl AsRef<Path>) -> Result<CheckReport, TemplateError> {
    let template = TemplateDocument::load(path.as_ref())?;
    Ok(check::check(&template))
}

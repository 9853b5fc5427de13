//! Template rendering.
//!
//! A pure function of `(TemplateDocument, RenderContext)`: no I/O, no shared
//! state, deterministic, safe to call concurrently.

use crate::body::Node;
use crate::context::{self, Document, RenderContext};
use crate::document::{CONVERSATION_INPUT, DOCUMENTS_SECTION, TemplateDocument};
use crate::error::TemplateError;

/// Render `template` against `context` into the final prompt string.
///
/// Every declared input must be supplied by the context. The documents block
/// expands once per document in input order (zero expansions for an empty
/// list), and every other placeholder substitutes exactly once. The result
/// contains no unresolved placeholders; on failure nothing is returned.
pub fn render(
    template: &TemplateDocument,
    context: &RenderContext,
) -> Result<String, TemplateError> {
    for name in template.metadata.inputs.keys() {
        if !context.supplies(name) {
            return Err(TemplateError::MissingInput(name.clone()));
        }
    }

    let mut out = String::with_capacity(template.body.len());
    render_nodes(&template.nodes, context, None, &mut out)?;
    Ok(out)
}

fn render_nodes(
    nodes: &[Node],
    context: &RenderContext,
    document: Option<&Document>,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder(name) => out.push_str(&resolve(name, context, document)?),
            Node::Section { name, children } => {
                if name != DOCUMENTS_SECTION {
                    return Err(TemplateError::UnknownPlaceholder(name.clone()));
                }
                let documents = context
                    .documents
                    .as_deref()
                    .ok_or_else(|| TemplateError::MissingInput(DOCUMENTS_SECTION.to_string()))?;
                for entry in documents {
                    render_nodes(children, context, Some(entry), out)?;
                }
            }
        }
    }
    Ok(())
}

fn resolve(
    name: &str,
    context: &RenderContext,
    document: Option<&Document>,
) -> Result<String, TemplateError> {
    if let Some(entry) = document {
        match name {
            "id" => return Ok(entry.id.clone()),
            "title" => return Ok(entry.title.clone()),
            "content" => return Ok(entry.content.clone()),
            _ => {}
        }
    }

    match name {
        CONVERSATION_INPUT => context
            .conversation
            .as_deref()
            .map(context::transcript)
            .ok_or_else(|| TemplateError::MissingInput(name.to_string())),
        _ => context
            .extra
            .get(name)
            .map(|value| value.as_str().to_string())
            .ok_or_else(|| TemplateError::MissingInput(name.to_string())),
    }
}

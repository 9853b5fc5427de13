//! Template document model and front matter parsing.
//!
//! A `.prompty` asset starts with a `---` fenced YAML metadata block (name,
//! description, target model, declared inputs) followed by the prompt body.
//! Documents are parsed once at load time and immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::{self, Node};
use crate::error::TemplateError;

/// Name of the structural repeating block.
pub(crate) const DOCUMENTS_SECTION: &str = "documents";

/// Name of the conversation-history input.
pub(crate) const CONVERSATION_INPUT: &str = "conversation";

/// Placeholder names local to the documents block.
pub(crate) const DOCUMENT_FIELDS: [&str; 3] = ["id", "title", "content"];

/// Which completion API the template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelApi {
    Chat,
    Completion,
}

impl fmt::Display for ModelApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelApi::Chat => f.write_str("chat"),
            ModelApi::Completion => f.write_str("completion"),
        }
    }
}

/// Declared type of a template input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::String => f.write_str("string"),
            InputKind::Number => f.write_str("number"),
            InputKind::Boolean => f.write_str("boolean"),
            InputKind::Array => f.write_str("array"),
            InputKind::Object => f.write_str("object"),
        }
    }
}

/// Declaration of one template input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Model block of the metadata front matter.
///
/// `configuration` holds deployment settings (endpoint names and the like);
/// they are passed through to the orchestration layer untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub api: ModelApi,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configuration: BTreeMap<String, serde_yaml::Value>,
}

/// Parsed metadata front matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub model: ModelSpec,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputSpec>,
}

/// A parsed template asset: metadata plus the prompt body.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    pub metadata: Metadata,
    /// Body text as authored.
    pub body: String,
    pub(crate) nodes: Vec<Node>,
}

impl TemplateDocument {
    /// Parse a template from its on-disk text.
    ///
    /// Parsing validates the body against the declared inputs: every
    /// placeholder must be a declared input or a field of the documents
    /// block, and the block marker itself may only appear in section form.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let (front, body) = split_front_matter(source)?;
        let metadata: Metadata = serde_yaml::from_str(front).map_err(TemplateError::Metadata)?;
        let nodes = body::parse(body)?;
        let document = Self { metadata, body: body.to_string(), nodes };
        document.validate_nodes(&document.nodes, false)?;
        Ok(document)
    }

    /// Load and parse a template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Whether `name` is declared in the template's inputs.
    pub fn declares_input(&self, name: &str) -> bool {
        self.metadata.inputs.contains_key(name)
    }

    fn validate_nodes(&self, nodes: &[Node], in_documents: bool) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(_) => {}
                Node::Placeholder(name) if name == DOCUMENTS_SECTION => {
                    return Err(TemplateError::StructuralPlaceholder(name.clone()));
                }
                Node::Placeholder(name) => {
                    let local = in_documents && DOCUMENT_FIELDS.contains(&name.as_str());
                    if !local && !self.declares_input(name) {
                        return Err(TemplateError::UnknownPlaceholder(name.clone()));
                    }
                }
                Node::Section { name, children } => {
                    if name != DOCUMENTS_SECTION {
                        return Err(TemplateError::UnknownPlaceholder(name.clone()));
                    }
                    self.validate_nodes(children, true)?;
                }
            }
        }
        Ok(())
    }
}

/// Split the `---` fenced YAML front matter from the body text.
fn split_front_matter(source: &str) -> Result<(&str, &str), TemplateError> {
    let rest = source.strip_prefix("---").ok_or(TemplateError::MissingFrontMatter)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .ok_or(TemplateError::MissingFrontMatter)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(TemplateError::UnterminatedFrontMatter)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "---\nname: test\nmodel:\n  api: chat\ninputs:\n  question:\n    type: string\n---\nQ: {{question}}\n";

    #[test]
    fn parses_metadata_and_body() {
        let doc = TemplateDocument::parse(MINIMAL).unwrap();
        assert_eq!(doc.metadata.name, "test");
        assert_eq!(doc.metadata.model.api, ModelApi::Chat);
        assert_eq!(doc.metadata.inputs["question"].kind, InputKind::String);
        assert_eq!(doc.body, "Q: {{question}}\n");
    }

    #[test]
    fn missing_fence_is_rejected() {
        let err = TemplateDocument::parse("name: test\n").unwrap_err();
        assert!(matches!(err, TemplateError::MissingFrontMatter));
    }

    #[test]
    fn unterminated_fence_is_rejected() {
        let err = TemplateDocument::parse("---\nname: test\n").unwrap_err();
        assert!(matches!(err, TemplateError::UnterminatedFrontMatter));
    }

    #[test]
    fn invalid_yaml_front_matter_is_rejected() {
        let err = TemplateDocument::parse("---\nname: [\n---\nbody\n").unwrap_err();
        assert!(matches!(err, TemplateError::Metadata(_)));
    }

    #[test]
    fn undeclared_placeholder_is_rejected() {
        let source = "---\nname: test\nmodel:\n  api: chat\n---\nHello {{who}}\n";
        let err = TemplateDocument::parse(source).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(name) if name == "who"));
    }

    #[test]
    fn document_fields_are_local_to_the_block() {
        // `id` outside the documents block is not a declared input.
        let source = "---\nname: test\nmodel:\n  api: chat\n---\n{{id}}\n";
        let err = TemplateDocument::parse(source).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(name) if name == "id"));

        let source =
            "---\nname: test\nmodel:\n  api: chat\n---\n{{#documents}}{{id}}{{/documents}}\n";
        assert!(TemplateDocument::parse(source).is_ok());
    }

    #[test]
    fn scalar_documents_placeholder_is_rejected() {
        let source = "---\nname: test\nmodel:\n  api: chat\n---\n{{documents}}\n";
        let err = TemplateDocument::parse(source).unwrap_err();
        assert!(matches!(err, TemplateError::StructuralPlaceholder(name) if name == "documents"));
    }

    #[test]
    fn unknown_section_name_is_rejected() {
        let source = "---\nname: test\nmodel:\n  api: chat\n---\n{{#items}}x{{/items}}\n";
        let err = TemplateDocument::parse(source).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(name) if name == "items"));
    }

    #[test]
    fn model_configuration_is_preserved() {
        let source = "---\nname: test\nmodel:\n  api: chat\n  configuration:\n    azure_deployment: gpt-4o\n---\nbody\n";
        let doc = TemplateDocument::parse(source).unwrap();
        assert_eq!(
            doc.metadata.model.configuration["azure_deployment"],
            serde_yaml::Value::String("gpt-4o".to_string())
        );
    }
}

//! Per-invocation render context.
//!
//! Supplied by the caller for each render; never persisted. A declared input
//! counts as supplied only when its field is present, so an omitted
//! `conversation` is distinguishable from an empty one.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TemplateError;

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => f.write_str("system"),
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// One retrieved document used to ground the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Search-hit key; numeric ids in context files are normalized to strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub content: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(value) => value,
        Raw::Number(value) => value.to_string(),
    })
}

/// Value supplied for a declared scalar input.
///
/// Substitution is textual, so numbers and booleans in context files are
/// normalized to the strings they substitute as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InputValue(String);

impl InputValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue(value.to_string())
    }
}

impl<'de> Deserialize<'de> for InputValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            String(String),
            Integer(i64),
            Float(f64),
            Boolean(bool),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::String(value) => InputValue(value),
            Raw::Integer(value) => InputValue(value.to_string()),
            Raw::Float(value) => InputValue(value.to_string()),
            Raw::Boolean(value) => InputValue(value.to_string()),
        })
    }
}

/// Runtime values for a template's declared inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Ordered conversation history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Vec<Message>>,
    /// Retrieved documents, expanded in order by the documents block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    /// Values for any other declared inputs.
    #[serde(flatten)]
    pub extra: BTreeMap<String, InputValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a context from a JSON or YAML file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&source).map_err(TemplateError::ContextJson),
            _ => serde_yaml::from_str(&source).map_err(TemplateError::ContextYaml),
        }
    }

    /// Append a conversation turn, supplying the history if absent.
    pub fn with_message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.conversation
            .get_or_insert_with(Vec::new)
            .push(Message { role, content: content.into() });
        self
    }

    /// Supply the conversation history wholesale.
    pub fn with_conversation(mut self, conversation: Vec<Message>) -> Self {
        self.conversation = Some(conversation);
        self
    }

    /// Append a retrieved document, supplying the list if absent.
    pub fn with_document(
        mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.documents.get_or_insert_with(Vec::new).push(Document {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        });
        self
    }

    /// Supply the document list wholesale.
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Supply a value for any other declared input.
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Whether the context supplies a value for `name`.
    pub fn supplies(&self, name: &str) -> bool {
        match name {
            "conversation" => self.conversation.is_some(),
            "documents" => self.documents.is_some(),
            _ => self.extra.contains_key(name),
        }
    }
}

/// Render a conversation history as a `role: content` transcript.
pub(crate) fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", message.role, message.content))
        .collect::<Vec<_>>()
        .join("\n")
}

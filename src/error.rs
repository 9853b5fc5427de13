use std::io;

use thiserror::Error;

/// Library-wide error type for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Template does not begin with a `---` metadata fence.
    #[error("Missing metadata front matter: template must start with a '---' fence")]
    MissingFrontMatter,

    /// The opening `---` fence has no matching close.
    #[error("Unterminated metadata front matter: closing '---' fence not found")]
    UnterminatedFrontMatter,

    /// Front matter is not valid metadata YAML.
    #[error("Malformed metadata: {0}")]
    Metadata(#[source] serde_yaml::Error),

    /// A JSON context file could not be deserialized.
    #[error("Malformed render context: {0}")]
    ContextJson(#[source] serde_json::Error),

    /// A YAML context file could not be deserialized.
    #[error("Malformed render context: {0}")]
    ContextYaml(#[source] serde_yaml::Error),

    /// A `{{` tag is never closed by `}}`.
    #[error("Unterminated tag: expected '}}}}'")]
    UnterminatedTag,

    /// A `{{}}` tag with no name inside.
    #[error("Empty tag in template body")]
    EmptyTag,

    /// A `{{#name}}` section with no matching close tag.
    #[error("Unclosed section '{{{{#{0}}}}}': missing '{{{{/{0}}}}}'")]
    UnclosedSection(String),

    /// A `{{/name}}` close tag with no open section.
    #[error("Unexpected close tag '{{{{/{0}}}}}'")]
    UnexpectedClose(String),

    /// A section closed under a different name than it was opened with.
    #[error("Section '{{{{#{opened}}}}}' closed by '{{{{/{closed}}}}}'")]
    MismatchedClose { opened: String, closed: String },

    /// The body references a placeholder that is not a declared input.
    #[error("Unknown placeholder '{{{{{0}}}}}': not declared in the template's inputs")]
    UnknownPlaceholder(String),

    /// A block marker used as a scalar placeholder.
    #[error("'{{{{{0}}}}}' marks a repeating block; write '{{{{#{0}}}}}...{{{{/{0}}}}}'")]
    StructuralPlaceholder(String),

    /// A declared input has no value in the render context.
    #[error("Missing input '{0}': declared by the template but not supplied by the render context")]
    MissingInput(String),

    /// Destination file already exists.
    #[error("Refusing to overwrite existing file: {0}")]
    DestinationExists(String),
}

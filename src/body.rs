//! Template body parser.
//!
//! The on-disk asset format uses `{{name}}` placeholders and a repeating
//! `{{#name}}...{{/name}}` section form. This module parses a body into the
//! small node tree the renderer walks.

use crate::error::TemplateError;

/// One parsed element of a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted unchanged.
    Text(String),
    /// `{{name}}` substitution.
    Placeholder(String),
    /// `{{#name}}...{{/name}}` repeating block.
    Section { name: String, children: Vec<Node> },
}

/// Parse a template body into its node list.
pub fn parse(body: &str) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser { rest: body };
    parser.nodes(None)
}

struct Parser<'a> {
    rest: &'a str,
}

impl Parser<'_> {
    /// Parse nodes until end of input, or until the close tag for `open`.
    fn nodes(&mut self, open: Option<&str>) -> Result<Vec<Node>, TemplateError> {
        let mut nodes = Vec::new();
        loop {
            let Some(start) = self.rest.find("{{") else {
                if let Some(name) = open {
                    return Err(TemplateError::UnclosedSection(name.to_string()));
                }
                if !self.rest.is_empty() {
                    nodes.push(Node::Text(self.rest.to_string()));
                    self.rest = "";
                }
                return Ok(nodes);
            };

            if start > 0 {
                nodes.push(Node::Text(self.rest[..start].to_string()));
            }
            self.rest = &self.rest[start + 2..];

            let end = self.rest.find("}}").ok_or(TemplateError::UnterminatedTag)?;
            let tag = self.rest[..end].trim().to_string();
            self.rest = &self.rest[end + 2..];

            if let Some(name) = tag.strip_prefix('#') {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(TemplateError::EmptyTag);
                }
                self.eat_line_break();
                let children = self.nodes(Some(&name))?;
                nodes.push(Node::Section { name, children });
            } else if let Some(name) = tag.strip_prefix('/') {
                let name = name.trim();
                match open {
                    Some(opened) if opened == name => {
                        self.eat_line_break();
                        return Ok(nodes);
                    }
                    Some(opened) => {
                        return Err(TemplateError::MismatchedClose {
                            opened: opened.to_string(),
                            closed: name.to_string(),
                        });
                    }
                    None => return Err(TemplateError::UnexpectedClose(name.to_string())),
                }
            } else {
                if tag.is_empty() {
                    return Err(TemplateError::EmptyTag);
                }
                nodes.push(Node::Placeholder(tag));
            }
        }
    }

    /// A section tag that ends its line swallows the newline, so per-entry
    /// expansions concatenate without blank seams.
    fn eat_line_break(&mut self) {
        if let Some(rest) = self.rest.strip_prefix("\r\n") {
            self.rest = rest;
        } else if let Some(rest) = self.rest.strip_prefix('\n') {
            self.rest = rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_node() {
        let nodes = parse("no tags here").unwrap();
        assert_eq!(nodes, vec![Node::Text("no tags here".to_string())]);
    }

    #[test]
    fn placeholder_with_padding_is_trimmed() {
        let nodes = parse("Hello {{ name }}!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hello ".to_string()),
                Node::Placeholder("name".to_string()),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn section_collects_children() {
        let nodes = parse("{{#documents}}{{id}}{{/documents}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Section {
                name: "documents".to_string(),
                children: vec![Node::Placeholder("id".to_string())],
            }]
        );
    }

    #[test]
    fn section_tags_on_their_own_lines_eat_the_newline() {
        let nodes = parse("a\n{{#documents}}\n{{id}}\n{{/documents}}\nb").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a\n".to_string()),
                Node::Section {
                    name: "documents".to_string(),
                    children: vec![
                        Node::Placeholder("id".to_string()),
                        Node::Text("\n".to_string()),
                    ],
                },
                Node::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn unclosed_section_is_rejected() {
        let err = parse("{{#documents}}{{id}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnclosedSection(name) if name == "documents"));
    }

    #[test]
    fn stray_close_tag_is_rejected() {
        let err = parse("{{/documents}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedClose(name) if name == "documents"));
    }

    #[test]
    fn mismatched_close_tag_is_rejected() {
        let err = parse("{{#documents}}{{/items}}").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MismatchedClose { opened, closed }
                if opened == "documents" && closed == "items"
        ));
    }

    #[test]
    fn unterminated_tag_is_rejected() {
        let err = parse("text {{name").unwrap_err();
        assert!(matches!(err, TemplateError::UnterminatedTag));
    }

    #[test]
    fn empty_tag_is_rejected() {
        let err = parse("{{  }}").unwrap_err();
        assert!(matches!(err, TemplateError::EmptyTag));
    }
}

//! Authoring checks for template documents.
//!
//! Parsing already rejects bodies that reference undeclared placeholders;
//! this module reports the soft half of the contract: declarations the body
//! never uses. Those do not fail rendering but usually mean the template and
//! its inputs have drifted apart.

use std::collections::BTreeSet;
use std::fmt;

use crate::body::Node;
use crate::document::{CONVERSATION_INPUT, DOCUMENTS_SECTION, InputKind, TemplateDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One finding produced by [`check`].
#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

/// Outcome of checking a template document.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Exit code for CLI callers; warnings fail only under `strict`.
    pub fn exit_code(&self, strict: bool) -> u8 {
        let failing = self.findings.iter().any(|finding| {
            finding.severity == Severity::Error
                || (strict && finding.severity == Severity::Warning)
        });
        if failing { 1 } else { 0 }
    }

    fn warn(&mut self, message: String) {
        self.findings.push(Finding { severity: Severity::Warning, message });
    }
}

/// Check a parsed template for authoring smells.
pub fn check(template: &TemplateDocument) -> CheckReport {
    let mut report = CheckReport::default();

    let mut referenced = BTreeSet::new();
    let mut has_documents_block = false;
    collect(&template.nodes, &mut referenced, &mut has_documents_block);

    for (name, spec) in &template.metadata.inputs {
        let structural = matches!(name.as_str(), CONVERSATION_INPUT | DOCUMENTS_SECTION);
        if structural && spec.kind != InputKind::Array {
            report.warn(format!(
                "input '{}' should have type array (found {})",
                name, spec.kind
            ));
        }
        if name == DOCUMENTS_SECTION && has_documents_block {
            report.warn(format!(
                "input '{}' is shadowed by the structural documents block",
                name
            ));
            continue;
        }
        if !referenced.contains(name.as_str()) {
            report.warn(format!("input '{}' is declared but never referenced by the body", name));
        }
    }

    if template.metadata.description.is_empty() {
        report.warn("template has no description".to_string());
    }

    report
}

fn collect<'a>(nodes: &'a [Node], referenced: &mut BTreeSet<&'a str>, has_documents: &mut bool) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Placeholder(name) => {
                referenced.insert(name.as_str());
            }
            Node::Section { name, children } => {
                if name == DOCUMENTS_SECTION {
                    *has_documents = true;
                }
                collect(children, referenced, has_documents);
            }
        }
    }
}

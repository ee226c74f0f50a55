use crate::template::model::{NodeKind, Template, TemplateNode};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Reserved keys a problem can point into, below a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigKey {
    Options,
    Default,
}

impl ConfigKey {
    fn as_str(self) -> &'static str {
        match self {
            Self::Options => "_options",
            Self::Default => "_default",
        }
    }
}

/// One structural problem, located by the chain of field keys leading to it.
#[derive(Debug, Clone)]
pub(crate) struct TemplateIssue {
    pub(crate) fields: Vec<String>,
    pub(crate) key: Option<ConfigKey>,
    pub(crate) message: String,
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() && self.key.is_none() {
            return f.write_str(&self.message);
        }
        f.write_str("$")?;
        for field in &self.fields {
            write!(f, ".{field}")?;
        }
        if let Some(key) = self.key {
            write!(f, ".{}", key.as_str())?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Every problem found in one template, in document order.
#[derive(Debug, Clone)]
pub(crate) struct TemplateIssues {
    pub(crate) issues: Vec<TemplateIssue>,
}

impl fmt::Display for TemplateIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for TemplateIssues {}

/// Depth-first walk that remembers where it is.
struct Checker {
    trail: Vec<String>,
    issues: Vec<TemplateIssue>,
}

impl Checker {
    fn report(&mut self, message: impl Into<String>) {
        self.report_at(None, message);
    }

    fn report_at(&mut self, key: Option<ConfigKey>, message: impl Into<String>) {
        self.issues.push(TemplateIssue {
            fields: self.trail.clone(),
            key,
            message: message.into(),
        });
    }

    fn visit(&mut self, key: &str, node: &TemplateNode, parent: Option<NodeKind>) {
        self.trail.push(key.to_owned());
        self.check_node(node, parent);
        self.trail.pop();
    }

    fn check_node(&mut self, node: &TemplateNode, parent: Option<NodeKind>) {
        let kind = node.kind();

        if kind == NodeKind::Object && parent != Some(NodeKind::Array) {
            self.report("object fields are only allowed as an array item template");
        }

        match kind {
            NodeKind::Array => {
                let n = node.children().len();
                if n != 1 {
                    self.report(format!(
                        "array must declare exactly one item template, found {n}"
                    ));
                }
                if let Some((_, item)) = node.item_template()
                    && item.kind() != NodeKind::Object
                {
                    self.report(format!(
                        "array item template must be an object, found {}",
                        item.kind().as_str()
                    ));
                }
            }
            NodeKind::Box | NodeKind::Object => {}
            leaf => {
                if !node.children().is_empty() {
                    self.report(format!(
                        "{} field must not declare child fields",
                        leaf.as_str()
                    ));
                }
                self.check_default(node);
            }
        }
        self.check_options(node);

        for (key, child) in node.children() {
            self.visit(key, child, Some(kind));
        }
    }

    fn check_options(&mut self, node: &TemplateNode) {
        let kind = node.kind();
        let opts = node.options();
        let at = Some(ConfigKey::Options);

        if !kind.has_options() {
            if !opts.is_empty() {
                self.report_at(at, format!("{} field must not declare _options", kind.as_str()));
            }
            return;
        }
        if opts.is_empty() {
            self.report_at(
                at,
                format!("{} field must declare at least one option", kind.as_str()),
            );
        }
        let mut seen = HashSet::new();
        for o in opts {
            if !seen.insert(o.value.as_str()) {
                self.report_at(at, format!("duplicate option value '{}'", o.value));
            }
        }
    }

    fn check_default(&mut self, node: &TemplateNode) {
        let Some(default) = node.default_value() else {
            return;
        };
        let (ok, expected) = match node.kind() {
            NodeKind::Checkbox => (
                match default {
                    Value::String(_) => true,
                    Value::Array(items) => items.iter().all(Value::is_string),
                    _ => false,
                },
                "a string or a list of strings",
            ),
            _ => (
                matches!(default, Value::String(_) | Value::Number(_)),
                "a string or a number",
            ),
        };
        if !ok {
            self.report_at(Some(ConfigKey::Default), format!("default must be {expected}"));
        }
    }
}

/// Structural checks over a parsed template. Collects every problem instead of stopping early.
pub(crate) fn validate_template(
    template: &Template,
    mandatory_root_fields: &[String],
) -> Result<(), TemplateIssues> {
    let mut checker = Checker {
        trail: Vec::new(),
        issues: Vec::new(),
    };

    for name in mandatory_root_fields {
        match template.field(name) {
            None => checker.report(format!("mandatory root field '{name}' is not declared")),
            Some(node) if !node.kind().is_leaf() => {
                checker.trail.push(name.clone());
                checker.report("mandatory root field must be a leaf");
                checker.trail.pop();
            }
            Some(_) => {}
        }
    }

    for (key, node) in template.fields() {
        checker.visit(key, node, None);
    }

    if checker.issues.is_empty() {
        Ok(())
    } else {
        Err(TemplateIssues {
            issues: checker.issues,
        })
    }
}

use crate::ast::{DynamicNode, StaticNode};
use crate::error::{ErrorKind, VersoError};
use regex::Regex;
use serde::Deserialize;

/// Linter configuration, supplied as a JSON document:
/// `{ "identifier_format": "camel case", "argument": "literal" }`.
/// Absent keys disable the corresponding rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub identifier_format: Option<String>,
    #[serde(default)]
    pub argument: Option<String>,
}

impl LintConfig {
    pub fn from_json(text: &str) -> Result<Self, VersoError> {
        serde_json::from_str(text).map_err(|error| {
            VersoError::new(
                ErrorKind::Parse,
                format!("Invalid linter configuration: {}", error),
            )
        })
    }
}

/// One style finding. Linting never mutates the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub rule: String,
    pub message: String,
}

pub struct Linter {
    identifier_format: Option<(&'static str, Regex)>,
    literal_arguments: bool,
}

impl Linter {
    pub fn from_config(config: &LintConfig) -> Result<Self, VersoError> {
        let identifier_format = match config.identifier_format.as_deref() {
            None => None,
            Some("camel case") => Some((
                "camel case",
                Regex::new("^[a-z][a-zA-Z0-9]*$").expect("naming rule pattern is valid"),
            )),
            Some("snake case") => Some((
                "snake case",
                Regex::new("^[a-z][a-z0-9_]*$").expect("naming rule pattern is valid"),
            )),
            Some(other) => {
                return Err(VersoError::new(
                    ErrorKind::Parse,
                    format!("Unknown identifier format '{}'", other),
                ))
            }
        };
        let literal_arguments = match config.argument.as_deref() {
            None => false,
            Some("literal") => true,
            Some(other) => {
                return Err(VersoError::new(
                    ErrorKind::Parse,
                    format!("Unknown argument rule '{}'", other),
                ))
            }
        };
        Ok(Self {
            identifier_format,
            literal_arguments,
        })
    }

    pub fn lint(&self, nodes: &[StaticNode]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for node in nodes {
            match node {
                StaticNode::Declaration(declaration) => {
                    self.check_identifier(&declaration.name, &mut diagnostics);
                }
                StaticNode::Assignation { declaration, .. } => {
                    self.check_identifier(&declaration.name, &mut diagnostics);
                }
                StaticNode::Expression { .. } => {}
                StaticNode::PrintLn { argument } => {
                    self.check_argument(argument, &mut diagnostics);
                }
            }
        }
        diagnostics
    }

    fn check_identifier(&self, name: &str, diagnostics: &mut Vec<Diagnostic>) {
        if let Some((label, pattern)) = &self.identifier_format {
            if !pattern.is_match(name) {
                diagnostics.push(Diagnostic {
                    rule: "identifier_format".to_string(),
                    message: format!("Identifier '{}' does not follow {} naming", name, label),
                });
            }
        }
    }

    fn check_argument(&self, argument: &DynamicNode, diagnostics: &mut Vec<Diagnostic>) {
        if self.literal_arguments && matches!(argument, DynamicNode::Binary { .. }) {
            diagnostics.push(Diagnostic {
                rule: "argument".to_string(),
                message: "println arguments must be a literal or a variable".to_string(),
            });
        }
    }
}

use crate::ast::{Declaration, DynamicNode, StaticNode};
use crate::value::Value;

/// Render the AST back to canonical source text, one statement per line.
/// Formatting is idempotent: re-parsing the output yields a structurally
/// equal AST.
pub fn format_program(nodes: &[StaticNode]) -> String {
    nodes
        .iter()
        .map(format_statement)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_statement(node: &StaticNode) -> String {
    match node {
        StaticNode::Declaration(declaration) => format!("{};", declaration_text(declaration)),
        StaticNode::Assignation { declaration, value } => format!(
            "{} = {};",
            declaration_text(declaration),
            expression_text(value, 0)
        ),
        StaticNode::Expression { variable, value } => {
            format!("{} = {};", variable, expression_text(value, 0))
        }
        StaticNode::PrintLn { argument } => format!("println({});", expression_text(argument, 0)),
    }
}

fn declaration_text(declaration: &Declaration) -> String {
    format!(
        "{} {}: {}",
        declaration.modifier.keyword, declaration.name, declaration.ty
    )
}

/// Operators get one space on each side and the minimal parentheses needed
/// to preserve structure under left-associative re-parsing.
fn expression_text(node: &DynamicNode, parent_precedence: u8) -> String {
    match node {
        DynamicNode::Literal(Value::String(s)) => format!("\"{}\"", s),
        DynamicNode::Literal(value) => value.to_string(),
        DynamicNode::Variable(name) => name.clone(),
        DynamicNode::Binary { op, left, right } => {
            let precedence = op.precedence();
            let text = format!(
                "{} {} {}",
                expression_text(left, precedence),
                op.symbol(),
                expression_text(right, precedence + 1)
            );
            if precedence < parent_precedence {
                format!("({})", text)
            } else {
                text
            }
        }
    }
}

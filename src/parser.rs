use crate::ast::{BinaryOp, Declaration, DynamicNode, Modifier, StaticNode};
use crate::error::VersoError;
use crate::token::{Token, TokenKind};
use crate::value::Value;
use crate::version::VersionBundle;

/// Per-token-kind statement parsing handler. The active version's strategy
/// table decides which token kinds may start or continue a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Declaration,
    Variable,
    Assignation,
    Method,
}

/// Partially-built nodes accumulated while parsing one statement.
#[derive(Debug, Clone)]
enum ParseNode {
    Static(StaticNode),
    Dynamic(DynamicNode),
}

impl ParseNode {
    fn kind_name(&self) -> &'static str {
        match self {
            ParseNode::Static(StaticNode::Declaration(_)) => "a declaration",
            ParseNode::Static(StaticNode::Assignation { .. }) => "an assignation",
            ParseNode::Static(StaticNode::Expression { .. }) => "an assignment",
            ParseNode::Static(StaticNode::PrintLn { .. }) => "a print statement",
            ParseNode::Dynamic(DynamicNode::Literal(_)) => "a literal",
            ParseNode::Dynamic(DynamicNode::Variable(_)) => "a variable",
            ParseNode::Dynamic(DynamicNode::Binary { .. }) => "an operation",
        }
    }
}

/// Version-configured statement parser. Pulls tokens lazily from the lexer
/// and yields one static node per terminated statement; the iterator fuses
/// after the first error.
pub struct Parser<'v, I> {
    tokens: I,
    bundle: &'v VersionBundle,
    failed: bool,
}

impl<'v, I> Parser<'v, I>
where
    I: Iterator<Item = Result<Token, VersoError>>,
{
    pub fn new(tokens: I, bundle: &'v VersionBundle) -> Self {
        Self {
            tokens,
            bundle,
            failed: false,
        }
    }

    /// Pull tokens up to and including the statement terminator. Input
    /// exhausted before a terminator is a parse error at the last token.
    fn next_statement_tokens(&mut self) -> Option<Result<Vec<Token>, VersoError>> {
        let mut buffer: Vec<Token> = Vec::new();
        loop {
            match self.tokens.next() {
                None if buffer.is_empty() => return None,
                None => {
                    let last = buffer.last().expect("buffer is non-empty");
                    return Some(Err(VersoError::parse_error_with_help(
                        last.position,
                        format!("Missing ';' after '{}'", last.lexeme),
                        "Every statement must end with ';'.".to_string(),
                    )));
                }
                Some(Err(error)) => return Some(Err(error)),
                Some(Ok(token)) => {
                    let terminated = token.kind == TokenKind::Ending;
                    buffer.push(token);
                    if terminated {
                        return Some(Ok(buffer));
                    }
                }
            }
        }
    }

    fn parse_statement(&self, tokens: &[Token]) -> Result<StaticNode, VersoError> {
        let terminator = tokens.last().expect("statement has a terminator");
        let mut stack: Vec<ParseNode> = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];
            if token.kind == TokenKind::Ending {
                break;
            }
            let Some(strategy) = self.bundle.strategy_for(token.kind) else {
                return Err(VersoError::parse_error(
                    token.position,
                    format!("Unexpected token '{}'", token.lexeme),
                ));
            };
            let (next, next_stack) = strategy.apply(self.bundle, tokens, index, stack)?;
            index = next;
            stack = next_stack;
        }

        let Some(top) = stack.pop() else {
            return Err(VersoError::parse_error(
                terminator.position,
                "Empty statement".to_string(),
            ));
        };
        if !stack.is_empty() {
            return Err(VersoError::parse_error(
                terminator.position,
                "Incomplete statement before ';'".to_string(),
            ));
        }
        match top {
            ParseNode::Static(node) => Ok(node),
            ParseNode::Dynamic(_) => Err(VersoError::parse_error(
                terminator.position,
                "Incomplete statement before ';'".to_string(),
            )),
        }
    }
}

impl<I> Iterator for Parser<'_, I>
where
    I: Iterator<Item = Result<Token, VersoError>>,
{
    type Item = Result<StaticNode, VersoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let tokens = match self.next_statement_tokens()? {
            Ok(tokens) => tokens,
            Err(error) => {
                self.failed = true;
                return Some(Err(error));
            }
        };
        match self.parse_statement(&tokens) {
            Ok(node) => Some(Ok(node)),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

impl Strategy {
    /// Apply this strategy at `index`. The node stack is taken by value and
    /// returned (possibly extended) so strategies stay pure and testable.
    fn apply(
        self,
        bundle: &VersionBundle,
        tokens: &[Token],
        index: usize,
        stack: Vec<ParseNode>,
    ) -> Result<(usize, Vec<ParseNode>), VersoError> {
        match self {
            Strategy::Declaration => parse_declaration(bundle, tokens, index, stack),
            Strategy::Variable => parse_variable(tokens, index, stack),
            Strategy::Assignation => parse_assignation(tokens, index, stack),
            Strategy::Method => parse_method(tokens, index, stack),
        }
    }
}

/// Modifier, identifier, ':' and type-id, all four in that order.
fn parse_declaration(
    bundle: &VersionBundle,
    tokens: &[Token],
    index: usize,
    mut stack: Vec<ParseNode>,
) -> Result<(usize, Vec<ParseNode>), VersoError> {
    let modifier_token = &tokens[index];
    let name_token = expect(
        tokens,
        index + 1,
        TokenKind::Identifier,
        "Expected a variable name after the modifier",
    )?;
    expect(
        tokens,
        index + 2,
        TokenKind::Declaration,
        "Expected ':' after the variable name",
    )?;
    let type_token = expect(tokens, index + 3, TokenKind::TypeId, "Expected a type after ':'")?;

    let ty = bundle.resolve_type(&type_token.lexeme).ok_or_else(|| {
        VersoError::parse_error(
            type_token.position,
            format!("Unknown type '{}'", type_token.lexeme),
        )
    })?;
    let mutable = bundle.modifier(&modifier_token.lexeme).ok_or_else(|| {
        VersoError::parse_error(
            modifier_token.position,
            format!("Unknown modifier '{}'", modifier_token.lexeme),
        )
    })?;

    stack.push(ParseNode::Static(StaticNode::Declaration(Declaration {
        modifier: Modifier::new(modifier_token.lexeme.clone(), mutable),
        ty,
        name: name_token.lexeme.clone(),
    })));
    Ok((index + 4, stack))
}

fn parse_variable(
    tokens: &[Token],
    index: usize,
    mut stack: Vec<ParseNode>,
) -> Result<(usize, Vec<ParseNode>), VersoError> {
    stack.push(ParseNode::Dynamic(DynamicNode::Variable(
        tokens[index].lexeme.clone(),
    )));
    Ok((index + 1, stack))
}

/// '=' combines the node below it with the parsed right-hand side: a
/// variable becomes a reassignment, a declaration becomes an assignation.
fn parse_assignation(
    tokens: &[Token],
    index: usize,
    mut stack: Vec<ParseNode>,
) -> Result<(usize, Vec<ParseNode>), VersoError> {
    let equals = &tokens[index];
    let Some(top) = stack.pop() else {
        return Err(VersoError::parse_error(
            equals.position,
            "'=' cannot be used alone, missing previous argument".to_string(),
        ));
    };

    let (value, next) = RightSideParser::new(tokens).parse(index + 1)?;
    let node = match top {
        ParseNode::Dynamic(DynamicNode::Variable(name)) => StaticNode::Expression {
            variable: name,
            value,
        },
        ParseNode::Static(StaticNode::Declaration(declaration)) => StaticNode::Assignation {
            declaration,
            value,
        },
        other => {
            return Err(VersoError::parse_error(
                equals.position,
                format!("'=' cannot follow {}", other.kind_name()),
            ))
        }
    };

    expect_terminator(tokens, next)?;
    stack.push(ParseNode::Static(node));
    Ok((next, stack))
}

/// A native call: method name, '(', one argument expression, ')'.
fn parse_method(
    tokens: &[Token],
    index: usize,
    mut stack: Vec<ParseNode>,
) -> Result<(usize, Vec<ParseNode>), VersoError> {
    let method = &tokens[index];
    expect(
        tokens,
        index + 1,
        TokenKind::OpenParenthesis,
        &format!("Expected '(' after '{}'", method.lexeme),
    )?;

    let (argument, next) = RightSideParser::new(tokens).parse(index + 2)?;

    match tokens.get(next) {
        Some(token) if token.kind == TokenKind::CloseParenthesis => {}
        Some(token) => {
            return Err(VersoError::parse_error_with_help(
                token.position,
                format!(
                    "Expected ')' after the argument to '{}', found '{}'",
                    method.lexeme, token.lexeme
                ),
                "Native calls take exactly one argument: println(value)".to_string(),
            ))
        }
        None => {
            return Err(VersoError::parse_error(
                method.position,
                format!("Expected ')' after the argument to '{}'", method.lexeme),
            ))
        }
    }

    stack.push(ParseNode::Static(StaticNode::PrintLn { argument }));
    Ok((next + 1, stack))
}

fn expect<'t>(
    tokens: &'t [Token],
    index: usize,
    kind: TokenKind,
    message: &str,
) -> Result<&'t Token, VersoError> {
    match tokens.get(index) {
        Some(token) if token.kind == kind => Ok(token),
        Some(token) => Err(VersoError::parse_error(
            token.position,
            format!("{}, found '{}'", message, token.lexeme),
        )),
        None => {
            let last = tokens.last().expect("statement tokens are non-empty");
            Err(VersoError::parse_error(last.position, message.to_string()))
        }
    }
}

fn expect_terminator(tokens: &[Token], index: usize) -> Result<(), VersoError> {
    match tokens.get(index) {
        Some(token) if token.kind == TokenKind::Ending => Ok(()),
        Some(token) if token.kind == TokenKind::CloseParenthesis => {
            Err(VersoError::parse_error_with_help(
                token.position,
                "Unmatched ')'".to_string(),
                "Every ')' must pair with an earlier '('.".to_string(),
            ))
        }
        Some(token) => Err(VersoError::parse_error(
            token.position,
            format!("Expected ';' after the expression, found '{}'", token.lexeme),
        )),
        None => {
            let last = tokens.last().expect("statement tokens are non-empty");
            Err(VersoError::parse_error(
                last.position,
                "Expected ';' after the expression".to_string(),
            ))
        }
    }
}

/// Right-hand-side sub-parser: a primary followed by greedily folded binary
/// operators, left-associative, with multiply/divide binding tighter than
/// plus/minus. Stops at the first token it cannot absorb (the statement
/// terminator or an enclosing ')').
struct RightSideParser<'t> {
    tokens: &'t [Token],
}

impl<'t> RightSideParser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens }
    }

    fn parse(&self, index: usize) -> Result<(DynamicNode, usize), VersoError> {
        self.parse_term(index)
    }

    fn parse_term(&self, index: usize) -> Result<(DynamicNode, usize), VersoError> {
        let (mut node, mut index) = self.parse_factor(index)?;
        while let Some(op) = self.operator_at(index, &[TokenKind::Plus, TokenKind::Minus]) {
            let (right, next) = self.parse_factor(index + 1)?;
            node = DynamicNode::binary(op, node, right);
            index = next;
        }
        Ok((node, index))
    }

    fn parse_factor(&self, index: usize) -> Result<(DynamicNode, usize), VersoError> {
        let (mut node, mut index) = self.parse_primary(index)?;
        while let Some(op) = self.operator_at(index, &[TokenKind::Multiply, TokenKind::Divide]) {
            let (right, next) = self.parse_primary(index + 1)?;
            node = DynamicNode::binary(op, node, right);
            index = next;
        }
        Ok((node, index))
    }

    fn operator_at(&self, index: usize, kinds: &[TokenKind]) -> Option<BinaryOp> {
        let token = self.tokens.get(index)?;
        if !kinds.contains(&token.kind) {
            return None;
        }
        match token.kind {
            TokenKind::Plus => Some(BinaryOp::Sum),
            TokenKind::Minus => Some(BinaryOp::Subtract),
            TokenKind::Multiply => Some(BinaryOp::Multiply),
            TokenKind::Divide => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    fn parse_primary(&self, index: usize) -> Result<(DynamicNode, usize), VersoError> {
        let Some(token) = self.tokens.get(index) else {
            let last = self.tokens.last().expect("statement tokens are non-empty");
            return Err(VersoError::parse_error(
                last.position,
                "Expected an expression".to_string(),
            ));
        };

        match token.kind {
            TokenKind::NumberLiteral => {
                let number = token.lexeme.parse::<f64>().map_err(|_| {
                    VersoError::parse_error(
                        token.position,
                        format!("Invalid number literal '{}'", token.lexeme),
                    )
                })?;
                Ok((DynamicNode::Literal(Value::Number(number)), index + 1))
            }
            TokenKind::StringLiteral => {
                // The lexeme still carries its quotes
                let content = token.lexeme[1..token.lexeme.len() - 1].to_string();
                Ok((DynamicNode::Literal(Value::String(content)), index + 1))
            }
            TokenKind::BooleanLiteral => Ok((
                DynamicNode::Literal(Value::Boolean(token.lexeme == "true")),
                index + 1,
            )),
            TokenKind::Identifier => {
                Ok((DynamicNode::Variable(token.lexeme.clone()), index + 1))
            }
            TokenKind::OpenParenthesis => {
                let (node, next) = self.parse_term(index + 1)?;
                match self.tokens.get(next) {
                    Some(token) if token.kind == TokenKind::CloseParenthesis => {
                        Ok((node, next + 1))
                    }
                    Some(token) => Err(VersoError::parse_error_with_help(
                        token.position,
                        format!("Expected ')' after the expression, found '{}'", token.lexeme),
                        "Every '(' must have a matching ')'.".to_string(),
                    )),
                    None => Err(VersoError::parse_error(
                        token.position,
                        "Expected ')' after the expression".to_string(),
                    )),
                }
            }
            _ => Err(VersoError::parse_error(
                token.position,
                format!("Expected an expression, found '{}'", token.lexeme),
            )),
        }
    }
}

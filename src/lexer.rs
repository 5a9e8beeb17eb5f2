use crate::error::VersoError;
use crate::token::{Position, Token, TokenKind};
use regex::Regex;

/// A single recognizer in the lexer's ordered rule list. The pattern is
/// anchored to the current scan position; the first rule that matches wins.
/// Rules with no token kind (whitespace) consume input without emitting.
#[derive(Debug, Clone)]
pub struct LexRule {
    name: &'static str,
    kind: Option<TokenKind>,
    pattern: Regex,
}

impl LexRule {
    pub fn new(name: &'static str, kind: TokenKind, pattern: &str) -> Self {
        Self {
            name,
            kind: Some(kind),
            pattern: Self::anchored(pattern),
        }
    }

    /// A rule that matches and consumes input but emits no token.
    pub fn skipped(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            kind: None,
            pattern: Self::anchored(pattern),
        }
    }

    fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!("^(?:{})", pattern)).expect("lexer rule pattern must be a valid regex")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn matches<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// Rule-driven scanner over one source text. Tokens are produced lazily;
/// the iterator fuses after the first error. Rule order is configuration
/// supplied by the caller (the version bundle), not lexer logic: keyword
/// rules must come before the generic identifier rule.
pub struct Lexer<'a> {
    rules: &'a [LexRule],
    source: &'a str,
    position: Position,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(rules: &'a [LexRule], source: &'a str) -> Self {
        Self {
            rules,
            source,
            position: Position::start(),
            failed: false,
        }
    }

    fn advance(&mut self, lexeme: &str) {
        for ch in lexeme.chars() {
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.position.offset += lexeme.len();
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, VersoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let source = self.source;
        let rules = self.rules;

        while self.position.offset < source.len() {
            let rest = &source[self.position.offset..];
            let Some((rule, lexeme)) = rules
                .iter()
                .find_map(|rule| rule.matches(rest).map(|lexeme| (rule, lexeme)))
            else {
                self.failed = true;
                let offending = rest.chars().next().unwrap_or('\0');
                return Some(Err(VersoError::lex_error(
                    self.position,
                    format!("Unrecognized character '{}'", offending),
                )));
            };

            // Every rule must consume at least one character
            debug_assert!(!lexeme.is_empty(), "rule '{}' matched nothing", rule.name);

            let start = self.position;
            let kind = rule.kind;
            let lexeme = lexeme.to_string();
            self.advance(&lexeme);

            if let Some(kind) = kind {
                return Some(Ok(Token::new(kind, lexeme, start)));
            }
        }

        None
    }
}

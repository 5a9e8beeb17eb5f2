use crate::error::VersoError;
use crate::lexer::LexRule;
use crate::parser::Strategy;
use crate::token::TokenKind;
use crate::value::PrimType;
use std::collections::HashMap;
use std::fmt;

/// A parsed language version. Versions are validated eagerly when a bundle
/// is resolved, never deep in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn parse(text: &str) -> Result<Self, VersoError> {
        let mut parts = text.split('.');
        let (major, minor) = match (parts.next(), parts.next(), parts.next()) {
            (Some(major), Some(minor), None) => (major, minor),
            _ => {
                return Err(VersoError::unsupported_version(format!(
                    "Malformed version '{}', expected '<major>.<minor>'",
                    text
                )))
            }
        };
        let parse = |part: &str| {
            part.parse::<u32>().map_err(|_| {
                VersoError::unsupported_version(format!(
                    "Malformed version '{}', expected '<major>.<minor>'",
                    text
                ))
            })
        };
        Ok(Self::new(parse(major)?, parse(minor)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Everything that varies between language versions: the ordered lexer
/// rules, the parser's strategy table, the set of declarable types, and the
/// modifier keywords with their mutability. New versions are built by
/// deriving from an existing bundle and applying deltas.
#[derive(Debug, Clone)]
pub struct VersionBundle {
    version: Version,
    lexer_rules: Vec<LexRule>,
    strategies: HashMap<TokenKind, Strategy>,
    types: Vec<(&'static str, PrimType)>,
    modifiers: Vec<(&'static str, bool)>,
}

impl VersionBundle {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn lexer_rules(&self) -> &[LexRule] {
        &self.lexer_rules
    }

    pub fn strategy_for(&self, kind: TokenKind) -> Option<Strategy> {
        self.strategies.get(&kind).copied()
    }

    /// Map a type-id lexeme to its tag, if this version declares it.
    pub fn resolve_type(&self, lexeme: &str) -> Option<PrimType> {
        self.types
            .iter()
            .find(|(name, _)| *name == lexeme)
            .map(|(_, ty)| *ty)
    }

    pub fn allowed_types(&self) -> Vec<PrimType> {
        self.types.iter().map(|(_, ty)| *ty).collect()
    }

    /// Mutability of a modifier keyword, if this version declares it.
    pub fn modifier(&self, keyword: &str) -> Option<bool> {
        self.modifiers
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, mutable)| *mutable)
    }

    fn derive(&self, version: Version) -> Self {
        let mut bundle = self.clone();
        bundle.version = version;
        bundle
    }

    /// Insert a lexer rule ahead of the named anchor rule, preserving the
    /// significance of rule order.
    fn insert_rule_before(&mut self, anchor: &str, rule: LexRule) {
        let index = self
            .lexer_rules
            .iter()
            .position(|existing| existing.name() == anchor)
            .unwrap_or(self.lexer_rules.len());
        self.lexer_rules.insert(index, rule);
    }

    fn allow_type(&mut self, lexeme: &'static str, ty: PrimType) {
        self.types.push((lexeme, ty));
    }
}

/// Append-only registry of version bundles.
pub struct VersionProvider {
    bundles: Vec<VersionBundle>,
}

impl VersionProvider {
    pub fn new() -> Self {
        let baseline = baseline();
        let with_booleans = with_booleans(&baseline);
        Self {
            bundles: vec![baseline, with_booleans],
        }
    }

    pub fn resolve(&self, text: &str) -> Result<&VersionBundle, VersoError> {
        let version = Version::parse(text)?;
        self.bundles
            .iter()
            .find(|bundle| bundle.version() == version)
            .ok_or_else(|| {
                VersoError::unsupported_version(format!("Unsupported language version '{}'", text))
            })
    }
}

impl Default for VersionProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Version 1.0: Number and String primitives.
fn baseline() -> VersionBundle {
    // Keyword and type-id rules come before the identifier rule, literal
    // rules before the single-character punctuation rules.
    let lexer_rules = vec![
        LexRule::new("modifier", TokenKind::Modifier, r"(?:let|var|val)\b"),
        LexRule::new("println", TokenKind::NativeMethod, r"println\b"),
        LexRule::new("number-type", TokenKind::TypeId, r"Number\b"),
        LexRule::new("string-type", TokenKind::TypeId, r"String\b"),
        LexRule::skipped("whitespace", r"\s+"),
        LexRule::new("identifier", TokenKind::Identifier, r"[A-Za-z_][A-Za-z0-9_]*"),
        LexRule::new(
            "number-literal",
            TokenKind::NumberLiteral,
            r"[0-9]+(?:\.[0-9]+)?",
        ),
        LexRule::new(
            "string-literal",
            TokenKind::StringLiteral,
            r#""[^"\n]*"|'[^'\n]*'"#,
        ),
        LexRule::new("declaration", TokenKind::Declaration, r":"),
        LexRule::new("assignment", TokenKind::Assignment, r"="),
        LexRule::new("ending", TokenKind::Ending, r";"),
        LexRule::new("plus", TokenKind::Plus, r"\+"),
        LexRule::new("minus", TokenKind::Minus, r"-"),
        LexRule::new("multiply", TokenKind::Multiply, r"\*"),
        LexRule::new("divide", TokenKind::Divide, r"/"),
        LexRule::new("open-parenthesis", TokenKind::OpenParenthesis, r"\("),
        LexRule::new("close-parenthesis", TokenKind::CloseParenthesis, r"\)"),
    ];

    let strategies = HashMap::from([
        (TokenKind::Modifier, Strategy::Declaration),
        (TokenKind::Identifier, Strategy::Variable),
        (TokenKind::Assignment, Strategy::Assignation),
        (TokenKind::NativeMethod, Strategy::Method),
    ]);

    VersionBundle {
        version: Version::new(1, 0),
        lexer_rules,
        strategies,
        types: vec![("Number", PrimType::Number), ("String", PrimType::String)],
        modifiers: vec![("let", true), ("var", true), ("val", false)],
    }
}

/// Version 1.1: 1.0 plus the Boolean primitive and its literals.
fn with_booleans(base: &VersionBundle) -> VersionBundle {
    let mut bundle = base.derive(Version::new(1, 1));
    bundle.insert_rule_before(
        "whitespace",
        LexRule::new("boolean-type", TokenKind::TypeId, r"Boolean\b"),
    );
    bundle.insert_rule_before(
        "identifier",
        LexRule::new(
            "boolean-literal",
            TokenKind::BooleanLiteral,
            r"(?:true|false)\b",
        ),
    );
    bundle.allow_type("Boolean", PrimType::Boolean);
    bundle
}

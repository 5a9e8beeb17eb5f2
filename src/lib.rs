// Verso Language Library
//
// Core library for the verso scripting language: a rule-driven lexer, a
// version-selected strategy parser, and a tree-walking interpreter, with a
// formatter and linter consuming the same AST.

// Public modules
pub mod ast;
pub mod error;
pub mod formatter;
pub mod interpreter;
pub mod lexer;
pub mod linter;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod token;
pub mod value;
pub mod version;

// Re-export commonly used items
pub use ast::{BinaryOp, Declaration, DynamicNode, Modifier, StaticNode};
pub use error::{ErrorKind, VersoError};
pub use interpreter::{evaluate, Binding, Environment, Interpreter};
pub use lexer::{LexRule, Lexer};
pub use linter::{Diagnostic, LintConfig, Linter};
pub use parser::{Parser, Strategy};
pub use token::{Position, Token, TokenKind};
pub use value::{PrimType, Value};
pub use version::{Version, VersionBundle, VersionProvider};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{analyze, execute, format, run, validate};

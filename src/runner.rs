use crate::ast::StaticNode;
use crate::error::VersoError;
use crate::formatter;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::linter::{Diagnostic, LintConfig, Linter};
use crate::parser::Parser;
use crate::version::VersionProvider;

/// Pipeline entry points. Each invocation owns its own token stream, AST
/// and environment, so independent calls never share state.

/// Parse the whole program, returning its statements.
pub fn validate(source: &str, version: &str) -> Result<Vec<StaticNode>, VersoError> {
    let provider = VersionProvider::new();
    let bundle = provider.resolve(version)?;
    let lexer = Lexer::new(bundle.lexer_rules(), source);
    Parser::new(lexer, bundle).collect()
}

/// Run the program, returning its output lines in order.
pub fn execute(source: &str, version: &str) -> Result<Vec<String>, VersoError> {
    let provider = VersionProvider::new();
    let bundle = provider.resolve(version)?;
    let lexer = Lexer::new(bundle.lexer_rules(), source);
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::new(parser, bundle);
    interpreter.run()
}

/// Render the program in canonical formatting.
pub fn format(source: &str, version: &str) -> Result<String, VersoError> {
    let nodes = validate(source, version)?;
    Ok(formatter::format_program(&nodes))
}

/// Lint the program with a JSON rule configuration.
pub fn analyze(source: &str, version: &str, config: &str) -> Result<Vec<Diagnostic>, VersoError> {
    let config = LintConfig::from_json(config)?;
    let linter = Linter::from_config(&config)?;
    let nodes = validate(source, version)?;
    Ok(linter.lint(&nodes))
}

/// Execute and print, streaming output so lines produced before a failing
/// statement are still shown. Errors go through the diagnostic reporter.
pub fn run(source: &str, filename: Option<&str>, version: &str) {
    let provider = VersionProvider::new();
    let bundle = match provider.resolve(version) {
        Ok(bundle) => bundle,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    let lexer = Lexer::new(bundle.lexer_rules(), source);
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::new(parser, bundle);
    for item in &mut interpreter {
        match item {
            Ok(line) => println!("{}", line),
            Err(error) => {
                error.report(source, filename);
                return;
            }
        }
    }
}

use crate::interpreter::{Environment, Interpreter};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::version::{VersionBundle, VersionProvider};
use std::io::{self, Write};

/// Interactive loop. Each line runs through the full pipeline against a
/// persistent environment, so bindings survive between commands.

pub fn start(version: &str) {
    let provider = VersionProvider::new();
    let bundle = match provider.resolve(version) {
        Ok(bundle) => bundle,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };

    println!(
        "verso {} (language version {})",
        env!("CARGO_PKG_VERSION"),
        bundle.version()
    );
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut environment = Environment::new();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                environment = run_line(line, bundle, environment);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_line(source: &str, bundle: &VersionBundle, environment: Environment) -> Environment {
    let lexer = Lexer::new(bundle.lexer_rules(), source);
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::with_environment(parser, bundle, environment);
    while let Some(item) = interpreter.next() {
        match item {
            Ok(line) => println!("{}", line),
            Err(error) => {
                error.report(source, None);
                break;
            }
        }
    }
    // Statements completed before an error keep their effect
    interpreter.into_environment()
}

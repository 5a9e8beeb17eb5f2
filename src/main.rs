use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use verso::{repl, runner};

fn main() -> ExitCode {
    let matches = Command::new("verso")
        .about("Front end and interpreter for the verso scripting language")
        .arg(
            Arg::new("file")
                .help("The script file to run")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("lang-version")
                .short('l')
                .long("lang-version")
                .help("Language version to use")
                .value_name("VERSION")
                .default_value("1.1"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Parse the file and report errors without running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fmt")
                .long("fmt")
                .help("Print the canonical formatting of the file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lint")
                .long("lint")
                .help("Lint the file with the given JSON rule configuration")
                .value_name("CONFIG"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start an interactive session")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let version = matches
        .get_one::<String>("lang-version")
        .map(String::as_str)
        .unwrap_or("1.1");

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path, version, &matches)
    } else {
        repl::start(version);
        ExitCode::SUCCESS
    }
}

fn run_file(path: &str, version: &str, matches: &clap::ArgMatches) -> ExitCode {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading file '{}': {}", path.display(), error);
            return ExitCode::FAILURE;
        }
    };
    let filename = path.to_str();

    if matches.get_flag("check") {
        match runner::validate(&source, version) {
            Ok(nodes) => {
                println!("{} statement(s) parsed", nodes.len());
                ExitCode::SUCCESS
            }
            Err(error) => {
                error.report(&source, filename);
                ExitCode::FAILURE
            }
        }
    } else if matches.get_flag("fmt") {
        match runner::format(&source, version) {
            Ok(formatted) => {
                println!("{}", formatted);
                ExitCode::SUCCESS
            }
            Err(error) => {
                error.report(&source, filename);
                ExitCode::FAILURE
            }
        }
    } else if let Some(config) = matches.get_one::<String>("lint") {
        match runner::analyze(&source, version, config) {
            Ok(diagnostics) => {
                for diagnostic in &diagnostics {
                    println!("warning[{}]: {}", diagnostic.rule, diagnostic.message);
                }
                if diagnostics.is_empty() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(error) => {
                error.report(&source, filename);
                ExitCode::FAILURE
            }
        }
    } else {
        runner::run(&source, filename, version);
        ExitCode::SUCCESS
    }
}

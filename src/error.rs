use crate::token::Position;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Type,
    Reference,
    Arithmetic,
    UnsupportedVersion,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Lex => "Lexical Error",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::Type => "Type Error",
            ErrorKind::Reference => "Reference Error",
            ErrorKind::Arithmetic => "Arithmetic Error",
            ErrorKind::UnsupportedVersion => "Unsupported Version",
        }
    }

    fn color(&self) -> Color {
        match self {
            ErrorKind::Lex => Color::Red,
            ErrorKind::Parse => Color::Yellow,
            ErrorKind::Type | ErrorKind::Reference | ErrorKind::Arithmetic => Color::Magenta,
            ErrorKind::UnsupportedVersion => Color::Cyan,
        }
    }
}

/// Structured error value shared by every pipeline stage. Lex and parse
/// errors carry the source position of the offending character or token;
/// runtime errors carry none, since AST nodes do not store spans.
#[derive(Debug, Clone)]
pub struct VersoError {
    pub kind: ErrorKind,
    pub message: String,
    pub help: Option<String>,
    pub position: Option<Position>,
}

impl VersoError {
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            help: None,
            position: None,
        }
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn lex_error(position: Position, message: String) -> Self {
        Self::new(ErrorKind::Lex, message).at(position)
    }

    pub fn parse_error(position: Position, message: String) -> Self {
        Self::new(ErrorKind::Parse, message).at(position)
    }

    pub fn parse_error_with_help(position: Position, message: String, help: String) -> Self {
        Self::new(ErrorKind::Parse, message)
            .at(position)
            .with_help(help)
    }

    pub fn type_error(message: String) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn reference_error(message: String) -> Self {
        Self::new(ErrorKind::Reference, message)
    }

    pub fn arithmetic_error(message: String) -> Self {
        Self::new(ErrorKind::Arithmetic, message)
    }

    pub fn unsupported_version(message: String) -> Self {
        Self::new(ErrorKind::UnsupportedVersion, message)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");
        let color = self.kind.color();

        let offset = self.position.map(|p| p.offset).unwrap_or(0);
        let mut report_builder = Report::build(ReportKind::Error, filename, offset)
            .with_message(format!("{}: {}", self.kind.label().fg(color), self.message));

        if let Some(position) = self.position {
            report_builder = report_builder.with_label(
                Label::new((filename, position.offset..position.offset + 1))
                    .with_message(&self.message)
                    .with_color(color),
            );
        }

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for VersoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for VersoError {}

// Scanner tests: rule ordering, token positions, and the
// lexeme-reconstruction property.

use verso::error::ErrorKind;
use verso::lexer::Lexer;
use verso::token::{Token, TokenKind};
use verso::VersionProvider;

fn tokenize(source: &str, version: &str) -> Vec<Token> {
    let provider = VersionProvider::new();
    let bundle = provider.resolve(version).expect("version is registered");
    Lexer::new(bundle.lexer_rules(), source)
        .collect::<Result<Vec<_>, _>>()
        .expect("source should tokenize")
}

#[test]
fn declaration_statement_tokenizes_in_order() {
    let tokens = tokenize("let name: String = 'Tomi';", "1.0");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Modifier,
            TokenKind::Identifier,
            TokenKind::Declaration,
            TokenKind::TypeId,
            TokenKind::Assignment,
            TokenKind::StringLiteral,
            TokenKind::Ending,
        ]
    );
    assert_eq!(tokens[0].lexeme, "let");
    assert_eq!(tokens[1].lexeme, "name");
    assert_eq!(tokens[5].lexeme, "'Tomi'");
}

#[test]
fn whitespace_is_consumed_but_never_emitted() {
    let tokens = tokenize("let   a\n:\tNumber ;", "1.0");
    assert_eq!(tokens.len(), 5);
    assert!(tokens.iter().all(|t| !t.lexeme.trim().is_empty()));
}

#[test]
fn keywords_win_over_the_identifier_rule() {
    let tokens = tokenize("let letter println printling", "1.0");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    // 'letter' and 'printling' must not be split into keyword prefixes
    assert_eq!(
        kinds,
        vec![
            TokenKind::Modifier,
            TokenKind::Identifier,
            TokenKind::NativeMethod,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(tokens[1].lexeme, "letter");
    assert_eq!(tokens[3].lexeme, "printling");
}

#[test]
fn operators_and_parentheses_tokenize_individually() {
    let tokens = tokenize("(1 + 2) * 3 - 4 / 5", "1.0");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::OpenParenthesis,
            TokenKind::NumberLiteral,
            TokenKind::Plus,
            TokenKind::NumberLiteral,
            TokenKind::CloseParenthesis,
            TokenKind::Multiply,
            TokenKind::NumberLiteral,
            TokenKind::Minus,
            TokenKind::NumberLiteral,
            TokenKind::Divide,
            TokenKind::NumberLiteral,
        ]
    );
}

#[test]
fn positions_track_lines_columns_and_offsets() {
    let tokens = tokenize("let a: Number;\na = 1.5;", "1.0");

    let a_decl = &tokens[1];
    assert_eq!((a_decl.position.line, a_decl.position.column), (1, 5));
    assert_eq!(a_decl.position.offset, 4);

    let a_again = &tokens[5];
    assert_eq!(a_again.lexeme, "a");
    assert_eq!((a_again.position.line, a_again.position.column), (2, 1));
    assert_eq!(a_again.position.offset, 15);

    let literal = &tokens[7];
    assert_eq!(literal.lexeme, "1.5");
    assert_eq!((literal.position.line, literal.position.column), (2, 5));
}

#[test]
fn token_positions_never_rewind() {
    let tokens = tokenize("let abc: Number = (1 + 23) * 4;", "1.0");
    for pair in tokens.windows(2) {
        let end_of_first = pair[0].position.offset + pair[0].lexeme.len();
        assert!(
            pair[1].position.offset >= end_of_first,
            "token '{}' starts before the end of '{}'",
            pair[1].lexeme,
            pair[0].lexeme
        );
    }
}

#[test]
fn lexemes_reconstruct_the_source_without_whitespace() {
    let source = "let abc: Number = (1 + 23) * 4;\nprintln(abc);";
    let tokens = tokenize(source, "1.0");
    let rebuilt: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(rebuilt, stripped);
}

#[test]
fn unrecognized_characters_fail_with_their_position() {
    let provider = VersionProvider::new();
    let bundle = provider.resolve("1.0").unwrap();
    let mut lexer = Lexer::new(bundle.lexer_rules(), "let a: Number = #1;");

    let mut tokens = Vec::new();
    let error = loop {
        match lexer.next().expect("error must surface before input ends") {
            Ok(token) => tokens.push(token),
            Err(error) => break error,
        }
    };

    assert_eq!(error.kind, ErrorKind::Lex);
    assert!(error.message.contains('#'), "message: {}", error.message);
    let position = error.position.expect("lex errors carry a position");
    assert_eq!((position.line, position.column), (1, 17));
    // The iterator fuses after the error
    assert!(lexer.next().is_none());
    // Tokens before the bad character were still produced
    assert_eq!(tokens.len(), 5);
}

#[test]
fn boolean_words_are_literals_only_in_the_extended_version() {
    let tokens = tokenize("true", "1.0");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);

    let tokens = tokenize("true", "1.1");
    assert_eq!(tokens[0].kind, TokenKind::BooleanLiteral);

    // A word merely starting with a literal keyword stays an identifier
    let tokens = tokenize("truthy", "1.1");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
}

#[test]
fn boolean_type_id_exists_only_in_the_extended_version() {
    let tokens = tokenize("Boolean", "1.0");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);

    let tokens = tokenize("Boolean", "1.1");
    assert_eq!(tokens[0].kind, TokenKind::TypeId);
}

#[test]
fn double_quoted_strings_keep_their_quotes_in_the_lexeme() {
    let tokens = tokenize("\"Hello World!\"", "1.0");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].lexeme, "\"Hello World!\"");
}

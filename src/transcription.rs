pub mod character;
pub mod dialect;
pub mod error;
mod lexer;
pub mod renderer;
pub mod replacement;
pub mod span;
mod tokenizer;
mod validator;

use log::debug;

use crate::transcription::{
    dialect::{Dialect, DialectConfig, OutputKind, ParseOptions},
    error::{ParseError, ParseErrorKind},
    renderer::Transcription,
};

/// Parses one transcription token with the stock settings of `dialect`.
pub fn parse(source: &str, dialect: Dialect, kind: OutputKind) -> Result<Transcription, ParseError> {
    parse_with(source, &dialect.config(), ParseOptions::new(kind))
}

/// Parses one transcription token.
///
/// Leading and trailing whitespace is ignored. All validation errors of the
/// token are reported together; lexing stops at the first structural error.
pub fn parse_with(
    source: &str,
    config: &DialectConfig,
    options: ParseOptions,
) -> Result<Transcription, ParseError> {
    let token = source.trim();

    if token.is_empty() {
        if options.allow_empty {
            return Ok(Transcription::new(config.dialect, options.kind, vec![], vec![]));
        }
        return Err(ParseError::single(source, ParseErrorKind::EmptyParse));
    }

    let lexed = lexer::lex(token, config).map_err(|e| ParseError::single(token, e))?;

    let mut errors = lexed.unclosed;
    errors.extend(validator::validate(&lexed.chars, config, options));
    if !errors.is_empty() {
        return Err(ParseError::new(token, errors));
    }

    let mut chars = lexed.chars;
    tokenizer::stamp(&mut chars);

    debug!(
        "parsed {:?} ({}): {} records, {} spans",
        token,
        config.dialect,
        chars.len(),
        lexed.spans.len()
    );

    Ok(Transcription::new(config.dialect, options.kind, chars, lexed.spans))
}

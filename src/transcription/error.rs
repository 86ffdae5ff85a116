use thiserror::Error;

use crate::transcription::character::BracketKind;

/// A single violation found while parsing one transcription token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unclosed {0} bracket at offset {1}")]
    UnclosedBracket(BracketKind, usize),

    #[error("unexpected closing {0} bracket at offset {1}")]
    UnexpectedClosingBracket(BracketKind, usize),

    #[error("joiner {0:?} is not at the end of a line (offset {1})")]
    JoinerNotAtLineEnd(String, usize),

    #[error("illegal tokenization sequence: {0}")]
    IllegalTokenizationSequence(String),

    #[error("univerbation and multiverbation markers contradict each other")]
    ContradictoryTokenization,

    #[error("invalid characters: {}", .0.iter().map(|c| format!("{:?}", c)).collect::<Vec<_>>().join(", "))]
    InvalidCharacter(Vec<char>),

    #[error("token is empty")]
    EmptyParse,

    #[error("dialect rule violation: {0}")]
    DialectRuleViolation(String),
}

/// All violations of one token, with the token itself attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {token:?}: {}", .errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ParseError {
    pub token: String,
    pub errors: Vec<ParseErrorKind>,
}

impl ParseError {
    pub fn new(token: &str, errors: Vec<ParseErrorKind>) -> Self {
        ParseError {
            token: token.to_owned(),
            errors,
        }
    }

    pub fn single(token: &str, error: ParseErrorKind) -> Self {
        Self::new(token, vec![error])
    }

    pub fn contains(&self, predicate: impl Fn(&ParseErrorKind) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }
}

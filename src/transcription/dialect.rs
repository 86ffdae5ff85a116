use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::transcription::character::BracketKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    #[default]
    Plain,
    Rem,
    Ref,
    Anselm,
    Redi,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Plain,
        Dialect::Rem,
        Dialect::Ref,
        Dialect::Anselm,
        Dialect::Redi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Plain => "plain",
            Dialect::Rem => "rem",
            Dialect::Ref => "ref",
            Dialect::Anselm => "anselm",
            Dialect::Redi => "redi",
        }
    }

    pub fn config(self) -> DialectConfig {
        DialectConfig::of(self)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown dialect: {:?}", s))
    }
}

// Which invariants the caller wants enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    #[default]
    Trans,
    Dipl,
    Anno,
}

// How `[[..]]` is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorCompletion {
    EditorCompleted,
    FromEdition, // legacy synonym of [..]
}

// Whether `=` may appear in the middle of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MidLineHyphen {
    Allow,
    Reject,
}

/// The knobs in which the dialects differ.
///
/// Start from [`Dialect::config`] and adjust with the `with_*` setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DialectConfig {
    pub dialect: Dialect,
    pub editor_completion: EditorCompletion,
    pub multiline_spans: Vec<BracketKind>,
    pub quotes: Vec<String>,
    pub extra_chars: Vec<char>,
    pub mid_line_hyphen: MidLineHyphen,
}

impl DialectConfig {
    pub fn of(dialect: Dialect) -> Self {
        let quotes = |qs: &[&str]| qs.iter().map(|q| q.to_string()).collect::<Vec<_>>();

        match dialect {
            Dialect::Plain => DialectConfig {
                dialect,
                editor_completion: EditorCompletion::EditorCompleted,
                multiline_spans: BracketKind::ALL.to_vec(),
                quotes: quotes(&["\"", "«", "»", "(\")", "(«)", "(»)"]),
                extra_chars: vec![],
                mid_line_hyphen: MidLineHyphen::Allow,
            },
            Dialect::Rem => DialectConfig {
                dialect,
                editor_completion: EditorCompletion::FromEdition,
                multiline_spans: vec![BracketKind::FromEdition],
                quotes: quotes(&["«", "»", "(«)", "(»)"]),
                extra_chars: vec!['°'],
                mid_line_hyphen: MidLineHyphen::Allow,
            },
            Dialect::Ref => DialectConfig {
                dialect,
                editor_completion: EditorCompletion::EditorCompleted,
                multiline_spans: vec![
                    BracketKind::FromEdition,
                    BracketKind::EditorCompleted,
                    BracketKind::Strikethrough,
                ],
                quotes: quotes(&["\"", "(\")"]),
                extra_chars: vec![],
                mid_line_hyphen: MidLineHyphen::Allow,
            },
            Dialect::Anselm => DialectConfig {
                dialect,
                editor_completion: EditorCompletion::EditorCompleted,
                multiline_spans: vec![BracketKind::FromEdition, BracketKind::EditorCompleted],
                quotes: quotes(&["\"", "(\")"]),
                extra_chars: vec![],
                mid_line_hyphen: MidLineHyphen::Allow,
            },
            Dialect::Redi => DialectConfig {
                dialect,
                editor_completion: EditorCompletion::EditorCompleted,
                multiline_spans: BracketKind::ALL.to_vec(),
                quotes: quotes(&["\"", "«", "»", "(\")"]),
                extra_chars: vec!['°'],
                mid_line_hyphen: MidLineHyphen::Allow,
            },
        }
    }

    pub fn with_mid_line_hyphen(mut self, policy: MidLineHyphen) -> Self {
        self.mid_line_hyphen = policy;
        self
    }

    pub fn with_editor_completion(mut self, editor_completion: EditorCompletion) -> Self {
        self.editor_completion = editor_completion;
        self
    }

    pub fn with_multiline_spans(mut self, kinds: &[BracketKind]) -> Self {
        self.multiline_spans = kinds.to_vec();
        self
    }

    pub fn with_quotes(mut self, quotes: &[&str]) -> Self {
        self.quotes = quotes.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn with_extra_chars(mut self, chars: &[char]) -> Self {
        self.extra_chars = chars.to_vec();
        self
    }

    pub fn allows_multiline(&self, kind: BracketKind) -> bool {
        self.multiline_spans.contains(&kind)
    }

    pub fn accepts_quote(&self, quote: &str) -> bool {
        self.quotes.iter().any(|q| q == quote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParseOptions {
    pub kind: OutputKind,
    pub allow_empty: bool,
}

impl ParseOptions {
    pub fn new(kind: OutputKind) -> Self {
        ParseOptions {
            kind,
            allow_empty: false,
        }
    }

    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }
}

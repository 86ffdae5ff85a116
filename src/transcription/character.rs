use serde::{Deserialize, Serialize};

// Bracket kinds that open and close a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BracketKind {
    Parenthesis,     // &( &)
    FromEdition,     // [ ]
    EditorCompleted, // [[ ]]
    Recognizable,    // < >
    Strikethrough,   // *[ *]
}

impl BracketKind {
    pub const ALL: [BracketKind; 5] = [
        BracketKind::Parenthesis,
        BracketKind::FromEdition,
        BracketKind::EditorCompleted,
        BracketKind::Recognizable,
        BracketKind::Strikethrough,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            BracketKind::Parenthesis => 0,
            BracketKind::FromEdition => 1,
            BracketKind::EditorCompleted => 2,
            BracketKind::Recognizable => 3,
            BracketKind::Strikethrough => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BracketKind::Parenthesis => "parenthesis",
            BracketKind::FromEdition => "from-edition",
            BracketKind::EditorCompleted => "editor-completed",
            BracketKind::Recognizable => "recognizable",
            BracketKind::Strikethrough => "strikethrough",
        }
    }

    // Content of these spans is not legible in the manuscript
    pub fn is_illegible(self) -> bool {
        matches!(self, BracketKind::FromEdition | BracketKind::EditorCompleted)
    }
}

impl std::fmt::Display for BracketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// *{X*} *(X*) *<X*>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MajusculeStyle {
    Curly,
    Round,
    Angle,
}

/// Closed set of character variants.
///
/// Every lexed record falls into exactly one of these. Per-variant data
/// (majuscule size, bracket direction) lives in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum CharClass {
    TextChar,
    Majuscule {
        size: Option<u32>,
        style: MajusculeStyle,
    },
    Whitespace,
    LineBreak,
    Hyphen,           // =
    UniverbNewline,   // (=)
    UniverbSpace,     // #
    MultiverbNewline, // =|
    MultiverbSpace,   // |
    Punct,
    SentBound, // (.) (,) ...
    QuotationMark,
    ParticleLink,  // *1 *2
    ForeignMarker, // *f
    Parenthesis {
        opening: bool,
    },
    IllegibleChar,
    Lacuna,
    FromEdition {
        opening: bool,
    },
    EditorCompleted {
        opening: bool,
    },
    Recognizable {
        opening: bool,
    },
    Strikethrough {
        opening: bool,
    },
    ParseComment,
}

impl CharClass {
    pub fn bracket(kind: BracketKind, opening: bool) -> Self {
        match kind {
            BracketKind::Parenthesis => CharClass::Parenthesis { opening },
            BracketKind::FromEdition => CharClass::FromEdition { opening },
            BracketKind::EditorCompleted => CharClass::EditorCompleted { opening },
            BracketKind::Recognizable => CharClass::Recognizable { opening },
            BracketKind::Strikethrough => CharClass::Strikethrough { opening },
        }
    }

    /// Bracket kind and direction, for span delimiters only.
    pub fn bracket_kind(&self) -> Option<(BracketKind, bool)> {
        match *self {
            CharClass::Parenthesis { opening } => Some((BracketKind::Parenthesis, opening)),
            CharClass::FromEdition { opening } => Some((BracketKind::FromEdition, opening)),
            CharClass::EditorCompleted { opening } => {
                Some((BracketKind::EditorCompleted, opening))
            }
            CharClass::Recognizable { opening } => Some((BracketKind::Recognizable, opening)),
            CharClass::Strikethrough { opening } => Some((BracketKind::Strikethrough, opening)),
            _ => None,
        }
    }

    pub fn is_joiner(&self) -> bool {
        matches!(
            self,
            CharClass::Hyphen
                | CharClass::UniverbNewline
                | CharClass::UniverbSpace
                | CharClass::MultiverbNewline
        )
    }

    // Joiners that bind across a line-break and so must end a line
    pub fn is_line_end_joiner(&self) -> bool {
        matches!(
            self,
            CharClass::Hyphen | CharClass::UniverbNewline | CharClass::MultiverbNewline
        )
    }

    pub fn is_univerbation(&self) -> bool {
        matches!(
            self,
            CharClass::Hyphen | CharClass::UniverbNewline | CharClass::UniverbSpace
        )
    }

    pub fn is_multiverbation(&self) -> bool {
        matches!(self, CharClass::MultiverbNewline | CharClass::MultiverbSpace)
    }

    pub fn is_opening(&self) -> bool {
        matches!(self.bracket_kind(), Some((_, true)))
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.bracket_kind(), Some((_, false)))
    }

    pub fn is_space(&self) -> bool {
        matches!(self, CharClass::Whitespace | CharClass::LineBreak)
    }

    // Letters and letter-like placeholders
    pub fn is_wordlike(&self) -> bool {
        matches!(
            self,
            CharClass::TextChar
                | CharClass::Majuscule { .. }
                | CharClass::IllegibleChar
                | CharClass::Lacuna
        )
    }

    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            CharClass::Punct | CharClass::SentBound | CharClass::QuotationMark
        )
    }
}

/// One lexed character record carrying its three surface encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Char {
    pub source: String,
    pub offset: usize, // byte offset of `source` in the token
    #[serde(rename = "trans-class")]
    pub class: CharClass,

    pub dipl_utf: String,
    pub anno_utf: String,
    pub anno_simple: String,

    pub dipl_bound: bool,
    pub anno_bound: bool,
    pub token_bound: bool,

    pub illegible: bool,
    pub struck: bool,
}

impl Char {
    pub fn new(
        source: &str,
        offset: usize,
        class: CharClass,
        utf: &str,
        anno_simple: &str,
    ) -> Self {
        Self::with_encodings(source, offset, class, utf, utf, anno_simple)
    }

    pub fn with_encodings(
        source: &str,
        offset: usize,
        class: CharClass,
        dipl_utf: &str,
        anno_utf: &str,
        anno_simple: &str,
    ) -> Self {
        Char {
            source: source.to_owned(),
            offset,
            class,
            dipl_utf: dipl_utf.to_owned(),
            anno_utf: anno_utf.to_owned(),
            anno_simple: anno_simple.to_owned(),
            dipl_bound: false,
            anno_bound: false,
            token_bound: false,
            illegible: false,
            struck: false,
        }
    }

    // Same encoding on all three surfaces
    pub fn literal(source: &str, offset: usize, class: CharClass) -> Self {
        Self::new(source, offset, class, source, source)
    }
}

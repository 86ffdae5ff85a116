use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::transcription::{
    character::{BracketKind, Char, CharClass},
    dialect::{Dialect, OutputKind},
    span::SubtokenSpan,
};

/// A parsed transcription token.
///
/// Holds the character records in input order and the bracket spans in the
/// order their closers were read. Sub-token views borrow from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Transcription {
    dialect: Dialect,
    kind: OutputKind,
    chars: Vec<Char>,
    subtoken_spans: Vec<SubtokenSpan>,
}

impl Transcription {
    pub(super) fn new(
        dialect: Dialect,
        kind: OutputKind,
        chars: Vec<Char>,
        subtoken_spans: Vec<SubtokenSpan>,
    ) -> Self {
        Transcription {
            dialect,
            kind,
            chars,
            subtoken_spans,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    pub fn subtoken_spans(&self) -> &[SubtokenSpan] {
        &self.subtoken_spans
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The token source, line-breaks included.
    pub fn trans(&self) -> String {
        self.chars.iter().map(|c| c.source.as_str()).collect()
    }

    pub fn dipl_utf(&self) -> String {
        self.chars.iter().map(|c| c.dipl_utf.as_str()).collect()
    }

    pub fn anno_utf(&self) -> String {
        self.chars.iter().map(|c| c.anno_utf.as_str()).collect()
    }

    pub fn simple(&self) -> String {
        self.chars.iter().map(|c| c.anno_simple.as_str()).collect()
    }

    // Every record of the token lies inside a strikethrough span
    pub fn is_struck(&self) -> bool {
        let mut visible = self
            .chars
            .iter()
            .filter(|c| !c.class.is_space() && !matches!(c.class, CharClass::ParseComment))
            .peekable();
        visible.peek().is_some() && visible.all(|c| c.struck)
    }

    pub fn line_count(&self) -> usize {
        self.chars
            .iter()
            .filter(|c| matches!(c.class, CharClass::LineBreak))
            .count()
            + 1
    }

    pub fn spans_of(&self, kind: BracketKind) -> impl Iterator<Item = &SubtokenSpan> {
        self.subtoken_spans.iter().filter(move |s| s.kind == kind)
    }

    pub fn tokenize_dipl(&self) -> Vec<DiplToken<'_>> {
        split(&self.chars, |c| c.dipl_bound)
            .into_iter()
            .map(|range| DiplToken {
                chars: &self.chars[range.clone()],
                range,
            })
            .collect()
    }

    /// Annotation sub-tokens; those that render to nothing are left out.
    pub fn tokenize_anno(&self) -> Vec<AnnoToken<'_>> {
        split(&self.chars, |c| c.anno_bound)
            .into_iter()
            .map(|range| AnnoToken {
                chars: &self.chars[range.clone()],
                range,
            })
            .filter(|token| !token.utf().is_empty() || !token.simple().is_empty())
            .collect()
    }
}

fn split(chars: &[Char], is_bound: impl Fn(&Char) -> bool) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for (i, ch) in chars.iter().enumerate() {
        if i > start && is_bound(ch) {
            ranges.push(start..i);
            start = i;
        }
    }
    if start < chars.len() {
        ranges.push(start..chars.len());
    }

    ranges
}

// Sub-token views render without whitespace and line-breaks
fn render<'a>(chars: &'a [Char], field: impl Fn(&'a Char) -> &'a str) -> String {
    chars
        .iter()
        .filter(|c| !c.class.is_space())
        .map(field)
        .collect()
}

/// A diplomatic sub-token: a run of records between two `dipl_bound` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiplToken<'a> {
    chars: &'a [Char],
    range: Range<usize>,
}

impl<'a> DiplToken<'a> {
    pub fn chars(&self) -> &'a [Char] {
        self.chars
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn trans(&self) -> String {
        render(self.chars, |c| c.source.as_str())
    }

    pub fn utf(&self) -> String {
        render(self.chars, |c| c.dipl_utf.as_str())
    }

    pub fn simple(&self) -> String {
        render(self.chars, |c| c.anno_simple.as_str())
    }
}

/// An annotation sub-token: a run of records between two `anno_bound` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnoToken<'a> {
    chars: &'a [Char],
    range: Range<usize>,
}

impl<'a> AnnoToken<'a> {
    pub fn chars(&self) -> &'a [Char] {
        self.chars
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn trans(&self) -> String {
        render(self.chars, |c| c.source.as_str())
    }

    pub fn utf(&self) -> String {
        render(self.chars, |c| c.anno_utf.as_str())
    }

    pub fn simple(&self) -> String {
        render(self.chars, |c| c.anno_simple.as_str())
    }
}

use serde::{Deserialize, Serialize};

use crate::transcription::{
    character::{BracketKind, Char, CharClass},
    dialect::DialectConfig,
    error::ParseErrorKind,
};

/// A closed bracket span: byte offsets of the opener start and the closer end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubtokenSpan {
    pub kind: BracketKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    offset: usize,
    double: bool, // opened with a doubled delimiter ([[)
}

// Open spans, one stack per bracket kind plus the global nesting order
#[derive(Debug, Default)]
pub(super) struct SpanEngine {
    stacks: [Vec<OpenSpan>; 5],
    order: Vec<BracketKind>,
    closed: Vec<SubtokenSpan>,
}

impl SpanEngine {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn innermost(&self) -> Option<BracketKind> {
        self.order.last().copied()
    }

    // Whether the innermost span was opened with a doubled delimiter
    pub(super) fn innermost_is_double(&self) -> bool {
        self.innermost()
            .and_then(|kind| self.stacks[kind.index()].last())
            .map_or(false, |open| open.double)
    }

    pub(super) fn is_open(&self, kind: BracketKind) -> bool {
        !self.stacks[kind.index()].is_empty()
    }

    pub(super) fn is_illegible(&self) -> bool {
        self.order.iter().any(|kind| kind.is_illegible())
    }

    pub(super) fn is_struck(&self) -> bool {
        self.is_open(BracketKind::Strikethrough)
    }

    pub(super) fn open(&mut self, kind: BracketKind, offset: usize, double: bool) {
        self.stacks[kind.index()].push(OpenSpan { offset, double });
        self.order.push(kind);
    }

    pub(super) fn close(&mut self, kind: BracketKind, offset: usize, end: usize) -> Result<(), ParseErrorKind> {
        let start = match self.stacks[kind.index()].last() {
            Some(open) => open.offset,
            None => return Err(ParseErrorKind::UnexpectedClosingBracket(kind, offset)),
        };

        // LIFO across kinds: something opened later is still open
        if let Some(&innermost) = self.order.last() {
            if innermost != kind {
                let inner_offset = self.stacks[innermost.index()]
                    .last()
                    .map_or(offset, |open| open.offset);
                return Err(ParseErrorKind::UnclosedBracket(innermost, inner_offset));
            }
        }

        self.stacks[kind.index()].pop();
        self.order.pop();
        self.closed.push(SubtokenSpan { kind, start, end });
        Ok(())
    }

    // Spans that may not cross whitespace or a line-break in this dialect
    pub(super) fn check_crossing(&self, config: &DialectConfig) -> Result<(), ParseErrorKind> {
        for &kind in &self.order {
            if !config.allows_multiline(kind) {
                let offset = self.stacks[kind.index()]
                    .last()
                    .map_or(0, |open| open.offset);
                return Err(ParseErrorKind::UnclosedBracket(kind, offset));
            }
        }
        Ok(())
    }

    /// Stamps span membership on a record and rewrites its encodings.
    pub(super) fn apply(&self, ch: &mut Char) {
        if matches!(ch.class, CharClass::Lacuna) {
            return;
        }

        if self.is_illegible() {
            ch.illegible = true;
            ch.dipl_utf.clear();
            ch.anno_utf.clear();
            // a hyphen supplied by the editor is kept visibly
            if matches!(ch.class, CharClass::Hyphen) {
                ch.anno_simple = ch.source.clone();
            }
        }

        if self.is_struck() {
            ch.struck = true;
            ch.anno_utf.clear();
            ch.anno_simple.clear();
        }
    }

    /// Closed spans, and an error for every span still open, outermost first.
    pub(super) fn finish(self) -> (Vec<SubtokenSpan>, Vec<ParseErrorKind>) {
        let mut seen = [0usize; 5];
        let mut unclosed = Vec::new();
        for &kind in &self.order {
            if let Some(open) = self.stacks[kind.index()].get(seen[kind.index()]) {
                unclosed.push(ParseErrorKind::UnclosedBracket(kind, open.offset));
            }
            seen[kind.index()] += 1;
        }
        (self.closed, unclosed)
    }
}

// Markers that live outside the transcription tokens: the header fence,
// whole-line comments and shift tags.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const HEADER_OPEN: &str = "+H";
pub const HEADER_CLOSE: &str = "@H";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentKind {
    Comment,   // +K @K
    Editorial, // +E @E
    Other,     // +Z @Z
}

impl CommentKind {
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'K' => Some(CommentKind::Comment),
            'E' => Some(CommentKind::Editorial),
            'Z' => Some(CommentKind::Other),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            CommentKind::Comment => 'K',
            CommentKind::Editorial => 'E',
            CommentKind::Other => 'Z',
        }
    }

    pub fn closer(self) -> String {
        format!("@{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftKind {
    Foreign,     // +F @F
    Rubric,      // +R @R
    Marginalia,  // +M @M
    Title,       // +T @T
    Quotation,   // +Q @Q
    Superscript, // +S @S
}

impl ShiftKind {
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'F' => Some(ShiftKind::Foreign),
            'R' => Some(ShiftKind::Rubric),
            'M' => Some(ShiftKind::Marginalia),
            'T' => Some(ShiftKind::Title),
            'Q' => Some(ShiftKind::Quotation),
            'S' => Some(ShiftKind::Superscript),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ShiftKind::Foreign => 'F',
            ShiftKind::Rubric => 'R',
            ShiftKind::Marginalia => 'M',
            ShiftKind::Title => 'T',
            ShiftKind::Quotation => 'Q',
            ShiftKind::Superscript => 'S',
        }
    }
}

/// Comment kind and the text after the opener, if `content` starts a comment.
pub fn comment_opener(content: &str) -> Option<(CommentKind, &str)> {
    let rest = content.trim_start().strip_prefix('+')?;
    let code = rest.chars().next()?;
    let kind = CommentKind::from_code(code)?;
    Some((kind, &rest[code.len_utf8()..]))
}

/// Text up to the closer of `kind` and the text after it.
pub fn comment_closer(kind: CommentKind, text: &str) -> Option<(&str, &str)> {
    let closer = kind.closer();
    let at = text.find(&closer)?;
    Some((&text[..at], &text[at + closer.len()..]))
}

/// An item with its shift tags peeled off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedItem<'a> {
    pub opens: Vec<ShiftKind>,
    pub core: &'a str,
    pub closes: Vec<ShiftKind>,
}

// Leading +X and trailing @X shift tags of a whitespace-separated item
pub fn split_shift_tags(item: &str) -> TaggedItem<'_> {
    let mut core = item;

    let mut opens = Vec::new();
    while let Some(kind) = core
        .strip_prefix('+')
        .and_then(|rest| rest.chars().next())
        .and_then(ShiftKind::from_code)
    {
        opens.push(kind);
        core = &core[2..];
    }

    let mut closes = Vec::new();
    while core.len() >= 2 && core.is_char_boundary(core.len() - 2) {
        let (head, tail) = core.split_at(core.len() - 2);
        let kind = match tail.strip_prefix('@').and_then(|c| c.chars().next()) {
            Some(c) => ShiftKind::from_code(c),
            None => None,
        };
        match kind {
            Some(kind) => {
                closes.push(kind);
                core = head;
            }
            None => break,
        }
    }
    // innermost tag is written last
    closes.reverse();

    TaggedItem { opens, core, closes }
}

static REGEX_LINE_END_JOINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:=|\(=\)|=\|)(?:\]|>|\*\]|&\))*$").unwrap());

/// Whether a token ends with a joiner and so continues on the next line.
pub fn continues_on_next_line(token: &str) -> bool {
    REGEX_LINE_END_JOINER.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_markers() {
        assert_eq!(
            comment_opener("  +Edamaged leaf@E"),
            Some((CommentKind::Editorial, "damaged leaf@E"))
        );
        assert_eq!(comment_opener("+Ffoo"), None);
        assert_eq!(
            comment_closer(CommentKind::Editorial, "damaged leaf@E rest"),
            Some(("damaged leaf", " rest"))
        );
        assert_eq!(comment_closer(CommentKind::Comment, "no closer"), None);
    }

    #[test]
    fn shift_tags_are_peeled_off() {
        let item = split_shift_tags("+F+Qvirgo@Q@F");
        assert_eq!(item.opens, vec![ShiftKind::Foreign, ShiftKind::Quotation]);
        assert_eq!(item.core, "virgo");
        assert_eq!(item.closes, vec![ShiftKind::Quotation, ShiftKind::Foreign]);

        let item = split_shift_tags("@R");
        assert!(item.opens.is_empty());
        assert_eq!(item.core, "");
        assert_eq!(item.closes, vec![ShiftKind::Rubric]);

        // inline comments belong to the token
        let item = split_shift_tags("foo+Kx@K");
        assert_eq!(item.core, "foo+Kx@K");
    }

    #[test]
    fn line_end_joiners() {
        assert!(continues_on_next_line("ein="));
        assert!(continues_on_next_line("token(=)"));
        assert!(continues_on_next_line("vnd=|"));
        assert!(continues_on_next_line("[foo][=]"));
        assert!(continues_on_next_line("*[ab=*]"));
        assert!(!continues_on_next_line("daz"));
        assert!(!continues_on_next_line("a=b"));
    }
}

// Stamps sub-token boundaries on a validated record sequence.
//
// A boundary flag on record `i` means a new sub-token starts at `i`. Flags
// never land on the first record, so a sequence with `n` flags of one kind
// splits into `n + 1` sub-tokens.

use crate::transcription::character::{Char, CharClass};

#[derive(Debug, Clone, Copy)]
enum Bound {
    Dipl,
    Anno,
}

impl Bound {
    fn set(self, ch: &mut Char) {
        match self {
            Bound::Dipl => ch.dipl_bound = true,
            Bound::Anno => ch.anno_bound = true,
        }
    }
}

fn is_transparent(class: &CharClass) -> bool {
    class.bracket_kind().is_some() || matches!(class, CharClass::ParseComment)
}

// Flags the first record after `i` that can start a sub-token
fn mark_after(chars: &mut [Char], i: usize, bound: Bound) {
    let next = (i + 1..chars.len()).find(|&j| {
        let class = &chars[j].class;
        !(class.is_closing() || class.is_space() || matches!(class, CharClass::ParseComment))
    });
    if let Some(j) = next {
        bound.set(&mut chars[j]);
    }
}

// Flags `i`, or the first of the opening brackets right before it
fn mark_before(chars: &mut [Char], i: usize, bound: Bound) {
    let mut j = i;
    while j > 0 && chars[j - 1].class.is_opening() {
        j -= 1;
    }
    if j > 0 {
        bound.set(&mut chars[j]);
    }
}

fn prev_significant(chars: &[Char], i: usize) -> Option<CharClass> {
    chars[..i]
        .iter()
        .rev()
        .find(|c| !is_transparent(&c.class))
        .map(|c| c.class.clone())
}

fn next_significant(chars: &[Char], i: usize) -> Option<CharClass> {
    chars[i + 1..]
        .iter()
        .find(|c| !is_transparent(&c.class))
        .map(|c| c.class.clone())
}

pub(super) fn stamp(chars: &mut [Char]) {
    for i in 0..chars.len() {
        stamp_dipl(chars, i);
        stamp_anno(chars, i);
    }

    if let Some(last) = chars.last_mut() {
        if !last.dipl_bound && !last.anno_bound {
            last.token_bound = true;
        }
    }
}

fn stamp_dipl(chars: &mut [Char], i: usize) {
    let class = &chars[i].class;
    if class.is_joiner() || class.is_space() {
        mark_after(chars, i, Bound::Dipl);
    }
}

fn stamp_anno(chars: &mut [Char], i: usize) {
    let class = chars[i].class.clone();
    let prev = prev_significant(chars, i);
    let next = next_significant(chars, i);
    let raw_next = chars.get(i + 1).map(|c| c.class.clone());

    match class {
        CharClass::Whitespace | CharClass::MultiverbSpace | CharClass::MultiverbNewline => {
            mark_after(chars, i, Bound::Anno);
        }

        // a line-break after a univerbation joins the halves
        CharClass::LineBreak => {
            if !matches!(
                prev,
                Some(CharClass::Hyphen | CharClass::UniverbNewline | CharClass::UniverbSpace)
            ) {
                mark_after(chars, i, Bound::Anno);
            }
        }

        CharClass::Punct | CharClass::QuotationMark => {
            let initial = prev
                .as_ref()
                .map_or(true, |p| p.is_space() || p.is_multiverbation())
                && next.as_ref().map_or(false, |n| !n.is_punctuation());
            let trailing = prev
                .as_ref()
                .map_or(false, |p| p.is_wordlike())
                && next
                    .as_ref()
                    .map_or(true, |n| !n.is_wordlike() && !n.is_joiner());

            if initial {
                mark_before(chars, i, Bound::Anno);
                mark_after(chars, i, Bound::Anno);
            } else if trailing {
                mark_before(chars, i, Bound::Anno);
            }

            // adjacent punctuation of a different kind
            if i > 0 {
                let before = &chars[i - 1];
                if before.class.is_punctuation()
                    && (before.class != chars[i].class || before.source != chars[i].source)
                {
                    mark_before(chars, i, Bound::Anno);
                }
            }
        }

        CharClass::ParticleLink => {
            if raw_next.as_ref().map_or(false, |n| n.is_punctuation()) {
                mark_before(chars, i + 1, Bound::Anno);
            }
        }

        CharClass::SentBound => {
            if !raw_next.as_ref().map_or(false, |n| n.is_multiverbation()) {
                mark_before(chars, i, Bound::Anno);
                mark_after(chars, i, Bound::Anno);
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(source: &str, offset: usize) -> Char {
        Char::literal(source, offset, CharClass::TextChar)
    }

    #[test]
    fn mark_before_moves_to_opening_brackets() {
        let mut chars = vec![
            text("a", 0),
            Char::new("[", 1, CharClass::FromEdition { opening: true }, "", ""),
            text(".", 2),
        ];
        mark_before(&mut chars, 2, Bound::Anno);
        assert!(chars[1].anno_bound);
        assert!(!chars[2].anno_bound);
    }

    #[test]
    fn mark_after_skips_closing_brackets_and_spaces() {
        let mut chars = vec![
            text("a", 0),
            Char::with_encodings("=", 1, CharClass::Hyphen, "⸗", "", ""),
            Char::new("]", 2, CharClass::FromEdition { opening: false }, "", ""),
            Char::new("\n", 3, CharClass::LineBreak, "\n", ""),
            text("b", 4),
        ];
        mark_after(&mut chars, 1, Bound::Dipl);
        assert!(chars[4].dipl_bound);
        assert!(chars[..4].iter().all(|c| !c.dipl_bound));
    }

    #[test]
    fn first_record_is_never_flagged() {
        let mut chars = vec![text("a", 0)];
        mark_before(&mut chars, 0, Bound::Dipl);
        stamp(&mut chars);
        assert!(!chars[0].dipl_bound);
        assert!(chars[0].token_bound);
    }
}

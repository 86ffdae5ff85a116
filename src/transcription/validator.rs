use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    transcription::{
        character::{Char, CharClass},
        dialect::{DialectConfig, MidLineHyphen, OutputKind, ParseOptions},
        error::ParseErrorKind,
    },
    utility::str::CharType,
};

// Edition numerals, superscript codes and the escape prefix
static REGEX_METADATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[0-9]+\}|%.|\\").unwrap());

// Brackets and comments do not separate neighbouring records
fn is_transparent(class: &CharClass) -> bool {
    class.bracket_kind().is_some() || matches!(class, CharClass::ParseComment)
}

/// Checks a lexed record sequence and returns every violation found.
pub(super) fn validate(
    chars: &[Char],
    config: &DialectConfig,
    options: ParseOptions,
) -> Vec<ParseErrorKind> {
    let mut errors = Vec::new();

    if options.kind != OutputKind::Anno {
        check_line_end_joiners(chars, config, &mut errors);
    }
    check_tokenization_markers(chars, &mut errors);
    check_foreign_markers(chars, &mut errors);
    check_alphabet(chars, config, &mut errors);

    errors
}

fn check_line_end_joiners(chars: &[Char], config: &DialectConfig, errors: &mut Vec<ParseErrorKind>) {
    for (i, ch) in chars.iter().enumerate() {
        if !ch.class.is_line_end_joiner() {
            continue;
        }

        let next = chars[i + 1..]
            .iter()
            .find(|c| !c.class.is_closing() && !matches!(c.class, CharClass::ParseComment));

        let at_line_end = match next {
            None => true,
            Some(c) => matches!(c.class, CharClass::LineBreak),
        };
        let tolerated =
            matches!(ch.class, CharClass::Hyphen) && config.mid_line_hyphen == MidLineHyphen::Allow;

        if !at_line_end && !tolerated {
            errors.push(ParseErrorKind::JoinerNotAtLineEnd(ch.source.clone(), ch.offset));
        }
    }
}

fn check_tokenization_markers(chars: &[Char], errors: &mut Vec<ParseErrorKind>) {
    for (i, ch) in chars.iter().enumerate() {
        let first = &ch.class;
        if !first.is_univerbation() && !first.is_multiverbation() {
            continue;
        }

        let second = match chars[i + 1..]
            .iter()
            .find(|c| !is_transparent(&c.class) && !matches!(c.class, CharClass::LineBreak))
        {
            Some(c) => &c.class,
            None => continue,
        };

        let error = match (first, second) {
            (CharClass::MultiverbSpace, CharClass::Hyphen) => {
                ParseErrorKind::IllegalTokenizationSequence(format!(
                    "{:?} followed by a hyphen",
                    ch.source
                ))
            }
            (CharClass::UniverbNewline, CharClass::MultiverbSpace)
            | (CharClass::MultiverbSpace, CharClass::UniverbNewline) => {
                ParseErrorKind::IllegalTokenizationSequence("(=) combined with |".to_owned())
            }
            _ if first.is_univerbation() && second.is_multiverbation()
                || first.is_multiverbation() && second.is_univerbation() =>
            {
                ParseErrorKind::ContradictoryTokenization
            }
            _ => continue,
        };

        if !errors.contains(&error) {
            errors.push(error);
        }
    }
}

fn check_foreign_markers(chars: &[Char], errors: &mut Vec<ParseErrorKind>) {
    for (i, ch) in chars.iter().enumerate() {
        if !matches!(ch.class, CharClass::ForeignMarker) {
            continue;
        }

        let followed_by_text = chars[i + 1..]
            .iter()
            .find(|c| !is_transparent(&c.class))
            .map_or(false, |c| c.class.is_wordlike());
        if !followed_by_text {
            errors.push(ParseErrorKind::DialectRuleViolation(format!(
                "foreign marker at offset {} is not followed by text",
                ch.offset
            )));
        }
    }
}

fn check_alphabet(chars: &[Char], config: &DialectConfig, errors: &mut Vec<ParseErrorKind>) {
    let mut invalid = BTreeSet::new();

    for ch in chars {
        if !matches!(
            ch.class,
            CharClass::TextChar | CharClass::Majuscule { .. } | CharClass::Punct
        ) {
            continue;
        }

        let simple = REGEX_METADATA.replace_all(&ch.anno_simple, "");
        for c in simple.chars() {
            if CharType::from(c) == CharType::Other && !config.extra_chars.contains(&c) {
                invalid.insert(c);
            }
        }
    }

    if !invalid.is_empty() {
        errors.push(ParseErrorKind::InvalidCharacter(invalid.into_iter().collect()));
    }
}

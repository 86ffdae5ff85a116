use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    transcription::{
        character::{BracketKind, Char, CharClass, MajusculeStyle},
        dialect::{DialectConfig, EditorCompletion},
        error::ParseErrorKind,
        replacement::{find_replacement, Surroundings},
        span::{SpanEngine, SubtokenSpan},
    },
    utility::str::parse_number,
};

pub(super) struct Lexed {
    pub(super) chars: Vec<Char>,
    pub(super) spans: Vec<SubtokenSpan>,
    pub(super) unclosed: Vec<ParseErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    LineBreak,
    Whitespace,
    Comment,
    EditionNumeral,
    DotGroup,
    Majuscule(MajusculeStyle),
    Lacuna,
    Open(BracketKind),
    Close(BracketKind),
    DoubleOpen,  // [[
    DoubleClose, // ]]
    UniverbNewline,
    MultiverbNewline,
    UniverbSpace,
    MultiverbSpace,
    Hyphen,
    EditorialQuote,
    Quote,
    SentBound,
    DoubleComma,
    Particle,
    Foreign,
    Alinea,
    Period,
}

// Declaration order is priority order
static RULES: Lazy<Vec<(Rule, Regex)>> = Lazy::new(|| {
    let rules = [
        (Rule::LineBreak, r"\r\n|\n|\r"),
        (Rule::Whitespace, r"[ \t]+"),
        (Rule::Comment, r"\+K.*?@K|\+E.*?@E|\+Z.*?@Z"),
        (Rule::EditionNumeral, r"\{[0-9]+\}"),
        (Rule::DotGroup, r"<\.([^<>\s]+?)\.>"),
        (Rule::Majuscule(MajusculeStyle::Curly), r"\*\{(.+?)\*([0-9]*)\}"),
        (Rule::Majuscule(MajusculeStyle::Round), r"\*\((.+?)\*([0-9]*)\)"),
        (Rule::Majuscule(MajusculeStyle::Angle), r"\*<(.+?)\*([0-9]*)>"),
        (Rule::Lacuna, r"\[(?:\.\.\.|…)\]"),
        (Rule::Open(BracketKind::Strikethrough), r"\*\["),
        (Rule::Close(BracketKind::Strikethrough), r"\*\]"),
        (Rule::DoubleOpen, r"\[\["),
        (Rule::DoubleClose, r"\]\]"),
        (Rule::Open(BracketKind::FromEdition), r"\["),
        (Rule::Close(BracketKind::FromEdition), r"\]"),
        (Rule::Open(BracketKind::Recognizable), r"<"),
        (Rule::Close(BracketKind::Recognizable), r">"),
        (Rule::UniverbNewline, r"\(=\)"),
        (Rule::MultiverbNewline, r"=\|"),
        (Rule::UniverbSpace, r"#"),
        (Rule::MultiverbSpace, r"\|"),
        (Rule::Hyphen, r"="),
        (Rule::Open(BracketKind::Parenthesis), r"&\("),
        (Rule::Close(BracketKind::Parenthesis), r"&\)"),
        (Rule::EditorialQuote, r#"\(("|«|»)\)"#),
        (Rule::Quote, r#""|«|»"#),
        (Rule::SentBound, r"\(([.,:;!?])\)"),
        (Rule::DoubleComma, r",,"),
        (Rule::Particle, r"\*[12]"),
        (Rule::Foreign, r"\*f"),
        (Rule::Alinea, r"\*C"),
        (Rule::Period, r"\."),
    ];

    rules
        .iter()
        .map(|(rule, pattern)| (*rule, Regex::new(&format!("^(?:{})", pattern)).unwrap()))
        .collect()
});

static REGEX_ESCAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\\(.)").unwrap());

// One unit of running text: a replacement, an escaped or a plain character
struct TextUnit {
    len: usize,
    utf: String,
    simple: String,
    plain: Option<char>,
}

fn text_unit(text: &str, pos: usize, simple_before: &str) -> Option<TextUnit> {
    let rest = &text[pos..];

    if let Some(m) = find_replacement(&Surroundings {
        source_before: &text[..pos],
        simple_before,
        rest,
    }) {
        return Some(TextUnit {
            len: m.len,
            utf: m.utf,
            simple: m.simple,
            plain: None,
        });
    }

    if let Some(caps) = REGEX_ESCAPED.captures(rest) {
        let whole = caps.get(0)?.as_str();
        return Some(TextUnit {
            len: whole.len(),
            utf: caps.get(1)?.as_str().to_owned(),
            simple: whole.to_owned(),
            plain: None,
        });
    }

    let c = rest.chars().next()?;
    Some(TextUnit {
        len: c.len_utf8(),
        utf: c.to_string(),
        simple: c.to_string(),
        plain: Some(c),
    })
}

// Encodings of the content of a majuscule or a dot group
fn encode_inline(text: &str) -> (String, String) {
    let mut utf = String::new();
    let mut simple = String::new();

    let mut pos = 0;
    while let Some(unit) = text_unit(text, pos, &simple) {
        utf.push_str(&unit.utf);
        simple.push_str(&unit.simple);
        pos += unit.len;
    }

    (utf, simple)
}

fn is_punct_char(c: char) -> bool {
    matches!(c, ',' | ':' | ';' | '!' | '?' | '/')
}

struct Lexer<'a> {
    source: &'a str,
    config: &'a DialectConfig,
    pos: usize,
    spans: SpanEngine,
    chars: Vec<Char>,
    simple: String, // simple rendering before span policies
}

// Lexes one transcription token into character records
pub(super) fn lex(source: &str, config: &DialectConfig) -> Result<Lexed, ParseErrorKind> {
    let mut lexer = Lexer {
        source,
        config,
        pos: 0,
        spans: SpanEngine::new(),
        chars: Vec::new(),
        simple: String::new(),
    };

    while lexer.pos < source.len() {
        lexer.step()?;
    }

    let chars = lexer.chars;
    let (spans, unclosed) = lexer.spans.finish();

    Ok(Lexed {
        chars,
        spans,
        unclosed,
    })
}

impl<'a> Lexer<'a> {
    fn step(&mut self) -> Result<(), ParseErrorKind> {
        let source = self.source;
        let rest = &source[self.pos..];

        for (rule, regex) in RULES.iter() {
            if let Some(caps) = regex.captures(rest) {
                if self.apply_rule(*rule, &caps)? {
                    return Ok(());
                }
            }
        }

        let unit = match text_unit(source, self.pos, &self.simple) {
            Some(unit) => unit,
            None => return Ok(()),
        };
        let text = &rest[..unit.len];
        let class = match unit.plain {
            Some(c) if is_punct_char(c) => CharClass::Punct,
            _ => CharClass::TextChar,
        };
        trace!("text {:?} at {}", text, self.pos);
        self.emit(
            Char::new(text, self.pos, class, &unit.utf, &unit.simple),
            unit.len,
        );
        Ok(())
    }

    // Ok(false) when the rule does not apply in this context
    fn apply_rule(&mut self, rule: Rule, caps: &Captures) -> Result<bool, ParseErrorKind> {
        let text = match caps.get(0) {
            Some(m) => m.as_str(),
            None => return Ok(false),
        };
        let len = text.len();
        let pos = self.pos;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        trace!("{:?} {:?} at {}", rule, text, pos);

        match rule {
            Rule::LineBreak => {
                self.spans.check_crossing(self.config)?;
                self.emit(Char::new(text, pos, CharClass::LineBreak, "\n", ""), len);
            }

            Rule::Whitespace => {
                self.spans.check_crossing(self.config)?;
                self.emit(Char::new(text, pos, CharClass::Whitespace, " ", ""), len);
            }

            Rule::Comment => {
                self.push(Char::new(text, pos, CharClass::ParseComment, "", ""), len);
            }

            Rule::EditionNumeral => {
                self.emit(Char::new(text, pos, CharClass::TextChar, "", text), len);
            }

            Rule::DotGroup => {
                let (utf, simple) = encode_inline(group(1));
                self.emit(
                    Char::new(
                        text,
                        pos,
                        CharClass::TextChar,
                        &format!(".{}.", utf),
                        &format!(".{}.", simple),
                    ),
                    len,
                );
            }

            Rule::Majuscule(style) => {
                let (utf, simple) = encode_inline(group(1));
                let size = match group(2) {
                    "" => None,
                    digits => match parse_number(digits).ok().and_then(|n| u32::try_from(n).ok()) {
                        Some(n) if n > 0 => Some(n),
                        _ => {
                            return Err(ParseErrorKind::DialectRuleViolation(format!(
                                "invalid majuscule size {:?}",
                                digits
                            )))
                        }
                    },
                };
                self.emit(
                    Char::new(text, pos, CharClass::Majuscule { size, style }, &utf, &simple),
                    len,
                );
            }

            Rule::Lacuna => {
                self.push(Char::new(text, pos, CharClass::Lacuna, "[…]", "[…]"), len);
            }

            Rule::Open(kind) => self.open(kind, text, false)?,
            Rule::Close(kind) => self.close(kind, text)?,

            Rule::DoubleOpen => {
                let kind = match self.config.editor_completion {
                    EditorCompletion::EditorCompleted => BracketKind::EditorCompleted,
                    EditorCompletion::FromEdition => BracketKind::FromEdition,
                };
                self.open(kind, text, true)?;
            }

            Rule::DoubleClose => {
                // `]]` may close a single `[` followed by another closer
                match self.spans.innermost() {
                    Some(BracketKind::FromEdition) if !self.spans.innermost_is_double() => {
                        self.close(BracketKind::FromEdition, &text[..1])?
                    }
                    Some(BracketKind::FromEdition) => self.close(BracketKind::FromEdition, text)?,
                    _ => {
                        let kind = match self.config.editor_completion {
                            EditorCompletion::EditorCompleted => BracketKind::EditorCompleted,
                            EditorCompletion::FromEdition => BracketKind::FromEdition,
                        };
                        self.close(kind, text)?
                    }
                }
            }

            Rule::UniverbNewline => {
                self.emit(Char::new(text, pos, CharClass::UniverbNewline, "", ""), len);
            }

            Rule::MultiverbNewline => {
                self.emit(
                    Char::with_encodings(text, pos, CharClass::MultiverbNewline, "⸗", "", ""),
                    len,
                );
            }

            Rule::UniverbSpace => {
                self.emit(Char::new(text, pos, CharClass::UniverbSpace, "", ""), len);
            }

            Rule::MultiverbSpace => {
                self.emit(Char::new(text, pos, CharClass::MultiverbSpace, "", ""), len);
            }

            Rule::Hyphen => {
                self.emit(
                    Char::with_encodings(text, pos, CharClass::Hyphen, "⸗", "", ""),
                    len,
                );
            }

            Rule::EditorialQuote => {
                if !self.config.accepts_quote(text) {
                    return Ok(false);
                }
                // the simple alphabet has one quotation mark for every style
                self.emit(
                    Char::with_encodings(text, pos, CharClass::QuotationMark, "", group(1), "(\")"),
                    len,
                );
            }

            Rule::Quote => {
                if !self.config.accepts_quote(text) {
                    return Ok(false);
                }
                self.emit(Char::new(text, pos, CharClass::QuotationMark, text, "\""), len);
            }

            Rule::SentBound => {
                self.emit(
                    Char::with_encodings(text, pos, CharClass::SentBound, "", group(1), text),
                    len,
                );
            }

            Rule::DoubleComma => {
                self.emit(Char::new(text, pos, CharClass::Punct, "„", text), len);
            }

            Rule::Particle => {
                self.emit(Char::new(text, pos, CharClass::ParticleLink, "", ""), len);
            }

            Rule::Foreign => {
                self.emit(Char::new(text, pos, CharClass::ForeignMarker, "", ""), len);
            }

            Rule::Alinea => {
                self.emit(Char::new(text, pos, CharClass::Punct, "¶", "//"), len);
            }

            Rule::Period => {
                // a dot supplied by the editor is a placeholder
                let ch = if self.spans.innermost() == Some(BracketKind::EditorCompleted) {
                    Char::new(text, pos, CharClass::IllegibleChar, "…", text)
                } else {
                    Char::literal(text, pos, CharClass::Punct)
                };
                self.emit(ch, len);
            }
        }

        Ok(true)
    }

    fn bracket_char(&self, kind: BracketKind, opening: bool, text: &str) -> Char {
        let class = CharClass::bracket(kind, opening);
        match kind {
            BracketKind::Strikethrough => {
                Char::with_encodings(text, self.pos, class, text, "", "")
            }
            BracketKind::Parenthesis => {
                let glyph = if opening { "(" } else { ")" };
                Char::new(text, self.pos, class, glyph, glyph)
            }
            _ => Char::new(text, self.pos, class, "", ""),
        }
    }

    fn open(&mut self, kind: BracketKind, text: &str, double: bool) -> Result<(), ParseErrorKind> {
        let ch = self.bracket_char(kind, true, text);
        self.spans.open(kind, self.pos, double);
        self.emit(ch, text.len());
        Ok(())
    }

    fn close(&mut self, kind: BracketKind, text: &str) -> Result<(), ParseErrorKind> {
        let mut ch = self.bracket_char(kind, false, text);
        self.spans.apply(&mut ch);
        self.spans.close(kind, self.pos, self.pos + text.len())?;
        self.push(ch, text.len());
        Ok(())
    }

    fn emit(&mut self, mut ch: Char, len: usize) {
        self.simple.push_str(&ch.anno_simple);
        self.spans.apply(&mut ch);
        self.push(ch, len);
    }

    fn push(&mut self, ch: Char, len: usize) {
        self.chars.push(ch);
        self.pos += len;
    }
}

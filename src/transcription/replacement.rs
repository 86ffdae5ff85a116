// Ordered source -> (utf, simple) rewrite rules.
//
// The first rule whose pattern and context both match at a position wins, so
// more specific rules must come before the general ones. `regex` has no
// lookaround; left and right context are separate predicates instead.

use once_cell::sync::Lazy;
use regex::Regex;

pub enum Context {
    // Simple rendering emitted so far must match
    AfterSimple(Regex),
    // Raw source before the position must not match
    NotAfterSource(Regex),
    // Input after the match must not match
    NotBefore(Regex),
}

pub struct Replacement {
    pattern: Regex,
    contexts: Vec<Context>,
    utf: String,
    simple: String,
}

impl Replacement {
    fn new(pattern: &str, utf: &str, simple: &str) -> Self {
        Replacement {
            pattern: Regex::new(&format!("^(?:{})", pattern)).unwrap(),
            contexts: Vec::new(),
            utf: utf.to_owned(),
            simple: simple.to_owned(),
        }
    }

    fn after_simple(mut self, pattern: &str) -> Self {
        self.contexts
            .push(Context::AfterSimple(Regex::new(&format!("(?:{})$", pattern)).unwrap()));
        self
    }

    fn not_after_source(mut self, pattern: &str) -> Self {
        self.contexts.push(Context::NotAfterSource(
            Regex::new(&format!("(?:{})$", pattern)).unwrap(),
        ));
        self
    }

    fn not_before(mut self, pattern: &str) -> Self {
        self.contexts
            .push(Context::NotBefore(Regex::new(&format!("^(?:{})", pattern)).unwrap()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementMatch {
    pub len: usize,
    pub utf: String,
    pub simple: String,
}

// Text around the current lexer position
pub struct Surroundings<'a> {
    pub source_before: &'a str,
    pub simple_before: &'a str,
    pub rest: &'a str,
}

pub static REPLACEMENTS: Lazy<Vec<Replacement>> = Lazy::new(|| {
    let mut table = Vec::new();

    // \&N: numbered glyphs
    for (n, glyph) in ["①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨"]
        .iter()
        .enumerate()
    {
        let digit = (n + 1).to_string();
        table.push(Replacement::new(&format!(r"\\&{}", digit), glyph, &digit));
    }

    // single escape codes
    table.push(Replacement::new(r"\$", "ſ", "s"));
    table.push(Replacement::new(r"\\us", "ꝰ", "us"));
    table.push(Replacement::new(r"\\ur", "\u{1DD1}", "ur"));

    // ampersand abbreviations
    table.push(Replacement::new("&c", "⁊c", "etc."));
    table.push(Replacement::new("&&", "&", "et"));
    for (digit, glyph, simple) in [("1", "⁊", "et"), ("2", "ꝝ", "rum"), ("3", "ꝯ", "con")] {
        table.push(
            Replacement::new(&format!("&{}", digit), glyph, simple)
                .not_after_source(r"\\")
                .not_before("[0-9]"),
        );
    }
    table.push(Replacement::new("&", "⁊", "et").not_before("[0-9]"));

    // r-abbreviations: the expansion depends on the preceding letter
    table.push(Replacement::new("'", "\u{1DE3}", "r").after_simple("[aeiouyAEIOUY]"));
    table.push(Replacement::new("'", "\u{1DE3}", "er").after_simple("[A-Za-z]"));
    table.push(Replacement::new("'", "\u{1DE3}", "'"));

    // nasal bar
    table.push(Replacement::new(r"([aeiouy])\\-", "${1}\u{0304}", "${1}n"));
    table.push(Replacement::new(r"([AEIOUY])\\-", "${1}\u{0304}", "${1}N"));
    table.push(Replacement::new(
        r"([b-df-hj-np-tv-z])\\-",
        "${1}\u{0304}",
        "${1}en",
    ));
    table.push(Replacement::new(
        r"([B-DF-HJ-NP-TV-Z])\\-",
        "${1}\u{0304}",
        "${1}-",
    ));
    table.push(Replacement::new(r"\\-([nm])", "\u{0304}${1}", "e${1}"));
    table.push(Replacement::new(r"\\-([NM])", "\u{0304}${1}", "E${1}"));
    table.push(Replacement::new(r"\\-", "\u{0304}", "-"));

    // combining diacritics
    table.push(Replacement::new(r"\\\^", "\u{0302}", ""));
    table.push(Replacement::new(r"\\~", "\u{0303}", ""));
    table.push(Replacement::new(r"\\:", "\u{0308}", ""));
    table.push(Replacement::new(r"\\o", "\u{030A}", ""));
    table.push(Replacement::new(r"\\'", "\u{0301}", ""));

    // superscript letters keep their code in the simple form
    for (letter, mark) in [
        ('a', "\u{0363}"),
        ('e', "\u{0364}"),
        ('i', "\u{0365}"),
        ('o', "\u{0366}"),
        ('u', "\u{0367}"),
        ('r', "\u{036C}"),
        ('v', "\u{036E}"),
        ('w', "\u{1DF1}"),
    ] {
        let code = format!("%{}", letter);
        table.push(Replacement::new(&code, mark, &code));
    }

    // ligatures
    table.push(Replacement::new("æ", "æ", "ae"));
    table.push(Replacement::new("Æ", "Æ", "AE"));
    table.push(Replacement::new("œ", "œ", "oe"));
    table.push(Replacement::new("ß", "ß", "ss"));

    table
});

pub fn find_replacement(surroundings: &Surroundings) -> Option<ReplacementMatch> {
    for rule in REPLACEMENTS.iter() {
        let caps = match rule.pattern.captures(surroundings.rest) {
            Some(caps) => caps,
            None => continue,
        };
        let len = caps.get(0).map_or(0, |m| m.end());
        if len == 0 {
            continue;
        }

        let after = &surroundings.rest[len..];
        let in_context = rule.contexts.iter().all(|context| match context {
            Context::AfterSimple(re) => re.is_match(surroundings.simple_before),
            Context::NotAfterSource(re) => !re.is_match(surroundings.source_before),
            Context::NotBefore(re) => !re.is_match(after),
        });
        if !in_context {
            continue;
        }

        let mut utf = String::new();
        caps.expand(&rule.utf, &mut utf);
        let mut simple = String::new();
        caps.expand(&rule.simple, &mut simple);

        return Some(ReplacementMatch { len, utf, simple });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace(simple_before: &str, rest: &str) -> Option<ReplacementMatch> {
        find_replacement(&Surroundings {
            source_before: simple_before,
            simple_before,
            rest,
        })
    }

    #[test]
    fn long_s() {
        let m = replace("", "$we").unwrap();
        assert_eq!(m.len, 1);
        assert_eq!(m.utf, "ſ");
        assert_eq!(m.simple, "s");
    }

    #[test]
    fn numbered_glyph_wins_over_ampersand_digit() {
        let m = replace("", r"\&2x").unwrap();
        assert_eq!(m.len, 3);
        assert_eq!(m.utf, "②");
        assert_eq!(m.simple, "2");

        let m = replace("", "&2x").unwrap();
        assert_eq!(m.simple, "rum");
    }

    #[test]
    fn ampersand_digit_requires_single_digit() {
        assert!(replace("", "&23").is_none());
        assert!(replace("", "&4").is_none());
        assert_eq!(replace("", "&x").unwrap().simple, "et");
    }

    #[test]
    fn r_abbreviation_depends_on_preceding_letter() {
        assert_eq!(replace("wa", "'").unwrap().simple, "r");
        assert_eq!(replace("d", "'").unwrap().simple, "er");
        assert_eq!(replace("", "'").unwrap().simple, "'");
    }

    #[test]
    fn nasal_bar_context() {
        let m = replace("", r"a\-").unwrap();
        assert_eq!(m.len, 3);
        assert_eq!(m.utf, "a\u{0304}");
        assert_eq!(m.simple, "an");

        assert_eq!(replace("", r"d\-").unwrap().simple, "den");
        assert_eq!(replace("", r"D\-").unwrap().simple, "D-");
        assert_eq!(replace("", r"\-m").unwrap().simple, "em");
        assert_eq!(replace("", r"\-x").unwrap().simple, "-");
    }

    #[test]
    fn plain_letters_are_not_replaced() {
        assert!(replace("", "abc").is_none());
    }
}

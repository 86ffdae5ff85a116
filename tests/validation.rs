use manuscript_trans::transcription::{
    character::BracketKind,
    dialect::{Dialect, MidLineHyphen, OutputKind, ParseOptions},
    error::{ParseError, ParseErrorKind},
    parse, parse_with,
};

fn errors(source: &str, dialect: Dialect) -> ParseError {
    parse(source, dialect, OutputKind::Trans).unwrap_err()
}

#[test]
fn unclosed_brackets_are_reported_outermost_first() {
    let e = errors("<a*[b", Dialect::Plain);

    assert_eq!(
        e.errors,
        vec![
            ParseErrorKind::UnclosedBracket(BracketKind::Recognizable, 0),
            ParseErrorKind::UnclosedBracket(BracketKind::Strikethrough, 2),
        ]
    );
    assert_eq!(e.token, "<a*[b");
}

#[test]
fn unexpected_closing_bracket() {
    let e = errors("ab>", Dialect::Plain);

    assert_eq!(
        e.errors,
        vec![ParseErrorKind::UnexpectedClosingBracket(BracketKind::Recognizable, 2)]
    );
}

#[test]
fn crossed_brackets_are_rejected() {
    let e = errors("<a[b>c]", Dialect::Plain);

    assert!(e.contains(|k| matches!(k, ParseErrorKind::UnclosedBracket(BracketKind::FromEdition, 2))));
}

#[test]
fn spans_may_cross_lines_only_where_the_dialect_allows() {
    assert!(parse("<fo\no>", Dialect::Plain, OutputKind::Trans).is_ok());

    let e = errors("<fo\no>", Dialect::Anselm);
    assert!(e.contains(|k| matches!(k, ParseErrorKind::UnclosedBracket(BracketKind::Recognizable, 0))));

    assert!(parse("[fo\no]", Dialect::Anselm, OutputKind::Trans).is_ok());
}

#[test]
fn joiner_check_depends_on_output_kind() {
    assert!(parse("a(=)b", Dialect::Anselm, OutputKind::Dipl).is_err());
    assert!(parse("a(=)b", Dialect::Anselm, OutputKind::Anno).is_ok());
    assert!(parse("a=|b", Dialect::Anselm, OutputKind::Trans).is_err());
}

#[test]
fn joiner_may_end_the_token() {
    assert!(parse("ein=", Dialect::Rem, OutputKind::Trans).is_ok());
    assert!(parse("[ein=]", Dialect::Rem, OutputKind::Trans).is_ok());
}

#[test]
fn mid_line_hyphen_policy() {
    assert!(parse("a=b", Dialect::Anselm, OutputKind::Trans).is_ok());

    let config = Dialect::Anselm
        .config()
        .with_mid_line_hyphen(MidLineHyphen::Reject);
    let e = parse_with("a=b", &config, ParseOptions::default()).unwrap_err();
    assert_eq!(
        e.errors,
        vec![ParseErrorKind::JoinerNotAtLineEnd("=".to_owned(), 1)]
    );
}

#[test]
fn multiverbation_followed_by_hyphen() {
    let e = errors("a|=\nb", Dialect::Anselm);

    assert!(e.contains(|k| matches!(k, ParseErrorKind::IllegalTokenizationSequence(_))));
}

#[test]
fn univerbation_line_break_with_multiverbation() {
    let e = errors("a(=)|\nb", Dialect::Anselm);

    assert!(e.contains(|k| matches!(k, ParseErrorKind::IllegalTokenizationSequence(_))));
}

#[test]
fn univerbation_next_to_multiverbation() {
    let e = errors("a#|b", Dialect::Anselm);

    assert_eq!(e.errors, vec![ParseErrorKind::ContradictoryTokenization]);
}

#[test]
fn characters_outside_the_alphabet() {
    let e = errors("gr\u{00fc}n@", Dialect::Anselm);

    assert_eq!(e.errors, vec![ParseErrorKind::InvalidCharacter(vec!['@', 'ü'])]);
}

#[test]
fn dialect_extras_extend_the_alphabet() {
    assert!(parse("°virgo", Dialect::Rem, OutputKind::Trans).is_ok());
    assert!(parse("°virgo", Dialect::Anselm, OutputKind::Trans).is_err());
}

#[test]
fn metadata_markers_pass_the_alphabet_check() {
    assert!(parse("{12}d%e", Dialect::Anselm, OutputKind::Trans).is_ok());
    assert!(parse("\\&3x", Dialect::Anselm, OutputKind::Trans).is_ok());
}

#[test]
fn foreign_marker_needs_text() {
    let e = errors("a*f", Dialect::Anselm);

    assert!(e.contains(|k| matches!(k, ParseErrorKind::DialectRuleViolation(_))));
}

#[test]
fn empty_tokens() {
    let e = errors(" \t\n", Dialect::Plain);
    assert_eq!(e.errors, vec![ParseErrorKind::EmptyParse]);

    let options = ParseOptions::default().allow_empty(true);
    let t = parse_with("  ", &Dialect::Plain.config(), options).unwrap();
    assert!(t.is_empty());
    assert!(t.tokenize_dipl().is_empty());
}

#[test]
fn all_errors_are_joined_in_the_message() {
    let e = errors("a#|b\u{00fc}", Dialect::Anselm);

    assert_eq!(e.errors.len(), 2);
    let message = e.to_string();
    assert!(message.contains("contradict"));
    assert!(message.contains("invalid characters"));
    assert!(message.contains("; "));
}

#[test]
fn majuscule_size_starts_at_one() {
    let e = errors("*{D*0}er", Dialect::Anselm);

    assert!(e.contains(|k| matches!(k, ParseErrorKind::DialectRuleViolation(_))));
    assert!(parse("*{D*1}er", Dialect::Anselm, OutputKind::Trans).is_ok());
}

use std::fs;

use anyhow::Result;

use manuscript_trans::{
    trans_file::{
        import_bytes, import_str,
        markup::{CommentKind, ShiftKind},
        ImportOptions,
    },
    transcription::dialect::Dialect,
};

fn simple_annos(doc: &manuscript_trans::trans_file::document::Document, id: &str) -> Vec<String> {
    doc.token(id)
        .map(|t| t.annos.iter().map(|a| a.simple.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn sample_file() -> Result<()> {
    let txt = fs::read_to_string("./tests/sample.trans.txt")?;
    let doc = import_str(&txt, &ImportOptions::new(Dialect::Anselm))?;

    assert_eq!(doc.header, vec!["Sample transcription", "Ba, fol. 12"]);

    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.pages[0].sigle, "Ba");
    assert_eq!(doc.pages[0].number, 12);
    assert_eq!(doc.columns.len(), 2);
    let names: Vec<&str> = doc.lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Ba-12ra,1", "Ba-12ra,2", "Ba-12ra,3", "Ba-12rb,1"]);
    assert_eq!(doc.lines[3].column, 1);

    let trans: Vec<&str> = doc.tokens.iter().map(|t| t.trans.as_str()).collect();
    assert_eq!(
        trans,
        vec![
            "daz",
            "ist",
            "ein=\nander",
            "*[$we$ter*]",
            "virgo",
            "vnd<.$.>",
            "gr(=)\noz."
        ]
    );

    // a token continued on the next line spans both lines
    let t3 = doc.token("t3").unwrap();
    assert_eq!(t3.lines, 0..2);
    assert_eq!(t3.dipls.len(), 2);
    assert_eq!(t3.dipls[0].id, "t3_d1");
    assert_eq!((t3.dipls[0].line, t3.dipls[1].line), (0, 1));
    assert_eq!(simple_annos(&doc, "t3"), vec!["einander"]);
    assert_eq!(t3.annos[0].id, "t3_m1");

    assert!(doc.token("t4").unwrap().annos.is_empty());
    assert_eq!(simple_annos(&doc, "t6"), vec!["vnd.s."]);
    assert_eq!(simple_annos(&doc, "t7"), vec!["groz", "."]);

    assert_eq!(doc.shift_tags.len(), 1);
    assert_eq!(doc.shift_tags[0].kind, ShiftKind::Foreign);
    assert_eq!(doc.shift_tags[0].first_token, "t5");
    assert_eq!(doc.shift_tags[0].last_token, "t5");

    assert_eq!(doc.comments.len(), 1);
    assert_eq!(doc.comments[0].kind, CommentKind::Comment);
    assert_eq!(doc.comments[0].text, "a comment\nabout the leaf");
    assert_eq!(doc.comments[0].line, Some(1));
    assert_eq!(doc.comments[0].after_token.as_deref(), Some("t5"));

    assert_eq!(doc.errors.len(), 1);
    assert_eq!(doc.errors[0].line, "Ba-12rb,1");
    assert_eq!(doc.errors[0].token, "different(=)text");

    let json = doc.to_json()?;
    assert!(json.contains("\"shift-tags\""));

    Ok(())
}

#[test]
fn shift_tags_over_several_tokens() -> Result<()> {
    let doc = import_str(
        "M-1,1\t+Rhie hebt@R an\nM-1,2\t+T daz buch @T",
        &ImportOptions::new(Dialect::Anselm),
    )?;

    assert_eq!(doc.shift_tags.len(), 2);
    assert_eq!(doc.shift_tags[0].kind, ShiftKind::Rubric);
    assert_eq!(
        (doc.shift_tags[0].first_token.as_str(), doc.shift_tags[0].last_token.as_str()),
        ("t1", "t2")
    );
    assert_eq!(doc.shift_tags[1].kind, ShiftKind::Title);
    assert_eq!(
        (doc.shift_tags[1].first_token.as_str(), doc.shift_tags[1].last_token.as_str()),
        ("t4", "t5")
    );

    Ok(())
}

#[test]
fn single_line_editorial_comment() -> Result<()> {
    let doc = import_str(
        "M-1,1\tdaz\nM-1,2\t+Eleaf damaged@E ist",
        &ImportOptions::new(Dialect::Anselm),
    )?;

    assert_eq!(doc.comments.len(), 1);
    assert_eq!(doc.comments[0].kind, CommentKind::Editorial);
    assert_eq!(doc.comments[0].text, "leaf damaged");
    assert_eq!(doc.comments[0].after_token.as_deref(), Some("t1"));
    assert_eq!(doc.tokens.len(), 2);

    Ok(())
}

#[test]
fn structural_errors_are_fatal() {
    let options = ImportOptions::new(Dialect::Anselm);

    assert!(import_str("M-1,1\tdaz@F", &options).is_err());
    assert!(import_str("M-1,1\t+Fdaz", &options).is_err());
    assert!(import_str("M-1,1\t+F+Fdaz@F@F", &options).is_err());
    assert!(import_str("daz ist", &options).is_err());
    assert!(import_str("+H\nheader only", &options).is_err());
    assert!(import_str("M-1,1\t+K open comment", &options).is_err());
}

#[test]
fn decodes_legacy_encodings() -> Result<()> {
    let options = ImportOptions::from_json(r#"{"dialect": "rem", "encoding": "windows-1252"}"#)?;
    assert_eq!(options.dialect, Dialect::Rem);

    let doc = import_bytes(b"M-1,1\t\xb0virgo", &options)?;
    assert_eq!(doc.tokens.len(), 1);
    assert_eq!(doc.tokens[0].trans, "°virgo");
    assert!(doc.errors.is_empty());

    assert!(import_bytes(b"M-1,1\tx", &ImportOptions::from_json(r#"{"encoding": "klingon"}"#)?).is_err());

    Ok(())
}

#[test]
fn config_override_takes_precedence() -> Result<()> {
    let mut options = ImportOptions::new(Dialect::Anselm);
    options.config = Some(Dialect::Rem.config());

    let doc = import_str("M-1,1\t°virgo", &options)?;
    assert!(doc.errors.is_empty());

    let doc = import_str("M-1,1\t°virgo", &ImportOptions::new(Dialect::Anselm))?;
    assert_eq!(doc.errors.len(), 1);
    assert!(doc.tokens.is_empty());

    Ok(())
}

#[test]
fn shift_tag_closed_on_a_continued_token() -> Result<()> {
    let doc = import_str(
        "M-1,1\tda +Fein=@F\nM-1,2\tander vnd",
        &ImportOptions::new(Dialect::Anselm),
    )?;

    let trans: Vec<&str> = doc.tokens.iter().map(|t| t.trans.as_str()).collect();
    assert_eq!(trans, vec!["da", "ein=\nander", "vnd"]);

    assert_eq!(doc.shift_tags.len(), 1);
    assert_eq!(doc.shift_tags[0].kind, ShiftKind::Foreign);
    assert_eq!(
        (doc.shift_tags[0].first_token.as_str(), doc.shift_tags[0].last_token.as_str()),
        ("t2", "t2")
    );

    Ok(())
}

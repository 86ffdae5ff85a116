pub mod document;
pub mod line_prefix;
pub mod markup;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::{
    trans_file::{
        document::{Document, DocumentBuilder},
        line_prefix::split_line_prefix,
        markup::{CommentKind, HEADER_CLOSE, HEADER_OPEN},
    },
    transcription::dialect::{Dialect, DialectConfig, OutputKind, ParseOptions},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ImportOptions {
    pub dialect: Dialect,
    pub config: Option<DialectConfig>, // overrides the stock settings of `dialect`
    pub encoding: Option<String>,      // encoding_rs label, UTF-8 if unset
}

impl ImportOptions {
    pub fn new(dialect: Dialect) -> Self {
        ImportOptions {
            dialect,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to read import options")
    }

    pub fn dialect_config(&self) -> DialectConfig {
        self.config
            .clone()
            .unwrap_or_else(|| self.dialect.config())
    }
}

/// Decodes a transcription file with the configured encoding and imports it.
pub fn import_bytes(bytes: &[u8], options: &ImportOptions) -> Result<Document> {
    let encoding = match &options.encoding {
        Some(label) => encoding_rs::Encoding::for_label(label.as_bytes())
            .with_context(|| format!("Unknown encoding {:?}", label))?,
        None => encoding_rs::UTF_8,
    };

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!("malformed {} input replaced", encoding.name());
    }

    import_str(&text, options)
}

/// Imports a whole transcription file.
pub fn import_str(text: &str, options: &ImportOptions) -> Result<Document> {
    static REGEX_NEW_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\n|\r").unwrap());

    let mut lines = REGEX_NEW_LINE.split(text).enumerate().peekable();

    // blank lines before the header
    while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}

    let mut header = Vec::new();
    if let Some(&(_, first)) = lines.peek() {
        if let Some(rest) = first.trim_start().strip_prefix(HEADER_OPEN) {
            lines.next();
            let mut line = rest;
            loop {
                if let Some(at) = line.find(HEADER_CLOSE) {
                    if !line[..at].trim().is_empty() {
                        header.push(line[..at].to_owned());
                    }
                    break;
                }
                if !line.trim().is_empty() {
                    header.push(line.to_owned());
                }
                line = lines.next().context("Header is not closed")?.1;
            }
        }
    }

    let mut importer = Importer {
        builder: DocumentBuilder::new(
            options.dialect_config(),
            ParseOptions::new(OutputKind::Trans),
        ),
        comment: None,
    };
    importer.builder.set_header(header);

    for (n, line) in lines {
        importer
            .line(line)
            .with_context(|| format!("Failed to import line {}: {:?}", n + 1, line))?;
    }

    let doc = importer.finish()?;

    info!(
        "imported {} tokens on {} lines ({} skipped)",
        doc.tokens.len(),
        doc.lines.len(),
        doc.errors.len()
    );

    Ok(doc)
}

struct Importer {
    builder: DocumentBuilder,
    comment: Option<(CommentKind, String)>, // open multi-line comment
}

impl Importer {
    fn line(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() && self.comment.is_none() {
            return Ok(());
        }

        let content = match split_line_prefix(line)? {
            Some((prefix, content)) => {
                self.builder.enter_line(prefix);
                content
            }
            None => {
                if self.comment.is_none() && markup::comment_opener(line).is_none() {
                    bail!("Line prefix is missing");
                }
                line
            }
        };

        let rest = self.comments(content);

        let items = rest
            .split_whitespace()
            .map(markup::split_shift_tags)
            .collect::<Vec<_>>();
        let last_token = items.iter().rposition(|item| !item.core.is_empty());

        for (i, item) in items.into_iter().enumerate() {
            self.builder.push_item(item, Some(i) == last_token)?;
        }

        Ok(())
    }

    // Consumes comments at the start of `content` and returns what follows
    fn comments<'a>(&mut self, content: &'a str) -> &'a str {
        let mut rest = content;

        loop {
            if let Some((kind, mut text)) = self.comment.take() {
                match markup::comment_closer(kind, rest) {
                    Some((inner, after)) => {
                        text.push_str(inner);
                        self.builder.add_comment(kind, &text);
                        rest = after;
                    }
                    None => {
                        text.push_str(rest);
                        text.push('\n');
                        self.comment = Some((kind, text));
                        return "";
                    }
                }
            }

            match markup::comment_opener(rest) {
                Some((kind, after)) => {
                    self.comment = Some((kind, String::new()));
                    rest = after;
                }
                None => return rest,
            }
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some((kind, _)) = &self.comment {
            bail!("Comment +{} is not closed", kind.code());
        }
        self.builder.finish()
    }
}

use std::{collections::HashMap, ops::Range};

use anyhow::{bail, ensure, Context, Result};
use log::warn;
use serde::Serialize;

use crate::{
    trans_file::{
        line_prefix::{LinePrefix, Side},
        markup::{self, CommentKind, ShiftKind, TaggedItem},
    },
    transcription::{
        character::CharClass,
        dialect::{DialectConfig, ParseOptions},
        parse_with,
        renderer::Transcription,
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Page {
    pub id: String,
    pub sigle: String,
    pub number: usize,
    pub side: Option<Side>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Column {
    pub id: String,
    pub page: usize,
    pub letter: Option<char>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Line {
    pub id: String,
    pub column: usize,
    pub number: usize,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Subtoken {
    pub id: String,
    pub trans: String,
    pub utf: String,
    pub simple: String,
    pub line: usize, // annotation sub-tokens sit on the first line of their token
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocToken {
    pub id: String,
    pub trans: String,
    pub lines: Range<usize>,
    pub dipls: Vec<Subtoken>,
    pub annos: Vec<Subtoken>,
    pub transcription: Transcription,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub line: Option<usize>,
    pub after_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShiftTag {
    pub kind: ShiftKind,
    pub first_token: String,
    pub last_token: String,
}

// A token that failed to parse and was left out
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocError {
    pub line: String,
    pub token: String,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Document {
    pub header: Vec<String>,
    pub pages: Vec<Page>,
    pub columns: Vec<Column>,
    pub lines: Vec<Line>,
    pub tokens: Vec<DocToken>,
    pub comments: Vec<Comment>,
    pub shift_tags: Vec<ShiftTag>,
    pub errors: Vec<DocError>,
}

impl Document {
    pub fn token(&self, id: &str) -> Option<&DocToken> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize document")
    }
}

// A token whose text continues on the next line
struct Pending {
    text: String,
    first_line: usize,
    closes: Vec<(ShiftKind, usize)>, // tags closed on its first half
}

/// Accumulates a [`Document`] line by line.
pub struct DocumentBuilder {
    config: DialectConfig,
    options: ParseOptions,
    doc: Document,
    prefix: Option<LinePrefix>,
    pending: Option<Pending>,
    shifts: HashMap<ShiftKind, usize>, // open tag -> index of its first token
    token_counter: usize,
}

impl DocumentBuilder {
    pub fn new(config: DialectConfig, options: ParseOptions) -> Self {
        DocumentBuilder {
            config,
            options,
            doc: Document::default(),
            prefix: None,
            pending: None,
            shifts: HashMap::new(),
            token_counter: 0,
        }
    }

    pub fn set_header(&mut self, header: Vec<String>) {
        self.doc.header = header;
    }

    // Creates page, column and line objects where the prefix changes
    pub fn enter_line(&mut self, prefix: LinePrefix) {
        let new_page = match &self.prefix {
            Some(current) => !current.same_page(&prefix),
            None => true,
        };
        let new_column = new_page
            || self
                .prefix
                .as_ref()
                .map_or(true, |current| current.column != prefix.column);
        let new_line = new_column
            || self
                .prefix
                .as_ref()
                .map_or(true, |current| current.line != prefix.line);

        if new_page {
            let id = format!("p{}", self.doc.pages.len() + 1);
            self.doc.pages.push(Page {
                id,
                sigle: prefix.sigle.clone(),
                number: prefix.page,
                side: prefix.side,
            });
        }
        if new_column {
            let id = format!("c{}", self.doc.columns.len() + 1);
            self.doc.columns.push(Column {
                id,
                page: self.doc.pages.len() - 1,
                letter: prefix.column,
            });
        }
        if new_line {
            let id = format!("l{}", self.doc.lines.len() + 1);
            self.doc.lines.push(Line {
                id,
                column: self.doc.columns.len() - 1,
                number: prefix.line,
                name: prefix.to_string(),
            });
        }

        self.prefix = Some(prefix);
    }

    fn current_line(&self) -> Option<usize> {
        self.doc.lines.len().checked_sub(1)
    }

    fn line_name(&self, line: usize) -> String {
        self.doc
            .lines
            .get(line)
            .map_or_else(String::new, |l| l.name.clone())
    }

    pub fn add_comment(&mut self, kind: CommentKind, text: &str) {
        self.doc.comments.push(Comment {
            kind,
            text: text.trim().to_owned(),
            line: self.current_line(),
            after_token: self.doc.tokens.last().map(|t| t.id.clone()),
        });
    }

    /// Adds one whitespace-separated item of line content.
    ///
    /// `last_on_line` allows a token ending with a joiner to be continued by
    /// the first token of the next content line.
    pub fn push_item(&mut self, item: TaggedItem, last_on_line: bool) -> Result<()> {
        for kind in item.opens {
            ensure!(
                !self.shifts.contains_key(&kind),
                "Nested shift tag +{}",
                kind.code()
            );
            self.shifts.insert(kind, self.doc.tokens.len());
        }

        if !item.core.is_empty() {
            self.push_token(item.core, last_on_line)?;
        }

        for kind in item.closes {
            let first = match self.shifts.remove(&kind) {
                Some(first) => first,
                None => bail!("Closing shift tag @{} without opening tag", kind.code()),
            };
            match self.pending.as_mut() {
                Some(pending) => pending.closes.push((kind, first)),
                None => self.close_shift(kind, first),
            }
        }

        Ok(())
    }

    fn push_token(&mut self, core: &str, last_on_line: bool) -> Result<()> {
        let line = self
            .current_line()
            .context("Token appears before the first line prefix")?;

        let pending = match self.pending.take() {
            Some(pending) => Pending {
                text: format!("{}\n{}", pending.text, core),
                ..pending
            },
            None => Pending {
                text: core.to_owned(),
                first_line: line,
                closes: Vec::new(),
            },
        };

        if last_on_line && markup::continues_on_next_line(&pending.text) {
            self.pending = Some(pending);
            return Ok(());
        }

        self.finish_pending(pending);
        Ok(())
    }

    fn finish_pending(&mut self, pending: Pending) {
        self.finish_token(pending.text, pending.first_line);
        for (kind, first) in pending.closes {
            self.close_shift(kind, first);
        }
    }

    fn finish_token(&mut self, text: String, first_line: usize) {
        let last_line = self.current_line().unwrap_or(first_line);

        let transcription = match parse_with(&text, &self.config, self.options) {
            Ok(transcription) => transcription,
            Err(e) => {
                let line = self.line_name(first_line);
                warn!("{}: skipped token: {}", line, e);
                self.doc.errors.push(DocError {
                    line,
                    token: text,
                    message: e.to_string(),
                });
                return;
            }
        };

        self.token_counter += 1;
        let id = format!("t{}", self.token_counter);

        let chars = transcription.chars();
        let dipls = transcription
            .tokenize_dipl()
            .iter()
            .enumerate()
            .map(|(k, dipl)| {
                let breaks = chars[..dipl.range().start]
                    .iter()
                    .filter(|c| matches!(c.class, CharClass::LineBreak))
                    .count();
                Subtoken {
                    id: format!("{}_d{}", id, k + 1),
                    trans: dipl.trans(),
                    utf: dipl.utf(),
                    simple: dipl.simple(),
                    line: (first_line + breaks).min(last_line),
                }
            })
            .collect();
        let annos = transcription
            .tokenize_anno()
            .iter()
            .enumerate()
            .map(|(k, anno)| Subtoken {
                id: format!("{}_m{}", id, k + 1),
                trans: anno.trans(),
                utf: anno.utf(),
                simple: anno.simple(),
                line: first_line,
            })
            .collect();

        self.doc.tokens.push(DocToken {
            id,
            trans: text,
            lines: first_line..last_line + 1,
            dipls,
            annos,
            transcription,
        });
    }

    fn close_shift(&mut self, kind: ShiftKind, first: usize) {
        let (first_token, last_token) = match (self.doc.tokens.get(first), self.doc.tokens.last()) {
            (Some(first), Some(last)) => (first.id.clone(), last.id.clone()),
            _ => {
                warn!("shift tag +{} encloses no token", kind.code());
                return;
            }
        };

        self.doc.shift_tags.push(ShiftTag {
            kind,
            first_token,
            last_token,
        });
    }

    pub fn finish(mut self) -> Result<Document> {
        if let Some(pending) = self.pending.take() {
            self.finish_pending(pending);
        }

        if let Some(kind) = self.shifts.keys().next() {
            bail!("Unclosed shift tag +{}", kind.code());
        }

        Ok(self.doc)
    }
}

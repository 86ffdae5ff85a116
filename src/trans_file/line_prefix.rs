use std::fmt;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utility::str::parse_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Recto,
    Verso,
}

impl Side {
    pub fn code(self) -> char {
        match self {
            Side::Recto => 'r',
            Side::Verso => 'v',
        }
    }
}

/// Location of a manuscript line, e.g. `Ba-12ra,3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinePrefix {
    pub sigle: String,
    pub page: usize,
    pub side: Option<Side>,
    pub column: Option<char>,
    pub line: usize,
}

impl LinePrefix {
    // Same page, side and manuscript
    pub fn same_page(&self, other: &LinePrefix) -> bool {
        self.sigle == other.sigle && self.page == other.page && self.side == other.side
    }

    pub fn page_name(&self) -> String {
        let mut name = self.page.to_string();
        if let Some(side) = self.side {
            name.push(side.code());
        }
        name
    }
}

impl fmt::Display for LinePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.sigle, self.page_name())?;
        if let Some(column) = self.column {
            write!(f, "{}", column)?;
        }
        write!(f, ",{}", self.line)
    }
}

// SIGLE-PAGE{r|v}{col},LINE<TAB>CONTENT
static REGEX_LINE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^\s,]+?)-([0-9]+)([rv])?([a-z])?,([0-9]+)\t(.*)$").unwrap()
});

/// Splits a content line into its prefix and content.
///
/// Returns `Ok(None)` when the line carries no prefix at all.
pub fn split_line_prefix(line: &str) -> Result<Option<(LinePrefix, &str)>> {
    let caps = match REGEX_LINE_PREFIX.captures(line) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let group = |i: usize| caps.get(i).map(|m| m.as_str());

    let sigle = group(1).context("Sigle is missing")?.to_owned();
    let page = parse_number(group(2).context("Page is missing")?)
        .with_context(|| format!("Failed to parse page number in {:?}", line))?;
    let side = match group(3) {
        Some("r") => Some(Side::Recto),
        Some("v") => Some(Side::Verso),
        _ => None,
    };
    let column = group(4).and_then(|c| c.chars().next());
    let line_number = parse_number(group(5).context("Line number is missing")?)
        .with_context(|| format!("Failed to parse line number in {:?}", line))?;
    let content = caps.get(6).map_or("", |m| m.as_str());

    Ok(Some((
        LinePrefix {
            sigle,
            page,
            side,
            column,
            line: line_number,
        },
        content,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_prefix() {
        let (prefix, content) = split_line_prefix("Ba-12ra,3\tdaz ist ein=")
            .unwrap()
            .unwrap();

        assert_eq!(prefix.sigle, "Ba");
        assert_eq!(prefix.page, 12);
        assert_eq!(prefix.side, Some(Side::Recto));
        assert_eq!(prefix.column, Some('a'));
        assert_eq!(prefix.line, 3);
        assert_eq!(content, "daz ist ein=");
        assert_eq!(prefix.to_string(), "Ba-12ra,3");
    }

    #[test]
    fn side_and_column_are_optional() {
        let (prefix, _) = split_line_prefix("M-3,10\tx").unwrap().unwrap();
        assert_eq!(prefix.side, None);
        assert_eq!(prefix.column, None);
        assert_eq!(prefix.to_string(), "M-3,10");

        let (prefix, _) = split_line_prefix("M-3b,1\tx").unwrap().unwrap();
        assert_eq!(prefix.side, None);
        assert_eq!(prefix.column, Some('b'));

        let (prefix, _) = split_line_prefix("M-3v,1\tx").unwrap().unwrap();
        assert_eq!(prefix.side, Some(Side::Verso));
        assert_eq!(prefix.column, None);
    }

    #[test]
    fn sigle_may_contain_hyphens() {
        let (prefix, _) = split_line_prefix("Wo-2-7v,4\tx").unwrap().unwrap();
        assert_eq!(prefix.sigle, "Wo-2");
        assert_eq!(prefix.page, 7);
    }

    #[test]
    fn lines_without_prefix() {
        assert!(split_line_prefix("+K a comment @K").unwrap().is_none());
        assert!(split_line_prefix("Ba-12ra,3 no tab").unwrap().is_none());
    }

    #[test]
    fn oversized_page_number_is_an_error() {
        assert!(split_line_prefix("Ba-99999999999999999999999,1\tx").is_err());
    }
}

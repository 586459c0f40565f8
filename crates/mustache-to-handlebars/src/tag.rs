/*
 * tag.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Control-tag syntax and the tag scanner.
//!
//! A control tag opens or closes a block:
//!
//! ```text
//! {{#name}}   open (if / each / with, decided by classification)
//! {{^name}}   open negated (always unless)
//! {{/name}}   close the innermost open block
//! ```
//!
//! Everything else between `{{` and `}}` is a variable tag.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::error::{ConvertError, ConvertResult};

/// Trim marker placed just inside a tag's delimiters.
pub const TRIM_MARKER: char = '~';

/// Keyword emitted for open tags whose kind could not be resolved.
pub const UNRESOLVED_KEYWORD: &str = "ifOrEachOrWith";

/// Regex pattern for control tags.
///
/// Groups:
/// 1. optional leading trim marker
/// 2. control character
/// 3. body, up to the first `}}` on the same line
/// 4. optional trailing trim marker
pub(crate) static CONTROL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(~?)([#^/])(.*?)(~?)\}\}").expect("Invalid regex pattern for control tags")
});

/// Regex pattern for variable tags: `{{name}}` or `{{{name}}}`.
///
/// Groups:
/// 1. opening delimiter, including an optional trim marker
/// 2. name (never starting with a control, comment or partial character)
/// 3. closing delimiter, including an optional trim marker
pub(crate) static VARIABLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\{\{\{?~?)([^{}#^/~!>][^{}]*?)(~?\}?\}\})")
        .expect("Invalid regex pattern for variable tags")
});

/// The character that follows `{{` in a control tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlChar {
    /// `#`: opens an if, each or with block.
    Open,
    /// `^`: opens an unless block.
    Negated,
    /// `/`: closes the innermost open block.
    Close,
}

impl ControlChar {
    pub fn as_char(self) -> char {
        match self {
            ControlChar::Open => '#',
            ControlChar::Negated => '^',
            ControlChar::Close => '/',
        }
    }

    pub fn is_opening(self) -> bool {
        !matches!(self, ControlChar::Close)
    }
}

impl TryFrom<char> for ControlChar {
    type Error = char;

    fn try_from(c: char) -> Result<Self, char> {
        match c {
            '#' => Ok(ControlChar::Open),
            '^' => Ok(ControlChar::Negated),
            '/' => Ok(ControlChar::Close),
            other => Err(other),
        }
    }
}

/// The semantic role of a control tag once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticKind {
    If,
    Each,
    With,
    Unless,
    Close,
    /// An open tag whose name is in no classification set.
    Unresolved,
}

impl SemanticKind {
    /// Keyword written after `#` in the target syntax. `None` for closers.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            SemanticKind::If => Some("if"),
            SemanticKind::Each => Some("each"),
            SemanticKind::With => Some("with"),
            SemanticKind::Unless => Some("unless"),
            SemanticKind::Unresolved => Some(UNRESOLVED_KEYWORD),
            SemanticKind::Close => None,
        }
    }

    /// Parse a target-syntax keyword. The placeholder keyword is not accepted,
    /// since a placeholder must be resolved again.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(SemanticKind::If),
            "each" => Some(SemanticKind::Each),
            "with" => Some(SemanticKind::With),
            "unless" => Some(SemanticKind::Unless),
            _ => None,
        }
    }
}

/// Trim markers present on (or to be written to) a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimMarkers {
    /// Marker right after `{{`.
    pub open: bool,
    /// Marker right before `}}`.
    pub close: bool,
}

impl TrimMarkers {
    /// Wrap `inner` in `{{ }}` with these markers.
    pub fn render(self, inner: &str) -> String {
        let mut tag = String::with_capacity(inner.len() + 6);
        tag.push_str("{{");
        if self.open {
            tag.push(TRIM_MARKER);
        }
        tag.push_str(inner);
        if self.close {
            tag.push(TRIM_MARKER);
        }
        tag.push_str("}}");
        tag
    }
}

/// A single control tag split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTag<'a> {
    pub trim: TrimMarkers,
    pub control: ControlChar,
    pub body: &'a str,
}

impl<'a> ControlTag<'a> {
    /// Split a string that is exactly one control tag.
    pub fn parse(tag: &'a str) -> ConvertResult<Self> {
        let caps = CONTROL_TAG
            .captures(tag)
            .filter(|caps| caps.get(0).is_some_and(|m| m.as_str() == tag))
            .ok_or_else(|| ConvertError::UnknownControlChar {
                found: tag.chars().nth(2).unwrap_or_default(),
                tag: tag.to_string(),
            })?;

        let control_str = caps.get(2).map_or("", |m| m.as_str());
        let found = control_str.chars().next().unwrap_or_default();
        let control =
            ControlChar::try_from(found).map_err(|found| ConvertError::UnknownControlChar {
                found,
                tag: tag.to_string(),
            })?;

        Ok(Self {
            trim: TrimMarkers {
                open: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
                close: caps.get(4).is_some_and(|m| !m.as_str().is_empty()),
            },
            control,
            body: caps.get(3).map_or("", |m| m.as_str()),
        })
    }
}

/// A control tag found at a byte offset of the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Collect the distinct control tags present in `text`.
pub fn distinct_control_tags(text: &str) -> BTreeSet<&str> {
    CONTROL_TAG.find_iter(text).map(|m| m.as_str()).collect()
}

/// Locate every occurrence of the candidate tags, left to right.
///
/// Every `{{` position is tested against every candidate. A candidate that
/// starts inside a span already claimed by an earlier match is ignored, so the
/// returned matches never overlap.
pub fn locate_control_tags<'a>(text: &'a str, candidates: &BTreeSet<&str>) -> Vec<TagMatch<'a>> {
    let mut found = Vec::new();
    if candidates.is_empty() {
        return found;
    }

    let mut claimed_until = 0;
    for (offset, pair) in text.as_bytes().windows(2).enumerate() {
        if offset < claimed_until || pair != b"{{" {
            continue;
        }
        let rest = &text[offset..];
        if let Some(candidate) = candidates.iter().find(|c| rest.starts_with(**c)) {
            let end = offset + candidate.len();
            found.push(TagMatch {
                offset,
                text: &text[offset..end],
            });
            claimed_until = end;
        }
    }

    found
}

/// Convert a byte offset to a 1-based (line, column) pair.
pub(crate) fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
    (line, before[line_start..].chars().count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_tags_are_deduplicated() {
        let tags = distinct_control_tags("{{#a}}x{{/a}} {{#a}}y{{/a}} {{^b}}{{/b}}");
        let expected: BTreeSet<&str> = ["{{#a}}", "{{/a}}", "{{^b}}", "{{/b}}"].into();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_variable_tags_are_not_control_tags() {
        assert!(distinct_control_tags("{{name}} {{{raw}}} {{! comment }}").is_empty());
    }

    #[test]
    fn test_control_tag_does_not_cross_lines() {
        assert!(distinct_control_tags("{{#a\n}}").is_empty());
    }

    #[test]
    fn test_locate_reports_every_occurrence_in_order() {
        let text = "{{#a}}{{#a}}{{/a}}{{/a}}";
        let candidates = distinct_control_tags(text);
        let offsets: Vec<usize> = locate_control_tags(text, &candidates)
            .iter()
            .map(|m| m.offset)
            .collect();
        assert_eq!(offsets, vec![0, 6, 12, 18]);
    }

    #[test]
    fn test_locate_handles_extra_braces() {
        let text = "{{{#a}}";
        let candidates = distinct_control_tags(text);
        let found = locate_control_tags(text, &candidates);
        assert_eq!(
            found,
            vec![TagMatch {
                offset: 1,
                text: "{{#a}}"
            }]
        );
    }

    #[test]
    fn test_locate_ignores_tags_inside_claimed_span() {
        let text = "{{#a{{/b}}";
        let candidates: BTreeSet<&str> = ["{{#a{{/b}}", "{{/b}}"].into();
        let found = locate_control_tags(text, &candidates);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].offset, 0);
    }

    #[test]
    fn test_parse_control_tag_parts() {
        let tag = ControlTag::parse("{{~#each items~}}").unwrap();
        assert_eq!(tag.control, ControlChar::Open);
        assert_eq!(tag.body, "each items");
        assert_eq!(
            tag.trim,
            TrimMarkers {
                open: true,
                close: true
            }
        );

        let tag = ControlTag::parse("{{^flag}}").unwrap();
        assert_eq!(tag.control, ControlChar::Negated);
        assert_eq!(tag.trim, TrimMarkers::default());
    }

    #[test]
    fn test_parse_rejects_non_control_tag() {
        let err = ControlTag::parse("{{name}}").unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownControlChar {
                found: 'n',
                tag: "{{name}}".to_string()
            }
        );
    }

    #[test]
    fn test_control_char_round_trip() {
        for c in ['#', '^', '/'] {
            assert_eq!(ControlChar::try_from(c).unwrap().as_char(), c);
        }
        assert_eq!(ControlChar::try_from('&'), Err('&'));
    }

    #[test]
    fn test_render_with_markers() {
        let trim = TrimMarkers {
            open: true,
            close: false,
        };
        assert_eq!(trim.render("/if"), "{{~/if}}");
    }

    #[test]
    fn test_line_column() {
        let text = "ab\ncd{{/x}}";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 5), (2, 3));
    }
}

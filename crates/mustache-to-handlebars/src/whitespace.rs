/*
 * whitespace.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Whitespace-control markers for standalone control tags.
//!
//! Mustache drops the line of a control tag that stands alone on it.
//! Handlebars only does that when asked to with `~`, so lines holding a
//! single control tag get markers according to a [`WhitespacePolicy`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::tag::{CONTROL_TAG, TRIM_MARKER, VARIABLE_TAG};

/// Where to insert trim markers on standalone control tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhitespacePolicy {
    /// `{{~#if x}}`
    pub before_open: bool,
    /// `{{#if x~}}`
    pub after_open: bool,
    /// `{{~/if}}`
    pub before_close: bool,
    /// `{{/if~}}`
    pub after_close: bool,
}

impl WhitespacePolicy {
    pub fn is_noop(&self) -> bool {
        !(self.before_open || self.after_open || self.before_close || self.after_close)
    }
}

/// Insert trim markers into every line that holds exactly one control tag,
/// no variable tag, and nothing else but whitespace.
pub fn annotate(text: &str, policy: WhitespacePolicy) -> String {
    if policy.is_noop() {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| annotate_line(line, policy))
        .collect::<Vec<_>>()
        .join("\n")
}

fn annotate_line(line: &str, policy: WhitespacePolicy) -> Cow<'_, str> {
    let mut tags = CONTROL_TAG.captures_iter(line);
    let (Some(caps), None) = (tags.next(), tags.next()) else {
        return Cow::Borrowed(line);
    };
    if VARIABLE_TAG.is_match(line) {
        return Cow::Borrowed(line);
    }
    let Some(whole) = caps.get(0) else {
        return Cow::Borrowed(line);
    };
    if !line[..whole.start()].trim().is_empty() || !line[whole.end()..].trim().is_empty() {
        return Cow::Borrowed(line);
    }

    let (before, after) = if &caps[2] == "/" {
        (policy.before_close, policy.after_close)
    } else {
        (policy.before_open, policy.after_open)
    };
    // Markers already present are kept as they are.
    let before = before && caps[1].is_empty();
    let after = after && caps[4].is_empty();
    if !before && !after {
        return Cow::Borrowed(line);
    }

    let mut annotated = line.to_string();
    if after {
        annotated.insert(whole.end() - 2, TRIM_MARKER);
    }
    if before {
        annotated.insert(whole.start() + 2, TRIM_MARKER);
    }
    Cow::Owned(annotated)
}

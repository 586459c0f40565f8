/*
 * variables.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rewriting of variable references.
//!
//! ```text
//! {{-first}}          ->  {{@first}}
//! {{list.0.name}}     ->  {{list.[0].name}}
//! ```

use regex::Captures;
use std::collections::HashMap;

use crate::tag::VARIABLE_TAG;

/// Mustache names with a different spelling in Handlebars.
const ALIASES: &[(&str, &str)] = &[("-first", "@first"), ("-last", "@last")];

/// Handlebars spelling of a Mustache alias, if `name` is one.
pub fn alias(name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

/// Rewrites variable names, remembering every rewrite it has computed.
///
/// The cache is owned by the rewriter, so each conversion can carry its own
/// without sharing state between threads.
#[derive(Debug, Default)]
pub struct PathRewriter {
    cache: HashMap<String, String>,
}

impl PathRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlebars form of `name`, or `None` if it needs no change.
    pub fn rewrite_name(&mut self, name: &str) -> Option<String> {
        if let Some(target) = self.cache.get(name) {
            return Some(target.clone());
        }

        let target = match alias(name) {
            Some(target) => target.to_string(),
            None => bracket_numeric_segments(name)?,
        };
        self.cache.insert(name.to_string(), target.clone());
        Some(target)
    }

    /// Rewrite the name of every variable tag in `text`. Control tags are untouched.
    pub fn rewrite_variables(&mut self, text: &str) -> String {
        VARIABLE_TAG
            .replace_all(text, |caps: &Captures| {
                let name = &caps[2];
                let trimmed = name.trim();
                match self.rewrite_name(trimmed) {
                    Some(target) => format!(
                        "{}{}{}",
                        &caps[1],
                        name.replacen(trimmed, &target, 1),
                        &caps[3]
                    ),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Number of distinct names rewritten so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Wrap every all-digit path segment in brackets: `a.0.b` becomes `a.[0].b`.
fn bracket_numeric_segments(name: &str) -> Option<String> {
    let is_index = |segment: &str| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if !name.split('.').any(is_index) {
        return None;
    }

    let segments: Vec<String> = name
        .split('.')
        .map(|segment| {
            if is_index(segment) {
                format!("[{}]", segment)
            } else {
                segment.to_string()
            }
        })
        .collect();
    Some(segments.join("."))
}

/*
 * classify.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolution of a control tag's semantic kind.
//!
//! Mustache uses `{{#name}}` for conditionals, loops and context blocks alike.
//! Handlebars needs to know which one it is, so the caller supplies three sets
//! of names and every `#` tag is looked up in them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::tag::{ControlChar, SemanticKind, UNRESOLVED_KEYWORD};
use crate::variables::alias;

/// Names known to be boolean tests, list iterations and context blocks.
///
/// A name should appear in at most one set. When it appears in several, the
/// first set in the order if, each, with wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSets {
    #[serde(rename = "if", default)]
    pub if_names: HashSet<String>,
    #[serde(rename = "each", default)]
    pub each_names: HashSet<String>,
    #[serde(rename = "with", default)]
    pub with_names: HashSet<String>,
}

impl ClassificationSets {
    pub fn new<I, E, W>(if_names: I, each_names: E, with_names: W) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            if_names: if_names.into_iter().map(Into::into).collect(),
            each_names: each_names.into_iter().map(Into::into).collect(),
            with_names: with_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add every name of `other` to the matching set.
    pub fn extend(&mut self, other: ClassificationSets) {
        self.if_names.extend(other.if_names);
        self.each_names.extend(other.each_names);
        self.with_names.extend(other.with_names);
    }

    /// Names that appear in more than one set.
    pub fn duplicates(&self) -> BTreeSet<&str> {
        let sets = [&self.if_names, &self.each_names, &self.with_names];
        sets.into_iter()
            .flat_map(|set| set.iter())
            .filter(|name| sets.iter().filter(|set| set.contains(*name)).count() > 1)
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.if_names.is_empty() && self.each_names.is_empty() && self.with_names.is_empty()
    }
}

/// Decide the kind of a control tag from its control character and name.
pub fn resolve(control: ControlChar, name: &str, sets: &ClassificationSets) -> SemanticKind {
    match control {
        ControlChar::Negated => SemanticKind::Unless,
        ControlChar::Close => SemanticKind::Close,
        ControlChar::Open => {
            if sets.if_names.contains(name) {
                SemanticKind::If
            } else if sets.each_names.contains(name) {
                SemanticKind::Each
            } else if sets.with_names.contains(name) {
                SemanticKind::With
            } else {
                SemanticKind::Unresolved
            }
        }
    }
}

/// The body of a control tag with aliases applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBody {
    /// Kind fixed by the body itself, without consulting the sets.
    pub explicit: Option<SemanticKind>,
    pub name: String,
}

impl TagBody {
    /// Interpret a control tag's body.
    ///
    /// Aliases (`-first`, `-last`) are always boolean tests. Open tags already
    /// written with a target keyword (`#if x`, `#each x`, ...) keep that
    /// keyword; a placeholder `#ifOrEachOrWith x` is resolved again.
    pub fn parse(control: ControlChar, body: &str) -> Self {
        let body = body.trim();
        let mut explicit = None;
        let mut name = body;

        if control == ControlChar::Open {
            if let Some((keyword, rest)) = body.split_once(char::is_whitespace) {
                let rest = rest.trim_start();
                if !rest.is_empty() {
                    if let Some(kind) = SemanticKind::from_keyword(keyword) {
                        explicit = Some(kind);
                        name = rest;
                    } else if keyword == UNRESOLVED_KEYWORD {
                        name = rest;
                    }
                }
            }
        }

        match alias(name) {
            Some(target) => {
                let kind = match control {
                    ControlChar::Open => Some(explicit.unwrap_or(SemanticKind::If)),
                    ControlChar::Negated => Some(SemanticKind::Unless),
                    ControlChar::Close => None,
                };
                Self {
                    explicit: kind,
                    name: target.to_string(),
                }
            }
            None => Self {
                explicit,
                name: name.to_string(),
            },
        }
    }

    /// Kind of the tag: explicit if the body fixes it, otherwise by lookup.
    pub fn kind(&self, control: ControlChar, sets: &ClassificationSets) -> SemanticKind {
        match control {
            ControlChar::Close => SemanticKind::Close,
            _ => self
                .explicit
                .unwrap_or_else(|| resolve(control, &self.name, sets)),
        }
    }

    /// Whether a close tag's name is a bare target keyword (`/if`, `/each`, ...).
    pub fn is_keyword(&self) -> bool {
        SemanticKind::from_keyword(&self.name).is_some() || self.name == UNRESOLVED_KEYWORD
    }
}

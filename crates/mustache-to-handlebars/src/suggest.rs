/*
 * suggest.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Guesses for classifying ambiguous tag names.
//!
//! These are hints for a human filling in a config file. They are never fed
//! back into a conversion.

use serde::Serialize;
use std::collections::BTreeSet;

const BOOLEAN_PREFIXES: &[&str] = &["is", "has", "use"];

/// Ambiguous names bucketed by naming convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    #[serde(rename = "if")]
    pub if_names: BTreeSet<String>,
    #[serde(rename = "each")]
    pub each_names: BTreeSet<String>,
    #[serde(rename = "with")]
    pub with_names: BTreeSet<String>,
}

impl Suggestions {
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut suggestions = Self::default();
        for name in names {
            let bucket = if looks_boolean(name) {
                &mut suggestions.if_names
            } else if name.ends_with('s') {
                &mut suggestions.each_names
            } else {
                &mut suggestions.with_names
            };
            bucket.insert(name.to_string());
        }
        suggestions
    }

    pub fn is_empty(&self) -> bool {
        self.if_names.is_empty() && self.each_names.is_empty() && self.with_names.is_empty()
    }

    /// Render as a config fragment that can be pasted into a config file.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// `isActive`, `has_items`, `use-cache`: a known prefix followed by a word boundary.
fn looks_boolean(name: &str) -> bool {
    BOOLEAN_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix).is_some_and(|rest| {
            rest.chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-')
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        let suggestions =
            Suggestions::from_names(["isActive", "has_children", "useCache", "items", "person"]);
        assert_eq!(
            suggestions.if_names,
            BTreeSet::from([
                "has_children".to_string(),
                "isActive".to_string(),
                "useCache".to_string()
            ])
        );
        assert_eq!(suggestions.each_names, BTreeSet::from(["items".to_string()]));
        assert_eq!(suggestions.with_names, BTreeSet::from(["person".to_string()]));
    }

    #[test]
    fn test_prefix_needs_word_boundary() {
        let suggestions = Suggestions::from_names(["issues", "user", "hash"]);
        assert!(suggestions.if_names.is_empty());
        assert!(suggestions.each_names.contains("issues"));
        assert!(suggestions.with_names.contains("user"));
        assert!(suggestions.with_names.contains("hash"));
    }

    #[test]
    fn test_toml_fragment() {
        let suggestions = Suggestions::from_names(["isOpen", "rows"]);
        let fragment = suggestions.to_toml().unwrap();
        assert!(fragment.contains("if = [\"isOpen\"]"));
        assert!(fragment.contains("each = [\"rows\"]"));
        assert!(fragment.contains("with = []"));
    }
}

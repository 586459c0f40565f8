/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion of Mustache templates to Handlebars.
//!
//! Mustache opens every block with `{{#name}}` and closes it with
//! `{{/name}}`; whether the block is a conditional, a loop or a context
//! switch depends on the data at render time. Handlebars spells the kind out:
//!
//! ```text
//! {{#isActive}}...{{/isActive}}   ->  {{#if isActive}}...{{/if}}
//! {{#items}}...{{/items}}         ->  {{#each items}}...{{/each}}
//! {{#person}}...{{/person}}       ->  {{#with person}}...{{/with}}
//! {{^isActive}}...{{/isActive}}   ->  {{#unless isActive}}...{{/unless}}
//! {{list.0.name}}                 ->  {{list.[0].name}}
//! ```
//!
//! The kind of each `#` block is looked up in caller-supplied
//! [`ClassificationSets`]. Names found in none of them are reported as
//! ambiguous and written with the `ifOrEachOrWith` placeholder keyword.
//!
//! # Example
//!
//! ```
//! use mustache_to_handlebars::{ClassificationSets, WhitespacePolicy, convert};
//!
//! let sets = ClassificationSets::new(["isActive"], ["items"], Vec::<String>::new());
//! let result = convert("{{#items}}{{#isActive}}x{{/isActive}}{{/items}}", &sets, WhitespacePolicy::default())?;
//! assert_eq!(result.text, "{{#each items}}{{#if isActive}}x{{/if}}{{/each}}");
//! assert!(result.ambiguous.is_empty());
//! # Ok::<(), mustache_to_handlebars::ConvertError>(())
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod suggest;
pub mod tag;
pub mod utils;
pub mod variables;
pub mod whitespace;

pub use classify::{ClassificationSets, resolve};
pub use config::{ConfigError, ConverterConfig};
pub use engine::{CloserStack, Conversion, PendingReplacement, convert};
pub use error::ConvertError;
pub use suggest::Suggestions;
pub use tag::{ControlChar, SemanticKind};
pub use variables::PathRewriter;
pub use whitespace::{WhitespacePolicy, annotate};

/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The rewrite engine.
//!
//! A conversion runs in four passes over one template:
//!
//! 1. variable tags are rewritten ([`PathRewriter`]);
//! 2. control tags are located and each one is resolved to a kind, producing a
//!    list of [`PendingReplacement`]s while a [`CloserStack`] tracks which
//!    closer every open block needs;
//! 3. replacements are spliced in from the end of the text backwards;
//! 4. standalone control tags get trim markers ([`annotate`]).

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::classify::{ClassificationSets, TagBody};
use crate::error::{ConvertError, ConvertResult};
use crate::tag::{
    ControlTag, SemanticKind, TrimMarkers, distinct_control_tags, line_column,
    locate_control_tags,
};
use crate::variables::PathRewriter;
use crate::whitespace::{WhitespacePolicy, annotate};

/// Output of a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    /// Names of open tags whose kind could not be resolved.
    pub ambiguous: BTreeSet<String>,
}

impl Conversion {
    /// Whether every control tag was resolved.
    pub fn is_complete(&self) -> bool {
        self.ambiguous.is_empty()
    }
}

/// A splice to apply to the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReplacement {
    pub offset: usize,
    pub len: usize,
    pub original: String,
    pub replacement: String,
}

/// A block opened by a control tag and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    pub kind: SemanticKind,
    pub name: String,
    pub offset: usize,
}

impl OpenBlock {
    /// The opening tag in Handlebars syntax.
    pub fn opener(&self, trim: TrimMarkers) -> String {
        let keyword = self.kind.keyword().unwrap_or_default();
        trim.render(&format!("#{} {}", keyword, self.name))
    }

    /// The closing tag matching this block.
    pub fn closer(&self, trim: TrimMarkers) -> String {
        let keyword = self.kind.keyword().unwrap_or_default();
        trim.render(&format!("/{}", keyword))
    }
}

/// Last-in, first-out stack of open blocks.
///
/// Its depth at any point equals the nesting depth of the text scanned so far.
#[derive(Debug, Default)]
pub struct CloserStack {
    blocks: Vec<OpenBlock>,
}

impl CloserStack {
    pub fn push(&mut self, block: OpenBlock) {
        self.blocks.push(block);
    }

    /// Pop the innermost block. `None` means there was nothing to close.
    pub fn pop(&mut self) -> Option<OpenBlock> {
        self.blocks.pop()
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenBlock> {
        self.blocks.iter()
    }
}

/// Convert a Mustache template to Handlebars.
///
/// Unresolved tags do not fail the conversion: they are written with a
/// placeholder keyword and listed in [`Conversion::ambiguous`]. A closing tag
/// with no open block is an error.
pub fn convert(
    text: &str,
    sets: &ClassificationSets,
    policy: WhitespacePolicy,
) -> ConvertResult<Conversion> {
    let mut paths = PathRewriter::new();
    let text = paths.rewrite_variables(text);

    let candidates = distinct_control_tags(&text);
    if candidates.is_empty() {
        return Ok(Conversion {
            text,
            ambiguous: BTreeSet::new(),
        });
    }

    let mut ambiguous = BTreeSet::new();
    let mut stack = CloserStack::default();
    let mut pending = Vec::new();

    for found in locate_control_tags(&text, &candidates) {
        let tag = ControlTag::parse(found.text)?;
        let body = TagBody::parse(tag.control, tag.body);
        let kind = body.kind(tag.control, sets);

        let replacement = match kind {
            SemanticKind::Close => {
                let block = stack.pop().ok_or_else(|| {
                    let (line, column) = line_column(&text, found.offset);
                    ConvertError::UnbalancedCloser {
                        tag: found.text.to_string(),
                        line,
                        column,
                    }
                })?;
                if !body.name.is_empty() && !body.is_keyword() && body.name != block.name {
                    let (line, column) = line_column(&text, found.offset);
                    warn!(
                        line,
                        column,
                        opened = %block.name,
                        closed = %body.name,
                        "Closing tag name does not match the open block"
                    );
                }
                block.closer(tag.trim)
            }
            SemanticKind::If
            | SemanticKind::Each
            | SemanticKind::With
            | SemanticKind::Unless
            | SemanticKind::Unresolved => {
                if kind == SemanticKind::Unresolved {
                    ambiguous.insert(body.name.clone());
                }
                let block = OpenBlock {
                    kind,
                    name: body.name,
                    offset: found.offset,
                };
                let opener = block.opener(tag.trim);
                stack.push(block);
                opener
            }
        };

        debug!(offset = found.offset, tag = found.text, ?kind, %replacement, "Resolved control tag");
        pending.push(PendingReplacement {
            offset: found.offset,
            len: found.text.len(),
            original: found.text.to_string(),
            replacement,
        });
    }

    for block in stack.iter() {
        let (line, column) = line_column(&text, block.offset);
        warn!(line, column, name = %block.name, "Block is never closed");
    }

    let rewritten = apply_replacements(&text, pending);
    Ok(Conversion {
        text: annotate(&rewritten, policy),
        ambiguous,
    })
}

/// Apply replacements from the highest offset down so that earlier offsets stay valid.
pub fn apply_replacements(text: &str, mut pending: Vec<PendingReplacement>) -> String {
    pending.sort_by_key(|r| std::cmp::Reverse(r.offset));

    let mut result = text.to_string();
    for replacement in pending {
        let range = replacement.offset..replacement.offset + replacement.len;
        debug_assert_eq!(&text[range.clone()], replacement.original);
        result.replace_range(range, &replacement.replacement);
    }
    result
}

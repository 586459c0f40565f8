/*
 * batch.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Converting a directory of templates.
//!
//! Each file is converted independently, so files are processed in parallel.
//! A file with ambiguous tags is not written; a file that fails to convert
//! does not stop the others.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ConverterConfig;
use crate::engine::convert;
use crate::suggest::Suggestions;
use crate::utils::file_io::{read_template, write_file};

pub const MUSTACHE_EXTENSION: &str = "mustache";
pub const HANDLEBARS_EXTENSION: &str = "handlebars";

/// One template to convert and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Find every Mustache template under `in_dir` and map it into `out_dir`.
///
/// The output keeps the path relative to `in_dir`, with the extension changed.
/// Jobs are sorted by input path.
pub fn discover(in_dir: &Path, out_dir: &Path, recursive: bool) -> Result<Vec<FileJob>> {
    if !in_dir.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", in_dir.display());
    }

    let mut walker = WalkDir::new(in_dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut jobs = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", in_dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != MUSTACHE_EXTENSION)
        {
            continue;
        }

        let relative = path
            .strip_prefix(in_dir)
            .context("Failed to compute relative path")?;
        let mut output = out_dir.join(relative);
        output.set_extension(HANDLEBARS_EXTENSION);

        jobs.push(FileJob {
            input: path.to_path_buf(),
            output,
        });
    }

    debug!(count = jobs.len(), dir = %in_dir.display(), "Discovered templates");
    Ok(jobs)
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    Converted,
    SkippedAmbiguous { names: BTreeSet<String> },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub job: FileJob,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Convert every job. When `write` is false nothing is written (check mode).
///
/// Reports come back in the same order as `jobs`.
pub fn run(jobs: &[FileJob], config: &ConverterConfig, write: bool) -> Vec<FileReport> {
    jobs.par_iter()
        .map(|job| {
            let outcome = match process(job, config, write) {
                Ok(outcome) => outcome,
                Err(e) => FileOutcome::Failed {
                    error: format!("{:#}", e),
                },
            };
            FileReport {
                job: job.clone(),
                outcome,
            }
        })
        .collect()
}

fn process(job: &FileJob, config: &ConverterConfig, write: bool) -> Result<FileOutcome> {
    let content = read_template(&job.input)?;
    let conversion = convert(&content, &config.classification, config.whitespace)
        .with_context(|| format!("Failed to convert {}", job.input.display()))?;

    if !conversion.is_complete() {
        info!(file = %job.input.display(), ambiguous = conversion.ambiguous.len(), "Skipped");
        return Ok(FileOutcome::SkippedAmbiguous {
            names: conversion.ambiguous,
        });
    }

    if write {
        write_file(&job.output, &conversion.text)?;
        info!(file = %job.output.display(), "Wrote");
    }
    Ok(FileOutcome::Converted)
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub ambiguous: BTreeSet<String>,
}

impl RunSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.outcome {
                FileOutcome::Converted => summary.converted += 1,
                FileOutcome::SkippedAmbiguous { names } => {
                    summary.skipped += 1;
                    summary.ambiguous.extend(names.iter().cloned());
                }
                FileOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn suggestions(&self) -> Suggestions {
        Suggestions::from_names(self.ambiguous.iter().map(String::as_str))
    }
}

/// Remove the input of every converted file. Returns how many were removed.
pub fn delete_converted_inputs(reports: &[FileReport]) -> Result<usize> {
    let mut removed = 0;
    for report in reports {
        if report.outcome != FileOutcome::Converted || report.job.input == report.job.output {
            continue;
        }
        fs::remove_file(&report.job.input)
            .with_context(|| format!("Failed to remove file: {}", report.job.input.display()))?;
        info!(file = %report.job.input.display(), "Removed");
        removed += 1;
    }
    Ok(removed)
}

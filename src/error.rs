use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Category, FilterMode};

/// Failures the harness classifies explicitly. I/O problems are reported
/// through `anyhow` context instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("unknown experiment type: {0} (expected visited, top1, top10, top100 or ratio)")]
    UnknownExperimentType(String),

    #[error("aborted ({status}): {command}")]
    RunAborted { command: String, status: String },

    #[error(
        "no `{category}` distances for step {step} ({}) in {}",
        .filter_mode.as_str(),
        .path.display()
    )]
    MissingData {
        path: PathBuf,
        step: String,
        filter_mode: FilterMode,
        category: Category,
    },

    #[error(
        "malformed `{category}` distance list for step {step} at {}:{line_number}: {reason}: {line}",
        .path.display()
    )]
    Parse {
        path: PathBuf,
        line_number: usize,
        line: String,
        step: String,
        category: Category,
        reason: String,
    },

    #[error(
        "line {line_number} of {} carries markers for several categories: {line}",
        .path.display()
    )]
    CorruptLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
}

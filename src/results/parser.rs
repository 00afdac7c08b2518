use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::distance_list::DistanceListParser;
use crate::error::HarnessError;
use crate::model::{Category, FilterMode};

pub fn marker(category: Category, step: &str, filter_mode: FilterMode) -> String {
    let suffix = if filter_mode.is_filtered() {
        ", Filtered"
    } else {
        ""
    };
    format!("{}, Step {step}{suffix}:", category.marker_word())
}

/// Distance lists found for one step and filter mode. A category is `None`
/// when its marker never appeared in the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStep {
    pub zero: Option<Vec<f64>>,
    pub one_or_two: Option<Vec<f64>>,
    pub three_plus: Option<Vec<f64>>,
}

impl ParsedStep {
    fn slot_mut(&mut self, category: Category) -> &mut Option<Vec<f64>> {
        match category {
            Category::Zero => &mut self.zero,
            Category::OneOrTwo => &mut self.one_or_two,
            Category::ThreePlus => &mut self.three_plus,
        }
    }

    /// Requires every category to have been recorded. An empty list counts as
    /// recorded; a missing marker does not.
    pub fn into_complete(
        self,
        path: &Path,
        step: &str,
        filter_mode: FilterMode,
    ) -> Result<CategorizedDistances, HarnessError> {
        let missing = |category| HarnessError::MissingData {
            path: path.to_path_buf(),
            step: step.to_string(),
            filter_mode,
            category,
        };

        Ok(CategorizedDistances {
            zero: self.zero.ok_or_else(|| missing(Category::Zero))?,
            one_or_two: self.one_or_two.ok_or_else(|| missing(Category::OneOrTwo))?,
            three_plus: self.three_plus.ok_or_else(|| missing(Category::ThreePlus))?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedDistances {
    pub zero: Vec<f64>,
    pub one_or_two: Vec<f64>,
    pub three_plus: Vec<f64>,
}

impl CategorizedDistances {
    pub fn get(&self, category: Category) -> &[f64] {
        match category {
            Category::Zero => &self.zero,
            Category::OneOrTwo => &self.one_or_two,
            Category::ThreePlus => &self.three_plus,
        }
    }

    pub fn map_values<F>(self, mut transform: F) -> Self
    where
        F: FnMut(Vec<f64>) -> Vec<f64>,
    {
        Self {
            zero: transform(self.zero),
            one_or_two: transform(self.one_or_two),
            three_plus: transform(self.three_plus),
        }
    }
}

pub struct LogParser {
    lists: DistanceListParser,
}

impl LogParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lists: DistanceListParser::new()?,
        })
    }

    pub fn parse_file(&self, path: &Path, step: &str, filter_mode: FilterMode) -> Result<ParsedStep> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let text = String::from_utf8_lossy(&raw);
        Ok(self.parse_text(path, &text, step, filter_mode)?)
    }

    /// Scans `text` line by line for the three category markers of `step`.
    /// Later occurrences replace earlier ones. An unterminated final line that
    /// fails to parse is treated as a crash-truncated write and skipped.
    pub fn parse_text(
        &self,
        path: &Path,
        text: &str,
        step: &str,
        filter_mode: FilterMode,
    ) -> Result<ParsedStep, HarnessError> {
        let markers = Category::ALL.map(|category| (category, marker(category, step, filter_mode)));
        let mut parsed = ParsedStep::default();

        for (index, raw_line) in text.split_inclusive('\n').enumerate() {
            let line_number = index + 1;
            let terminated = raw_line.ends_with('\n');
            let line = raw_line.trim_end_matches(['\n', '\r']);

            let hits: Vec<(Category, usize)> = markers
                .iter()
                .filter_map(|(category, needle)| line.find(needle.as_str()).map(|at| (*category, at)))
                .collect();

            let (category, at) = match hits.as_slice() {
                [] => continue,
                [hit] => *hit,
                _ => {
                    return Err(HarnessError::CorruptLine {
                        path: path.to_path_buf(),
                        line_number,
                        line: line.to_string(),
                    });
                }
            };

            let values = line[at..]
                .split_once(": ")
                .ok_or_else(|| "missing `: ` separator".to_string())
                .and_then(|(_, payload)| {
                    self.lists.parse(payload).map_err(|err| err.to_string())
                });

            match values {
                Ok(values) => {
                    let slot = parsed.slot_mut(category);
                    if slot.is_some() {
                        debug!(
                            line_number,
                            category = %category,
                            step,
                            "marker repeated; keeping the later list"
                        );
                    }
                    *slot = Some(values);
                }
                Err(reason) if !terminated => {
                    warn!(
                        path = %path.display(),
                        line_number,
                        category = %category,
                        reason = %reason,
                        "skipping truncated final line"
                    );
                }
                Err(reason) => {
                    return Err(HarnessError::Parse {
                        path: path.to_path_buf(),
                        line_number,
                        line: line.to_string(),
                        step: step.to_string(),
                        category,
                        reason,
                    });
                }
            }
        }

        Ok(parsed)
    }
}

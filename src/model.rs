use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ElementType {
    #[serde(rename = "uint8")]
    Uint8,
    #[serde(rename = "float")]
    Float,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Float => "float",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DistanceFunction {
    #[serde(rename = "euclidean", alias = "Euclidian")]
    Euclidean,
    #[serde(rename = "mips")]
    MaxInnerProduct,
}

impl DistanceFunction {
    /// Value expected by the engine's `-dist_func` flag.
    pub fn as_flag_value(self) -> &'static str {
        match self {
            Self::Euclidean => "Euclidian",
            Self::MaxInnerProduct => "mips",
        }
    }
}

/// Per-experiment cutoffs drawn on filtered histograms. Visited reports use
/// the dataset's early-stop radius instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top100: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub base_path: String,
    pub gt_path: String,
    pub query_path: String,
    pub element_type: ElementType,
    pub distance_function: DistanceFunction,
    pub radius: f64,
    pub early_stop_radius: f64,
    pub alpha: f64,
    #[serde(default)]
    pub thresholds: ReportThresholds,
}

impl DatasetConfig {
    /// Threshold marker for `experiment`, if one is configured. Zero counts as
    /// unset.
    pub fn threshold_for(&self, experiment: ExperimentType) -> Option<f64> {
        let value = match experiment {
            ExperimentType::Visited => Some(self.early_stop_radius),
            ExperimentType::Top1 => self.thresholds.top1,
            ExperimentType::Top10 => self.thresholds.top10,
            ExperimentType::Top100 => self.thresholds.top100,
            ExperimentType::Ratio => self.thresholds.ratio,
        };
        value.filter(|threshold| *threshold != 0.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentType {
    Visited,
    Top1,
    Top10,
    Top100,
    Ratio,
}

impl ExperimentType {
    pub const ALL: [ExperimentType; 5] = [
        Self::Visited,
        Self::Top1,
        Self::Top10,
        Self::Top100,
        Self::Ratio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::Top1 => "top1",
            Self::Top10 => "top10",
            Self::Top100 => "top100",
            Self::Ratio => "ratio",
        }
    }

    /// Name of the engine binary that records this experiment's diagnostics.
    pub fn binary_name(self) -> &'static str {
        match self {
            Self::Visited => "range_visited",
            Self::Top1 => "range_top1",
            Self::Top10 => "range_top10",
            Self::Top100 => "range_top100",
            Self::Ratio => "range_ratio",
        }
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperimentType {
    type Err = HarnessError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| HarnessError::UnknownExperimentType(raw.to_string()))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Raw,
    Filtered,
}

impl FilterMode {
    pub fn from_flag(filtered: bool) -> Self {
        if filtered { Self::Filtered } else { Self::Raw }
    }

    pub fn is_filtered(self) -> bool {
        matches!(self, Self::Filtered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Filtered => "filtered",
        }
    }
}

/// Partition of queries by how many ground-truth matches they had found at the
/// measured step.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Zero,
    OneOrTwo,
    ThreePlus,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Zero, Self::OneOrTwo, Self::ThreePlus];

    /// Leading word of the engine's diagnostic line for this category.
    pub fn marker_word(self) -> &'static str {
        match self {
            Self::Zero => "Zeros",
            Self::OneOrTwo => "OneTwos",
            Self::ThreePlus => "Threeplus",
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            Self::Zero => "Zero Results",
            Self::OneOrTwo => "1-2 Results",
            Self::ThreePlus => "3+ Results",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker_word())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub values: usize,
    pub bins: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub dataset: String,
    pub experiment_type: ExperimentType,
    pub step: String,
    pub filter_mode: FilterMode,
    pub paper: bool,
    pub log_path: String,
    pub log_sha256: String,
    pub normalization: Option<String>,
    pub categories: Vec<CategoryStats>,
    pub threshold: Option<f64>,
    pub figure_path: String,
    pub legend_path: Option<String>,
}

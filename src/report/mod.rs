use std::path::PathBuf;

use crate::model::{ExperimentType, FilterMode};

mod generate;
mod histogram;
mod render;
#[cfg(test)]
mod tests;

pub use generate::generate;
pub use render::{FigureRenderer, SvgRenderer};
#[cfg(test)]
pub use render::{FigurePlan, LegendPlan};

pub const Y_AXIS_LABEL: &str = "Frequency";
pub const PAPER_LEGEND_COLUMNS: usize = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum XAxis {
    VisitedDistance,
    Top1Distance,
    Top10Distance,
    Top100Distance,
    Top10StartRatio,
}

impl XAxis {
    pub fn for_experiment(experiment: ExperimentType) -> Self {
        match experiment {
            ExperimentType::Visited => Self::VisitedDistance,
            ExperimentType::Top1 => Self::Top1Distance,
            ExperimentType::Top10 => Self::Top10Distance,
            ExperimentType::Top100 => Self::Top100Distance,
            ExperimentType::Ratio => Self::Top10StartRatio,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VisitedDistance => "d_visited",
            Self::Top1Distance => "d_top1",
            Self::Top10Distance => "d_top10",
            Self::Top100Distance => "d_top100",
            Self::Top10StartRatio => "d_top10 / d_start",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistogramSpec {
    pub title: String,
    pub x_axis: XAxis,
    pub figure_path: PathBuf,
    pub legend_path: PathBuf,
    pub threshold: Option<f64>,
    pub filter_mode: FilterMode,
    pub paper: bool,
}

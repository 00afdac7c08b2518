use std::path::{Path, PathBuf};

use crate::model::{ExperimentType, FilterMode};

const LOG_DIR: &str = "dist_histograms";
const GRAPH_DIR: &str = "graphs/dist_histograms";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub figure: PathBuf,
    pub legend: PathBuf,
    pub manifest: PathBuf,
}

/// Deterministic locations of logs and report artifacts under one output root.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn log_path(&self, experiment: ExperimentType, dataset: &str) -> PathBuf {
        self.root
            .join(LOG_DIR)
            .join(experiment.as_str())
            .join(format!("{dataset}.txt"))
    }

    pub fn figure_dir(&self, experiment: ExperimentType, filter_mode: FilterMode, step: &str) -> PathBuf {
        let kind = if filter_mode.is_filtered() {
            format!("{}_Filtered", experiment.as_str())
        } else {
            experiment.as_str().to_string()
        };
        self.root.join(GRAPH_DIR).join(kind).join(format!("Step{step}"))
    }

    pub fn report_paths(
        &self,
        experiment: ExperimentType,
        filter_mode: FilterMode,
        step: &str,
        label: &str,
    ) -> ReportPaths {
        let dir = self.figure_dir(experiment, filter_mode, step);
        let stem = file_stem(label);
        ReportPaths {
            figure: dir.join(format!("{stem}.svg")),
            legend: dir.join(format!("{stem}_legend.svg")),
            manifest: dir.join(format!("{stem}.json")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Graph labels such as `deep-1M r=.02` keep their text but lose dots so the
/// extension stays unambiguous.
pub fn file_stem(label: &str) -> String {
    label.replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_is_keyed_by_experiment_and_dataset() {
        let layout = ArtifactLayout::new("out");
        assert_eq!(
            layout.log_path(ExperimentType::Top10, "deep-1M"),
            PathBuf::from("out/dist_histograms/top10/deep-1M.txt")
        );
    }

    #[test]
    fn figure_dir_separates_filtered_reports() {
        let layout = ArtifactLayout::new("out");
        assert_eq!(
            layout.figure_dir(ExperimentType::Ratio, FilterMode::Raw, "4"),
            PathBuf::from("out/graphs/dist_histograms/ratio/Step4")
        );
        assert_eq!(
            layout.figure_dir(ExperimentType::Ratio, FilterMode::Filtered, "4"),
            PathBuf::from("out/graphs/dist_histograms/ratio_Filtered/Step4")
        );
    }

    #[test]
    fn report_paths_strip_dots_from_label() {
        let layout = ArtifactLayout::new(".");
        let paths = layout.report_paths(ExperimentType::Visited, FilterMode::Raw, "2", "gist-1M r=.5");
        let dir = PathBuf::from("./graphs/dist_histograms/visited/Step2");
        assert_eq!(paths.figure, dir.join("gist-1M r=5.svg"));
        assert_eq!(paths.legend, dir.join("gist-1M r=5_legend.svg"));
        assert_eq!(paths.manifest, dir.join("gist-1M r=5.json"));
    }
}

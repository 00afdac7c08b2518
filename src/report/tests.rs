use std::path::{Path, PathBuf};

use anyhow::Result;

use super::*;
use crate::model::{Category, ExperimentType, FilterMode};
use crate::results::CategorizedDistances;

#[derive(Default)]
struct RecordingRenderer {
    figures: Vec<(FigurePlan, PathBuf)>,
    legends: Vec<(LegendPlan, PathBuf)>,
}

impl FigureRenderer for RecordingRenderer {
    fn render_figure(&mut self, plan: &FigurePlan, path: &Path) -> Result<()> {
        self.figures.push((plan.clone(), path.to_path_buf()));
        Ok(())
    }

    fn render_legend(&mut self, plan: &LegendPlan, path: &Path) -> Result<()> {
        self.legends.push((plan.clone(), path.to_path_buf()));
        Ok(())
    }
}

fn spec(root: &Path, filter_mode: FilterMode, paper: bool) -> HistogramSpec {
    let dir = root.join("graphs").join("Step3");
    HistogramSpec {
        title: "bigann-1M".to_string(),
        x_axis: XAxis::for_experiment(ExperimentType::Visited),
        figure_path: dir.join("bigann-1M.svg"),
        legend_path: dir.join("bigann-1M_legend.svg"),
        threshold: Some(11000.0),
        filter_mode,
        paper,
    }
}

fn distances() -> CategorizedDistances {
    CategorizedDistances {
        zero: (0..23).map(f64::from).collect(),
        one_or_two: Vec::new(),
        three_plus: vec![9.9],
    }
}

#[test]
fn empty_category_contributes_no_layer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();

    let artifacts = generate(&distances(), &spec(dir.path(), FilterMode::Raw, false), &mut renderer)
        .expect("report generates");

    let (plan, path) = &renderer.figures[0];
    let drawn: Vec<Category> = plan.layers.iter().map(|layer| layer.category).collect();
    assert_eq!(drawn, vec![Category::Zero, Category::ThreePlus]);
    assert_eq!(plan.layers[0].histogram.bins(), 5);
    assert_eq!(path, &artifacts.figure_path);

    let bins: Vec<(Category, usize, usize)> = artifacts
        .categories
        .iter()
        .map(|stats| (stats.category, stats.values, stats.bins))
        .collect();
    assert_eq!(
        bins,
        vec![
            (Category::Zero, 23, 5),
            (Category::OneOrTwo, 0, 0),
            (Category::ThreePlus, 1, 1),
        ]
    );
}

#[test]
fn all_empty_categories_render_bare_axes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();

    generate(
        &CategorizedDistances::default(),
        &spec(dir.path(), FilterMode::Raw, false),
        &mut renderer,
    )
    .expect("empty report still renders");

    assert_eq!(renderer.figures.len(), 1);
    assert!(renderer.figures[0].0.layers.is_empty());
}

#[test]
fn threshold_is_drawn_only_for_filtered_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();

    let raw = generate(&distances(), &spec(dir.path(), FilterMode::Raw, false), &mut renderer)
        .expect("raw report");
    let filtered = generate(&distances(), &spec(dir.path(), FilterMode::Filtered, false), &mut renderer)
        .expect("filtered report");

    assert_eq!(raw.threshold, None);
    assert_eq!(renderer.figures[0].0.threshold, None);
    assert_eq!(filtered.threshold, Some(11000.0));
    assert_eq!(renderer.figures[1].0.threshold, Some(11000.0));
}

#[test]
fn normal_mode_titles_figure_and_keeps_legend_inline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();

    let artifacts = generate(&distances(), &spec(dir.path(), FilterMode::Raw, false), &mut renderer)
        .expect("report generates");

    let plan = &renderer.figures[0].0;
    assert_eq!(plan.title.as_deref(), Some("bigann-1M"));
    assert_eq!(plan.x_label, "d_visited");
    assert_eq!(plan.y_label, "Frequency");
    assert!(plan.inline_legend);
    assert!(renderer.legends.is_empty());
    assert_eq!(artifacts.legend_path, None);
    assert!(dir.path().join("graphs").join("Step3").is_dir());
}

#[test]
fn paper_mode_suppresses_title_and_detaches_legend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();
    let spec = spec(dir.path(), FilterMode::Filtered, true);

    let artifacts = generate(&distances(), &spec, &mut renderer).expect("report generates");

    let plan = &renderer.figures[0].0;
    assert_eq!(plan.title, None);
    assert!(!plan.inline_legend);

    let (legend, path) = &renderer.legends[0];
    assert_eq!(legend.entries, vec![Category::Zero, Category::ThreePlus]);
    assert_eq!(legend.columns, PAPER_LEGEND_COLUMNS);
    assert_eq!(path, &spec.legend_path);
    assert_eq!(artifacts.legend_path.as_ref(), Some(&spec.legend_path));
}

#[test]
fn paper_mode_without_layers_skips_legend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut renderer = RecordingRenderer::default();

    let artifacts = generate(
        &CategorizedDistances::default(),
        &spec(dir.path(), FilterMode::Raw, true),
        &mut renderer,
    )
    .expect("report generates");

    assert!(renderer.legends.is_empty());
    assert_eq!(artifacts.legend_path, None);
}

#[test]
fn x_axis_labels_follow_experiment_type() {
    assert_eq!(XAxis::for_experiment(ExperimentType::Top1).label(), "d_top1");
    assert_eq!(XAxis::for_experiment(ExperimentType::Top10).label(), "d_top10");
    assert_eq!(XAxis::for_experiment(ExperimentType::Top100).label(), "d_top100");
    assert_eq!(
        XAxis::for_experiment(ExperimentType::Ratio).label(),
        "d_top10 / d_start"
    );
}

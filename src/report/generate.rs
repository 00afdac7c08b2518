use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use super::histogram::{Histogram, HistogramLayer};
use super::render::{FigurePlan, FigureRenderer, LegendPlan};
use super::{HistogramSpec, PAPER_LEGEND_COLUMNS, Y_AXIS_LABEL};
use crate::model::{Category, CategoryStats};
use crate::results::CategorizedDistances;
use crate::util::ensure_parent_directory;

#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub figure_path: PathBuf,
    pub legend_path: Option<PathBuf>,
    pub categories: Vec<CategoryStats>,
    pub threshold: Option<f64>,
}

/// Bins each category, renders the overlay figure and, in paper mode, the
/// detached legend.
pub fn generate(
    distances: &CategorizedDistances,
    spec: &HistogramSpec,
    renderer: &mut dyn FigureRenderer,
) -> Result<ReportArtifacts> {
    let mut layers = Vec::new();
    let mut categories = Vec::new();
    for category in Category::ALL {
        let values = distances.get(category);
        let histogram = Histogram::from_values(values);
        categories.push(CategoryStats {
            category,
            values: values.len(),
            bins: histogram.as_ref().map_or(0, Histogram::bins),
        });
        match histogram {
            Some(histogram) => layers.push(HistogramLayer {
                category,
                histogram,
            }),
            None => info!(category = %category, "no distances; skipping layer"),
        }
    }

    // The threshold is a filtering cutoff and only means something on filtered data.
    let threshold = spec.threshold.filter(|_| spec.filter_mode.is_filtered());

    let figure = FigurePlan {
        title: (!spec.paper).then(|| spec.title.clone()),
        x_label: spec.x_axis.label().to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        layers,
        threshold,
        inline_legend: !spec.paper,
    };

    ensure_parent_directory(&spec.figure_path)?;
    renderer.render_figure(&figure, &spec.figure_path)?;
    info!(path = %spec.figure_path.display(), layers = figure.layers.len(), "wrote histogram");

    let legend_path = if spec.paper {
        let entries: Vec<Category> = figure.layers.iter().map(|layer| layer.category).collect();
        if entries.is_empty() {
            warn!(path = %spec.legend_path.display(), "no layers drawn; skipping detached legend");
            None
        } else {
            let legend = LegendPlan {
                entries,
                columns: PAPER_LEGEND_COLUMNS,
            };
            ensure_parent_directory(&spec.legend_path)?;
            renderer.render_legend(&legend, &spec.legend_path)?;
            info!(path = %spec.legend_path.display(), "wrote detached legend");
            Some(spec.legend_path.clone())
        }
    } else {
        None
    };

    Ok(ReportArtifacts {
        figure_path: spec.figure_path.clone(),
        legend_path,
        categories,
        threshold,
    })
}

use std::path::Path;

use anyhow::{Context, Result, bail};
use plotters::prelude::*;

use super::histogram::HistogramLayer;
use crate::model::Category;

/// Backend-independent description of one overlay histogram figure.
#[derive(Debug, Clone)]
pub struct FigurePlan {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub layers: Vec<HistogramLayer>,
    pub threshold: Option<f64>,
    pub inline_legend: bool,
}

impl FigurePlan {
    /// Horizontal extent covering every layer and the threshold marker.
    pub fn x_range(&self) -> (f64, f64) {
        let mut bounds = self.layers.iter().map(|layer| layer.histogram.range()).chain(
            self.threshold
                .map(|threshold| (threshold, threshold))
                .into_iter(),
        );

        let Some(first) = bounds.next() else {
            return (0.0, 1.0);
        };
        let (low, high) = bounds.fold(first, |(low, high), (lo, hi)| (low.min(lo), high.max(hi)));

        if low == high {
            (low - 0.5, high + 0.5)
        } else {
            let pad = high * 0.05 - low * 0.05;
            ((low - pad).max(f64::MIN), (high + pad).min(f64::MAX))
        }
    }

    pub fn y_max(&self) -> f64 {
        let peak = self
            .layers
            .iter()
            .map(|layer| layer.histogram.max_count())
            .max()
            .unwrap_or(0);
        (peak.max(1) as f64) * 1.1
    }
}

/// A legend rendered as its own cropped artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendPlan {
    pub entries: Vec<Category>,
    pub columns: usize,
}

pub trait FigureRenderer {
    fn render_figure(&mut self, plan: &FigurePlan, path: &Path) -> Result<()>;
    fn render_legend(&mut self, plan: &LegendPlan, path: &Path) -> Result<()>;
}

const FIGURE_SIZE: (u32, u32) = (1000, 750);
const LEGEND_PANEL_WIDTH: i32 = 240;
const LEGEND_ENTRY_WIDTH: i32 = 210;
const LEGEND_ROW_HEIGHT: i32 = 40;
const LEGEND_PADDING: i32 = 8;
const THRESHOLD_DASHES: usize = 60;
const LAYER_OPACITY: f64 = 0.5;

fn category_color(category: Category) -> RGBColor {
    match category {
        Category::Zero => RGBColor(31, 119, 180),
        Category::OneOrTwo => RGBColor(255, 127, 14),
        Category::ThreePlus => RGBColor(44, 160, 44),
    }
}

/// Renders figures and legends as SVG through `plotters`.
#[derive(Debug, Default)]
pub struct SvgRenderer;

impl FigureRenderer for SvgRenderer {
    fn render_figure(&mut self, plan: &FigurePlan, path: &Path) -> Result<()> {
        let (x_low, x_high) = plan.x_range();
        if !(x_high - x_low).is_finite() {
            bail!(
                "distance range {x_low:e}..{x_high:e} is too wide to plot {}",
                path.display()
            );
        }
        let y_max = plan.y_max();

        let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .with_context(|| format!("failed to initialize figure {}", path.display()))?;

        let (plot_area, legend_area) = if plan.inline_legend {
            let (plot, legend) = root.split_horizontally(FIGURE_SIZE.0 as i32 - LEGEND_PANEL_WIDTH);
            (plot, Some(legend))
        } else {
            (root.clone(), None)
        };

        let mut builder = ChartBuilder::on(&plot_area);
        builder.margin(20).x_label_area_size(60).y_label_area_size(80);
        if let Some(title) = &plan.title {
            builder.caption(title, ("sans-serif", 32).into_font());
        }
        let mut chart = builder
            .build_cartesian_2d(x_low..x_high, 0f64..y_max)
            .with_context(|| format!("failed to build axes for {}", path.display()))?;

        chart
            .configure_mesh()
            .x_desc(plan.x_label.as_str())
            .y_desc(plan.y_label.as_str())
            .label_style(("sans-serif", 22))
            .axis_desc_style(("sans-serif", 26))
            .draw()
            .with_context(|| format!("failed to draw grid for {}", path.display()))?;

        for layer in &plan.layers {
            let style = category_color(layer.category).mix(LAYER_OPACITY).filled();
            chart
                .draw_series(layer.histogram.bars().map(|(left, right, count)| {
                    Rectangle::new([(left, 0.0), (right, count as f64)], style)
                }))
                .with_context(|| format!("failed to draw {} layer", layer.category))?;
        }

        if let Some(threshold) = plan.threshold {
            let step = y_max / THRESHOLD_DASHES as f64;
            chart
                .draw_series((0..THRESHOLD_DASHES).step_by(2).map(|index| {
                    let bottom = step * index as f64;
                    PathElement::new(
                        vec![(threshold, bottom), (threshold, bottom + step)],
                        BLACK.stroke_width(2),
                    )
                }))
                .context("failed to draw threshold marker")?;
        }

        if let Some(legend_area) = legend_area {
            let entries: Vec<Category> = plan.layers.iter().map(|layer| layer.category).collect();
            let (_, height) = legend_area.dim_in_pixel();
            let top = height as i32 / 2 - entries.len() as i32 * LEGEND_ROW_HEIGHT / 2;
            draw_legend_entries(&legend_area, &entries, 1, (LEGEND_PADDING, top))
                .context("failed to draw inline legend")?;
        }

        root.present()
            .with_context(|| format!("failed to write figure {}", path.display()))?;
        Ok(())
    }

    fn render_legend(&mut self, plan: &LegendPlan, path: &Path) -> Result<()> {
        let columns = plan.columns.clamp(1, plan.entries.len().max(1));
        let rows = plan.entries.len().div_ceil(columns).max(1);
        let size = (
            (columns as i32 * LEGEND_ENTRY_WIDTH + 2 * LEGEND_PADDING) as u32,
            (rows as i32 * LEGEND_ROW_HEIGHT + 2 * LEGEND_PADDING) as u32,
        );

        // No fill: the legend background stays transparent.
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_legend_entries(&root, &plan.entries, columns, (LEGEND_PADDING, LEGEND_PADDING))
            .context("failed to draw detached legend")?;
        root.present()
            .with_context(|| format!("failed to write legend {}", path.display()))?;
        Ok(())
    }
}

fn draw_legend_entries<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    entries: &[Category],
    columns: usize,
    origin: (i32, i32),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for (index, category) in entries.iter().enumerate() {
        let column = (index % columns) as i32;
        let row = (index / columns) as i32;
        let x = origin.0 + column * LEGEND_ENTRY_WIDTH;
        let y = origin.1 + row * LEGEND_ROW_HEIGHT;

        area.draw(&Rectangle::new(
            [(x, y + 8), (x + 36, y + 32)],
            category_color(*category).mix(LAYER_OPACITY).filled(),
        ))?;
        area.draw(&Text::new(
            category.legend_label(),
            (x + 46, y + 8),
            ("sans-serif", 24).into_font().color(&BLACK),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::histogram::Histogram;

    fn layer(category: Category, values: &[f64]) -> HistogramLayer {
        HistogramLayer {
            category,
            histogram: Histogram::from_values(values).expect("non-empty"),
        }
    }

    fn plan(layers: Vec<HistogramLayer>, threshold: Option<f64>) -> FigurePlan {
        FigurePlan {
            title: None,
            x_label: "d_visited".to_string(),
            y_label: "Frequency".to_string(),
            layers,
            threshold,
            inline_legend: false,
        }
    }

    #[test]
    fn x_range_spans_layers_and_threshold() {
        let figure = plan(
            vec![
                layer(Category::Zero, &[0.0, 10.0]),
                layer(Category::ThreePlus, &[5.0, 20.0]),
            ],
            Some(30.0),
        );
        let (low, high) = figure.x_range();
        assert!((low - -1.5).abs() < 1e-9);
        assert!((high - 31.5).abs() < 1e-9);
    }

    #[test]
    fn empty_plan_still_has_drawable_axes() {
        let figure = plan(Vec::new(), None);
        assert_eq!(figure.x_range(), (0.0, 1.0));
        assert!((figure.y_max() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn x_range_stays_finite_for_extreme_values() {
        let figure = plan(vec![layer(Category::Zero, &[-1e308, 1e308])], None);
        let (low, high) = figure.x_range();
        assert!(low.is_finite() && high.is_finite());
        assert!(low <= -1e308 && high >= 1e308);
    }

    #[test]
    fn svg_renderer_writes_figure_with_inline_legend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Step3").join("deep-1M.svg");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        let mut figure = plan(
            vec![
                layer(Category::Zero, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                layer(Category::OneOrTwo, &[2.5, 3.5]),
            ],
            Some(4.0),
        );
        figure.title = Some("deep-1M".to_string());
        figure.inline_legend = true;

        SvgRenderer.render_figure(&figure, &path).expect("figure renders");

        let svg = std::fs::read_to_string(&path).expect("figure written");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Zero Results"));
        assert!(svg.contains("1-2 Results"));
        assert!(!svg.contains("3+ Results"));
        assert!(svg.to_lowercase().contains("#ffffff"));
    }

    #[test]
    fn svg_renderer_writes_transparent_multi_column_legend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deep-1M_legend.svg");
        let legend = LegendPlan {
            entries: Category::ALL.to_vec(),
            columns: 8,
        };

        SvgRenderer.render_legend(&legend, &path).expect("legend renders");

        let svg = std::fs::read_to_string(&path).expect("legend written");
        for category in Category::ALL {
            assert!(svg.contains(category.legend_label()));
        }
        assert!(!svg.to_lowercase().contains("#ffffff"));
    }

    #[test]
    fn svg_renderer_rejects_span_beyond_f64() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("extreme.svg");
        let figure = plan(vec![layer(Category::Zero, &[-1e308, 1e308])], None);

        let err = SvgRenderer
            .render_figure(&figure, &path)
            .expect_err("span overflows f64");
        assert!(err.to_string().contains("too wide to plot"));
        assert!(!path.exists());
    }

    #[test]
    fn y_max_leaves_headroom_above_tallest_bin() {
        let figure = plan(vec![layer(Category::OneOrTwo, &[1.0; 10])], None);
        assert!((figure.y_max() - 11.0).abs() < 1e-9);
    }
}

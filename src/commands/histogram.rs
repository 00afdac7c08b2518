use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::HistogramArgs;
use crate::experiment::{BuildParams, ExperimentRunner, RunOutcome, RunnerSettings, SystemExecutor};
use crate::layout::ArtifactLayout;
use crate::model::{ExperimentType, FilterMode, ReportManifest};
use crate::normalize::{NormalizationPolicy, Transform, normalize};
use crate::registry::DatasetRegistry;
use crate::report::{FigureRenderer, HistogramSpec, SvgRenderer, XAxis, generate};
use crate::results::LogParser;
use crate::util::{ensure_parent_directory, now_utc_string, sha256_file, write_json_pretty};

const REPORT_MANIFEST_VERSION: u32 = 1;

pub fn run(args: HistogramArgs) -> Result<()> {
    let experiment: ExperimentType = args.experiment_type.parse()?;
    let registry = DatasetRegistry::load(args.registry.as_deref())?;
    let config = registry.get(&args.dataset)?;
    let filter_mode = FilterMode::from_flag(args.filter);
    let layout = ArtifactLayout::new(&args.output_root);
    let log_path = layout.log_path(experiment, &args.dataset);

    info!(
        dataset = %args.dataset,
        experiment = %experiment,
        step = %args.step,
        filter = args.filter,
        paper = args.paper,
        graphs_only = args.graphs_only,
        output_root = %layout.root().display(),
        "histogram requested"
    );

    if !args.graphs_only {
        reset_log(&log_path)?;
        let settings = RunnerSettings {
            engine_dir: args.engine_dir.clone(),
            build_params: BuildParams {
                max_degree: args.max_degree,
                beam_width: args.beam_width,
            },
            soft_failure_exit_code: args.soft_fail_exit_code,
        };
        let mut runner = ExperimentRunner::new(&registry, settings, SystemExecutor);

        match runner.run(&args.dataset, experiment, &log_path)? {
            RunOutcome::Executed(result) => info!(
                command = %result.command,
                log = %result.log_path.display(),
                succeeded = result.succeeded(),
                executed_commands = runner.tracker().len(),
                "engine run complete"
            ),
            RunOutcome::AlreadyRan { command } => {
                info!(command = %command, "engine run skipped")
            }
        }
    }

    let policy = args
        .complement_ratio
        .iter()
        .fold(NormalizationPolicy::default(), |policy, dataset| {
            policy.with_rule(dataset, ExperimentType::Ratio, Transform::RatioComplement)
        });

    let request = ReportRequest {
        dataset: &args.dataset,
        experiment,
        step: &args.step,
        filter_mode,
        paper: args.paper,
        label: args.graph_name.as_deref().unwrap_or(&args.dataset),
        threshold: config.threshold_for(experiment),
    };

    let manifest = build_report(&layout, &request, &policy, &mut SvgRenderer)?;
    info!(
        figure = %manifest.figure_path,
        legend = %manifest.legend_path.as_deref().unwrap_or("-"),
        "histogram report completed"
    );

    Ok(())
}

/// Truncates the experiment log so the coming run starts a fresh artifact.
fn reset_log(log_path: &Path) -> Result<()> {
    ensure_parent_directory(log_path)?;
    fs::write(log_path, "\n").with_context(|| format!("failed to reset {}", log_path.display()))
}

#[derive(Debug, Clone)]
pub(crate) struct ReportRequest<'a> {
    pub dataset: &'a str,
    pub experiment: ExperimentType,
    pub step: &'a str,
    pub filter_mode: FilterMode,
    pub paper: bool,
    pub label: &'a str,
    pub threshold: Option<f64>,
}

/// Rebuilds one report from the experiment log on disk and records its
/// manifest next to the figure.
pub(crate) fn build_report(
    layout: &ArtifactLayout,
    request: &ReportRequest<'_>,
    policy: &NormalizationPolicy,
    renderer: &mut dyn FigureRenderer,
) -> Result<ReportManifest> {
    let log_path = layout.log_path(request.experiment, request.dataset);
    let parser = LogParser::new()?;
    let mut distances = parser
        .parse_file(&log_path, request.step, request.filter_mode)?
        .into_complete(&log_path, request.step, request.filter_mode)?;

    info!(
        zero = distances.zero.len(),
        one_or_two = distances.one_or_two.len(),
        three_plus = distances.three_plus.len(),
        "parsed distance lists"
    );

    let transform = policy.lookup(request.dataset, request.experiment);
    if let Some(transform) = transform {
        info!(dataset = %request.dataset, transform = %transform, "normalizing distances");
        distances = distances.map_values(|values| normalize(&values, transform));
    }

    let paths = layout.report_paths(
        request.experiment,
        request.filter_mode,
        request.step,
        request.label,
    );
    let spec = HistogramSpec {
        title: request.label.to_string(),
        x_axis: XAxis::for_experiment(request.experiment),
        figure_path: paths.figure,
        legend_path: paths.legend,
        threshold: request.threshold,
        filter_mode: request.filter_mode,
        paper: request.paper,
    };
    let artifacts = generate(&distances, &spec, renderer)?;

    let manifest = ReportManifest {
        manifest_version: REPORT_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        dataset: request.dataset.to_string(),
        experiment_type: request.experiment,
        step: request.step.to_string(),
        filter_mode: request.filter_mode,
        paper: request.paper,
        log_path: log_path.display().to_string(),
        log_sha256: sha256_file(&log_path)?,
        normalization: transform.map(|transform| transform.as_str().to_string()),
        categories: artifacts.categories,
        threshold: artifacts.threshold,
        figure_path: artifacts.figure_path.display().to_string(),
        legend_path: artifacts
            .legend_path
            .map(|path| path.display().to_string()),
    };
    write_json_pretty(&paths.manifest, &manifest)?;
    info!(path = %paths.manifest.display(), "wrote report manifest");

    Ok(manifest)
}

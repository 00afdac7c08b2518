use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::DatasetsArgs;
use crate::model::ExperimentType;
use crate::registry::DatasetRegistry;

pub fn run(args: DatasetsArgs) -> Result<()> {
    let registry = DatasetRegistry::load(args.registry.as_deref())?;

    if args.json {
        let mut output = io::BufWriter::new(io::stdout().lock());
        serde_json::to_writer_pretty(&mut output, registry.as_map())
            .context("failed to serialize dataset registry")?;
        writeln!(output)?;
        output.flush()?;
        return Ok(());
    }

    for (name, config) in registry.iter() {
        let thresholds = ExperimentType::ALL
            .into_iter()
            .filter_map(|experiment| {
                config
                    .threshold_for(experiment)
                    .map(|threshold| format!("{experiment}={threshold}"))
            })
            .collect::<Vec<String>>()
            .join(" ");

        info!(
            dataset = %name,
            element_type = config.element_type.as_str(),
            dist_func = config.distance_function.as_flag_value(),
            radius = config.radius,
            early_stop_radius = config.early_stop_radius,
            alpha = config.alpha,
            thresholds = %thresholds,
            base = %config.base_path,
            "dataset"
        );
    }
    info!(datasets = registry.len(), "dataset registry listed");

    Ok(())
}

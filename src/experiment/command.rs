use std::path::{Path, PathBuf};

use crate::model::{DatasetConfig, ExperimentType};

pub const DEFAULT_MAX_DEGREE: u32 = 64;
pub const DEFAULT_BEAM_WIDTH: u32 = 128;

/// Graph build parameters passed to every engine invocation (`-R`, `-L`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BuildParams {
    pub max_degree: u32,
    pub beam_width: u32,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            max_degree: DEFAULT_MAX_DEGREE,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }
}

/// A fully materialized engine command line. Equality is defined on the
/// rendered command string.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl PartialEq for Invocation {
    fn eq(&self, other: &Self) -> bool {
        self.command_line() == other.command_line()
    }
}

impl Eq for Invocation {}

pub fn build_args(config: &DatasetConfig, params: BuildParams) -> Vec<String> {
    let flags: [(&str, String); 10] = [
        ("-base_path", config.base_path.clone()),
        ("-gt_path", config.gt_path.clone()),
        ("-query_path", config.query_path.clone()),
        ("-data_type", config.element_type.as_str().to_string()),
        ("-dist_func", config.distance_function.as_flag_value().to_string()),
        ("-r", config.radius.to_string()),
        ("-early_stopping_radius", config.early_stop_radius.to_string()),
        ("-alpha", config.alpha.to_string()),
        ("-R", params.max_degree.to_string()),
        ("-L", params.beam_width.to_string()),
    ];

    flags
        .into_iter()
        .flat_map(|(flag, value)| [flag.to_string(), value])
        .collect()
}

pub fn build_invocation(
    engine_dir: &Path,
    config: &DatasetConfig,
    experiment: ExperimentType,
    params: BuildParams,
) -> Invocation {
    Invocation {
        program: engine_dir.join(experiment.binary_name()),
        args: build_args(config, params),
    }
}

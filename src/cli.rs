use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::experiment::{DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEGREE, DEFAULT_SOFT_FAILURE_EXIT_CODE};

#[derive(Parser, Debug)]
#[command(
    name = "rangehist",
    version,
    about = "Range-search distance histogram experiments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Histogram(HistogramArgs),
    Datasets(DatasetsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct HistogramArgs {
    /// visited, top1, top10, top100 or ratio
    #[arg(long = "type")]
    pub experiment_type: String,

    #[arg(long)]
    pub step: String,

    #[arg(long)]
    pub dataset: String,

    /// Report on queries that had not yet found a match
    #[arg(short = 'f', long, default_value_t = false)]
    pub filter: bool,

    #[arg(short = 'p', long = "paper", default_value_t = false)]
    pub paper: bool,

    /// Skip the engine run and rebuild the report from the existing log
    #[arg(short = 'g', long, default_value_t = false)]
    pub graphs_only: bool,

    #[arg(long)]
    pub graph_name: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    #[arg(long, default_value = "../rangeSearch/vamanaRange")]
    pub engine_dir: PathBuf,

    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[arg(long = "max-degree", default_value_t = DEFAULT_MAX_DEGREE)]
    pub max_degree: u32,

    #[arg(long = "beam-width", default_value_t = DEFAULT_BEAM_WIDTH)]
    pub beam_width: u32,

    #[arg(long, default_value_t = DEFAULT_SOFT_FAILURE_EXIT_CODE)]
    pub soft_fail_exit_code: i32,

    /// Additional dataset whose ratio distances are shown as `2 - v`
    #[arg(long = "complement-ratio")]
    pub complement_ratio: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DatasetsArgs {
    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

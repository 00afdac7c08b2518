mod command;
mod runner;

pub use command::{BuildParams, DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEGREE};
pub use runner::{
    DEFAULT_SOFT_FAILURE_EXIT_CODE, ExperimentRunner, RunOutcome, RunnerSettings, SystemExecutor,
};

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::command::{BuildParams, Invocation, build_invocation};
use crate::error::HarnessError;
use crate::model::ExperimentType;
use crate::registry::DatasetRegistry;
use crate::util::open_append;

pub const DEFAULT_SOFT_FAILURE_EXIT_CODE: i32 = 1;

/// Decoded termination state of an engine process.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProcessStatus {
    Success,
    Exited(i32),
    /// Ended without an exit code, e.g. killed by a signal.
    Terminated,
}

impl ProcessStatus {
    fn describe(self) -> String {
        match self {
            Self::Success => "exit code 0".to_string(),
            Self::Exited(code) => format!("exit code {code}"),
            Self::Terminated => "terminated without exit code".to_string(),
        }
    }
}

/// Runs one engine command to completion with stdout and stderr appended to
/// `log`.
pub trait ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation, log: File) -> Result<ProcessStatus>;
}

/// Spawns the engine as a child process and blocks until it exits. There is
/// no deadline.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(&mut self, invocation: &Invocation, log: File) -> Result<ProcessStatus> {
        let stderr_log = log
            .try_clone()
            .context("failed to duplicate log handle for stderr")?;

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(stderr_log))
            .status()
            .with_context(|| format!("failed to execute {}", invocation.program.display()))?;

        Ok(match status.code() {
            Some(0) => ProcessStatus::Success,
            Some(code) => ProcessStatus::Exited(code),
            None => ProcessStatus::Terminated,
        })
    }
}

/// Command strings already executed by one runner.
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    seen: HashSet<String>,
}

impl ExecutionTracker {
    /// Records `command`; returns false if it was recorded before.
    pub fn claim(&mut self, command: &str) -> bool {
        self.seen.insert(command.to_string())
    }

    /// Forgets `command` so a later run may start it again.
    pub fn release(&mut self, command: &str) {
        self.seen.remove(command);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub command: String,
    pub status: ProcessStatus,
    pub log_path: PathBuf,
}

impl RunResult {
    pub fn succeeded(&self) -> bool {
        self.status == ProcessStatus::Success
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    AlreadyRan { command: String },
    Executed(RunResult),
}

#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub engine_dir: PathBuf,
    pub build_params: BuildParams,
    pub soft_failure_exit_code: i32,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            engine_dir: PathBuf::from("../rangeSearch/vamanaRange"),
            build_params: BuildParams::default(),
            soft_failure_exit_code: DEFAULT_SOFT_FAILURE_EXIT_CODE,
        }
    }
}

pub struct ExperimentRunner<'a, E: ProcessExecutor> {
    registry: &'a DatasetRegistry,
    settings: RunnerSettings,
    executor: E,
    tracker: ExecutionTracker,
}

impl<'a, E: ProcessExecutor> ExperimentRunner<'a, E> {
    pub fn new(registry: &'a DatasetRegistry, settings: RunnerSettings, executor: E) -> Self {
        Self::with_tracker(registry, settings, executor, ExecutionTracker::default())
    }

    pub fn with_tracker(
        registry: &'a DatasetRegistry,
        settings: RunnerSettings,
        executor: E,
        tracker: ExecutionTracker,
    ) -> Self {
        Self {
            registry,
            settings,
            executor,
            tracker,
        }
    }

    pub fn tracker(&self) -> &ExecutionTracker {
        &self.tracker
    }

    pub fn run(
        &mut self,
        dataset: &str,
        experiment: ExperimentType,
        log_path: &Path,
    ) -> Result<RunOutcome> {
        let config = self.registry.get(dataset)?;
        let invocation = build_invocation(
            &self.settings.engine_dir,
            config,
            experiment,
            self.settings.build_params,
        );
        let command = invocation.command_line();

        if !self.tracker.claim(&command) {
            info!(dataset, experiment = %experiment, "command already ran; skipping");
            return Ok(RunOutcome::AlreadyRan { command });
        }

        info!(command = %command, log = %log_path.display(), "running experiment");

        let mut log = open_append(log_path)?;
        writeln!(log, "{command}")
            .with_context(|| format!("failed to write command to {}", log_path.display()))?;
        log.flush()
            .with_context(|| format!("failed to flush {}", log_path.display()))?;

        // A launch failure never reached the engine; release the claim so the
        // command is not reported as already ran.
        let status = match self.executor.execute(&invocation, log) {
            Ok(status) => status,
            Err(err) => {
                self.tracker.release(&command);
                return Err(err.context(HarnessError::RunAborted {
                    command,
                    status: "failed to start".to_string(),
                }));
            }
        };
        match status {
            ProcessStatus::Success => {
                info!(dataset, experiment = %experiment, "experiment finished");
            }
            ProcessStatus::Exited(code) if code == self.settings.soft_failure_exit_code => {
                warn!(command = %command, exit_code = code, "Failed");
            }
            other => {
                return Err(HarnessError::RunAborted {
                    command,
                    status: other.describe(),
                }
                .into());
            }
        }

        Ok(RunOutcome::Executed(RunResult {
            command,
            status,
            log_path: log_path.to_path_buf(),
        }))
    }
}

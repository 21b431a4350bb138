use std::time::{Duration, Instant};

use log::{error, info};

use crate::config::{Mode, RunOptions};
use crate::error::Result;
use crate::runner::{OutcomeSummary, Spawner, Strategy, WorkerOutcome};
use crate::transport::Transport;

/// Aggregate result of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub mode: Mode,
    /// Requests for scc and mcc, clients for pcc.
    pub total: usize,
    pub elapsed: Duration,
    pub workers: Option<Vec<WorkerOutcome>>,
}

impl RunResult {
    pub fn summary(&self) -> Option<OutcomeSummary> {
        self.workers.as_deref().map(OutcomeSummary::from)
    }

    pub fn report(&self) {
        if let Some(summary) = self.summary() {
            println!(
                "Workers: {} total, {} completed, {} timed out, {} crashed",
                summary.total(),
                summary.completed,
                summary.timed_out,
                summary.crashed
            );
        }

        println!("Execution finished in {} seconds", self.elapsed.as_secs_f64());
    }
}

/// Drives one strategy against the target and times it.
pub struct Orchestrator<T, S> {
    transport: T,
    spawner: S,
    options: RunOptions,
}

impl<T: Transport, S: Spawner> Orchestrator<T, S> {
    pub fn new(transport: T, spawner: S, options: RunOptions) -> Self {
        Self {
            transport,
            spawner,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /**
     * Runs the strategy and reports the wall-clock duration. Errors from scc and mcc are
     * returned as-is, there are no retries. pcc never fails here, its worker outcomes
     * are part of the result.
     */
    pub async fn run(&self, strategy: &Strategy) -> Result<RunResult> {
        info!(
            "Running {} with {} {}",
            strategy.mode(),
            strategy.total(),
            unit(strategy.mode())
        );

        let start = Instant::now();
        let result = strategy.run(&self.transport, &self.spawner, &self.options).await;
        let elapsed = start.elapsed();

        match result {
            Ok(workers) => {
                let result = RunResult {
                    mode: strategy.mode(),
                    total: strategy.total(),
                    elapsed,
                    workers,
                };
                result.report();
                Ok(result)
            }
            Err(e) => {
                error!("Execution aborted after {} seconds", elapsed.as_secs_f64());
                Err(e)
            }
        }
    }
}

fn unit(mode: Mode) -> &'static str {
    match mode {
        Mode::Pcc => "clients",
        Mode::Scc | Mode::Mcc => "requests",
    }
}

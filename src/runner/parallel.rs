use std::fmt;

use log::{info, warn};

use crate::config::RunOptions;
use crate::endpoint::Endpoint;
use crate::runner::worker::{Spawner, WorkerJob};

/// Terminal status of one pcc worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerOutcome {
    Completed,
    TimedOut,
    Crashed,
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::Completed => write!(f, "completed"),
            WorkerOutcome::TimedOut => write!(f, "timed out"),
            WorkerOutcome::Crashed => write!(f, "crashed"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub completed: usize,
    pub timed_out: usize,
    pub crashed: usize,
}

impl OutcomeSummary {
    pub fn total(&self) -> usize {
        self.completed + self.timed_out + self.crashed
    }
}

impl From<&[WorkerOutcome]> for OutcomeSummary {
    fn from(outcomes: &[WorkerOutcome]) -> Self {
        outcomes
            .iter()
            .fold(OutcomeSummary::default(), |mut summary, outcome| {
                match outcome {
                    WorkerOutcome::Completed => summary.completed += 1,
                    WorkerOutcome::TimedOut => summary.timed_out += 1,
                    WorkerOutcome::Crashed => summary.crashed += 1,
                }
                summary
            })
    }
}

/// Fans a run out over `client_count` independent workers, each running its own single
/// session runner with `requests_per_client` requests.
#[derive(Clone, Debug)]
pub struct ParallelClientRunner {
    endpoint: Endpoint,
    client_count: usize,
    requests_per_client: usize,
}

impl ParallelClientRunner {
    pub fn new(endpoint: Endpoint, client_count: usize, requests_per_client: usize) -> Self {
        Self {
            endpoint,
            client_count,
            requests_per_client,
        }
    }

    pub fn client_count(&self) -> usize {
        self.client_count
    }

    pub fn jobs(&self, options: &RunOptions) -> Vec<WorkerJob> {
        (0..self.client_count)
            .map(|index| {
                WorkerJob::new(
                    index,
                    self.endpoint.clone(),
                    self.requests_per_client,
                    options.clone(),
                )
            })
            .collect()
    }

    /**
     * Starts every worker, then joins every worker. No failure stops the fan-out or the
     * join, a worker that could not be started is reported as crashed. Outcomes are
     * returned in worker order.
     */
    pub async fn run<S: Spawner>(&self, spawner: &S, options: &RunOptions) -> Vec<WorkerOutcome> {
        let mut handles = Vec::with_capacity(self.client_count);

        for job in self.jobs(options) {
            let index = job.index;
            match spawner.start(job) {
                Ok(handle) => handles.push(Some(handle)),
                Err(e) => {
                    warn!("Failed to start worker {}: {}", index, e);
                    handles.push(None);
                }
            }
        }

        info!("Started {} workers", handles.iter().flatten().count());

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = match handle {
                Some(handle) => spawner.join(handle).await,
                None => WorkerOutcome::Crashed,
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

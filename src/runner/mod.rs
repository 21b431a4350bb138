pub mod multi;
pub mod parallel;
pub mod single;
pub mod worker;

pub use multi::MultiSessionRunner;
pub use parallel::{OutcomeSummary, ParallelClientRunner, WorkerOutcome};
pub use single::SingleSessionRunner;
pub use worker::{run_worker, ProcessSpawner, Spawner, WorkerJob, WORKER_TIMED_OUT_EXIT};

use crate::config::{Mode, RunOptions};
use crate::corpus::build_corpus;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transport::Transport;

/// The execution strategy of a run, chosen once from the mode flag.
#[derive(Clone, Debug)]
pub enum Strategy {
    Single(SingleSessionRunner),
    Multi(MultiSessionRunner),
    Parallel(ParallelClientRunner),
}

impl Strategy {
    /// `n` is the request count for scc and mcc and the client count for pcc.
    pub fn new(mode: Mode, endpoint: Endpoint, n: usize, requests_per_client: usize) -> Self {
        match mode {
            Mode::Scc => Strategy::Single(SingleSessionRunner::new(endpoint, build_corpus(n))),
            Mode::Mcc => Strategy::Multi(MultiSessionRunner::new(endpoint, build_corpus(n))),
            Mode::Pcc => {
                Strategy::Parallel(ParallelClientRunner::new(endpoint, n, requests_per_client))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Strategy::Single(_) => Mode::Scc,
            Strategy::Multi(_) => Mode::Mcc,
            Strategy::Parallel(_) => Mode::Pcc,
        }
    }

    /// Requests issued for scc and mcc, clients started for pcc.
    pub fn total(&self) -> usize {
        match self {
            Strategy::Single(runner) => runner.corpus().len(),
            Strategy::Multi(runner) => runner.corpus().len(),
            Strategy::Parallel(runner) => runner.client_count(),
        }
    }

    /// Worker outcomes are only produced by the parallel strategy.
    pub async fn run<T, S>(
        &self,
        transport: &T,
        spawner: &S,
        options: &RunOptions,
    ) -> Result<Option<Vec<WorkerOutcome>>>
    where
        T: Transport,
        S: Spawner,
    {
        match self {
            Strategy::Single(runner) => runner.run(transport, options).await.map(|_| None),
            Strategy::Multi(runner) => runner.run(transport, options).await.map(|_| None),
            Strategy::Parallel(runner) => Ok(Some(runner.run(spawner, options).await)),
        }
    }
}

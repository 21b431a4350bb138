use std::path::PathBuf;
use std::process::ExitCode;

use async_trait::async_trait;
use log::{info, warn};
use tokio::process::{Child, Command};

use crate::config::RunOptions;
use crate::corpus::build_corpus;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::runner::parallel::WorkerOutcome;
use crate::runner::single::SingleSessionRunner;
use crate::transport::Transport;

/// Exit status of a worker process whose session timed out.
pub const WORKER_TIMED_OUT_EXIT: u8 = 3;

/// Everything a worker needs to build and drive its own runner.
#[derive(Clone, Debug)]
pub struct WorkerJob {
    pub index: usize,
    pub endpoint: Endpoint,
    pub requests: usize,
    pub options: RunOptions,
}

impl WorkerJob {
    pub fn new(index: usize, endpoint: Endpoint, requests: usize, options: RunOptions) -> Self {
        Self {
            index,
            endpoint,
            requests,
            options,
        }
    }

    /// Arguments that make this binary run the job in worker mode.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.endpoint.url(),
            "--worker".to_string(),
            self.index.to_string(),
            "--requests".to_string(),
            self.requests.to_string(),
        ];
        args.extend(self.options.to_args());
        args
    }
}

/**
 * Worker entrypoint. Builds a fresh corpus and a single session runner and drives it to
 * completion. A timeout is caught here and reported as `TimedOut`, every other error is
 * handed back so the worker terminates abnormally.
 */
pub async fn run_worker<T: Transport>(job: &WorkerJob, transport: &T) -> Result<WorkerOutcome> {
    let runner = SingleSessionRunner::new(job.endpoint.clone(), build_corpus(job.requests));

    match runner.run(transport, &job.options).await {
        Ok(()) => {
            info!("Worker {} completed {} requests", job.index, job.requests);
            Ok(WorkerOutcome::Completed)
        }
        Err(e) if e.is_timeout() => {
            warn!("Worker {}: {}", job.index, e);
            println!("Worker {} timed out", job.index);
            Ok(WorkerOutcome::TimedOut)
        }
        Err(e) => Err(e),
    }
}

impl WorkerOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            WorkerOutcome::Completed => ExitCode::SUCCESS,
            WorkerOutcome::TimedOut => ExitCode::from(WORKER_TIMED_OUT_EXIT),
            WorkerOutcome::Crashed => ExitCode::FAILURE,
        }
    }

    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => WorkerOutcome::Completed,
            Some(code) if code == i32::from(WORKER_TIMED_OUT_EXIT) => WorkerOutcome::TimedOut,
            _ => WorkerOutcome::Crashed,
        }
    }
}

/// Starts workers and waits for them to terminate.
#[async_trait]
pub trait Spawner: Send + Sync {
    type Handle: Send;

    fn start(&self, job: WorkerJob) -> Result<Self::Handle>;

    async fn join(&self, handle: Self::Handle) -> WorkerOutcome;
}

/// Runs every worker as a child process of `program`, normally this very binary.
#[derive(Clone, Debug)]
pub struct ProcessSpawner {
    program: PathBuf,
}

impl ProcessSpawner {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }
}

#[async_trait]
impl Spawner for ProcessSpawner {
    type Handle = (usize, Child);

    fn start(&self, job: WorkerJob) -> Result<(usize, Child)> {
        let child = Command::new(&self.program).args(job.args()).spawn()?;
        Ok((job.index, child))
    }

    async fn join(&self, handle: (usize, Child)) -> WorkerOutcome {
        let (index, mut child) = handle;
        match child.wait().await {
            Ok(status) => {
                let outcome = WorkerOutcome::from_exit_code(status.code());
                if outcome == WorkerOutcome::Crashed {
                    warn!("Worker {} terminated abnormally: {}", index, status);
                }
                outcome
            }
            Err(e) => {
                warn!("Failed to wait for worker {}: {}", index, e);
                WorkerOutcome::Crashed
            }
        }
    }
}

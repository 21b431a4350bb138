#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use wsrpc_stress::endpoint::Endpoint;
use wsrpc_stress::error::{HarnessError, Result};
use wsrpc_stress::runner::{run_worker, Spawner, WorkerJob, WorkerOutcome};
use wsrpc_stress::transport::{Connection, Transport};

pub const RESPONSE: &str = r#"{"jsonrpc":"2.0","id":2,"result":null}"#;

/// Call numbers are 1-based and counted across every connection of the transport.
#[derive(Clone, Debug, Default)]
pub struct Script {
    pub fail_connect: Option<usize>,
    pub hang_on_send: Option<usize>,
    pub hang_on_receive: Option<usize>,
    pub break_on_receive: Option<usize>,
    pub response_delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Record {
    pub connects: usize,
    pub closes: usize,
    pub sent: Vec<String>,
    pub received: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Script,
    record: Arc<Mutex<Record>>,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            record: Arc::new(Mutex::new(Record::default())),
        }
    }

    pub fn connects(&self) -> usize {
        self.record.lock().unwrap().connects
    }

    pub fn closes(&self) -> usize {
        self.record.lock().unwrap().closes
    }

    pub fn sent(&self) -> Vec<String> {
        self.record.lock().unwrap().sent.clone()
    }

    pub fn received(&self) -> usize {
        self.record.lock().unwrap().received
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    type Conn = ScriptedConnection;

    async fn connect(&self, endpoint: &Endpoint) -> Result<ScriptedConnection> {
        let attempt = {
            let mut record = self.record.lock().unwrap();
            record.connects += 1;
            record.connects
        };

        if self.script.fail_connect == Some(attempt) {
            return Err(HarnessError::Connect(format!("{}: refused", endpoint)));
        }

        Ok(ScriptedConnection {
            script: self.script.clone(),
            record: Arc::clone(&self.record),
        })
    }
}

pub struct ScriptedConnection {
    script: Script,
    record: Arc<Mutex<Record>>,
}

impl ScriptedConnection {
    fn calls(&self) -> usize {
        self.record.lock().unwrap().sent.len()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.script.hang_on_send == Some(self.calls() + 1) {
            std::future::pending::<()>().await;
        }

        self.record.lock().unwrap().sent.push(text);
        Ok(())
    }

    async fn recv_text(&mut self) -> Result<String> {
        let call = self.calls();

        if self.script.hang_on_receive == Some(call) {
            std::future::pending::<()>().await;
        }

        if self.script.break_on_receive == Some(call) {
            return Err(HarnessError::Transport("Connection reset".to_string()));
        }

        if let Some(delay) = self.script.response_delay {
            tokio::time::sleep(delay).await;
        }

        self.record.lock().unwrap().received += 1;
        Ok(RESPONSE.to_string())
    }

    async fn close(&mut self) -> Result<()> {
        self.record.lock().unwrap().closes += 1;
        Ok(())
    }
}

pub fn endpoint() -> Endpoint {
    "ws://127.0.0.1:35998".parse().unwrap()
}

/// Runs every worker on its own OS thread with its own current-thread runtime. The
/// transport for each worker is picked by its index.
pub struct ThreadSpawner<F> {
    transport_for: F,
}

impl<F> ThreadSpawner<F>
where
    F: Fn(usize) -> ScriptedTransport + Send + Sync,
{
    pub fn new(transport_for: F) -> Self {
        Self { transport_for }
    }
}

#[async_trait]
impl<F> Spawner for ThreadSpawner<F>
where
    F: Fn(usize) -> ScriptedTransport + Send + Sync,
{
    type Handle = std::thread::JoinHandle<Result<WorkerOutcome>>;

    fn start(&self, job: WorkerJob) -> Result<Self::Handle> {
        let transport = (self.transport_for)(job.index);

        Ok(std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(run_worker(&job, &transport))
        }))
    }

    async fn join(&self, handle: Self::Handle) -> WorkerOutcome {
        let joined = tokio::task::spawn_blocking(move || handle.join()).await;

        match joined {
            Ok(Ok(Ok(outcome))) => outcome,
            _ => WorkerOutcome::Crashed,
        }
    }
}

/// A spawner that cannot start anything.
pub struct BrokenSpawner;

#[async_trait]
impl Spawner for BrokenSpawner {
    type Handle = ();

    fn start(&self, _job: WorkerJob) -> Result<()> {
        Err(HarnessError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such program",
        )))
    }

    async fn join(&self, _handle: ()) -> WorkerOutcome {
        WorkerOutcome::Completed
    }
}

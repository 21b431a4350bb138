use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::endpoint::Endpoint;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Many clients, one fresh connection per request
    Mcc,
    /// One client, all requests over a single connection
    Scc,
    /// Many parallel client processes, each running scc
    Pcc,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Mcc => write!(f, "mcc"),
            Mode::Scc => write!(f, "scc"),
            Mode::Pcc => write!(f, "pcc"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "wsrpc-stress")]
#[command(about = "Exercise a JSON-RPC websocket endpoint with some stresstest", long_about = None)]
pub struct Cli {
    /// Address+port of the target (ex. wss://my.domain:443)
    #[arg(env = "WSRPC_STRESS_HOST", value_parser = parse_endpoint)]
    pub host: Endpoint,

    /// Execution strategy
    #[arg(short, long, env = "WSRPC_STRESS_MODE", value_enum, default_value_t = Mode::Scc)]
    pub mode: Mode,

    /// Amount of requests for scc and mcc, amount of clients for pcc
    #[arg(short, long, env = "WSRPC_STRESS_N", default_value_t = 100)]
    pub n: usize,

    /// Requests per client, only used by pcc
    #[arg(short, long, env = "WSRPC_STRESS_REQUESTS", default_value_t = 100)]
    pub requests: usize,

    /// Bound on every single send and every single receive, in milliseconds
    #[arg(long, env = "WSRPC_STRESS_TIMEOUT_MS", default_value_t = 2000)]
    pub timeout_ms: u64,

    /// Bound on the websocket handshake, in milliseconds
    #[arg(long, env = "WSRPC_STRESS_CONNECT_TIMEOUT_MS", default_value_t = 10000)]
    pub connect_timeout_ms: u64,

    /// Output requests and responses
    #[arg(short, long)]
    pub verbose: bool,

    /// Run as worker INDEX of a pcc parent process
    #[arg(long, hide = true, value_name = "INDEX")]
    pub worker: Option<usize>,
}

fn parse_endpoint(s: &str) -> Result<Endpoint, String> {
    s.parse::<Endpoint>().map_err(|e| e.to_string())
}

impl Cli {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            verbose: self.verbose,
        }
    }
}

/// Settings shared by every runner and session of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub verbose: bool,
}

impl RunOptions {
    /// Command line arguments that reproduce these options in a worker process.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--timeout-ms".to_string(),
            self.timeout.as_millis().to_string(),
            "--connect-timeout-ms".to_string(),
            self.connect_timeout.as_millis().to_string(),
        ];

        if self.verbose {
            args.push("--verbose".to_string());
        }

        args
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            verbose: false,
        }
    }
}

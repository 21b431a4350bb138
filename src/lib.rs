pub mod config;
pub mod corpus;
pub mod endpoint;
pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod session;
pub mod transport;

pub use config::{Cli, Mode, RunOptions};
pub use endpoint::{Endpoint, Scheme};
pub use error::{HarnessError, Operation, Result};
pub use orchestrator::{Orchestrator, RunResult};
pub use runner::Strategy;

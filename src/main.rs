use std::process::ExitCode;

use clap::Parser;
use log::error;

use wsrpc_stress::orchestrator::Orchestrator;
use wsrpc_stress::runner::{run_worker, ProcessSpawner, Strategy, WorkerJob};
use wsrpc_stress::transport::WsTransport;
use wsrpc_stress::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    console_subscriber::init();

    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    let options = cli.options();
    let transport = WsTransport::new();

    if let Some(index) = cli.worker {
        let job = WorkerJob::new(index, cli.host, cli.requests, options);

        return match run_worker(&job, &transport).await {
            Ok(outcome) => outcome.exit_code(),
            Err(e) => {
                error!("Worker {} failed: {}", index, e);
                ExitCode::FAILURE
            }
        };
    }

    println!(
        "{}, {}, {}, {}, {}",
        cli.host, cli.mode, cli.n, cli.requests, cli.verbose
    );

    let spawner = match ProcessSpawner::current_exe() {
        Ok(spawner) => spawner,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let strategy = Strategy::new(cli.mode, cli.host, cli.n, cli.requests);
    let orchestrator = Orchestrator::new(transport, spawner, options);

    match orchestrator.run(&strategy).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

use clap::ArgMatches;
use error::CliResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;
mod resource_fields;
mod shell;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = shell::build_cli().get_matches();

    init_tracing(shell::verbosity(&matches));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(matches: &ArgMatches) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    shell::run(matches, &mut stdout).await
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "sample=warn,sample_client=warn,sample_core=warn",
            1 => "sample=info,sample_client=info,sample_core=info",
            2 => "sample=debug,sample_client=debug,sample_core=debug",
            _ => "sample=trace,sample_client=trace,sample_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

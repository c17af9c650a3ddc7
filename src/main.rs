use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gatenet_sandbox::app;
use gatenet_sandbox::cli::Cli;
use gatenet_sandbox::output::OutputWriter;
use gatenet_sandbox::sandbox::{
    DeadlineFacade, Delay, LatencyProfile, MockNetworkFacade, MockTables, NoDelay, TokioDelay,
};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output_writer = OutputWriter::new(cli.output_format, cli.output_file.clone())?;

    let tables = match MockTables::discover(cli.tables.as_deref()) {
        Ok(tables) => tables,
        Err(e) => {
            output_writer.write_error("config", &e)?;
            std::process::exit(2);
        }
    };

    let delay: Arc<dyn Delay> = if cli.no_delay {
        Arc::new(NoDelay)
    } else {
        Arc::new(TokioDelay)
    };
    let latency = LatencyProfile::default().scaled(cli.latency_scale);
    let facade = DeadlineFacade::new(
        MockNetworkFacade::new(tables, latency, delay),
        cli.timeout.map(Duration::from_millis),
    );

    let operation = cli.command.operation();
    let pb = output_writer.loading(operation);
    let outcome = app::execute(&cli.command, &facade).await;
    pb.finish_and_clear();

    match outcome {
        Ok(report) => output_writer.write(&report)?,
        Err(e) => {
            output_writer.write_error(operation, &e)?;
            std::process::exit(1);
        }
    }

    Ok(())
}

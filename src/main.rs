mod aggregator;
mod config;
mod prober;
mod report;
mod util;

use aggregator::Aggregator;
use clap::Parser;
use config::{Cli, LogFormat, TARGETS};
use report::Reporter;

use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only the report
    let filter = EnvFilter::new(format!(
        "reachability_probe={}",
        cli.log_level.as_str().to_lowercase()
    ));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    info!(
        "probing {} targets, timeout {}s",
        TARGETS.len(),
        cli.timeout
    );

    let mut reporter = Reporter::new(std::io::stdout().lock(), cli.output_mode(), cli.timeout);
    reporter.banner()?;

    let summary = Aggregator::new(cli.timeout)
        .run_observed(&TARGETS, &mut reporter)
        .await;
    reporter.take_error()?;
    reporter.summary(&summary)?;

    let status = summary.status();
    info!(
        "{}/{} targets reachable, exiting with {:?}",
        summary.success_count(),
        summary.total_count(),
        status
    );
    Ok(ExitCode::from(status.exit_code()))
}

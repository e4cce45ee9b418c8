//! playerstat - status reporting daemon entry point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use playerstat_cli::{
    cli::{Cli, Commands},
    run_cycle, run_until, AppConfig, DryRunTransport, Overrides, Result,
};
use playerstat_core::{Severity, StatusLogSink, StatusReporter, StatusState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    if cli.command == Commands::ExampleConfig {
        print!("{}", AppConfig::example_config());
        return Ok(());
    }

    // Load configuration
    let config = load_configuration(&cli)?;

    // Initialize logging
    setup_logging(config.logging.verbose, config.logging.show_target);

    // Build the shared status context
    let state = Arc::new(StatusState::from_config(&config.status));
    let reporter = Arc::new(
        StatusReporter::new(Arc::clone(&state), config.status.clone())
            .with_logger(Arc::new(StatusLogSink::new(Arc::clone(&state)))),
    );
    let transport = DryRunTransport::new(config.status.xmds_url.clone());

    match cli.command {
        Commands::Show => {
            let snapshot = reporter.snapshot();
            println!("{}", snapshot.render_for_file()?);
            println!("{}", snapshot.render_for_notification()?);
        }
        Commands::Once => {
            std::fs::create_dir_all(&config.status.library_path)?;
            let report = run_cycle(&reporter, &transport).await?;
            info!(?report, "Status cycle finished");
        }
        Commands::Run { .. } => {
            std::fs::create_dir_all(&config.status.library_path)?;
            state.append_log("[playerstat] Status reporting started", Severity::Audit);

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Shutdown requested");
            };
            run_until(reporter, &transport, config.status.status_interval(), shutdown).await?;
        }
        Commands::ExampleConfig => {}
    }

    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool, show_target: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(show_target)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or the standard sources
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    let overrides = Overrides {
        library: cli.library.clone(),
        status_interval_secs: match cli.command {
            Commands::Run { interval } => interval,
            _ => None,
        },
        verbose: cli.verbose,
    };

    match &cli.config {
        Some(path) => AppConfig::load_from_file(path, &overrides),
        None => AppConfig::load(&overrides),
    }
}

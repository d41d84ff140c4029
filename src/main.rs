//! price_watch - Main Entry Point
//!
//! Console front end: reads `/track`, `/list`, `/stop` commands from stdin
//! for a single owner while the polling scheduler runs in the background.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use price_watch::common::channels::create_message_channel;
use price_watch::config::load_config;
use price_watch::{
    ChannelNotifier, CommandHandler, ExtractionPipeline, HttpFetcher, OwnerId, PollingScheduler,
    WatchRegistry,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "PRICE_WATCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Owner id the console session acts as
    #[arg(long, default_value = "console")]
    owner: String,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;

    // Initialize logging
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.settings.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting price_watch");
    info!("Configuration file: {}", args.config);

    let registry = Arc::new(WatchRegistry::new());
    let fetcher = Arc::new(HttpFetcher::from_config(&config.fetcher)?);
    let pipeline = Arc::new(ExtractionPipeline::standard()?);
    let (alert_tx, mut alert_rx) = create_message_channel();

    let scheduler = PollingScheduler::new(
        registry.clone(),
        fetcher.clone(),
        Arc::new(ChannelNotifier::new(alert_tx)),
        pipeline.clone(),
        config.scheduler.clone(),
    )
    .with_currency_label(config.alerts.currency_label.clone());

    let handler = CommandHandler::new(
        registry.clone(),
        fetcher,
        pipeline,
        config.alerts.currency_label.clone(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    // Alerts end when the scheduler drops its notifier
    let printer_task = tokio::spawn(async move {
        while let Some(message) = alert_rx.recv().await {
            println!("[alert for {}] {}", message.owner_id, message.text);
        }
    });

    let owner = OwnerId::new(args.owner);
    info!("Application initialized, reading commands for owner {}", owner);
    println!("{}", handler.handle(&owner, "/start").await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => println!("{}", handler.handle(&owner, &line).await),
                    Ok(None) => {
                        info!("Input closed, shutting down");
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, cleaning up...");
                break;
            }
        }
    }

    shutdown_tx.send(true).ok();
    scheduler_task.await?;
    printer_task.await?;

    info!("Stopped with {} active watches", registry.len().await);
    Ok(())
}

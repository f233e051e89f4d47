//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `page_hygiene` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use page_hygiene::app::{print_listing, print_summary};
use page_hygiene::config::{Cli, Command, ListArgs, ShowArgs};
use page_hygiene::initialization::init_logger_with;
use page_hygiene::{find_report, list_reports, open_report_store, run_scan, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match &cli.command {
        Command::Scan(args) => {
            let config = Config::from_scan_args(args, cli.db_path.clone());
            scan(config, args.json).await
        }
        Command::Show(args) => show(&cli, args).await,
        Command::List(args) => list(&cli, args).await,
    };

    if let Err(e) = result {
        eprintln!("page_hygiene error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn scan(config: Config, json: bool) -> Result<()> {
    let outcome = run_scan(config).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print_summary(&outcome.key, &outcome.report);
    }
    Ok(())
}

async fn show(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let store = open_report_store(&cli.db_path).await?;
    match find_report(&store, &args.key).await? {
        Some((_, report)) if args.json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Some((key, report)) => {
            print_summary(&key, &report);
            Ok(())
        }
        None => anyhow::bail!("No stored report for '{}'", args.key),
    }
}

async fn list(cli: &Cli, args: &ListArgs) -> Result<()> {
    let store = open_report_store(&cli.db_path).await?;
    let entries = list_reports(&store, args.prefix.as_deref()).await?;
    print_listing(&entries);
    Ok(())
}

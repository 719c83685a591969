//! spotwatt CLI - Electricity day-ahead prices against dynamic retail tariffs.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use spotwatt_lib::{Config, PanelKind};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

use display::Format;

#[derive(Parser)]
#[command(name = "spotwatt")]
#[command(about = "Electricity day-ahead prices against dynamic retail tariffs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no spinner)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and chart all panels for a day
    Show {
        /// Delivery day (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Bidding zone code or EIC (e.g., DE-LU, nl)
        #[arg(short, long)]
        zone: Option<String>,
    },

    /// Step through days interactively
    Browse {
        /// First day to show (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Bidding zone code or EIC
        #[arg(short, long)]
        zone: Option<String>,
    },

    /// Write one panel's chart data
    Export {
        /// Panel to export (day-ahead, day-ahead-next, retail, combined, day-ahead-delta)
        #[arg(short, long)]
        panel: PanelKind,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Text formats go to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delivery day (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Bidding zone code or EIC
        #[arg(short, long)]
        zone: Option<String>,

        /// Write the plain series (timestamp, ct/kWh) instead of chart rows
        #[arg(long)]
        raw: bool,
    },

    /// List bidding zones
    Zones {
        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config_found = config_path.is_file();
    let config = Config::load(&config_path)
        .context("Failed to load configuration")?
        .with_env_overrides();

    // The log level comes from the config, so loading is reported afterwards.
    logging::init_logging(&logging::level_for(
        cli.verbose,
        cli.quiet,
        &config.log_level,
    ))?;
    if config_found {
        tracing::debug!(path = %config_path.display(), "Configuration loaded");
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
    }

    match command {
        Commands::Show { date, zone } => {
            commands::show::show(&config, date.as_deref(), zone.as_deref(), cli.quiet).await
        }
        Commands::Browse { date, zone } => {
            commands::browse::browse(&config, date.as_deref(), zone.as_deref(), cli.quiet).await
        }
        Commands::Export {
            panel,
            format,
            output,
            date,
            zone,
            raw,
        } => {
            commands::export::export(
                &config,
                panel,
                format,
                output,
                date.as_deref(),
                zone.as_deref(),
                raw,
                cli.quiet,
            )
            .await
        }
        Commands::Zones { search } => commands::zones::list_zones(search.as_deref()),
        Commands::Config => commands::config::show_config(&config, &config_path),
    }
}

mod args;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use icsgen_core::config::IcsConfig;
use tracing_subscriber::EnvFilter;

use crate::args::EventArgs;

#[derive(Parser)]
#[command(name = "icsgen")]
#[command(about = "Generate iCalendar (.ics) files for single events")]
struct Cli {
    /// Log more (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an event to an .ics file
    New {
        #[command(flatten)]
        event: EventArgs,

        /// Output path; the extension is always replaced with ".ics"
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print an event's .ics document to stdout
    Show {
        #[command(flatten)]
        event: EventArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = IcsConfig::load()?;

    match cli.command {
        Commands::New { event, output } => commands::new::run(&config, event, output).await,
        Commands::Show { event } => commands::show::run(&config, event),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

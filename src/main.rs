mod client;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "weekboard")]
#[command(about = "See your week of meetings, the free time between them, and when everyone is free")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Your meetings for a week, with free time between them
    List {
        /// Any day of the week to show (YYYY-MM-DD), defaults to this week
        #[arg(short, long)]
        week: Option<String>,

        /// Read a saved dashboard response instead of calling the server
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,

        /// Refresh every N seconds
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Events of several calendars side by side
    Grid {
        /// Any day of the week to show (YYYY-MM-DD), defaults to this week
        #[arg(short, long)]
        week: Option<String>,

        /// Only show these calendars (uid or cid, repeatable)
        #[arg(short, long)]
        calendar: Vec<String>,

        /// Read a saved dashboard response instead of calling the server
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find time when everyone is free
    Free {
        /// Day to search (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        day: Option<String>,

        /// Users to include (repeatable); you are always included
        #[arg(short, long = "uid")]
        uids: Vec<String>,

        /// Read a saved free/busy response instead of calling the server
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print busy and free slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show config path and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::List {
            week,
            file,
            json,
            watch,
        } => commands::list::run(week, file, json, watch).await,
        Commands::Grid {
            week,
            calendar,
            file,
            json,
        } => commands::grid::run(week, calendar, file, json).await,
        Commands::Free {
            day,
            uids,
            file,
            json,
        } => commands::free::run(day, uids, file, json).await,
        Commands::Config => commands::config::run(),
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

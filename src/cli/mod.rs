pub mod view;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    tracker::start_tracker,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX, TRACKER_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Stechuhr", version, long_about = None)]
#[command(about = "Personal work-time tracker with mandatory break enforcement")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    log_console: bool,
    #[arg(long = "log-filter")]
    log: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Run the tracker in the current console")]
    Run {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Print the time log")]
    Log {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long, help = "Only show entries for this day (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
    },
    #[command(about = "Print recorded net hours grouped by week")]
    Week {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    match args.commands {
        Commands::Run { dir } => {
            let dir = dir.map_or_else(create_application_default_path, Ok)?;
            enable_logging(TRACKER_PREFIX, &dir, args.log, args.log_console)?;
            start_tracker(dir).await
        }
        Commands::Log { dir, date } => {
            let dir = dir.map_or_else(create_application_default_path, Ok)?;
            enable_logging(CLI_PREFIX, &dir, args.log, args.log_console)?;
            view::print_time_log(&dir, date).await
        }
        Commands::Week { dir } => {
            let dir = dir.map_or_else(create_application_default_path, Ok)?;
            enable_logging(CLI_PREFIX, &dir, args.log, args.log_console)?;
            view::print_weekly_hours(&dir).await
        }
    }
}

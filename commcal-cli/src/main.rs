mod commands;
mod config;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::GlobalConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "commcal")]
#[command(about = "Expand recurring community events and export them as calendar files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event definition file
    New {
        title: String,

        /// Start date or date-time (e.g. "2026-07-15" or "2026-07-15T18:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (mutually exclusive with --duration)
        #[arg(long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration from start (e.g. "90m", "2h", "3days")
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        organizer: Option<String>,

        /// Repeat frequency: daily, weekly, monthly, or yearly
        #[arg(short, long)]
        repeat: Option<String>,

        /// Repeat every N units of the frequency
        #[arg(long, default_value_t = 1)]
        every: u32,

        /// Stop after N occurrences (mutually exclusive with --until)
        #[arg(long, conflicts_with = "until")]
        count: Option<u32>,

        /// Last date an occurrence may start on (YYYY-MM-DD, inclusive)
        #[arg(long)]
        until: Option<String>,

        /// Directory to write the event file into (default: current dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// List the occurrences of events within a time window
    Expand {
        /// Event definition files (TOML)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Window start (YYYY-MM-DD, default: today)
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD, default: from + configured window days)
        #[arg(long)]
        to: Option<String>,

        /// Emit JSON instead of a formatted listing
        #[arg(long)]
        json: bool,

        /// Override the safety cap on generated occurrences per event
        #[arg(long)]
        max: Option<usize>,
    },
    /// Export occurrences within a time window as an .ics calendar
    Export {
        /// Event definition files (TOML)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Window start (YYYY-MM-DD, default: today)
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD, default: from + configured window days)
        #[arg(long)]
        to: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Calendar name stamped on the export
        #[arg(long)]
        calendar_name: Option<String>,

        /// Override the safety cap on generated occurrences per event
        #[arg(long)]
        max: Option<usize>,
    },
    /// List the events contained in an .ics file
    Import {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GlobalConfig::load()?;

    match cli.command {
        Commands::New {
            title,
            start,
            end,
            duration,
            description,
            organizer,
            repeat,
            every,
            count,
            until,
            output_dir,
        } => commands::new::run(
            title,
            &start,
            end.as_deref(),
            duration.as_deref(),
            description,
            organizer,
            repeat.as_deref(),
            every,
            count,
            until.as_deref(),
            output_dir,
        ),
        Commands::Expand {
            files,
            from,
            to,
            json,
            max,
        } => {
            let window = commands::resolve_window(from.as_deref(), to.as_deref(), config.window_days)?;
            commands::expand::run(&files, &window, max.unwrap_or(config.max_occurrences), json)
        }
        Commands::Export {
            files,
            from,
            to,
            output,
            calendar_name,
            max,
        } => {
            let window = commands::resolve_window(from.as_deref(), to.as_deref(), config.window_days)?;
            commands::export::run(
                &files,
                &window,
                max.unwrap_or(config.max_occurrences),
                output,
                calendar_name.unwrap_or(config.calendar_name),
            )
        }
        Commands::Import { file } => commands::import::run(&file),
    }
}

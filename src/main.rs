//! # calgrid
//!
//! A terminal calendar planner. calgrid lays tasks and alarms out on a daily,
//! weekly or monthly grid, lets you move tasks between slots, and tells you
//! which alarms are due.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! calgrid
//! # or with a plan snapshot
//! calgrid ui --plan plan.json
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   Arrows / `hjkl`: Move the cursor
//! *   `[` / `]`: Previous / next day, week or month
//! *   `1` / `2` / `3`: Daily / weekly / monthly view
//! *   `t`: Jump to today
//! *   `Tab`: Highlight the next item in the slot
//! *   `Enter`: Pick up the highlighted task, then `Enter` again to drop it
//! *   `Space`: Toggle completion
//! *   `a` / `A`: Add a task / an alarm
//! *   `D`: Toggle dark mode
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! calgrid days --view monthly --date 2025-06-11
//! calgrid agenda --plan plan.json --view weekly
//! calgrid reschedule --plan plan.json t1 2025-06-03T14:00 > moved.json
//! calgrid alarms --at 06:30
//! calgrid settings --dark-mode true --view daily
//! ```
//!
//! Without `--plan`, commands work on a built-in sample plan. Plans are read,
//! never written back; only settings are saved (to `CALGRID_CONFIG` or the
//! platform config directory).
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=calgrid=debug`) to see diagnostics on stderr.

use std::io;
use std::path::PathBuf;

use calgrid::commands::*;
use calgrid::config::{load_settings, plan_or_sample};
use calgrid::models::ViewMode;
use calgrid::tui::run_tui;
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Terminal calendar planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the days a view covers
    Days {
        /// Calendar view
        #[arg(short, long, value_enum, default_value_t = ViewMode::Weekly)]
        view: ViewMode,
        /// Anchor date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List scheduled tasks and alarms slot by slot
    Agenda {
        /// Plan snapshot (JSON)
        #[arg(short, long)]
        plan: Option<PathBuf>,
        /// Calendar view
        #[arg(short, long, value_enum, default_value_t = ViewMode::Weekly)]
        view: ViewMode,
        /// Anchor date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Move a task and print the updated plan
    Reschedule {
        /// Plan snapshot (JSON)
        #[arg(short, long)]
        plan: PathBuf,
        /// Task id
        id: String,
        /// New start, YYYY-MM-DDTHH:MM or YYYY-MM-DD
        target: String,
        /// Fail if the task does not exist
        #[arg(long)]
        strict: bool,
    },
    /// Show alarms due now
    Alarms {
        /// Plan snapshot (JSON)
        #[arg(short, long)]
        plan: Option<PathBuf>,
        /// Check this time of day (HH:MM) instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Today's progress and area statistics
    Overview {
        /// Plan snapshot (JSON)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },
    /// Show or change settings
    Settings {
        /// Enable or disable dark mode
        #[arg(long)]
        dark_mode: Option<bool>,
        /// Default calendar view
        #[arg(long, value_enum)]
        view: Option<ViewMode>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui {
        /// Plan snapshot (JSON)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Days { view, date }) => cmd_days(view, date),
        Some(Commands::Agenda { plan, view, date }) => cmd_agenda(plan.as_deref(), view, date),
        Some(Commands::Reschedule { plan, id, target, strict }) => cmd_reschedule(&plan, &id, &target, strict),
        Some(Commands::Alarms { plan, at }) => cmd_alarms(plan.as_deref(), at),
        Some(Commands::Overview { plan }) => cmd_overview(plan.as_deref()),
        Some(Commands::Settings { dark_mode, view }) => cmd_settings(dark_mode, view),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "calgrid", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui { plan }) => launch_ui(plan),
        None => launch_ui(None),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn launch_ui(plan: Option<PathBuf>) -> calgrid::error::PlanResult<()> {
    let planner = plan_or_sample(plan.as_deref(), Local::now().date_naive())?;
    run_tui(planner, load_settings())?;
    Ok(())
}

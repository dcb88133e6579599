//! # CLI Module
//!
//! Argument parsing, logging setup and command dispatch.

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use funnel_core::policy::DEFAULT_MAX_CALLBACKS;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Errors surfaced by CLI commands.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "funnel", version, about = "Sales pipeline transition resolver")]
pub struct Cli {
    /// JSON rule table to use instead of the standard funnel
    #[arg(long, global = true, env = "FUNNEL_RULES")]
    pub rules: Option<PathBuf>,

    /// Machine-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List funnel stages with their storage codes
    Stages,

    /// Print the rule table
    Rules {
        /// Only this stage
        #[arg(long)]
        stage: Option<String>,
    },

    /// Check whether a stage checklist is complete
    Check {
        #[arg(long)]
        stage: String,
        /// Ticked checklist item (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },

    /// Resolve the next stage for a contact result
    Resolve {
        #[arg(long)]
        stage: String,
        #[arg(long)]
        result: String,
        /// Ticked checklist item (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },

    /// List the results valid in a stage and where they lead
    Options {
        #[arg(long)]
        stage: String,
    },

    /// Check a manual board move
    Move {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Decide whether a callback request archives the lead
    Callback {
        /// Result code just recorded
        #[arg(long)]
        result: String,
        /// Matching entries in the lead history, the new one included
        #[arg(long)]
        recorded: u32,
        /// Callbacks allowed before archival
        #[arg(long, default_value_t = DEFAULT_MAX_CALLBACKS)]
        max: u32,
    },

    /// Load and validate a JSON rule table
    Validate { file: PathBuf },
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `-v`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        tracing::debug!(error = %e, "tracing subscriber already set");
    }
}

/// Run a parsed command line, writing results to stdout.
pub fn run(cli: &Cli) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch(cli, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Run a parsed command line against any writer.
pub fn dispatch(cli: &Cli, out: &mut dyn Write) -> CliResult<()> {
    let json = cli.json;
    let table = || load_rules(cli.rules.as_deref());

    match &cli.command {
        Commands::Stages => cmd_stages(out, json),
        Commands::Rules { stage } => {
            let table = table()?;
            cmd_rules(out, &table, stage.as_deref(), json)
        }
        Commands::Check { stage, items } => {
            let table = table()?;
            cmd_check(out, &table, stage, items, json)
        }
        Commands::Resolve {
            stage,
            result,
            items,
        } => {
            let table = table()?;
            cmd_resolve(out, &table, stage, result, items, json)
        }
        Commands::Options { stage } => {
            let table = table()?;
            cmd_options(out, &table, stage, json)
        }
        Commands::Move { from, to } => cmd_move(out, from, to, json),
        Commands::Callback {
            result,
            recorded,
            max,
        } => cmd_callback(out, result, *recorded, *max, json),
        Commands::Validate { file } => cmd_validate(out, file, json),
    }
}

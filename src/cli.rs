//! CLI argument definitions.
//!
//! Uses `clap` with derive macros.  Four subcommands:
//!
//! * `init`    — write the default `config.toml` and create the models dir.
//! * `check`   — print the resolved runtime configuration.
//! * `run`     — start the global-hotkey dictation daemon.
//! * `history` — print recent transcripts from the history log.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flowkey — a fully local, hotkey-driven dictation assistant.
#[derive(Parser, Debug)]
#[command(name = "flowkey", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the default configuration file and model directory.
    Init {
        /// Custom config path (defaults to the platform config dir).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Show the resolved runtime configuration.
    Check {
        /// Custom config path (defaults to the platform config dir).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run global hotkey dictation.
    Run {
        /// Custom config path (defaults to the platform config dir).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print recent transcription history, newest first.
    History {
        /// Maximum number of entries to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

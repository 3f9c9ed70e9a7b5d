//! Application entry point.
//!
//! # `run` startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Block on [`FlowApp::run`], which wires collaborators, spawns the
//!    worker, starts capture and the key listener, and parks on Ctrl+C.
//! 5. Shut the runtime down in the background so an in-flight
//!    transcription never blocks process exit.

use anyhow::{Context, Result};
use clap::Parser;

use flowkey::app::FlowApp;
use flowkey::cli::{Cli, Command};
use flowkey::config::{AppConfig, AppPaths};
use flowkey::history::HistoryLog;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init { config, force } => cmd_init(config, force),
        Command::Check { config } => cmd_check(config),
        Command::History { limit } => cmd_history(limit),
        Command::Run { config } => cmd_run(config),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn cmd_init(config_path: Option<std::path::PathBuf>, force: bool) -> Result<()> {
    let paths = AppPaths::new();
    let target = config_path.unwrap_or(paths.settings_file);

    if target.exists() && !force {
        println!("Config already exists: {}", target.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    AppConfig::default()
        .save_to(&target)
        .with_context(|| format!("failed to write {}", target.display()))?;
    std::fs::create_dir_all(&paths.models_dir)
        .with_context(|| format!("failed to create {}", paths.models_dir.display()))?;

    println!("Config ready: {}", target.display());
    println!("Model directory: {}", paths.models_dir.display());
    println!("Place a GGML whisper model there, e.g. tiny.en.bin.");
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn cmd_check(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let paths = AppPaths::new();
    let target = config_path.unwrap_or_else(|| paths.settings_file.clone());
    let config = AppConfig::load_from(&target)?;

    println!("Config path: {}", target.display());
    println!("Hotkey: {} ({} mode)", config.hotkey, config.mode.label());
    println!("Sample rate: {} Hz", config.sample_rate);
    println!("Whisper model: {}", config.stt.model);
    println!(
        "Language: {}",
        config.language.as_deref().unwrap_or("(auto)")
    );
    println!("Auto paste: {}", config.auto_paste);
    println!("Paste mode: {:?}", config.paste_mode);
    println!("Voice commands: {}", config.enable_voice_commands);
    println!("Enhancer enabled: {}", config.enhancer.enabled);
    if config.enhancer.enabled {
        println!("Enhancer endpoint: {}", config.enhancer.base_url);
        println!("Enhancer model: {}", config.enhancer.model);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

fn cmd_history(limit: usize) -> Result<()> {
    let log = HistoryLog::new(AppPaths::new().history_file);
    let entries = log.recent(limit);

    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for entry in entries {
        println!("[{}] {}", entry.timestamp, entry.text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn cmd_run(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from(&path)?,
        None => AppConfig::load()?,
    };

    // 2 workers: one effectively serves the processing task, the other the
    // signal handling and timer machinery.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let result = rt.block_on(FlowApp::new(config).run());

    // Never wait on an in-flight whisper inference during exit.
    rt.shutdown_background();

    result
}

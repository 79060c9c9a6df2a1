//! Command line entry points
//!
//! - `serve`: HTTP API plus the single-page chat UI
//! - `chat`: interactive terminal chat
//! - `ask`: answer one question and exit

pub mod ask;
pub mod chat;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Course Q&A assistant over a prebuilt index of course materials
#[derive(Parser)]
#[command(name = "course-rag-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of config files and `APP__*` variables
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Directory holding manifest.json and chunks.jsonl
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// Number of chunks retrieved per question
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Log level or filter directive, e.g. `debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server with the chat UI
    Serve(serve::ServeArgs),

    /// Chat in the terminal
    Chat(chat::ChatArgs),

    /// Answer a single question
    Ask(ask::AskArgs),
}

/// Load `.env` and layered config, apply flag overrides, validate and start logging
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, global);
    config.validate()?;

    logging::init_logging(&config.logging)?;

    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, global: &GlobalArgs) {
    if let Some(path) = &global.index {
        config.index.path = path.clone();
    }
    if let Some(top_k) = global.top_k {
        config.index.top_k = top_k;
    }
    if let Some(level) = &global.log_level {
        config.logging.level = level.clone();
    }
}

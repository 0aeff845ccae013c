use anyhow::{Context, Result};
use clap::Parser;
use muse_core::MuseConfig;
use muse_memory::IdeaStore;
use muse_reasoning::{create_client, CompletionParams, Studio};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

mod commands;
mod logging;
mod output;
mod session;

use commands::{Command, FAREWELL, HELP, MEMORY_PREVIEW_COUNT};
use session::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "MUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the JSON idea memory (overrides config)
    #[arg(short, long)]
    memory: Option<PathBuf>,

    /// Directory for generated idea files (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model provider: openai, deepseek, ollama, anthropic, mock
    #[arg(long)]
    provider: Option<String>,

    /// Model name (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Don't speak generated ideas
    #[arg(long)]
    no_voice: bool,

    /// Write daily-rotated logs into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut MuseConfig) {
        if let Some(p) = &self.memory {
            config.storage.memory_path = p.clone();
        }
        if let Some(d) = &self.output_dir {
            config.storage.output_dir = d.clone();
        }
        if let Some(p) = &self.provider {
            config.llm.provider = p.clone();
        }
        if let Some(m) = &self.model {
            config.llm.model = m.clone();
        }
        if self.no_voice {
            config.voice.enabled = false;
        }
        if let Some(d) = &self.log_dir {
            config.logging.dir = Some(d.clone());
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(MuseConfig::default_path);
    let mut config = if args.config.is_some() {
        MuseConfig::load(&config_path)?
    } else {
        MuseConfig::load_or_default(&config_path)
    };
    args.apply(&mut config);

    let _log_guard = logging::init(&config.logging)?;
    info!(config = %config_path.display(), provider = %config.llm.provider, "Starting Muse");

    let store = IdeaStore::load(&config.storage.memory_path);
    if let Some(reason) = store.load_failure() {
        println!("Could not read saved ideas ({}); starting with an empty memory.", reason);
    }

    let studio = match create_client(&config.llm) {
        Ok(client) => Studio::new(client, CompletionParams::from(&config.llm), config.studio.fallback_text.clone()),
        Err(e) => {
            warn!("Generation unavailable, using fallback text: {:#}", e);
            println!("Model unavailable ({:#}); ideas will use fallback text.", e);
            Studio::offline(config.studio.fallback_text.clone())
        }
    };

    let narrator = match muse_voice::create_narrator(&config.voice) {
        Ok(n) => n.map(Arc::new),
        Err(e) => {
            warn!("Voice disabled: {:#}", e);
            None
        }
    };

    let mut session = Session::new(
        store,
        studio,
        narrator,
        config.storage.output_dir.clone(),
        config.studio.recall_top_k,
    );

    repl(&mut session, &config).await
}

async fn repl(session: &mut Session, config: &MuseConfig) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;
    let history = history_path();
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            debug!("No history loaded from {}: {}", path.display(), e);
        }
    }

    println!(
        "Muse is listening. {} ideas remembered. Type 'help' for commands.",
        session.store().len()
    );

    loop {
        let line = match editor.readline("muse> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let command = Command::parse(&line);
        if command != Command::Empty {
            if let Err(e) = editor.add_history_entry(line.trim()) {
                debug!("Failed to add history entry: {}", e);
            }
        }

        match command {
            Command::Exit => break,
            Command::Empty => continue,
            Command::Help => println!("{}", HELP),
            Command::Memory => {
                let text = commands::format_memory(session.store().recent(MEMORY_PREVIEW_COUNT));
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Command::Share => println!(
                "{}",
                commands::format_share(session.store().latest(), &config.studio.share_hashtags)
            ),
            Command::Search(query) => {
                let results = session.store().search(&query, config.studio.recall_top_k);
                println!("{}", commands::format_search(&results));
            }
            Command::Prompt(prompt) => {
                println!("Brainstorming...");
                tokio::select! {
                    result = session.run_cycle(&prompt) => match result {
                        Ok(outcome) => {
                            println!("\n{}", outcome.record.output);
                            println!("Saved to {}", outcome.output_path.display());
                        }
                        Err(e) => {
                            error!("Idea cycle failed: {:#}", e);
                            println!("Error: {:#}", e);
                        }
                    },
                    _ = tokio::signal::ctrl_c() => {
                        println!();
                        break;
                    }
                }
            }
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("Failed to create history directory {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = editor.save_history(path) {
            debug!("Failed to save history to {}: {}", path.display(), e);
        }
    }

    println!("{}", FAREWELL);
    Ok(())
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("muse").join("history.txt"))
}

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use statchat_core::{Config, StatsClient, ThemeStore};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod handler;
mod layout;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "statchat")]
#[command(version)]
#[command(about = "Chat with the Messi vs Ronaldo statistics bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Print answers at once instead of typing them out
    #[arg(long, global = true)]
    no_animation: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Ask the backend to refresh its player statistics
    Refresh,
}

fn env_filter(verbose: bool) -> EnvFilter {
    let log_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("statchat_tui={},statchat_core={}", log_level, log_level))
    })
}

/// The chat view owns the terminal, so logs go to a file under the cache dir
fn init_file_logging(verbose: bool) -> Result<()> {
    let dir = dirs::cache_dir()
        .context("Could not find cache directory")?
        .join("statchat");
    fs::create_dir_all(&dir)?;
    let file = File::create(dir.join("statchat.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            if let Err(e) = init_file_logging(cli.verbose) {
                eprintln!("Logging disabled: {}", e);
            }
        }
        Some(_) => init_stderr_logging(cli.verbose),
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    let server = cli.server.clone().unwrap_or_else(|| config.server_url().to_string());
    let client = StatsClient::with_timeout(&server, config.request_timeout())?;
    tracing::info!(server = %server, "statchat starting v{}", env!("CARGO_PKG_VERSION"));

    let animate = !cli.no_animation;
    match cli.command {
        None => run_tui(client).await,
        Some(Commands::Ask { question }) => {
            cli::ask(&mut std::io::stdout(), &client, &question.join(" "), animate).await
        }
        Some(Commands::Refresh) => cli::refresh(&mut std::io::stdout(), &client, animate).await,
    }
}

async fn run_tui(client: StatsClient) -> Result<()> {
    let theme_store = match ThemeStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "theme preference will not be saved");
            None
        }
    };

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(client, theme_store);
    let mut events = EventHandler::new(tui::TICK_RATE);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

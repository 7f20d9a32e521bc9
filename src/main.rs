use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use subdeck::api::ApiClient;
use subdeck::app::{App, AppEvent};
use subdeck::config::Config;
use subdeck::ui;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(
    name = "subdeck",
    version,
    about = "Browse, filter and bulk-unsubscribe from your subscriptions"
)]
struct Args {
    /// Config file (default: ~/.config/subdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides `base_url` from the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Get the config directory path (~/.config/subdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("subdeck"))
}

/// The TUI owns stdout, so logs go to a file or nowhere.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    tracing::debug!(config = ?config, "Effective configuration");

    let client = ApiClient::new(
        &config.base_url,
        config.session_cookie(),
        config.request_timeout(),
    )
    .context("Failed to create API client")?;

    let mut app = App::new(&config, client);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

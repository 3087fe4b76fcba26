use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use woolly::api::MastodonClient;
use woolly::app::{App, AppEvent, Screen};
use woolly::config::{Config, ConfigError};
use woolly::ui;

/// Default config path (~/.config/woolly/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("woolly")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "woolly", about = "Terminal Mastodon client")]
struct Args {
    /// Mastodon instance, e.g. mastodon.social
    #[arg(long, env = "WOOLLY_INSTANCE")]
    instance: Option<String>,

    /// Access token for the account
    #[arg(long, env = "WOOLLY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Screen to open on start
    #[arg(long, value_enum)]
    screen: Option<Screen>,

    /// Config file (default: ~/.config/woolly/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// The TUI owns stdout, so logs only go to a file when one is given.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    if let Some(instance) = args.instance {
        config.instance_url = Some(instance);
    }
    if let Some(token) = args.token {
        config.access_token = Some(token);
    }
    config.normalize();

    let instance = config
        .instance_url
        .clone()
        .ok_or(ConfigError::MissingInstance)?;
    let client = MastodonClient::new(&instance, config.access_token(), config.request_timeout())
        .context("Failed to set up the Mastodon client")?;
    tracing::info!(
        instance = %client.base_url(),
        authenticated = client.is_authenticated(),
        "Starting"
    );

    let screen = args.screen.unwrap_or(config.default_screen);
    let mut app = App::new(client, &config, screen);
    app.start();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

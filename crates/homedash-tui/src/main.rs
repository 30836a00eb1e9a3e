//! homedash - Terminal rendition of the Homedash widget.
//!
//! Polls a remote homelab catalog server and renders the selected
//! services as a tile grid with live status dots.

mod app;
mod demo;
mod editor;
mod events;
mod poll;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use homedash_client::{ApiClient, CatalogApi};
use homedash_core::WidgetConfig;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::{App, Command};
use events::{AppEvent, EditorEvent, EventHandler};
use poll::Poller;

#[derive(Parser)]
#[command(name = "homedash")]
#[command(about = "Homedash - homelab service dashboard for the terminal")]
#[command(version)]
struct Cli {
    /// Path to the widget configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the catalog server (overrides the config file)
    #[arg(long)]
    server_url: Option<String>,

    /// Bearer token for the catalog server
    #[arg(long, env = "HOMEDASH_API_KEY")]
    api_key: Option<String>,

    /// Poll interval in seconds (overrides the config file)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Enable demo mode with a fake catalog
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr so it never corrupts the alternate screen.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("homedash=info".parse()?))
        .init();

    let config_path = cli.config.clone();
    let mut config = match &config_path {
        Some(path) if path.exists() => WidgetConfig::load(path)?,
        _ => WidgetConfig::default(),
    };
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(poll_interval) = cli.poll_interval {
        config.poll_interval = poll_interval;
    }
    if cli.demo {
        config.selected_items = demo::selection();
    } else {
        config.validate()?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, config_path, cli.demo).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: WidgetConfig,
    config_path: Option<PathBuf>,
    demo_mode: bool,
) -> anyhow::Result<()> {
    let mut app = App::new(config, config_path);
    let mut event_handler = EventHandler::new(Duration::from_millis(100));

    let mut poller = None;
    if demo_mode {
        let tx = event_handler.sender();
        tokio::spawn(async move {
            demo::run(tx).await;
        });
    } else {
        poller = Some(Poller::spawn(&app.config, event_handler.sender()));
    }

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if let Some(event) = event_handler.next().await {
            match event {
                AppEvent::Key(key) => match app.handle_key(key) {
                    Command::None | Command::Quit => {}
                    Command::Retry => {
                        if let Some(poller) = &poller {
                            poller.retry();
                        }
                    }
                    Command::OpenUrl(url) => open_url(&url),
                    Command::RestartPoller => {
                        if !demo_mode {
                            // Stop first so no cycle from the old
                            // configuration lands after the swap.
                            if let Some(old) = poller.take() {
                                old.stop();
                            }
                            poller = Some(Poller::spawn(&app.config, event_handler.sender()));
                        }
                    }
                    Command::TestConnection(draft) => {
                        spawn_connection_test(draft, event_handler.sender());
                    }
                    Command::FetchItems(draft) => {
                        spawn_item_fetch(draft, event_handler.sender());
                    }
                },
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
                AppEvent::Poll(event) => app.apply_poll_event(event),
                AppEvent::Editor(event) => app.apply_editor_event(event),
            }
        }
    }

    if let Some(poller) = poller {
        poller.stop();
    }

    Ok(())
}

/// Runs the editor's connection test against the health endpoint.
fn spawn_connection_test(draft: WidgetConfig, tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = match ApiClient::new(&draft.server_url, draft.bearer_token()) {
            Ok(client) => client.health().await.map(|_| ()).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        let _ = tx.send(AppEvent::Editor(EditorEvent::TestFinished(result)));
    });
}

/// Fetches the item list for the editor picker. Failures collapse to an
/// empty list.
fn spawn_item_fetch(draft: WidgetConfig, tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let items = match ApiClient::new(&draft.server_url, draft.bearer_token()) {
            Ok(client) => match client.items().await {
                Ok(payload) => payload.into_items(),
                Err(err) => {
                    tracing::debug!(error = %err, "item fetch for picker failed");
                    Vec::new()
                }
            },
            Err(err) => {
                tracing::debug!(error = %err, "item fetch for picker failed");
                Vec::new()
            }
        };
        let _ = tx.send(AppEvent::Editor(EditorEvent::ItemsFetched(items)));
    });
}

/// Opens a service link with the platform opener.
fn open_url(url: &str) {
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open")
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    #[cfg(all(unix, not(target_os = "macos")))]
    let result = std::process::Command::new("xdg-open")
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    #[cfg(windows)]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();

    if let Err(err) = result {
        tracing::warn!(error = %err, url, "failed to open link");
    }
}

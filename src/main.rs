// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};

mod app;
mod client;
mod data;
mod events;
mod poller;
mod settings;
mod ui;

use app::{App, View};
use client::ApiClient;
use settings::{SettingsStore, StoredAuth};
use ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "statuswatch")]
#[command(about = "Terminal dashboard for Gatus-style health-check status pages")]
struct Args {
    /// Base URL of the status server
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// Path to the persisted settings file
    #[arg(long, default_value = "statuswatch-settings.json")]
    settings: PathBuf,

    /// Store Basic-auth credentials ("user:password") before connecting
    #[arg(long)]
    auth: Option<String>,

    /// Forget stored credentials before connecting
    #[arg(long, conflicts_with = "auth")]
    logout: bool,

    /// Write diagnostic logs to this file (the terminal is taken over
    /// by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "statuswatch=debug".into()),
            )
            .with_writer(std::sync::Arc::new(file))
            .with_ansi(false)
            .init();
    }

    let mut settings = SettingsStore::load(&args.settings);
    if args.logout {
        settings.clear_auth();
    }
    if let Some(auth) = &args.auth {
        let (username, _) = auth
            .split_once(':')
            .context("--auth expects user:password")?;
        let credentials = base64::engine::general_purpose::STANDARD.encode(auth);
        settings.set_auth(&StoredAuth {
            username: username.to_string(),
            credentials,
        });
    }
    let auth = settings.auth();
    let client = ApiClient::new(&args.server, auth.as_ref())?;

    // The TUI loop is synchronous; the runtime hosts the poller task
    let runtime = tokio::runtime::Runtime::new()?;

    // A failed config fetch is not fatal; the server may simply be old
    if let Ok(config) = runtime.block_on(client.fetch_config()) {
        tracing::debug!(oidc = config.oidc, authenticated = config.authenticated, "server config");
    }

    let _guard = runtime.enter();
    run_tui(client, settings)
}

/// Run the TUI with the given client and settings
fn run_tui(client: ApiClient, settings: SettingsStore) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(client, settings);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Apply any fetched payload that survived the generation check
        app.poll_updates();

        // The active theme is resolved from the settings store on every
        // draw so theme and dark-mode changes apply immediately
        let theme = Theme::active(&app.settings);

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, banner_area(area));
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Spacer / column ruler
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, &theme, chunks[0]);

            match app.view {
                View::Dashboard => ui::dashboard::render(frame, app, &theme, chunks[2]),
                View::Detail => ui::detail::render(frame, app, &theme, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, &theme, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, &theme, area);
            }
        })?;

        // Poll for terminal events with a short timeout; fetched data
        // arrives through the poller channel drained above
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    events::handle_mouse_event(app, mouse, size.width, size.height);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Vertically centered strip for the too-small banner. Must stay inside
/// the area even when the terminal is only a few rows tall.
fn banner_area(area: Rect) -> Rect {
    let top = (area.height / 2).saturating_sub(2);
    let height = 5.min(area.height - top);
    Rect::new(0, top, area.width, height)
}

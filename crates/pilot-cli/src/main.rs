//! Pilot - terminal dashboard for managing multiple assistant sessions
//!
//! Sessions live in a shared store from pilot-core; submissions go through
//! an asynchronous dispatcher whose completions are fed back into the single
//! UI event loop.

mod tui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use pilot_core::config::{Config, ConfigManager};
use pilot_core::session::{Dispatcher, SessionManager, SimulatedBackend};

// TUI imports
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::prelude::*;
use tui::{App, Effect, Event, EventHandler};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "pilot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ClaudePilot - manage multiple Claude sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version number of ClaudePilot
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        println!("ClaudePilot v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = ConfigManager::new()?.into_config();
    let _log_guard = init_logging(&config)?;

    run_dashboard(config).await
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging(config: &Config) -> anyhow::Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&log_dir, "pilot.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Run the dashboard until the user quits
async fn run_dashboard(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(SessionManager::new());
    if config.ui.seed_demo_sessions {
        tui::seed_demo_sessions(&store);
    }

    let backend = SimulatedBackend::new(config.backend.latency());
    let (dispatcher, backend_rx) = Dispatcher::new(Arc::new(backend));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.ui.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    // Lets terminals report Ctrl+Enter distinctly from Enter
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::clone(&store));
    let size = terminal.size()?;
    app.handle_resize(size.width, size.height);

    let mut events = EventHandler::new(backend_rx, TICK_RATE);
    info!("Dashboard started with {} session(s)", store.len());

    // Main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut events, &dispatcher).await;

    // Restore terminal
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Abandon in-flight submissions
    dispatcher.cancel_all();
    info!("Dashboard stopped");

    if result.is_ok() {
        println!("Thanks for using ClaudePilot! 👋");
    }
    result
}

/// Main event loop for the TUI
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    dispatcher: &Dispatcher,
) -> anyhow::Result<()> {
    loop {
        // Draw UI
        terminal.draw(|frame| tui::draw(frame, app))?;

        // Handle events
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Terminal(crossterm::event::Event::Key(key)) => {
                // Only handle key press events, not release or repeat
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                for effect in app.handle_key(key) {
                    run_effect(effect, dispatcher);
                }
            }
            Event::Terminal(crossterm::event::Event::Mouse(mouse)) => app.handle_mouse(mouse),
            Event::Terminal(crossterm::event::Event::Resize(width, height)) => {
                app.handle_resize(width, height);
            }
            Event::Backend(event) => app.handle_backend_event(event),
            Event::Terminal(_) | Event::Tick => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Execute a side effect requested by the app
fn run_effect(effect: Effect, dispatcher: &Dispatcher) {
    match effect {
        Effect::Quit => debug!("Quit effect received"),
        Effect::Submit { session_id, input } => dispatcher.submit(session_id, input),
        Effect::Cancel { session_id } => {
            dispatcher.cancel(&session_id);
        }
    }
}

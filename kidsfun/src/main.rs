//! Kids Fun Learning Adventures in the terminal.
//!
//! Math and story adventures, the drawing studio, imagination explorer,
//! story builder and the parent report, with a line-oriented headless
//! mode for scripts:
//!
//! ```bash
//! cargo run -p kidsfun -- --headless --metrics /tmp/kids.json
//! cargo run -p kidsfun -- --report
//! ```

mod app;
mod canvas;
mod events;
mod headless;
mod ui;

use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kidsfun_core::{AppConfig, Session};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

const DEFAULT_LOG_FILTER: &str = "kidsfun=info,kidsfun_core=info";

/// Kids Fun Learning Adventures
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Metrics file (overrides KIDSFUN_METRICS_PATH)
    #[arg(long, value_name = "PATH")]
    metrics: Option<PathBuf>,

    /// Story graph JSON to play instead of the forest adventure
    #[arg(long, value_name = "PATH")]
    story: Option<PathBuf>,

    /// Text-only line mode for scripts and testing
    #[arg(long)]
    headless: bool,

    /// Print the parent report and exit
    #[arg(long)]
    report: bool,
}

impl Args {
    fn config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(path) = &self.metrics {
            config = config.with_metrics_path(path);
        }
        if let Some(path) = &self.story {
            config = config.with_story_path(path);
        }
        config
    }

    /// Log next to the metrics file so the TUI screen stays clean.
    fn log_path(&self, config: &AppConfig) -> PathBuf {
        config
            .metrics_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.join("kidsfun.log"))
            .unwrap_or_else(|| PathBuf::from("kidsfun.log"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.config();

    if args.headless || args.report {
        init_logging_stderr();
    } else {
        init_logging_file(&args.log_path(&config))?;
    }

    let session = Session::new(config).await?;

    if args.report {
        print!("{}", session.report().render_text());
        return Ok(());
    }

    if args.headless {
        return headless::run_headless(session).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    Ok(result?)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

fn init_logging_file(path: &std::path::Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let result = event_loop(terminal, &mut app).await;
    // A drawing visit still open at exit is saved either way
    app.shutdown();
    result
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Storyteller requests are awaited between frames
        if let Some(request) = app.pending_request.take() {
            app.set_status("Asking the storyteller...");
            terminal.draw(|f| render(f, app))?;
            app.fulfil_request(request).await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

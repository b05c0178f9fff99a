//! Candlewatch: terminal dashboard for a live candle feed.
//!
//! Panels:
//! 1. Tape: latest candles as a colored `HH:MM` grid
//! 2. Patterns: recent four-candle continuity hits and the current streak
//! 3. Help: keyboard shortcuts

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use candlewatch_core::data::{SupabaseSource, SyntheticSource, TickSource};
use candlewatch_core::{DashboardConfig, Poller};

use candlewatch_tui::app::AppState;
use candlewatch_tui::worker::{self, WorkerCommand, WorkerSettings};
use candlewatch_tui::{input, logging, ui};

#[derive(Parser, Debug)]
#[command(
    name = "candlewatch",
    version,
    about = "Live candle feed dashboard"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the synthetic feed instead of the remote table.
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Poll interval in seconds (overrides the config file).
    #[arg(long)]
    interval: Option<u64>,

    /// Log file. Defaults to <data-local-dir>/candlewatch/candlewatch.log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    let config = load_config(&cli)?;
    let source = build_source(&config, cli.demo)?;
    log::info!(
        "starting: source={} rows={} interval={}s",
        source.name(),
        config.source.row_limit,
        config.polling.interval_secs
    );

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        log::error!("panic: {info}");
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let poller = Arc::new(Poller::from_config(Arc::clone(&source), &config));
    let settings = WorkerSettings {
        poll_interval: config.polling.interval(),
        zone: config.clock.clone(),
    };

    // Spawn worker
    let worker_handle = worker::spawn_worker(poller, settings, cmd_rx, resp_tx)
        .context("spawn worker thread")?;

    // Build app state
    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        source.name(),
        config.clock.clone(),
        config.analysis.exhaustion_threshold,
    );
    if cli.demo {
        app.set_status("Demo mode: synthetic feed");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("exiting");
    result
}

/// Config file, then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(secs) = cli.interval {
        config.polling.interval_secs = secs;
    }
    config.validate(!cli.demo)?;
    if let Some(path) = &cli.config {
        log::info!("loaded config from {}", path.display());
    }
    Ok(config)
}

fn build_source(config: &DashboardConfig, demo: bool) -> Result<Arc<dyn TickSource>> {
    if demo {
        let seed = chrono::Utc::now().timestamp().unsigned_abs();
        return Ok(Arc::new(SyntheticSource::demo(seed)));
    }
    let source = SupabaseSource::new(config.source.clone()).context("configure data source")?;
    Ok(Arc::new(source))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

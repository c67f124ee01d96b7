use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use talentboard::app::{App, StatusLevel};
use talentboard::config::{self, Config, ListSettings, SourceKind};
use talentboard::core::{init_logging, FetchError};
use talentboard::domain::DashboardTab;
use talentboard::infrastructure::{
    DataProducer, JsonDirProducer, MockProducer, RuntimeBridge, RuntimeCommand, RuntimeEvent,
};
use talentboard::ui;

const WHEEL_ROWS: i64 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "talentboard",
    version,
    about = "Talentboard: a terminal dashboard for candidates, assessments and clients"
)]
struct Args {
    /// Config file (default: ~/.config/talentboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data source
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Directory with candidates.json, assessments.json and clients.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Simulated latency of the mock source
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Make every n-th mock request fail (0 disables)
    #[arg(long)]
    fail_every: Option<u32>,

    /// Rows rendered above and below the viewport
    #[arg(long)]
    overscan: Option<usize>,

    /// Terminal lines per list item
    #[arg(long)]
    row_height: Option<u32>,

    /// Log file (default: ~/.local/share/talentboard/talentboard.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = args.log_file.clone().or_else(config::log_file_path);
    let log_error = log_file
        .as_deref()
        .map(init_logging)
        .and_then(Result::err);

    let mut config = config::load(args.config.as_deref());
    apply_overrides(&mut config, &args);
    let producer = build_producer(&config)?;
    let source_label = producer.describe();
    tracing::info!(event = "app.started", source = %source_label);

    let runtime = RuntimeBridge::new(Arc::clone(&producer))?;

    let mut app = App::new(ListSettings::from(&config.list), source_label);
    if let Some(err) = log_error {
        app.set_status(format!("Logging disabled: {err:#}"), StatusLevel::Warn);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(event = "app.failed", error = %format!("{err:#}"));
        eprintln!("{err:?}");
    }
    tracing::info!(event = "app.stopped");

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(source) = args.source {
        config.data.source = source;
    }
    if let Some(dir) = args.data_dir.as_ref() {
        config.data.dir = Some(dir.display().to_string());
    }
    if let Some(latency_ms) = args.latency_ms {
        config.data.latency_ms = latency_ms;
    }
    if let Some(fail_every) = args.fail_every {
        config.data.fail_every = fail_every;
    }
    if let Some(overscan) = args.overscan {
        config.list.overscan = overscan;
    }
    if let Some(row_height) = args.row_height {
        config.list.row_height = row_height;
    }
}

fn build_producer(config: &Config) -> Result<Arc<dyn DataProducer>> {
    match config.data.source {
        SourceKind::Mock => Ok(Arc::new(MockProducer::new(
            config.data.latency(),
            config.data.fail_every(),
        ))),
        SourceKind::Json => {
            let dir = config
                .data
                .dir_path()
                .context("json source needs a data directory (--data-dir or [data].dir)")?;
            if !dir.is_dir() {
                anyhow::bail!("data directory {} does not exist", dir.display());
            }
            Ok(Arc::new(JsonDirProducer::new(dir)))
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::FetchFinished { ticket, result } => {
                app.apply_fetch_result(ticket, result);
            }
            RuntimeEvent::Error { message } => app.apply_runtime_error(message),
        }
    }

    for ticket in app.take_fetch_requests() {
        if let Err(err) = runtime.send(RuntimeCommand::Fetch { ticket }) {
            tracing::error!(event = "runtime.send_failed", key = ?ticket.key, error = %err);
            app.apply_fetch_result(ticket, Err(FetchError::new(err.to_string())));
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => app.half_page_up(),
        (KeyCode::Char('d'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.half_page_down();
        }
        (KeyCode::Char('q') | KeyCode::Esc, _) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char('r'), _) => app.refresh_active(),
        (KeyCode::Char(c @ '1'..='3'), _) => {
            if let Some(tab) = DashboardTab::from_shortcut(c) {
                app.select_tab(tab);
            }
        }
        (KeyCode::Tab | KeyCode::Char(']'), _) => app.next_tab(),
        (KeyCode::BackTab | KeyCode::Char('['), _) => app.prev_tab(),
        (KeyCode::Char('j') | KeyCode::Down, _) => app.scroll_rows(1),
        (KeyCode::Char('k') | KeyCode::Up, _) => app.scroll_rows(-1),
        (KeyCode::PageDown, _) => app.page_down(),
        (KeyCode::PageUp, _) => app.page_up(),
        (KeyCode::Char('g') | KeyCode::Home, _) => app.scroll_to_top(),
        (KeyCode::Char('G') | KeyCode::End, _) => app.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size);
    let col = mouse.column;
    let row = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if rect_contains(areas.tabs, col, row) => {
            if let Some(tab) = ui::tabs::tab_at(areas.tabs, col) {
                app.select_tab(tab);
            }
        }
        MouseEventKind::ScrollUp if rect_contains(areas.list, col, row) => {
            app.scroll_rows(-WHEEL_ROWS);
        }
        MouseEventKind::ScrollDown if rect_contains(areas.list, col, row) => {
            app.scroll_rows(WHEEL_ROWS);
        }
        _ => {}
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

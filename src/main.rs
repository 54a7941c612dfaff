//! SeismoScope - a terminal earthquake dashboard.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use seismoscope::app::{App, AppConfig, Section, MIN_MAGNITUDE_STEP, MIN_MAGNITUDE_UPPER};
use seismoscope::feed::{FeedClient, FeedRequest, Timeframe, DEFAULT_FEED_URL};
use seismoscope::ui;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "seismoscope", version)]
#[command(about = "A terminal dashboard for the live USGS earthquake feed", long_about = None)]
struct Args {
    /// Feed window to load: all_hour, all_day, all_week or all_month
    #[arg(long, default_value = "all_day", value_parser = parse_timeframe)]
    timeframe: Timeframe,

    /// Load a single day (YYYY-MM-DD, within the last 30 days) instead of a rolling window
    #[arg(long, conflicts_with = "timeframe")]
    date: Option<String>,

    /// Initial minimum magnitude (0.0 to 8.0)
    #[arg(long, default_value_t = 0.0, value_parser = parse_min_magnitude)]
    min_magnitude: f64,

    /// Feed host, for mirrors
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn parse_timeframe(s: &str) -> std::result::Result<Timeframe, String> {
    Timeframe::from_key(s).ok_or_else(|| {
        let keys: Vec<_> = Timeframe::ALL.iter().map(|t| t.key()).collect();
        format!("unknown timeframe '{}', expected one of: {}", s, keys.join(", "))
    })
}

fn parse_min_magnitude(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=MIN_MAGNITUDE_UPPER).contains(&value) {
        return Err(format!("must be between 0.0 and {:.1}", MIN_MAGNITUDE_UPPER));
    }
    Ok(value)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_path) = &args.log {
        init_logging(log_path)?;
        tracing::info!("Starting SeismoScope");
    }

    // Validate the custom date before touching the terminal
    let request = match args.date {
        Some(ref date) => FeedRequest::parse_day(date, today())?,
        None => FeedRequest::Summary(args.timeframe),
    };

    let client = FeedClient::with_base_url(&args.feed_url, Duration::from_secs(args.timeout))?;
    let config = AppConfig {
        request,
        min_magnitude: args.min_magnitude,
    };
    let mut app = App::new(config, Arc::new(client));
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("SeismoScope exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.poll_fetches();
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(&mut app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply one key press. Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Custom date entry - handle separately
    if app.date_input.is_active() {
        match key.code {
            KeyCode::Enter => app.submit_date(today()),
            KeyCode::Esc => app.date_input.cancel(),
            KeyCode::Backspace => app.date_input.backspace(),
            KeyCode::Char(c) => app.date_input.input(c),
            _ => {},
        }
        return false;
    }

    // Global keys
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return true,
        (_, KeyCode::Tab) => {
            app.next_section();
            return false;
        },
        (_, KeyCode::Char('1')) => {
            app.set_section(Section::Map);
            return false;
        },
        (_, KeyCode::Char('2')) => {
            app.set_section(Section::Education);
            return false;
        },
        (_, KeyCode::Char('3')) => {
            app.set_section(Section::Data);
            return false;
        },
        (_, KeyCode::Char('r')) => {
            app.refresh();
            return false;
        },
        (_, KeyCode::Char('t')) => {
            app.cycle_timeframe();
            return false;
        },
        (m, KeyCode::Char('d')) if !m.contains(KeyModifiers::CONTROL) => {
            app.date_input.start();
            return false;
        },
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
            app.adjust_min_magnitude(MIN_MAGNITUDE_STEP);
            return false;
        },
        (_, KeyCode::Char('-')) | (_, KeyCode::Char('_')) => {
            app.adjust_min_magnitude(-MIN_MAGNITUDE_STEP);
            return false;
        },
        (_, KeyCode::Char('>')) => {
            app.adjust_min_magnitude(1.0);
            return false;
        },
        (_, KeyCode::Char('<')) => {
            app.adjust_min_magnitude(-1.0);
            return false;
        },
        (_, KeyCode::Char('T')) => {
            app.cycle_theme();
            return false;
        },
        (_, KeyCode::Char('?')) => {
            app.status = "Help: q=quit, Tab=section, r=refresh, t=timeframe, d=date, +/-=min mag, T=theme".to_string();
            return false;
        },
        (_, KeyCode::Esc) => {
            app.close_overlay();
            return false;
        },
        _ => {},
    }

    match app.section {
        Section::Map => match (key.modifiers, key.code) {
            (_, KeyCode::Char('j')) | (_, KeyCode::Char('n')) => app.next_marker(),
            (_, KeyCode::Char('k')) | (_, KeyCode::Char('N')) => app.prev_marker(),
            (_, KeyCode::Enter) => app.toggle_popup(),
            (_, KeyCode::Char('c')) => app.focus_selected(),
            (_, KeyCode::Up) => app.viewport.pan(0.25, 0.0),
            (_, KeyCode::Down) => app.viewport.pan(-0.25, 0.0),
            (_, KeyCode::Left) => app.viewport.pan(0.0, -0.25),
            (_, KeyCode::Right) => app.viewport.pan(0.0, 0.25),
            (_, KeyCode::Char('z')) => app.viewport.zoom_in(),
            (_, KeyCode::Char('Z')) => app.viewport.zoom_out(),
            (_, KeyCode::Char('0')) => app.viewport.reset(),
            _ => {},
        },
        Section::Education => match key.code {
            KeyCode::Char('h') | KeyCode::Left => app.education_tab = app.education_tab.prev(),
            KeyCode::Char('l') | KeyCode::Right => app.education_tab = app.education_tab.next(),
            _ => {},
        },
        Section::Data => match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                app.scroll_table_down(10)
            },
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => {
                app.scroll_table_up(10)
            },
            (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.scroll_table_down(1),
            (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.scroll_table_up(1),
            (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.table_scroll = 0,
            _ => {},
        },
    }

    false
}

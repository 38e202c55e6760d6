mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, UiLocale};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "assets/scholars.json";
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub locale: Option<String>,
    pub seed: Option<u64>,
    pub data_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    if let Some(path) = options.log_file.as_ref() {
        init_file_logging(path)?;
    }
    let locale = UiLocale::from_opt(options.locale.as_deref());
    let seed = options.seed.unwrap_or_else(rand_seed);
    let data_path = options
        .data_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let mut app = App::bootstrap(locale, seed, &data_path)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    if let Err(err) = &run_result {
        tracing::error!("ui loop stopped: {err:#}");
    }
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut locale = std::env::var("GACHA_LANG").ok();
    let mut data_path = std::env::var_os("GACHA_DATA").map(PathBuf::from);
    let mut log_file = std::env::var_os("GACHA_LOG").map(PathBuf::from);
    let mut seed = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--data" => {
                if let Some(value) = args.get(idx + 1) {
                    data_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--log" => {
                if let Some(value) = args.get(idx + 1) {
                    log_file = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions {
        locale,
        seed,
        data_path,
        log_file,
    }
}

/// The terminal is owned by the UI, so logs only go to a file when asked.
fn init_file_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn rand_seed() -> u64 {
    gacha_core::RngState::from_entropy().seed()
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_frame = Instant::now();
    while !app.should_quit {
        let size = terminal.size()?;
        app.set_terminal_size(size.width, size.height);
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(FRAME_INTERVAL)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = input::map_key(key);
                    actions::dispatch(app, action);
                }
            }
        }
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_millis() as u64;
        last_frame = now;
        app.on_tick(dt);
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "gacha-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

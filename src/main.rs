use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use feierabend::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    shift::{EndTime, ShiftCalculator},
    ui::cursor_position,
    App, Control,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FEIERABEND_LOG";

/// to-do list, end-of-shift calculator and countdown timer in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// countdown duration in minutes
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
    minutes: Option<u32>,

    /// print when a shift starting at HH:MM ends, then exit
    #[clap(short = 's', long, value_name = "HH:MM")]
    shift: Option<String>,

    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective configuration to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line flags take precedence over the config file
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(minutes) = self.minutes {
            cfg.timer_minutes = minutes;
        }
        cfg
    }
}

fn format_end_time(end: &EndTime) -> String {
    match end.day_suffix() {
        Some(suffix) => format!("{end} {suffix}"),
        None => end.to_string(),
    }
}

/// Logs go to a file since the terminal belongs to the UI
fn init_tracing() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    // a subscriber installed earlier (tests) keeps precedence
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    let store = cli.config_store();
    let config = cli.apply(store.load());

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if let Some(start) = &cli.shift {
        let calculator = ShiftCalculator::from_hours_minutes(config.shift_hours, config.shift_minutes);
        match calculator.calculate(start) {
            Ok(end) => {
                println!("{}", format_end_time(&end));
                return Ok(());
            }
            Err(e) => {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::ValueValidation, e).exit();
            }
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    info!("ui started");

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Control::Quit {
                    break;
                }
            }
        }
    }

    info!("ui stopped");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let area = f.area();
    f.render_widget(app, area);
    if let Some(pos) = cursor_position(app, area) {
        f.set_cursor_position(pos);
    }
}

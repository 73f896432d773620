use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flinch::{
    app::{action_for_key, action_for_mouse, App},
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    machine::TimerStateMachine,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TermEvent, TermEventSource, Ticker},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing::{info, warn};

const FRAME_MS: u64 = 33;

/// sleek reaction-time tui: wait for green, then hit space
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal reaction-time game. Wait for the box to turn green, then press space or click as fast as you can. Reacting early is a false start."
)]
pub struct Cli {
    /// shortest wait before the cue, in milliseconds
    #[clap(long)]
    min_delay_ms: Option<u64>,

    /// longest wait before the cue (exclusive), in milliseconds
    #[clap(long)]
    max_delay_ms: Option<u64>,

    /// how long a result stays on screen before returning to idle, in milliseconds
    #[clap(long)]
    display_ms: Option<u64>,

    /// number of recent attempts to list
    #[clap(long)]
    history: Option<usize>,

    /// seed the cue delay generator for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// disable the particle burst when the cue appears
    #[clap(long)]
    no_burst: bool,

    /// write debug logs to ~/.local/state/flinch/flinch.log
    #[clap(long)]
    log: bool,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(ms) = self.min_delay_ms {
            config.min_delay_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.max_delay_ms = ms;
        }
        if let Some(ms) = self.display_ms {
            config.display_ms = ms;
        }
        if let Some(n) = self.history {
            config.history_len = n;
        }
        if self.no_burst {
            config.burst = false;
        }
        config.sanitized()
    }

    fn build_app(&self, config: &Config) -> App {
        let clock = SystemClock::new();
        let machine = match self.seed {
            Some(seed) => TimerStateMachine::with_seed(clock, config.timing(), seed),
            None => TimerStateMachine::new(clock, config.timing()),
        };
        App::new(machine, config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = if cli.log { logging::init() } else { None };

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = ?store.path(), "config saved");
    }

    let mut app = cli.build_app(&config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(FRAME_MS));
    let result = start_tui(&mut terminal, &mut app, Runner::new(events, ticker));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, C: Clock, E: TermEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.set_size(size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step_until(app.time_until_next_deadline());

        // timers are observed before the event is dispatched
        let (before, was_animating) = (app.state(), app.is_animating());
        app.on_tick();
        let mut redraw = app.state() != before || was_animating || app.is_animating();

        match event {
            TermEvent::Tick => {}
            TermEvent::Closed => {
                warn!("terminal event stream closed, exiting");
                break;
            }
            TermEvent::Resize => {
                let size = terminal.size()?;
                app.set_size(size.width, size.height);
                redraw = true;
            }
            TermEvent::Key(key) => {
                if !app.handle(action_for_key(key)) {
                    break;
                }
                redraw = true;
            }
            TermEvent::Mouse(mouse) => {
                if !app.handle(action_for_mouse(mouse)) {
                    break;
                }
                redraw = true;
            }
        }

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui<C: Clock>(app: &App<C>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

use std::fs::File;
use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info};
use ratatui::prelude::*;

use champ_terminal::api::ApiClient;
use champ_terminal::config::{self, Config};
use champ_terminal::feed;
use champ_terminal::router::{Route, nav_route_for_key};
use champ_terminal::state::{AppState, Delta, ProviderCommand, apply_delta};
use champ_terminal::ui;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(start: Route, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(start),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.search_active {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Down => self.state.select_next(),
                KeyCode::Up => self.state.select_prev(),
                KeyCode::Char(ch) => self.state.push_search_char(ch),
                _ => {}
            }
            return;
        }

        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(ch @ '1'..='6') => {
                if let Some(route) = nav_route_for_key(ch) {
                    let cmd = self.state.navigate(route);
                    self.send(cmd);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => {
                if let Some(cmd) = self.state.open_selected() {
                    self.send(cmd);
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                if !self.state.search.is_empty() {
                    self.state.clear_search();
                } else if let Some(cmd) = self.state.back() {
                    self.send(cmd);
                }
            }
            KeyCode::Char('r') => {
                let cmd = self.state.reload();
                self.state.push_log(format!("[INFO] Reloading {}", self.state.route));
                self.send(cmd);
            }
            KeyCode::Char('/') if self.state.route.is_searchable() => {
                self.state.search_active = true;
            }
            KeyCode::Left if is_standings_table(self.state.route) => {
                self.state.move_sort_cursor(false);
            }
            KeyCode::Right if is_standings_table(self.state.route) => {
                self.state.move_sort_cursor(true);
            }
            KeyCode::Char('s') if is_standings_table(self.state.route) => {
                self.state.click_sort_column();
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[WARN] Fetching unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider stopped, request dropped");
        }
    }
}

fn is_standings_table(route: Route) -> bool {
    matches!(route, Route::StandingsDetail(_))
}

fn main() -> Result<()> {
    config::load_dotenv();
    let mut cfg = Config::from_env()?;
    if let Some(arg) = std::env::args().nth(1) {
        cfg.start_route = Route::parse(&arg).context("invalid start route")?;
    }
    init_logging(&cfg)?;
    info!("starting against {}", cfg.api_base);

    let api = ApiClient::new(&cfg)?;
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let provider = feed::spawn_provider(Arc::new(api), cfg.fetch_parallelism, tx, cmd_rx);

    let mut app = App::new(cfg.start_route, Some(cmd_tx.clone()));
    let first = app.state.enter(cfg.start_route);
    app.send(first);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let _ = cmd_tx.send(ProviderCommand::Shutdown);
    drop(app);
    let _ = provider.join();

    if let Err(err) = res {
        error!("ui loop failed: {err}");
        eprintln!("error: {err}");
    }
    Ok(())
}

/// The TUI owns the terminal, so logs only go somewhere when a file is configured.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = cfg.log_file.as_ref() else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui::ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

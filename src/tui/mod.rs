//! Terminal frontend. One task owns the terminal and folds three streams:
//! keyboard input, store change events and a fixed frame tick. Store events
//! only mark the view dirty; snapshots are pulled at most once per frame.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::api::ApiClient;
use crate::control;
use crate::store::Store;

pub mod app;
pub mod events;
pub mod ui;
pub mod widgets;

use app::App;
use events::Command;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

pub struct TuiDeps {
    pub api: Arc<ApiClient>,
    pub store: Arc<Store>,
    /// Nudges the poller into an immediate full refresh.
    pub refresh_tx: mpsc::Sender<()>,
}

#[derive(Debug, Clone)]
pub struct TuiConfig {
    pub grid_slots: usize,
    pub gauge_max_hashrate: f64,
    pub power_cost_per_kwh: f64,
    pub assist_provider: String,
    pub feed_enabled: bool,
}

/// Runs the dashboard until the user quits. Restores the terminal before
/// returning, and on panic via the hook.
pub async fn run(deps: TuiDeps, config: TuiConfig) -> anyhow::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, deps, config).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    deps: TuiDeps,
    config: TuiConfig,
) -> anyhow::Result<()> {
    let TuiDeps {
        api,
        store,
        refresh_tx,
    } = deps;

    let mut app = App::new(&config);
    app.apply_snapshot(store.snapshot().await);

    let mut input = EventStream::new();
    let mut bus = store.subscribe();
    let mut bus_open = true;
    let mut frames = interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dirty = false;

    loop {
        tokio::select! {
            event = input.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(command) = events::handle_key(&mut app, key) {
                        dispatch(command, &api, &store, &refresh_tx, &config);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => app.should_quit = true,
            },
            event = bus.recv(), if bus_open => match event {
                // Lagging just means several changes collapsed into one redraw.
                Ok(_) | Err(RecvError::Lagged(_)) => dirty = true,
                Err(RecvError::Closed) => bus_open = false,
            },
            _ = frames.tick() => {
                if dirty {
                    app.apply_snapshot(store.snapshot().await);
                    dirty = false;
                }
                terminal.draw(|f| ui::draw(f, &app))?;
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

/// Control actions run detached so a slow backend call never blocks input
/// or rendering; their outcome lands in the journal.
fn dispatch(
    command: Command,
    api: &Arc<ApiClient>,
    store: &Arc<Store>,
    refresh_tx: &mpsc::Sender<()>,
    config: &TuiConfig,
) {
    match command {
        Command::Refresh => {
            let _ = refresh_tx.try_send(());
        }
        Command::AddMiner { name, ip } => {
            tokio::spawn(control::add_miner(
                api.clone(),
                store.clone(),
                refresh_tx.clone(),
                name,
                ip,
            ));
        }
        Command::DeleteMiner { name } => {
            tokio::spawn(control::delete_miner(
                api.clone(),
                store.clone(),
                refresh_tx.clone(),
                name,
            ));
        }
        Command::Assist { question } => {
            tokio::spawn(control::ai_assist(
                api.clone(),
                store.clone(),
                config.assist_provider.clone(),
                question,
            ));
        }
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// The default panic handler prints into the alternate screen where nobody
/// can read it. Drop back to the main screen first.
fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

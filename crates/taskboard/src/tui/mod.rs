use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::subscriber::NoSubscriber;

use taskboard_app::{AppConfig, Dashboard};
use taskboard_store::{KeyValueStore, StorageAdapter};

use crate::config::keybindings::load_keybindings;

pub mod constants;
mod handlers;
mod theme;
mod view;
mod widgets;

use self::constants::TUI_TICK_RATE_MS;
use self::view::Ui;

/// Launch the interactive TUI.
pub fn run<K: KeyValueStore>(
    adapter: StorageAdapter<K>,
    config: &AppConfig,
    config_path: Option<&Path>,
) -> Result<()> {
    // Configuration and data problems are reported before the screen switches.
    let keybindings = load_keybindings(config_path)?;
    let dashboard =
        Dashboard::open(adapter, config.default_priority()).context("failed to load tasks")?;
    let mut ui = Ui::new(dashboard, keybindings);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        run_event_loop(&mut terminal, &mut ui)
    });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop<K: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ui: &mut Ui<K>,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)?
            && let CrosstermEvent::Key(key) = event::read()?
        {
            ui.handle_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

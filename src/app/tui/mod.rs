mod actions;
mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::progress::{ProgressController, ProgressStore, StorageBackend};

pub(crate) use self::actions::{KeyOutcome, handle_key};
use self::actions::status_info;
use self::render::draw_tui;
use self::session::TuiSession;

/// Everything the tracker view needs besides the controller.
pub(crate) struct TrackerState {
    pub(crate) total_chapters: u32,
    pub(crate) table_state: TableState,
    pub(crate) status: String,
    pub(crate) pending_reset: bool,
}

impl TrackerState {
    pub(crate) fn new(total_chapters: u32) -> Self {
        let mut table_state = TableState::default();
        table_state.select((total_chapters > 0).then_some(0));
        Self {
            total_chapters,
            table_state,
            status: status_info("Ready."),
            pending_reset: false,
        }
    }

    /// Zero-based index of the highlighted chapter.
    pub(crate) fn selected_chapter(&self) -> Option<u32> {
        self.table_state
            .selected()
            .and_then(|idx| u32::try_from(idx).ok())
            .filter(|idx| *idx < self.total_chapters)
    }
}

pub(crate) fn run_tui<B: StorageBackend>(
    store: &ProgressStore<B>,
    book: &str,
    total_chapters: u32,
) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut controller = ProgressController::new(store, book);
    let mut state = TrackerState::new(total_chapters);

    loop {
        terminal.draw(|frame| draw_tui(frame, &controller, &mut state))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if handle_key(&mut state, &mut controller, key.code) == KeyOutcome::Quit {
            break;
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}

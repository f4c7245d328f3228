use crossterm::event::KeyCode;

use crate::progress::{ProgressController, StorageBackend};

use super::TrackerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    Continue,
    Quit,
}

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(crate) fn handle_key<B: StorageBackend>(
    state: &mut TrackerState,
    controller: &mut ProgressController<'_, B>,
    code: KeyCode,
) -> KeyOutcome {
    if state.pending_reset {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                state.pending_reset = false;
                controller.reset_progress();
                state.status = status_info("Progress reset.");
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                state.pending_reset = false;
                state.status = status_info("Reset canceled.");
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(selected) = state.table_state.selected() {
                state.table_state.select(Some(selected.saturating_sub(1)));
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(selected) = state.table_state.selected() {
                let last = state.total_chapters.saturating_sub(1) as usize;
                state.table_state.select(Some((selected + 1).min(last)));
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let Some(index) = state.selected_chapter() else {
                state.status = status_error("No chapter selected.");
                return KeyOutcome::Continue;
            };
            let completed = controller.toggle_chapter(index);
            let label = if completed { "read" } else { "unread" };
            state.status = status_info(&format!("Chapter {} marked {label}.", index + 1));
        }
        KeyCode::Char('a') => {
            controller.mark_all_complete(state.total_chapters);
            state.status = status_info("All chapters marked read.");
        }
        KeyCode::Char('r') => {
            if controller.completed_chapters().is_empty() {
                state.status = status_info("Nothing to reset.");
            } else {
                state.pending_reset = true;
                state.status = status_info("Confirm reset: y/Enter to reset, n/Esc to cancel.");
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

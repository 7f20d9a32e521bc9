//! Input handling for the TUI.
//!
//! Overlays capture every key while visible, in this order: help, error
//! dialog, confirm dialog, filter box. Otherwise keys go through the
//! keybinding registry in the list context.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Longest filter the input box accepts.
const MAX_FILTER_LENGTH: usize = 256;

/// Main input dispatch function.
pub fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.error_dialog.is_some() {
        return handle_error_input(app, code);
    }

    if app.pending_confirm.is_some() {
        return handle_confirm_input(app, code, event_tx);
    }

    if app.filter_editing {
        return handle_filter_input(app, code, modifiers, event_tx);
    }

    handle_list_input(app, code, modifiers, event_tx)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// The unsubscribe error dialog stays until explicitly dismissed.
fn handle_error_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
        app.dismiss_error();
    }
    Action::Continue
}

fn handle_confirm_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_pending(event_tx),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_pending(),
        _ => {} // Ignore other keys
    }
    Action::Continue
}

/// Typing into the filter box.
///
/// Only the filter-context bindings apply here; every other printable key
/// is text, so the global `q` does not quit while typing.
fn handle_filter_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::FilterInput)
    {
        Some(KbAction::ApplyFilter) => {
            app.apply_filter(event_tx);
            return Action::Continue;
        }
        Some(KbAction::CancelFilter) => {
            app.cancel_filter_edit();
            return Action::Continue;
        }
        _ => {}
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') => return Action::Quit,
            KeyCode::Char('u') => app.requests.set_draft_filter(String::new()),
            _ => {}
        }
        return Action::Continue;
    }

    match code {
        KeyCode::Backspace => app.requests.pop_draft_char(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => {
            if app.requests.draft_filter().chars().count() < MAX_FILTER_LENGTH {
                app.requests.push_draft_char(c);
            } else {
                app.set_status(format!(
                    "Filter too long (max {} chars)",
                    MAX_FILTER_LENGTH
                ));
            }
        }
        _ => {}
    }
    Action::Continue
}

fn handle_list_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::List);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => app.status_message = None,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::ToggleSelect) => {
            app.toggle_highlighted();
            app.nav_down();
        }
        Some(KbAction::SelectAllVisible) => app.select_all_visible(),
        Some(KbAction::DeselectAllVisible) => app.deselect_all_visible(),
        Some(KbAction::Unsubscribe) => app.request_unsubscribe(event_tx),
        Some(KbAction::NextPage) => {
            if app.requests.can_go_next() {
                app.next_page(event_tx);
            } else {
                app.set_status("Already on the last page");
            }
        }
        Some(KbAction::PrevPage) => {
            if app.requests.can_go_prev() {
                app.prev_page(event_tx);
            } else {
                app.set_status("Already on the first page");
            }
        }
        Some(KbAction::ToggleSort) => app.toggle_sort(event_tx),
        Some(KbAction::EnterFilter) => app.begin_filter_edit(),
        Some(KbAction::ClearFilter) => app.clear_filter(event_tx),
        Some(KbAction::Reload) => app.reload(event_tx),
        Some(KbAction::ForceRefresh) => app.force_refresh(event_tx),
        Some(KbAction::OpenChannel) => app.open_highlighted_channel(),
        Some(KbAction::Login) => app.login(),
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ApplyFilter) | Some(KbAction::CancelFilter) | None => {}
    }
    Action::Continue
}

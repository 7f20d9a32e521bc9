use crate::app::App;
use crate::keybindings::Action;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.filter_editing {
        Cow::Borrowed("Type a channel name | Enter apply | Esc cancel | Ctrl+u clear")
    } else if app.selection.is_mutating() {
        Cow::Borrowed("Unsubscribing...")
    } else if let Some(error) = app.requests.last_error() {
        Cow::Owned(format!("Error: {}", error))
    } else {
        Cow::Owned(hints(app))
    };

    let style = if app.status_message.is_none() && app.requests.last_error().is_some() {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Key hints built from the live bindings so overrides show up.
fn hints(app: &App) -> String {
    let pairs = [
        (Action::ToggleSelect, "select"),
        (Action::Unsubscribe, "unsubscribe"),
        (Action::EnterFilter, "filter"),
        (Action::ToggleSort, "sort"),
        (Action::ForceRefresh, "refresh"),
        (Action::ShowHelp, "help"),
        (Action::Quit, "quit"),
    ];
    pairs
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_for(*action)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

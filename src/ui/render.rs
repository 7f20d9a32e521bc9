//! Render functions for the TUI.
//!
//! Lays out header, list, and status bar, then draws any active overlay on top.

use crate::app::{App, ConfirmAction};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{header, help, status, subscriptions};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    subscriptions::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }

    if let Some(ref confirm) = app.pending_confirm {
        render_confirm_overlay(f, app, confirm);
    }

    if let Some(ref error) = app.error_dialog {
        render_error_overlay(f, error);
    }
}

/// Center a box of at most `width` x `height` inside `area`.
pub(super) fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm_overlay(f: &mut Frame, app: &App, confirm: &ConfirmAction) {
    let text = match confirm {
        ConfirmAction::Unsubscribe { count } => {
            let noun = if *count == 1 { "channel" } else { "channels" };
            let off_page = app
                .selection
                .ids()
                .iter()
                .filter(|id| !app.requests.visible_ids().any(|v| v == id.as_str()))
                .count();
            let note = if off_page > 0 {
                format!("{} of them are on other pages.\n\n", off_page)
            } else {
                String::new()
            };
            format!(
                "Unsubscribe from {} {}?\n\n{}(y) Confirm  (n/Esc) Cancel",
                count, noun, note
            )
        }
    };

    let overlay = centered_box(f.area(), 50, 9);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

fn render_error_overlay(f: &mut Frame, error: &str) {
    let overlay = centered_box(f.area(), 60, 8);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(format!("{}\n\n(Enter/Esc) Dismiss", error))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::model::{FetchOutcome, SubscriptionItem};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn loaded_app() -> App {
        let client = ApiClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let mut app = App::new(&Config::default(), client);
        let (tx, _rx) = mpsc::channel(8);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(
            generation,
            Ok(FetchOutcome {
                items: vec![SubscriptionItem {
                    id: "s1".to_string(),
                    title: "Sub".to_string(),
                    channel_title: "Rust Videos".to_string(),
                    thumbnail_url: String::new(),
                    channel_id: "UC1".to_string(),
                    channel_url: "https://www.youtube.com/channel/UC1".to_string(),
                    total_item_count: Some(42),
                }],
                total: 60,
            }),
        );
        app
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let app = loaded_app();
        let screen = draw(&app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_list_and_header_render() {
        let app = loaded_app();
        let screen = draw(&app, 100, 20);
        assert!(screen.contains("Rust Videos"));
        assert!(screen.contains("42"));
        assert!(screen.contains("Showing 1 of 60"));
        assert!(screen.contains("Page 1/3"));
    }

    #[tokio::test]
    async fn test_confirm_overlay_render() {
        let mut app = loaded_app();
        app.selection.toggle("s1", true);
        app.pending_confirm = Some(ConfirmAction::Unsubscribe { count: 1 });
        let screen = draw(&app, 100, 20);
        assert!(screen.contains("Unsubscribe from 1 channel?"));
    }

    #[tokio::test]
    async fn test_error_overlay_render() {
        let mut app = loaded_app();
        app.error_dialog = Some("Unsubscribe failed: boom".to_string());
        let screen = draw(&app, 100, 20);
        assert!(screen.contains("Unsubscribe failed: boom"));
    }

    #[tokio::test]
    async fn test_help_overlay_render() {
        let mut app = loaded_app();
        app.show_help = true;
        let screen = draw(&app, 100, 40);
        assert!(screen.contains("Unsubscribe from selected"));
    }
}

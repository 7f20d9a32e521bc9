use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

/// Bordered box with two lines of content.
pub(super) const HEIGHT: u16 = 4;

const SPINNER: [char; SPINNER_FRAMES] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Render the query summary and filter box.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let requests = &app.requests;
    let query = requests.query();
    let (shown, total) = requests.showing();
    let dim = Style::default().fg(Color::DarkGray);
    let sep = || Span::styled("  |  ", dim);

    let mut summary = vec![
        Span::styled(
            format!("Showing {} of {}", shown, total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::raw(format!("Page {}/{}", query.page, requests.page_count())),
        sep(),
        Span::raw(format!("Sort: {}", query.sort_order.label())),
        sep(),
        Span::raw(format!("Selected: {}", app.selection.len())),
    ];

    if requests.is_loading() {
        summary.push(sep());
        summary.push(Span::styled(
            format!("{} Loading", SPINNER[app.spinner_frame % SPINNER_FRAMES]),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(synced) = app.last_synced {
        summary.push(sep());
        summary.push(Span::styled(
            format!("Synced {}", synced.format("%H:%M:%S")),
            dim,
        ));
    }

    let filter_line = if app.filter_editing {
        Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Cyan)),
            Span::raw(requests.draft_filter()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled("   (Enter) apply  (Esc) cancel", dim),
        ])
    } else if query.applied_filter.is_empty() {
        Line::from(Span::styled("Filter: none", dim))
    } else {
        Line::from(vec![
            Span::raw("Filter: "),
            Span::styled(
                query.applied_filter.as_str(),
                Style::default().fg(Color::Cyan),
            ),
        ])
    };

    let border_style = if app.filter_editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(vec![Line::from(summary), filter_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Subscriptions "),
    );
    f.render_widget(paragraph, area);
}

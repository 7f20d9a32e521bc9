use crate::app::App;
use crate::model::SubscriptionItem;
use crate::util::{sanitize_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Width reserved for the checkbox column.
const CHECKBOX_WIDTH: usize = 4;
/// Width reserved for the right-hand item count.
const COUNT_WIDTH: usize = 12;

fn format_count(count: Option<u64>) -> String {
    match count {
        Some(1) => "1 video".to_string(),
        Some(n) => format!("{} videos", n),
        None => "—".to_string(),
    }
}

fn row(item: &SubscriptionItem, selected: bool, name_width: usize) -> ListItem<'static> {
    let checkbox = if selected {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::raw("[ ] ")
    };

    let name = sanitize_line(item.display_name());
    let name = truncate_to_width(&name, name_width).into_owned();
    let padding = name_width.saturating_sub(UnicodeWidthStr::width(name.as_str()));

    let name_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        checkbox,
        Span::styled(name, name_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(
            format!("{:>width$}", format_count(item.total_item_count), width = COUNT_WIDTH),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

/// Render the subscription list for the current page.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let requests = &app.requests;
    let block = Block::default().borders(Borders::ALL);

    if requests.items().is_empty() {
        let msg = if requests.is_loading() {
            "Loading subscriptions..."
        } else if requests.last_error().is_some() && !requests.has_loaded() {
            "Could not load subscriptions. Press r to retry or L to log in."
        } else if !requests.query().applied_filter.is_empty() {
            "No subscriptions match this filter"
        } else {
            "No subscriptions"
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let name_width = inner_width.saturating_sub(CHECKBOX_WIDTH + COUNT_WIDTH + 1);

    let items: Vec<ListItem> = requests
        .items()
        .iter()
        .map(|item| row(item, app.selection.is_selected(&item.id), name_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

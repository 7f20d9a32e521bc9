//! Help overlay listing the live keybindings, config overrides included.
//!
//! Keys bound to the same action are merged into one row. A short
//! "Behaviour" section at the end reflects the unsubscribe settings.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_box;

const SECTIONS: [(Context, &str); 3] = [
    (Context::Global, "General"),
    (Context::List, "Subscriptions"),
    (Context::FilterInput, "While filtering"),
];

/// One line of the help table.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HelpLine {
    Heading(&'static str),
    Binding { keys: String, description: &'static str },
    Blank,
}

fn help_lines(app: &App) -> Vec<HelpLine> {
    let bindings = app.keybindings.all_bindings();
    let mut lines = Vec::new();

    for (ctx, heading) in SECTIONS {
        // Keep first-seen order of actions while merging their keys
        let mut merged: Vec<(Action, Vec<String>, &'static str)> = Vec::new();
        for (_, key, action, description) in bindings.iter().filter(|(c, ..)| *c == ctx) {
            match merged.iter().position(|(a, ..)| a == action) {
                Some(i) => merged[i].1.push(key.clone()),
                None => merged.push((*action, vec![key.clone()], *description)),
            }
        }
        if merged.is_empty() {
            continue;
        }

        lines.push(HelpLine::Heading(heading));
        lines.extend(merged.into_iter().map(|(_, keys, description)| HelpLine::Binding {
            keys: keys.join(", "),
            description,
        }));
        lines.push(HelpLine::Blank);
    }

    lines.push(HelpLine::Heading("Behaviour"));
    lines.push(HelpLine::Binding {
        keys: on_off(app.confirm_unsubscribe),
        description: "Confirm before unsubscribing",
    });
    lines.push(HelpLine::Binding {
        keys: on_off(app.refetch_after_unsubscribe),
        description: "Reload the page after unsubscribing",
    });
    lines
}

fn on_off(flag: bool) -> String {
    let label = if flag { "on" } else { "off" };
    label.to_string()
}

fn to_row(line: HelpLine) -> Row<'static> {
    match line {
        HelpLine::Heading(title) => Row::new(vec![Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))]),
        HelpLine::Binding { keys, description } => Row::new(vec![
            Line::from(Span::styled(keys, Style::default().fg(Color::Yellow))),
            Line::from(description),
        ]),
        HelpLine::Blank => Row::new(vec![Line::from("")]),
    }
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let overlay = centered_box(area, area.width * 4 / 5, area.height * 4 / 5);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    let lines = help_lines(app);
    let visible_height = overlay.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let close_key = app
        .keybindings
        .key_for(Action::ShowHelp)
        .unwrap_or_else(|| "?".to_string());
    let title = if max_scroll > 0 {
        format!(" Keys {}/{} ", scroll + 1, max_scroll + 1)
    } else {
        format!(" Keys ({} to close) ", close_key)
    };

    let rows: Vec<Row> = lines
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .map(to_row)
        .collect();

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(20)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );

    f.render_widget(Clear, overlay);
    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let footer = Rect {
            x: overlay.x + 1,
            y: overlay.bottom().saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                " more below, j/k to scroll ",
                Style::default().fg(Color::DarkGray),
            )),
            footer,
        );
    }
}

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{AppState, View};
use crate::ui::theme::{ACCENT, BORDER, MUTED, STATUS_WARN, TEXT};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// View tabs, plus a spinner and count while workflows are in flight.
pub fn widget(state: &AppState) -> Paragraph<'static> {
    let text_style = Style::default().fg(TEXT);
    let separator_style = Style::default().fg(MUTED);
    let active_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled(" ", text_style)];
    for (idx, view) in View::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  │  ", separator_style));
        }
        let style = if *view == state.active_view {
            active_style
        } else {
            text_style
        };
        spans.push(Span::styled(format!("{} {}", idx + 1, view.title()), style));
    }

    let active = state.workflows.values().filter(|wf| !wf.is_terminal()).count();
    if active > 0 {
        let frame = SPINNER[(state.ui.spinner_frame % SPINNER.len() as u64) as usize];
        spans.push(Span::styled("  │  ", separator_style));
        spans.push(Span::styled(
            format!("{frame} {active} running"),
            Style::default().fg(STATUS_WARN),
        ));
    }

    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(BORDER)),
    )
}

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{AppState, View};
use crate::ui::theme::{BORDER, STATUS_ERROR, TEXT};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn hints(view: View) -> &'static str {
    match view {
        View::Commands => " j/k: Move │ Enter: Run │ Tab: Next view │ s: Save │ q: Quit",
        View::Workflows => " j/k: Move │ c: Cancel │ y: Copy output │ Tab: Next view │ q: Quit",
        View::Logs => " j/k: Scroll │ PgUp/PgDn: Page │ Tab: Next view │ q: Quit",
        View::Help => " 1-4: Jump to view │ Tab: Next view │ q: Quit",
    }
}

/// Key hints for the active view, replaced by the error banner while one
/// is shown.
pub fn widget(state: &AppState, area: Rect) -> Paragraph<'static> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER));

    if let Some(message) = &state.error_message {
        let style = Style::default().fg(STATUS_ERROR);
        let line = Line::from(vec![
            Span::styled(format!(" Error: {message}"), style),
            Span::styled("  (Esc to dismiss)", style.add_modifier(Modifier::DIM)),
        ]);
        return Paragraph::new(line).block(block);
    }

    let hints = hints(state.active_view);
    let version = format!("v{} ", VERSION);

    // Pad by chars, not bytes; the separators are multi-byte.
    let content_width = area.width.saturating_sub(2) as usize;
    let padding = content_width
        .saturating_sub(hints.chars().count())
        .saturating_sub(version.chars().count());

    let text_style = Style::default().fg(TEXT).add_modifier(Modifier::DIM);
    let line = Line::from(vec![
        Span::styled(hints, text_style),
        Span::styled(" ".repeat(padding), text_style),
        Span::styled(version, text_style),
    ]);

    Paragraph::new(line)
        .style(text_style)
        .alignment(Alignment::Left)
        .block(block)
}

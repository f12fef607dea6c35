use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::state::{AppState, LogLevel, View, WorkflowState, WorkflowStatus};
use crate::ui::layout::{layout_regions, split_master_detail};
use crate::ui::theme::{
    ACCENT, BORDER, MUTED, SELECTED_BG, STATUS_ERROR, STATUS_OK, STATUS_WARN, TEXT,
};
use crate::ui::{footer, header};

pub fn draw(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let (header_area, body, footer_area) = layout_regions(area);

    frame.render_widget(header::widget(state), header_area);
    frame.render_widget(Clear, body);
    match state.active_view {
        View::Commands => draw_commands(frame, state, body),
        View::Workflows => draw_workflows(frame, state, body),
        View::Logs => draw_logs(frame, state, body),
        View::Help => draw_help(frame, body),
    }
    frame.render_widget(footer::widget(state, footer_area), footer_area);
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {title} "), Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
}

fn selectable(line: Line<'static>, selected: bool) -> Line<'static> {
    if selected {
        line.style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
    } else {
        line
    }
}

fn draw_commands(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let mut lines = Vec::new();
    if state.commands.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No commands configured.",
            Style::default().fg(MUTED),
        )));
    }
    for (idx, entry) in state.commands.entries.iter().enumerate() {
        let selected = idx == state.commands.selected_index;
        let marker = if selected { "> " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(entry.label.clone(), Style::default().fg(TEXT)),
        ];
        if !entry.description.is_empty() {
            spans.push(Span::styled(
                format!("  {}", entry.description),
                Style::default().fg(MUTED),
            ));
        }
        lines.push(selectable(Line::from(spans), selected));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("Commands")), area);
}

fn status_style(status: WorkflowStatus) -> Style {
    let color = match status {
        WorkflowStatus::Pending | WorkflowStatus::Running => STATUS_WARN,
        WorkflowStatus::Completed => STATUS_OK,
        WorkflowStatus::Failed => STATUS_ERROR,
        WorkflowStatus::Cancelled => MUTED,
    };
    Style::default().fg(color)
}

fn draw_workflows(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let (list_area, detail_area) = split_master_detail(area);
    let selected = state.selected_workflow().map(|wf| wf.id.as_str());

    let mut lines = Vec::new();
    if state.workflows.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing run yet.",
            Style::default().fg(MUTED),
        )));
    }
    for wf in state.workflows.values() {
        let line = Line::from(vec![
            Span::styled(
                format!("{:<10}", wf.status.as_str()),
                status_style(wf.status),
            ),
            Span::styled(wf.id.clone(), Style::default().fg(TEXT)),
        ]);
        lines.push(selectable(line, Some(wf.id.as_str()) == selected));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("Workflows")), list_area);

    if detail_area.width == 0 {
        return;
    }
    let detail = match state.selected_workflow() {
        Some(wf) => workflow_detail(wf),
        None => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(detail)
            .wrap(Wrap { trim: false })
            .block(panel("Output")),
        detail_area,
    );
}

fn workflow_detail(wf: &WorkflowState) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(wf.kind().as_str(), Style::default().fg(MUTED)),
        Span::raw("  "),
        Span::styled(wf.status.as_str(), status_style(wf.status)),
        Span::raw(format!("  {:>3.0}%", wf.progress * 100.0)),
    ])];
    if let Some(error) = &wf.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(STATUS_ERROR),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(wf.output().lines().map(|l| Line::from(l.to_string())));
    lines
}

fn level_style(level: LogLevel) -> Style {
    let color = match level {
        LogLevel::Debug => MUTED,
        LogLevel::Info => TEXT,
        LogLevel::Warn => STATUS_WARN,
        LogLevel::Error => STATUS_ERROR,
    };
    Style::default().fg(color)
}

fn draw_logs(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let lines: Vec<Line<'static>> = state
        .logs
        .entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("{:<6}", format!("{:?}", entry.level).to_uppercase()),
                    level_style(entry.level),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(TEXT)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((state.ui.scroll_offset, 0))
            .block(panel("Logs")),
        area,
    );
}

fn draw_help(frame: &mut Frame<'_>, area: Rect) {
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<14}"), Style::default().fg(ACCENT)),
            Span::styled(what, Style::default().fg(TEXT)),
        ])
    };
    let lines = vec![
        key("1 2 3 4", "jump to Commands, Workflows, Logs, Help"),
        key("Tab", "next view"),
        key("j / k", "move selection or scroll"),
        key("Enter", "run the selected command"),
        key("c", "cancel the selected workflow"),
        key("y", "copy the selected workflow's output"),
        key("s", "save a state snapshot"),
        key("Esc", "dismiss the error banner"),
        key("q / Ctrl+C", "quit"),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Help")), area);
}

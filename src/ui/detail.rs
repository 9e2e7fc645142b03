//! Endpoint detail view rendering.
//!
//! Shows one endpoint's recent results and its annotated event timeline.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::time::prettify_timestamp;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(ref status) = app.detail else {
        frame.render_widget(
            Paragraph::new("Loading endpoint...").style(Style::default().fg(theme.border)),
            area,
        );
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(6), // Endpoint info
        Constraint::Min(4),    // Event timeline
    ])
    .split(area);

    // ===== INFO SECTION =====
    let state = match status.results.last() {
        Some(result) => result.state_name().to_string(),
        None => "unknown".to_string(),
    };
    // Derived once per payload change, alongside the narrative
    let stats_text = match &app.detail_stats {
        Some(stats) => format!(
            "{} / {} / {} ms (min/avg/max)",
            stats.min_ms, stats.average_ms, stats.max_ms
        ),
        None => "no results yet".to_string(),
    };

    let mut info_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", status.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(state.clone(), theme.state_style(&state)),
        ]),
        Line::from(""),
        Line::from(format!(" Response time: {}", stats_text)),
    ];
    if let Some(group) = &status.group {
        info_lines.push(Line::from(format!(" Group: {}", group)));
    }

    let info_block = Block::default()
        .title(" Endpoint ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));
    frame.render_widget(Paragraph::new(info_lines).block(info_block), chunks[0]);

    // ===== TIMELINE SECTION =====
    let now = Utc::now();
    let timeline_lines: Vec<Line> = if app.narrative.is_empty() {
        vec![Line::from(Span::styled(
            " No events recorded",
            Style::default().fg(theme.border),
        ))]
    } else {
        app.narrative
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<42}", entry.fancy_text),
                        Style::default(),
                    ),
                    // Recomputed against now on every draw
                    Span::styled(
                        format!("{:<16}", entry.fancy_time_ago(now)),
                        Style::default().fg(theme.highlight),
                    ),
                    Span::styled(
                        prettify_timestamp(entry.event.timestamp),
                        Style::default().fg(theme.border),
                    ),
                ])
            })
            .collect()
    };

    let timeline_block = Block::default()
        .title(" Events ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(timeline_lines).block(timeline_block), chunks[1]);
}

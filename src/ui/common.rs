//! Common UI components shared across views.
//!
//! Header bar, status bar, and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, View};
use crate::ui::theme::Theme;

/// Render the header bar with an overall health summary.
pub fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let total: usize = app.groups.iter().map(|g| g.statuses.len()).sum();
    if total == 0 {
        let line = Line::from(vec![
            Span::styled(" STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let unhealthy = app
        .groups
        .iter()
        .flat_map(|g| g.statuses.iter())
        .filter(|s| matches!(s.results.last(), Some(r) if !r.success))
        .count();

    let (summary, state) = if unhealthy > 0 {
        (format!("{}/{} unhealthy", unhealthy, total), "unhealthy")
    } else {
        (format!("{} endpoints healthy", total), "healthy")
    };

    let line = Line::from(vec![
        Span::styled(" STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("| "),
        Span::styled("● ", theme.state_style(state)),
        Span::raw(summary),
        Span::raw(format!("  | page {}", app.page)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar with key hints and the last fetch error.
pub fn render_status_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let hints = match app.view {
        View::Dashboard => " q quit | ↑↓ select | ↵ detail | ←→ page | c collapse | i interval | d dark | r refresh | ? help",
        View::Detail => " q quit | esc back | i interval | r refresh | ? help",
    };

    let line = match app.load_error() {
        Some(error) => Line::from(vec![
            Span::styled("fetch failed: ", theme.state_style("unhealthy")),
            Span::raw(error),
            Span::styled("  (showing last known state)", Style::default().fg(theme.border)),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(theme.border))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help overlay.
pub fn render_help(frame: &mut Frame, theme: &Theme, area: Rect) {
    let width = 60.min(area.width);
    let height = 16.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    let lines = vec![
        Line::from(""),
        Line::from("  ↑/k, ↓/j      select endpoint"),
        Line::from("  Enter         open endpoint detail"),
        Line::from("  Esc/Backspace back to dashboard"),
        Line::from("  ←/→           previous / next page"),
        Line::from("  c             collapse/expand selected group"),
        Line::from("  i             cycle refresh interval"),
        Line::from("  d             toggle dark mode"),
        Line::from("  r             refresh now"),
        Line::from("  hover         result details tooltip"),
        Line::from("  q             quit"),
        Line::from(""),
        Line::from("  Any key closes this help."),
    ];

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

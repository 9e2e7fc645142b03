//! Dashboard view rendering and hit-testing.
//!
//! The dashboard is a grouped grid: one header row per group, one row per
//! endpoint in expanded groups. Each endpoint row shows its name, a strip
//! of colored cells for the recent results (oldest to newest), and the
//! min/avg/max response times. The same row layout drives both rendering
//! and mouse hit-testing so the two can never disagree.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{tooltip_cell_height, App, HoveredResult, TOOLTIP_CELL_WIDTH};
use crate::data::time::{format_time_ago, prettify_timestamp};
use crate::data::{EndpointStatus, StatusGroup};
use crate::ui::theme::Theme;

/// First content row (below the header bar and column ruler).
pub const CONTENT_START_ROW: u16 = 2;
/// Width reserved for the endpoint name column.
pub const NAME_COL_WIDTH: u16 = 28;
/// Column where the result cells start.
pub const RESULTS_COL: u16 = 30;
/// Terminal columns per result cell.
pub const RESULT_CELL_WIDTH: u16 = 2;
/// Width reserved on the right for response-time stats.
pub const STATS_WIDTH: u16 = 26;

/// One rendered dashboard row.
pub enum DashboardRow<'a> {
    GroupHeader {
        group: &'a StatusGroup,
        collapsed: bool,
    },
    Endpoint {
        status: &'a EndpointStatus,
        /// Position among visible endpoints, for selection.
        visible_index: usize,
    },
}

/// The rows of the dashboard in display order, honoring collapsed
/// groups.
pub fn layout_rows(app: &App) -> Vec<DashboardRow<'_>> {
    let mut rows = Vec::new();
    let mut visible_index = 0;
    for group in &app.groups {
        let collapsed = app.settings.is_group_collapsed(&group.name);
        rows.push(DashboardRow::GroupHeader { group, collapsed });
        if collapsed {
            continue;
        }
        for status in &group.statuses {
            rows.push(DashboardRow::Endpoint {
                status,
                visible_index,
            });
            visible_index += 1;
        }
    }
    rows
}

/// How many result cells fit for the given terminal width.
pub fn max_result_cells(terminal_width: u16) -> usize {
    let available = terminal_width.saturating_sub(RESULTS_COL + STATS_WIDTH);
    (available / RESULT_CELL_WIDTH) as usize
}

/// Map a mouse position to the result cell under it, if any.
pub fn hit_test_result(
    app: &App,
    column: u16,
    row: u16,
    terminal_width: u16,
) -> Option<HoveredResult> {
    if row < CONTENT_START_ROW || column < RESULTS_COL {
        return None;
    }
    let rows = layout_rows(app);
    let DashboardRow::Endpoint { status, .. } = rows.get((row - CONTENT_START_ROW) as usize)?
    else {
        return None;
    };

    let shown = status.results.len().min(max_result_cells(terminal_width));
    let cell = ((column - RESULTS_COL) / RESULT_CELL_WIDTH) as usize;
    if cell >= shown {
        return None;
    }
    // Cells show the newest window of results, oldest on the left
    let result_index = status.results.len() - shown + cell;
    Some(HoveredResult {
        endpoint_key: status.key.clone(),
        result_index,
    })
}

/// Map a mouse position to the visible endpoint row under it, if any.
pub fn hit_test_endpoint(app: &App, row: u16) -> Option<usize> {
    if row < CONTENT_START_ROW {
        return None;
    }
    let rows = layout_rows(app);
    match rows.get((row - CONTENT_START_ROW) as usize)? {
        DashboardRow::Endpoint { visible_index, .. } => Some(*visible_index),
        DashboardRow::GroupHeader { .. } => None,
    }
}

/// Render the dashboard content area.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    if app.groups.is_empty() {
        let placeholder = if app.load_error().is_some() {
            "Waiting for the server..."
        } else {
            "No endpoints on this page"
        };
        frame.render_widget(
            Paragraph::new(placeholder).style(Style::default().fg(theme.border)),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for row in layout_rows(app) {
        match row {
            DashboardRow::GroupHeader { group, collapsed } => {
                let marker = if collapsed { "▶" } else { "▼" };
                lines.push(Line::from(Span::styled(
                    format!("{} {} ({})", marker, group.name, group.statuses.len()),
                    theme.header,
                )));
            }
            DashboardRow::Endpoint {
                status,
                visible_index,
            } => {
                lines.push(endpoint_line(app, theme, status, visible_index, area.width));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines), area);

    if app.tooltip.visible {
        let screen = frame.area();
        render_tooltip_overlay(frame, app, theme, screen);
    }
}

fn endpoint_line(
    app: &App,
    theme: &Theme,
    status: &EndpointStatus,
    visible_index: usize,
    terminal_width: u16,
) -> Line<'static> {
    let name: String = status.name.chars().take(NAME_COL_WIDTH as usize - 2).collect();
    let name_style = if visible_index == app.selected_index {
        theme.selected
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(
        format!("{:<width$}", name, width = NAME_COL_WIDTH as usize),
        name_style,
    )];

    // Result strip: newest window, oldest first
    spans.push(Span::raw("  "));
    let shown = status.results.len().min(max_result_cells(terminal_width));
    let start = status.results.len() - shown;
    for result in &status.results[start..] {
        spans.push(Span::styled(
            "■ ",
            Style::default().fg(theme.result_color(Some(result))),
        ));
    }
    if shown == 0 {
        spans.push(Span::styled("no data", Style::default().fg(theme.nodata)));
    }

    if let Some(stats) = app.stats.get(&status.key) {
        let text = format!(
            "  {} / {} / {} ms",
            stats.min_ms, stats.average_ms, stats.max_ms
        );
        spans.push(Span::styled(text, Style::default().fg(theme.border)));
    }

    Line::from(spans)
}

/// Render the hover tooltip at its computed placement.
fn render_tooltip_overlay(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(result) = app.hovered_result() else {
        return;
    };

    let (left, top) = app.tooltip_cell_position();
    let height = tooltip_cell_height(result) + 2;
    let width = TOOLTIP_CELL_WIDTH.min(area.width);
    let left = left.min(area.width.saturating_sub(width));
    let top = top.min(area.height.saturating_sub(height));
    let overlay = Rect::new(left, top, width, height.min(area.height));

    let now = Utc::now();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                prettify_timestamp(result.timestamp),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", format_time_ago(now, result.timestamp)),
                Style::default().fg(theme.border),
            ),
        ]),
        Line::from(format!(
            "Status {} in {} ms",
            result.status,
            result.duration / 1_000_000
        )),
    ];
    if let Some(hostname) = &result.hostname {
        lines.push(Line::from(format!("Host: {}", hostname)));
    }
    for condition in &result.condition_results {
        let (mark, state) = if condition.success {
            ("✓", "healthy")
        } else {
            ("✗", "unhealthy")
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark), theme.state_style(state)),
            Span::raw(condition.condition.clone()),
        ]));
    }
    for error in &result.errors {
        lines.push(Line::from(Span::styled(
            format!("error: {}", error),
            theme.state_style("unhealthy"),
        )));
    }

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

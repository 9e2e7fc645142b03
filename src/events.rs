//! Terminal event handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::ui::dashboard;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Enter detail view
        KeyCode::Enter => {
            if app.view == View::Dashboard {
                app.enter_detail();
            }
        }

        // Back to the dashboard
        KeyCode::Esc | KeyCode::Backspace => app.leave_detail(),

        // Paging (dashboard only; set_page ignores it in detail)
        KeyCode::Left => app.prev_page(),
        KeyCode::Right => app.next_page(),

        // Collapse/expand the selected endpoint's group
        KeyCode::Char('c') => {
            if app.view == View::Dashboard {
                app.toggle_selected_group();
            }
        }

        // Cycle the refresh interval through the allow-list
        KeyCode::Char('i') => {
            app.cycle_refresh_interval();
        }

        // Dark mode
        KeyCode::Char('d') => app.toggle_dark_mode(),

        // Refresh now
        KeyCode::Char('r') => app.refresh_now(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events.
///
/// Hovering a result cell raises the tooltip; moving off it lowers it.
/// Those two transitions are the only places tooltip visibility changes.
pub fn handle_mouse_event(
    app: &mut App,
    mouse: MouseEvent,
    terminal_width: u16,
    terminal_height: u16,
) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Moved => {
            if app.view != View::Dashboard {
                return;
            }
            match dashboard::hit_test_result(app, mouse.column, mouse.row, terminal_width) {
                Some(hovered) => {
                    let unchanged = app.hovered.as_ref() == Some(&hovered);
                    if !unchanged {
                        app.hover_result(
                            hovered,
                            mouse.column,
                            mouse.row,
                            terminal_width,
                            terminal_height,
                        );
                    }
                }
                None => {
                    if app.tooltip.visible {
                        app.hover_clear();
                    }
                }
            }
        }

        // Click to select, double action via Enter
        MouseEventKind::Down(MouseButton::Left) => {
            if app.view == View::Dashboard {
                if let Some(index) = dashboard::hit_test_endpoint(app, mouse.row) {
                    app.selected_index = index;
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.leave_detail(),

        _ => {}
    }
}

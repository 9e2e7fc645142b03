//! Application state and navigation logic.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::ApiClient;
use crate::data::{
    build_narrative, group_statuses, AnnotatedEvent, EndpointStatus, HealthResult,
    ResponseTimeStats, StatusGroup,
};
use crate::poller::{PollPayload, PollView, Poller};
use crate::settings::{SettingsStore, REFRESH_INTERVALS};
use crate::ui::tooltip::{AnchorRect, DocumentSize, TooltipSize, TooltipState};

/// The current view in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Grouped grid of all endpoints on the current page.
    Dashboard,
    /// One endpoint's results and event timeline.
    Detail,
}

/// A result cell the cursor is hovering over.
#[derive(Debug, Clone, PartialEq)]
pub struct HoveredResult {
    pub endpoint_key: String,
    /// Index into the endpoint's `results`.
    pub result_index: usize,
}

/// Pixels per terminal cell when feeding cell coordinates through the
/// pixel-tuned tooltip placement rules.
const PX_PER_CELL: f64 = 10.0;

/// Tooltip overlay width in terminal cells.
pub const TOOLTIP_CELL_WIDTH: u16 = 44;

/// Main application state.
pub struct App {
    pub running: bool,
    pub view: View,
    pub show_help: bool,

    client: ApiClient,
    poller: Poller,
    pub settings: SettingsStore,

    /// Current dashboard page (1-based, as the API counts).
    pub page: u32,
    /// Last known good dashboard payload.
    statuses: Vec<EndpointStatus>,
    /// Derived: grouped layout, rebuilt only when the payload changes.
    pub groups: Vec<StatusGroup>,
    /// Derived: per-endpoint latency stats, keyed by endpoint key.
    pub stats: HashMap<String, ResponseTimeStats>,

    /// Last known good detail payload, present only in the detail view.
    pub detail: Option<EndpointStatus>,
    /// Derived: annotated timeline for the detail view.
    pub narrative: Vec<AnnotatedEvent>,
    /// Derived: latency stats for the detail payload.
    pub detail_stats: Option<ResponseTimeStats>,

    /// Selected endpoint position among currently visible rows.
    pub selected_index: usize,

    pub tooltip: TooltipState,
    pub hovered: Option<HoveredResult>,
    /// Geometry of the last hover, kept so the placement can be
    /// recomputed when a refresh changes the tooltip's content.
    tooltip_anchor: AnchorRect,
    tooltip_document: DocumentSize,
}

impl App {
    pub fn new(client: ApiClient, mut settings: SettingsStore) -> Self {
        let interval = Duration::from_secs(settings.refresh_interval());
        let page = 1;
        let poller = Poller::spawn(client.clone(), PollView::Dashboard { page }, interval);
        Self {
            running: true,
            view: View::Dashboard,
            show_help: false,
            client,
            poller,
            settings,
            page,
            statuses: Vec::new(),
            groups: Vec::new(),
            stats: HashMap::new(),
            detail: None,
            narrative: Vec::new(),
            detail_stats: None,
            selected_index: 0,
            tooltip: TooltipState::default(),
            hovered: None,
            tooltip_anchor: AnchorRect::default(),
            tooltip_document: DocumentSize::default(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Error from the most recent fetch, for the status bar.
    pub fn load_error(&self) -> Option<String> {
        self.poller.last_error()
    }

    /// Drain the poller and apply any update that survived the
    /// generation check. Replacement is gated on deep equality: an
    /// identical payload triggers no recomputation downstream.
    pub fn poll_updates(&mut self) {
        let Some(payload) = self.poller.poll() else {
            return;
        };
        match payload {
            PollPayload::Statuses(statuses) => {
                if statuses != self.statuses {
                    self.apply_statuses(statuses);
                }
            }
            PollPayload::Status(status) => {
                if self.view == View::Detail && self.detail.as_ref() != Some(status.as_ref()) {
                    self.apply_detail(*status);
                }
            }
        }
    }

    /// The "snapshot changed" signal: rebuild everything derived from
    /// the dashboard payload.
    fn apply_statuses(&mut self, statuses: Vec<EndpointStatus>) {
        self.groups = group_statuses(&statuses);
        self.stats = statuses
            .iter()
            .filter_map(|s| ResponseTimeStats::from_results(&s.results).map(|r| (s.key.clone(), r)))
            .collect();
        self.statuses = statuses;
        let visible = self.visible_endpoints().len();
        if visible > 0 && self.selected_index >= visible {
            self.selected_index = visible - 1;
        }
        self.refresh_tooltip();
    }

    /// The detail counterpart: rebuild the timeline and latency stats
    /// when the detail payload changes.
    fn apply_detail(&mut self, status: EndpointStatus) {
        self.narrative = build_narrative(&status.events);
        self.detail_stats = ResponseTimeStats::from_results(&status.results);
        self.detail = Some(status);
    }

    /// The payload under an open tooltip changed: re-place it for its
    /// new content, or dismiss it if the hovered result is gone.
    fn refresh_tooltip(&mut self) {
        let Some(hovered) = self.hovered.clone() else {
            return;
        };
        match self.hovered_result_of(&hovered).map(tooltip_size_for) {
            Some(size) => {
                self.tooltip
                    .resize(self.tooltip_anchor, size, self.tooltip_document);
            }
            None => self.hover_clear(),
        }
    }

    /// Endpoints in display order, skipping collapsed groups.
    pub fn visible_endpoints(&self) -> Vec<&EndpointStatus> {
        self.groups
            .iter()
            .filter(|g| !self.settings.is_group_collapsed(&g.name))
            .flat_map(|g| g.statuses.iter())
            .collect()
    }

    pub fn selected_endpoint(&self) -> Option<&EndpointStatus> {
        self.visible_endpoints().get(self.selected_index).copied()
    }

    pub fn select_next(&mut self) {
        let count = self.visible_endpoints().len();
        if count > 0 && self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Collapse or expand the group containing the selected endpoint.
    /// The flag is persisted keyed by group name, which is why group
    /// order stability matters across refreshes.
    pub fn toggle_selected_group(&mut self) {
        let Some(name) = self
            .selected_endpoint()
            .and_then(|e| self.group_name_of(&e.key))
        else {
            return;
        };
        let collapsed = self.settings.is_group_collapsed(&name);
        self.settings.set_group_collapsed(&name, !collapsed);
        let visible = self.visible_endpoints().len();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
    }

    fn group_name_of(&self, key: &str) -> Option<String> {
        self.groups
            .iter()
            .find(|g| g.statuses.iter().any(|s| s.key == key))
            .map(|g| g.name.clone())
    }

    /// Open the detail view for the selected endpoint. The poller is
    /// repointed, which also invalidates any dashboard fetch in flight.
    pub fn enter_detail(&mut self) {
        let Some(key) = self.selected_endpoint().map(|e| e.key.clone()) else {
            return;
        };
        self.view = View::Detail;
        self.detail = None;
        self.narrative.clear();
        self.detail_stats = None;
        self.poller.set_view(PollView::Detail { key, page: 1 });
    }

    /// Return to the dashboard, discarding detail state. A late detail
    /// response is dropped by the generation check, not by us.
    pub fn leave_detail(&mut self) {
        if self.view != View::Detail {
            return;
        }
        self.view = View::Dashboard;
        self.detail = None;
        self.narrative.clear();
        self.detail_stats = None;
        self.poller.set_view(PollView::Dashboard { page: self.page });
    }

    /// Move to another dashboard page, refetching immediately.
    pub fn set_page(&mut self, page: u32) {
        if self.view != View::Dashboard || page == 0 || page == self.page {
            return;
        }
        self.page = page;
        self.selected_index = 0;
        self.poller.set_view(PollView::Dashboard { page });
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.set_page(self.page - 1);
        }
    }

    /// Advance the refresh interval to the next allowed value, persist
    /// it, and reschedule the poller (which also refetches immediately).
    pub fn cycle_refresh_interval(&mut self) -> u64 {
        let current = self.settings.refresh_interval();
        let position = REFRESH_INTERVALS.iter().position(|&s| s == current);
        let next = match position {
            Some(i) => REFRESH_INTERVALS[(i + 1) % REFRESH_INTERVALS.len()],
            None => REFRESH_INTERVALS[0],
        };
        self.settings.set_refresh_interval(next);
        self.poller.set_interval(Duration::from_secs(next));
        next
    }

    /// Fetch now without waiting for the next tick.
    pub fn refresh_now(&mut self) {
        self.poller.refresh();
    }

    pub fn toggle_dark_mode(&mut self) {
        let enabled = !self.settings.dark_mode();
        self.settings.set_dark_mode(enabled);
    }

    /// Hover entered a result cell at the given terminal coordinates.
    pub fn hover_result(
        &mut self,
        hovered: HoveredResult,
        cell_column: u16,
        cell_row: u16,
        terminal_width: u16,
        terminal_height: u16,
    ) {
        let size = self
            .hovered_result_of(&hovered)
            .map(tooltip_size_for)
            .unwrap_or_default();
        let anchor = AnchorRect {
            x: cell_column as f64 * PX_PER_CELL,
            y: cell_row as f64 * PX_PER_CELL,
            width: 2.0 * PX_PER_CELL,
            height: PX_PER_CELL,
        };
        let document = DocumentSize {
            width: terminal_width as f64 * PX_PER_CELL,
            height: terminal_height as f64 * PX_PER_CELL,
        };
        self.hovered = Some(hovered);
        self.tooltip_anchor = anchor;
        self.tooltip_document = document;
        self.tooltip.enter(anchor, size, document);
    }

    /// Hover left any result cell.
    pub fn hover_clear(&mut self) {
        self.hovered = None;
        self.tooltip.leave();
    }

    /// The result the tooltip is anchored to, if it still exists in the
    /// current payload.
    pub fn hovered_result(&self) -> Option<&HealthResult> {
        let hovered = self.hovered.clone()?;
        self.hovered_result_of(&hovered)
    }

    fn hovered_result_of(&self, hovered: &HoveredResult) -> Option<&HealthResult> {
        self.statuses
            .iter()
            .find(|s| s.key == hovered.endpoint_key)
            .and_then(|s| s.results.get(hovered.result_index))
    }

    /// Tooltip placement in terminal cells, derived from the pixel-space
    /// computation.
    pub fn tooltip_cell_position(&self) -> (u16, u16) {
        let position = self.tooltip.position;
        (
            (position.left / PX_PER_CELL).max(0.0) as u16,
            (position.top / PX_PER_CELL).max(0.0) as u16,
        )
    }
}

/// Measured size of the tooltip for a result, in the same pixel space as
/// the placement rules. Width is fixed; height grows with the number of
/// condition and error lines.
pub fn tooltip_size_for(result: &HealthResult) -> TooltipSize {
    TooltipSize {
        width: TOOLTIP_CELL_WIDTH as f64 * PX_PER_CELL,
        height: tooltip_cell_height(result) as f64 * PX_PER_CELL,
    }
}

/// Number of terminal rows the tooltip needs for a result.
pub fn tooltip_cell_height(result: &HealthResult) -> u16 {
    (4 + result.condition_results.len() + result.errors.len()) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let _guard = RUNTIME.enter();
        let client = ApiClient::new("http://localhost:1", None).unwrap();
        let settings = SettingsStore::load(dir.path().join("settings.json"));
        App::new(client, settings)
    }

    // A runtime the poller task can live on for the duration of tests
    static RUNTIME: std::sync::LazyLock<tokio::runtime::Runtime> =
        std::sync::LazyLock::new(|| tokio::runtime::Runtime::new().unwrap());

    fn status(key: &str, group: Option<&str>, durations: &[u64]) -> EndpointStatus {
        EndpointStatus {
            key: key.to_string(),
            name: key.to_string(),
            group: group.map(str::to_string),
            results: durations
                .iter()
                .enumerate()
                .map(|(i, &d)| HealthResult {
                    status: 200,
                    hostname: None,
                    duration: d,
                    condition_results: Vec::new(),
                    errors: Vec::new(),
                    success: true,
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
                    state: None,
                })
                .collect(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_apply_statuses_derives_groups_and_stats() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.apply_statuses(vec![
            status("a", Some("core"), &[5_000_000, 7_000_000]),
            status("b", None, &[]),
        ]);

        assert_eq!(app.groups.len(), 2);
        assert_eq!(app.stats.get("a").unwrap().min_ms, 5);
        // No results, no stats entry
        assert!(!app.stats.contains_key("b"));
    }

    #[test]
    fn test_identical_payload_is_not_reapplied() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let payload = vec![status("a", Some("core"), &[5_000_000])];
        app.apply_statuses(payload.clone());
        let groups_before = app.groups.clone();

        // Structurally identical payload: the equality gate in
        // poll_updates would skip recomputation entirely
        assert_eq!(app.statuses, payload);
        app.apply_statuses(payload);
        assert_eq!(app.groups, groups_before);
    }

    #[test]
    fn test_collapsed_group_hides_endpoints() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![
            status("a", Some("core"), &[]),
            status("b", Some("core"), &[]),
            status("c", Some("edge"), &[]),
        ]);
        assert_eq!(app.visible_endpoints().len(), 3);

        app.settings.set_group_collapsed("core", true);
        let visible = app.visible_endpoints();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].key, "c");
    }

    #[test]
    fn test_selection_clamped_after_collapse() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![
            status("a", Some("core"), &[]),
            status("b", Some("core"), &[]),
            status("c", Some("edge"), &[]),
        ]);
        app.selected_index = 2;
        // Selected endpoint is "c" in group "edge"
        app.toggle_selected_group();
        assert!(app.selected_index < app.visible_endpoints().len().max(1));
    }

    #[test]
    fn test_cycle_refresh_interval_walks_allow_list() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        // Default is 300; the next values wrap through the allow-list
        assert_eq!(app.settings.refresh_interval(), 300);
        assert_eq!(app.cycle_refresh_interval(), 600);
        assert_eq!(app.cycle_refresh_interval(), 10);
        assert_eq!(app.settings.refresh_interval(), 10);
    }

    #[test]
    fn test_hover_sets_and_clears_tooltip() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![status("a", None, &[5_000_000])]);

        app.hover_result(
            HoveredResult {
                endpoint_key: "a".to_string(),
                result_index: 0,
            },
            40,
            10,
            120,
            40,
        );
        assert!(app.tooltip.visible);
        assert!(app.hovered_result().is_some());

        app.hover_clear();
        assert!(!app.tooltip.visible);
        assert!(app.hovered_result().is_none());
    }

    #[test]
    fn test_tooltip_replaced_when_hovered_content_changes() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![status("a", None, &[5_000_000])]);

        // Hover near the bottom of a 120x40 terminal: the 4-row tooltip
        // flips above the anchor
        app.hover_result(
            HoveredResult {
                endpoint_key: "a".to_string(),
                result_index: 0,
            },
            40,
            36,
            120,
            40,
        );
        assert_eq!(app.tooltip.position.top, 310.0);

        // A refresh grows the hovered result by twenty error lines; the
        // taller tooltip must be re-placed, not left at its old spot
        let mut grown = status("a", None, &[5_000_000]);
        grown.results[0].errors = (0..20).map(|i| format!("error {i}")).collect();
        app.apply_statuses(vec![grown]);

        assert!(app.tooltip.visible);
        assert_eq!(app.tooltip.position.top, 110.0);
    }

    #[test]
    fn test_tooltip_dismissed_when_hovered_result_vanishes() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![status("a", None, &[5_000_000])]);
        app.hover_result(
            HoveredResult {
                endpoint_key: "a".to_string(),
                result_index: 0,
            },
            40,
            10,
            120,
            40,
        );
        assert!(app.tooltip.visible);

        // The endpoint dropped off the page
        app.apply_statuses(vec![status("b", None, &[])]);
        assert!(!app.tooltip.visible);
        assert!(app.hovered.is_none());
    }

    #[test]
    fn test_detail_stats_derived_with_payload() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![status("a", None, &[])]);
        app.enter_detail();
        assert!(app.detail_stats.is_none());

        app.apply_detail(status("a", None, &[5_000_000, 7_000_000]));
        let stats = app.detail_stats.as_ref().unwrap();
        assert_eq!(stats.min_ms, 5);
        assert_eq!(stats.max_ms, 7);

        app.leave_detail();
        assert!(app.detail_stats.is_none());
    }

    #[test]
    fn test_leave_detail_discards_detail_state() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_statuses(vec![status("a", None, &[])]);
        app.enter_detail();
        assert_eq!(app.view, View::Detail);

        app.leave_detail();
        assert_eq!(app.view, View::Dashboard);
        assert!(app.detail.is_none());
        assert!(app.narrative.is_empty());
    }
}

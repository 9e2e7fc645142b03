//! Periodic status polling.
//!
//! A background task fetches the current view's payload on a fixed
//! cadence and hands results to the synchronous TUI loop through a
//! channel. Parameter changes (page, interval, view) take effect
//! immediately: the task refetches out of cadence and reschedules.
//!
//! An in-flight request is never cancelled when parameters change.
//! Instead every request is keyed to a generation token, and a response
//! whose token no longer matches the current generation is discarded on
//! receipt, so a late response cannot overwrite newer state or apply to
//! a torn-down view.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::data::EndpointStatus;

/// What the poller is currently fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollView {
    /// The paginated dashboard list.
    Dashboard { page: u32 },
    /// A single endpoint's results and events.
    Detail { key: String, page: u32 },
}

#[derive(Debug, Clone, PartialEq)]
struct PollParams {
    view: PollView,
    interval: Duration,
    generation: u64,
}

/// A fetched payload, matching the requested [`PollView`].
#[derive(Debug, Clone, PartialEq)]
pub enum PollPayload {
    Statuses(Vec<EndpointStatus>),
    Status(Box<EndpointStatus>),
}

/// One poll result, tagged with the generation it was requested under.
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    pub generation: u64,
    pub payload: PollPayload,
}

/// Handle to the background polling task.
///
/// Must be created inside a tokio runtime context. Dropping the poller
/// aborts the task; that is the only teardown required.
#[derive(Debug)]
pub struct Poller {
    params_tx: watch::Sender<PollParams>,
    updates_rx: mpsc::Receiver<PollUpdate>,
    generation: u64,
    last_error: Arc<Mutex<Option<String>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Poller {
    /// Spawn the polling task. The first fetch happens immediately.
    pub fn spawn(client: ApiClient, view: PollView, interval: Duration) -> Self {
        let params = PollParams {
            view,
            interval,
            generation: 0,
        };
        let (params_tx, params_rx) = watch::channel(params);
        let (updates_tx, updates_rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let task = tokio::spawn(poll_loop(client, params_rx, updates_tx, error_handle));

        Self {
            params_tx,
            updates_rx,
            generation: 0,
            last_error,
            task,
        }
    }

    /// Drain pending updates and return the newest one that still
    /// belongs to the current generation. Non-blocking.
    pub fn poll(&mut self) -> Option<PollPayload> {
        latest_live_update(&mut self.updates_rx, self.generation)
    }

    /// Change the refresh interval: the schedule is cancelled, a fetch
    /// fires immediately, and ticking resumes at the new cadence.
    pub fn set_interval(&mut self, interval: Duration) {
        if self.params_tx.borrow().interval == interval {
            return;
        }
        self.reconfigure(|params| params.interval = interval);
    }

    /// Change the fetched view (page or dashboard/detail), triggering an
    /// immediate refetch outside the timer cadence.
    pub fn set_view(&mut self, view: PollView) {
        if self.params_tx.borrow().view == view {
            return;
        }
        self.reconfigure(|params| params.view = view);
    }

    /// Force a fetch now, outside the timer cadence. The generation is
    /// bumped so a response to the superseded request is discarded.
    pub fn refresh(&mut self) {
        self.reconfigure(|_| {});
    }

    /// The generation current requests are keyed to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Error from the most recent fetch attempt, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    fn reconfigure<F: FnOnce(&mut PollParams)>(&mut self, apply: F) {
        self.generation += 1;
        let generation = self.generation;
        self.params_tx.send_modify(|params| {
            apply(params);
            params.generation = generation;
        });
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Newest update whose generation matches, discarding stale ones.
fn latest_live_update(
    rx: &mut mpsc::Receiver<PollUpdate>,
    generation: u64,
) -> Option<PollPayload> {
    let mut latest = None;
    while let Ok(update) = rx.try_recv() {
        if update.generation == generation {
            latest = Some(update.payload);
        } else {
            debug!(
                stale = update.generation,
                current = generation,
                "discarding stale poll response"
            );
        }
    }
    latest
}

async fn poll_loop(
    client: ApiClient,
    mut params_rx: watch::Receiver<PollParams>,
    updates_tx: mpsc::Sender<PollUpdate>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        let params = params_rx.borrow_and_update().clone();

        match fetch(&client, &params.view).await {
            Ok(payload) => {
                *last_error.lock().unwrap() = None;
                let update = PollUpdate {
                    generation: params.generation,
                    payload,
                };
                if updates_tx.send(update).await.is_err() {
                    // Receiver dropped, the view is gone
                    break;
                }
            }
            Err(e) => {
                // Transient by definition: keep the last known good
                // state and wait for the next tick
                warn!(error = %e, "status fetch failed");
                *last_error.lock().unwrap() = Some(e.to_string());
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(params.interval) => {}
            changed = params_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                // Loop around for an immediate fetch with the new params
            }
        }
    }
}

async fn fetch(client: &ApiClient, view: &PollView) -> anyhow::Result<PollPayload> {
    match view {
        PollView::Dashboard { page } => {
            let statuses = client.fetch_statuses(*page).await?;
            Ok(PollPayload::Statuses(statuses))
        }
        PollView::Detail { key, page } => {
            let status = client.fetch_status(key, *page).await?;
            Ok(PollPayload::Status(Box::new(status)))
        }
    }
}

//! Event narrative construction for the endpoint detail timeline.
//!
//! The server delivers state-transition events newest first. The timeline
//! annotates each event with human-readable text that depends on what
//! chronologically preceded it, so events are processed oldest to newest
//! and then reversed back for display.

use chrono::{DateTime, Utc};

use super::status::{Event, EventKind};
use super::time::{format_time_ago, pretty_time_difference};

/// An event annotated with its narrative text for the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedEvent {
    pub event: Event,
    /// What changed, e.g. "Endpoint was unhealthy for 10 minutes".
    pub fancy_text: String,
}

impl AnnotatedEvent {
    /// Relative-time label for this event, computed against `now` at
    /// render time rather than cached alongside the narrative.
    pub fn fancy_time_ago(&self, now: DateTime<Utc>) -> String {
        format_time_ago(now, self.event.timestamp)
    }
}

/// Build the annotated timeline from events ordered newest first.
///
/// The output preserves the newest-first order of the input.
pub fn build_narrative(events: &[Event]) -> Vec<AnnotatedEvent> {
    let chronological: Vec<&Event> = events.iter().rev().collect();

    let mut annotated: Vec<AnnotatedEvent> = Vec::with_capacity(chronological.len());
    for i in 0..chronological.len() {
        let event = chronological[i];
        let fancy_text = if i == 0 {
            oldest_event_text(event.kind)
        } else {
            later_event_text(event, chronological[i - 1])
        };
        annotated.push(AnnotatedEvent {
            event: event.clone(),
            fancy_text,
        });
    }

    annotated.reverse();
    annotated
}

/// The oldest event has no predecessor, so its text derives solely from
/// its own kind.
fn oldest_event_text(kind: EventKind) -> String {
    match kind {
        EventKind::Start => "Monitoring started",
        EventKind::Healthy => "Endpoint is healthy",
        EventKind::Unhealthy => "Endpoint is unhealthy",
    }
    .to_string()
}

fn later_event_text(event: &Event, previous: &Event) -> String {
    match event.kind {
        EventKind::Healthy => "Endpoint became healthy".to_string(),
        EventKind::Unhealthy => {
            if previous.kind == EventKind::Start {
                "Endpoint became unhealthy".to_string()
            } else {
                format!(
                    "Endpoint was unhealthy for {}",
                    pretty_time_difference(event.timestamp, previous.timestamp)
                )
            }
        }
        // Not expected after the first event, but must not panic
        EventKind::Start => "Monitoring started".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(kind: EventKind, offset_minutes: i64) -> Event {
        Event {
            kind,
            timestamp: Utc
                .timestamp_opt(1_700_000_000 + offset_minutes * 60, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_empty_events() {
        assert!(build_narrative(&[]).is_empty());
    }

    #[test]
    fn test_single_start_event() {
        let narrative = build_narrative(&[event(EventKind::Start, 0)]);
        assert_eq!(narrative[0].fancy_text, "Monitoring started");
    }

    #[test]
    fn test_oldest_event_texts() {
        let narrative = build_narrative(&[event(EventKind::Healthy, 0)]);
        assert_eq!(narrative[0].fancy_text, "Endpoint is healthy");
        let narrative = build_narrative(&[event(EventKind::Unhealthy, 0)]);
        assert_eq!(narrative[0].fancy_text, "Endpoint is unhealthy");
    }

    #[test]
    fn test_start_unhealthy_healthy_sequence() {
        // Input is newest first: HEALTHY@t0+15m, UNHEALTHY@t0+5m, START@t0
        let events = vec![
            event(EventKind::Healthy, 15),
            event(EventKind::Unhealthy, 5),
            event(EventKind::Start, 0),
        ];
        let narrative = build_narrative(&events);

        // Output stays newest first
        assert_eq!(narrative[0].event.kind, EventKind::Healthy);
        assert_eq!(narrative[2].event.kind, EventKind::Start);

        // Oldest to newest the texts read as the story of the outage;
        // no duration on the UNHEALTHY event since only START precedes it
        let texts: Vec<&str> = narrative
            .iter()
            .rev()
            .map(|e| e.fancy_text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Monitoring started",
                "Endpoint became unhealthy",
                "Endpoint became healthy",
            ]
        );
    }

    #[test]
    fn test_unhealthy_duration_annotation() {
        // HEALTHY then UNHEALTHY 10 minutes later: the second UNHEALTHY's
        // text carries the measured gap to its predecessor
        let events = vec![
            event(EventKind::Unhealthy, 20),
            event(EventKind::Healthy, 10),
            event(EventKind::Start, 0),
        ];
        let narrative = build_narrative(&events);
        assert_eq!(
            narrative[0].fancy_text,
            "Endpoint was unhealthy for 10 minutes"
        );
        assert_eq!(narrative[1].fancy_text, "Endpoint became healthy");
    }

    #[test]
    fn test_recurring_start_does_not_panic() {
        let events = vec![
            event(EventKind::Start, 10),
            event(EventKind::Healthy, 5),
            event(EventKind::Start, 0),
        ];
        let narrative = build_narrative(&events);
        assert_eq!(narrative[0].fancy_text, "Monitoring started");
    }

    #[test]
    fn test_fancy_time_ago_uses_render_time() {
        let e = event(EventKind::Healthy, 0);
        let narrative = build_narrative(&[e.clone()]);
        let now = e.timestamp + chrono::Duration::minutes(5);
        assert_eq!(narrative[0].fancy_time_ago(now), "5 minutes ago");
    }
}

//! Wire-format models for the status API.
//!
//! These mirror the JSON emitted by the server's read-only status API.
//! All models derive `PartialEq` because the poller replaces local state
//! only when a structural comparison shows the new payload differs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of one monitored endpoint, including its most recent
/// results and, on detail fetches, its state-transition events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Group this endpoint belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Health-check results, ordered oldest to newest.
    #[serde(default)]
    pub results: Vec<HealthResult>,
    /// State-transition events, delivered newest first. Only present on
    /// single-endpoint detail fetches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
}

/// One completed health-check outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    /// HTTP status code of the check, when applicable.
    #[serde(default)]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Check duration in nanoseconds.
    #[serde(default)]
    pub duration: u64,
    /// Condition-check outcomes, one per configured condition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_results: Vec<ConditionResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// Explicit state override; when absent the state is derived from
    /// `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Outcome of a single configured condition within a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: String,
    pub success: bool,
}

/// A discrete state-transition record for an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

/// Kind of state transition an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Monitoring of the endpoint began.
    Start,
    /// The endpoint transitioned to healthy.
    Healthy,
    /// The endpoint transitioned to unhealthy.
    Unhealthy,
}

/// Server configuration relevant to the client, from the config fetch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub oidc: bool,
    #[serde(default)]
    pub authenticated: bool,
}

impl HealthResult {
    /// Logical state name for color resolution: the explicit `state` when
    /// present, otherwise derived from the success flag.
    pub fn state_name(&self) -> &str {
        match &self.state {
            Some(state) => state,
            None if self.success => "healthy",
            None => "unhealthy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint_status() {
        let json = r#"{
            "name": "front-end",
            "group": "core",
            "key": "core_front-end",
            "results": [
                {
                    "status": 200,
                    "hostname": "example.org",
                    "duration": 13111100,
                    "conditionResults": [
                        { "condition": "[STATUS] == 200", "success": true }
                    ],
                    "success": true,
                    "timestamp": "2024-11-01T15:04:05Z"
                }
            ]
        }"#;
        let status: EndpointStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.key, "core_front-end");
        assert_eq!(status.group.as_deref(), Some("core"));
        assert_eq!(status.results.len(), 1);
        assert_eq!(status.results[0].duration, 13111100);
        assert_eq!(status.results[0].condition_results.len(), 1);
        assert!(status.events.is_empty());
    }

    #[test]
    fn test_parse_events() {
        let json = r#"[
            { "type": "UNHEALTHY", "timestamp": "2024-11-01T12:00:00Z" },
            { "type": "START", "timestamp": "2024-11-01T11:00:00Z" }
        ]"#;
        let events: Vec<Event> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0].kind, EventKind::Unhealthy);
        assert_eq!(events[1].kind, EventKind::Start);
    }

    #[test]
    fn test_state_name_derivation() {
        let json = r#"{ "success": true, "timestamp": "2024-11-01T12:00:00Z" }"#;
        let mut result: HealthResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.state_name(), "healthy");
        result.success = false;
        assert_eq!(result.state_name(), "unhealthy");
        result.state = Some("degraded".to_string());
        assert_eq!(result.state_name(), "degraded");
    }

    #[test]
    fn test_structural_equality_gate() {
        let json = r#"{
            "key": "a", "name": "a",
            "results": [{ "success": true, "timestamp": "2024-11-01T12:00:00Z" }]
        }"#;
        let a: EndpointStatus = serde_json::from_str(json).unwrap();
        let b: EndpointStatus = serde_json::from_str(json).unwrap();
        assert_eq!(a, b);
    }
}

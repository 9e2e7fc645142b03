//! Grouping of endpoint snapshots for the dashboard.

use super::status::EndpointStatus;

/// Name of the reserved group that collects endpoints without a group.
/// Always rendered last.
pub const UNGROUPED: &str = "ungrouped";

/// An ordered set of endpoint snapshots sharing a group name.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup {
    pub name: String,
    pub statuses: Vec<EndpointStatus>,
}

/// Partition a flat snapshot list into ordered named groups.
///
/// Group order is first-seen order over the input, which keeps the
/// collapse/expand UI stable across refreshes as long as the server
/// returns endpoints in the same order. Endpoints without a group are
/// collected into the reserved [`UNGROUPED`] group, placed last no matter
/// when the first ungrouped endpoint is encountered.
pub fn group_statuses(statuses: &[EndpointStatus]) -> Vec<StatusGroup> {
    let mut groups: Vec<StatusGroup> = Vec::new();
    let mut ungrouped: Vec<EndpointStatus> = Vec::new();

    for status in statuses {
        match &status.group {
            Some(name) => {
                if let Some(group) = groups.iter_mut().find(|g| g.name == *name) {
                    group.statuses.push(status.clone());
                } else {
                    groups.push(StatusGroup {
                        name: name.clone(),
                        statuses: vec![status.clone()],
                    });
                }
            }
            None => ungrouped.push(status.clone()),
        }
    }

    if !ungrouped.is_empty() {
        groups.push(StatusGroup {
            name: UNGROUPED.to_string(),
            statuses: ungrouped,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(key: &str, group: Option<&str>) -> EndpointStatus {
        EndpointStatus {
            key: key.to_string(),
            name: key.to_string(),
            group: group.map(str::to_string),
            results: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_first_seen_order() {
        let statuses = vec![
            status("a", Some("core")),
            status("b", Some("internal")),
            status("c", Some("core")),
        ];
        let groups = group_statuses(&statuses);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "core");
        assert_eq!(groups[0].statuses.len(), 2);
        assert_eq!(groups[1].name, "internal");
    }

    #[test]
    fn test_ungrouped_placed_last() {
        // The ungrouped endpoint is seen first but its group trails
        let statuses = vec![
            status("a", None),
            status("b", Some("core")),
            status("c", None),
        ];
        let groups = group_statuses(&statuses);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "core");
        assert_eq!(groups[1].name, UNGROUPED);
        assert_eq!(groups[1].statuses.len(), 2);
        assert_eq!(groups[1].statuses[0].key, "a");
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let statuses = vec![
            status("a", Some("core")),
            status("b", None),
            status("c", Some("edge")),
        ];
        assert_eq!(group_statuses(&statuses), group_statuses(&statuses));
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let statuses = vec![
            status("a", Some("core")),
            status("b", Some("edge")),
            status("c", None),
            status("d", Some("core")),
        ];
        let first = group_statuses(&statuses);

        // Flatten the grouped output and group it again: ungrouped
        // endpoints lose nothing because their group is still None.
        let flattened: Vec<EndpointStatus> = first
            .iter()
            .flat_map(|g| g.statuses.iter().cloned())
            .collect();
        let second = group_statuses(&flattened);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_statuses(&[]).is_empty());
    }
}

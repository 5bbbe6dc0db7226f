//! Placement rule and placement classifiers

use crate::models::{PulseStatus, ResourceNode};
use serde_json::Value;

/// Whether a placement rule reports at least one decision
pub fn has_decisions(node: &ResourceNode) -> bool {
    node.raw_at(&["status", "decisions"])
        .and_then(Value::as_array)
        .is_some_and(|decisions| !decisions.is_empty())
}

/// `raw.status.numberOfSelectedClusters`, if reported
pub fn selected_clusters(node: &ResourceNode) -> Option<i64> {
    node.raw_at(&["status", "numberOfSelectedClusters"])
        .and_then(Value::as_i64)
}

/// Pulse of a placement rule: red without decisions
pub fn get_pulse_status_for_placement_rule(node: &ResourceNode) -> PulseStatus {
    if has_decisions(node) {
        PulseStatus::Green
    } else {
        PulseStatus::Red
    }
}

/// Pulse of a placement: red when it selects no cluster
pub fn get_pulse_status_for_placement(node: &ResourceNode) -> PulseStatus {
    if selected_clusters(node) == Some(0) {
        PulseStatus::Red
    } else {
        PulseStatus::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(kind: &str, raw: Value) -> ResourceNode {
        serde_json::from_value(json!({"type": kind, "specs": {"raw": raw}})).unwrap()
    }

    #[test]
    fn test_placement_rule_decisions() {
        let rule = node("placements", json!({"status": {"decisions": [{"clusterName": "a"}]}}));
        assert_eq!(get_pulse_status_for_placement_rule(&rule), PulseStatus::Green);
        let rule = node("placements", json!({"status": {"decisions": []}}));
        assert_eq!(get_pulse_status_for_placement_rule(&rule), PulseStatus::Red);
        let rule = node("placements", json!({}));
        assert_eq!(get_pulse_status_for_placement_rule(&rule), PulseStatus::Red);
    }

    #[test]
    fn test_placement_selection() {
        let placement = node("placement", json!({"status": {"numberOfSelectedClusters": 0}}));
        assert_eq!(get_pulse_status_for_placement(&placement), PulseStatus::Red);
        let placement = node("placement", json!({"status": {"numberOfSelectedClusters": 2}}));
        assert_eq!(get_pulse_status_for_placement(&placement), PulseStatus::Green);
    }
}

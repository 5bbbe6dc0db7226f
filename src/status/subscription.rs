//! Subscription classifier

use super::cluster::{has_cluster_data, online_clusters, target_clusters};
use crate::models::{PulseStatus, ResourceNode};
use serde_json::Value;
use tracing::{debug, trace};

pub const SUBSCRIBED: &str = "Subscribed";
pub const PROPAGATED: &str = "Propagated";

/// Whether any package in `raw.status.statuses.<cluster>.packages` failed
pub fn has_failed_package(node: &ResourceNode) -> bool {
    let Some(statuses) = node.raw_at(&["status", "statuses"]).and_then(Value::as_object) else {
        return false;
    };
    statuses
        .values()
        .filter_map(|cluster| cluster.get("packages").and_then(Value::as_object))
        .flat_map(|packages| packages.values())
        .any(|package| package.get("phase").and_then(Value::as_str) == Some("Failed"))
}

fn report_results(node: &ResourceNode) -> &[Value] {
    node.report
        .as_ref()
        .and_then(|r| r.get("results"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn is_failed_result(result: &Value) -> bool {
    result.get("result").and_then(Value::as_str) == Some("failed")
}

/// Whether the subscription report lists a failed result
pub fn report_has_failure(node: &ResourceNode) -> bool {
    report_results(node).iter().any(is_failed_result)
}

/// Whether the report result for `cluster` failed. Only the first result
/// naming the cluster counts.
pub fn cluster_report_failed(node: &ResourceNode, cluster: &str) -> bool {
    report_results(node)
        .iter()
        .find(|r| r.get("source").and_then(Value::as_str) == Some(cluster))
        .is_some_and(is_failed_result)
}

/// Pulse of a subscription node from its subscription records
pub fn get_pulse_status_for_subscription(node: &ResourceNode, hub_cluster: &str) -> PulseStatus {
    let Some(model) = node.search_model() else {
        debug!(node = %node.name, "subscription has no search model");
        return PulseStatus::Orange;
    };

    let clusters = target_clusters(node, hub_cluster);
    let online = online_clusters(node, hub_cluster);
    let check_online = has_cluster_data(node);

    let mut pulse = PulseStatus::Green;
    let mut placed = false;
    for resolved in model.resolve(&clusters, &node.namespace) {
        let Some(status) = resolved.record.status.as_deref() else {
            continue;
        };
        if status.contains("Failed") {
            pulse = PulseStatus::Red;
            continue;
        }
        let is_placed = status == SUBSCRIBED || status == PROPAGATED;
        placed |= is_placed;
        let offline = check_online && !online.iter().any(|c| c == &resolved.cluster);
        if offline || !is_placed {
            pulse = pulse.worst(PulseStatus::Yellow);
        }
    }

    if pulse == PulseStatus::Green && !placed {
        pulse = PulseStatus::Yellow;
    }
    if pulse == PulseStatus::Green && has_failed_package(node) {
        pulse = PulseStatus::Yellow;
    }
    if report_has_failure(node) {
        pulse = PulseStatus::Red;
    }
    trace!(node = %node.name, %pulse, "subscription classified");
    pulse
}

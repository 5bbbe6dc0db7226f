//! Generic resource classifier

use super::StatusContext;
use super::cluster::{has_cluster_data, online_clusters, target_clusters, target_namespaces};
use super::data::get_pulse_for_data;
use super::pod::{ERROR_STATES, NOT_DEPLOYED_STATES, WARNING_STATES};
use crate::models::{PulseStatus, ResolvedRecord, ResourceNode};
use tracing::{debug, trace};

/// Name a record is matched on within a target namespace: the record name for
/// cluster-scoped kinds, its namespace otherwise
pub fn record_scope<'a>(node: &ResourceNode, record: &'a ResolvedRecord<'_>) -> &'a str {
    if node.kind.is_cluster_scoped() {
        record.name()
    } else {
        &record.namespace
    }
}

/// Pulse of a single deployed resource record
pub fn record_pulse(record: &ResolvedRecord<'_>, ctx: &StatusContext) -> PulseStatus {
    let status = record
        .record
        .status
        .as_deref()
        .or(record.record.phase.as_deref())
        .unwrap_or("deployed")
        .to_lowercase();
    if ERROR_STATES.contains(&status.as_str()) {
        return PulseStatus::Red;
    }
    if WARNING_STATES.contains(&status.as_str()) || NOT_DEPLOYED_STATES.contains(&status.as_str())
    {
        return PulseStatus::Yellow;
    }
    match record.record.desired {
        Some(desired) => get_pulse_for_data(
            record.record.available_count().unwrap_or(0),
            Some(desired),
            0,
            ctx.zero_desired,
        ),
        None => PulseStatus::Green,
    }
}

/// Pulse of a node without a dedicated classifier
pub fn get_pulse_status_for_generic_node(node: &ResourceNode, ctx: &StatusContext) -> PulseStatus {
    let Some(specs) = node.specs.as_ref() else {
        return PulseStatus::Yellow;
    };
    if specs.pulse == Some(PulseStatus::Red) {
        return PulseStatus::Red;
    }
    let Some(model) = node.search_model() else {
        debug!(node = %node.name, kind = %node.kind, "no search model");
        return PulseStatus::Orange;
    };

    let clusters = target_clusters(node, &ctx.hub_cluster);
    let resolved = model.resolve(&clusters, &node.namespace);
    let mut pulse = PulseStatus::Green;

    if let Some(count) = specs.resource_count {
        if count != resolved.len() as i64 {
            trace!(node = %node.name, count, found = resolved.len(), "resource count mismatch");
            pulse = PulseStatus::Yellow;
        }
    }

    if has_cluster_data(node) {
        let online = online_clusters(node, &ctx.hub_cluster);
        if clusters.iter().any(|c| !online.contains(c)) {
            debug!(node = %node.name, "resource targets an offline cluster");
            pulse = pulse.worst(PulseStatus::Yellow);
        }
    }

    let default_scope = if node.kind.is_cluster_scoped() {
        node.name.as_str()
    } else {
        node.namespace.as_str()
    };

    for cluster in &clusters {
        let items: Vec<&ResolvedRecord<'_>> =
            resolved.iter().filter(|r| &r.cluster == cluster).collect();
        let deployed: Vec<String> = items
            .iter()
            .map(|r| record_scope(node, r).to_string())
            .collect();

        for scope in target_namespaces(node, cluster, &deployed, default_scope) {
            match items.iter().find(|r| record_scope(node, r) == scope) {
                Some(record) => pulse = pulse.worst(record_pulse(record, ctx)),
                None => pulse = pulse.worst(PulseStatus::Yellow),
            }
            if pulse == PulseStatus::Red {
                return pulse;
            }
        }
    }
    pulse
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn pvc(status: &str) -> ResourceNode {
        serde_json::from_value(json!({
            "type": "persistentvolumeclaim",
            "name": "data",
            "namespace": "default",
            "specs": {
                "clustersNames": ["local-cluster"],
                "persistentvolumeclaimModel": {
                    "data-local-cluster": [{"cluster": "local-cluster", "namespace": "default", "status": status}]
                }
            }
        }))
        .unwrap()
    }

    fn node(value: Value) -> ResourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pvc_statuses() {
        let ctx = StatusContext::new("local-cluster");
        assert_eq!(get_pulse_status_for_generic_node(&pvc("Bound"), &ctx), PulseStatus::Green);
        assert_eq!(get_pulse_status_for_generic_node(&pvc("Pending"), &ctx), PulseStatus::Yellow);
        assert_eq!(get_pulse_status_for_generic_node(&pvc("Lost"), &ctx), PulseStatus::Red);
    }

    #[test]
    fn test_previous_red_is_kept() {
        let ctx = StatusContext::new("local-cluster");
        let node = node(json!({"type": "service", "specs": {"pulse": "red", "serviceModel": {}}}));
        assert_eq!(get_pulse_status_for_generic_node(&node, &ctx), PulseStatus::Red);
    }

    #[test]
    fn test_missing_model_is_orange() {
        let ctx = StatusContext::new("local-cluster");
        let node = node(json!({"type": "configmap", "specs": {}}));
        assert_eq!(get_pulse_status_for_generic_node(&node, &ctx), PulseStatus::Orange);
    }

    #[test]
    fn test_missing_record_is_yellow() {
        let ctx = StatusContext::new("local-cluster");
        let node = node(json!({
            "type": "service",
            "name": "svc",
            "namespace": "default",
            "specs": {"clustersNames": ["a", "b"], "serviceModel": {"svc-a": [{"cluster": "a"}]}}
        }));
        assert_eq!(get_pulse_status_for_generic_node(&node, &ctx), PulseStatus::Yellow);
    }

    #[test]
    fn test_cluster_scoped_kinds_match_by_name() {
        let ctx = StatusContext::new("local-cluster");
        let node = node(json!({
            "type": "namespace",
            "name": "team-a",
            "specs": {
                "clustersNames": ["a"],
                "namespaceModel": {"team-a-a": [{"cluster": "a", "name": "team-a", "status": "Active"}]}
            }
        }));
        assert_eq!(get_pulse_status_for_generic_node(&node, &ctx), PulseStatus::Green);
    }

    #[test]
    fn test_resource_count_mismatch() {
        let ctx = StatusContext::new("local-cluster");
        let node = node(json!({
            "type": "configmap",
            "name": "cm",
            "namespace": "default",
            "specs": {
                "resourceCount": 2,
                "configmapModel": {"cm-local-cluster": [{"cluster": "local-cluster", "namespace": "default"}]}
            }
        }));
        assert_eq!(get_pulse_status_for_generic_node(&node, &ctx), PulseStatus::Yellow);
    }
}

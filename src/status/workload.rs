//! Pod-bearing workload classifier
//!
//! Resource records supply the desired replica count per cluster and
//! namespace; pods found in the same place supply ready and unavailable
//! counts. Without pods the resource's own availability counts are used.

use super::StatusContext;
use super::cluster::{has_cluster_data, online_clusters, target_clusters, target_namespaces};
use super::data::get_pulse_for_data;
use super::pod::{ERROR_STATES, SUCCESS_STATES, pod_in};
use crate::models::{NodeKind, PulseStatus, ResolvedRecord, ResourceNode};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Replica counts observed for one cluster and namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplicaCounts {
    pub ready: i64,
    pub desired: Option<i64>,
    pub unavailable: i64,
}

/// Outcome of a workload evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadReport {
    pub pulse: PulseStatus,
    /// Counts keyed by `(cluster, namespace)`
    pub statuses: BTreeMap<(String, String), ReplicaCounts>,
}

impl WorkloadReport {
    fn without_data(pulse: PulseStatus) -> Self {
        Self {
            pulse,
            statuses: BTreeMap::new(),
        }
    }

    pub fn counts(&self, cluster: &str, namespace: &str) -> Option<&ReplicaCounts> {
        self.statuses
            .get(&(cluster.to_string(), namespace.to_string()))
    }
}

/// Evaluate a pod-bearing node
pub fn evaluate_workload(node: &ResourceNode, ctx: &StatusContext) -> WorkloadReport {
    let Some(model) = node.search_model() else {
        debug!(node = %node.name, kind = %node.kind, "workload has no search model");
        return WorkloadReport::without_data(PulseStatus::Orange);
    };

    let clusters = target_clusters(node, &ctx.hub_cluster);
    let resources = model.resolve(&clusters, &node.namespace);
    let pods: Vec<ResolvedRecord<'_>> = node
        .pod_model()
        .map(|m| m.resolve(&clusters, &node.namespace))
        .unwrap_or_default();

    let default_desired = model.first_record().and_then(|r| r.desired).or_else(|| {
        node.raw_at(&["spec", "replicas"])
            .and_then(serde_json::Value::as_i64)
    });

    let mut pulses = Vec::new();
    let mut statuses = BTreeMap::new();
    for cluster in &clusters {
        let items: Vec<&ResolvedRecord<'_>> =
            resources.iter().filter(|r| &r.cluster == cluster).collect();
        let deployed: Vec<String> = items.iter().map(|r| r.namespace.clone()).collect();

        for namespace in target_namespaces(node, cluster, &deployed, &node.namespace) {
            let ns_items: Vec<&&ResolvedRecord<'_>> =
                items.iter().filter(|r| r.namespace == namespace).collect();
            if ns_items.is_empty() {
                trace!(node = %node.name, %cluster, %namespace, "no resource in target namespace");
                pulses.push(PulseStatus::Yellow);
                continue;
            }

            let ns_pods: Vec<&ResolvedRecord<'_>> = pods
                .iter()
                .filter(|p| &p.cluster == cluster && p.namespace == namespace)
                .collect();

            for item in ns_items {
                let counts = if ns_pods.is_empty() {
                    ReplicaCounts {
                        ready: item.record.available_count().unwrap_or(0),
                        desired: item.record.desired,
                        unavailable: 0,
                    }
                } else {
                    let desired = item.record.desired.or(default_desired).or_else(|| {
                        (node.kind == NodeKind::Pod).then_some(ns_pods.len() as i64)
                    });
                    ReplicaCounts {
                        ready: ns_pods
                            .iter()
                            .filter(|p| pod_in(p.record, Some(cluster.as_str()), SUCCESS_STATES))
                            .count() as i64,
                        desired,
                        unavailable: ns_pods
                            .iter()
                            .filter(|p| pod_in(p.record, Some(cluster.as_str()), ERROR_STATES))
                            .count() as i64,
                    }
                };
                pulses.push(get_pulse_for_data(
                    counts.ready,
                    counts.desired,
                    counts.unavailable,
                    ctx.zero_desired,
                ));
                statuses.insert((cluster.clone(), namespace.clone()), counts);
            }
        }
    }

    let mut pulse = PulseStatus::worst_of(pulses).unwrap_or(PulseStatus::Orange);
    if has_cluster_data(node) {
        let online = online_clusters(node, &ctx.hub_cluster);
        if clusters.iter().any(|c| !online.contains(c)) {
            debug!(node = %node.name, "workload targets an offline cluster");
            pulse = pulse.worst(PulseStatus::Yellow);
        }
    }

    WorkloadReport { pulse, statuses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> StatusContext {
        StatusContext::new("local-cluster")
    }

    #[test]
    fn test_ready_deployment_without_pods() {
        let node: ResourceNode = serde_json::from_value(json!({
            "type": "deployment",
            "name": "x",
            "namespace": "default",
            "specs": {
                "clustersNames": ["feng"],
                "deploymentModel": {"x-feng": [{"ready": 3, "desired": 3}]}
            }
        }))
        .unwrap();
        let report = evaluate_workload(&node, &ctx());
        assert_eq!(report.pulse, PulseStatus::Green);
        let counts = report.counts("feng", "default").unwrap();
        assert_eq!(counts.ready, 3);
        assert_eq!(counts.desired, Some(3));
    }

    #[test]
    fn test_pods_drive_counts() {
        let node: ResourceNode = serde_json::from_value(json!({
            "type": "deployment",
            "name": "web",
            "namespace": "default",
            "specs": {
                "clustersNames": ["feng"],
                "deploymentModel": {"web-feng": [{"cluster": "feng", "namespace": "default", "desired": 2}]},
                "podModel": {"web-abc-feng": [
                    {"cluster": "feng", "namespace": "default", "status": "Running"},
                    {"cluster": "feng", "namespace": "default", "status": "Pending"}
                ]}
            }
        }))
        .unwrap();
        let report = evaluate_workload(&node, &ctx());
        assert_eq!(report.pulse, PulseStatus::Yellow);
        assert_eq!(
            report.counts("feng", "default"),
            Some(&ReplicaCounts { ready: 1, desired: Some(2), unavailable: 0 })
        );
    }

    #[test]
    fn test_missing_namespace_is_yellow() {
        let node: ResourceNode = serde_json::from_value(json!({
            "type": "deployment",
            "name": "web",
            "namespace": "default",
            "clusters": {"specs": {"targetNamespaces": {"feng": ["default", "other"]}}},
            "specs": {
                "clustersNames": ["feng"],
                "deploymentModel": {"web-feng": [{"cluster": "feng", "namespace": "default", "ready": 1, "desired": 1}]}
            }
        }))
        .unwrap();
        assert_eq!(evaluate_workload(&node, &ctx()).pulse, PulseStatus::Yellow);
    }

    #[test]
    fn test_missing_model_is_orange() {
        let node: ResourceNode =
            serde_json::from_value(json!({"type": "statefulset", "specs": {}})).unwrap();
        assert_eq!(evaluate_workload(&node, &ctx()).pulse, PulseStatus::Orange);
    }
}

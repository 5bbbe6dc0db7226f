//! Cluster classification and per-node cluster targeting

use crate::models::{ClusterInfo, PulseStatus, ResourceNode};
use tracing::trace;

/// Argo CD name for the cluster it runs on
pub const IN_CLUSTER: &str = "in-cluster";

const PENDING_STATES: &[&str] = &[
    "pendingimport",
    "pending",
    "detaching",
    "importing",
    "destroying",
    "creating",
];

fn is_false(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("false"))
}

/// Classify one managed cluster
pub fn cluster_pulse(cluster: &ClusterInfo, hub_cluster: &str) -> PulseStatus {
    let status = cluster
        .status
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();

    match status.as_str() {
        "ok" | "ready" => return PulseStatus::Green,
        s if PENDING_STATES.contains(&s) => return PulseStatus::Yellow,
        "" => {}
        // a live availability condition outranks a stale offline/unknown status
        _ if cluster.is_available() => return PulseStatus::Green,
        _ => return PulseStatus::Red,
    }

    if cluster.is_named(hub_cluster) {
        return PulseStatus::Green;
    }

    let has_conditions = cluster.hub_accepted.is_some()
        || cluster.joined.is_some()
        || cluster.condition_available.is_some();
    if !has_conditions {
        // not reported yet
        return PulseStatus::Yellow;
    }
    if is_false(cluster.hub_accepted.as_deref()) {
        PulseStatus::Red
    } else if is_false(cluster.joined.as_deref()) {
        PulseStatus::Yellow
    } else if cluster.is_available() {
        PulseStatus::Green
    } else {
        PulseStatus::Red
    }
}

/// Worst pulse over a cluster list, `green` when empty
pub fn pulse_for_cluster_list(clusters: &[ClusterInfo], hub_cluster: &str) -> PulseStatus {
    PulseStatus::worst_of(clusters.iter().map(|c| cluster_pulse(c, hub_cluster)))
        .unwrap_or(PulseStatus::Green)
}

/// Member clusters of a `cluster` node, with Argo destinations appended
pub fn member_clusters(node: &ResourceNode, hub_cluster: &str) -> Vec<ClusterInfo> {
    let Some(specs) = node.specs.as_ref() else {
        return Vec::new();
    };

    let mut members: Vec<ClusterInfo> = specs
        .clusters
        .iter()
        .filter(|c| {
            specs.clusters_names.is_empty()
                || c.cluster_name()
                    .is_some_and(|name| specs.clusters_names.iter().any(|n| n == name))
        })
        .cloned()
        .collect();

    for app_cluster in &specs.app_clusters {
        let name = if app_cluster == IN_CLUSTER {
            hub_cluster
        } else {
            app_cluster.as_str()
        };
        if members.iter().any(|c| c.is_named(name)) {
            continue;
        }
        let mut appended = ClusterInfo {
            name: Some(name.to_string()),
            ..ClusterInfo::default()
        };
        if name == hub_cluster {
            appended.status = Some("ok".to_string());
            appended.cluster_namespace = Some(name.to_string());
        } else {
            appended.cluster_namespace = Some("_".to_string());
        }
        members.push(appended);
    }
    members
}

/// Pulse of a `cluster` node
pub fn get_pulse_status_for_cluster(node: &ResourceNode, hub_cluster: &str) -> PulseStatus {
    let members = member_clusters(node, hub_cluster);
    let pulse = pulse_for_cluster_list(&members, hub_cluster);
    trace!(node = %node.name, members = members.len(), %pulse, "cluster node classified");
    pulse
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Clusters a node is expected on.
///
/// `clustersNames` plus Argo destinations, else the clusters named in the
/// node id, else the clusters search found records on, else the hub.
pub fn target_clusters(node: &ResourceNode, hub_cluster: &str) -> Vec<String> {
    let mut clusters = Vec::new();
    if let Some(specs) = node.specs.as_ref() {
        for name in &specs.clusters_names {
            push_unique(&mut clusters, name);
        }
    }
    if let Some(fanout) = node.fanout() {
        for name in &fanout.app_clusters {
            let name = if name == IN_CLUSTER { hub_cluster } else { name.as_str() };
            push_unique(&mut clusters, name);
        }
    }
    if !clusters.is_empty() {
        return clusters;
    }

    for name in node.id_clusters() {
        push_unique(&mut clusters, &name);
    }
    if !clusters.is_empty() {
        return clusters;
    }

    if let Some(model) = node.search_model() {
        for record in model.records() {
            if let Some(cluster) = record.cluster.as_deref() {
                push_unique(&mut clusters, cluster);
            }
        }
        if clusters.is_empty() {
            for entry in model.entries() {
                if let Some(cluster) = entry.key.cluster.as_deref() {
                    push_unique(&mut clusters, cluster);
                }
            }
        }
    }
    if clusters.is_empty() {
        clusters.push(hub_cluster.to_string());
    }
    clusters
}

/// Cluster records carrying availability for a node: the larger of the
/// placement's cluster list and the search cluster list
pub fn known_clusters(node: &ResourceNode) -> &[ClusterInfo] {
    let placed = node.fanout().map(|f| f.clusters.as_slice()).unwrap_or(&[]);
    let searched = node
        .specs
        .as_ref()
        .map(|s| s.search_clusters.as_slice())
        .unwrap_or(&[]);
    if placed.len() > searched.len() {
        placed
    } else {
        searched
    }
}

fn reports_online(cluster: &ClusterInfo) -> bool {
    let status = cluster.status.as_deref().unwrap_or_default();
    status.eq_ignore_ascii_case("ok")
        || status.eq_ignore_ascii_case("pendingimport")
        || cluster.is_available()
}

/// Target clusters currently reachable. The hub is always online.
pub fn online_clusters(node: &ResourceNode, hub_cluster: &str) -> Vec<String> {
    let known = known_clusters(node);
    let mut online = Vec::new();
    for name in target_clusters(node, hub_cluster) {
        if name == hub_cluster {
            push_unique(&mut online, &name);
            continue;
        }
        if known.iter().any(|c| c.is_named(&name) && reports_online(c)) {
            push_unique(&mut online, &name);
        }
    }
    push_unique(&mut online, hub_cluster);
    online
}

/// Whether the node carries any cluster availability records
pub fn has_cluster_data(node: &ResourceNode) -> bool {
    !known_clusters(node).is_empty()
}

/// Namespaces a node is expected in on one cluster.
///
/// `targetNamespaces[cluster]` joined with the namespaces records were found
/// in, else just those, else `default_namespace`.
pub fn target_namespaces(
    node: &ResourceNode,
    cluster: &str,
    deployed: &[String],
    default_namespace: &str,
) -> Vec<String> {
    let mut namespaces = Vec::new();
    if let Some(targets) = node.fanout().and_then(|f| f.target_namespaces.get(cluster)) {
        for ns in targets {
            push_unique(&mut namespaces, ns);
        }
    }
    for ns in deployed {
        push_unique(&mut namespaces, ns);
    }
    if namespaces.is_empty() {
        namespaces.push(default_namespace.to_string());
    }
    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeKind, NodeSpecs};
    use serde_json::json;

    const HUB: &str = "local-cluster";

    #[test]
    fn test_status_keywords() {
        assert_eq!(cluster_pulse(&ClusterInfo::named("a", "ok"), HUB), PulseStatus::Green);
        assert_eq!(cluster_pulse(&ClusterInfo::named("a", "OK"), HUB), PulseStatus::Green);
        assert_eq!(
            cluster_pulse(&ClusterInfo::named("a", "pendingimport"), HUB),
            PulseStatus::Yellow
        );
        assert_eq!(cluster_pulse(&ClusterInfo::named("a", "offline"), HUB), PulseStatus::Red);
        assert_eq!(cluster_pulse(&ClusterInfo::named("a", "weird"), HUB), PulseStatus::Red);
    }

    #[test]
    fn test_available_condition_outranks_offline_status() {
        let recovered: ClusterInfo = serde_json::from_value(json!({
            "name": "a",
            "status": "offline",
            "ManagedClusterConditionAvailable": "True"
        }))
        .unwrap();
        assert_eq!(cluster_pulse(&recovered, HUB), PulseStatus::Green);

        let offline: ClusterInfo = serde_json::from_value(json!({
            "name": "a",
            "status": "offline",
            "ManagedClusterConditionAvailable": "Unknown"
        }))
        .unwrap();
        assert_eq!(cluster_pulse(&offline, HUB), PulseStatus::Red);
    }

    #[test]
    fn test_conditions_when_status_missing() {
        let joined_false: ClusterInfo = serde_json::from_value(json!({
            "name": "a", "HubAcceptedManagedCluster": "True", "ManagedClusterJoined": false
        }))
        .unwrap();
        assert_eq!(cluster_pulse(&joined_false, HUB), PulseStatus::Yellow);

        let not_accepted: ClusterInfo =
            serde_json::from_value(json!({"name": "a", "HubAcceptedManagedCluster": false}))
                .unwrap();
        assert_eq!(cluster_pulse(&not_accepted, HUB), PulseStatus::Red);

        let available: ClusterInfo = serde_json::from_value(
            json!({"name": "a", "ManagedClusterConditionAvailable": "True"}),
        )
        .unwrap();
        assert_eq!(cluster_pulse(&available, HUB), PulseStatus::Green);

        assert_eq!(
            cluster_pulse(&ClusterInfo { name: Some("a".into()), ..Default::default() }, HUB),
            PulseStatus::Yellow
        );
    }

    #[test]
    fn test_list_takes_worst() {
        let clusters = vec![
            ClusterInfo::named("a", "ok"),
            ClusterInfo::named("b", "pendingimport"),
        ];
        assert_eq!(pulse_for_cluster_list(&clusters, HUB), PulseStatus::Yellow);
        assert_eq!(pulse_for_cluster_list(&[], HUB), PulseStatus::Green);
    }

    #[test]
    fn test_app_clusters_are_appended() {
        let mut node = ResourceNode::new(NodeKind::Cluster, "cluster", "");
        node.specs = Some(NodeSpecs {
            clusters: vec![ClusterInfo::named("a", "ok")],
            app_clusters: vec!["in-cluster".into(), "remote".into()],
            ..NodeSpecs::default()
        });
        let members = member_clusters(&node, HUB);
        assert_eq!(members.len(), 3);
        assert_eq!(members[1].status.as_deref(), Some("ok"));
        assert_eq!(get_pulse_status_for_cluster(&node, HUB), PulseStatus::Yellow);
    }

    #[test]
    fn test_target_clusters_fallbacks() {
        let node = ResourceNode::new(NodeKind::Service, "svc", "default");
        assert_eq!(target_clusters(&node, HUB), vec![HUB]);

        let node: ResourceNode = serde_json::from_value(json!({
            "type": "service",
            "name": "svc",
            "specs": {"serviceModel": {"svc-feng": [{"cluster": "feng"}]}}
        }))
        .unwrap();
        assert_eq!(target_clusters(&node, HUB), vec!["feng"]);
    }

    #[test]
    fn test_online_clusters() {
        let node: ResourceNode = serde_json::from_value(json!({
            "type": "deployment",
            "specs": {
                "clustersNames": ["a", "b"],
                "searchClusters": [
                    {"name": "a", "status": "OK"},
                    {"name": "b", "status": "offline"}
                ]
            }
        }))
        .unwrap();
        assert_eq!(online_clusters(&node, HUB), vec!["a", HUB]);
    }

    #[test]
    fn test_target_namespaces_union() {
        let node: ResourceNode = serde_json::from_value(json!({
            "type": "deployment",
            "clusters": {"specs": {"targetNamespaces": {"a": ["ns1", "ns2"]}}}
        }))
        .unwrap();
        let deployed = vec!["ns2".to_string(), "ns3".to_string()];
        assert_eq!(
            target_namespaces(&node, "a", &deployed, "default"),
            vec!["ns1", "ns2", "ns3"]
        );
        assert_eq!(target_namespaces(&node, "b", &[], "default"), vec!["default"]);
    }
}

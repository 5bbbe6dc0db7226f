//! Pod deploy status of pod-bearing resources

use super::age::get_age;
use super::links::{EditLinkParams, edit_link};
use super::missing::{ClusterReach, detail_clusters, show_missing_cluster_details};
use super::{ActiveFilters, DetailContext, Rows};
use crate::models::{DetailRow, LinkData, PulseStatus, ResolvedRecord, ResourceNode, StatusTag};
use crate::status::pod::{ERROR_STATES, WARNING_STATES, get_pod_state};
use crate::status::{evaluate_workload, get_pulse_for_data, target_namespaces};
use std::collections::BTreeMap;

const UNDEFINED: &str = "undefined";

fn or_undefined(value: Option<&str>) -> &str {
    value.unwrap_or(UNDEFINED)
}

fn pod_tag(pod: &ResolvedRecord<'_>) -> StatusTag {
    match get_pod_state(pod.record, None, &[ERROR_STATES, WARNING_STATES]) {
        1 => StatusTag::Failure,
        2 => StatusTag::Warning,
        _ => StatusTag::Checkmark,
    }
}

fn pod_edit_link(pod: &ResolvedRecord<'_>) -> String {
    let record = pod.record;
    edit_link(&EditLinkParams {
        cluster: Some(pod.cluster.clone()),
        kind: Some(record.kind.as_deref().unwrap_or("pod").to_lowercase()),
        apiversion: Some(record.apiversion.clone().unwrap_or_else(|| "v1".to_string())),
        name: record.name.clone(),
        namespace: record.namespace.clone().or_else(|| Some(pod.namespace.clone())),
    })
}

/// Rows of one pod, ending with a spacer
fn pod_rows(pod: &ResolvedRecord<'_>, tag: StatusTag, ctx: &DetailContext<'_>) -> Vec<DetailRow> {
    let record = pod.record;
    let mut rows = Vec::new();
    if let Some(name) = record.name.as_deref() {
        rows.push(DetailRow::property(ctx.t("Pod"), name));
    }
    if let Some(namespace) = record.namespace.as_deref() {
        rows.push(DetailRow::property(ctx.t("Namespace"), namespace));
    }
    if let Some(status) = record.status.as_deref() {
        rows.push(DetailRow::status(ctx.t("Status"), status, tag));
    }
    rows.push(
        DetailRow::link(
            ctx.t("View Pod YAML and Logs"),
            LinkData::resource_yaml(Some(pod.cluster.clone()), pod_edit_link(pod)),
        )
        .indented(),
    );
    let restarts = record
        .restarts
        .map_or_else(|| UNDEFINED.to_string(), |r| r.to_string());
    rows.push(DetailRow::property(ctx.t("Restarts"), restarts));
    rows.push(DetailRow::property(
        ctx.t("Host and Pod IP"),
        format!(
            "{}, {}",
            or_undefined(record.host_ip.as_deref()),
            or_undefined(record.pod_ip.as_deref())
        ),
    ));
    rows.push(DetailRow::property(
        ctx.t("Created"),
        get_age(record.started_at.as_deref(), ctx.now),
    ));
    rows.push(DetailRow::Spacer);
    rows
}

/// Replica status per cluster and namespace, then the pods found on each
/// cluster
pub fn set_pod_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if !node.must_have_pods() {
        return Vec::new();
    }
    let mut rows = Rows::new(filters);
    rows.spacer();
    rows.push(DetailRow::header(ctx.t("Cluster deploy status for pods")));

    let report = evaluate_workload(node, &ctx.status_context());
    let clusters = detail_clusters(node, &ctx.hub_cluster);
    let reach = ClusterReach::new(node, &ctx.hub_cluster);
    let resources = node
        .search_model()
        .map(|m| m.resolve(&clusters, &node.namespace))
        .unwrap_or_default();

    let mut listed: Vec<&str> = Vec::new();
    for cluster in &clusters {
        if reach.is_missing(cluster) {
            show_missing_cluster_details(cluster, node, &mut rows, ctx);
            continue;
        }
        rows.push(DetailRow::property(ctx.t("Cluster name"), cluster.as_str()));

        let deployed: Vec<String> = resources
            .iter()
            .filter(|r| &r.cluster == cluster)
            .map(|r| r.namespace.clone())
            .collect();
        for namespace in target_namespaces(node, cluster, &deployed, &node.namespace) {
            let row = match report.counts(cluster, &namespace) {
                Some(counts) => {
                    let pulse = get_pulse_for_data(
                        counts.ready,
                        counts.desired,
                        counts.unavailable,
                        ctx.zero_desired,
                    );
                    let desired = counts
                        .desired
                        .map_or_else(|| "NA".to_string(), |d| d.to_string());
                    DetailRow::status(
                        namespace,
                        format!("{}/{}", counts.ready, desired),
                        pulse.tag(),
                    )
                }
                None => DetailRow::status(
                    namespace,
                    ctx.t("Not Deployed"),
                    PulseStatus::Orange.tag(),
                ),
            };
            rows.push(row);
        }
        listed.push(cluster.as_str());
    }
    rows.spacer();

    let pods = node
        .pod_model()
        .map(|m| m.resolve(&clusters, &node.namespace))
        .unwrap_or_default();
    let mut per_cluster: BTreeMap<&str, Vec<DetailRow>> = BTreeMap::new();
    for pod in &pods {
        if !listed.contains(&pod.cluster.as_str()) {
            continue;
        }
        let tag = pod_tag(pod);
        if !rows.filters().admits(tag) {
            continue;
        }
        per_cluster
            .entry(pod.cluster.as_str())
            .or_default()
            .extend(pod_rows(pod, tag, ctx));
    }

    for cluster in listed {
        let Some(pod_details) = per_cluster.remove(cluster) else {
            continue;
        };
        rows.spacer();
        rows.push(DetailRow::header(ctx.t_args("Pod details for {{0}}", &[cluster])));
        for row in pod_details {
            rows.push(row);
        }
    }
    rows.into_rows()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::IdentityTranslator;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    fn deployment(specs: Value) -> ResourceNode {
        serde_json::from_value(json!({
            "id": "member--deployment--web",
            "type": "deployment",
            "name": "web",
            "namespace": "default",
            "specs": specs
        }))
        .unwrap()
    }

    fn ctx() -> DetailContext<'static> {
        DetailContext::new(
            &IdentityTranslator,
            Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_replica_rows_and_pod_details() {
        let node = deployment(json!({
            "clustersNames": ["feng"],
            "deploymentModel": {"web-feng": [{"namespace": "default", "ready": 1, "desired": 1}]},
            "podModel": {"web-abc-feng": [{
                "name": "web-abc",
                "namespace": "default",
                "cluster": "feng",
                "status": "Running",
                "restarts": 0,
                "hostIP": "10.0.0.1",
                "podIP": "172.17.0.4",
                "startedAt": "2024-05-10T09:00:00Z"
            }]}
        }));
        let rows = set_pod_deploy_status(&node, &ActiveFilters::default(), &ctx());

        assert!(rows[0].is_spacer());
        assert_eq!(rows[1], DetailRow::header("Cluster deploy status for pods"));
        assert_eq!(rows[2], DetailRow::property("Cluster name", "feng"));
        assert_eq!(rows[3], DetailRow::status("default", "1/1", StatusTag::Checkmark));
        assert!(rows.contains(&DetailRow::header("Pod details for {{0}}")));
        assert!(rows.contains(&DetailRow::status("Status", "Running", StatusTag::Checkmark)));
        assert!(rows.contains(&DetailRow::property("Host and Pod IP", "10.0.0.1, 172.17.0.4")));
        assert!(rows.contains(&DetailRow::property("Created", "3 hours ago")));
        assert!(rows.contains(&DetailRow::property("Restarts", "0")));
    }

    #[test]
    fn test_missing_pod_fields() {
        let node = deployment(json!({
            "clustersNames": ["feng"],
            "deploymentModel": {"web-feng": [{"namespace": "default", "desired": 1}]},
            "podModel": {"web-abc-feng": [{"cluster": "feng", "namespace": "default"}]}
        }));
        let rows = set_pod_deploy_status(&node, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::property("Restarts", "undefined")));
        assert!(rows.contains(&DetailRow::property("Host and Pod IP", "undefined, undefined")));
        assert!(rows.contains(&DetailRow::property("Created", "-")));
        assert!(!rows.iter().any(|r| matches!(r, DetailRow::Label(l) if l.label_value == "Pod")));
    }

    #[test]
    fn test_crashed_pod_is_failure() {
        let node = deployment(json!({
            "clustersNames": ["feng"],
            "deploymentModel": {"web-feng": [{"namespace": "default", "desired": 1}]},
            "podModel": {"web-abc-feng": [{
                "name": "web-abc", "cluster": "feng", "namespace": "default",
                "status": "CrashLoopBackOff"
            }]}
        }));
        let rows = set_pod_deploy_status(&node, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("default", "0/1", StatusTag::Failure)));
        assert!(rows.contains(&DetailRow::status(
            "Status",
            "CrashLoopBackOff",
            StatusTag::Failure
        )));

        let green_only =
            set_pod_deploy_status(&node, &ActiveFilters::new([PulseStatus::Green]), &ctx());
        assert!(!green_only.iter().any(|r| r.status_tag() == Some(StatusTag::Failure)));
        assert!(!green_only.contains(&DetailRow::header("Pod details for {{0}}")));
    }

    #[test]
    fn test_namespace_without_resource_is_not_deployed() {
        let node = deployment(json!({"clustersNames": ["feng"], "deploymentModel": {}}));
        let rows = set_pod_deploy_status(&node, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("default", "Not Deployed", StatusTag::Pending)));
    }

    #[test]
    fn test_non_pod_resources_are_skipped() {
        let mut node = deployment(json!({}));
        node.kind = crate::models::NodeKind::Service;
        assert!(set_pod_deploy_status(&node, &ActiveFilters::default(), &ctx()).is_empty());
    }
}

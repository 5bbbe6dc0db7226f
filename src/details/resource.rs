//! Deploy status of resources without pods

use super::links::{EditLinkParams, edit_link, record_edit_link};
use super::location::location_rows;
use super::missing::{ClusterReach, detail_clusters, show_missing_cluster_details};
use super::{ActiveFilters, DetailContext, Rows};
use crate::models::{DetailRow, LinkData, NodeKind, ResolvedRecord, ResourceNode, StatusTag};
use crate::status::ansible::{job_condition, job_result};
use crate::status::generic::record_scope;
use crate::status::pod::{ERROR_STATES, NOT_DEPLOYED_STATES, SUCCESS_STATES};
use crate::status::target_namespaces;
use serde_json::Value;

const ANSIBLE_API_VERSION: &str = "tower.ansible.com/v1alpha1";

/// Tag of a resource status value, matched as a whole word
fn resource_tag(value: &str) -> StatusTag {
    let value = value.to_lowercase();
    if SUCCESS_STATES.contains(&value.as_str()) {
        StatusTag::Checkmark
    } else if NOT_DEPLOYED_STATES.contains(&value.as_str()) {
        StatusTag::Pending
    } else if ERROR_STATES.contains(&value.as_str()) {
        StatusTag::Failure
    } else {
        StatusTag::Warning
    }
}

fn skips(node: &ResourceNode) -> bool {
    if node.must_have_pods() || node.kind == NodeKind::Package {
        return true;
    }
    !node.is_deployable() && node.kind.is_application_model() && node.is_design()
}

/// Task and job status rows of an Ansible hook, shown whatever the filters
fn ansible_job_rows(node: &ResourceNode, rows: &mut Rows<'_>, ctx: &DetailContext<'_>) {
    let condition = job_condition(node);
    let reason = condition
        .and_then(|c| c.get("reason"))
        .and_then(Value::as_str);
    let task_value = condition
        .and_then(|c| c.get("message"))
        .and_then(Value::as_str)
        .or(reason)
        .map(str::to_string)
        .unwrap_or_else(|| ctx.t("description.ansible.job.status.empty.err"));
    let task_tag = match condition {
        None => StatusTag::Pending,
        Some(_) => {
            let reason = reason.unwrap_or_default().to_lowercase();
            if reason.contains("fail") || reason.contains("error") {
                StatusTag::Failure
            } else {
                StatusTag::Checkmark
            }
        }
    };
    rows.push_always(DetailRow::status(
        ctx.t("description.ansible.task.status"),
        task_value,
        task_tag,
    ));

    let (job_value, job_tag) = match job_result(node) {
        Some(result) => {
            let tag = match result.to_lowercase().as_str() {
                "successful" => StatusTag::Checkmark,
                "failed" | "error" | "canceled" => StatusTag::Failure,
                _ => StatusTag::Warning,
            };
            (result.to_string(), tag)
        }
        None => (
            ctx.t("description.ansible.job.status.empty"),
            StatusTag::Pending,
        ),
    };
    rows.push_always(DetailRow::status(
        ctx.t("description.ansible.job.status"),
        job_value,
        job_tag,
    ));
}

/// Link to the hook's own manifest on the hub
fn ansible_hook_link(node: &ResourceNode, ctx: &DetailContext<'_>) -> DetailRow {
    let link = edit_link(&EditLinkParams {
        cluster: Some(ctx.hub_cluster.clone()),
        kind: Some(NodeKind::AnsibleJob.as_str().to_string()),
        apiversion: Some(ANSIBLE_API_VERSION.to_string()),
        name: Some(node.name.clone()),
        namespace: Some(node.namespace.clone()),
    });
    DetailRow::link(
        ctx.t("View resource YAML"),
        LinkData::resource_yaml(Some(ctx.hub_cluster.clone()), link),
    )
    .indented()
}

/// `  available/desired` suffix of a record that reports replicas
fn replica_suffix(found: Option<&ResolvedRecord<'_>>) -> String {
    let Some(record) = found.map(|item| item.record) else {
        return String::new();
    };
    match record.desired {
        Some(desired) => {
            let up = record
                .available
                .filter(|&n| n != 0)
                .or(record.current)
                .unwrap_or(0);
            format!("  {}/{}", up, desired)
        }
        None => String::new(),
    }
}

/// Status value shown for a target namespace
fn deployed_value(node: &ResourceNode, found: Option<&ResolvedRecord<'_>>, ctx: &DetailContext<'_>) -> String {
    let namespace_node = node.kind == NodeKind::Namespace;
    match found {
        Some(_) if namespace_node => ctx.t("Created"),
        Some(item) => item
            .record
            .status
            .clone()
            .unwrap_or_else(|| ctx.t("Deployed")),
        None if namespace_node => ctx.t("Not Created"),
        None => ctx.t("Not Deployed"),
    }
}

/// Per-cluster status of a resource that runs no pods
pub fn set_resource_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if skips(node) {
        return Vec::new();
    }
    let mut rows = Rows::new(filters);
    let hook = node.is_ansible_hook();
    let model_empty = node.search_model().is_none_or(|m| m.is_empty());

    if hook {
        ansible_job_rows(node, &mut rows, ctx);
        if node.raw_at(&["spec"]).is_none() || model_empty {
            rows.spacer();
            rows.push(ansible_hook_link(node, ctx));
            return rows.into_rows();
        }
    } else {
        rows.spacer();
        rows.push(DetailRow::header(ctx.t("Cluster deploy status")));
    }

    let clusters = if hook {
        vec![ctx.hub_cluster.clone()]
    } else {
        detail_clusters(node, &ctx.hub_cluster)
    };
    let reach = ClusterReach::new(node, &ctx.hub_cluster);
    let resources = node
        .search_model()
        .map(|m| m.resolve(&clusters, &node.namespace))
        .unwrap_or_default();

    for cluster in &clusters {
        rows.spacer();
        if reach.is_missing(cluster) {
            show_missing_cluster_details(cluster, node, &mut rows, ctx);
            continue;
        }
        rows.push(DetailRow::property(ctx.t("Cluster name"), cluster.as_str()));

        let on_cluster: Vec<&ResolvedRecord<'_>> =
            resources.iter().filter(|r| &r.cluster == cluster).collect();
        let deployed: Vec<String> = on_cluster
            .iter()
            .map(|r| record_scope(node, r).to_string())
            .collect();

        for namespace in target_namespaces(node, cluster, &deployed, "*") {
            let found = on_cluster
                .iter()
                .copied()
                .find(|r| record_scope(node, r) == namespace);
            let shown = if hook {
                true
            } else {
                let value = deployed_value(node, found, ctx);
                let tag = resource_tag(&value);
                let shown_value = format!("{}{}", value, replica_suffix(found));
                rows.push(DetailRow::status(namespace.as_str(), shown_value, tag))
            };
            if let Some(item) = found.filter(|_| shown) {
                location_rows(node, item.record, &mut rows, ctx);
                rows.push(
                    DetailRow::link(
                        ctx.t("View resource YAML"),
                        LinkData::resource_yaml(
                            Some(item.cluster.clone()),
                            record_edit_link(node, item),
                        ),
                    )
                    .indented(),
                );
            }
        }
    }

    rows.spacer();
    rows.into_rows()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::IdentityTranslator;
    use crate::models::PulseStatus;
    use chrono::Utc;
    use serde_json::json;

    fn node(kind: &str, specs: Value) -> ResourceNode {
        serde_json::from_value(json!({
            "id": format!("member--member--deployable--member--clusters--feng--{}--cfg", kind),
            "type": kind,
            "name": "cfg",
            "namespace": "default",
            "specs": specs
        }))
        .unwrap()
    }

    fn ctx() -> DetailContext<'static> {
        DetailContext::new(&IdentityTranslator, Utc::now())
    }

    fn links(rows: &[DetailRow]) -> Vec<&LinkData> {
        rows.iter()
            .filter_map(|r| match r {
                DetailRow::Link(l) => Some(&l.value.data),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_resource_tags() {
        assert_eq!(resource_tag("Deployed"), StatusTag::Checkmark);
        assert_eq!(resource_tag("Bound"), StatusTag::Checkmark);
        assert_eq!(resource_tag("Not Deployed"), StatusTag::Pending);
        assert_eq!(resource_tag("Failed"), StatusTag::Failure);
        assert_eq!(resource_tag("Terminating"), StatusTag::Warning);
    }

    #[test]
    fn test_found_configmap() {
        let cm = node(
            "configmap",
            json!({
                "raw": {"apiVersion": "v1"},
                "configmapModel": {"cfg-feng": [{"name": "cfg", "namespace": "default", "cluster": "feng", "kind": "ConfigMap"}]}
            }),
        );
        let rows = set_resource_deploy_status(&cm, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::header("Cluster deploy status")));
        assert!(rows.contains(&DetailRow::property("Cluster name", "feng")));
        assert!(rows.contains(&DetailRow::status("default", "Deployed", StatusTag::Checkmark)));
        let links = links(&rows);
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].edit_link.as_deref(),
            Some("/multicloud/home/search/resources/yaml?cluster=feng&kind=configmap&apiversion=v1&name=cfg&namespace=default")
        );
    }

    #[test]
    fn test_missing_configmap() {
        let cm = node("configmap", json!({"configmapModel": {}}));
        let rows = set_resource_deploy_status(&cm, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("*", "Not Deployed", StatusTag::Pending)));
        assert!(links(&rows).is_empty());
    }

    #[test]
    fn test_namespace_node_labels() {
        let ns = node(
            "namespace",
            json!({"namespaceModel": {"cfg-feng": [{"name": "cfg", "cluster": "feng"}]}}),
        );
        let rows = set_resource_deploy_status(&ns, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("cfg", "Created", StatusTag::Checkmark)));
    }

    #[test]
    fn test_filtered_row_drops_its_link() {
        let cm = node(
            "configmap",
            json!({"configmapModel": {"cfg-feng": [{"name": "cfg", "namespace": "default", "cluster": "feng"}]}}),
        );
        let rows = set_resource_deploy_status(&cm, &ActiveFilters::new([PulseStatus::Red]), &ctx());
        assert!(rows.iter().all(|r| r.status_tag().is_none()));
        assert!(links(&rows).is_empty());
    }

    #[test]
    fn test_ansible_hook_without_spec() {
        let mut hook = node("ansiblejob", json!({"raw": {"hookType": "pre-hook"}}));
        hook.name = "prehook-job".to_string();
        let rows = set_resource_deploy_status(&hook, &ActiveFilters::default(), &ctx());
        assert_eq!(
            rows[0],
            DetailRow::status(
                "description.ansible.task.status",
                "description.ansible.job.status.empty.err",
                StatusTag::Pending
            )
        );
        assert_eq!(
            rows[1],
            DetailRow::status(
                "description.ansible.job.status",
                "description.ansible.job.status.empty",
                StatusTag::Pending
            )
        );
        assert!(rows[2].is_spacer());
        let links = links(&rows);
        assert_eq!(
            links[0].edit_link.as_deref(),
            Some("/multicloud/home/search/resources/yaml?cluster=local-cluster&kind=ansiblejob&apiversion=tower.ansible.com%2Fv1alpha1&name=prehook-job&namespace=default")
        );
    }

    #[test]
    fn test_ansible_hook_job_result() {
        let hook = node(
            "ansiblejob",
            json!({"raw": {
                "hookType": "post-hook",
                "status": {
                    "ansibleJobResult": {"status": "successful"},
                    "conditions": [{"reason": "Successful", "message": "Awaiting next reconciliation"}]
                }
            }}),
        );
        let rows = set_resource_deploy_status(&hook, &ActiveFilters::default(), &ctx());
        assert_eq!(
            rows[0],
            DetailRow::status(
                "description.ansible.task.status",
                "Awaiting next reconciliation",
                StatusTag::Checkmark
            )
        );
        assert_eq!(
            rows[1],
            DetailRow::status("description.ansible.job.status", "successful", StatusTag::Checkmark)
        );
    }

    #[test]
    fn test_design_application_model_kinds_are_skipped() {
        let mut sub = node("subscription", json!({"isDesign": true}));
        sub.id = "member--subscription--default--sub".to_string();
        assert!(set_resource_deploy_status(&sub, &ActiveFilters::default(), &ctx()).is_empty());
        let deployment = node("deployment", json!({}));
        assert!(set_resource_deploy_status(&deployment, &ActiveFilters::default(), &ctx()).is_empty());
    }

    #[test]
    fn test_non_design_application_model_kinds_show_deploy_status() {
        let mut sub = node(
            "subscription",
            json!({
                "isDesign": false,
                "clustersNames": ["feng"],
                "subscriptionModel": {"sub-feng": [{"name": "sub", "namespace": "default", "cluster": "feng", "status": "Subscribed"}]}
            }),
        );
        sub.id = "member--subscription--default--sub".to_string();
        let rows = set_resource_deploy_status(&sub, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::header("Cluster deploy status")));
        assert!(rows.contains(&DetailRow::status("default", "Subscribed", StatusTag::Warning)));
    }

    #[test]
    fn test_ansible_job_rows_survive_any_filter() {
        let hook = node("ansiblejob", json!({"raw": {"hookType": "pre-hook"}}));
        let rows = set_resource_deploy_status(&hook, &ActiveFilters::new([PulseStatus::Red]), &ctx());
        assert_eq!(
            &rows[..2],
            &[
                DetailRow::status(
                    "description.ansible.task.status",
                    "description.ansible.job.status.empty.err",
                    StatusTag::Pending
                ),
                DetailRow::status(
                    "description.ansible.job.status",
                    "description.ansible.job.status.empty",
                    StatusTag::Pending
                ),
            ]
        );
    }

    #[test]
    fn test_replica_counts_follow_status() {
        let set = node(
            "other",
            json!({"otherModel": {"cfg-feng": [
                {"name": "cfg", "namespace": "default", "cluster": "feng", "status": "Deployed", "desired": 3, "available": 2}
            ]}}),
        );
        let rows = set_resource_deploy_status(&set, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("default", "Deployed  2/3", StatusTag::Checkmark)));

        let idle = node(
            "other",
            json!({"otherModel": {"cfg-feng": [
                {"name": "cfg", "namespace": "default", "cluster": "feng", "desired": 1, "available": 0, "current": 1}
            ]}}),
        );
        let rows = set_resource_deploy_status(&idle, &ActiveFilters::default(), &ctx());
        assert!(rows.contains(&DetailRow::status("default", "Deployed  1/1", StatusTag::Checkmark)));
    }

    #[test]
    fn test_service_location_precedes_yaml_link() {
        let svc = node(
            "service",
            json!({"serviceModel": {"cfg-feng": [
                {"name": "cfg", "namespace": "default", "cluster": "feng", "clusterIP": "172.30.0.10", "port": "80/TCP"}
            ]}}),
        );
        let rows = set_resource_deploy_status(&svc, &ActiveFilters::default(), &ctx());
        let at = rows
            .iter()
            .position(|r| r == &DetailRow::property("Location", "172.30.0.10:80"))
            .expect("location row");
        assert!(matches!(&rows[at + 1], DetailRow::Link(l) if l.value.label == "View resource YAML"));
    }

    #[test]
    fn test_hostless_route_on_cluster() {
        let route = node(
            "route",
            json!({
                "raw": {"spec": {}},
                "routeModel": {"cfg-feng": [{"name": "cfg", "namespace": "default", "cluster": "feng"}]}
            }),
        );
        let rows = set_resource_deploy_status(&route, &ActiveFilters::default(), &ctx());
        assert!(rows.iter().any(|r| matches!(
            r,
            DetailRow::Link(l) if l.value.label == "Launch Route URL"
                && l.value.data.cluster.as_deref() == Some("feng")
        )));
    }
}

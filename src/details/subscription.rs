//! Subscription deploy status

use super::links::{EditLinkParams, edit_link, search_link};
use super::missing::ClusterReach;
use super::{ActiveFilters, DetailContext, Rows};
use crate::models::{DetailRow, LinkData, NodeKind, PulseStatus, ResourceNode, SearchRecord, StatusTag};
use crate::status::subscription::cluster_report_failed;
use crate::status::target_clusters;
use serde_json::Value;

const HUB_NO_STATUS: &str = "This subscription has no status. If the status does not change to {{0}} after waiting for initial creation, verify that the multicluster-operators-hub-subscription pod is running on hub";
const REMOTE_NO_STATUS: &str = "This subscription has no status. If the status does not change to {{0}} after waiting for initial creation, verify that the application-manager pod is running on the remote cluster.";
const FAILED_RESOURCES: &str =
    "Some resources failed to deploy. Use View resource YAML link to view the details.";
const FAILED_REPORT: &str =
    "Some resources failed to deploy. Use View status YAML link to view the details.";
const SUBSCRIPTION_STATUS_KIND: &str = "SubscriptionStatus";
const SUBSCRIPTION_STATUS_API_VERSION: &str = "apps.open-cluster-management.io/v1alpha1";
const NO_REMOTE_SUBSCRIPTIONS: &str = "This subscription was not added to a managed cluster. If this status does not change after waiting for initial creation, ensure the Placement Rule resource is valid and exists in the {{0}} namespace and that the application-manager pod runs on the managed clusters.";

/// Filter pulse of a subscription record
fn record_pulse(record: &SearchRecord) -> PulseStatus {
    match record.status.as_deref() {
        Some(status) if status.contains("Fail") => PulseStatus::Red,
        Some("Subscribed") => PulseStatus::Green,
        _ => PulseStatus::Yellow,
    }
}

fn time_window_rows(node: &ResourceNode, rows: &mut Rows<'_>, ctx: &DetailContext<'_>) {
    let Some(window_type) = node.raw_str(&["spec", "timewindow", "windowtype"]) else {
        return;
    };
    rows.push(DetailRow::header(ctx.t("Time Window")));
    rows.push(DetailRow::property(ctx.t("Time Window type"), window_type));
    if let Some(days) = node.raw_at(&["spec", "timewindow", "daysofweek"]) {
        rows.push(DetailRow::property(ctx.t("Time Window days"), days.to_string()));
    }
    if let Some(hours) = node
        .raw_at(&["spec", "timewindow", "hours"])
        .and_then(Value::as_array)
    {
        for range in hours {
            let start = range.get("start").and_then(Value::as_str).unwrap_or("NA");
            let end = range.get("end").and_then(Value::as_str).unwrap_or("NA");
            rows.push(DetailRow::property(
                ctx.t("Time Window hours"),
                format!("{}-{}", start, end),
            ));
        }
    }
    let zone = node
        .raw_str(&["spec", "timewindow", "location"])
        .unwrap_or("NA");
    rows.push(DetailRow::property(ctx.t("Time zone"), zone));

    let blocked = node.specs.as_ref().is_some_and(|s| s.is_blocked);
    rows.push(DetailRow::property(
        ctx.t("Currently blocked"),
        ctx.t(if blocked { "Yes" } else { "No" }),
    ));
}

/// Link to the per-cluster status report of a subscription
fn status_yaml_link(node: &ResourceNode, cluster: &str, ctx: &DetailContext<'_>) -> DetailRow {
    let link = edit_link(&EditLinkParams {
        cluster: Some(cluster.to_string()),
        kind: Some(SUBSCRIPTION_STATUS_KIND.to_string()),
        apiversion: Some(SUBSCRIPTION_STATUS_API_VERSION.to_string()),
        name: Some(node.name.clone()),
        namespace: Some(node.namespace.clone()),
    });
    DetailRow::link(
        ctx.t("View status YAML"),
        LinkData::resource_yaml(Some(cluster.to_string()), link),
    )
}

/// `<cluster>:<status>` entries of the time window message
fn window_status_rows(
    node: &ResourceNode,
    cluster: &str,
    rows: &mut Rows<'_>,
    ctx: &DetailContext<'_>,
) {
    if node.raw_at(&["spec", "timewindow", "windowtype"]).is_none() {
        return;
    }
    let message = node.raw_str(&["status", "message"]).unwrap_or_default();
    let prefix = format!("{}:", cluster);
    for entry in message.split(',') {
        if entry.trim_start().starts_with(&prefix) {
            let value = entry.split(':').nth(1).unwrap_or_default();
            rows.push(DetailRow::property(ctx.t("Current window status is"), value));
        }
    }
}

fn has_failed_package_on(node: &ResourceNode, cluster: &str) -> bool {
    node.raw_at(&["status", "statuses", cluster, "packages"])
        .and_then(Value::as_object)
        .is_some_and(|packages| {
            packages
                .values()
                .any(|p| p.get("phase").and_then(Value::as_str) == Some("Failed"))
        })
}

/// Per-cluster status rows of a subscription
pub fn set_subscription_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if node.kind != NodeKind::Subscription || node.is_deployable() || !node.is_design() {
        return Vec::new();
    }
    let mut rows = Rows::new(filters);

    time_window_rows(node, &mut rows, ctx);

    let local_placement = node
        .raw_at(&["spec", "placement", "local"])
        .is_some_and(|v| v.as_bool().unwrap_or(false) || v.as_str() == Some("true"));
    if local_placement {
        rows.spacer();
        rows.push(DetailRow::property(
            ctx.t("Subscription deployed on local cluster"),
            "true",
        ));
    }

    rows.spacer();
    rows.push(DetailRow::header(ctx.t("Cluster deploy status")));

    let clusters = target_clusters(node, &ctx.hub_cluster);
    let reach = ClusterReach::new(node, &ctx.hub_cluster);
    let resolved = node
        .search_model()
        .map(|m| m.resolve(&clusters, &node.namespace))
        .unwrap_or_default();

    let mut local_failed = false;
    for item in &resolved {
        let record = item.record;
        if !rows.filters().admits_pulse(record_pulse(record)) {
            continue;
        }
        let cluster = item.cluster.as_str();
        if reach.is_missing(cluster) {
            rows.push(DetailRow::status(
                cluster,
                ctx.t("Cluster is offline"),
                StatusTag::Warning,
            ));
            rows.spacer();
            continue;
        }

        let status = record.status.as_deref();
        let hub_record = record.is_hub_resource();
        let local_failed_record = hub_record && status.is_none_or(|s| s.contains("Fail"));
        local_failed |= local_failed_record;
        let linked_local = local_placement
            || (record.local_placement.as_deref() == Some("true") && cluster == ctx.hub_cluster);

        if linked_local || !hub_record || local_failed_record {
            let tag = match status {
                Some(s) if s.contains("Fail") => StatusTag::Failure,
                None => StatusTag::Warning,
                Some(_) => StatusTag::Checkmark,
            };
            let value = match status {
                Some(s) => s.to_string(),
                None if hub_record => ctx.t_args(HUB_NO_STATUS, &["Propagated"]),
                None => ctx.t_args(REMOTE_NO_STATUS, &["Subscribed"]),
            };
            rows.push(DetailRow::status(cluster, value, tag));
            if !local_placement && linked_local {
                rows.push(DetailRow::property(
                    ctx.t("Subscription deployed on local cluster"),
                    "true",
                ));
            }

            window_status_rows(node, cluster, &mut rows, ctx);

            let failed = status.is_some_and(|s| s.contains("Failed"));
            if failed {
                let reason = node
                    .raw_str(&["status", "reason"])
                    .map(str::to_string)
                    .unwrap_or_else(|| ctx.t(FAILED_RESOURCES));
                rows.push(DetailRow::status(ctx.t("Error"), reason, StatusTag::Failure));
            } else if has_failed_package_on(node, cluster) {
                rows.push(DetailRow::status(
                    ctx.t("Warning"),
                    ctx.t(FAILED_RESOURCES),
                    StatusTag::Warning,
                ));
            }

            if cluster_report_failed(node, cluster)
                && rows.push(DetailRow::status(
                    ctx.t("Error"),
                    ctx.t(FAILED_REPORT),
                    StatusTag::Failure,
                ))
            {
                rows.push(status_yaml_link(node, cluster, ctx));
            }
        }
        rows.spacer();
    }

    if resolved.is_empty()
        && !local_failed
        && !local_placement
        && rows.filters().admits_pulse(PulseStatus::Red)
    {
        rows.push(DetailRow::status(
            ctx.t("Remote subscriptions"),
            ctx.t_args(NO_REMOTE_SUBSCRIPTIONS, &[node.namespace.as_str()]),
            StatusTag::Failure,
        ));
        let target = search_link("placementrule", &node.namespace, &ctx.hub_cluster);
        rows.push(
            DetailRow::link(
                ctx.t_args("View all placement rules in {{0}} namespace", &[node.namespace.as_str()]),
                LinkData::open(target),
            )
            .with_id(format!("{}-subscrSearch", node.id)),
        );
    }

    rows.spacer();
    rows.into_rows()
}

//! Application and ApplicationSet details

use super::links::search_link;
use super::{ActiveFilters, DetailContext, Rows};
use crate::models::{
    DetailRow, LinkAction, LinkData, NodeKind, RelatedApp, RelatedArgoAppsData, ResourceNode,
    StatusTag,
};
use crate::status::argo::{DEGRADED, MISSING, UNKNOWN};
use serde_json::Value;

const NO_SELECTOR: &str =
    "This application has no subscription match selector (spec.selector.matchExpressions)";
const NO_SUBSCRIPTION: &str = "This application has no matched subscription. Make sure the subscription match selector spec.selector.matchExpressions exists and matches a Subscription resource created in the {{0}} namespace.";
const UNHEALTHY_APP: &str = "The health status for application {{0}} is {{1}}. Use the Launch Argo editor action below to view the application details.";
const NO_APPSET_APPS: &str = "There are no Argo applications created. Check the following resources and make sure they are configured properly: applicationset placement, gitopscluster, gitopscluster placement, managedclusterset. Also make sure the ApplicationSet feature is enabled if GitOps is deployed to a namespace other than openshift-gitops.";

/// Selector as one line: `matchExpressions=[key=app,operator=In,values=[web]]`
fn flatten_selector(selector: &Value) -> String {
    serde_json::to_string(selector)
        .unwrap_or_default()
        .replace(':', "=")
        .replace(['{', '}', '"', ' '], "")
        .replace("//", ",")
}

fn selector_row(node: &ResourceNode, ctx: &DetailContext<'_>) -> DetailRow {
    let label = ctx.t("Subscription Selector");
    match node.raw_at(&["spec", "selector"]) {
        Some(selector) => DetailRow::property(label, flatten_selector(selector)),
        None => DetailRow::status(label, ctx.t(NO_SELECTOR), StatusTag::Failure),
    }
}

fn argo_application_rows(node: &ResourceNode, rows: &mut Rows<'_>, ctx: &DetailContext<'_>) {
    let related: &[RelatedApp] = node
        .specs
        .as_ref()
        .map(|s| s.related_apps.as_slice())
        .unwrap_or(&[]);
    if related.is_empty() {
        return;
    }

    let health = node.raw_str(&["status", "health", "status"]);
    let has_conditions = node.raw_at(&["status", "conditions"]).is_some();
    if let Some(health) = health.filter(|h| matches!(*h, UNKNOWN | DEGRADED | MISSING)) {
        if has_conditions {
            rows.push(DetailRow::status(
                ctx.t("Health status"),
                ctx.t_args(UNHEALTHY_APP, &[node.name.as_str(), health]),
                StatusTag::Failure,
            ));
        }
    }

    let count = related.len().to_string();
    rows.push(DetailRow::header(
        ctx.t_args("Related applications ({{0}})", &[count.as_str()]),
    ));
    rows.spacer();

    let mut sorted = related.to_vec();
    sorted.sort_by_cached_key(|app| app.name.as_deref().unwrap_or_default().to_lowercase());
    rows.push(DetailRow::RelatedArgoAppDetails {
        relatedargoappsdata: RelatedArgoAppsData {
            argo_app_list: sorted,
        },
    });
}

fn app_set_rows(node: &ResourceNode, rows: &mut Rows<'_>, ctx: &DetailContext<'_>) {
    let apps = node
        .specs
        .as_ref()
        .map(|s| s.app_set_apps.as_slice())
        .unwrap_or(&[]);
    if apps.is_empty() {
        rows.push(DetailRow::status(
            ctx.t("Error"),
            ctx.t(NO_APPSET_APPS),
            StatusTag::Failure,
        ));
        return;
    }

    rows.push(DetailRow::header(ctx.t("Application deploy status")));
    rows.spacer();

    for app in apps {
        let name = app.metadata.name.clone().unwrap_or_default();
        rows.push(DetailRow::property(
            name.clone(),
            app.health().unwrap_or_default(),
        ));
        rows.push(DetailRow::property(
            ctx.t("Sync status"),
            app.sync().unwrap_or_default(),
        ));
        for condition in &app.status.conditions {
            let kind = condition.get("type").and_then(Value::as_str).unwrap_or_default();
            let message = condition
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            rows.push(DetailRow::status(kind, message, StatusTag::Failure));
        }
        let data = LinkData {
            name: Some(name.clone()),
            namespace: app.metadata.namespace.clone(),
            cluster: Some(ctx.hub_cluster.clone()),
            ..LinkData::new(LinkAction::OpenArgoEditor)
        };
        rows.push(
            DetailRow::link(ctx.t("Launch Argo editor"), data).with_id(format!("argoapp-{}", name)),
        );
        rows.spacer();
    }
}

/// Status of the applications an ApplicationSet generated
pub fn set_app_set_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if node.kind != NodeKind::ApplicationSet || !node.is_design() {
        return Vec::new();
    }
    let mut rows = Rows::new(filters);
    app_set_rows(node, &mut rows, ctx);
    rows.into_rows()
}

/// Application node details: Argo related apps, or the subscription selector
/// of an application-model application
pub fn set_application_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if !node.is_design() {
        return Vec::new();
    }
    match node.kind {
        NodeKind::ApplicationSet => return set_app_set_deploy_status(node, filters, ctx),
        NodeKind::Application => {}
        _ => return Vec::new(),
    }

    let mut rows = Rows::new(filters);
    if node.is_argo_app() {
        argo_application_rows(node, &mut rows, ctx);
        return rows.into_rows();
    }

    rows.push(selector_row(node, ctx));
    rows.spacer();

    let has_channels = node.specs.as_ref().is_some_and(|s| !s.channels.is_empty());
    if !node.is_deployable() && !has_channels {
        let namespace = node.namespace.as_str();
        rows.push(DetailRow::status(
            ctx.t("Error"),
            ctx.t_args(NO_SUBSCRIPTION, &[namespace]),
            StatusTag::Failure,
        ));
        let target = search_link("subscription", namespace, &ctx.hub_cluster);
        rows.push(
            DetailRow::link(
                ctx.t_args("View all subscriptions in {{0}} namespace", &[namespace]),
                LinkData::open(target),
            )
            .with_id(format!("{}-subscrSearch", node.id)),
        );
    }
    rows.into_rows()
}

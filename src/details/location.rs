//! Service and route location rows shown under a found resource

use super::{DetailContext, Rows};
use crate::models::{DetailRow, LinkData, NodeKind, ResourceNode, SearchRecord};
use serde_json::Value;

fn is_route(node: &ResourceNode) -> bool {
    node.kind.as_str() == "route"
        || node
            .template_at(&["kind"])
            .and_then(Value::as_str)
            .is_some_and(|kind| kind.eq_ignore_ascii_case("route"))
}

/// Route deployed on a cluster. A route with a known host adds no link
/// here; the console resolves hostless routes through `LinkAction::OpenRouteUrl`.
fn route_location_rows(
    node: &ResourceNode,
    route: &SearchRecord,
    rows: &mut Rows<'_>,
    ctx: &DetailContext<'_>,
) {
    if !is_route(node) {
        return;
    }
    let rules: &[Value] = node
        .raw_at(&["spec", "rules"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if rules.len() > 1 {
        return;
    }

    if let Some(name) = route.name.as_deref().filter(|n| !n.is_empty()) {
        if name != node.name {
            rows.push(DetailRow::property(ctx.t("spec.route.cluster.name"), name));
        }
    }

    let search_clusters = node.specs.as_ref().map_or(0, |s| s.search_clusters.len());
    let host = node
        .raw_str(&["spec", "host"])
        .or_else(|| rules.first().and_then(|r| r.get("host")).and_then(Value::as_str))
        .or_else(|| {
            if search_clusters > 0 {
                return None;
            }
            node.raw_at(&["spec", "ingress"])
                .and_then(Value::as_array)
                .and_then(|ingress| ingress.first())
                .and_then(|i| i.get("host"))
                .and_then(Value::as_str)
        });
    if host.is_some() {
        return;
    }

    let id = route
        .extra
        .get("_uid")
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
        .unwrap_or_else(|| "0".to_string());
    rows.push(
        DetailRow::link(ctx.t("Launch Route URL"), LinkData::route_url(route.clone()))
            .with_id(id)
            .indented(),
    );
}

/// `clusterIP:port` of a service
fn service_location_rows(
    node: &ResourceNode,
    service: &SearchRecord,
    rows: &mut Rows<'_>,
    ctx: &DetailContext<'_>,
) {
    if node.kind != NodeKind::Service {
        return;
    }
    let ip = service.cluster_ip.as_deref().filter(|ip| !ip.is_empty());
    let port = service.port.as_deref().filter(|p| !p.is_empty());
    if let (Some(ip), Some(port)) = (ip, port) {
        let port = port.split([':', '/']).next().unwrap_or(port);
        rows.push(DetailRow::property(ctx.t("Location"), format!("{}:{}", ip, port)));
    }
}

/// Location rows of a resource record found on a cluster
pub(crate) fn location_rows(
    node: &ResourceNode,
    record: &SearchRecord,
    rows: &mut Rows<'_>,
    ctx: &DetailContext<'_>,
) {
    route_location_rows(node, record, rows, ctx);
    service_location_rows(node, record, rows, ctx);
}

//! Cluster blocks for clusters without deployment data

use super::{DetailContext, Rows};
use crate::models::{DetailRow, ResourceNode, StatusTag};
use crate::status::cluster::{has_cluster_data, online_clusters, target_clusters};
use url::Url;

/// Clusters a detail panel walks through.
///
/// An empty name stands for "no deployed cluster" and is used when the node
/// names no target cluster but carries target namespaces.
pub(crate) fn detail_clusters(node: &ResourceNode, hub_cluster: &str) -> Vec<String> {
    let names_clusters = node.specs.as_ref().is_some_and(|s| !s.clusters_names.is_empty())
        || node.fanout().is_some_and(|f| !f.app_clusters.is_empty());
    let has_records = node.search_model().is_some_and(|m| !m.is_empty());
    let has_targets = node
        .fanout()
        .is_some_and(|f| !f.target_namespaces.is_empty());
    if !names_clusters && !has_records && has_targets {
        return vec![String::new()];
    }
    target_clusters(node, hub_cluster)
}

fn is_http_url(name: &str) -> bool {
    Url::parse(name).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Clusters whose block renders as missing: unnamed clusters, Argo servers
/// that could not be mapped to a cluster and, when the node carries
/// availability data, clusters that are not online
pub(crate) struct ClusterReach {
    online: Vec<String>,
    checks_online: bool,
}

impl ClusterReach {
    pub(crate) fn new(node: &ResourceNode, hub_cluster: &str) -> Self {
        Self {
            online: online_clusters(node, hub_cluster),
            checks_online: has_cluster_data(node),
        }
    }

    pub(crate) fn is_missing(&self, cluster: &str) -> bool {
        cluster.is_empty()
            || is_http_url(cluster)
            || (self.checks_online && !self.online.iter().any(|c| c == cluster))
    }
}

/// Rows for a cluster the node has no data for
pub(crate) fn show_missing_cluster_details(
    cluster: &str,
    node: &ResourceNode,
    rows: &mut Rows<'_>,
    ctx: &DetailContext<'_>,
) {
    let target_namespaces = node.fanout().map(|f| &f.target_namespaces);

    if cluster.is_empty() {
        for name in target_namespaces.into_iter().flat_map(|t| t.keys()) {
            rows.push(DetailRow::property(ctx.t("Cluster name"), name.clone()));
            rows.push(DetailRow::status(
                "*",
                ctx.t("spec.deploy.not.deployed"),
                StatusTag::Pending,
            ));
        }
        return;
    }

    rows.push(DetailRow::property(ctx.t("Cluster name"), cluster));
    let namespaces: Vec<String> = target_namespaces
        .and_then(|t| t.get(cluster))
        .cloned()
        .unwrap_or_else(|| vec!["*".to_string()]);

    if is_http_url(cluster) {
        let value = if cluster.starts_with("https://api.") {
            ctx.t("spec.deploy.not.deployed")
        } else {
            ctx.t("Not mapped")
        };
        for ns in namespaces {
            rows.push(DetailRow::status(ns, value.clone(), StatusTag::Pending));
        }
        return;
    }

    let offline = node
        .specs
        .iter()
        .flat_map(|s| s.search_clusters.iter())
        .find(|c| c.name.as_deref() == Some(cluster))
        .and_then(|c| c.cluster_namespace.as_deref())
        .is_some_and(|ns| ns.len() > 1);
    for ns in namespaces {
        if offline {
            rows.push(DetailRow::status(ns, ctx.t("Offline"), StatusTag::Warning));
        } else {
            rows.push(DetailRow::status(ns, ctx.t("Not deployed"), StatusTag::Pending));
        }
    }
}

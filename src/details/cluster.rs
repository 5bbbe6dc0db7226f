//! Cluster node details

use super::DetailContext;
use crate::models::{ClusterComboboxData, DetailRow, NodeKind, ResourceNode};
use crate::status::cluster::member_clusters;

/// Member cluster picker, plus the clusters search found that the placement
/// did not select
pub fn set_cluster_status(node: &ResourceNode, ctx: &DetailContext<'_>) -> Vec<DetailRow> {
    if node.kind != NodeKind::Cluster {
        return Vec::new();
    }
    let Some(specs) = node.specs.as_ref() else {
        return Vec::new();
    };

    let members = member_clusters(node, &ctx.hub_cluster);
    let zombies: Vec<&String> = specs
        .clusters_names
        .iter()
        .filter(|name| !specs.clusters.iter().any(|c| c.is_named(name)))
        .collect();

    let mut rows = vec![
        DetailRow::header(format!("{} ({})", ctx.t("Clusters"), members.len())),
        DetailRow::ClusterDetailCombobox {
            comboboxdata: ClusterComboboxData {
                cluster_list: members,
                cluster_id: node.id.clone(),
            },
        },
    ];

    if !zombies.is_empty() {
        rows.push(DetailRow::Spacer);
        rows.push(DetailRow::header(format!(
            "{} ({})",
            ctx.t("Not selected by placement rule"),
            zombies.len()
        )));
        for name in zombies {
            rows.push(DetailRow::property(ctx.t("Cluster name"), name.clone()));
        }
    }
    rows
}

//! Placement rule and placement errors

use super::{ActiveFilters, DetailContext, Rows};
use crate::models::{DetailRow, NodeKind, ResourceNode, StatusTag};
use crate::status::placement::{has_decisions, selected_clusters};

const NO_DECISIONS: &str = "This Placement Rule does not match any remote clusters. Make sure the clusterSelector and clusterConditions properties, when used, are valid and match your clusters. If using the clusterReplicas property make sure is being set to a positive value.";
const NO_SELECTED_CLUSTERS: &str = "This Placement does not match any remote clusters. Make sure the requiredClusterSelector property is valid and match your clusters.";
const NO_PLACEMENT_STATUS: &str = "This Placement does not have any status. Make sure the ManagedClusterSetBinding is created for the target namespace.";

/// `Error` row for a placement rule without decisions
pub fn set_placement_rule_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if node.kind != NodeKind::Placements || node.is_deployable() || has_decisions(node) {
        return Vec::new();
    }
    let mut rows = Rows::new(filters);
    rows.push(DetailRow::status(
        ctx.t("Error"),
        ctx.t(NO_DECISIONS),
        StatusTag::Failure,
    ));
    rows.into_rows()
}

/// `Error` row for a placement that selects no cluster or has no status
pub fn set_placement_deploy_status(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    if node.kind != NodeKind::Placement || node.is_deployable() {
        return Vec::new();
    }
    let message = if node.raw_at(&["status"]).is_none() {
        NO_PLACEMENT_STATUS
    } else if selected_clusters(node) == Some(0) {
        NO_SELECTED_CLUSTERS
    } else {
        return Vec::new();
    };
    let mut rows = Rows::new(filters);
    rows.push(DetailRow::status(ctx.t("Error"), ctx.t(message), StatusTag::Failure));
    rows.into_rows()
}

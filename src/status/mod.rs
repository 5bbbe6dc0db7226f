//! Node status computation
//!
//! Every topology node is reduced to a [`PulseStatus`]. Each node kind has its
//! own classifier; [`compute_node_status`] dispatches to it. Classifiers never
//! fail: missing data degrades to a conservative pulse.

pub mod ansible;
pub mod argo;
pub mod cluster;
pub mod data;
pub mod generic;
pub mod placement;
pub mod pod;
pub mod subscription;
pub mod workload;

pub use cluster::{get_pulse_status_for_cluster, online_clusters, target_clusters, target_namespaces};
pub use data::{ZeroDesiredPolicy, get_pulse_for_data};
pub use pod::get_pod_state;
pub use workload::{ReplicaCounts, WorkloadReport, evaluate_workload};

use crate::models::{NodeKind, PulseStatus, ResourceNode};
use tracing::debug;

/// Hub cluster used when none is configured
pub const DEFAULT_HUB_CLUSTER: &str = "local-cluster";

/// Inputs shared by all classifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusContext {
    pub hub_cluster: String,
    pub zero_desired: ZeroDesiredPolicy,
}

impl StatusContext {
    pub fn new(hub_cluster: impl Into<String>) -> Self {
        Self {
            hub_cluster: hub_cluster.into(),
            zero_desired: ZeroDesiredPolicy::default(),
        }
    }

    pub fn with_zero_desired(mut self, policy: ZeroDesiredPolicy) -> Self {
        self.zero_desired = policy;
        self
    }
}

impl Default for StatusContext {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CLUSTER)
    }
}

fn has_selector(node: &ResourceNode) -> bool {
    node.raw_at(&["spec", "selector"]).is_some()
}

fn has_channels(node: &ResourceNode) -> bool {
    node.specs.as_ref().is_some_and(|s| !s.channels.is_empty())
}

/// Compute the pulse of a topology node
pub fn compute_node_status(node: Option<&ResourceNode>, ctx: &StatusContext) -> PulseStatus {
    let Some(node) = node else {
        debug!("no node to classify");
        return PulseStatus::Yellow;
    };
    if node.specs.is_none() {
        debug!(node = %node.name, kind = %node.kind, "node has no specs");
        return PulseStatus::Yellow;
    }

    let generic = || generic::get_pulse_status_for_generic_node(node, ctx);
    let pulse = match &node.kind {
        NodeKind::Cluster => get_pulse_status_for_cluster(node, &ctx.hub_cluster),
        NodeKind::Application => {
            if node.is_argo_app() {
                argo::get_pulse_status_for_argo_app(node)
            } else if node.is_deployable() || !node.is_design() {
                generic()
            } else if has_channels(node) || has_selector(node) {
                PulseStatus::Green
            } else {
                PulseStatus::Red
            }
        }
        NodeKind::ApplicationSet => {
            if node.is_deployable() || !node.is_design() {
                generic()
            } else {
                argo::get_pulse_status_for_app_set(node)
            }
        }
        NodeKind::Subscription => {
            if node.is_deployable() || !node.is_design() {
                generic()
            } else {
                subscription::get_pulse_status_for_subscription(node, &ctx.hub_cluster)
            }
        }
        NodeKind::Placements => {
            if node.is_deployable() {
                generic()
            } else {
                placement::get_pulse_status_for_placement_rule(node)
            }
        }
        NodeKind::Placement => {
            if node.is_deployable() {
                generic()
            } else {
                placement::get_pulse_status_for_placement(node)
            }
        }
        NodeKind::AnsibleJob => ansible::get_pulse_status_for_ansible_node(node),
        NodeKind::Deployment
        | NodeKind::DeploymentConfig
        | NodeKind::ReplicaSet
        | NodeKind::ReplicationController
        | NodeKind::DaemonSet
        | NodeKind::StatefulSet
        | NodeKind::ControllerRevision
        | NodeKind::Pod => evaluate_workload(node, ctx).pulse,
        NodeKind::Service
        | NodeKind::PersistentVolumeClaim
        | NodeKind::Package
        | NodeKind::ConfigMap
        | NodeKind::Secret
        | NodeKind::Namespace
        | NodeKind::ClusterRole
        | NodeKind::ClusterRoleBinding
        | NodeKind::Other(_)
        | NodeKind::Unknown => {
            if node.must_have_pods() {
                evaluate_workload(node, ctx).pulse
            } else {
                generic()
            }
        }
    };

    debug!(node = %node.name, kind = %node.kind, %pulse, "node status computed");
    pulse
}

//! Topology node kinds
//!
//! Closed set of node types the status engine understands. Anything else is
//! carried as [`NodeKind::Other`] and evaluated with the generic rule.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kind of a topology node, taken from the node's `type` tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    // Application model
    Application,
    ApplicationSet,
    Subscription,
    /// Placement rule (`placements` in topology payloads)
    Placements,
    Placement,
    Cluster,
    // Workloads
    Deployment,
    DeploymentConfig,
    ReplicaSet,
    ReplicationController,
    DaemonSet,
    StatefulSet,
    ControllerRevision,
    Pod,
    // Other deployed resources
    Service,
    PersistentVolumeClaim,
    Package,
    AnsibleJob,
    ConfigMap,
    Secret,
    Namespace,
    ClusterRole,
    ClusterRoleBinding,
    /// Any type tag not listed above
    Other(String),
    #[default]
    Unknown,
}

impl NodeKind {
    /// Type tag as it appears in topology payloads
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Application => "application",
            NodeKind::ApplicationSet => "applicationset",
            NodeKind::Subscription => "subscription",
            NodeKind::Placements => "placements",
            NodeKind::Placement => "placement",
            NodeKind::Cluster => "cluster",
            NodeKind::Deployment => "deployment",
            NodeKind::DeploymentConfig => "deploymentconfig",
            NodeKind::ReplicaSet => "replicaset",
            NodeKind::ReplicationController => "replicationcontroller",
            NodeKind::DaemonSet => "daemonset",
            NodeKind::StatefulSet => "statefulset",
            NodeKind::ControllerRevision => "controllerrevision",
            NodeKind::Pod => "pod",
            NodeKind::Service => "service",
            NodeKind::PersistentVolumeClaim => "persistentvolumeclaim",
            NodeKind::Package => "package",
            NodeKind::AnsibleJob => "ansiblejob",
            NodeKind::ConfigMap => "configmap",
            NodeKind::Secret => "secret",
            NodeKind::Namespace => "namespace",
            NodeKind::ClusterRole => "clusterrole",
            NodeKind::ClusterRoleBinding => "clusterrolebinding",
            NodeKind::Other(tag) => tag.as_str(),
            NodeKind::Unknown => "",
        }
    }

    /// All kinds with a fixed tag
    pub fn all() -> &'static [Self] {
        &[
            NodeKind::Application,
            NodeKind::ApplicationSet,
            NodeKind::Subscription,
            NodeKind::Placements,
            NodeKind::Placement,
            NodeKind::Cluster,
            NodeKind::Deployment,
            NodeKind::DeploymentConfig,
            NodeKind::ReplicaSet,
            NodeKind::ReplicationController,
            NodeKind::DaemonSet,
            NodeKind::StatefulSet,
            NodeKind::ControllerRevision,
            NodeKind::Pod,
            NodeKind::Service,
            NodeKind::PersistentVolumeClaim,
            NodeKind::Package,
            NodeKind::AnsibleJob,
            NodeKind::ConfigMap,
            NodeKind::Secret,
            NodeKind::Namespace,
            NodeKind::ClusterRole,
            NodeKind::ClusterRoleBinding,
        ]
    }

    /// Parse a type tag, case-insensitive. Unlisted tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "" => NodeKind::Unknown,
            "application" => NodeKind::Application,
            "applicationset" => NodeKind::ApplicationSet,
            "subscription" => NodeKind::Subscription,
            "placements" | "placementrule" => NodeKind::Placements,
            "placement" => NodeKind::Placement,
            "cluster" => NodeKind::Cluster,
            "deployment" => NodeKind::Deployment,
            "deploymentconfig" => NodeKind::DeploymentConfig,
            "replicaset" => NodeKind::ReplicaSet,
            "replicationcontroller" => NodeKind::ReplicationController,
            "daemonset" => NodeKind::DaemonSet,
            "statefulset" => NodeKind::StatefulSet,
            "controllerrevision" => NodeKind::ControllerRevision,
            "pod" => NodeKind::Pod,
            "service" => NodeKind::Service,
            "persistentvolumeclaim" | "pvc" => NodeKind::PersistentVolumeClaim,
            "package" => NodeKind::Package,
            "ansiblejob" => NodeKind::AnsibleJob,
            "configmap" => NodeKind::ConfigMap,
            "secret" => NodeKind::Secret,
            "namespace" => NodeKind::Namespace,
            "clusterrole" => NodeKind::ClusterRole,
            "clusterrolebinding" => NodeKind::ClusterRoleBinding,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Workload kinds that always own pods
    pub fn is_pod_workload(&self) -> bool {
        matches!(
            self,
            NodeKind::Pod
                | NodeKind::ReplicaSet
                | NodeKind::DaemonSet
                | NodeKind::StatefulSet
                | NodeKind::ReplicationController
                | NodeKind::Deployment
                | NodeKind::DeploymentConfig
                | NodeKind::ControllerRevision
        )
    }

    /// Application-model kinds that never own pods
    pub fn is_application_model(&self) -> bool {
        matches!(
            self,
            NodeKind::Application
                | NodeKind::ApplicationSet
                | NodeKind::Subscription
                | NodeKind::Placements
                | NodeKind::Placement
                | NodeKind::Cluster
        )
    }

    /// Cluster-scoped kinds whose search records are keyed by name, not namespace
    pub fn is_cluster_scoped(&self) -> bool {
        matches!(
            self,
            NodeKind::Namespace | NodeKind::ClusterRole | NodeKind::ClusterRoleBinding
        )
    }

    /// Key of this kind's search model inside node specs, e.g. `podModel`
    pub fn model_key(&self) -> String {
        format!("{}Model", self.as_str())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NodeKind::from_tag(s) {
            NodeKind::Unknown => Err("Empty node type".to_string()),
            kind => Ok(kind),
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.map(|t| NodeKind::from_tag(&t)).unwrap_or_default())
    }
}

//! Topology nodes
//!
//! Typed view of the nodes a topology builder hands to the status engine.
//! Every field is optional on the wire; absent data deserializes to empty
//! defaults so evaluation can fall back to conservative statuses.

use super::node_kind::NodeKind;
use super::pulse::PulseStatus;
use super::search::{SearchModel, lenient};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Id segment marking nodes created from an application deployable
const DEPLOYABLE_MARKER: &str = "--member--deployable--";
/// Id segment listing the clusters a node is deployed to
const CLUSTERS_MARKER: &str = "--clusters--";

static NULL: Value = Value::Null;

/// `metadata` block of a Kubernetes object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Managed cluster as reported by placement decisions or search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        rename = "ManagedClusterConditionAvailable",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition_available: Option<String>,
    #[serde(
        rename = "HubAcceptedManagedCluster",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub hub_accepted: Option<String>,
    #[serde(
        rename = "ManagedClusterJoined",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined: Option<String>,
    /// Namespace search keeps for the cluster; longer than one character when
    /// search marked the cluster offline
    #[serde(
        rename = "_clusterNamespace",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cluster_namespace: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClusterInfo {
    pub fn named(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// `name`, else `metadata.name`
    pub fn cluster_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.name.as_deref()))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
            || self.metadata.as_ref().and_then(|m| m.name.as_deref()) == Some(name)
    }

    pub fn is_available(&self) -> bool {
        self.condition_available.as_deref() == Some("True")
    }
}

/// Cluster lists arrive either as objects or as bare cluster names
fn cluster_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ClusterInfo>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Info(ClusterInfo),
    }

    let entries = Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Name(name) => ClusterInfo {
                name: Some(name),
                ..ClusterInfo::default()
            },
            Entry::Info(info) => info,
        })
        .collect())
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `clusters.specs` block of a node fanned out to several clusters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutSpecs {
    #[serde(default, deserialize_with = "cluster_list", skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub target_namespaces: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub app_clusters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterFanout {
    #[serde(default)]
    pub specs: FanoutSpecs,
}

/// ArgoCD application related to an Argo application node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedApp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_server: Option<String>,
    /// Health status (`Healthy`, `Degraded`, ...)
    #[serde(default, alias = "healthStatus", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgoStatusField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgoAppStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<ArgoStatusField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<ArgoStatusField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Value>,
}

/// Application generated by an ApplicationSet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgoApp {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: ArgoAppStatus,
}

impl ArgoApp {
    pub fn health(&self) -> Option<&str> {
        self.status.health.as_ref().and_then(|h| h.status.as_deref())
    }

    pub fn sync(&self) -> Option<&str> {
        self.status.sync.as_ref().and_then(|s| s.status.as_deref())
    }
}

/// Per-kind search models found in node specs under `<type>Model` keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTable(BTreeMap<String, SearchModel>);

impl ModelTable {
    pub fn get(&self, key: &str) -> Option<&SearchModel> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, model: SearchModel) {
        self.0.insert(key.into(), model);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct ModelTableVisitor;

impl<'de> Visitor<'de> for ModelTableVisitor {
    type Value = ModelTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("node specs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut table = ModelTable::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.ends_with("Model") {
                let model = map.next_value::<SearchModel>()?;
                table.insert(key, model);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for ModelTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ModelTableVisitor)
    }
}

impl Serialize for ModelTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, model) in &self.0 {
            map.serialize_entry(key, model)?;
        }
        map.end()
    }
}

/// `specs` bag of a topology node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpecs {
    /// Manifest fragment of the underlying resource
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub clusters_names: Vec<String>,
    #[serde(default, deserialize_with = "cluster_list", skip_serializing_if = "Vec::is_empty")]
    pub search_clusters: Vec<ClusterInfo>,
    /// Member clusters of a `cluster` node
    #[serde(default, deserialize_with = "cluster_list", skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterInfo>,
    /// Argo destination clusters of a `cluster` node
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub app_clusters: Vec<String>,
    #[serde(default)]
    pub is_design: bool,
    /// Subscription time window currently blocks deployment
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_blocked: bool,
    /// Deployable template a node was generated from
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub template: Value,
    /// Previously computed pulse; unrecognized values such as `spinner` read as none
    #[serde(default, deserialize_with = "opt_pulse", skip_serializing_if = "Option::is_none")]
    pub pulse: Option<PulseStatus>,
    #[serde(default)]
    pub has_rules: bool,
    #[serde(default)]
    pub is_placed: bool,
    #[serde(default, deserialize_with = "channel_list", skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_apps: Vec<RelatedApp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_set_apps: Vec<ArgoApp>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub resource_count: Option<i64>,
    #[serde(flatten)]
    pub models: ModelTable,
}

fn opt_pulse<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PulseStatus>, D::Error> {
    Ok(lenient::opt_text(deserializer)?.and_then(|p| p.parse().ok()))
}

/// Channels arrive as a list of names or a single comma-separated string
fn channel_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

/// One vertex of an application topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub namespace: String,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<NodeSpecs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusters: Option<ClusterFanout>,
    /// Subscription report attached by the topology builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,
}

impl ResourceNode {
    pub fn new(kind: NodeKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Node created from an application deployable rather than the application model
    pub fn is_deployable(&self) -> bool {
        self.id.contains(DEPLOYABLE_MARKER)
    }

    pub fn is_design(&self) -> bool {
        self.specs.as_ref().is_some_and(|s| s.is_design)
    }

    /// Resource manifest fragment, `null` when unknown
    pub fn raw(&self) -> &Value {
        self.specs.as_ref().map(|s| &s.raw).unwrap_or(&NULL)
    }

    /// Walk the manifest fragment along `path`
    pub fn raw_at(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self.raw(), |value, segment| value.get(segment))
            .filter(|v| !v.is_null())
    }

    pub fn raw_str(&self, path: &[&str]) -> Option<&str> {
        self.raw_at(path).and_then(|v| v.as_str())
    }

    /// `raw.apiVersion`
    pub fn api_version(&self) -> Option<&str> {
        self.raw_str(&["apiVersion"])
    }

    /// `specs.template.template`, the wrapped resource of a deployable
    pub fn template_at(&self, path: &[&str]) -> Option<&Value> {
        let template = self.specs.as_ref()?.template.get("template")?;
        path.iter()
            .try_fold(template, |value, segment| value.get(segment))
            .filter(|v| !v.is_null())
    }

    /// ArgoCD application node (not one created from a deployable)
    pub fn is_argo_app(&self) -> bool {
        self.api_version().is_some_and(|v| v.contains("argoproj.io")) && !self.is_deployable()
    }

    /// Ansible job run as a subscription hook
    pub fn is_ansible_hook(&self) -> bool {
        self.kind == NodeKind::AnsibleJob && self.raw_at(&["hookType"]).is_some()
    }

    /// Whether the resource is expected to run pods
    pub fn must_have_pods(&self) -> bool {
        if matches!(
            self.kind,
            NodeKind::Unknown | NodeKind::Application | NodeKind::Placements | NodeKind::Subscription
        ) {
            return false;
        }
        if self.kind.is_pod_workload() {
            return true;
        }
        let has_containers = self
            .raw_at(&["spec", "template", "spec", "containers"])
            .and_then(|v| v.as_array())
            .is_some_and(|c| !c.is_empty());
        let has_replicas = self.raw_at(&["spec", "replicas"]).is_some();
        let has_desired = self.raw_at(&["spec", "desired"]).is_some();
        has_containers || has_replicas || has_desired
    }

    /// Search model of this node's own kind (`<type>Model`)
    pub fn search_model(&self) -> Option<&SearchModel> {
        self.specs
            .as_ref()
            .and_then(|s| s.models.get(&self.kind.model_key()))
    }

    /// Pods found for this node
    pub fn pod_model(&self) -> Option<&SearchModel> {
        self.specs.as_ref().and_then(|s| s.models.get("podModel"))
    }

    pub fn fanout(&self) -> Option<&FanoutSpecs> {
        self.clusters.as_ref().map(|c| &c.specs)
    }

    /// Clusters listed in the node id after `--clusters--`
    pub fn id_clusters(&self) -> Vec<String> {
        let Some(start) = self.id.find(CLUSTERS_MARKER) else {
            return Vec::new();
        };
        let rest = &self.id[start + CLUSTERS_MARKER.len()..];
        let segment = rest.find("--").map_or(rest, |end| &rest[..end]);
        segment
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

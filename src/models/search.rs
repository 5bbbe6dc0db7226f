//! Search models
//!
//! A search model maps a `(resource, cluster[, namespace])` key to the search
//! records found for that resource. Topology payloads encode the key as a
//! `"<resource>-<cluster>[-<namespace>]"` string; it is split back into a
//! [`SearchKey`] on load so lookups never depend on string concatenation.
//! Entry order follows the input document.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Lenient field decoders shared by the topology models
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Count given as a JSON number or a numeric string
    pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }))
    }

    /// Text given as a string, boolean or number
    pub fn opt_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    /// String where `null` means empty
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(opt_text(deserializer)?.unwrap_or_default())
    }
}

/// One search result describing a resource on a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub apiversion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub apigroup: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub desired: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub ready: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub restarts: Option<i64>,

    #[serde(
        rename = "hostIP",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub host_ip: Option<String>,
    #[serde(
        rename = "podIP",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pod_ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(
        rename = "clusterIP",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cluster_ip: Option<String>,
    /// Service ports as search prints them, e.g. `8080:31000/TCP`
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// `"true"` when a hub subscription places itself on the local cluster
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub local_placement: Option<String>,
    #[serde(
        rename = "_hubClusterResource",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub hub_cluster_resource: Option<String>,

    /// Any other search attributes, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchRecord {
    /// Whether search flagged this record as living on the hub cluster
    pub fn is_hub_resource(&self) -> bool {
        matches!(
            self.hub_cluster_resource.as_deref(),
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("false")
        )
    }

    /// Replicas known to be up: `available`, else `ready`, else `current`
    pub fn available_count(&self) -> Option<i64> {
        self.available.or(self.ready).or(self.current)
    }
}

/// Composite key of a search model entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchKey {
    pub resource: String,
    pub cluster: Option<String>,
    pub namespace: Option<String>,
}

impl SearchKey {
    pub fn new(resource: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            cluster: Some(cluster.into()),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Split a `"<resource>-<cluster>[-<namespace>]"` string using the known
    /// cluster names. Longer cluster names win. Keys naming no known cluster
    /// keep the whole string as the resource.
    pub fn parse<S: AsRef<str>>(raw: &str, clusters: &[S]) -> Self {
        let mut candidates: Vec<&str> = clusters
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| !c.is_empty())
            .collect();
        candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

        for cluster in &candidates {
            let suffix = format!("-{}", cluster);
            if let Some(resource) = raw.strip_suffix(suffix.as_str()) {
                if !resource.is_empty() {
                    return Self {
                        resource: resource.to_string(),
                        cluster: Some(cluster.to_string()),
                        namespace: None,
                    };
                }
            }
        }

        for cluster in &candidates {
            let infix = format!("-{}-", cluster);
            if let Some(pos) = raw.rfind(infix.as_str()) {
                if pos > 0 {
                    let namespace = &raw[pos + infix.len()..];
                    return Self {
                        resource: raw[..pos].to_string(),
                        cluster: Some(cluster.to_string()),
                        namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
                    };
                }
            }
        }

        Self {
            resource: raw.to_string(),
            cluster: None,
            namespace: None,
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        if let Some(cluster) = &self.cluster {
            write!(f, "-{}", cluster)?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "-{}", namespace)?;
        }
        Ok(())
    }
}

/// One key of a search model with its records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchEntry {
    pub key: SearchKey,
    pub records: Vec<SearchRecord>,
}

/// Search record with its cluster and namespace resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord<'a> {
    pub key: &'a SearchKey,
    pub cluster: String,
    pub namespace: String,
    pub record: &'a SearchRecord,
}

impl ResolvedRecord<'_> {
    /// Record name, falling back to the key's resource name
    pub fn name(&self) -> &str {
        self.record.name.as_deref().unwrap_or(&self.key.resource)
    }
}

/// Ordered per-cluster index of search records for one resource kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchModel {
    entries: Vec<SearchEntry>,
}

impl SearchModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records under a key, merging into an existing equal key
    pub fn insert(&mut self, key: SearchKey, records: Vec<SearchRecord>) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.records.extend(records),
            None => self.entries.push(SearchEntry { key, records }),
        }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records in entry order
    pub fn records(&self) -> impl Iterator<Item = &SearchRecord> {
        self.entries.iter().flat_map(|e| e.records.iter())
    }

    pub fn first_record(&self) -> Option<&SearchRecord> {
        self.records().next()
    }

    /// Resolve the cluster and namespace of every record.
    ///
    /// A record's own `cluster` wins; otherwise the key's cluster is used,
    /// re-reading the key against `clusters` when it could not be split on
    /// load. Namespace falls back to the key's, then to `default_namespace`.
    pub fn resolve<S: AsRef<str>>(
        &self,
        clusters: &[S],
        default_namespace: &str,
    ) -> Vec<ResolvedRecord<'_>> {
        let mut resolved = Vec::new();
        for entry in &self.entries {
            let reparsed;
            let key_cluster = match &entry.key.cluster {
                Some(cluster) => Some(cluster.as_str()),
                None => {
                    reparsed = SearchKey::parse(&entry.key.resource, clusters);
                    reparsed.cluster.as_deref()
                }
            };
            for record in &entry.records {
                let cluster = record
                    .cluster
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .or(key_cluster)
                    .unwrap_or_default();
                let namespace = record
                    .namespace
                    .as_deref()
                    .or(entry.key.namespace.as_deref())
                    .unwrap_or(default_namespace);
                resolved.push(ResolvedRecord {
                    key: &entry.key,
                    cluster: cluster.to_string(),
                    namespace: namespace.to_string(),
                    record,
                });
            }
        }
        resolved
    }
}

/// Search payloads carry either one record or a list of records per key
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<SearchRecord>),
    One(SearchRecord),
}

impl From<OneOrMany> for Vec<SearchRecord> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![record],
        }
    }
}

struct SearchModelVisitor;

impl<'de> Visitor<'de> for SearchModelVisitor {
    type Value = SearchModel;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of search keys to records, or a list of records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut model = SearchModel::new();
        while let Some(raw) = map.next_key::<String>()? {
            let records: Vec<SearchRecord> = map.next_value::<OneOrMany>()?.into();
            let clusters: Vec<&str> = records.iter().filter_map(|r| r.cluster.as_deref()).collect();
            let key = SearchKey::parse(&raw, &clusters);
            model.insert(key, records);
        }
        Ok(model)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut model = SearchModel::new();
        while let Some(record) = seq.next_element::<SearchRecord>()? {
            let key = SearchKey {
                resource: record.name.clone().unwrap_or_default(),
                cluster: record.cluster.clone(),
                namespace: None,
            };
            model.insert(key, vec![record]);
        }
        Ok(model)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SearchModel::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SearchModel::new())
    }
}

impl<'de> Deserialize<'de> for SearchModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SearchModelVisitor)
    }
}

impl Serialize for SearchModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key.to_string(), &entry.records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_with_cluster_suffix() {
        let key = SearchKey::parse("mortgage-app-deploy-feng", &["feng"]);
        assert_eq!(key.resource, "mortgage-app-deploy");
        assert_eq!(key.cluster.as_deref(), Some("feng"));
        assert_eq!(key.namespace, None);
    }

    #[test]
    fn test_parse_key_with_namespace() {
        let key = SearchKey::parse("web-braveman-default", &["braveman"]);
        assert_eq!(key, SearchKey::new("web", "braveman").with_namespace("default"));
        assert_eq!(key.to_string(), "web-braveman-default");
    }

    #[test]
    fn test_parse_prefers_longest_cluster() {
        let key = SearchKey::parse("app-local-cluster", &["cluster", "local-cluster"]);
        assert_eq!(key.resource, "app");
        assert_eq!(key.cluster.as_deref(), Some("local-cluster"));
    }

    #[test]
    fn test_parse_unknown_cluster_keeps_raw() {
        let key = SearchKey::parse("x-feng", &[] as &[&str]);
        assert_eq!(key.resource, "x-feng");
        assert_eq!(key.cluster, None);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let model: SearchModel = serde_json::from_str(
            r#"{
                "zeta-c1": [{"cluster": "c1", "name": "zeta"}],
                "alpha-c2": {"cluster": "c2", "name": "alpha"}
            }"#,
        )
        .unwrap();
        let names: Vec<_> = model.entries().iter().map(|e| e.key.resource.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(model.entries()[1].key.cluster.as_deref(), Some("c2"));
    }

    #[test]
    fn test_empty_array_is_empty_model() {
        let model: SearchModel = serde_json::from_value(json!([])).unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_resolve_uses_key_cluster_when_record_has_none() {
        let model: SearchModel =
            serde_json::from_value(json!({"x-feng": [{"ready": 3, "desired": 3}]})).unwrap();
        let resolved = model.resolve(&["feng"], "default");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].cluster, "feng");
        assert_eq!(resolved[0].namespace, "default");
        assert_eq!(resolved[0].name(), "x");
    }

    #[test]
    fn test_counts_accept_strings() {
        let record: SearchRecord =
            serde_json::from_value(json!({"desired": "3", "ready": 2, "restarts": null})).unwrap();
        assert_eq!(record.desired, Some(3));
        assert_eq!(record.available_count(), Some(2));
        assert_eq!(record.restarts, None);
    }

    #[test]
    fn test_hub_resource_flag() {
        let record: SearchRecord =
            serde_json::from_value(json!({"_hubClusterResource": true})).unwrap();
        assert!(record.is_hub_resource());
        let record: SearchRecord = serde_json::from_value(json!({"kind": "pod"})).unwrap();
        assert!(!record.is_hub_resource());
    }
}

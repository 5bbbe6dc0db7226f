//! Topology documents
//!
//! A topology document is the node list of one application topology, as the
//! console receives it, saved as JSON or YAML:
//!
//! ```yaml
//! hubClusterName: local-cluster   # optional
//! nodes:
//!   - id: member--deployment--helloworld
//!     type: deployment
//!     name: helloworld
//!     specs: { ... }
//! ```

use crate::models::ResourceNode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Topology loading errors
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Failed to read topology file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON topology: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML topology: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported topology format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Serialization of a topology document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> TopologyResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(TopologyError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Nodes of one application topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDocument {
    /// Hub cluster the topology was captured from; wins over configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_cluster_name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<ResourceNode>,
}

impl TopologyDocument {
    /// Load a document, picking the format from the file extension
    pub fn load(path: &Path) -> TopologyResult<Self> {
        let format = DocumentFormat::from_path(path)?;
        tracing::debug!("Loading topology from: {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| TopologyError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::parse(&contents, format)?;
        tracing::debug!(nodes = document.nodes.len(), "topology loaded");
        Ok(document)
    }

    pub fn parse(contents: &str, format: DocumentFormat) -> TopologyResult<Self> {
        Ok(match format {
            DocumentFormat::Json => serde_json::from_str(contents)?,
            DocumentFormat::Yaml => serde_yaml::from_str(contents)?,
        })
    }

    /// Node whose id matches, else the first node with that name
    pub fn find_node(&self, id_or_name: &str) -> Option<&ResourceNode> {
        self.nodes
            .iter()
            .find(|n| n.id == id_or_name)
            .or_else(|| self.nodes.iter().find(|n| n.name == id_or_name))
    }
}

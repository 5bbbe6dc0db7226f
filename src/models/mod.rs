//! Fleetpulse Model Layer
//!
//! Typed views of topology payloads and of the rows the detail panel renders.
//!
//! Structure:
//! - `node_kind.rs` - Node type tags
//! - `pulse.rs` - Pulse colors and status tags
//! - `search.rs` - Search models keyed by resource and cluster
//! - `node.rs` - Topology nodes and their specs
//! - `detail.rs` - Detail-panel rows

pub mod detail;
pub mod node;
pub mod node_kind;
pub mod pulse;
pub mod search;

pub use detail::{
    ClusterComboboxData, DetailRow, LabelRow, LinkAction, LinkData, LinkRow, LinkValue,
    RelatedArgoAppsData,
};
pub use node::{
    ArgoApp, ClusterFanout, ClusterInfo, FanoutSpecs, NodeSpecs, ObjectMeta, RelatedApp,
    ResourceNode,
};
pub use node_kind::NodeKind;
pub use pulse::{PulseStatus, StatusTag};
pub use search::{ResolvedRecord, SearchEntry, SearchKey, SearchModel, SearchRecord};

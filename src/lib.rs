//! fleetpulse library
//!
//! Computes the health pulse of multi-cluster application topology nodes and
//! builds the rows of their detail panels. The binary is a thin driver over
//! this library; everything it prints can be produced from here.

pub mod config;
pub mod details;
pub mod models;
pub mod render;
pub mod status;
pub mod topology;

// Re-export commonly used types for convenience
pub use details::{ActiveFilters, DetailContext, Translator, node_details};
pub use models::{DetailRow, NodeKind, PulseStatus, ResourceNode, StatusTag};
pub use status::{StatusContext, compute_node_status};
pub use topology::{TopologyDocument, TopologyError};

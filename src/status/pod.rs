//! Per-pod state classifier and the status keyword sets

use crate::models::SearchRecord;

/// Statuses counted as failed
pub const ERROR_STATES: &[&str] = &[
    "err",
    "off",
    "invalid",
    "kill",
    "propagationfailed",
    "imagepullbackoff",
    "crashloopbackoff",
    "lost",
    "failed",
];

/// Statuses counted as in progress
pub const WARNING_STATES: &[&str] = &["pending", "creating", "terminating"];

/// Statuses counted as running or deployed
pub const SUCCESS_STATES: &[&str] = &["run", "bound", "deployed", "created", "propagated"];

/// Placeholder statuses of resources missing from a target namespace
pub const NOT_DEPLOYED_STATES: &[&str] = &["not deployed", "not created"];

/// Locate a pod's status in ordered keyword buckets.
///
/// Returns the 1-based index of the first bucket holding a keyword contained
/// in the lower-cased status, or `0` when nothing matches or the pod runs on
/// a cluster other than `cluster`.
pub fn get_pod_state(record: &SearchRecord, cluster: Option<&str>, buckets: &[&[&str]]) -> usize {
    if let Some(cluster) = cluster {
        if record.cluster.as_deref().unwrap_or("unknown") != cluster {
            return 0;
        }
    }
    let status = record
        .status
        .as_deref()
        .unwrap_or("unknown")
        .to_lowercase();
    buckets
        .iter()
        .position(|bucket| bucket.iter().any(|keyword| status.contains(keyword)))
        .map_or(0, |index| index + 1)
}

/// Whether the pod matches `bucket` on `cluster`
pub fn pod_in(record: &SearchRecord, cluster: Option<&str>, bucket: &[&str]) -> bool {
    get_pod_state(record, cluster, &[bucket]) == 1
}

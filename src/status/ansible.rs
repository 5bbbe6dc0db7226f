//! Ansible job classifier

use crate::models::{PulseStatus, ResourceNode};
use serde_json::Value;

/// Status block of an Ansible job: `raw.status`, else `raw.spec`
pub fn job_status_block(node: &ResourceNode) -> Option<&Value> {
    node.raw_at(&["status"]).or_else(|| node.raw_at(&["spec"]))
}

/// `ansibleJobResult.status` of the job, if reported
pub fn job_result(node: &ResourceNode) -> Option<&str> {
    job_status_block(node)
        .and_then(|block| block.get("ansibleJobResult"))
        .and_then(|result| result.get("status"))
        .and_then(Value::as_str)
}

/// First condition of the job's status block
pub fn job_condition(node: &ResourceNode) -> Option<&Value> {
    job_status_block(node)
        .and_then(|block| block.get("conditions"))
        .and_then(Value::as_array)
        .and_then(|conditions| conditions.first())
}

fn condition_failed(condition: &Value) -> bool {
    condition
        .get("reason")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .is_some_and(|reason| reason.contains("fail") || reason.contains("error"))
}

/// Pulse of an Ansible job node
pub fn get_pulse_status_for_ansible_node(node: &ResourceNode) -> PulseStatus {
    if let Some(result) = job_result(node) {
        return match result.to_lowercase().as_str() {
            "successful" => PulseStatus::Green,
            "failed" | "error" | "canceled" => PulseStatus::Red,
            _ => PulseStatus::Yellow,
        };
    }
    if job_condition(node).is_some_and(condition_failed) {
        return PulseStatus::Red;
    }
    match node.search_model() {
        Some(model) if !model.is_empty() => PulseStatus::Yellow,
        _ => PulseStatus::Orange,
    }
}

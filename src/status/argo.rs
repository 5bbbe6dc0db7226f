//! Argo CD application and ApplicationSet classifiers

use crate::models::{PulseStatus, ResourceNode};
use tracing::trace;

pub const HEALTHY: &str = "Healthy";
pub const PROGRESSING: &str = "Progressing";
pub const SUSPENDED: &str = "Suspended";
pub const DEGRADED: &str = "Degraded";
pub const MISSING: &str = "Missing";
pub const UNKNOWN: &str = "Unknown";

/// Classify an Argo health status together with its sync status
pub fn argo_health_pulse(health: Option<&str>, sync: Option<&str>) -> PulseStatus {
    match health.unwrap_or(UNKNOWN) {
        HEALTHY => match sync {
            Some("OutOfSync") | Some("Syncing") => PulseStatus::Yellow,
            _ => PulseStatus::Green,
        },
        PROGRESSING => PulseStatus::Yellow,
        SUSPENDED => PulseStatus::Orange,
        DEGRADED | MISSING => PulseStatus::Red,
        _ => PulseStatus::Yellow,
    }
}

/// Pulse of an Argo application node and its related applications
pub fn get_pulse_status_for_argo_app(node: &ResourceNode) -> PulseStatus {
    let own = match node.raw_at(&["status"]) {
        None => PulseStatus::Green,
        Some(_) => argo_health_pulse(
            node.raw_str(&["status", "health", "status"]),
            node.raw_str(&["status", "sync", "status"]),
        ),
    };

    let related = node
        .specs
        .iter()
        .flat_map(|s| s.related_apps.iter())
        .map(|app| argo_health_pulse(app.status.as_deref(), app.sync_status.as_deref()));

    let pulse = PulseStatus::worst_of(related).map_or(own, |r| own.worst(r));
    trace!(node = %node.name, %pulse, "argo application classified");
    pulse
}

/// Pulse of an ApplicationSet node from the applications it generated
pub fn get_pulse_status_for_app_set(node: &ResourceNode) -> PulseStatus {
    let apps = node
        .specs
        .as_ref()
        .map(|s| s.app_set_apps.as_slice())
        .unwrap_or(&[]);

    let pulse = PulseStatus::worst_of(apps.iter().map(|app| {
        let pulse = argo_health_pulse(app.health(), app.sync());
        if app.status.conditions.is_empty() {
            pulse
        } else {
            pulse.worst(PulseStatus::Yellow)
        }
    }))
    .unwrap_or(PulseStatus::Red);

    trace!(node = %node.name, apps = apps.len(), %pulse, "application set classified");
    pulse
}

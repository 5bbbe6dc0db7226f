//! Replica-count classifier

use crate::models::PulseStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a resource scaled to zero replicas is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDesiredPolicy {
    /// Still converging: `yellow`
    #[default]
    Settling,
    /// Intentionally scaled down: `green`
    Settled,
}

impl ZeroDesiredPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroDesiredPolicy::Settling => "settling",
            ZeroDesiredPolicy::Settled => "settled",
        }
    }
}

impl fmt::Display for ZeroDesiredPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ZeroDesiredPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "settling" => Ok(ZeroDesiredPolicy::Settling),
            "settled" => Ok(ZeroDesiredPolicy::Settled),
            _ => Err(format!(
                "Invalid zero desired policy: {}. Must be one of: settling, settled",
                s
            )),
        }
    }
}

/// Classify replica counts.
///
/// `desired` is `None` when no record reported it.
pub fn get_pulse_for_data(
    available: i64,
    desired: Option<i64>,
    pods_unavailable: i64,
    policy: ZeroDesiredPolicy,
) -> PulseStatus {
    if pods_unavailable > 0 {
        return PulseStatus::Red;
    }
    match desired {
        Some(desired) if available < desired => PulseStatus::Yellow,
        Some(desired) if desired <= 0 => match policy {
            ZeroDesiredPolicy::Settling => PulseStatus::Yellow,
            ZeroDesiredPolicy::Settled => PulseStatus::Green,
        },
        Some(_) => PulseStatus::Green,
        None if available == 0 => PulseStatus::Orange,
        None => PulseStatus::Green,
    }
}

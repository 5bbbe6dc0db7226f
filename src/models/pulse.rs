//! Pulse colors and detail status tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health color computed for a topology node
///
/// Variants are declared from best to worst so the derived `Ord` matches the
/// aggregation order: `red > orange > yellow > green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseStatus {
    /// Healthy or deployed
    Green,
    /// In progress, partially available or not yet placed
    Yellow,
    /// Expected but no corroborating data found
    Orange,
    /// Failed, crashed, offline or in error
    Red,
}

impl PulseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PulseStatus::Green => "green",
            PulseStatus::Yellow => "yellow",
            PulseStatus::Orange => "orange",
            PulseStatus::Red => "red",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            PulseStatus::Green,
            PulseStatus::Yellow,
            PulseStatus::Orange,
            PulseStatus::Red,
        ]
    }

    /// The more severe of two pulses
    pub fn worst(self, other: PulseStatus) -> PulseStatus {
        self.max(other)
    }

    /// Most severe pulse of an iterator, `None` when empty
    pub fn worst_of<I: IntoIterator<Item = PulseStatus>>(pulses: I) -> Option<PulseStatus> {
        pulses.into_iter().max()
    }

    /// Detail-row tag shown for a row classified with this pulse
    pub fn tag(&self) -> StatusTag {
        match self {
            PulseStatus::Green => StatusTag::Checkmark,
            PulseStatus::Yellow => StatusTag::Warning,
            PulseStatus::Orange => StatusTag::Pending,
            PulseStatus::Red => StatusTag::Failure,
        }
    }
}

impl fmt::Display for PulseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PulseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(PulseStatus::Green),
            "yellow" => Ok(PulseStatus::Yellow),
            "orange" => Ok(PulseStatus::Orange),
            "red" => Ok(PulseStatus::Red),
            _ => Err(format!("Unknown pulse status: {}", s)),
        }
    }
}

/// Status icon attached to a detail-panel row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTag {
    Checkmark,
    Warning,
    Pending,
    Failure,
}

impl StatusTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::Checkmark => "checkmark",
            StatusTag::Warning => "warning",
            StatusTag::Pending => "pending",
            StatusTag::Failure => "failure",
        }
    }

    /// Numeric code used by the console: failure 0, pending 1, warning 2, checkmark 3
    pub fn code(&self) -> u8 {
        match self {
            StatusTag::Failure => 0,
            StatusTag::Pending => 1,
            StatusTag::Warning => 2,
            StatusTag::Checkmark => 3,
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Output rendering for the command line
//!
//! Text output is one line per node or row; JSON and YAML serialize the same
//! values the library returns.

use crate::config::{OutputFormat, Palette};
use crate::models::{DetailRow, NodeKind, PulseStatus, ResourceNode, StatusTag};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use std::fmt::Write;

/// Pulse of one topology node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatus {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub pulse: PulseStatus,
}

impl NodeStatus {
    pub fn new(node: &ResourceNode, pulse: PulseStatus) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.clone(),
            pulse,
        }
    }
}

/// Text styling
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStyle {
    pub color: bool,
    pub palette: Palette,
}

impl TextStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    fn paint(&self, text: String, pulse: PulseStatus) -> String {
        if self.color {
            text.with(self.palette.color(pulse)).to_string()
        } else {
            text
        }
    }
}

/// Pulse whose color a status tag is shown in
fn tag_pulse(tag: StatusTag) -> PulseStatus {
    match tag {
        StatusTag::Checkmark => PulseStatus::Green,
        StatusTag::Warning => PulseStatus::Yellow,
        StatusTag::Pending => PulseStatus::Orange,
        StatusTag::Failure => PulseStatus::Red,
    }
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).context("Failed to serialize output to YAML")
        }
        OutputFormat::Text => Err(anyhow::anyhow!("text output is not a serialization")),
    }
}

/// Render node pulses
pub fn render_statuses(
    statuses: &[NodeStatus],
    format: OutputFormat,
    style: &TextStyle,
) -> Result<String> {
    if format != OutputFormat::Text {
        return serialize(statuses, format);
    }

    let kind_width = statuses
        .iter()
        .map(|s| s.kind.as_str().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for status in statuses {
        let pulse = style.paint(format!("{:<6}", status.pulse.as_str()), status.pulse);
        let name = if status.name.is_empty() {
            status.id.as_str()
        } else {
            status.name.as_str()
        };
        let _ = writeln!(
            out,
            "{} {:<width$} {}",
            pulse,
            status.kind.as_str(),
            name,
            width = kind_width
        );
    }
    Ok(out)
}

/// Render detail-panel rows
pub fn render_details(rows: &[DetailRow], format: OutputFormat, style: &TextStyle) -> Result<String> {
    if format != OutputFormat::Text {
        return serialize(rows, format);
    }

    let mut out = String::new();
    for row in rows {
        match row {
            DetailRow::Spacer => out.push('\n'),
            DetailRow::Label(label) => {
                let indent = if label.indent { "  " } else { "" };
                let tag = label
                    .status
                    .map(|tag| format!("{} ", style.paint(format!("[{}]", tag), tag_pulse(tag))))
                    .unwrap_or_default();
                match &label.value {
                    Some(value) => {
                        let _ = writeln!(out, "{indent}{tag}{}: {value}", label.label_value);
                    }
                    None => {
                        let _ = writeln!(out, "{indent}{tag}{}", label.label_value);
                    }
                }
            }
            DetailRow::Link(link) => {
                let indent = if link.indent { "  " } else { "" };
                let data = &link.value.data;
                let target = data
                    .edit_link
                    .as_deref()
                    .or(data.target_link.as_deref())
                    .or(data.name.as_deref())
                    .unwrap_or("");
                let _ = writeln!(out, "{indent}-> {} ({})", link.value.label, target);
            }
            DetailRow::RelatedArgoAppDetails { relatedargoappsdata } => {
                for app in &relatedargoappsdata.argo_app_list {
                    let _ = writeln!(
                        out,
                        "  {} ({})",
                        app.name.as_deref().unwrap_or("-"),
                        app.status.as_deref().unwrap_or("Unknown")
                    );
                }
            }
            DetailRow::ClusterDetailCombobox { comboboxdata } => {
                let names: Vec<&str> = comboboxdata
                    .cluster_list
                    .iter()
                    .filter_map(|c| c.cluster_name())
                    .collect();
                let _ = writeln!(out, "Clusters: {}", names.join(", "));
            }
        }
    }
    Ok(out)
}

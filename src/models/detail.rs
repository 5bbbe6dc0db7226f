//! Detail-panel rows
//!
//! Rows are rendered top to bottom in the order builders emit them.

use super::node::{ClusterInfo, RelatedApp};
use super::pulse::StatusTag;
use super::search::SearchRecord;
use serde::{Deserialize, Serialize};

/// Action a link row triggers in the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAction {
    ShowResourceYaml,
    OpenLink,
    OpenArgoEditor,
    OpenRouteUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRow {
    pub label_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusTag>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    pub action: LinkAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Route record the console resolves to a URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_object: Option<SearchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkValue {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data: LinkData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRow {
    pub value: LinkValue,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedArgoAppsData {
    pub argo_app_list: Vec<RelatedApp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterComboboxData {
    #[serde(rename = "clusterList")]
    pub cluster_list: Vec<ClusterInfo>,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
}

/// One line of a node's side panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetailRow {
    Label(LabelRow),
    Spacer,
    Link(LinkRow),
    #[serde(rename = "relatedargoappdetails")]
    RelatedArgoAppDetails { relatedargoappsdata: RelatedArgoAppsData },
    #[serde(rename = "clusterdetailcombobox")]
    ClusterDetailCombobox { comboboxdata: ClusterComboboxData },
}

impl DetailRow {
    /// Section header without a value
    pub fn header(label: impl Into<String>) -> Self {
        DetailRow::Label(LabelRow {
            label_value: label.into(),
            value: None,
            status: None,
            indent: false,
        })
    }

    /// `label: value` row
    pub fn property(label: impl Into<String>, value: impl Into<String>) -> Self {
        DetailRow::Label(LabelRow {
            label_value: label.into(),
            value: Some(value.into()),
            status: None,
            indent: false,
        })
    }

    /// `label: value` row with a status icon
    pub fn status(label: impl Into<String>, value: impl Into<String>, status: StatusTag) -> Self {
        DetailRow::Label(LabelRow {
            label_value: label.into(),
            value: Some(value.into()),
            status: Some(status),
            indent: false,
        })
    }

    pub fn link(label: impl Into<String>, data: LinkData) -> Self {
        DetailRow::Link(LinkRow {
            value: LinkValue {
                label: label.into(),
                id: None,
                data,
            },
            indent: false,
        })
    }

    /// Set the link id; no effect on other rows
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        if let DetailRow::Link(link) = &mut self {
            link.value.id = Some(id.into());
        }
        self
    }

    pub fn indented(mut self) -> Self {
        match &mut self {
            DetailRow::Label(label) => label.indent = true,
            DetailRow::Link(link) => link.indent = true,
            _ => {}
        }
        self
    }

    /// Status icon of a label row
    pub fn status_tag(&self) -> Option<StatusTag> {
        match self {
            DetailRow::Label(label) => label.status,
            _ => None,
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, DetailRow::Spacer)
    }
}

impl LinkData {
    pub fn new(action: LinkAction) -> Self {
        Self {
            action,
            edit_link: None,
            target_link: None,
            cluster: None,
            name: None,
            namespace: None,
            route_object: None,
        }
    }

    /// `show_resource_yaml` link for one resource
    pub fn resource_yaml(cluster: Option<String>, edit_link: String) -> Self {
        Self {
            cluster,
            edit_link: Some(edit_link),
            ..Self::new(LinkAction::ShowResourceYaml)
        }
    }

    /// `open_link` to another console page
    pub fn open(target_link: String) -> Self {
        Self {
            target_link: Some(target_link),
            ..Self::new(LinkAction::OpenLink)
        }
    }

    /// Route URL launch for a route whose host is only known to the cluster
    pub fn route_url(route: SearchRecord) -> Self {
        Self {
            cluster: route.cluster.clone(),
            route_object: Some(route),
            ..Self::new(LinkAction::OpenRouteUrl)
        }
    }
}

//! Detail-panel builders
//!
//! Each builder appends the rows it owns for one node kind and ignores other
//! nodes. [`node_details`] runs all of them in panel order. Builders are pure:
//! the hub cluster, translator and reference time all come from the
//! [`DetailContext`].

pub mod age;
pub mod application;
pub mod cluster;
pub mod links;
pub mod placement;
pub mod pod;
pub mod resource;
pub mod subscription;

mod location;
mod missing;

pub use age::get_age;
pub use application::{set_app_set_deploy_status, set_application_deploy_status};
pub use cluster::set_cluster_status;
pub use placement::{set_placement_deploy_status, set_placement_rule_deploy_status};
pub use pod::set_pod_deploy_status;
pub use resource::set_resource_deploy_status;
pub use subscription::set_subscription_deploy_status;

use crate::models::{DetailRow, PulseStatus, ResourceNode, StatusTag};
use crate::status::{DEFAULT_HUB_CLUSTER, StatusContext, ZeroDesiredPolicy};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Label translation
///
/// Keys are English labels or message ids; `{{n}}` placeholders refer to
/// `args[n]`.
pub trait Translator {
    fn t(&self, key: &str, args: &[String]) -> String;
}

/// Returns keys untouched, placeholders included
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn t(&self, key: &str, _args: &[String]) -> String {
        key.to_string()
    }
}

/// Substitutes `{{n}}` placeholders with their arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolatingTranslator;

impl Translator for InterpolatingTranslator {
    fn t(&self, key: &str, args: &[String]) -> String {
        args.iter()
            .enumerate()
            .fold(key.to_string(), |text, (index, arg)| {
                text.replace(&format!("{{{{{}}}}}", index), arg)
            })
    }
}

/// Pulses selected in the console's status filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub resource_statuses: BTreeSet<PulseStatus>,
}

impl ActiveFilters {
    pub fn new<I: IntoIterator<Item = PulseStatus>>(pulses: I) -> Self {
        Self {
            resource_statuses: pulses.into_iter().collect(),
        }
    }

    /// Filter selecting every pulse
    pub fn all() -> Self {
        Self::new(PulseStatus::all().iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.resource_statuses.is_empty()
    }

    pub fn admits_pulse(&self, pulse: PulseStatus) -> bool {
        self.is_empty() || self.resource_statuses.contains(&pulse)
    }

    /// Whether a row with `tag` is shown. Warning and pending rows are both
    /// in-progress states and show under a yellow or an orange filter.
    pub fn admits(&self, tag: StatusTag) -> bool {
        match tag {
            StatusTag::Checkmark => self.admits_pulse(PulseStatus::Green),
            StatusTag::Failure => self.admits_pulse(PulseStatus::Red),
            StatusTag::Warning | StatusTag::Pending => {
                self.admits_pulse(PulseStatus::Yellow) || self.admits_pulse(PulseStatus::Orange)
            }
        }
    }
}

/// Inputs shared by all builders
pub struct DetailContext<'a> {
    pub hub_cluster: String,
    pub translator: &'a dyn Translator,
    /// Reference time for relative ages
    pub now: DateTime<Utc>,
    pub zero_desired: ZeroDesiredPolicy,
}

impl<'a> DetailContext<'a> {
    pub fn new(translator: &'a dyn Translator, now: DateTime<Utc>) -> Self {
        Self {
            hub_cluster: DEFAULT_HUB_CLUSTER.to_string(),
            translator,
            now,
            zero_desired: ZeroDesiredPolicy::default(),
        }
    }

    pub fn with_hub_cluster(mut self, hub_cluster: impl Into<String>) -> Self {
        self.hub_cluster = hub_cluster.into();
        self
    }

    pub fn with_zero_desired(mut self, policy: ZeroDesiredPolicy) -> Self {
        self.zero_desired = policy;
        self
    }

    /// Translate a key without arguments
    pub fn t(&self, key: &str) -> String {
        self.translator.t(key, &[])
    }

    pub fn t_args(&self, key: &str, args: &[&str]) -> String {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.translator.t(key, &args)
    }

    pub fn status_context(&self) -> StatusContext {
        StatusContext::new(self.hub_cluster.clone()).with_zero_desired(self.zero_desired)
    }
}

/// Row list that drops status rows the active filters hide
pub(crate) struct Rows<'f> {
    rows: Vec<DetailRow>,
    filters: &'f ActiveFilters,
}

impl<'f> Rows<'f> {
    pub(crate) fn new(filters: &'f ActiveFilters) -> Self {
        Self {
            rows: Vec::new(),
            filters,
        }
    }

    /// Append `row`; returns false when the filters hid it
    pub(crate) fn push(&mut self, row: DetailRow) -> bool {
        if let Some(tag) = row.status_tag() {
            if !self.filters.admits(tag) {
                return false;
            }
        }
        self.rows.push(row);
        true
    }

    /// Append `row` whatever the filters select
    pub(crate) fn push_always(&mut self, row: DetailRow) {
        self.rows.push(row);
    }

    pub(crate) fn spacer(&mut self) {
        self.rows.push(DetailRow::Spacer);
    }

    pub(crate) fn filters(&self) -> &ActiveFilters {
        self.filters
    }

    pub(crate) fn into_rows(self) -> Vec<DetailRow> {
        self.rows
    }
}

/// All detail rows of a node, in panel order
pub fn node_details(
    node: &ResourceNode,
    filters: &ActiveFilters,
    ctx: &DetailContext<'_>,
) -> Vec<DetailRow> {
    let mut rows = Vec::new();
    rows.extend(set_subscription_deploy_status(node, filters, ctx));
    rows.extend(set_placement_rule_deploy_status(node, filters, ctx));
    rows.extend(set_placement_deploy_status(node, filters, ctx));
    rows.extend(set_application_deploy_status(node, filters, ctx));
    rows.extend(set_cluster_status(node, ctx));
    rows.extend(set_pod_deploy_status(node, filters, ctx));
    rows.extend(set_resource_deploy_status(node, filters, ctx));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_translator_keeps_placeholders() {
        let t = IdentityTranslator;
        assert_eq!(t.t("Pod details for {{0}}", &["feng".into()]), "Pod details for {{0}}");
    }

    #[test]
    fn test_interpolating_translator() {
        let t = InterpolatingTranslator;
        assert_eq!(
            t.t("{{0}} of {{1}}", &["1".into(), "3".into()]),
            "1 of 3"
        );
    }

    #[test]
    fn test_filter_admission() {
        let empty = ActiveFilters::default();
        assert!(empty.admits(StatusTag::Failure));

        let green = ActiveFilters::new([PulseStatus::Green]);
        assert!(green.admits(StatusTag::Checkmark));
        assert!(!green.admits(StatusTag::Warning));
        assert!(!green.admits(StatusTag::Failure));

        let yellow = ActiveFilters::new([PulseStatus::Yellow]);
        assert!(yellow.admits(StatusTag::Pending));
        assert!(yellow.admits(StatusTag::Warning));

        let all = ActiveFilters::all();
        for tag in [StatusTag::Checkmark, StatusTag::Warning, StatusTag::Pending, StatusTag::Failure] {
            assert!(all.admits(tag));
        }
    }

    #[test]
    fn test_rows_keep_unstatused_rows() {
        let filters = ActiveFilters::new([PulseStatus::Red]);
        let mut rows = Rows::new(&filters);
        assert!(rows.push(DetailRow::header("Cluster deploy status")));
        assert!(!rows.push(DetailRow::status("ns", "Deployed", StatusTag::Checkmark)));
        rows.spacer();
        assert_eq!(rows.into_rows().len(), 2);
    }

    #[test]
    fn test_rows_push_always_ignores_filters() {
        let filters = ActiveFilters::new([PulseStatus::Red]);
        let mut rows = Rows::new(&filters);
        rows.push_always(DetailRow::status("job", "pending", StatusTag::Pending));
        assert_eq!(
            rows.into_rows(),
            vec![DetailRow::status("job", "pending", StatusTag::Pending)]
        );
    }
}

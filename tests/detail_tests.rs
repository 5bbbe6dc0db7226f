//! Detail panel tests
//!
//! Builds detail rows for whole nodes and checks translation, status
//! filtering and the row sequences the console relies on.

use chrono::{DateTime, TimeZone, Utc};
use fleetpulse::details::{
    ActiveFilters, DetailContext, IdentityTranslator, InterpolatingTranslator, Translator,
    node_details, set_cluster_status, set_subscription_deploy_status,
};
use fleetpulse::models::{DetailRow, LinkAction, PulseStatus, ResourceNode, StatusTag};
use mockall::mock;
use serde_json::{Value, json};

mock! {
    pub Labels {}

    impl Translator for Labels {
        fn t(&self, key: &str, args: &[String]) -> String;
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

fn node(value: Value) -> ResourceNode {
    serde_json::from_value(value).unwrap()
}

fn labels(rows: &[DetailRow]) -> Vec<&str> {
    rows.iter()
        .filter_map(|r| match r {
            DetailRow::Label(l) => Some(l.label_value.as_str()),
            _ => None,
        })
        .collect()
}

fn subscription_without_records() -> ResourceNode {
    node(json!({
        "id": "member--subscription--apps--web-sub",
        "type": "subscription",
        "name": "web-sub",
        "namespace": "apps",
        "specs": {"isDesign": true, "subscriptionModel": []}
    }))
}

/// Nodes covering every builder
fn fixtures() -> Vec<ResourceNode> {
    vec![
        subscription_without_records(),
        node(json!({
            "id": "member--subscription--apps--web-sub",
            "type": "subscription",
            "name": "web-sub",
            "namespace": "apps",
            "specs": {"isDesign": true, "subscriptionModel": {"web-sub-east": [
                {"cluster": "east", "status": "Subscribed"},
                {"cluster": "west", "status": "Failed"}
            ]}, "clustersNames": ["east", "west"]}
        })),
        node(json!({
            "id": "member--deployment--web",
            "type": "deployment",
            "name": "web",
            "namespace": "default",
            "specs": {
                "clustersNames": ["feng", "bill"],
                "deploymentModel": {"web-feng": [{"cluster": "feng", "namespace": "default", "desired": 2}]},
                "podModel": {"web-abc-feng": [
                    {"name": "web-abc", "cluster": "feng", "namespace": "default", "status": "Running"},
                    {"name": "web-def", "cluster": "feng", "namespace": "default", "status": "CrashLoopBackOff"},
                    {"name": "web-ghi", "cluster": "feng", "namespace": "default", "status": "Pending"}
                ]}
            }
        })),
        node(json!({
            "id": "member--service--web",
            "type": "service",
            "name": "web",
            "namespace": "default",
            "specs": {
                "clustersNames": ["feng", "bill"],
                "serviceModel": {"web-feng": [{"cluster": "feng", "namespace": "default", "status": "Deployed"}]}
            }
        })),
        node(json!({
            "id": "member--placements--apps--rule",
            "type": "placements",
            "name": "rule",
            "namespace": "apps",
            "specs": {"isDesign": true, "raw": {"status": {}}}
        })),
        node(json!({
            "id": "member--clusters--east",
            "type": "cluster",
            "name": "cluster",
            "specs": {
                "isDesign": true,
                "clustersNames": ["east", "gone"],
                "clusters": [{"name": "east", "status": "ok"}]
            }
        })),
    ]
}

#[test]
fn test_subscription_without_records_points_to_placement_rules() {
    let ctx = DetailContext::new(&IdentityTranslator, now());
    let rows = set_subscription_deploy_status(
        &subscription_without_records(),
        &ActiveFilters::default(),
        &ctx,
    );

    let remote = rows
        .iter()
        .find_map(|r| match r {
            DetailRow::Label(l) if l.label_value == "Remote subscriptions" => Some(l),
            _ => None,
        })
        .expect("remote subscriptions row");
    assert_eq!(remote.status, Some(StatusTag::Failure));

    let link = rows
        .iter()
        .find_map(|r| match r {
            DetailRow::Link(l) => Some(l),
            _ => None,
        })
        .expect("placement rule link");
    assert!(link.value.label.starts_with("View all placement rules"));
    assert_eq!(link.value.data.action, LinkAction::OpenLink);
    assert_eq!(
        link.value.id.as_deref(),
        Some("member--subscription--apps--web-sub-subscrSearch")
    );
    assert!(
        link.value
            .data
            .target_link
            .as_deref()
            .unwrap()
            .contains("kind%3Aplacementrule%20namespace%3Aapps%20cluster%3Alocal-cluster")
    );

    // no cluster blocks
    assert!(!labels(&rows).contains(&"Cluster name"));
}

#[test]
fn test_every_label_goes_through_translator() {
    let mut translator = MockLabels::new();
    translator
        .expect_t()
        .returning(|key, args| format!("<{}|{}>", key, args.join(",")));

    let ctx = DetailContext::new(&translator, now());
    let rows = set_subscription_deploy_status(
        &subscription_without_records(),
        &ActiveFilters::default(),
        &ctx,
    );

    assert!(labels(&rows).contains(&"<Cluster deploy status|>"));
    assert!(labels(&rows).contains(&"<Remote subscriptions|>"));
    let link_label = rows.iter().find_map(|r| match r {
        DetailRow::Link(l) => Some(l.value.label.clone()),
        _ => None,
    });
    assert_eq!(
        link_label.as_deref(),
        Some("<View all placement rules in {{0}} namespace|apps>")
    );
}

#[test]
fn test_translated_headers_keep_counts() {
    let mut translator = MockLabels::new();
    translator
        .expect_t()
        .withf(|key, args| key == "Not selected by placement rule" && args.is_empty())
        .returning(|_, _| "Nicht ausgewählt".to_string());
    translator
        .expect_t()
        .returning(|key, _| key.to_string());

    let ctx = DetailContext::new(&translator, now());
    let cluster = fixtures().pop().unwrap();
    let rows = set_cluster_status(&cluster, &ctx);
    assert!(rows.contains(&DetailRow::header("Nicht ausgewählt (1)")));
    assert!(rows.contains(&DetailRow::property("Cluster name", "gone")));
}

#[test]
fn test_filtered_rows_are_a_subset() {
    let ctx = DetailContext::new(&InterpolatingTranslator, now());
    let filters = [
        ActiveFilters::new([PulseStatus::Green]),
        ActiveFilters::new([PulseStatus::Yellow]),
        ActiveFilters::new([PulseStatus::Orange]),
        ActiveFilters::new([PulseStatus::Red]),
        ActiveFilters::new([PulseStatus::Green, PulseStatus::Red]),
    ];

    for n in fixtures() {
        let all = node_details(&n, &ActiveFilters::default(), &ctx);
        for filter in &filters {
            let filtered = node_details(&n, filter, &ctx);
            for row in &filtered {
                assert!(all.contains(row), "{} {:?}: {:?}", n.id, filter, row);
                if let Some(tag) = row.status_tag() {
                    assert!(filter.admits(tag), "{} {:?}: {:?}", n.id, filter, row);
                }
            }
        }
    }
}

#[test]
fn test_all_pulse_filter_matches_unfiltered() {
    let ctx = DetailContext::new(&InterpolatingTranslator, now());
    for n in fixtures() {
        assert_eq!(
            node_details(&n, &ActiveFilters::all(), &ctx),
            node_details(&n, &ActiveFilters::default(), &ctx),
            "{}",
            n.id
        );
    }
}

#[test]
fn test_builders_are_idempotent() {
    let ctx = DetailContext::new(&IdentityTranslator, now());
    let filters = ActiveFilters::new([PulseStatus::Red, PulseStatus::Yellow]);
    for n in fixtures() {
        assert_eq!(
            node_details(&n, &filters, &ctx),
            node_details(&n, &filters, &ctx)
        );
    }
}

#[test]
fn test_red_filter_keeps_only_failing_pods() {
    let ctx = DetailContext::new(&InterpolatingTranslator, now());
    let deployment = fixtures().remove(2);
    let rows = node_details(&deployment, &ActiveFilters::new([PulseStatus::Red]), &ctx);

    let pods: Vec<&str> = rows
        .iter()
        .filter_map(|r| match r {
            DetailRow::Label(l) if l.label_value == "Pod" => l.value.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(pods, vec!["web-def"]);
    assert!(rows.contains(&DetailRow::header("Pod details for feng")));
}

#[test]
fn test_missing_cluster_block() {
    let ctx = DetailContext::new(&IdentityTranslator, now());
    let service = fixtures().remove(3);
    let rows = node_details(&service, &ActiveFilters::default(), &ctx);

    assert!(rows.contains(&DetailRow::header("Cluster deploy status")));
    assert!(rows.contains(&DetailRow::property("Cluster name", "feng")));
    assert!(rows.contains(&DetailRow::status("default", "Deployed", StatusTag::Checkmark)));
    assert!(rows.contains(&DetailRow::property("Cluster name", "bill")));
}

#[test]
fn test_hub_cluster_comes_from_context() {
    let ctx = DetailContext::new(&IdentityTranslator, now()).with_hub_cluster("hub");
    let rows = set_subscription_deploy_status(
        &subscription_without_records(),
        &ActiveFilters::default(),
        &ctx,
    );
    let target = rows.iter().find_map(|r| match r {
        DetailRow::Link(l) => l.value.data.target_link.clone(),
        _ => None,
    });
    assert!(target.unwrap().ends_with("cluster%3Ahub\"}"));
}

#[test]
fn test_ansible_hook_status_ignores_filters() {
    let ctx = DetailContext::new(&IdentityTranslator, now());
    let hook = node(json!({
        "id": "member--deployable--member--clusters--local-cluster--ansiblejob--prehook",
        "type": "ansiblejob",
        "name": "prehook",
        "namespace": "apps",
        "specs": {"raw": {"hookType": "pre-hook"}}
    }));

    let rows = node_details(&hook, &ActiveFilters::new([PulseStatus::Red]), &ctx);
    let shown = labels(&rows);
    assert!(shown.contains(&"description.ansible.task.status"));
    assert!(shown.contains(&"description.ansible.job.status"));
}

#[test]
fn test_non_design_subscription_lists_its_deployments() {
    let ctx = DetailContext::new(&IdentityTranslator, now());
    let sub = node(json!({
        "id": "member--subscription--apps--web-sub",
        "type": "subscription",
        "name": "web-sub",
        "namespace": "apps",
        "specs": {
            "clustersNames": ["east"],
            "subscriptionModel": {"web-sub-east": [{"name": "web-sub", "namespace": "apps", "cluster": "east", "status": "Subscribed"}]}
        }
    }));

    let rows = node_details(&sub, &ActiveFilters::default(), &ctx);
    assert!(!labels(&rows).contains(&"Remote subscriptions"));
    assert!(rows.contains(&DetailRow::header("Cluster deploy status")));
    assert!(rows.contains(&DetailRow::property("Cluster name", "east")));
}

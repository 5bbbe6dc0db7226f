//! Console links

use crate::models::{ResolvedRecord, ResourceNode};
use url::form_urlencoded;

pub const EDIT_LINK_PATH: &str = "/multicloud/home/search/resources/yaml";
pub const SEARCH_PATH: &str = "/multicloud/home/search";

/// Query parameters of a resource YAML link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLinkParams {
    pub cluster: Option<String>,
    pub kind: Option<String>,
    pub apiversion: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
}

/// Link to the YAML view of one resource. Unknown parameters are left out.
pub fn edit_link(params: &EditLinkParams) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let pairs = [
        ("cluster", &params.cluster),
        ("kind", &params.kind),
        ("apiversion", &params.apiversion),
        ("name", &params.name),
        ("namespace", &params.namespace),
    ];
    for (key, value) in pairs {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
        }
    }
    let query = query.finish();
    if query.is_empty() {
        EDIT_LINK_PATH.to_string()
    } else {
        format!("{}?{}", EDIT_LINK_PATH, query)
    }
}

/// `apigroup/apiversion`, else `apiversion`
fn record_api_version(record: &ResolvedRecord<'_>) -> Option<String> {
    let version = record.record.apiversion.as_deref()?;
    match record.record.apigroup.as_deref().filter(|g| !g.is_empty()) {
        Some(group) => Some(format!("{}/{}", group, version)),
        None => Some(version.to_string()),
    }
}

/// YAML link for a search record found for `node`
pub fn record_edit_link(node: &ResourceNode, record: &ResolvedRecord<'_>) -> String {
    let kind = record
        .record
        .kind
        .clone()
        .unwrap_or_else(|| node.kind.as_str().to_string());
    edit_link(&EditLinkParams {
        cluster: Some(record.cluster.clone()),
        kind: Some(kind.to_lowercase()),
        apiversion: record_api_version(record).or_else(|| node.api_version().map(str::to_string)),
        name: Some(record.name().to_string()),
        namespace: Some(record.namespace.clone()),
    })
}

/// Search page listing resources of `kind` in a namespace of a cluster
pub fn search_link(kind: &str, namespace: &str, cluster: &str) -> String {
    format!(
        r#"{}?filters={{"textsearch":"kind%3A{}%20namespace%3A{}%20cluster%3A{}"}}"#,
        SEARCH_PATH, kind, namespace, cluster
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_link_parameter_order() {
        let link = edit_link(&EditLinkParams {
            cluster: Some("feng".into()),
            kind: Some("deployment".into()),
            apiversion: Some("apps/v1".into()),
            name: Some("web".into()),
            namespace: Some("default".into()),
        });
        assert_eq!(
            link,
            "/multicloud/home/search/resources/yaml?cluster=feng&kind=deployment&apiversion=apps%2Fv1&name=web&namespace=default"
        );
    }

    #[test]
    fn test_edit_link_skips_unknown() {
        let link = edit_link(&EditLinkParams {
            name: Some("web".into()),
            ..EditLinkParams::default()
        });
        assert_eq!(link, "/multicloud/home/search/resources/yaml?name=web");
        assert_eq!(edit_link(&EditLinkParams::default()), EDIT_LINK_PATH);
    }

    #[test]
    fn test_search_link() {
        assert_eq!(
            search_link("placementrule", "apps", "local-cluster"),
            r#"/multicloud/home/search?filters={"textsearch":"kind%3Aplacementrule%20namespace%3Aapps%20cluster%3Alocal-cluster"}"#
        );
    }
}

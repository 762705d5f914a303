//! The front-end's static route table, unqualified.

use super::{search, RouteEntry, RouteMap};
use crate::error::RouteError;

pub const SECURITY_PATH: &str = "/security";
pub const VIEWS_PATH: &str = "/views";
pub const EXTENDED_SEARCH_PATH: &str = "/search";

fn lit(path: &str) -> RouteEntry {
    RouteEntry::literal(path)
}

fn tpl(path: &str) -> RouteEntry {
    RouteEntry::template(path)
}

fn group<const N: usize>(entries: [(&str, RouteEntry); N]) -> RouteEntry {
    RouteEntry::nested(entries)
}

/// Required positional argument `index` of generator `route`.
fn arg<'a>(args: &[&'a str], index: usize, route: &str) -> Result<&'a str, RouteError> {
    args.get(index).copied().ok_or_else(|| RouteError::MissingArgument {
        route: route.to_string(),
        index,
    })
}

/// Optional positional argument; empty strings count as absent.
fn opt_arg<'a>(args: &[&'a str], index: usize) -> Option<&'a str> {
    args.get(index).copied().filter(|value| !value.is_empty())
}

fn alerts() -> RouteEntry {
    group([
        ("LIST", lit("/alerts")),
        ("replay_search", tpl("/alerts/:alertId/replay-search")),
        ("BULK_REPLAY_SEARCH", lit("/alerts/replay-search")),
        (
            "DEFINITIONS",
            group([
                ("LIST", lit("/alerts/definitions")),
                ("CREATE", lit("/alerts/definitions/new")),
                ("edit", tpl("/alerts/definitions/:definitionId/edit")),
                ("show", tpl("/alerts/definitions/:definitionId")),
                (
                    "replay_search",
                    tpl("/alerts/definitions/:definitionId/replay-search"),
                ),
            ]),
        ),
        (
            "NOTIFICATIONS",
            group([
                ("LIST", lit("/alerts/notifications")),
                ("CREATE", lit("/alerts/notifications/new")),
                ("edit", tpl("/alerts/notifications/:notificationId/edit")),
                ("show", tpl("/alerts/notifications/:notificationId")),
            ]),
        ),
    ])
}

fn security() -> RouteEntry {
    let page = |name: &str| lit(&format!("{SECURITY_PATH}/{name}"));
    group([
        ("OVERVIEW", page("overview")),
        ("USER_ACTIVITY", page("user-activity")),
        ("HOST_ACTIVITY", page("host-activity")),
        ("NETWORK_ACTIVITY", page("network-activity")),
        ("ANOMALIES", page("anomalies")),
        ("ACTIVITY", page("activity")),
    ])
}

fn cluster() -> RouteEntry {
    group([
        ("NODES", lit("/system/cluster")),
        ("NODE_SHOW", tpl("/system/cluster/node/:nodeId")),
        (
            "CERTIFICATE_MANAGEMENT",
            lit("/system/cluster/certificate-management"),
        ),
        ("DATANODE_DASHBOARD", lit("/system/cluster/datanode-dashboard")),
        ("DATANODE_MIGRATION", lit("/system/cluster/datanode-migration")),
        ("DATANODE_UPGRADE", lit("/system/cluster/datanode-upgrade")),
        ("DATANODE_SHOW", tpl("/system/cluster/datanode/:dataNodeId")),
    ])
}

fn indices() -> RouteEntry {
    group([
        ("LIST", lit("/system/indices")),
        ("FAILURES", lit("/system/indices/failures")),
        (
            "TEMPLATES",
            group([
                ("view", tpl("/system/indices/templates/:templateId")),
                ("OVERVIEW", lit("/system/indices/templates")),
                ("CREATE", lit("/system/indices/templates/create")),
                ("edit", tpl("/system/indices/templates/edit/:templateId")),
            ]),
        ),
        (
            "FIELD_TYPE_PROFILES",
            group([
                ("OVERVIEW", lit("/system/indices/field-type-profiles")),
                ("edit", tpl("/system/indices/field-type-profiles/:profileId")),
                ("CREATE", lit("/system/indices/field-type-profiles/create")),
            ]),
        ),
    ])
}

fn index_sets() -> RouteEntry {
    group([
        (
            "CONFIGURATION",
            RouteEntry::generator(|args| {
                let id = arg(args, 0, "SYSTEM.INDEX_SETS.CONFIGURATION")?;
                let path = format!("/system/index_sets/{id}/configuration");
                Ok(match opt_arg(args, 1) {
                    Some(from) => format!("{path}?from={from}"),
                    None => path,
                })
            }),
        ),
        ("SHOW", tpl("/system/index_sets/:indexSetId")),
        ("FIELD_TYPES", tpl("/system/index_sets/:indexSetId/field-types")),
        ("CREATE", lit("/system/index_sets/create")),
    ])
}

fn authentication() -> RouteEntry {
    group([
        (
            "BACKENDS",
            group([
                ("OVERVIEW", lit("/system/authentication/services")),
                ("ACTIVE", lit("/system/authentication/services/active")),
                ("CREATE", lit("/system/authentication/services/create")),
                (
                    "createBackend",
                    tpl("/system/authentication/services/create/:name"),
                ),
                ("show", tpl("/system/authentication/services/:id")),
                (
                    "edit",
                    RouteEntry::generator(|args| {
                        let id = arg(args, 0, "SYSTEM.AUTHENTICATION.BACKENDS.edit")?;
                        let path = format!("/system/authentication/services/edit/{id}");
                        Ok(match opt_arg(args, 1) {
                            Some(step) => format!("{path}?initialStepKey={step}"),
                            None => path,
                        })
                    }),
                ),
            ]),
        ),
        (
            "AUTHENTICATORS",
            group([
                ("SHOW", lit("/system/authentication/authenticator")),
                ("EDIT", lit("/system/authentication/authenticator/edit")),
            ]),
        ),
    ])
}

fn lookup_tables() -> RouteEntry {
    group([
        ("OVERVIEW", lit("/system/lookuptables")),
        ("CREATE", lit("/system/lookuptables/create")),
        ("show", tpl("/system/lookuptables/table/:tableName")),
        ("edit", tpl("/system/lookuptables/table/:tableName/edit")),
        (
            "CACHES",
            group([
                ("OVERVIEW", lit("/system/lookuptables/caches")),
                ("CREATE", lit("/system/lookuptables/caches/create")),
                ("show", tpl("/system/lookuptables/caches/:cacheName")),
                ("edit", tpl("/system/lookuptables/caches/:cacheName/edit")),
            ]),
        ),
        (
            "DATA_ADAPTERS",
            group([
                ("OVERVIEW", lit("/system/lookuptables/data_adapters")),
                ("CREATE", lit("/system/lookuptables/data_adapters/create")),
                ("show", tpl("/system/lookuptables/data_adapter/:adapterName")),
                (
                    "edit",
                    tpl("/system/lookuptables/data_adapter/:adapterName/edit"),
                ),
            ]),
        ),
    ])
}

fn sidecars() -> RouteEntry {
    group([
        ("OVERVIEW", lit("/system/sidecars")),
        ("STATUS", tpl("/system/sidecars/:sidecarId/status")),
        ("ADMINISTRATION", lit("/system/sidecars/administration")),
        ("CONFIGURATION", lit("/system/sidecars/configuration")),
        ("FAILURE_TRACKING", lit("/system/sidecars/failuretracking")),
        ("NEW_CONFIGURATION", lit("/system/sidecars/configuration/new")),
        (
            "EDIT_CONFIGURATION",
            tpl("/system/sidecars/configuration/edit/:configurationId"),
        ),
        ("NEW_COLLECTOR", lit("/system/sidecars/collector/new")),
        (
            "EDIT_COLLECTOR",
            tpl("/system/sidecars/collector/edit/:collectorId"),
        ),
    ])
}

fn system() -> RouteEntry {
    group([
        ("CLUSTER", cluster()),
        ("CONFIGURATIONS", lit("/system/configurations")),
        (
            "configurationsSection",
            RouteEntry::generator(|args| {
                let section = arg(args, 0, "SYSTEM.configurationsSection")?;
                Ok(match opt_arg(args, 1) {
                    Some(plugin) => format!("/system/configurations/{section}/{plugin}"),
                    None => format!("/system/configurations/{section}"),
                })
            }),
        ),
        (
            "CONTENTPACKS",
            group([
                ("LIST", lit("/system/contentpacks")),
                ("EXPORT", lit("/system/contentpacks/export")),
                ("CREATE", lit("/system/contentpacks/create")),
                (
                    "edit",
                    tpl("/system/contentpacks/:contentPackId/:contentPackRev/edit"),
                ),
                ("show", tpl("/system/contentpacks/:contentPackId")),
            ]),
        ),
        ("GROKPATTERNS", lit("/system/grokpatterns")),
        ("INDICES", indices()),
        ("INDEX_SETS", index_sets()),
        ("INPUTS", lit("/system/inputs")),
        ("INPUT_DIAGNOSIS", tpl("/system/input/diagnosis/:input")),
        ("LOGGING", lit("/system/logging")),
        ("METRICS", tpl("/system/metrics/node/:nodeId")),
        ("THREADDUMP", tpl("/system/threaddump/:nodeId")),
        ("OUTPUTS", lit("/system/outputs")),
        ("OVERVIEW", lit("/system/overview")),
        ("PROCESSBUFFERDUMP", tpl("/system/processbufferdump/:nodeId")),
        ("SYSTEMLOGS", tpl("/system/logs/recent/:nodeId")),
        ("AUTHENTICATION", authentication()),
        (
            "USERS",
            group([
                ("CREATE", lit("/system/users/new")),
                ("edit", tpl("/system/users/edit/:userId")),
                ("TOKENS", group([("edit", tpl("/system/users/tokens/:userId"))])),
                ("OVERVIEW", lit("/system/users")),
                ("show", tpl("/system/users/:userId")),
            ]),
        ),
        (
            "USERS_TOKEN_MANAGEMENT",
            group([("overview", lit("/system/tokenmanagement/overview"))]),
        ),
        (
            "AUTHZROLES",
            group([
                ("OVERVIEW", lit("/system/roles")),
                ("show", tpl("/system/roles/:roleId")),
                ("edit", tpl("/system/roles/edit/:roleId")),
            ]),
        ),
        ("LOOKUPTABLES", lookup_tables()),
        (
            "PIPELINES",
            group([
                ("OVERVIEW", lit("/system/pipelines")),
                ("PIPELINE", tpl("/system/pipelines/:pipelineId")),
                ("RULES", lit("/system/pipelines/rules")),
                ("RULE", tpl("/system/pipelines/rules/:ruleId")),
                ("SIMULATOR", lit("/system/pipelines/simulate")),
            ]),
        ),
        ("ENTERPRISE", lit("/system/enterprise")),
        ("SIDECARS", sidecars()),
    ])
}

/// Stream, message and extractor helpers living at the top level of the table.
fn helpers() -> Vec<(&'static str, RouteEntry)> {
    vec![
        ("message_show", tpl("/messages/:index/:messageId")),
        ("stream_view", tpl("/streams/:streamId/view")),
        ("stream_edit", tpl("/streams/:streamId/edit")),
        (
            "stream_edit_example",
            RouteEntry::generator(|args| {
                let stream = arg(args, 0, "stream_edit_example")?;
                let index = arg(args, 1, "stream_edit_example")?;
                let message = arg(args, 2, "stream_edit_example")?;
                Ok(format!(
                    "/streams/{stream}/edit?index={index}&message_id={message}"
                ))
            }),
        ),
        ("stream_outputs", tpl("/streams/:streamId/outputs")),
        (
            "stream_alerts",
            RouteEntry::generator(|args| {
                let stream = arg(args, 0, "stream_alerts")?;
                Ok(format!("/alerts/?stream_id={stream}"))
            }),
        ),
        ("legacy_stream_search", tpl("/streams/:streamId/messages")),
        ("dashboard_show", tpl("/dashboards/:dashboardId")),
        ("show_saved_search", tpl("/search/:searchId")),
        ("node_inputs", tpl("/system/inputs/:nodeId")),
        (
            "global_input_extractors",
            tpl("/system/inputs/:inputId/extractors"),
        ),
        (
            "local_input_extractors",
            tpl("/system/inputs/:nodeId/:inputId/extractors"),
        ),
        (
            "export_extractors",
            tpl("/system/inputs/:nodeId/:inputId/extractors/export"),
        ),
        (
            "import_extractors",
            tpl("/system/inputs/:nodeId/:inputId/extractors/import"),
        ),
        (
            "new_extractor",
            RouteEntry::generator(|args| {
                let node = arg(args, 0, "new_extractor")?;
                let input = arg(args, 1, "new_extractor")?;
                Ok(search::new_extractor(
                    node,
                    input,
                    opt_arg(args, 2),
                    opt_arg(args, 3),
                    opt_arg(args, 4),
                    opt_arg(args, 5),
                ))
            }),
        ),
        (
            "edit_extractor",
            tpl("/system/inputs/:nodeId/:inputId/extractors/:extractorId/edit"),
        ),
        (
            "edit_input_extractor",
            tpl("/system/inputs/:nodeId/:inputId/extractors/:extractorId/edit"),
        ),
        (
            "filtered_metrics",
            RouteEntry::generator(|args| {
                let node = arg(args, 0, "filtered_metrics")?;
                let filter = arg(args, 1, "filtered_metrics")?;
                Ok(format!("/system/metrics/node/{node}?filter={filter}"))
            }),
        ),
    ]
}

pub fn default_routes() -> RouteMap {
    let mut routes: RouteMap = [
        ("STARTPAGE", lit("/")),
        ("NOTFOUND", lit("/notfound")),
        ("SEARCH", lit(search::SEARCH)),
        ("STREAMS", lit(search::STREAMS)),
        ("ALERTS", alerts()),
        ("SECURITY", security()),
        ("SOURCES", lit("/sources")),
        ("DASHBOARDS", lit("/dashboards")),
        ("WELCOME", lit("/welcome")),
        (
            "GLOBAL_API_BROWSER_URL",
            lit("/api/api-browser/global/index.html"),
        ),
        ("SYSTEM", system()),
        (
            "VIEWS",
            group([
                ("LIST", lit(VIEWS_PATH)),
                ("VIEWID", tpl(&format!("{VIEWS_PATH}/:id"))),
            ]),
        ),
        ("EXTENDEDSEARCH", lit(EXTENDED_SEARCH_PATH)),
        ("KEYBOARD_SHORTCUTS", lit("/keyboard-shortcuts")),
    ]
    .into_iter()
    .collect();

    for (name, entry) in helpers() {
        routes.insert(name, entry);
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_literals() {
        let routes = default_routes();
        assert_eq!(routes.resolve("STARTPAGE", &[]).unwrap(), "/");
        assert_eq!(routes.resolve("WELCOME", &[]).unwrap(), "/welcome");
        assert_eq!(
            routes.resolve("SECURITY.USER_ACTIVITY", &[]).unwrap(),
            "/security/user-activity"
        );
        assert_eq!(routes.resolve("VIEWS.VIEWID", &["v1"]).unwrap(), "/views/v1");
    }

    #[test]
    fn test_optional_arguments() {
        let routes = default_routes();
        assert_eq!(
            routes
                .resolve("SYSTEM.INDEX_SETS.CONFIGURATION", &["is1"])
                .unwrap(),
            "/system/index_sets/is1/configuration"
        );
        assert_eq!(
            routes
                .resolve("SYSTEM.INDEX_SETS.CONFIGURATION", &["is1", "list"])
                .unwrap(),
            "/system/index_sets/is1/configuration?from=list"
        );
        assert_eq!(
            routes
                .resolve("SYSTEM.configurationsSection", &["Plugins", "ldap"])
                .unwrap(),
            "/system/configurations/Plugins/ldap"
        );
        assert_eq!(
            routes
                .resolve("SYSTEM.AUTHENTICATION.BACKENDS.edit", &["b1", "groupSync"])
                .unwrap(),
            "/system/authentication/services/edit/b1?initialStepKey=groupSync"
        );
    }

    #[test]
    fn test_helpers_with_query_strings() {
        let routes = default_routes();
        assert_eq!(
            routes
                .resolve("stream_edit_example", &["s1", "graylog_0", "m1"])
                .unwrap(),
            "/streams/s1/edit?index=graylog_0&message_id=m1"
        );
        assert_eq!(
            routes.resolve("stream_alerts", &["s1"]).unwrap(),
            "/alerts/?stream_id=s1"
        );
        assert_eq!(
            routes
                .resolve("new_extractor", &["n1", "i1", "grok"])
                .unwrap(),
            "/system/inputs/n1/i1/extractors/new?extractor_type=grok"
        );
    }

    #[test]
    fn test_missing_required_argument() {
        let routes = default_routes();
        assert_eq!(
            routes.resolve("filtered_metrics", &["n1"]).unwrap_err(),
            RouteError::MissingArgument {
                route: "filtered_metrics".into(),
                index: 1
            }
        );
        assert!(matches!(
            routes.resolve("SYSTEM.CLUSTER.NODE_SHOW", &[]),
            Err(RouteError::MissingArgument { index: 0, .. })
        ));
    }
}

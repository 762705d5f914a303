//! # sift — command-line access to SIFT
//!
//! - `sift query build|compare` — build and compare query JSON.
//! - `sift filters decompose` — list the streams and categories in a filter tree.
//! - `sift routes list|resolve` and `sift search-url` — the route table, offline.
//! - `sift views list|create|submit` — talk to a running `sift-hub`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tabled::{Table, Tabled};

use sift_core::routes::RoutesTimeRange;
use sift_core::search_bar::SearchBarValues;
use sift_core::{
    create_elasticsearch_query_string, filters_to_stream_category_set, filters_to_stream_set,
    new_filters_for_query, FilterNode, PluginRouteRegistry, Query, RouteEntry, Routes, TimeRange,
};

/// SIFT — queries, stream filters and routes for the search front-end.
#[derive(Parser)]
#[command(name = "sift", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or compare queries.
    Query {
        #[command(subcommand)]
        action: QueryCmd,
    },

    /// Inspect stream filter trees.
    Filters {
        #[command(subcommand)]
        action: FiltersCmd,
    },

    /// Inspect the route table.
    Routes {
        #[command(subcommand)]
        action: RoutesCmd,
    },

    /// Print a search page URL.
    SearchUrl {
        #[arg(long, default_value = "")]
        query: String,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long = "stream")]
        streams: Vec<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Base path the front-end is mounted under.
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Manage views on a running hub.
    Views {
        #[command(subcommand)]
        action: ViewsCmd,
    },
}

#[derive(Subcommand)]
enum QueryCmd {
    /// Print a query as JSON.
    Build {
        /// Query id; a fresh one is generated when omitted.
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "")]
        query: String,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long = "stream")]
        streams: Vec<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Tell whether two query files describe the same query.
    Compare { left: PathBuf, right: PathBuf },
}

#[derive(Subcommand)]
enum FiltersCmd {
    /// List the streams and categories referenced by a filter tree.
    Decompose {
        /// Filter JSON, inline.
        filter: String,
    },
}

#[derive(Subcommand)]
enum RoutesCmd {
    /// Show every literal route.
    List {
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Resolve a dotted route name, or a plugin route key with `--plugin`.
    Resolve {
        name: String,
        args: Vec<String>,
        #[arg(long, default_value = "")]
        prefix: String,
        /// Plugin path to register before resolving (repeatable).
        #[arg(long = "plugin")]
        plugins: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ViewsCmd {
    List,
    Create {
        title: String,
    },
    /// Submit search-bar values for one query of a view.
    Submit {
        view_id: String,
        query_id: String,
        #[arg(long, default_value = "")]
        query: String,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long = "stream")]
        streams: Vec<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

/// Time range flags. Without any of them the range is the last five minutes.
#[derive(Args, Debug, Default)]
struct RangeArgs {
    /// Seconds back from now.
    #[arg(long, conflicts_with_all = ["from", "to", "keyword"])]
    relative: Option<u64>,
    #[arg(long, requires = "to")]
    from: Option<String>,
    #[arg(long, requires = "from")]
    to: Option<String>,
    #[arg(long, conflicts_with_all = ["from", "to"])]
    keyword: Option<String>,
}

impl RangeArgs {
    fn timerange(&self) -> TimeRange {
        match (&self.from, &self.to, &self.keyword) {
            (Some(from), Some(to), _) => TimeRange::absolute(from.as_str(), to.as_str()),
            (_, _, Some(keyword)) => TimeRange::keyword(keyword.as_str()),
            _ => TimeRange::relative(self.relative.unwrap_or(300)),
        }
    }
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Route")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
}

fn route_rows(routes: &Routes) -> Vec<RouteRow> {
    routes
        .qualified()
        .flatten()
        .into_iter()
        .map(|(name, entry)| RouteRow {
            name,
            path: match entry {
                RouteEntry::Literal(path) => path.clone(),
                _ => "(generated)".to_string(),
            },
        })
        .collect()
}

fn build_query(
    id: Option<String>,
    query: &str,
    range: &RangeArgs,
    streams: &[String],
    categories: &[String],
) -> anyhow::Result<Query> {
    let builder = match id {
        Some(id) => Query::builder().id(id),
        None => Query::builder().new_id(),
    };
    Ok(builder
        .query(create_elasticsearch_query_string(query))
        .timerange(range.timerange())
        .filter(new_filters_for_query(streams, categories))
        .build()?)
}

fn read_query(path: &Path) -> anyhow::Result<Query> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Query::from_json(value)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { action } => match action {
            QueryCmd::Build {
                id,
                query,
                range,
                streams,
                categories,
            } => {
                let query = build_query(id, &query, &range, &streams, &categories)?;
                println!("{}", serde_json::to_string_pretty(&query.to_json()?)?);
            }
            QueryCmd::Compare { left, right } => {
                let left = read_query(&left)?;
                let right = read_query(&right)?;
                if left.equals(Some(&right)) {
                    println!("equal");
                } else {
                    println!("different (search needs to be re-executed)");
                    std::process::exit(1);
                }
            }
        },

        Commands::Filters {
            action: FiltersCmd::Decompose { filter },
        } => {
            let filter: FilterNode =
                serde_json::from_str(&filter).context("filter is not a valid filter tree")?;
            let summary = serde_json::json!({
                "streams": filters_to_stream_set(Some(&filter)),
                "stream_categories": filters_to_stream_category_set(Some(&filter)),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Routes { action } => match action {
            RoutesCmd::List { prefix } => {
                let routes = Routes::new(&prefix, PluginRouteRegistry::new());
                println!("{}", Table::new(route_rows(&routes)));
            }
            RoutesCmd::Resolve {
                name,
                args,
                prefix,
                plugins,
            } => {
                let plugin_mode = !plugins.is_empty();
                let routes = Routes::new(&prefix, plugins.into_iter().collect());
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let url = if plugin_mode {
                    routes.plugin_route(&name)?.resolve(&args)?
                } else {
                    routes.resolve(&name, &args)?
                };
                println!("{url}");
            }
        },

        Commands::SearchUrl {
            query,
            range,
            streams,
            categories,
            prefix,
        } => {
            let routes = Routes::new(&prefix, PluginRouteRegistry::new());
            let timerange = RoutesTimeRange::from(&range.timerange());
            let streams = (!streams.is_empty()).then_some(streams);
            let categories = (!categories.is_empty()).then_some(categories);
            println!(
                "{}",
                routes.search_with_query(
                    &query,
                    Some(&timerange),
                    streams.as_deref(),
                    categories.as_deref(),
                )
            );
        }

        Commands::Views { action } => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to build tokio runtime")?;
            rt.block_on(views_main(action))?;
        }
    }

    Ok(())
}

async fn views_main(action: ViewsCmd) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let base_url =
        std::env::var("SIFT_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    let json = match action {
        ViewsCmd::List => {
            let url = format!("{}/api/views", base_url);
            expect_success(get_request(&client, &url).await?).await?
        }
        ViewsCmd::Create { title } => {
            let url = format!("{}/api/views", base_url);
            let payload = serde_json::json!({ "title": title });
            expect_success(post_request(&client, &url, &payload).await?).await?
        }
        ViewsCmd::Submit {
            view_id,
            query_id,
            query,
            range,
            streams,
            categories,
        } => {
            let url = format!(
                "{}/api/views/{}/queries/{}/submit",
                base_url, view_id, query_id
            );
            let values = SearchBarValues {
                query_string: query,
                timerange: range.timerange(),
                streams,
                stream_categories: categories,
            };
            let payload = serde_json::to_value(&values)?;
            expect_success(post_request(&client, &url, &payload).await?).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn expect_success(resp: reqwest::Response) -> anyhow::Result<serde_json::Value> {
    let status = resp.status();
    let json = resp.json::<serde_json::Value>().await?;
    if !status.is_success() {
        let message = json
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("request failed");
        bail!("{} ({})", message, status);
    }
    Ok(json)
}

async fn get_request(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client.get(url).send().await
}

async fn post_request(
    client: &reqwest::Client,
    url: &str,
    json: &serde_json::Value,
) -> Result<reqwest::Response, reqwest::Error> {
    client.post(url).json(json).send().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_args() {
        assert_eq!(RangeArgs::default().timerange(), TimeRange::relative(300));

        let cli = Cli::try_parse_from(["sift", "query", "build", "--keyword", "yesterday"]).unwrap();
        let Commands::Query {
            action: QueryCmd::Build { range, .. },
        } = cli.command
        else {
            panic!("expected query build");
        };
        assert_eq!(range.timerange(), TimeRange::keyword("yesterday"));
    }

    #[test]
    fn test_absolute_range_needs_both_ends() {
        assert!(Cli::try_parse_from(["sift", "search-url", "--from", "2024-01-01"]).is_err());
        assert!(Cli::try_parse_from([
            "sift",
            "search-url",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-02"
        ])
        .is_ok());
    }

    #[test]
    fn test_build_query_with_selection() {
        let range = RangeArgs {
            relative: Some(60),
            ..Default::default()
        };
        let query = build_query(
            Some("q1".into()),
            "level:3",
            &range,
            &["s1".to_string()],
            &[],
        )
        .unwrap();
        assert_eq!(query.id(), "q1");
        assert_eq!(query.timerange(), &TimeRange::relative(60));
        assert_eq!(
            filters_to_stream_set(query.filter()).into_iter().collect::<Vec<_>>(),
            vec!["s1"]
        );
    }

    #[test]
    fn test_read_query_from_file() {
        let path = std::env::temp_dir()
            .join(format!("sift-cli-{}.json", sift_core::id::generate_id()));
        let range = RangeArgs::default();
        let query = build_query(Some("q1".into()), "level:3", &range, &[], &[]).unwrap();
        std::fs::write(&path, query.to_json().unwrap().to_string()).unwrap();

        let read = read_query(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(read.equals(Some(&query)));

        let err = read_query(Path::new("/nonexistent/sift-query.json")).unwrap_err();
        assert!(err.to_string().starts_with("reading /nonexistent/sift-query.json"));
    }

    #[test]
    fn test_route_rows_mark_generators() {
        let routes = Routes::new("/test", PluginRouteRegistry::new());
        let rows = route_rows(&routes);
        assert!(rows
            .iter()
            .any(|r| r.name == "SEARCH" && r.path == "/test/search"));
        assert!(rows
            .iter()
            .any(|r| r.name == "SYSTEM.CLUSTER.NODE_SHOW" && r.path == "(generated)"));
    }
}

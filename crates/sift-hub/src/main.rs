use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sift_core::routes::{is_default_prefix, prefix_url, set_app_path_prefix};
use sift_core::Routes;

mod api;
mod config;
mod error;
mod queries;
mod views;

use config::Config;
use error::StartupError;

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "sift-hub", version, about = "SIFT search front-end server")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "sift-hub.toml")]
    config: PathBuf,

    /// Server bind address (overrides the config file)
    #[arg(long)]
    bind: Option<String>,
}

// =============================================================================
// Application State
// =============================================================================

pub struct AppState {
    config: Config,
    routes: Routes,
    views: views::ViewManager,
}

impl AppState {
    fn new(config: Config) -> Self {
        let routes = Routes::new(&config.server.app_path_prefix, config.plugin_registry());
        Self {
            config,
            routes,
            views: views::ViewManager::new(),
        }
    }
}

/// Mount point for the static UI: `None` serves it from the root.
fn assets_mount(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_matches('/');
    if is_default_prefix(prefix) || trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.server.assets_dir);

    let router = Router::new()
        // Routes
        .route("/api/routes", get(api::list_routes))
        .route("/api/routes/resolve", get(api::resolve_route))
        .route("/api/routes/search", get(api::search_url))
        .route("/api/routes/plugins/:key", get(api::resolve_plugin_route))
        // Query tools
        .route("/api/queries/filters", post(api::compose_filters))
        .route(
            "/api/queries/filters/decompose",
            post(api::decompose_filters),
        )
        .route("/api/queries/compare", post(api::compare_queries))
        // Views
        .route("/api/views", get(api::list_views).post(api::create_view))
        .route("/api/views/:id", get(api::get_view).delete(api::delete_view))
        .route(
            "/api/views/:id/queries/:query_id/form",
            get(api::get_form_values),
        )
        .route(
            "/api/views/:id/queries/:query_id/submit",
            post(api::submit_search),
        );

    // Static UI, under the same prefix the qualified routes point at
    let router = match assets_mount(&state.config.server.app_path_prefix) {
        Some(mount) => router.nest_service(&mount, assets),
        None => router.fallback_service(assets),
    };

    router
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sift_hub=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    set_app_path_prefix(config.server.app_path_prefix.clone())?;

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|source| StartupError::Bind {
            addr: config.server.bind.clone(),
            source,
        })?;

    let state = Arc::new(AppState::new(config));
    let app = build_router(state.clone());

    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("  SIFT v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  UI:       http://{}{}", addr, prefix_url("/"));
    tracing::info!("  API:      http://{}/api/routes", addr);
    tracing::info!("  Assets:   {:?}", state.config.server.assets_dir);
    tracing::info!("  Plugins:  {} route(s)", state.routes.plugins().len());
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

//! # Config
//!
//! `sift-hub.toml`. Every field has a default, so an absent file or an empty
//! table yields a working setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sift_core::PluginRouteRegistry;

use crate::error::StartupError;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub plugins: PluginConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Base path the front-end is mounted under, e.g. `/graylog`.
    #[serde(default)]
    pub app_path_prefix: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            app_path_prefix: String::new(),
            assets_dir: default_assets_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PluginConfig {
    #[serde(default)]
    pub routes: Vec<PluginRouteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PluginRouteConfig {
    pub path: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("crates/sift-hub/ui/dist")
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn plugin_registry(&self) -> PluginRouteRegistry {
        self.plugins.routes.iter().map(|r| r.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.app_path_prefix, "");
        assert!(config.plugins.routes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            app_path_prefix = "/graylog"
            assets_dir = "web/build"

            [[plugins.routes]]
            path = "/system/pipelines/:pipelineId"

            [[plugins.routes]]
            path = "/reports"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.app_path_prefix, "/graylog");
        assert_eq!(config.server.assets_dir, PathBuf::from("web/build"));

        let registry = config.plugin_registry();
        assert_eq!(
            registry.paths(),
            ["/system/pipelines/:pipelineId", "/reports"]
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load(Path::new("does-not-exist/sift-hub.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }
}

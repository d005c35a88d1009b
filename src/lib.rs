//! Prepper Bunker
//!
//! A survival-bunker resource catalog with:
//! - CRUD access to the bunker's entity kinds, grouped by storage location
//! - a reference-integrity guard that reports every blocking kind
//! - real-time WebSocket notifications for every committed mutation

pub mod api;
pub mod catalog;
pub mod events;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::api::handlers::ServerState;
use crate::catalog::{CatalogService, CatalogStore, MemoryStore};
use crate::events::{ChangeEmitter, ChangeNotifier, SubscriberRegistry};

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
    pub bind: String,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: "0.0.0.0".into(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub bind_address: String,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(yaml.server.bind),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Server bootstrap
// ============================================================================

/// Wire the catalog service, subscriber registry, and notifier together
/// into shared server state.
pub fn build_state() -> Arc<ServerState> {
    let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
    let registry = Arc::new(SubscriberRegistry::new());
    let notifier: Arc<dyn ChangeEmitter> = Arc::new(ChangeNotifier::new(Arc::clone(&registry)));
    let catalog = Arc::new(CatalogService::new(store, notifier));

    Arc::new(ServerState { catalog, registry })
}

/// Start the HTTP/WebSocket server and serve until shutdown.
pub async fn start_server(config: Config) -> Result<()> {
    let state = build_state();
    let app = api::create_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.bind_address.as_str(), config.server_port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
server:
  port: 9090
  bind: 127.0.0.1
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind, "127.0.0.1");
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "0.0.0.0");
    }

    /// Combined test for YAML file loading, env var overrides, and defaults.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &["SERVER_PORT", "BIND_ADDRESS"] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
server:
  port: 9999
  bind: 10.0.0.1
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.server_port, 9999);
        assert_eq!(config.bind_address, "10.0.0.1");

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("SERVER_PORT", "7777");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.server_port, 7777);
        // YAML value still used where no env override
        assert_eq!(config.bind_address, "10.0.0.1");

        clear_env();

        // --- Phase 3: No YAML file → defaults ---
        let nonexistent = Path::new("/tmp/nonexistent-config-12345.yaml");
        let config = Config::from_yaml_and_env(Some(nonexistent)).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_build_state_starts_with_no_subscribers() {
        let state = build_state();
        assert_eq!(state.registry.subscriber_count(), 0);
    }
}

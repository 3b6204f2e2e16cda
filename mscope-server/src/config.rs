//! Server configuration and credential storage
//!
//! Listen address, static assets and model settings resolve CLI → ENV →
//! TOML → compiled default (clap handles the first two). The stored
//! credential lives in the same TOML file and is rewritten by the settings
//! API.

use clap::Parser;
use mscope_common::api::CredentialStatus;
use mscope_common::config::{
    load_toml_config, read_toml_config, write_toml_config, CompiledDefaults, TomlConfig,
};
use mscope_common::credential::{resolve_credential, CredentialSource, PROCESS_CREDENTIAL_ENV};
use mscope_common::{Credential, CredentialError};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::services::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Command-line arguments for mscope-server
#[derive(Parser, Debug, Default)]
#[command(name = "mscope-server")]
#[command(about = "MicroScope AI analysis and specimen library server")]
#[command(version)]
pub struct ServerArgs {
    /// HTTP listen port
    #[arg(short, long, env = "MSCOPE_PORT")]
    pub port: Option<u16>,

    /// HTTP listen address
    #[arg(long, env = "MSCOPE_BIND")]
    pub bind: Option<String>,

    /// Root folder holding microscope.db
    #[arg(short, long)]
    pub root_folder: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "MSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of a built single-page frontend to serve at /
    #[arg(long, env = "MSCOPE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Remote model identifier
    #[arg(long, env = "MSCOPE_MODEL")]
    pub model: Option<String>,

    /// Remote model API base URL
    #[arg(long, env = "MSCOPE_MODEL_BASE_URL")]
    pub model_base_url: Option<String>,
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub static_assets: Option<PathBuf>,
    pub model: String,
    pub model_base_url: String,
}

impl ServerConfig {
    pub fn resolve(args: &ServerArgs, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        Self {
            bind_address: args
                .bind
                .clone()
                .or_else(|| toml.bind_address.clone())
                .unwrap_or(defaults.bind_address),
            port: args.port.or(toml.port).unwrap_or(defaults.port),
            static_assets: args
                .static_dir
                .clone()
                .or_else(|| toml.static_assets.clone()),
            model: args
                .model
                .clone()
                .or_else(|| toml.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            model_base_url: args
                .model_base_url
                .clone()
                .or_else(|| toml.model_base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_address, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", addr, e))
    }
}

/// Persistent store for the user's credential
///
/// The key is cached in memory; writes go through to the TOML file. An
/// in-memory store (no path) never touches disk.
#[derive(Clone)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    key: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Load the stored key from the TOML file at `path`
    pub fn load(path: &Path) -> Self {
        let key = load_toml_config(path).gemini_api_key;
        debug!(
            "Credential store at {} ({})",
            path.display(),
            if key.is_some() { "key present" } else { "empty" }
        );

        Self {
            path: Some(path.to_path_buf()),
            key: Arc::new(RwLock::new(key)),
        }
    }

    pub fn in_memory(key: Option<String>) -> Self {
        Self {
            path: None,
            key: Arc::new(RwLock::new(key)),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.key.read().await.clone()
    }

    /// Store a well-formed key (trimmed)
    pub async fn set(&self, credential: &Credential) -> mscope_common::Result<()> {
        let mut guard = self.key.write().await;
        self.persist(Some(credential.as_str().to_string())).await?;
        *guard = Some(credential.as_str().to_string());
        info!("Stored API key updated");
        Ok(())
    }

    pub async fn clear(&self) -> mscope_common::Result<()> {
        let mut guard = self.key.write().await;
        self.persist(None).await?;
        *guard = None;
        info!("Stored API key cleared");
        Ok(())
    }

    /// Write the key to the TOML file off the async runtime
    async fn persist(&self, key: Option<String>) -> mscope_common::Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        tokio::task::spawn_blocking(move || write_key(&path, key))
            .await
            .map_err(|e| mscope_common::Error::Io(std::io::Error::other(e)))?
    }
}

/// Read-modify-write so other TOML fields survive
fn write_key(path: &Path, key: Option<String>) -> mscope_common::Result<()> {
    let mut config = if path.exists() {
        read_toml_config(path)?
    } else {
        TomlConfig::default()
    };
    config.gemini_api_key = key;
    write_toml_config(&config, path)
}

/// The three credential sources in precedence order
#[derive(Clone)]
pub struct CredentialSources {
    store: CredentialStore,
    process_default: Option<String>,
}

impl CredentialSources {
    pub fn new(store: CredentialStore, process_default: Option<String>) -> Self {
        Self {
            store,
            process_default,
        }
    }

    /// Capture `GEMINI_API_KEY` once at startup
    pub fn from_env(store: CredentialStore) -> Self {
        let process_default = std::env::var(PROCESS_CREDENTIAL_ENV).ok();
        Self::new(store, process_default)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub async fn resolve(
        &self,
        explicit: Option<&str>,
    ) -> Result<Credential, CredentialError> {
        let stored = self.store.get().await;
        let (credential, source) =
            resolve_credential(explicit, stored.as_deref(), self.process_default.as_deref())?;
        debug!(source = source.as_str(), "Resolved API key");
        Ok(credential)
    }

    pub async fn status(&self, model: &str) -> CredentialStatus {
        let stored = self.store.get().await;
        CredentialStatus {
            stored_key: stored.as_deref().and_then(Credential::parse).is_some(),
            process_default_key: self
                .process_default
                .as_deref()
                .and_then(Credential::parse)
                .is_some(),
            model: model.to_string(),
        }
    }

    /// Source a resolution would pick, for logging and status only
    pub async fn active_source(&self) -> Option<CredentialSource> {
        let stored = self.store.get().await;
        resolve_credential(None, stored.as_deref(), self.process_default.as_deref())
            .ok()
            .map(|(_, source)| source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_beats_toml_beats_default() {
        let toml = TomlConfig {
            port: Some(4000),
            bind_address: Some("127.0.0.1".to_string()),
            model: Some("gemini-from-toml".to_string()),
            ..Default::default()
        };
        let args = ServerArgs {
            port: Some(5000),
            ..Default::default()
        };

        let config = ServerConfig::resolve(&args, &toml);

        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.model, "gemini-from-toml");
        assert_eq!(config.model_base_url, DEFAULT_BASE_URL);
        assert!(config.static_assets.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(&ServerArgs::default(), &TomlConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[tokio::test]
    async fn test_store_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 3100\n").unwrap();

        let store = CredentialStore::load(&path);
        assert!(store.get().await.is_none());

        store
            .set(&Credential::parse(" AIzaPersisted ").unwrap())
            .await
            .unwrap();

        let reloaded = CredentialStore::load(&path);
        assert_eq!(reloaded.get().await.as_deref(), Some("AIzaPersisted"));
        assert_eq!(read_toml_config(&path).unwrap().port, Some(3100));

        reloaded.clear().await.unwrap();
        assert!(CredentialStore::load(&path).get().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_write_leaves_cached_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gemini_api_key = \"AIzaOld\"\n").unwrap();
        let store = CredentialStore::load(&path);

        std::fs::write(&path, "port = [not toml").unwrap();
        assert!(store.set(&Credential::parse("AIzaNew").unwrap()).await.is_err());
        assert!(store.clear().await.is_err());

        assert_eq!(store.get().await.as_deref(), Some("AIzaOld"));
    }

    #[tokio::test]
    async fn test_sources_precedence() {
        let sources = CredentialSources::new(
            CredentialStore::in_memory(Some("AIzaStored".to_string())),
            Some("AIzaEnv".to_string()),
        );

        assert_eq!(sources.resolve(Some("AIzaExplicit")).await.unwrap().as_str(), "AIzaExplicit");
        assert_eq!(sources.resolve(None).await.unwrap().as_str(), "AIzaStored");
        assert_eq!(sources.active_source().await, Some(CredentialSource::Stored));

        sources.store().clear().await.unwrap();
        assert_eq!(sources.resolve(Some("  ")).await.unwrap().as_str(), "AIzaEnv");
    }

    #[tokio::test]
    async fn test_status_ignores_malformed_keys() {
        let sources = CredentialSources::new(
            CredentialStore::in_memory(Some("not-a-key".to_string())),
            Some("AIzaEnv".to_string()),
        );

        let status = sources.status("gemini-2.0-flash").await;
        assert!(!status.stored_key);
        assert!(status.process_default_key);
        assert_eq!(status.model, "gemini-2.0-flash");
    }
}

use crate::{
    app::{backend::ExtractBackend, remote::ExtractRemote, session::ExtractionSession},
    config::Config,
    links::LinkBuilder,
    storage,
    store::PersistentStore,
};
use anyhow::{Context, Result};
use homedir::my_home;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Everything the CLI needs, wired together once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<PersistentStore>,
    pub backend: Arc<dyn ExtractBackend>,
    pub session: ExtractionSession,
    pub links: LinkBuilder,
}

/// Application factory for creating and configuring application components
pub struct AppFactory;

impl AppFactory {
    pub fn create_context(paths: &AppPaths) -> Result<AppContext> {
        let config = Config::load_with(&paths.base_path)?;
        let server_addr = Self::server_addr(&config);

        let storage = storage::BackendLocal::new(&paths.base_path)
            .context("Failed to open application data directory")?;
        let store = Arc::new(PersistentStore::new(Arc::new(storage)));

        let backend: Arc<dyn ExtractBackend> = Arc::new(ExtractRemote::new(
            &server_addr,
            config.request_timeout_secs.map(Duration::from_secs),
            Self::parse_basic_auth(),
            Self::parse_bearer_token(),
        )?);
        log::debug!("using extraction server {server_addr}");

        let session = ExtractionSession::new(backend.clone(), store.clone(), config.hint_rules());
        let links = LinkBuilder::new(&server_addr);

        Ok(AppContext {
            config,
            store,
            backend,
            session,
            links,
        })
    }

    /// Get application paths with validation
    pub fn get_paths() -> Result<AppPaths> {
        let base_path = Self::get_base_path()?;

        // Ensure base directory exists
        std::fs::create_dir_all(&base_path)
            .context("Failed to create application base directory")?;

        Ok(AppPaths { base_path })
    }

    fn get_base_path() -> Result<PathBuf> {
        if let Ok(base_path) = std::env::var("AOI_BASE_PATH") {
            return Ok(PathBuf::from(base_path));
        }

        let home = my_home()
            .context("Could not determine home directory")?
            .context("Home directory path is empty")?;
        Ok(home.join(".local/share/aoi"))
    }

    fn server_addr(config: &Config) -> String {
        std::env::var("AOI_ADDR")
            .ok()
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| config.server_addr.clone())
    }

    /// Parse basic authentication from environment
    fn parse_basic_auth() -> Option<(String, Option<String>)> {
        let ba = std::env::var("AOI_BASIC_AUTH").ok()?;
        match ba.split_once(':') {
            None if !ba.is_empty() => Some((ba, None)),
            Some((username, password)) if !username.is_empty() => {
                Some((username.to_string(), Some(password.to_string())))
            }
            _ => {
                log::warn!(
                    "Invalid AOI_BASIC_AUTH format. Expected 'username' or 'username:password'"
                );
                None
            }
        }
    }

    /// Parse bearer token from environment
    fn parse_bearer_token() -> Option<String> {
        std::env::var("AOI_AUTH_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// Application paths structure
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub base_path: PathBuf,
}

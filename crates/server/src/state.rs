//! Shared application state.

use std::sync::Arc;

use scrapi_client::fetch::{FetchClient, FetchConfig};
use scrapi_core::cache::FileCache;
use scrapi_core::config::AppConfig;
use scrapi_core::definitions::Definitions;

use crate::router::EndpointTable;

/// Immutable state shared by every request handler.
///
/// Everything here is read-only after startup; the cache directory on
/// disk is the only mutable resource, and it is unlocked by design
/// (concurrent writers race benignly, last writer wins).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub definitions: Arc<Definitions>,
    pub cache: Arc<FileCache>,
    pub fetcher: Arc<FetchClient>,
    pub endpoints: Arc<EndpointTable>,
}

impl AppState {
    pub fn new(config: AppConfig, definitions: Definitions) -> anyhow::Result<Self> {
        let fetcher = FetchClient::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        })?;
        let cache = FileCache::new(config.cache_dir.clone());

        Ok(Self {
            config: Arc::new(config),
            definitions: Arc::new(definitions),
            cache: Arc::new(cache),
            fetcher: Arc::new(fetcher),
            endpoints: Arc::new(EndpointTable::standard()),
        })
    }
}

//! Application state wiring the registry and configuration together.
//!
//! Every command gets a fresh registry: Parley keeps nothing between runs.

use std::path::Path;
use std::sync::Arc;

use parley_core::chat::memory::InMemoryChatRegistry;
use parley_core::chat::service::MessageService;
use parley_infra::config::load_config;
use parley_infra::filesystem::resolve_data_dir;
use parley_types::config::ParleyConfig;

/// Message service pinned to the in-memory registry.
pub type ConcreteMessageService = MessageService<InMemoryChatRegistry>;

pub struct AppState {
    pub registry: Arc<InMemoryChatRegistry>,
    pub config: ParleyConfig,
}

impl AppState {
    /// Load configuration from the resolved data directory and start with an
    /// empty registry.
    pub async fn init() -> Self {
        let data_dir = resolve_data_dir();
        Self::from_data_dir(&data_dir).await
    }

    pub async fn from_data_dir(data_dir: &Path) -> Self {
        let config = load_config(data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), ?config, "Configuration loaded");
        Self::with_config(config)
    }

    pub fn with_config(config: ParleyConfig) -> Self {
        Self {
            registry: Arc::new(InMemoryChatRegistry::new()),
            config,
        }
    }

    /// A service acting as `user_id` against the shared registry.
    pub fn service_for(&self, user_id: &str) -> ConcreteMessageService {
        MessageService::with_config(Arc::clone(&self.registry), user_id, self.config.clone())
    }
}

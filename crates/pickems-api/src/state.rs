//! Application state wiring the services together.
//!
//! Services are generic over the filesystem and chat-platform ports, but
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use pickems_core::service::bootstrap::TenantBootstrapper;
use pickems_core::service::entities::EntityService;
use pickems_core::service::mirror::SettingsMirror;
use pickems_core::storage::DocumentStore;
use pickems_infra::filesystem::{LocalFileSystem, resolve_data_dir};
use pickems_infra::platform::SerenityPlatform;
use pickems_types::config::PickemsConfig;

/// Environment variable holding the Discord bot token.
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteEntityService = EntityService<LocalFileSystem>;
pub type ConcreteMirror = SettingsMirror<SerenityPlatform>;
pub type ConcreteBootstrapper = TenantBootstrapper<SerenityPlatform>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub entities: Arc<ConcreteEntityService>,
    pub config: PickemsConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Wire the document store for a loaded config.
    ///
    /// The data directory itself is created lazily by the first write.
    pub fn new(config: PickemsConfig) -> Self {
        let data_dir = resolve_data_dir(&config);
        tracing::debug!(data_dir = %data_dir.display(), "Resolved data directory");

        let store = DocumentStore::new(LocalFileSystem::new(), data_dir.clone());

        Self {
            entities: Arc::new(EntityService::new(store)),
            config,
            data_dir,
        }
    }

    /// Build a Discord client from `DISCORD_TOKEN`.
    pub fn platform(&self) -> anyhow::Result<SerenityPlatform> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .with_context(|| format!("{TOKEN_ENV} is not set; it is required to talk to Discord"))?;
        Ok(SerenityPlatform::new(token.trim()))
    }

    pub fn mirror(&self) -> anyhow::Result<ConcreteMirror> {
        Ok(SettingsMirror::new(self.platform()?))
    }

    pub fn bootstrapper(&self) -> anyhow::Result<ConcreteBootstrapper> {
        Ok(TenantBootstrapper::new(
            self.platform()?,
            self.config.provisioning.clone(),
        ))
    }
}

//! CLI command implementations.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod resources;
pub mod upload;

use std::sync::Arc;

use anyhow::{Context, Result};

use rentadmin_client::{AdapterContext, GatewayClient};
use rentadmin_core::auth::AuthBridge;
use rentadmin_core::config::Config;
use rentadmin_core::credentials::{CredentialStore, FileCredentialStore};

/// Load config from the default location, falling back to defaults.
pub fn load_config() -> Result<Config> {
    let path = Config::default_path();
    if path.exists() {
        return Config::load_default()
            .with_context(|| format!("Failed to load {}", path.display()));
    }
    let config = Config::default().with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// The persisted session store for this machine.
pub fn credential_store(config: &Config) -> Arc<dyn CredentialStore> {
    Arc::new(FileCredentialStore::new(
        &Config::credentials_dir(),
        config.cookie_settings(),
    ))
}

/// Adapter context over the persisted session.
///
/// The gateway reads tokens through the in-process auth bridge; adapters
/// check presence on the store directly.
pub fn adapter_context(config: &Config) -> Result<AdapterContext> {
    let store = credential_store(config);
    let tokens = Arc::new(AuthBridge::new(store.clone()));
    let gateway = GatewayClient::new(config.api.base_url.clone(), tokens)?;
    Ok(AdapterContext::new(Arc::new(gateway), store))
}

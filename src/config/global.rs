//! User-wide MCM settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_HTTP_TIMEOUT, DEFAULT_MEMORY_GB, DEFAULT_SERVICE_DIR,
    ENV_CONFIG, FORGE_FILES_URL, PAPER_API_URL, VANILLA_MANIFEST_URL, default_user_agent,
};
use crate::core::McmError;
use crate::registry::RegistryStore;

/// Global configuration loaded from `config.toml`.
///
/// # Examples
///
/// ```rust
/// use mcm_cli::config::GlobalConfig;
///
/// let config: GlobalConfig = toml::from_str("memory_gb = 8").unwrap();
/// assert_eq!(config.memory_gb, 8);
/// assert!(config.create_service);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Registry document location. `MCM_REGISTRY_PATH` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<String>,

    /// Directory receiving `<name>.service` unit files.
    pub service_dir: String,

    /// Whether `create` writes a unit file at all.
    pub create_service: bool,

    /// Heap size in gigabytes passed to `-Xms`/`-Xmx` by the launch script.
    pub memory_gb: u32,

    /// Per-request timeout for upstream metadata and downloads.
    pub http_timeout_secs: u64,

    /// `User-Agent` header sent upstream.
    pub user_agent: String,

    /// Upstream endpoints, overridable for mirrors.
    pub upstream: UpstreamConfig,
}

/// Base URLs of the three distributors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Mojang launcher version manifest.
    pub vanilla_manifest_url: String,
    /// Paper API v1 project endpoint.
    pub paper_api_url: String,
    /// Forge files index (root of the `index_<version>.html` pages).
    pub forge_files_url: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            registry_path: None,
            service_dir: DEFAULT_SERVICE_DIR.to_string(),
            create_service: true,
            memory_gb: default_memory_gb(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
            user_agent: default_user_agent(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            vanilla_manifest_url: VANILLA_MANIFEST_URL.to_string(),
            paper_api_url: PAPER_API_URL.to_string(),
            forge_files_url: FORGE_FILES_URL.to_string(),
        }
    }
}

impl GlobalConfig {
    /// Loads configuration from the default location.
    ///
    /// A missing file yields [`GlobalConfig::default`].
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Loads from `path` when given, otherwise from [`default_path`](Self::default_path).
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads from a specific file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| McmError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file path.
    ///
    /// `MCM_CONFIG` wins when set; otherwise `<config dir>/mcm/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            return Ok(expand_path(&path));
        }
        let config_dir = dirs::config_dir().ok_or_else(|| McmError::ConfigError {
            message: "Unable to determine config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Rejects values that would produce an unusable server or client.
    pub fn validate(&self) -> Result<(), McmError> {
        if self.memory_gb == 0 {
            return Err(McmError::ConfigError {
                message: "memory_gb must be at least 1".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(McmError::ConfigError {
                message: "http_timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the registry store this configuration points at.
    pub fn registry(&self) -> Result<RegistryStore> {
        if std::env::var_os(crate::constants::ENV_REGISTRY_PATH).is_none()
            && let Some(path) = &self.registry_path
        {
            return Ok(RegistryStore::new(expand_path(path)));
        }
        Ok(RegistryStore::new(RegistryStore::default_path()?))
    }

    /// Directory for unit files, with `~` and variables expanded.
    pub fn service_dir(&self) -> PathBuf {
        expand_path(&self.service_dir)
    }

    /// Request timeout as a [`Duration`].
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Default heap size: physical memory in whole GiB, capped at
/// [`DEFAULT_MEMORY_GB`].
fn default_memory_gb() -> u32 {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    memory_gb_for(system.total_memory())
}

fn memory_gb_for(total_bytes: u64) -> u32 {
    if total_bytes == 0 {
        // unknown
        return DEFAULT_MEMORY_GB;
    }
    let gib = total_bytes / (1024 * 1024 * 1024);
    u32::try_from(gib).unwrap_or(u32::MAX).clamp(1, DEFAULT_MEMORY_GB)
}

/// Expands `~` and environment variables; falls back to the literal on failure.
fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.service_dir, "/etc/systemd/system");
        assert!(config.create_service);
        assert!((1..=DEFAULT_MEMORY_GB).contains(&config.memory_gb));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("mcm/"));
        assert_eq!(config.upstream.paper_api_url, "https://papermc.io/api/v1/paper");
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config: GlobalConfig = toml::from_str(
            r#"
            memory_gb = 2

            [upstream]
            forge_files_url = "http://mirror.local/forge"
            "#,
        )
        .unwrap();

        assert_eq!(config.memory_gb, 2);
        assert_eq!(config.upstream.forge_files_url, "http://mirror.local/forge");
        assert_eq!(config.upstream.vanilla_manifest_url, VANILLA_MANIFEST_URL);
        assert_eq!(config.service_dir, DEFAULT_SERVICE_DIR);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("config.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_load_invalid_toml_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "memory_gb = \"lots\"").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<McmError>(),
            Some(McmError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_default_memory_is_capped_by_physical_memory() {
        const GIB: u64 = 1024 * 1024 * 1024;
        assert_eq!(memory_gb_for(32 * GIB), 4);
        assert_eq!(memory_gb_for(3 * GIB + GIB / 2), 3);
        assert_eq!(memory_gb_for(GIB / 2), 1);
        assert_eq!(memory_gb_for(0), 4);
    }

    #[tokio::test]
    async fn test_load_rejects_zero_memory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "memory_gb = 0").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<McmError>(),
            Some(McmError::ConfigError { message }) if message.contains("memory_gb")
        ));
    }

    #[test]
    #[serial]
    fn test_registry_path_expands_home() {
        // SAFETY: serialised with every other test touching the environment.
        unsafe { std::env::remove_var(crate::constants::ENV_REGISTRY_PATH) };
        let config = GlobalConfig {
            registry_path: Some("~/mcm-test/saves.json".to_string()),
            ..GlobalConfig::default()
        };

        let store = config.registry().unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(store.path(), home.join("mcm-test").join("saves.json"));
    }

    #[test]
    #[serial]
    fn test_registry_env_override_wins() {
        let temp = tempdir().unwrap();
        let override_path = temp.path().join("env-saves.json");
        // SAFETY: serialised with every other test touching the environment.
        unsafe { std::env::set_var(crate::constants::ENV_REGISTRY_PATH, &override_path) };
        let config = GlobalConfig {
            registry_path: Some("/ignored/saves.json".to_string()),
            ..GlobalConfig::default()
        };

        let store = config.registry().unwrap();
        unsafe { std::env::remove_var(crate::constants::ENV_REGISTRY_PATH) };
        assert_eq!(store.path(), override_path);
    }
}

//! Global constants used throughout the MCM codebase.
//!
//! Upstream endpoints, file names, environment variable names, and the
//! network timing parameters shared by the resolvers and the downloader.

use std::time::Duration;

/// Mojang launcher metadata listing every released version.
pub const VANILLA_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Root of the Paper v1 build API (`/{version}`, `/{version}/{build}/download`).
pub const PAPER_API_URL: &str = "https://papermc.io/api/v1/paper";

/// Root of the Forge files site. The latest/recommended page lives at the
/// root and per-version pages at `index_{version}.html`.
pub const FORGE_FILES_URL: &str = "https://files.minecraftforge.net/net/minecraftforge/forge";

/// Directory systemd reads unit files from.
pub const DEFAULT_SERVICE_DIR: &str = "/etc/systemd/system";

/// Name of the launch script written into every installation directory.
pub const START_SCRIPT_NAME: &str = "start.sh";

/// Marker left in directories `mcm create` made itself. Only such
/// directories are deleted by `mcm remove --delete-files`.
pub const MANAGED_MARKER: &str = ".mcm-managed";

/// File name of the registry document inside the config directory.
pub const REGISTRY_FILE_NAME: &str = "saves.json";

/// File name of the global configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the user's config dir (`~/.config/mcm`).
pub const APP_DIR_NAME: &str = "mcm";

/// Overrides the global config file location.
pub const ENV_CONFIG: &str = "MCM_CONFIG";

/// Overrides the registry document location.
pub const ENV_REGISTRY_PATH: &str = "MCM_REGISTRY_PATH";

/// Disables progress bars when set to any value.
pub const ENV_NO_PROGRESS: &str = "MCM_NO_PROGRESS";

/// Default per-request timeout for metadata and artifact requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay before the single retry of a failed metadata request.
pub const RETRY_DELAY_MS: u64 = 500;

/// Number of retries after the first failed metadata request.
pub const METADATA_RETRIES: usize = 1;

/// Default JVM heap size in gigabytes written into launch scripts.
pub const DEFAULT_MEMORY_GB: u32 = 4;

/// User agent sent with every upstream request.
pub fn default_user_agent() -> String {
    format!("mcm/{}", env!("CARGO_PKG_VERSION"))
}

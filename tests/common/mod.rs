//! Shared setup for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated config, registry and working directory for one `mcm` invocation.
pub struct TestEnvironment {
    pub temp: TempDir,
}

impl TestEnvironment {
    /// Empty environment whose upstreams point at a closed local port.
    pub fn new() -> anyhow::Result<Self> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("work"))?;
        fs::create_dir_all(temp.path().join("units"))?;
        fs::write(
            temp.path().join("config.toml"),
            format!(
                r#"service_dir = "{units}"
http_timeout_secs = 2

[upstream]
vanilla_manifest_url = "http://127.0.0.1:9/mc/game/version_manifest.json"
paper_api_url = "http://127.0.0.1:9/api/v1/paper"
forge_files_url = "http://127.0.0.1:9/net/minecraftforge/forge"
"#,
                units = temp.path().join("units").display()
            ),
        )?;
        Ok(Self { temp })
    }

    /// Environment with `records` already registered.
    pub fn with_registry(records: serde_json::Value) -> anyhow::Result<Self> {
        let env = Self::new()?;
        fs::write(env.registry_path(), serde_json::to_string_pretty(&records)?)?;
        Ok(env)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.temp.path().join("saves.json")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.temp.path().join("work")
    }

    pub fn units_dir(&self) -> PathBuf {
        self.temp.path().join("units")
    }

    /// Creates a server directory under the working directory.
    pub fn server_dir(&self, name: &str) -> anyhow::Result<PathBuf> {
        let dir = self.work_dir().join(name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("start.sh"), "#!/usr/bin/env bash\n")?;
        fs::write(dir.join(".mcm-managed"), format!("{name}\n"))?;
        Ok(dir)
    }

    pub fn registry(&self) -> serde_json::Value {
        read_json(&self.registry_path())
    }

    pub fn mcm_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("mcm").unwrap();
        cmd.current_dir(self.work_dir())
            .env("MCM_CONFIG", self.temp.path().join("config.toml"))
            .env("MCM_REGISTRY_PATH", self.registry_path())
            .env("MCM_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

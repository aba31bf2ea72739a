//! Registry of installed servers.
//!
//! The registry is a single JSON document (by default
//! `~/.config/mcm/saves.json`) holding an ordered array of
//! [`InstallationRecord`]s. It is the only place MCM looks to answer "which
//! servers exist", and it guards creation against name and path collisions.
//!
//! # Storage model
//!
//! Every mutation loads the whole document, changes it in memory and writes
//! the whole document back. A missing document, or a missing config
//! directory, reads as an empty registry.
//!
//! There is no locking: two `mcm` processes mutating the registry at the same
//! time can each read the same state and the later write wins, dropping the
//! other's change. MCM does not support concurrent invocations.
//!
//! # Document format
//!
//! ```json
//! [
//!     {
//!         "name": "survival",
//!         "fork": "paper",
//!         "version": "1.16.4-416",
//!         "path": "/srv/minecraft/survival"
//!     }
//! ]
//! ```

mod error;

pub use error::RegistryError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{APP_DIR_NAME, ENV_REGISTRY_PATH, REGISTRY_FILE_NAME};
use crate::core::{ForkTag, McmError};
use crate::utils::fs::atomic_write;

/// One installed server.
///
/// `name`, `fork` and `path` never change after creation; `version` is
/// rewritten by `mcm update` once the new jar is on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Unique, alphanumeric server name.
    pub name: String,
    /// The distribution that created the server and resolves its updates.
    pub fork: ForkTag,
    /// Label of the jar currently installed (`1.20.1`, `1.16.4-416`, ...).
    pub version: String,
    /// Absolute path of the installation directory.
    pub path: PathBuf,
}

impl InstallationRecord {
    /// Creates a record for a freshly installed server.
    pub fn new(
        name: impl Into<String>,
        fork: impl Into<ForkTag>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            fork: fork.into(),
            version: version.into(),
            path: path.into(),
        }
    }
}

/// File-backed store for [`InstallationRecord`]s.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Creates a store backed by the document at `path`.
    ///
    /// Nothing is read or created until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Default document location.
    ///
    /// `MCM_REGISTRY_PATH` wins when set; otherwise the document lives in the
    /// user's config directory (`~/.config/mcm/saves.json` on Linux).
    pub fn default_path() -> anyhow::Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_REGISTRY_PATH) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().ok_or_else(|| McmError::ConfigError {
            message: "Unable to determine config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR_NAME).join(REGISTRY_FILE_NAME))
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in stored order.
    ///
    /// A missing document is an empty registry. So is a document containing
    /// only whitespace.
    pub fn load(&self) -> Result<Vec<InstallationRecord>, RegistryError> {
        if !self.path.exists() {
            debug!("Registry {} does not exist, treating as empty", self.path.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes `records` as the complete registry, replacing the document.
    pub fn save(&self, records: &[InstallationRecord]) -> Result<(), RegistryError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut serializer).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })?;
        buf.push(b'\n');

        atomic_write(&self.path, &buf).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Looks up a record by server name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<InstallationRecord>, RegistryError> {
        Ok(self.load()?.into_iter().find(|record| record.name == name))
    }

    /// Looks up a record by installation directory.
    pub fn find_by_path(&self, path: &Path) -> Result<Option<InstallationRecord>, RegistryError> {
        Ok(self.load()?.into_iter().find(|record| record.path == path))
    }

    /// Returns `true` when a record already uses `name` or `path`.
    pub fn exists(&self, name: &str, path: &Path) -> Result<bool, RegistryError> {
        Ok(self.load()?.iter().any(|record| record.name == name || record.path == path))
    }

    /// Appends `record` and rewrites the document.
    ///
    /// Callers are expected to have checked [`exists`](Self::exists) first; a
    /// colliding record is logged and still appended.
    pub fn append_and_persist(&self, record: InstallationRecord) -> Result<(), RegistryError> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.name == record.name || r.path == record.path) {
            warn!("A server with the name '{}' or path {} already exists", record.name, record.path.display());
        }
        records.push(record);
        self.save(&records)
    }

    /// Replaces the `version` of the record named `name`, keeping its position.
    ///
    /// Returns the updated record.
    pub fn update_version_and_persist(
        &self,
        name: &str,
        new_version: &str,
    ) -> Result<InstallationRecord, RegistryError> {
        let mut records = self.load()?;
        let record = records.iter_mut().find(|record| record.name == name).ok_or_else(|| {
            RegistryError::NotFound {
                name: name.to_string(),
            }
        })?;
        record.version = new_version.to_string();
        let updated = record.clone();
        self.save(&records)?;
        Ok(updated)
    }

    /// Removes the record named `name`, keeping the order of the others.
    ///
    /// Returns the removed record.
    pub fn remove_and_persist(&self, name: &str) -> Result<InstallationRecord, RegistryError> {
        let mut records = self.load()?;
        let index = records.iter().position(|record| record.name == name).ok_or_else(|| {
            RegistryError::NotFound {
                name: name.to_string(),
            }
        })?;
        let removed = records.remove(index);
        self.save(&records)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fork;
    use tempfile::tempdir;

    fn record(name: &str, fork: Fork, version: &str, path: &str) -> InstallationRecord {
        InstallationRecord::new(name, fork, version, path)
    }

    fn store_in(dir: &Path) -> RegistryStore {
        RegistryStore::new(dir.join("mcm").join("saves.json"))
    }

    #[test]
    fn test_load_missing_document_is_empty() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_whitespace_document_is_empty() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(RegistryError::Parse { .. })));
    }

    #[test]
    fn test_append_creates_directory_and_preserves_order() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());

        let first = record("alpha", Fork::Vanilla, "1.20.1", "/srv/alpha");
        let second = record("beta", Fork::Paper, "1.16.4-416", "/srv/beta");
        store.append_and_persist(first.clone()).unwrap();
        store.append_and_persist(second.clone()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_document_format_matches_saves_json() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        store.append_and_persist(record("s1", Fork::Vanilla, "1.20.1", "/srv/s1")).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "name": "s1",
                "fork": "vanilla",
                "version": "1.20.1",
                "path": "/srv/s1"
            }])
        );
        assert!(content.contains("\n    {"));
    }

    #[test]
    fn test_find_by_name_and_path() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        store.append_and_persist(record("alpha", Fork::Forge, "1.12.2-14.23.5.2854", "/srv/alpha")).unwrap();

        assert_eq!(store.find_by_name("alpha").unwrap().unwrap().version, "1.12.2-14.23.5.2854");
        assert!(store.find_by_name("Alpha").unwrap().is_none());
        assert_eq!(store.find_by_path(Path::new("/srv/alpha")).unwrap().unwrap().name, "alpha");
        assert!(store.find_by_path(Path::new("/srv/beta")).unwrap().is_none());
    }

    #[test]
    fn test_exists_matches_name_or_path() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        store.append_and_persist(record("alpha", Fork::Vanilla, "1.20.1", "/srv/alpha")).unwrap();

        // overlapping name, disjoint path
        assert!(store.exists("alpha", Path::new("/srv/other")).unwrap());
        // disjoint name, overlapping path
        assert!(store.exists("other", Path::new("/srv/alpha")).unwrap());
        // both overlapping
        assert!(store.exists("alpha", Path::new("/srv/alpha")).unwrap());
        // fully disjoint
        assert!(!store.exists("other", Path::new("/srv/other")).unwrap());
    }

    #[test]
    fn test_update_version_changes_only_target_version() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        let first = record("alpha", Fork::Vanilla, "1.20.1", "/srv/alpha");
        let second = record("beta", Fork::Paper, "1.16.4-415", "/srv/beta");
        let third = record("gamma", Fork::Forge, "1.12.2-14.23.5.2854", "/srv/gamma");
        for r in [&first, &second, &third] {
            store.append_and_persist(r.clone()).unwrap();
        }

        let updated = store.update_version_and_persist("beta", "1.16.4-416").unwrap();
        assert_eq!(updated.version, "1.16.4-416");

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0], first);
        assert_eq!(loaded[1].name, "beta");
        assert_eq!(loaded[1].fork, second.fork);
        assert_eq!(loaded[1].path, second.path);
        assert_eq!(loaded[1].version, "1.16.4-416");
        assert_eq!(loaded[2], third);
    }

    #[test]
    fn test_update_version_missing_name_is_not_found() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        store.append_and_persist(record("alpha", Fork::Vanilla, "1.20.1", "/srv/alpha")).unwrap();

        let result = store.update_version_and_persist("beta", "1.20.2");
        assert!(matches!(result, Err(RegistryError::NotFound { ref name }) if name == "beta"));
        assert_eq!(store.load().unwrap()[0].version, "1.20.1");
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        let a = record("a", Fork::Vanilla, "1.20.1", "/srv/a");
        let b = record("b", Fork::Vanilla, "1.20.1", "/srv/b");
        let c = record("c", Fork::Vanilla, "1.20.1", "/srv/c");
        for r in [&a, &b, &c] {
            store.append_and_persist(r.clone()).unwrap();
        }

        let removed = store.remove_and_persist("b").unwrap();
        assert_eq!(removed, b);
        assert_eq!(store.load().unwrap(), vec![a, c]);
        assert!(matches!(store.remove_and_persist("b"), Err(RegistryError::NotFound { .. })));
    }

    #[test]
    fn test_unknown_fork_survives_rewrite() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"[{"name":"modded","fork":"fabric","version":"0.14","path":"/srv/modded"}]"#,
        )
        .unwrap();

        store.append_and_persist(record("plain", Fork::Vanilla, "1.20.1", "/srv/plain")).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].fork.as_str(), "fabric");
        assert_eq!(loaded[0].fork.known(), None);
        assert_eq!(loaded[1].fork.known(), Some(Fork::Vanilla));
    }

    #[test]
    fn test_untouched_records_keep_their_fork_spelling() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"[{"name":"old","fork":"direct-release","version":"1.8.9","path":"/srv/old"},
                {"name":"lobby","fork":"Paper","version":"1.16.4-415","path":"/srv/lobby"}]"#,
        )
        .unwrap();

        store.update_version_and_persist("lobby", "1.16.4-416").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["fork"], "direct-release");
        assert_eq!(raw[1]["fork"], "Paper");
        assert_eq!(store.find_by_name("lobby").unwrap().unwrap().fork.known(), Some(Fork::Paper));
    }

    /// Read-modify-write has no conflict detection: a writer that loaded
    /// before another process appended will drop that process's record.
    #[test]
    fn test_concurrent_writers_lose_updates() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("saves.json");
        let first_process = RegistryStore::new(&path);
        let second_process = RegistryStore::new(&path);

        let mut stale = first_process.load().unwrap();
        second_process
            .append_and_persist(record("second", Fork::Vanilla, "1.20.1", "/srv/second"))
            .unwrap();
        stale.push(record("first", Fork::Vanilla, "1.20.1", "/srv/first"));
        first_process.save(&stale).unwrap();

        let names: Vec<String> = second_process.load().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first".to_string()]);
    }
}

//! In-memory [`PackageDatabase`] for tests and offline inspection.
//!
//! Packages are staged per repository before the repository is registered,
//! the way an on-disk sync database already holds its contents before
//! `pacman.conf` names it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use regex::RegexBuilder;

use super::database::PackageDatabase;
use crate::error::DatabaseError;

#[derive(Debug, Clone, Default)]
struct MemorySyncDb {
    name: String,
    servers: Vec<String>,
    packages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    architectures: Vec<String>,
    cache_dirs: Vec<PathBuf>,
    staged: BTreeMap<String, BTreeMap<String, String>>,
    sync_dbs: Vec<MemorySyncDb>,
    local: BTreeMap<String, String>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `name`/`version` as available in `repo` once it is registered
    pub fn with_sync_package(mut self, repo: &str, name: &str, version: &str) -> Self {
        self.staged
            .entry(repo.to_string())
            .or_default()
            .insert(name.to_string(), version.to_string());
        self
    }

    /// Mark `name` as installed at `version`
    pub fn with_local_package(mut self, name: &str, version: &str) -> Self {
        self.local.insert(name.to_string(), version.to_string());
        self
    }

    pub fn cache_dirs(&self) -> &[PathBuf] {
        &self.cache_dirs
    }

    /// Servers registered for `repo`, `None` if it was never registered
    pub fn servers(&self, repo: &str) -> Option<&[String]> {
        self.find(repo).map(|db| db.servers.as_slice())
    }

    pub fn is_registered(&self, repo: &str) -> bool {
        self.find(repo).is_some()
    }

    fn find(&self, repo: &str) -> Option<&MemorySyncDb> {
        self.sync_dbs.iter().find(|db| db.name == repo)
    }
}

impl PackageDatabase for MemoryDatabase {
    fn add_architecture(&mut self, arch: &str) -> Result<(), DatabaseError> {
        self.architectures.push(arch.to_string());
        Ok(())
    }

    fn architectures(&self) -> Vec<String> {
        self.architectures.clone()
    }

    fn set_cache_dirs(&mut self, dirs: &[PathBuf]) -> Result<(), DatabaseError> {
        self.cache_dirs = dirs.to_vec();
        Ok(())
    }

    fn register_sync_db(&mut self, name: &str, servers: &[String]) -> Result<(), DatabaseError> {
        if let Some(db) = self.sync_dbs.iter_mut().find(|db| db.name == name) {
            db.servers.extend_from_slice(servers);
            return Ok(());
        }

        self.sync_dbs.push(MemorySyncDb {
            name: name.to_string(),
            servers: servers.to_vec(),
            packages: self.staged.get(name).cloned().unwrap_or_default(),
        });
        Ok(())
    }

    fn sync_db_names(&self) -> Vec<String> {
        self.sync_dbs.iter().map(|db| db.name.clone()).collect()
    }

    fn search_names(&self, repo: &str, pattern: &str) -> Result<Vec<String>, DatabaseError> {
        let db = self
            .find(repo)
            .ok_or_else(|| DatabaseError::UnknownRepository(repo.to_string()))?;

        // libalpm compiles search needles case-insensitively
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DatabaseError::InvalidPattern(e.to_string()))?;

        Ok(db
            .packages
            .keys()
            .filter(|name| re.is_match(name))
            .cloned()
            .collect())
    }

    fn sync_version(&self, repo: &str, name: &str) -> Option<String> {
        self.find(repo)?.packages.get(name).cloned()
    }

    fn local_version(&self, name: &str) -> Option<String> {
        self.local.get(name).cloned()
    }
}

//! Package database seam.
//!
//! [`PackageDatabase`] is the narrow surface the configuration loader and the
//! kernel enumeration need from libalpm. [`AlpmDatabase`] forwards to a real
//! `alpm::Alpm` handle; [`MemoryDatabase`](super::memory::MemoryDatabase)
//! backs tests.

use std::path::PathBuf;

use alpm::{Alpm, Db, SigLevel};

use crate::error::DatabaseError;

/// Operations on a package-manager handle
pub trait PackageDatabase {
    /// Register an architecture accepted by the handle
    fn add_architecture(&mut self, arch: &str) -> Result<(), DatabaseError>;

    /// Registered architectures, first one is the primary
    fn architectures(&self) -> Vec<String>;

    /// Replace the package cache directory list
    fn set_cache_dirs(&mut self, dirs: &[PathBuf]) -> Result<(), DatabaseError>;

    /// Register a sync database and its mirror servers
    fn register_sync_db(&mut self, name: &str, servers: &[String]) -> Result<(), DatabaseError>;

    /// Names of registered sync databases, in registration order
    fn sync_db_names(&self) -> Vec<String>;

    /// Names of packages in `repo` matching the regular expression `pattern`
    fn search_names(&self, repo: &str, pattern: &str) -> Result<Vec<String>, DatabaseError>;

    /// Version of `name` in the sync database `repo`, if present
    fn sync_version(&self, repo: &str, name: &str) -> Option<String>;

    /// Version of `name` in the local (installed) database, if present
    fn local_version(&self, name: &str) -> Option<String>;
}

/// Add every server through `add`, logging and skipping the ones that fail.
/// Returns how many were added.
pub(crate) fn add_each_server<F>(repo: &str, servers: &[String], mut add: F) -> usize
where
    F: FnMut(&str) -> Result<(), DatabaseError>,
{
    let mut added = 0;
    for server in servers {
        match add(server.as_str()) {
            Ok(()) => added += 1,
            Err(e) => log::warn!("[Database] Could not add server {} to [{}]: {}", server, repo, e),
        }
    }
    added
}

/// libalpm-backed implementation
pub struct AlpmDatabase {
    handle: Alpm,
}

impl AlpmDatabase {
    /// Open a handle on `root` with the local database under `db_path`
    pub fn open(root: &str, db_path: &str) -> Result<Self, DatabaseError> {
        log::debug!("[Database] Opening libalpm handle: root={}, dbpath={}", root, db_path);
        let handle = Alpm::new(root, db_path)?;
        Ok(AlpmDatabase { handle })
    }

    pub fn from_handle(handle: Alpm) -> Self {
        AlpmDatabase { handle }
    }

    pub fn handle(&self) -> &Alpm {
        &self.handle
    }

    fn sync_db(&self, repo: &str) -> Result<&Db, DatabaseError> {
        self.handle
            .syncdbs()
            .into_iter()
            .find(|db| db.name() == repo)
            .ok_or_else(|| DatabaseError::UnknownRepository(repo.to_string()))
    }
}

impl PackageDatabase for AlpmDatabase {
    fn add_architecture(&mut self, arch: &str) -> Result<(), DatabaseError> {
        self.handle.add_architecture(arch)?;
        Ok(())
    }

    fn architectures(&self) -> Vec<String> {
        self.handle
            .architectures()
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    fn set_cache_dirs(&mut self, dirs: &[PathBuf]) -> Result<(), DatabaseError> {
        self.handle
            .set_cachedirs(dirs.iter().map(|d| d.to_string_lossy().into_owned()))?;
        Ok(())
    }

    fn register_sync_db(&mut self, name: &str, servers: &[String]) -> Result<(), DatabaseError> {
        let db = self.handle.register_syncdb_mut(name, SigLevel::USE_DEFAULT)?;
        add_each_server(name, servers, |server| {
            db.add_server(server)?;
            Ok(())
        });
        Ok(())
    }

    fn sync_db_names(&self) -> Vec<String> {
        self.handle
            .syncdbs()
            .iter()
            .map(|db| db.name().to_string())
            .collect()
    }

    fn search_names(&self, repo: &str, pattern: &str) -> Result<Vec<String>, DatabaseError> {
        let db = self.sync_db(repo)?;
        let needles = vec![pattern.to_string()];
        let found = db.search(needles.iter())?;
        Ok(found.iter().map(|pkg| pkg.name().to_string()).collect())
    }

    fn sync_version(&self, repo: &str, name: &str) -> Option<String> {
        let db = self.sync_db(repo).ok()?;
        db.pkg(name).ok().map(|pkg| pkg.version().as_str().to_string())
    }

    fn local_version(&self, name: &str) -> Option<String> {
        self.handle
            .localdb()
            .pkg(name)
            .ok()
            .map(|pkg| pkg.version().as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_server_does_not_stop_the_rest() {
        let servers = vec![
            "https://a.example/core".to_string(),
            "bad url".to_string(),
            "https://c.example/core".to_string(),
        ];
        let mut accepted = Vec::new();

        let added = add_each_server("core", &servers, |server| {
            if server.contains(' ') {
                return Err(DatabaseError::InvalidPattern(server.to_string()));
            }
            accepted.push(server.to_string());
            Ok(())
        });

        assert_eq!(added, 2);
        assert_eq!(accepted, vec!["https://a.example/core", "https://c.example/core"]);
    }

    #[test]
    fn test_no_servers_adds_nothing() {
        let added = add_each_server("core", &[], |_| Ok(()));
        assert_eq!(added, 0);
    }
}

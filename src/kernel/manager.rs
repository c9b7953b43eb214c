/// Kernel Manager module: kernel discovery over configured sync databases
///
/// This module handles:
/// - Finding kernel-headers packages in every sync database
/// - Deriving the base kernel package name from each headers package
/// - Resolving installed vs. available versions
///
/// A headers package whose base kernel cannot be found in the same repository
/// is dropped silently.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::database::PackageDatabase;
use crate::config::loader::configure_from_paths;
use crate::config::ConfigPaths;

/// Search needle handed to the package database
pub const HEADERS_PATTERN: &str = "linux[^ ]*-headers";

/// Userspace API headers, not tied to any kernel build
pub const IGNORED_PACKAGE: &str = "linux-api-headers";

pub const HEADERS_SUFFIX: &str = "-headers";

// Same case folding as the libalpm search, so only description hits are dropped
static HEADERS_NAME: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(HEADERS_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("headers pattern is valid")
});

/// A kernel package found in a sync database
#[derive(Clone)]
pub struct Kernel<'a> {
    db: &'a dyn PackageDatabase,
    repo: String,
    name: String,
}

impl<'a> Kernel<'a> {
    pub fn new(db: &'a dyn PackageDatabase, repo: impl Into<String>, name: impl Into<String>) -> Self {
        Kernel {
            db,
            repo: repo.into(),
            name: name.into(),
        }
    }

    /// Package name without the repository (e.g. "linux-zen")
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// "repo/name", as shown by `pacman -Sl`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.repo, self.name)
    }

    pub fn headers_name(&self) -> String {
        format!("{}{}", self.name, HEADERS_SUFFIX)
    }

    pub fn is_installed(&self) -> bool {
        self.db.local_version(&self.name).is_some()
    }

    pub fn installed_version(&self) -> Option<String> {
        self.db.local_version(&self.name)
    }

    pub fn sync_version(&self) -> Option<String> {
        self.db.sync_version(&self.repo, &self.name)
    }

    /// Installed version if present, otherwise the repository version
    pub fn version(&self) -> Option<String> {
        self.installed_version().or_else(|| self.sync_version())
    }

    pub fn info(&self) -> KernelInfo {
        let installed_version = self.installed_version();
        KernelInfo {
            name: self.name.clone(),
            repo: self.repo.clone(),
            qualified_name: self.qualified_name(),
            headers: self.headers_name(),
            installed: installed_version.is_some(),
            version: installed_version.or_else(|| self.sync_version()),
        }
    }
}

impl PartialEq for Kernel<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.repo == other.repo && self.name == other.name
    }
}

impl Eq for Kernel<'_> {}

impl fmt::Debug for Kernel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("repo", &self.repo)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Kernel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo, self.name)
    }
}

/// Owned snapshot of a [`Kernel`], detached from the database handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelInfo {
    pub name: String,
    pub repo: String,
    pub qualified_name: String,
    pub headers: String,
    pub version: Option<String>,
    pub installed: bool,
}

/// Derive the kernel package name from a headers package name.
///
/// Returns `None` for names that are not kernel headers: names that do not
/// match [`HEADERS_PATTERN`] and anything containing [`IGNORED_PACKAGE`].
///
/// ```
/// use kernel_finder::kernel::manager::kernel_name_from_headers;
///
/// assert_eq!(kernel_name_from_headers("linux-zen-headers"), Some("linux-zen".to_string()));
/// assert_eq!(kernel_name_from_headers("linux-api-headers"), None);
/// ```
pub fn kernel_name_from_headers(pkg_name: &str) -> Option<String> {
    if !HEADERS_NAME.is_match(pkg_name) || pkg_name.contains(IGNORED_PACKAGE) {
        return None;
    }
    Some(pkg_name.replace(HEADERS_SUFFIX, ""))
}

/// Enumerate kernels on an already-configured handle.
///
/// Output order follows sync database registration order, then the order in
/// which each database returns search hits.
pub fn find_kernels(db: &dyn PackageDatabase) -> Vec<Kernel<'_>> {
    let mut kernels = Vec::new();

    for repo in db.sync_db_names() {
        let hits = match db.search_names(&repo, HEADERS_PATTERN) {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("[KernelScan] Search failed in {}: {}", repo, e);
                continue;
            }
        };

        for pkg_name in hits {
            let Some(kernel_name) = kernel_name_from_headers(&pkg_name) else {
                continue;
            };

            // Skip if the actual kernel package is not found
            if db.sync_version(&repo, &kernel_name).is_none() {
                log::debug!(
                    "[KernelScan] [FILTERED] {}/{} has no matching kernel package",
                    repo,
                    pkg_name
                );
                continue;
            }

            #[cfg(debug_assertions)]
            log::debug!("[KernelScan] Found kernel: {}/{}", repo, kernel_name);

            kernels.push(Kernel::new(db, repo.as_str(), kernel_name));
        }
    }

    log::info!("[KernelScan] Kernel scan complete: {} kernels found", kernels.len());
    kernels
}

/// Configure `db` from `paths` and enumerate its kernels.
pub fn get_kernels<'a>(db: &'a mut dyn PackageDatabase, paths: &ConfigPaths) -> Vec<Kernel<'a>> {
    configure_from_paths(&mut *db, paths);
    let db: &'a dyn PackageDatabase = db;
    find_kernels(db)
}

/// Kernels that are installed locally
pub fn installed_kernels<'a>(kernels: &[Kernel<'a>]) -> Vec<Kernel<'a>> {
    kernels.iter().filter(|k| k.is_installed()).cloned().collect()
}

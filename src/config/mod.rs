//! Package-manager configuration module.
//!
//! Reads `pacman.conf` and the mirror lists it includes, and feeds the result
//! into a [`PackageDatabase`](crate::kernel::database::PackageDatabase) handle.
//!
//! # Module Structure
//!
//! - `ini`: line/section reader for the pacman INI dialect
//! - `mirrorlist`: `Server` extraction and `$arch`/`$repo` expansion
//! - `loader`: file I/O and handle configuration
//!
//! # Configuration Flow
//!
//! 1. `pacman.conf` is parsed into a [`PacmanConfig`]
//! 2. Architectures from `[options]` are registered on the handle
//! 3. Every other section (except `[testing]`) becomes a sync database,
//!    with servers from inline `Server` keys and `Include`d mirror lists
//! 4. The package cache directory is set
//!
//! Unreadable or malformed files leave the configuration incomplete; nothing
//! here aborts the enumeration.

pub mod ini;
pub mod loader;
pub mod mirrorlist;

use std::path::PathBuf;

use ini::{parse_ini, IniDocument};

/// Default location of the package-manager configuration
pub const PACMAN_CONF_PATH: &str = "/etc/pacman.conf";

/// Package cache directory set on every configured handle
pub const CACHE_DIR: &str = "/var/cache/pacman/pkg/";

/// Repository section that is never registered (duplicates stable kernels)
pub const IGNORED_REPO: &str = "testing";

/// Section holding global options rather than a repository
pub const OPTIONS_SECTION: &str = "options";

pub const DEFAULT_ROOT_DIR: &str = "/";
pub const DEFAULT_DB_PATH: &str = "/var/lib/pacman/";

/// Filesystem locations used when configuring a handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub pacman_conf: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        ConfigPaths {
            pacman_conf: PathBuf::from(PACMAN_CONF_PATH),
            cache_dir: PathBuf::from(CACHE_DIR),
        }
    }
}

impl ConfigPaths {
    pub fn with_pacman_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.pacman_conf = path.into();
        self
    }

    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = path.into();
        self
    }
}

/// One repository section of `pacman.conf`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoConfig {
    pub name: String,
    /// Mirror-list files named by `Include` keys, in order
    pub includes: Vec<PathBuf>,
    /// Raw `Server` templates written directly in the section
    pub servers: Vec<String>,
}

/// The parts of `pacman.conf` needed to configure a handle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacmanConfig {
    /// `Architecture` values as written (may contain `auto`)
    pub architectures: Vec<String>,
    pub root_dir: Option<String>,
    pub db_path: Option<String>,
    /// Repositories in file order, `[testing]` excluded
    pub repos: Vec<RepoConfig>,
}

impl PacmanConfig {
    /// Parse `pacman.conf` content.
    pub fn parse(content: &str) -> Self {
        Self::from_document(&parse_ini(content))
    }

    pub fn from_document(doc: &IniDocument) -> Self {
        let mut config = PacmanConfig::default();

        for section in &doc.sections {
            if section.name == IGNORED_REPO {
                log::debug!("[Config] Skipping ignored repository section [{}]", section.name);
                continue;
            }

            if section.name == OPTIONS_SECTION {
                for value in section.values("Architecture") {
                    config
                        .architectures
                        .extend(value.split_whitespace().map(str::to_string));
                }
                config.root_dir = section.last_value("RootDir").map(str::to_string);
                config.db_path = section.last_value("DBPath").map(str::to_string);
                continue;
            }

            config.repos.push(RepoConfig {
                name: section.name.clone(),
                includes: section
                    .values("Include")
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
                    .collect(),
                servers: section
                    .values("Server")
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect(),
            });
        }

        config
    }

    pub fn root_dir(&self) -> &str {
        self.root_dir.as_deref().unwrap_or(DEFAULT_ROOT_DIR)
    }

    pub fn db_path(&self) -> &str {
        self.db_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
    }

    pub fn repo_names(&self) -> Vec<&str> {
        self.repos.iter().map(|r| r.name.as_str()).collect()
    }
}

//! Config file loader and handle configuration.

use std::fs;
use std::path::Path;

use super::mirrorlist::{parse_mirrorlist, resolve_servers};
use super::{ConfigPaths, PacmanConfig, RepoConfig};
use crate::error::ConfigError;
use crate::kernel::database::PackageDatabase;
use crate::system::{host_architecture, resolve_architecture};

/// What [`configure_database`] managed to register
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureSummary {
    pub architectures: Vec<String>,
    pub repos: Vec<String>,
    pub servers: usize,
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })
}

/// Read and parse `pacman.conf` from disk.
pub fn read_pacman_config(path: &Path) -> Result<PacmanConfig, ConfigError> {
    let content = read_file(path)?;
    Ok(PacmanConfig::parse(&content))
}

/// Like [`read_pacman_config`], but an unreadable file yields an empty config.
pub fn load_pacman_config(path: &Path) -> PacmanConfig {
    match read_pacman_config(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[Config] Using empty configuration: {}", e);
            PacmanConfig::default()
        }
    }
}

/// Raw `Server` templates of a mirror-list file.
pub fn read_mirrorlist(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = read_file(path)?;
    Ok(parse_mirrorlist(&content))
}

/// Expanded server URLs for one repository: inline servers first, then
/// each included mirror list in order. Unreadable includes are skipped.
pub fn collect_repo_servers(repo: &RepoConfig, arch: &str) -> Vec<String> {
    let mut servers = resolve_servers(repo.servers.iter().map(String::as_str), arch, &repo.name);

    for include in &repo.includes {
        match read_mirrorlist(include) {
            Ok(templates) => {
                servers.extend(resolve_servers(
                    templates.iter().map(String::as_str),
                    arch,
                    &repo.name,
                ));
            }
            Err(e) => {
                log::warn!(
                    "[Config] Skipping include {} for [{}]: {}",
                    include.display(),
                    repo.name,
                    e
                );
            }
        }
    }

    servers
}

/// Feed `config` into `db`: architectures, sync databases with their servers,
/// then the cache directory. Failures are logged and skipped.
pub fn configure_database(
    db: &mut dyn PackageDatabase,
    config: &PacmanConfig,
    paths: &ConfigPaths,
) -> ConfigureSummary {
    let mut summary = ConfigureSummary::default();

    for value in &config.architectures {
        let arch = resolve_architecture(value);
        match db.add_architecture(&arch) {
            Ok(()) => summary.architectures.push(arch),
            Err(e) => log::warn!("[Config] Could not add architecture {}: {}", arch, e),
        }
    }

    // `$arch` expands to the primary architecture of the handle
    let arch = db
        .architectures()
        .into_iter()
        .next()
        .unwrap_or_else(host_architecture);

    for repo in &config.repos {
        let servers = collect_repo_servers(repo, &arch);
        match db.register_sync_db(&repo.name, &servers) {
            Ok(()) => {
                log::debug!("[Config] Registered [{}] with {} servers", repo.name, servers.len());
                summary.servers += servers.len();
                summary.repos.push(repo.name.clone());
            }
            Err(e) => log::warn!("[Config] Could not register [{}]: {}", repo.name, e),
        }
    }

    if let Err(e) = db.set_cache_dirs(&[paths.cache_dir.clone()]) {
        log::warn!(
            "[Config] Could not set cache directory {}: {}",
            paths.cache_dir.display(),
            e
        );
    }

    log::info!(
        "[Config] Handle configured: {} architectures, {} repositories, {} servers",
        summary.architectures.len(),
        summary.repos.len(),
        summary.servers
    );
    summary
}

/// Read `paths.pacman_conf` and configure `db` from it.
pub fn configure_from_paths(db: &mut dyn PackageDatabase, paths: &ConfigPaths) -> ConfigureSummary {
    let config = load_pacman_config(&paths.pacman_conf);
    configure_database(db, &config, paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::memory::MemoryDatabase;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let result = read_pacman_config(Path::new("/nonexistent/pacman.conf"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let config = load_pacman_config(Path::new("/nonexistent/pacman.conf"));
        assert_eq!(config, PacmanConfig::default());
    }

    #[test]
    fn test_configure_registers_repos_and_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let mirrors = write_file(
            tmp.path(),
            "mirrorlist",
            "Server = https://m.example/$repo/os/$arch\nServer = /local/$repo\n",
        );
        let conf = format!(
            "[options]\nArchitecture = x86_64\n\n[core]\nInclude = {}\n\n[testing]\nInclude = {}\n",
            mirrors.display(),
            mirrors.display()
        );
        let config = PacmanConfig::parse(&conf);

        let mut db = MemoryDatabase::new();
        let summary = configure_database(&mut db, &config, &ConfigPaths::default());

        assert_eq!(summary.architectures, vec!["x86_64"]);
        assert_eq!(summary.repos, vec!["core"]);
        assert_eq!(summary.servers, 1);
        assert!(!db.is_registered("testing"));
        assert_eq!(
            db.servers("core").unwrap(),
            ["https://m.example/core/os/x86_64".to_string()]
        );
        assert_eq!(db.cache_dirs(), [PathBuf::from("/var/cache/pacman/pkg/")]);
    }

    #[test]
    fn test_inline_servers_then_includes_in_file_order() {
        let tmp = tempfile::tempdir().unwrap();
        let first = write_file(tmp.path(), "first", "Server = https://one.example/$repo\n");
        let second = write_file(
            tmp.path(),
            "second",
            "Server = https://two.example/$repo\nServer = https://three.example/$repo\n",
        );
        let conf = format!(
            "[options]\nArchitecture = x86_64\n[core]\nInclude = {}\nServer = https://inline.example/$repo\nInclude = {}\n",
            first.display(),
            second.display()
        );

        let mut db = MemoryDatabase::new();
        let summary = configure_database(&mut db, &PacmanConfig::parse(&conf), &ConfigPaths::default());

        assert_eq!(summary.servers, 4);
        assert_eq!(
            db.servers("core").unwrap(),
            [
                "https://inline.example/core".to_string(),
                "https://one.example/core".to_string(),
                "https://two.example/core".to_string(),
                "https://three.example/core".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_include_still_registers_repo() {
        let config = PacmanConfig::parse(
            "[options]\nArchitecture = x86_64\n[extra]\nInclude = /nonexistent/mirrorlist\n",
        );
        let mut db = MemoryDatabase::new();
        configure_database(&mut db, &config, &ConfigPaths::default());

        assert!(db.is_registered("extra"));
        assert!(db.servers("extra").unwrap().is_empty());
    }

    #[test]
    fn test_arch_defaults_to_host_without_options() {
        let config = PacmanConfig::parse("[core]\nServer = https://m/$arch\n");
        let mut db = MemoryDatabase::new();
        configure_database(&mut db, &config, &ConfigPaths::default());

        let expected = format!("https://m/{}", host_architecture());
        assert_eq!(db.servers("core").unwrap(), [expected]);
    }

    #[test]
    fn test_cache_dir_set_even_when_config_empty() {
        let mut db = MemoryDatabase::new();
        let paths = ConfigPaths::default().with_cache_dir("/tmp/pkgcache");
        configure_database(&mut db, &PacmanConfig::default(), &paths);
        assert_eq!(db.cache_dirs(), [PathBuf::from("/tmp/pkgcache")]);
    }
}

//! kernel_finder
//!
//! Discovers kernel packages (and their matching headers packages) in the
//! sync databases configured by `pacman.conf`, using libalpm through the
//! `alpm` crate.
//!
//! The system is organized into functional modules:
//! - **error**: Error types for configuration, database and CLI failures
//! - **config**: `pacman.conf` / mirror-list reading and handle configuration
//! - **kernel**: Database seam and kernel enumeration
//! - **system**: Host facts (machine architecture)
//! - **log_collector**: `log` facade backend

pub mod config;
pub mod error;
pub mod kernel;
pub mod log_collector;
pub mod system;

// Re-export the log crate for macro usage
pub use log;

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use config::loader::{configure_database, configure_from_paths, ConfigureSummary};
pub use config::{ConfigPaths, PacmanConfig, RepoConfig};
pub use error::{AppError, ConfigError, DatabaseError, Result};
pub use kernel::database::{AlpmDatabase, PackageDatabase};
pub use kernel::manager::{find_kernels, get_kernels, installed_kernels, Kernel, KernelInfo};
pub use kernel::memory::MemoryDatabase;
pub use log_collector::{LogCollector, LogLine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

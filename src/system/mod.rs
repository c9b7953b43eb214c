//! System module: host facts needed to configure a package handle

use nix::sys::utsname::uname;

/// Architecture keyword that pacman resolves to the running machine
pub const AUTO_ARCH: &str = "auto";

/// Machine hardware name as reported by `uname -m` (e.g. "x86_64")
///
/// Falls back to the compile-time target architecture if `uname(2)` fails.
pub fn host_architecture() -> String {
    match uname() {
        Ok(info) => info.machine().to_string_lossy().into_owned(),
        Err(e) => {
            log::warn!("[System] uname failed ({}), using build target architecture", e);
            std::env::consts::ARCH.to_string()
        }
    }
}

/// Resolve an `Architecture` value from pacman.conf
pub fn resolve_architecture(value: &str) -> String {
    if value == AUTO_ARCH {
        host_architecture()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_architecture_not_empty() {
        assert!(!host_architecture().is_empty());
    }

    #[test]
    fn test_auto_resolves_to_host() {
        assert_eq!(resolve_architecture("auto"), host_architecture());
    }

    #[test]
    fn test_explicit_architecture_kept() {
        assert_eq!(resolve_architecture("aarch64"), "aarch64");
    }
}

//! Shared filesystem paths with test-friendly overrides.

use std::path::PathBuf;

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn fallback_home_dir() -> PathBuf {
    home::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Installation base directory (default: ~/.lvm).
#[must_use]
pub fn base_dir() -> PathBuf {
    env_path("LVM_BASE_DIR").unwrap_or_else(|| fallback_home_dir().join(".lvm"))
}

/// Config directory (default: XDG config dir or ~/.config/langvm).
#[must_use]
pub fn config_dir() -> PathBuf {
    env_path("LVM_CONFIG_DIR").unwrap_or_else(|| {
        dirs::config_dir()
            .map(|d| d.join("langvm"))
            .unwrap_or_else(|| fallback_home_dir().join(".config/langvm"))
    })
}

/// Daemon socket path (default: $XDG_RUNTIME_DIR/langvm.sock or /tmp/langvm.sock).
#[must_use]
pub fn socket_path() -> PathBuf {
    env_path("LVM_SOCKET_PATH").unwrap_or_else(|| {
        std::env::var("XDG_RUNTIME_DIR").map_or_else(
            |_| PathBuf::from("/tmp/langvm.sock"),
            |d| PathBuf::from(d).join("langvm.sock"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_base_dir_override() {
        temp_env::with_var("LVM_BASE_DIR", Some("/opt/lvm"), || {
            assert_eq!(base_dir(), PathBuf::from("/opt/lvm"));
        });
    }

    #[test]
    #[serial]
    fn test_empty_override_is_ignored() {
        temp_env::with_var("LVM_BASE_DIR", Some(""), || {
            assert!(base_dir().ends_with(".lvm"));
        });
    }

    #[test]
    #[serial]
    fn test_socket_path_prefers_runtime_dir() {
        temp_env::with_vars(
            [
                ("LVM_SOCKET_PATH", None),
                ("XDG_RUNTIME_DIR", Some("/run/user/1000")),
            ],
            || {
                assert_eq!(socket_path(), PathBuf::from("/run/user/1000/langvm.sock"));
            },
        );
    }
}

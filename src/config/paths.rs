//! Cross-platform directory path resolution
//!
//! - Linux/macOS: XDG Base Directory specification (~/.config)
//! - Windows: Known Folder API (AppData\Roaming)

use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "FLEETPULSE_CONFIG_DIR";

/// Get the configuration directory path
///
/// Checks FLEETPULSE_CONFIG_DIR first, then falls back to:
/// - Unix (Linux/macOS): XDG_CONFIG_HOME/fleetpulse or ~/.config/fleetpulse
/// - Windows: %APPDATA%\fleetpulse\config
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", "fleetpulse")
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join("fleetpulse"))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join("fleetpulse")
            }
        })
}

/// Root configuration file inside `dir`, or inside [`config_dir`]
pub fn root_config_path(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.join("config.yaml"),
        None => config_dir().join("config.yaml"),
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_config_path_in_dir() {
        let path = root_config_path(Some(Path::new("/tmp/fp")));
        assert_eq!(path, PathBuf::from("/tmp/fp/config.yaml"));
    }

    #[test]
    fn test_default_root_config_path() {
        let path = root_config_path(None);
        assert!(path.ends_with("config.yaml"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}

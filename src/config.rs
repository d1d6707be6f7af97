//! Store location.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Location of the slots database relative to the server install directory
pub const DEFAULT_RELATIVE_PATH: &str = "ArkApi/Plugins/TribeSlotCooldown/Slots.db";

/// Where the store lives on disk.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Explicit database file; overrides the default location
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Use an explicit database file.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Resolve the database file, using `install_dir` for the default location.
    pub fn resolve_in<P: AsRef<Path>>(&self, install_dir: P) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => install_dir.as_ref().join(DEFAULT_RELATIVE_PATH),
        }
    }

    /// Resolve the database file, treating the current directory as the install directory.
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.resolve_in(std::env::current_dir()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_under_install_dir() {
        let config = StoreConfig::default();
        assert_eq!(
            config.resolve_in("/srv/ark"),
            PathBuf::from("/srv/ark/ArkApi/Plugins/TribeSlotCooldown/Slots.db")
        );
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = StoreConfig::with_path("/tmp/slots-test.db");
        assert_eq!(
            config.resolve_in("/srv/ark"),
            PathBuf::from("/tmp/slots-test.db")
        );
        assert_eq!(config.resolve().unwrap(), PathBuf::from("/tmp/slots-test.db"));
    }

    #[test]
    fn test_resolve_uses_current_dir() {
        let expected = std::env::current_dir().unwrap().join(DEFAULT_RELATIVE_PATH);
        assert_eq!(StoreConfig::default().resolve().unwrap(), expected);
    }
}

//! Per-application directories under `~/.yotts`.

use std::io;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding every yotts application.
pub const BASE_DIR: &str = ".yotts";

/// Context configuration file inside an application directory.
pub const CONFIG_FILE: &str = "config.yaml";

const DATA_DIR: &str = "data";

/// Directory layout of one application: `~/.yotts/<app>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    app_dir: PathBuf,
}

impl Paths {
    /// Layout rooted at the user's home directory.
    pub fn new(app_name: &str) -> io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self::under(home, app_name))
    }

    /// Layout rooted at `home` instead of the user's home directory.
    pub fn under(home: impl AsRef<Path>, app_name: &str) -> Self {
        Self {
            app_dir: home.as_ref().join(BASE_DIR).join(app_name),
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// `<app>/config.yaml`
    pub fn config_file(&self) -> PathBuf {
        self.app_dir.join(CONFIG_FILE)
    }

    /// `<app>/data`, where generated clips are written. Not created here.
    pub fn data_dir(&self) -> PathBuf {
        self.app_dir.join(DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_home() {
        let paths = Paths::under("/home/u", "yotts_plugin");
        assert_eq!(paths.app_dir(), Path::new("/home/u/.yotts/yotts_plugin"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/u/.yotts/yotts_plugin/config.yaml")
        );
        assert_eq!(paths.data_dir(), PathBuf::from("/home/u/.yotts/yotts_plugin/data"));
    }

    #[test]
    fn test_new_uses_home_dir() {
        let paths = Paths::new("yotts").unwrap();
        assert!(paths.app_dir().ends_with(".yotts/yotts"));
    }
}

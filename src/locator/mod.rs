//! Engine library discovery
//!
//! Finds the engine's shared library among the objects mapped into the
//! process and derives the directory its plugin modules are installed in:
//! `<library dir>/<engine name>/modules-<major version>`.

pub mod shared_objects;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::LocatorConfig;

pub use shared_objects::{FixedLibraries, ProcessLibraries, SharedObjectSource};

/// Matches engine libraries by file name and derives the modules directory
#[derive(Debug, Clone)]
pub struct Locator {
    engine_name: String,
    prefixes: Vec<String>,
}

impl Locator {
    #[must_use]
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            engine_name: config.engine_name.clone(),
            prefixes: config.library_prefixes.clone(),
        }
    }

    /// Directory name the engine installs its modules under
    #[must_use]
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Whether the base file name of `path` carries an engine library prefix
    #[must_use]
    pub fn is_engine_library(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// First engine library in `libraries`, in the order given
    #[must_use]
    pub fn find_engine_library<'a>(&self, libraries: &'a [PathBuf]) -> Option<&'a Path> {
        libraries
            .iter()
            .inspect(|path| debug!("Inspecting shared object {}", path.display()))
            .find(|path| self.is_engine_library(path))
            .map(PathBuf::as_path)
    }

    /// Modules directory belonging to the engine library at `library`
    #[must_use]
    pub fn modules_dir_for(&self, library: &Path, major: u32) -> PathBuf {
        let dir = library.parent().unwrap_or_else(|| Path::new(""));
        dir.join(&self.engine_name).join(format!("modules-{major}"))
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(&LocatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let locator = Locator::default();
        assert!(locator.is_engine_library(Path::new("/opt/jags/lib/libjags.so")));
        assert!(locator.is_engine_library(Path::new("/usr/lib/libjags.so.4.3.0")));
        assert!(locator.is_engine_library(Path::new("C:/JAGS/x64/bin/jags-4.dll")));
        assert!(!locator.is_engine_library(Path::new("/usr/lib/libjpeg.so.8")));
        assert!(!locator.is_engine_library(Path::new("/opt/libjags/lib/libm.so")));
        assert!(!locator.is_engine_library(Path::new("/")));
    }

    #[test]
    fn test_modules_dir_layout() {
        let locator = Locator::default();
        let dir = locator.modules_dir_for(Path::new("/opt/jags/lib/libjags.so"), 3);
        assert_eq!(dir, PathBuf::from("/opt/jags/lib/JAGS/modules-3"));
    }

    #[test]
    fn test_first_match_wins() {
        let locator = Locator::default();
        let libraries = vec![
            PathBuf::from("/lib/x86_64-linux-gnu/libc.so.6"),
            PathBuf::from("/usr/local/lib/libjags.so.4"),
            PathBuf::from("/opt/jags/lib/libjags.so"),
        ];
        assert_eq!(
            locator.find_engine_library(&libraries),
            Some(Path::new("/usr/local/lib/libjags.so.4"))
        );
    }

    #[test]
    fn test_custom_engine_name() {
        let config = LocatorConfig {
            engine_name: "Engine".to_string(),
            library_prefixes: vec!["libengine".to_string()],
        };
        let locator = Locator::new(&config);
        let libraries = vec![PathBuf::from("/srv/lib/libengine.so")];
        let library = locator.find_engine_library(&libraries).unwrap();
        assert_eq!(
            locator.modules_dir_for(library, 2),
            PathBuf::from("/srv/lib/Engine/modules-2")
        );
        assert!(!locator.is_engine_library(Path::new("/srv/lib/libjags.so")));
    }
}

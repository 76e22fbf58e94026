use libloading::Library;
use std::any::Any;
use std::fmt;
use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};

/// File extension of module shared objects on this platform
#[cfg(windows)]
pub const MODULE_EXTENSION: &str = ".dll";

/// File extension of module shared objects on this platform
#[cfg(not(windows))]
pub const MODULE_EXTENSION: &str = ".so";

pub type OpenError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque handle keeping a module's shared object mapped
pub struct ModuleHandle {
    path: PathBuf,
    #[allow(dead_code)] // Held only to keep the object mapped
    inner: Box<dyn Any>,
}

impl ModuleHandle {
    pub fn new(path: impl Into<PathBuf>, inner: impl Any) -> Self {
        Self {
            path: path.into(),
            inner: Box::new(inner),
        }
    }

    /// Path the shared object was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Opens module shared objects
pub trait DynamicLibraryLoader {
    /// Extension appended to a module name to form its file name
    fn extension(&self) -> &str {
        MODULE_EXTENSION
    }

    /// Map the shared object at `path` into the process
    ///
    /// # Errors
    /// Returns the platform loader's error if the object cannot be opened
    fn open(&self, path: &Path) -> Result<ModuleHandle, OpenError>;
}

/// Loader backed by the platform's dynamic linker
///
/// Opened objects are never closed: the engine keeps module registrations
/// process-wide, so they must stay mapped after their handle is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLoader;

impl DynamicLibraryLoader for NativeLoader {
    fn open(&self, path: &Path) -> Result<ModuleHandle, OpenError> {
        // Safety: module initialisers run here; modules are trusted engine plugins
        let library = unsafe { Library::new(path)? };
        Ok(ModuleHandle::new(path, ManuallyDrop::new(library)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matches_platform() {
        if cfg!(windows) {
            assert_eq!(NativeLoader.extension(), ".dll");
        } else {
            assert_eq!(NativeLoader.extension(), ".so");
        }
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("nonexistent{MODULE_EXTENSION}"));
        assert!(NativeLoader.open(&path).is_err());
    }

    #[test]
    fn test_open_garbage_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("garbage{MODULE_EXTENSION}"));
        std::fs::write(&path, b"not a shared object").unwrap();
        assert!(NativeLoader.open(&path).is_err());
    }

    #[test]
    fn test_handle_reports_path() {
        let handle = ModuleHandle::new("/opt/jags/lib/JAGS/modules-4/glm.so", ());
        assert_eq!(handle.path(), Path::new("/opt/jags/lib/JAGS/modules-4/glm.so"));
        assert!(format!("{handle:?}").contains("glm.so"));
    }
}

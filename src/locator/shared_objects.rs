//! Enumeration of the shared objects mapped into the current process
//!
//! ELF platforms walk the program headers with `dl_iterate_phdr`, Apple
//! platforms ask dyld for its image list. Everything else reports no
//! facility and yields `None`.

use std::path::PathBuf;

/// Source of the shared-object paths visible to the locator
pub trait SharedObjectSource {
    /// Paths in platform-reported order, or `None` when enumeration is unsupported
    fn loaded_libraries(&self) -> Option<Vec<PathBuf>>;
}

/// The running process, enumerated through the platform loader
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLibraries;

impl SharedObjectSource for ProcessLibraries {
    fn loaded_libraries(&self) -> Option<Vec<PathBuf>> {
        platform::loaded_libraries()
    }
}

/// A fixed list of library paths
///
/// Useful when the engine location is already known, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct FixedLibraries(pub Vec<PathBuf>);

impl FixedLibraries {
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl SharedObjectSource for FixedLibraries {
    fn loaded_libraries(&self) -> Option<Vec<PathBuf>> {
        Some(self.0.clone())
    }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
mod platform {
    use std::ffi::{CStr, OsStr};
    use std::os::unix::ffi::OsStrExt;
    use std::path::PathBuf;

    unsafe extern "C" fn collect_name(
        info: *mut libc::dl_phdr_info,
        _size: libc::size_t,
        data: *mut libc::c_void,
    ) -> libc::c_int {
        // Safety: `data` is the &mut Vec passed below and outlives the walk
        let paths = &mut *data.cast::<Vec<PathBuf>>();
        let name = (*info).dlpi_name;
        if !name.is_null() {
            let bytes = CStr::from_ptr(name).to_bytes();
            // The main executable is reported with an empty name
            if !bytes.is_empty() {
                paths.push(PathBuf::from(OsStr::from_bytes(bytes)));
            }
        }
        0
    }

    pub(super) fn loaded_libraries() -> Option<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = Vec::new();
        // Safety: the callback only touches `paths` and the loader-owned info struct
        unsafe {
            libc::dl_iterate_phdr(
                Some(collect_name),
                std::ptr::addr_of_mut!(paths).cast::<libc::c_void>(),
            );
        }
        Some(paths)
    }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod platform {
    use std::ffi::{CStr, OsStr};
    use std::os::unix::ffi::OsStrExt;
    use std::path::PathBuf;

    pub(super) fn loaded_libraries() -> Option<Vec<PathBuf>> {
        // Safety: dyld keeps image names alive while the image is loaded
        unsafe {
            let count = libc::_dyld_image_count();
            let mut paths = Vec::with_capacity(count as usize);
            for index in 0..count {
                let name = libc::_dyld_get_image_name(index);
                if name.is_null() {
                    continue;
                }
                let bytes = CStr::from_ptr(name).to_bytes();
                if !bytes.is_empty() {
                    paths.push(PathBuf::from(OsStr::from_bytes(bytes)));
                }
            }
            Some(paths)
        }
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "macos",
    target_os = "ios"
)))]
mod platform {
    use std::path::PathBuf;

    pub(super) fn loaded_libraries() -> Option<Vec<PathBuf>> {
        tracing::debug!("Shared object enumeration is not supported on this platform");
        None
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::console::Console;
use crate::error::{Error, Result};
use crate::loader::{DynamicLibraryLoader, ModuleHandle, NativeLoader};
use crate::locator::{Locator, ProcessLibraries, SharedObjectSource};
use crate::version::EngineVersion;

/// Module manager for locating, loading and activating engine modules
///
/// Owns the modules-directory cache and the registry of shared objects
/// opened so far. A shared object is opened at most once per module name
/// for the lifetime of the manager. With [`NativeLoader`] it stays mapped
/// for the rest of the process, even after the manager is dropped.
pub struct ModuleManager<C, L = NativeLoader, S = ProcessLibraries> {
    console: C,
    loader: L,
    source: S,
    locator: Locator,
    modules_dir: Option<PathBuf>,
    loaded: HashMap<String, ModuleHandle>,
}

impl<C: Console> ModuleManager<C> {
    /// Create a manager using the platform loader and the current process's libraries
    #[must_use]
    pub fn new(console: C) -> Self {
        Self::with_parts(console, NativeLoader, ProcessLibraries)
    }
}

impl<C, L, S> ModuleManager<C, L, S>
where
    C: Console,
    L: DynamicLibraryLoader,
    S: SharedObjectSource,
{
    #[must_use]
    pub fn with_parts(console: C, loader: L, source: S) -> Self {
        Self {
            console,
            loader,
            source,
            locator: Locator::default(),
            modules_dir: None,
            loaded: HashMap::new(),
        }
    }

    /// Replace the locator used for auto-location
    #[must_use]
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Engine version as reported by the console
    ///
    /// # Errors
    /// Returns [`Error::Version`] if the console reports an unparsable version
    pub fn version(&self) -> Result<EngineVersion> {
        EngineVersion::parse(&self.console.version())
    }

    /// Shared objects currently mapped into the process, if the platform can tell
    pub fn loaded_libraries(&self) -> Option<Vec<PathBuf>> {
        self.source.loaded_libraries()
    }

    /// Derive the modules directory from the loaded engine library
    ///
    /// Returns `Ok(None)` when no engine library is found or the platform
    /// cannot enumerate shared objects. Does not touch the cache.
    ///
    /// # Errors
    /// Returns [`Error::Version`] if a library matched but the engine
    /// version cannot be parsed
    pub fn locate_modules_dir(&self) -> Result<Option<PathBuf>> {
        debug!("Locating {} module directory", self.locator.engine_name());

        let Some(libraries) = self.source.loaded_libraries() else {
            debug!("Shared object enumeration unavailable");
            return Ok(None);
        };

        let Some(library) = self.locator.find_engine_library(&libraries) else {
            return Ok(None);
        };
        info!(
            "Using {} library located in {}",
            self.locator.engine_name(),
            library.display()
        );

        let version = self.version()?;
        Ok(Some(self.locator.modules_dir_for(library, version.major)))
    }

    /// Modules directory: the explicit override, else the located one
    ///
    /// Auto-location runs at most until it succeeds; the result is cached.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if no override is set and the directory
    /// cannot be located
    pub fn modules_dir(&mut self) -> Result<&Path> {
        if self.modules_dir.is_none() {
            self.modules_dir = self.locate_modules_dir()?;
        }
        match self.modules_dir.as_deref() {
            Some(dir) => Ok(dir),
            None => Err(Error::Config(format!(
                "Could not locate {} module directory",
                self.locator.engine_name()
            ))),
        }
    }

    /// Override the modules directory; wins over auto-location
    pub fn set_modules_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        debug!("Modules directory set to {}", dir.display());
        self.modules_dir = Some(dir);
    }

    /// Modules active in the engine
    pub fn list_modules(&self) -> Vec<String> {
        self.console.list_modules()
    }

    /// Load a module and activate it in the engine
    ///
    /// The shared object `<dir>/<name><ext>` is opened only the first time a
    /// name is seen; `dir` defaults to [`modules_dir`](Self::modules_dir).
    /// Activation is requested on every call.
    ///
    /// # Errors
    /// - [`Error::Config`] if no directory is given and none can be located
    /// - [`Error::Load`] if the shared object cannot be opened
    /// - [`Error::Engine`] if the console rejects the activation
    pub fn load_module(&mut self, name: &str, dir: Option<&Path>) -> Result<()> {
        if !self.loaded.contains_key(name) {
            let dir = match dir {
                Some(dir) => dir.to_path_buf(),
                None => self.modules_dir()?.to_path_buf(),
            };
            let path = dir.join(format!("{name}{}", self.loader.extension()));

            info!("Loading module {} from {}", name, path.display());
            let handle = self.loader.open(&path).map_err(|source| Error::Load {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;
            self.loaded.insert(name.to_string(), handle);
        }

        if self.console.load_module(name) {
            Ok(())
        } else {
            Err(self.engine_error("load", name))
        }
    }

    /// Load several modules in order, stopping at the first failure
    ///
    /// # Errors
    /// Returns the first error from [`load_module`](Self::load_module)
    pub fn load_modules<I, N>(&mut self, names: I, dir: Option<&Path>) -> Result<()>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        for name in names {
            self.load_module(name.as_ref(), dir)?;
        }
        Ok(())
    }

    /// Deactivate a module in the engine
    ///
    /// The shared object stays mapped and registered.
    ///
    /// # Errors
    /// Returns [`Error::Engine`] if the console rejects the request
    pub fn unload_module(&mut self, name: &str) -> Result<()> {
        if self.console.unload_module(name) {
            Ok(())
        } else {
            Err(self.engine_error("unload", name))
        }
    }

    /// Whether the shared object for `name` has been opened
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Names of modules whose shared objects have been opened, sorted
    #[must_use]
    pub fn loaded_modules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaded.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registry entry for `name`
    #[must_use]
    pub fn module_handle(&self, name: &str) -> Option<&ModuleHandle> {
        self.loaded.get(name)
    }

    fn engine_error(&self, operation: &'static str, name: &str) -> Error {
        let message = self
            .console
            .last_error()
            .unwrap_or_else(|| "request rejected by console".to_string());
        warn!("Engine failed to {} module {}: {}", operation, name, message);
        Error::Engine {
            operation,
            name: name.to_string(),
            message,
        }
    }
}

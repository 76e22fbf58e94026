//! jags-modules - Module discovery and loading for the JAGS sampling engine
//!
//! Locates the engine's shared library among the objects mapped into the
//! process, derives its modules directory and loads plugin modules through
//! the engine console.
//!
//! # Modules
//!
//! - [`config`]: Configuration management and serialization
//! - [`console`]: Engine console interface and an in-memory implementation
//! - [`locator`]: Shared-object enumeration and modules-directory derivation
//! - [`loader`]: Opening module shared objects
//! - [`manager`]: Module registry tying the pieces together
//! - [`version`]: Engine version parsing

pub mod config;
pub mod console;
pub mod error;
pub mod loader;
pub mod locator;
pub mod manager;
pub mod version;

pub use console::{Console, InMemoryConsole};
pub use error::{Error, Result};
pub use loader::{DynamicLibraryLoader, ModuleHandle, NativeLoader, MODULE_EXTENSION};
pub use locator::{FixedLibraries, Locator, ProcessLibraries, SharedObjectSource};
pub use manager::ModuleManager;
pub use version::EngineVersion;

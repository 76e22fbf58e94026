//! Engine console interface
//!
//! The console is the engine's control-and-query surface. Binding it to a
//! real engine happens outside this crate; anything that can answer these
//! four requests can drive a [`ModuleManager`](crate::ModuleManager).

use std::collections::BTreeSet;

use tracing::debug;

/// Control interface of the sampling engine
pub trait Console {
    /// Version string reported by the engine, e.g. `"4.3.1"`
    fn version(&self) -> String;

    /// Names of the modules currently active in the engine
    fn list_modules(&self) -> Vec<String>;

    /// Activate a module whose shared object is already mapped
    fn load_module(&mut self, name: &str) -> bool;

    /// Deactivate a module
    fn unload_module(&mut self, name: &str) -> bool;

    /// Diagnostic for the most recent rejected request, if the engine kept one
    fn last_error(&self) -> Option<String> {
        None
    }
}

/// Engine-less console that keeps the active module table in memory
///
/// Used for dry runs where no engine binding is available.
#[derive(Debug, Clone)]
pub struct InMemoryConsole {
    version: String,
    known: Option<BTreeSet<String>>,
    active: Vec<String>,
    last_error: Option<String>,
}

impl InMemoryConsole {
    /// Create a console reporting `version` that accepts any module name
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            known: None,
            active: Vec::new(),
            last_error: None,
        }
    }

    /// Restrict activation to the given module names
    #[must_use]
    pub fn with_known_modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `name` is currently active
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|m| m == name)
    }
}

impl Console for InMemoryConsole {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn list_modules(&self) -> Vec<String> {
        self.active.clone()
    }

    fn load_module(&mut self, name: &str) -> bool {
        if let Some(known) = &self.known {
            if !known.contains(name) {
                self.last_error = Some(format!("Module {name} not found"));
                return false;
            }
        }
        if !self.is_active(name) {
            debug!("Activating module {}", name);
            self.active.push(name.to_string());
        }
        self.last_error = None;
        true
    }

    fn unload_module(&mut self, name: &str) -> bool {
        match self.active.iter().position(|m| m == name) {
            Some(index) => {
                debug!("Deactivating module {}", name);
                self.active.remove(index);
                self.last_error = None;
                true
            }
            None => {
                self.last_error = Some(format!("Module {name} is not loaded"));
                false
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_is_idempotent() {
        let mut console = InMemoryConsole::new("4.3.0");
        assert!(console.load_module("glm"));
        assert!(console.load_module("glm"));
        assert_eq!(console.list_modules(), vec!["glm".to_string()]);
    }

    #[test]
    fn test_list_keeps_activation_order() {
        let mut console = InMemoryConsole::new("4.3.0");
        console.load_module("lecuyer");
        console.load_module("dic");
        console.load_module("glm");
        assert_eq!(console.list_modules(), vec!["lecuyer", "dic", "glm"]);
    }

    #[test]
    fn test_unknown_module_rejected() {
        let mut console = InMemoryConsole::new("4.3.0").with_known_modules(["basemod", "bugs"]);
        assert!(!console.load_module("glm"));
        assert_eq!(console.last_error().as_deref(), Some("Module glm not found"));
        assert!(console.load_module("bugs"));
        assert_eq!(console.last_error(), None);
    }

    #[test]
    fn test_unload_inactive_rejected() {
        let mut console = InMemoryConsole::new("4.3.0");
        assert!(!console.unload_module("missing"));
        assert_eq!(
            console.last_error().as_deref(),
            Some("Module missing is not loaded")
        );

        console.load_module("dic");
        assert!(console.unload_module("dic"));
        assert!(!console.is_active("dic"));
    }
}

use std::path::PathBuf;

/// Errors raised while locating, loading or activating engine modules
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Modules directory could not be determined, or configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Shared object for a module could not be opened
    #[error("Failed to load module {name} from {}: {source}", path.display())]
    Load {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The engine console rejected a request
    #[error("Engine failed to {operation} module {name}: {message}")]
    Engine {
        operation: &'static str,
        name: String,
        message: String,
    },

    /// Engine reported a version string that does not parse
    #[error("Invalid engine version: {0:?}")]
    Version(String),
}

pub type Result<T> = std::result::Result<T, Error>;

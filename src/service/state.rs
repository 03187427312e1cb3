//! Service state and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::editor::Editor;
use crate::import::ImportError;
use crate::store::GraphStore;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8002;

/// Error type for service configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `HOST`/`PORT` do not form a socket address.
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
    /// The seed file could not be read.
    #[error("Failed to read seed file {path}: {source}")]
    SeedRead {
        /// Seed file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The seed file is not an importable mind map.
    #[error("Failed to import seed file: {0}")]
    SeedImport(#[from] ImportError),
}

/// Service configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Optional `.json` map imported at startup.
    pub seed: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: None,
        }
    }
}

impl ServiceConfig {
    /// Read `HOST`, `PORT` and `MINDMAP_SEED`.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST")
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            seed: lookup("MINDMAP_SEED")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// The socket address to bind.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

/// Shared service state.
///
/// One editor serves every request; the mutex gives single-writer semantics
/// and is never held across an await.
pub struct ServiceState<S: GraphStore + 'static> {
    /// The editor behind every endpoint.
    pub editor: Arc<Mutex<Editor<S>>>,
}

impl<S: GraphStore + 'static> ServiceState<S> {
    /// Create service state over a store.
    pub fn new(store: S) -> Self {
        Self {
            editor: Arc::new(Mutex::new(Editor::new(Arc::new(store)))),
        }
    }

    /// Import the configured seed file, if any.
    pub fn load_seed(&self, config: &ServiceConfig) -> Result<bool, ConfigError> {
        let Some(path) = &config.seed else {
            return Ok(false);
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead {
            path: path.clone(),
            source,
        })?;
        let name = path.to_string_lossy();
        self.editor.lock().import_file(&name, &contents)?;
        Ok(true)
    }
}

impl<S: GraphStore + 'static> Clone for ServiceState<S> {
    fn clone(&self) -> Self {
        Self {
            editor: Arc::clone(&self.editor),
        }
    }
}

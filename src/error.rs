//! Engine error classes (§7).
//!
//! Most of these are recoverable by design: the propagation policy is local
//! recovery wherever it preserves analysis completeness of the remaining files,
//! and fatal only when the engine cannot produce any meaningful output.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed configuration. Fatal only in "strict config" mode; otherwise the
    /// caller is expected to log and fall back to `Configuration::default()`.
    Configuration { path: PathBuf, source: String },
    /// A specifier could not be resolved by the compiler facade.
    ResolverFailure { specifier: String, containing_file: PathBuf },
    /// The compiler facade could not answer `find_references` for a node.
    FacadeFailure { node: String, reason: String },
    /// Reading the manifest failed. Fatal for dependency analysis; other
    /// detectors may still proceed.
    ManifestIo { path: PathBuf, source: String },
    /// An edge referred to a node that did not exist when it was inserted.
    /// Non-fatal: the builder creates the target on demand and proceeds.
    GraphInconsistency { detail: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Configuration { path, source } => {
                write!(f, "failed to parse configuration at {}: {}", path.display(), source)
            }
            EngineError::ResolverFailure { specifier, containing_file } => write!(
                f,
                "could not resolve '{}' from {}",
                specifier,
                containing_file.display()
            ),
            EngineError::FacadeFailure { node, reason } => {
                write!(f, "facade could not answer find_references for {}: {}", node, reason)
            }
            EngineError::ManifestIo { path, source } => {
                write!(f, "failed to read manifest at {}: {}", path.display(), source)
            }
            EngineError::GraphInconsistency { detail } => write!(f, "graph inconsistency: {}", detail),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(source: std::io::Error) -> Self {
        EngineError::ManifestIo {
            path: PathBuf::new(),
            source: source.to_string(),
        }
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(source: toml::de::Error) -> Self {
        EngineError::Configuration {
            path: PathBuf::new(),
            source: source.to_string(),
        }
    }
}

/// Print a `[sweepa][warn] ...` diagnostic and continue. Mirrors the bracket-prefixed
/// eprintln convention used throughout this crate for recoverable errors.
pub fn warn(message: impl fmt::Display) {
    eprintln!("[sweepa][warn] {}", message);
}

pub fn debug(message: impl fmt::Display) {
    if std::env::var_os("SWEEPA_DEBUG").is_some() {
        eprintln!("[sweepa][debug] {}", message);
    }
}

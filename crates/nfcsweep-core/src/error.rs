//! Error types for `nfcsweep-core`.
//!
//! All fallible operations in the core library return [`ScanResult<T>`],
//! which is an alias for `Result<T, ScanError>`.

use std::path::PathBuf;

/// Unified error type for scan and execution failures.
///
/// Each variant carries the offending path so the frontend can print a
/// diagnostic naming it together with the underlying system error text.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the scan root.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A rename target is not a usable file name (empty, `.`/`..`, or
    /// contains a path separator).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Failed to enter an action's target directory. Always fatal.
    #[error("{dir}: chdir: {source}")]
    ChangeDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    /// A deferred rename failed.
    #[error("{dir}/{from} -> {to}: rename: {source}")]
    Rename {
        dir: PathBuf,
        from: String,
        to: String,
        source: std::io::Error,
    },

    /// A deferred removal failed.
    #[error("{dir}/{name}: remove: {source}")]
    Remove {
        dir: PathBuf,
        name: String,
        source: std::io::Error,
    },

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `nfcsweep-core`.
pub type ScanResult<T> = Result<T, ScanError>;

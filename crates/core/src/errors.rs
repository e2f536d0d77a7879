//! Error types for the gitacct core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.
//!
//! Data-content problems (malformed account lines, keys with no record) are
//! deliberately NOT errors: the store parses leniently and the resolver
//! reports misses as `None` fields. Only structural failures surface here.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Account store errors
// ---------------------------------------------------------------------------

/// Errors from loading or saving the accounts file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The accounts file is missing or could not be read. This is surfaced
    /// rather than treated as an empty store, so a mistyped path does not
    /// silently resolve everything to nothing.
    #[error("accounts file unreadable at '{path}': {detail}")]
    Unreadable {
        path: String,
        detail: String,
    },

    /// Generic I/O wrapper (saving the accounts file).
    #[error("accounts I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Resolution errors
// ---------------------------------------------------------------------------

/// Errors from identity resolution.
///
/// "No match" is not an error: unresolved fields come back as `None` in the
/// result and the caller decides whether that is fatal.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither a remote URL nor an explicit account key was supplied.
    #[error("invalid resolution request: neither a remote URL nor an account key was given")]
    InvalidRequest,
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from local Git repository operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The path is not inside a Git repository.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// The named remote does not exist or has no URL configured.
    #[error("git remote '{0}' not found or has no URL")]
    RemoteNotFound(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from accounts-file path resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
}

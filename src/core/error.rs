use thiserror::Error;

use crate::vfs::Handle;

/// Errors returned by every fallible file-system operation.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path resolves to nothing known and the resolver (if any) had no file for it.
    #[error("not found: {0}")]
    NotFound(String),

    /// Included-file registry or search-path list is full.
    #[error("out of capacity: at most {limit} entries are supported")]
    OutOfCapacity { limit: usize },

    /// The include resolver itself reported an error.
    #[error("include resolver failed for {path}")]
    ResolverFailed {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Operation category is permanently unsupported.
    #[error("operation not supported: {0}")]
    NotCapable(&'static str),

    /// Descriptor does not map to a backing stream.
    #[error("bad file descriptor: {0}")]
    BadDescriptor(i32),

    /// Handle is not known to this file system.
    #[error("invalid handle: {0:?}")]
    InvalidHandle(Handle),

    /// A backing stream failed to read, write, seek or stat.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }

    pub fn is_not_capable(&self) -> bool {
        matches!(self, FsError::NotCapable(_))
    }
}

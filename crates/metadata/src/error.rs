use std::io;
use std::path::PathBuf;

/// Error raised when inspecting or modifying file metadata fails.
///
/// The error records the action that was attempted, the path it was
/// attempted on, and the underlying I/O failure.
#[derive(Debug, thiserror::Error)]
#[error("failed to {action} {}: {source}", path.display())]
pub struct MetadataError {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl MetadataError {
    /// Creates a metadata error for `action` attempted on `path`.
    #[must_use]
    pub fn new(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    /// Returns the underlying I/O error.
    #[must_use]
    pub fn source_io(&self) -> &io::Error {
        &self.source
    }
}

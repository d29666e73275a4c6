//! Error types for shusher-render.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while persisting the helper config file.
///
/// Rendering itself is infallible; only the temp-write and the atomic
/// rename can fail, and either failure leaves the on-disk state unknown,
/// so the daemon treats both as fatal.
#[derive(Debug, Error)]
pub enum WriteError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`WriteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.into(),
        source,
    }
}

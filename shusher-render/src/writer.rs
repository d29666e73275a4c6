//! Atomic persistence of the helper config file.
//!
//! ## `persist` protocol
//!
//! 1. Compare against the current on-disk content → skip if identical.
//! 2. Write the full rendering to a `.tmp` sibling (same directory, same
//!    filesystem, no EXDEV).
//! 3. Rename over the final path (atomic on POSIX).
//!
//! Any reader of the final path, including a helper started mid-write,
//! observes either the previous complete content or the new complete
//! content, never a partial file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, WriteError};

/// Outcome of a persist call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; rendered content matches what is on disk.
    Unchanged { path: PathBuf },
}

/// Atomically replace `path` with `content`.
pub fn persist(path: &Path, content: &str) -> Result<WriteResult, WriteError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    persist_with_tmp(path, content, &tmp)
}

fn persist_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<WriteResult, WriteError> {
    match std::fs::read_to_string(path) {
        Ok(existing) if existing == content => {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        // Unreadable current content is not fatal; the rename below replaces it.
        Err(err) => tracing::debug!("could not read {}: {err}", path.display()),
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

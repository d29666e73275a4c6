use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the daemon runtime, supervisor, and daemonization.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config source error: {0}")]
    Source(#[from] shusher_source::SourceError),

    #[error("config write error: {0}")]
    Write(#[from] shusher_render::WriteError),

    #[error("failed to launch helper {helper}: {source}")]
    Spawn {
        helper: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for helper: {0}")]
    Wait(#[source] std::io::Error),

    #[error("failed to signal helper (pid {pid}): {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("no helper process is running")]
    HelperNotRunning,

    #[error("failed to install shutdown handler: {0}")]
    ShutdownHook(#[from] ctrlc::Error),

    #[error("daemonize failed: {0}")]
    Daemonize(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}

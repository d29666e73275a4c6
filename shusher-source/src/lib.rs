//! Configuration retrieval for the shusher supervisor.
//!
//! `fetch()` is the single capability the reconciliation loop needs. Two
//! implementations exist, selected once at daemon start:
//!
//! - [`HttpSource`] — GET against a config endpoint keyed by MAC address.
//!   Absence is normal: non-200, transport failures, and malformed bodies
//!   all yield `Ok(None)` so the caller retries on its next poll.
//! - [`FileSource`] — re-reads a local JSON file on every poll. There is no
//!   later source to succeed where this one failed, so any failure is an
//!   error the caller treats as fatal.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use shusher_core::{DeviceConfig, MacAddr};

/// Path on the config host serving per-device documents.
const DEVICE_CONFIG_PATH: &str = "shushers/device_config";

/// Cap on a single endpoint round trip. Keeps a wedged server from stalling
/// the loop past its poll cadence.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from configuration retrieval.
///
/// Only [`FileSource`] produces these; the HTTP variant folds every failure
/// into absence.
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O failure reading the local config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON in the local config file.
    #[error("failed to parse device config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.into(),
        source,
    }
}

// ---------------------------------------------------------------------------
// ConfigSource capability
// ---------------------------------------------------------------------------

/// A place device configurations come from.
pub trait ConfigSource {
    /// Retrieve the current configuration.
    ///
    /// `Ok(None)` means "nothing available right now, try again later";
    /// `Err` means the source is broken and retrying is pointless.
    fn fetch(&self) -> Result<Option<DeviceConfig>, SourceError>;

    /// Human-readable description for log lines.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// Polls `http://<host>/shushers/device_config?mac_address=<id>`.
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(host: &str, mac_addr: &MacAddr) -> Self {
        let url = format!("http://{host}/{DEVICE_CONFIG_PATH}?mac_address={mac_addr}");
        let agent = ureq::AgentBuilder::new()
            .timeout(HTTP_TIMEOUT)
            .build();
        HttpSource { url, agent }
    }
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource").field("url", &self.url).finish()
    }
}

impl ConfigSource for HttpSource {
    fn fetch(&self) -> Result<Option<DeviceConfig>, SourceError> {
        match self.agent.get(&self.url).call() {
            Ok(response) => match response.into_json::<DeviceConfig>() {
                Ok(config) => Ok(Some(config)),
                Err(err) => {
                    warn!("malformed config body from {}: {err}", self.url);
                    Ok(None)
                }
            },
            Err(ureq::Error::Status(code, _)) => {
                warn!("no config from {}: HTTP {code}", self.url);
                Ok(None)
            }
            Err(err) => {
                warn!("config fetch from {} failed: {err}", self.url);
                Ok(None)
            }
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// Re-reads a JSON config file from a fixed path on every poll.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl ConfigSource for FileSource {
    fn fetch(&self) -> Result<Option<DeviceConfig>, SourceError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        let config = serde_json::from_str(&contents).map_err(|e| SourceError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(config))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

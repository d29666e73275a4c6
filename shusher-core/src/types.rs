//! Domain types for the shusher supervisor.
//!
//! [`DeviceConfig`] is the unit of reconciliation: the loop fetches one per
//! poll and compares it field-by-field against the currently active value.
//! All optional fields stay `Option`; absence must survive a round trip so
//! the renderer can emit sparse output.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lower interpolation bound used when the config omits `min_threshold`.
pub const DEFAULT_MIN_THRESHOLD: i64 = 40;

/// Upper interpolation bound used when the config omits `max_threshold`.
pub const DEFAULT_MAX_THRESHOLD: i64 = 120;

/// Sentinel written for a negative sensitivity; tells the helper to stop
/// thresholding entirely.
pub const THRESHOLD_DISABLED: i64 = -1;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed device hardware identifier, as sent to the config endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddr(pub String);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for MacAddr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MacAddr {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One device's configuration, as served by the endpoint or read from a
/// local JSON file.
///
/// `poll_interval` is the only required field: once any configuration has
/// been obtained it governs how long the loop sleeps between polls, so a
/// document without it is malformed. Unknown fields are ignored so the
/// endpoint is free to grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Hardware identifier echoed by the endpoint; never consulted locally
    /// (the CLI-supplied `--mac-addr` is the lookup key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    /// Normalized 0–100 noise sensitivity. Negative disables thresholding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_threshold: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_threshold: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_threshold: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f64>,

    /// Base name of the deterrent audio clip; rendered as `"<filename>.wav"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Seconds the helper stays quiet after playing the clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i64>,

    /// Seconds between configuration polls.
    pub poll_interval: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_device: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_device: Option<String>,
}

impl DeviceConfig {
    /// The poll sleep as a [`Duration`].
    pub fn poll_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

/// Device names supplied on the daemon command line.
///
/// An override present here always wins over the config-embedded device
/// name of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceOverrides {
    pub input_device: Option<String>,
    pub output_device: Option<String>,
}

impl DeviceOverrides {
    pub fn is_empty(&self) -> bool {
        self.input_device.is_none() && self.output_device.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

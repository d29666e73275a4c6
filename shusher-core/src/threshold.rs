//! Sensitivity-to-threshold interpolation.
//!
//! The endpoint hands out a normalized 0–100 sensitivity; the helper wants an
//! absolute loudness threshold. [`calculate`] maps one to the other linearly
//! over `[min_threshold, max_threshold]`. A negative sensitivity short-circuits
//! to [`THRESHOLD_DISABLED`] before any bounds are consulted.

use std::fmt;
use std::str::FromStr;

use crate::types::{
    DeviceConfig, DEFAULT_MAX_THRESHOLD, DEFAULT_MIN_THRESHOLD, THRESHOLD_DISABLED,
};

/// Linearly interpolate a 0–100 sensitivity into `[min_threshold, max_threshold]`.
///
/// Pure and total over integer inputs: no clamping is applied, so a
/// sensitivity above 100 extrapolates past `max_threshold` exactly as the
/// interpolation formula dictates.
pub fn calculate(sound_threshold: i64, min_threshold: i64, max_threshold: i64) -> i64 {
    if sound_threshold < 0 {
        return THRESHOLD_DISABLED;
    }
    let span = (max_threshold - min_threshold) as f64;
    let scaled = span * (sound_threshold as f64 / 100.0) + min_threshold as f64;
    scaled.floor() as i64
}

// ---------------------------------------------------------------------------
// ThresholdMode
// ---------------------------------------------------------------------------

/// How the renderer turns `sound_threshold` into the emitted `threshold` line.
///
/// The source variants disagreed on this, so the policy is explicit and fixed
/// at daemon start rather than hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Interpolate when at least one bound accompanies `sound_threshold`;
    /// otherwise pass the raw value through.
    #[default]
    Auto,
    /// Always interpolate, substituting the default bounds for missing ones.
    Scaled,
    /// Always pass the raw value through.
    Raw,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::Auto => write!(f, "auto"),
            ThresholdMode::Scaled => write!(f, "scaled"),
            ThresholdMode::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ThresholdMode::Auto),
            "scaled" => Ok(ThresholdMode::Scaled),
            "raw" => Ok(ThresholdMode::Raw),
            other => Err(format!(
                "unknown threshold mode '{other}'; expected: auto, scaled, raw"
            )),
        }
    }
}

/// The `threshold` value to emit for `config`, or `None` when the config
/// carries no `sound_threshold` and the line must be omitted.
///
/// A negative sensitivity yields [`THRESHOLD_DISABLED`] in every mode.
pub fn effective_threshold(config: &DeviceConfig, mode: ThresholdMode) -> Option<i64> {
    let sound_threshold = config.sound_threshold?;
    if sound_threshold < 0 {
        return Some(THRESHOLD_DISABLED);
    }

    let interpolate = || {
        calculate(
            sound_threshold,
            config.min_threshold.unwrap_or(DEFAULT_MIN_THRESHOLD),
            config.max_threshold.unwrap_or(DEFAULT_MAX_THRESHOLD),
        )
    };

    Some(match mode {
        ThresholdMode::Auto => {
            if config.min_threshold.is_some() || config.max_threshold.is_some() {
                interpolate()
            } else {
                sound_threshold
            }
        }
        ThresholdMode::Scaled => interpolate(),
        ThresholdMode::Raw => sound_threshold,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Sparse `key = value` rendering of a device configuration.
//!
//! A key's line is emitted only when the corresponding source field is
//! present; absent input never produces a defaulted output line. Line
//! order matches what the helper's parser has always been fed:
//! `decay`, `threshold`, `shush_file`, `input_device`, `output_device`,
//! `cooldown`.

use std::path::Path;

use shusher_core::{effective_threshold, DeviceConfig, DeviceOverrides, ThresholdMode};

use crate::error::WriteError;
use crate::writer::{persist, WriteResult};

/// Renders device configurations for one daemon invocation.
///
/// Overrides and threshold mode are fixed at construction; only the
/// configuration varies per call.
#[derive(Debug, Clone)]
pub struct Renderer {
    overrides: DeviceOverrides,
    mode: ThresholdMode,
}

impl Renderer {
    pub fn new(overrides: DeviceOverrides, mode: ThresholdMode) -> Self {
        Renderer { overrides, mode }
    }

    /// Render `config` to the helper file format.
    pub fn render(&self, config: &DeviceConfig) -> String {
        let mut out = String::new();

        if let Some(decay) = config.decay {
            out.push_str(&format!("decay = {}\n", format_two_sig(decay)));
        }
        if let Some(threshold) = effective_threshold(config, self.mode) {
            out.push_str(&format!("threshold = {threshold}\n"));
        }
        if let Some(filename) = &config.filename {
            out.push_str(&format!("shush_file = \"{filename}.wav\"\n"));
        }
        if let Some(device) = self
            .overrides
            .input_device
            .as_deref()
            .or(config.input_device.as_deref())
        {
            out.push_str(&format!("input_device = \"{device}\"\n"));
        }
        if let Some(device) = self
            .overrides
            .output_device
            .as_deref()
            .or(config.output_device.as_deref())
        {
            out.push_str(&format!("output_device = \"{device}\"\n"));
        }
        if let Some(cooldown) = config.cooldown {
            out.push_str(&format!("cooldown = {cooldown}\n"));
        }

        out
    }

    /// Render `config` and atomically persist it at `path`.
    pub fn render_and_persist(
        &self,
        config: &DeviceConfig,
        path: &Path,
    ) -> Result<WriteResult, WriteError> {
        persist(path, &self.render(config))
    }
}

/// Format a float to two significant digits, the precision the helper's
/// decay parser has always been given.
fn format_two_sig(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (1 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

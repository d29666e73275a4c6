//! Shusher core library — device configuration model and threshold math.
//!
//! Public API surface:
//! - [`types`] — [`DeviceConfig`], [`DeviceOverrides`], [`MacAddr`]
//! - [`threshold`] — sensitivity-to-threshold interpolation

pub mod threshold;
pub mod types;

pub use threshold::{calculate, effective_threshold, ThresholdMode};
pub use types::{DeviceConfig, DeviceOverrides, MacAddr};

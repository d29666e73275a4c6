//! # shusher-render
//!
//! Renders a [`shusher_core::DeviceConfig`] into the helper's line-oriented
//! `key = value` config file and persists it atomically.
//!
//! Construct a [`Renderer`] once with the CLI device overrides and threshold
//! mode, then call [`Renderer::render_and_persist`] for every accepted
//! configuration.

pub mod error;
pub mod render;
pub mod writer;

pub use error::WriteError;
pub use render::Renderer;
pub use writer::{persist, WriteResult};

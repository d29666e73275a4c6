//! shusherd — keeps the shusher audio helper running against the current
//! device configuration.
//!
//! # Usage
//!
//! ```text
//! shusherd --host cfg.example.net --mac-addr aa:bb:cc:dd:ee:ff
//! shusherd --config config.json --foreground
//! shusherd --input-device pulse:mic0 --output-device pulse:spk0
//! ```
//!
//! With `--host` the device configuration is polled from the network,
//! keyed by `--mac-addr`; otherwise it is re-read from the local
//! `--config` file. Either way the daemon renders `shusherrc`, starts the
//! helper, and restarts it whenever the effective configuration changes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use shusher_core::{DeviceOverrides, MacAddr, ThresholdMode};
use shusher_daemon::{daemonize, paths, start_blocking, RuntimeOptions};
use shusher_render::Renderer;
use shusher_source::{ConfigSource, FileSource, HttpSource};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "shusherd",
    version,
    about = "Supervise the shusher audio helper",
    long_about = None,
)]
struct Cli {
    /// Config endpoint host; enables network mode.
    #[arg(short = 'H', long, requires = "mac_addr")]
    host: Option<String>,

    /// Local device config file, re-read on every poll (ignored in network mode).
    #[arg(short = 'C', long, default_value = paths::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Device hardware identifier sent to the endpoint.
    #[arg(short = 'M', long)]
    mac_addr: Option<String>,

    /// Stay attached to the terminal instead of daemonizing.
    #[arg(short = 'f', long)]
    foreground: bool,

    /// Capture device; wins over the configured input device.
    #[arg(short = 'I', long)]
    input_device: Option<String>,

    /// Playback device; wins over the configured output device.
    #[arg(short = 'O', long)]
    output_device: Option<String>,

    /// Helper executable to supervise.
    #[arg(long, default_value = paths::DEFAULT_HELPER)]
    helper: PathBuf,

    /// How sound_threshold becomes the rendered threshold line.
    #[arg(long, default_value_t = ThresholdMode::Auto)]
    threshold_mode: ThresholdMode,
}

impl Cli {
    fn source(&self) -> Box<dyn ConfigSource> {
        match (&self.host, &self.mac_addr) {
            (Some(host), Some(mac_addr)) => {
                Box::new(HttpSource::new(host, &MacAddr::from(mac_addr.as_str())))
            }
            _ => Box::new(FileSource::new(&self.config)),
        }
    }

    fn overrides(&self) -> DeviceOverrides {
        DeviceOverrides {
            input_device: self.input_device.clone(),
            output_device: self.output_device.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.foreground {
        daemonize::daemonize(&paths::pid_file_path(), &paths::daemon_log_path())
            .context("failed to daemonize")?;
    }

    let source = cli.source();
    let renderer = Renderer::new(cli.overrides(), cli.threshold_mode);
    let options = RuntimeOptions {
        helper: cli.helper.clone(),
        helper_config: paths::helper_config_path(),
        bootstrap_retry: paths::BOOTSTRAP_RETRY,
    };

    start_blocking(source.as_ref(), &renderer, &options).context("daemon exited with error")
}

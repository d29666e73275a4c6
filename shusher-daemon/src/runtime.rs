//! The reconciliation loop.
//!
//! Single-threaded, cooperative: fetch → compare → (maybe) persist →
//! (maybe) terminate/spawn → sleep, in strict sequence. The poll sleep
//! doubles as the child-exit watch, so a helper crash is noticed no later
//! than the next poll boundary and answered with an immediate respawn.
//!
//! Blocking points check the shutdown flag in short slices so a SIGINT or
//! SIGTERM delivered mid-sleep stops the daemon promptly; the supervisor's
//! `Drop` then guarantees the helper dies with it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use shusher_core::DeviceConfig;
use shusher_render::Renderer;
use shusher_source::ConfigSource;

use crate::error::DaemonError;
use crate::paths;
use crate::supervisor::Supervisor;

/// Upper bound on a single uninterruptible sleep slice.
const SHUTDOWN_POLL_SLICE: Duration = Duration::from_millis(200);

/// Fixed parameters of one daemon invocation.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Helper executable to supervise.
    pub helper: PathBuf,
    /// Where the rendered helper config is persisted.
    pub helper_config: PathBuf,
    /// Sleep between bootstrap fetch attempts.
    pub bootstrap_retry: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        RuntimeOptions {
            helper: PathBuf::from(paths::DEFAULT_HELPER),
            helper_config: paths::helper_config_path(),
            bootstrap_retry: paths::BOOTSTRAP_RETRY,
        }
    }
}

/// Initialize tracing and run the reconciliation loop until a shutdown
/// signal arrives or a fatal error occurs.
pub fn start_blocking(
    source: &dyn ConfigSource,
    renderer: &Renderer,
    options: &RuntimeOptions,
) -> Result<(), DaemonError> {
    init_tracing();
    let shutdown = install_shutdown_handler()?;
    run(source, renderer, options, &shutdown)
}

/// Route SIGINT/SIGTERM into a flag the loop checks at every blocking point.
pub fn install_shutdown_handler() -> Result<Arc<AtomicBool>, DaemonError> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;
    Ok(flag)
}

/// The reconciliation loop: bootstrap, then poll / diff / reload / respawn.
pub fn run(
    source: &dyn ConfigSource,
    renderer: &Renderer,
    options: &RuntimeOptions,
    shutdown: &AtomicBool,
) -> Result<(), DaemonError> {
    let mut supervisor = Supervisor::new(&options.helper);

    let Some(mut current) = bootstrap(source, options, shutdown)? else {
        return Ok(()); // shutdown before any configuration arrived
    };
    renderer.render_and_persist(&current, &options.helper_config)?;
    supervisor.spawn()?;

    while !shutdown.load(Ordering::SeqCst) {
        // Sleep on the *current* config's interval, racing helper exit.
        match wait_poll_interval(&mut supervisor, current.poll_duration(), shutdown)? {
            ChildObservation::Exited(status) => {
                // Helper died on its own. Log and respawn unconditionally;
                // the configuration has not changed.
                if status.success() {
                    tracing::info!(status = %status, "helper exited; respawning");
                } else {
                    tracing::warn!(status = %status, "helper failed; respawning");
                }
                supervisor.spawn()?;
                continue;
            }
            ChildObservation::Running => {}
        }
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        match source.fetch()? {
            None => {
                tracing::debug!("no configuration available from {}", source.describe());
            }
            Some(fetched) if fetched == current => {
                tracing::debug!("configuration unchanged");
            }
            Some(fetched) => {
                tracing::info!("configuration changed; reloading helper");
                current = fetched;
                reload(&mut supervisor, renderer, &current, options)?;
            }
        }
    }

    if supervisor.is_running() {
        let status = supervisor.terminate()?;
        tracing::info!(status = %status, "helper stopped for shutdown");
    }
    Ok(())
}

/// Fetch until a configuration exists.
///
/// An absent result sleeps [`RuntimeOptions::bootstrap_retry`] and tries
/// again, indefinitely; a source error (local file missing or malformed)
/// propagates and fails the daemon before any helper is spawned. Returns
/// `None` only when shutdown was requested while still waiting.
fn bootstrap(
    source: &dyn ConfigSource,
    options: &RuntimeOptions,
    shutdown: &AtomicBool,
) -> Result<Option<DeviceConfig>, DaemonError> {
    while !shutdown.load(Ordering::SeqCst) {
        match source.fetch()? {
            Some(config) => {
                tracing::info!(source = %source.describe(), "obtained initial configuration");
                return Ok(Some(config));
            }
            None => {
                tracing::info!(
                    source = %source.describe(),
                    retry_secs = options.bootstrap_retry.as_secs(),
                    "failed to get config, sleeping"
                );
                sleep_interruptible(options.bootstrap_retry, shutdown);
            }
        }
    }
    Ok(None)
}

/// Persist the newly accepted config, stop the running helper, start a
/// fresh one against the new file.
fn reload(
    supervisor: &mut Supervisor,
    renderer: &Renderer,
    config: &DeviceConfig,
    options: &RuntimeOptions,
) -> Result<(), DaemonError> {
    renderer.render_and_persist(config, &options.helper_config)?;
    let status = supervisor.terminate()?;
    tracing::info!(status = %status, "helper stopped for reload");
    supervisor.spawn()
}

enum ChildObservation {
    Exited(std::process::ExitStatus),
    Running,
}

/// Block for `interval`, returning early if the helper exits or shutdown is
/// requested. The wait is sliced so signal delivery is observed promptly.
fn wait_poll_interval(
    supervisor: &mut Supervisor,
    interval: Duration,
    shutdown: &AtomicBool,
) -> Result<ChildObservation, DaemonError> {
    let deadline = Instant::now() + interval;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let slice = remaining.min(SHUTDOWN_POLL_SLICE);
        if let Some(status) = supervisor.wait_exit_timeout(slice)? {
            return Ok(ChildObservation::Exited(status));
        }
        if remaining <= SHUTDOWN_POLL_SLICE || shutdown.load(Ordering::SeqCst) {
            return Ok(ChildObservation::Running);
        }
    }
}

fn sleep_interruptible(duration: Duration, shutdown: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while !shutdown.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        std::thread::sleep(remaining.min(SHUTDOWN_POLL_SLICE));
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

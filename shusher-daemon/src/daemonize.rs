//! Classic double-fork daemonization.
//!
//! Runs before the shutdown handler is installed and before any helper is
//! spawned, since forking must not duplicate either. `--foreground` skips
//! this entirely.

use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use nix::unistd::{fork, setsid, ForkResult};

use crate::error::{io_err, DaemonError};

/// Detach from the controlling terminal: fork → setsid → fork, write the
/// pid file, redirect stdout/stderr to `log_file` and close stdin.
///
/// Returns in the daemonized grandchild only; both intermediate parents
/// exit `0`.
pub fn daemonize(pid_file: &Path, log_file: &Path) -> Result<(), DaemonError> {
    match unsafe { fork() }.map_err(|e| DaemonError::Daemonize(format!("first fork: {e}")))? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    setsid().map_err(|e| DaemonError::Daemonize(format!("setsid: {e}")))?;

    // Second fork keeps the daemon from ever reacquiring a controlling
    // terminal.
    match unsafe { fork() }.map_err(|e| DaemonError::Daemonize(format!("second fork: {e}")))? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    std::fs::write(pid_file, format!("{}\n", std::process::id()))
        .map_err(|e| io_err(pid_file, e))?;

    let log = File::create(log_file).map_err(|e| io_err(log_file, e))?;
    let log_fd = log.as_raw_fd();
    unsafe {
        libc::close(0);
        if libc::dup2(log_fd, 1) < 0 {
            return Err(DaemonError::Daemonize("failed to redirect stdout".into()));
        }
        if libc::dup2(log_fd, 2) < 0 {
            return Err(DaemonError::Daemonize("failed to redirect stderr".into()));
        }
    }

    Ok(())
}

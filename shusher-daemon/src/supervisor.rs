//! Helper child-process lifecycle.
//!
//! [`Supervisor`] is the sole owner of the child handle: at most one helper
//! is live at any time, and dropping the supervisor (on any daemon exit
//! path, orderly or not) kills and reaps whatever is still running. Code
//! outside this module never touches the handle.

use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use wait_timeout::ChildExt;

use crate::error::DaemonError;

/// Owns and supervises the single helper child process.
#[derive(Debug)]
pub struct Supervisor {
    helper: PathBuf,
    child: Option<Child>,
    last_exit: Option<ExitStatus>,
}

impl Supervisor {
    pub fn new(helper: impl Into<PathBuf>) -> Self {
        Supervisor {
            helper: helper.into(),
            child: None,
            last_exit: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Exit status recorded when the last helper terminated.
    pub fn last_exit(&self) -> Option<ExitStatus> {
        self.last_exit
    }

    /// Start the helper. The helper reads `shusherrc` from the inherited
    /// working directory, so no arguments are passed.
    ///
    /// Launch failure is fatal: without a helper there is nothing to
    /// supervise.
    pub fn spawn(&mut self) -> Result<(), DaemonError> {
        let child = Command::new(&self.helper)
            .spawn()
            .map_err(|source| DaemonError::Spawn {
                helper: self.helper.clone(),
                source,
            })?;
        tracing::info!(pid = child.id(), helper = %self.helper.display(), "spawned helper");
        self.child = Some(child);
        Ok(())
    }

    /// Terminate the helper (SIGTERM) and block until its exit is observed.
    ///
    /// Returns the recorded exit status. An already-exited child is not an
    /// error; the wait below still reaps it.
    pub fn terminate(&mut self) -> Result<ExitStatus, DaemonError> {
        let Some(mut child) = self.child.take() else {
            return Err(DaemonError::HelperNotRunning);
        };
        let pid = child.id();

        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(source) => {
                // Put the handle back so Drop still reaps it.
                self.child = Some(child);
                return Err(DaemonError::Signal { pid, source });
            }
        }

        let status = child.wait().map_err(DaemonError::Wait)?;
        tracing::info!(pid, status = %status, "helper terminated");
        self.last_exit = Some(status);
        Ok(status)
    }

    /// Wait up to `timeout` for the helper to exit on its own.
    ///
    /// `Ok(Some(status))` means the child is gone and its status recorded;
    /// `Ok(None)` means it is still running when the timeout elapsed.
    pub fn wait_exit_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<ExitStatus>, DaemonError> {
        let Some(child) = self.child.as_mut() else {
            return Err(DaemonError::HelperNotRunning);
        };

        match child.wait_timeout(timeout).map_err(DaemonError::Wait)? {
            Some(status) => {
                self.child = None;
                self.last_exit = Some(status);
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!(pid = child.id(), "killing helper on shutdown");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn fake_helper(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("helper.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write helper");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod helper");
        path
    }

    fn pid_alive(pid: u32) -> bool {
        signal::kill(Pid::from_raw(pid as i32), None).is_ok()
    }

    fn child_pid(supervisor: &Supervisor) -> u32 {
        supervisor.child.as_ref().expect("running child").id()
    }

    #[test]
    fn spawn_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = Supervisor::new(dir.path().join("missing-helper"));
        assert!(matches!(supervisor.spawn(), Err(DaemonError::Spawn { .. })));
        assert!(!supervisor.is_running());
    }

    #[test]
    fn terminate_records_exit_status() {
        let dir = TempDir::new().unwrap();
        let helper = fake_helper(&dir, "exec sleep 30");
        let mut supervisor = Supervisor::new(helper);
        supervisor.spawn().expect("spawn");
        assert!(supervisor.is_running());

        let status = supervisor.terminate().expect("terminate");
        assert!(!status.success(), "SIGTERM exit is not success");
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.last_exit(), Some(status));
    }

    #[test]
    fn terminate_without_child_is_an_error() {
        let mut supervisor = Supervisor::new(Path::new("/bin/true"));
        assert!(matches!(
            supervisor.terminate(),
            Err(DaemonError::HelperNotRunning)
        ));
    }

    #[test]
    fn wait_observes_natural_exit() {
        let dir = TempDir::new().unwrap();
        let helper = fake_helper(&dir, "exit 3");
        let mut supervisor = Supervisor::new(helper);
        supervisor.spawn().expect("spawn");

        let status = supervisor
            .wait_exit_timeout(Duration::from_secs(5))
            .expect("wait")
            .expect("helper should exit within the timeout");
        assert_eq!(status.code(), Some(3));
        assert!(!supervisor.is_running());
    }

    #[test]
    fn wait_times_out_while_helper_lives() {
        let dir = TempDir::new().unwrap();
        let helper = fake_helper(&dir, "exec sleep 30");
        let mut supervisor = Supervisor::new(helper);
        supervisor.spawn().expect("spawn");

        let observed = supervisor
            .wait_exit_timeout(Duration::from_millis(100))
            .expect("wait");
        assert!(observed.is_none());
        assert!(supervisor.is_running());
    }

    #[test]
    fn drop_kills_live_helper() {
        let dir = TempDir::new().unwrap();
        let helper = fake_helper(&dir, "exec sleep 30");
        let mut supervisor = Supervisor::new(helper);
        supervisor.spawn().expect("spawn");
        let pid = child_pid(&supervisor);
        assert!(pid_alive(pid));

        drop(supervisor);
        assert!(!pid_alive(pid), "helper must not outlive its supervisor");
    }

    #[test]
    fn terminate_after_self_exit_still_reaps() {
        let dir = TempDir::new().unwrap();
        let helper = fake_helper(&dir, "exit 0");
        let mut supervisor = Supervisor::new(helper);
        supervisor.spawn().expect("spawn");

        // Give the helper time to exit on its own, then terminate anyway.
        std::thread::sleep(Duration::from_millis(200));
        let status = supervisor.terminate().expect("terminate");
        assert_eq!(status.code(), Some(0));
    }
}

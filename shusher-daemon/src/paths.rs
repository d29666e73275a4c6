use std::path::PathBuf;
use std::time::Duration;

/// Helper config artifact, written next to wherever the daemon was started.
/// The helper reads it from the same working directory.
pub const HELPER_CONFIG: &str = "shusherrc";

/// Helper executable launched by the supervisor unless `--helper` overrides it.
pub const DEFAULT_HELPER: &str = "./shusher-helper";

/// Local device-config file read when no `--host` is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Sleep between bootstrap fetch attempts while no configuration exists yet.
pub const BOOTSTRAP_RETRY: Duration = Duration::from_secs(10);

pub const PID_FILE: &str = "shusherd.pid";
pub const DAEMON_LOG: &str = "shusherd.log";

pub fn helper_config_path() -> PathBuf {
    PathBuf::from(HELPER_CONFIG)
}

pub fn pid_file_path() -> PathBuf {
    PathBuf::from(PID_FILE)
}

pub fn daemon_log_path() -> PathBuf {
    PathBuf::from(DAEMON_LOG)
}

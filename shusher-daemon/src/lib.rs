//! Shusher daemon runtime: configuration reconciliation and helper supervision.
//!
//! The daemon keeps exactly one helper process running against the most
//! recently accepted device configuration. [`runtime::run`] is the
//! single-threaded reconciliation loop; [`supervisor::Supervisor`] owns the
//! child process handle and guarantees it is killed on every exit path.

mod error;
pub mod daemonize;
pub mod paths;
pub mod runtime;
pub mod supervisor;

pub use error::DaemonError;
pub use runtime::{install_shutdown_handler, run, start_blocking, RuntimeOptions};
pub use supervisor::Supervisor;

//! Logger setup for hosts and demos.
//!
//! Library code only uses the `log` facade; this installs `env_logger` once.

mod init;

pub use init::{init_logging, LoggingConfig};

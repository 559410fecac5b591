//! Logging setup.
//!
//! The crate logs through the `log` facade; this module installs
//! `env_logger` as the backend for binaries that want one.

mod init;

pub use init::{LoggingConfig, init_logging};

//! Utility module
//!
//! Logging setup shared by all commands.

mod logger;

pub use logger::{init_logger, LogLevel};

//! Shared utilities for mayor elections.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};

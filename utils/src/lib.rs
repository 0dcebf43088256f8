//! Shared utilities for VoteDAO binaries.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};
pub use time::{format_age, format_duration};

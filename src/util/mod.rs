//! Utility modules for repobuild
//!
//! Currently holds the structured logging setup.

pub mod logging;

// Re-export commonly used items
pub use logging::{init_logging, parse_level, LoggingConfig};

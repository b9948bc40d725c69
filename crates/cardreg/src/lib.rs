//! Device-directory access for the cardreg binary.

/// Register file reading and bus-family detection.
pub mod source;
pub use source::{detect_bus, read_register, SourceError};

#[cfg(test)]
use tempfile as _;

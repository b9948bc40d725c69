//! Reading register images from a device directory.
//!
//! A device directory is the sysfs-style layout the kernel exposes for a
//! card: one file per register (`cid`, `csd`, `scr`) holding the hex image
//! on its first line, plus a `type` file naming the bus family. Only the
//! first line of each file is meaningful; trailing content is ignored.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cardreg_core::{BusFamily, DecodeError};

/// Errors raised while reading register files from a device directory.
#[derive(Debug)]
pub enum SourceError {
    /// A register file could not be opened or read.
    Unreadable {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The `type` file named a bus family this tool does not know.
    UnknownBusType(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, source } => {
                write!(f, "could not read '{}': {}", path.display(), source)
            }
            Self::UnknownBusType(name) => write!(f, "unknown bus type '{name}'"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::UnknownBusType(_) => None,
        }
    }
}

impl From<SourceError> for DecodeError {
    fn from(error: SourceError) -> Self {
        Self::SourceUnavailable {
            reason: error.to_string(),
        }
    }
}

/// Reads the first line of the file `name` under `dir`, trimmed of
/// surrounding whitespace.
///
/// # Errors
///
/// Returns [`SourceError::Unreadable`] when the file cannot be read.
pub fn read_register(dir: &Path, name: &str) -> Result<String, SourceError> {
    let path = dir.join(name);
    let content = fs::read_to_string(&path).map_err(|source| SourceError::Unreadable {
        path: path.clone(),
        source,
    })?;
    Ok(content.lines().next().unwrap_or("").trim().to_string())
}

/// Detects the bus family of the device under `dir` from its `type` file.
///
/// # Errors
///
/// Returns [`SourceError::Unreadable`] when the `type` file cannot be
/// read and [`SourceError::UnknownBusType`] when it names neither family.
pub fn detect_bus(dir: &Path) -> Result<BusFamily, SourceError> {
    let name = read_register(dir, "type")?;
    BusFamily::from_name(&name).ok_or(SourceError::UnknownBusType(name))
}

#[cfg(test)]
mod tests {
    use super::{detect_bus, read_register, SourceError};
    use cardreg_core::BusFamily;
    use std::fs;

    #[test]
    fn reads_the_first_line_trimmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("cid"), "035344535530344780325a5d0300e3db\n")
            .expect("write register file");
        let content = read_register(dir.path(), "cid").expect("readable");
        assert_eq!(content, "035344535530344780325a5d0300e3db");
    }

    #[test]
    fn ignores_content_past_the_first_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("csd"), "  400e \nsecond line\n").expect("write register file");
        assert_eq!(read_register(dir.path(), "csd").expect("readable"), "400e");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = read_register(dir.path(), "cid").expect_err("no such file");
        assert!(matches!(error, SourceError::Unreadable { .. }));
    }

    #[test]
    fn detects_bus_family_case_insensitively() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("type"), "MMC\n").expect("write type file");
        assert_eq!(detect_bus(dir.path()).expect("known type"), BusFamily::Mmc);
    }

    #[test]
    fn rejects_unknown_bus_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("type"), "nvme\n").expect("write type file");
        let error = detect_bus(dir.path()).expect_err("unknown type");
        assert_eq!(error.to_string(), "unknown bus type 'nvme'");
    }
}

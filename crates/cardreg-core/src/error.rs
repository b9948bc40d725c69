use thiserror::Error;

/// Errors produced while decoding a single register image.
///
/// Every error is local to one register's decode. Decoding is pure and
/// deterministic, so there are no retries; callers report the error and
/// carry on with other registers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodeError {
    /// The register content contained a character outside `0-9a-fA-F`.
    #[error("register content is not a hexadecimal string")]
    MalformedInput,
    /// The structure-version discriminator selects no known field layout.
    #[error("unknown CSD structure: 0x{0:x}")]
    UnsupportedStructureVersion(u32),
    /// The register content could not be obtained from its source.
    #[error("register content unavailable: {reason}")]
    SourceUnavailable {
        /// Description supplied by the source collaborator.
        reason: String,
    },
}

impl DecodeError {
    /// True when the error degrades to a notice instead of a failure.
    ///
    /// An unrecognized structure version is a handled outcome: the caller
    /// prints a one-line notice and the overall run is still considered
    /// successful for that register.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::UnsupportedStructureVersion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::DecodeError;

    #[test]
    fn unsupported_version_is_degraded_only() {
        assert!(DecodeError::UnsupportedStructureVersion(2).is_degraded());
        assert!(!DecodeError::MalformedInput.is_degraded());
        assert!(!DecodeError::SourceUnavailable {
            reason: "missing".to_string()
        }
        .is_degraded());
    }

    #[test]
    fn display_names_the_unknown_version() {
        let error = DecodeError::UnsupportedStructureVersion(0x3);
        assert_eq!(error.to_string(), "unknown CSD structure: 0x3");
    }
}

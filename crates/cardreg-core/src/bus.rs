//! Bus family selection.

/// Device-interface convention selecting register layouts and the
/// manufacturer table a decoder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusFamily {
    /// SD interface convention.
    Sd,
    /// MMC/eMMC interface convention.
    Mmc,
}

impl BusFamily {
    /// Parses a bus family name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sd" => Some(Self::Sd),
            "mmc" => Some(Self::Mmc),
            _ => None,
        }
    }

    /// Upper-case label used in report headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sd => "SD",
            Self::Mmc => "MMC",
        }
    }
}

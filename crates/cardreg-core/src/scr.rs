//! SCR (SD card configuration) register decoding. The register is SD
//! only and 64 bits wide.

use crate::bits::Bitstream;
use crate::error::DecodeError;
use crate::layout::{FieldSpec, Fields};
use crate::report::{Report, ReportMode};
use crate::tables::{scr_structure_label, sd_security_label, sd_spec_label};

/// SD SCR layout, 64 bits.
pub static SD_SCR_LAYOUT: [FieldSpec; 10] = [
    FieldSpec::unsigned(4), // SCR_STRUCTURE
    FieldSpec::unsigned(4), // SD_SPEC
    FieldSpec::unsigned(1), // DATA_STAT_AFTER_ERASE
    FieldSpec::unsigned(3), // SD_SECURITY
    FieldSpec::unsigned(4), // SD_BUS_WIDTHS
    FieldSpec::unsigned(1), // SD_SPEC3
    FieldSpec::unsigned(4), // EX_SECURITY
    FieldSpec::reserved(9),
    FieldSpec::unsigned(2), // CMD_SUPPORT
    FieldSpec::reserved(32),
];

/// A decoded SD card configuration register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SdScr {
    /// Structure version of the register itself.
    pub scr_structure: u32,
    /// Physical-layer specification version code.
    pub sd_spec: u32,
    /// Data status after erase.
    pub data_stat_after_erase: u32,
    /// Security specification code.
    pub sd_security: u32,
    /// Supported bus-width bitmap.
    pub sd_bus_widths: u32,
    /// Version 3.0x flag refining `sd_spec`.
    pub sd_spec3: u32,
    /// Extended security code.
    pub ex_security: u32,
    /// Optional-command support bitmap.
    pub cmd_support: u32,
}

impl SdScr {
    /// Decodes an SCR from its hex image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedInput`] when `hex` is not a
    /// hexadecimal string.
    pub fn parse(hex: &str) -> Result<Self, DecodeError> {
        let bits = Bitstream::from_hex(hex)?;
        let mut fields = Fields::extract(&bits, &SD_SCR_LAYOUT);
        Ok(Self {
            scr_structure: fields.unsigned(),
            sd_spec: fields.unsigned(),
            data_stat_after_erase: fields.unsigned(),
            sd_security: fields.unsigned(),
            sd_bus_widths: fields.unsigned(),
            sd_spec3: fields.unsigned(),
            ex_security: fields.unsigned(),
            cmd_support: fields.unsigned(),
        })
    }

    /// The resolved physical-layer version, with `sd_spec3` refining the
    /// 2.00 code.
    #[must_use]
    pub const fn spec_version(&self) -> &'static str {
        match (self.sd_spec, self.sd_spec3) {
            (0, _) => "SD 1.0/1.01",
            (1, _) => "SD 1.10",
            (2, 0) => "SD 2.00",
            (2, 1) => "SD 3.0x",
            (3, _) => "SD 4.00",
            _ => "unknown",
        }
    }

    /// Supported bus widths as a comma-joined list, widest first.
    #[must_use]
    pub fn bus_widths(&self) -> String {
        let mut widths = Vec::new();
        if (self.sd_bus_widths >> 2) & 1 == 1 {
            widths.push("4bit");
        }
        if self.sd_bus_widths & 1 == 1 {
            widths.push("1bit");
        }
        widths.join(", ")
    }

    fn command_support(&self) -> String {
        let mut commands = Vec::new();
        if (self.cmd_support >> 1) & 1 == 1 {
            commands.push("CMD23");
        }
        if self.cmd_support & 1 == 1 {
            commands.push("CMD20");
        }
        commands.join(", ")
    }

    /// Renders the register as a text report.
    #[must_use]
    pub fn report(&self, mode: ReportMode) -> Report {
        let mut out = Report::new();

        match mode {
            ReportMode::Verbose => {
                out.push("======SD/SCR======".to_string());
                out.push(format!(
                    "\tSCR_STRUCTURE: 0x{:x} ({})",
                    self.scr_structure,
                    scr_structure_label(self.scr_structure)
                ));
                out.push(format!(
                    "\tSD_SPEC: 0x{:x} ({})",
                    self.sd_spec,
                    sd_spec_label(self.sd_spec)
                ));
                out.push(format!(
                    "\tDATA_STAT_AFTER_ERASE: 0x{:x}",
                    self.data_stat_after_erase
                ));
                out.push(format!(
                    "\tSD_SECURITY: 0x{:x} ({})",
                    self.sd_security,
                    sd_security_label(self.sd_security)
                ));
                out.push(format!(
                    "\tSD_BUS_WIDTHS: 0x{:x} ({} bus)",
                    self.sd_bus_widths,
                    self.bus_widths()
                ));
                out.push(format!(
                    "\tSD_SPEC3: 0x{:x} ({})",
                    self.sd_spec3,
                    if self.sd_spec >= 2 {
                        if self.sd_spec3 == 0 {
                            "SD v2.00"
                        } else {
                            "SD v3.0x"
                        }
                    } else {
                        "SD 1.xx"
                    }
                ));
                out.push(format!("\tEX_SECURITY: 0x{:x}", self.ex_security));
                out.push(format!(
                    "\tCMD_SUPPORT: 0x{:x} ({})",
                    self.cmd_support,
                    self.command_support()
                ));
            }
            ReportMode::Terse => {
                out.push(format!("version: {}", self.spec_version()));
                out.push(format!("bus widths: {}", self.bus_widths()));
            }
        }
        out
    }
}

/// Decodes an SCR image and renders its report.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedInput`] when `hex` is not a hexadecimal
/// string.
pub fn decode_scr(hex: &str, mode: ReportMode) -> Result<Report, DecodeError> {
    Ok(SdScr::parse(hex)?.report(mode))
}

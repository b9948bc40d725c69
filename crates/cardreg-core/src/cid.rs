//! CID (card identification) register decoding for both bus families.

use crate::bits::Bitstream;
use crate::bus::BusFamily;
use crate::error::DecodeError;
use crate::ids::manufacturer_name;
use crate::layout::{FieldSpec, Fields};
use crate::report::{Report, ReportMode};
use crate::tables::{cbx_label, month_name};

/// SD CID layout, 128 bits.
pub static SD_CID_LAYOUT: [FieldSpec; 11] = [
    FieldSpec::unsigned(8),  // MID
    FieldSpec::ascii(16),    // OID
    FieldSpec::ascii(40),    // PNM
    FieldSpec::unsigned(4),  // PRV major
    FieldSpec::unsigned(4),  // PRV minor
    FieldSpec::unsigned(32), // PSN
    FieldSpec::reserved(4),
    FieldSpec::unsigned(8), // MDT year
    FieldSpec::unsigned(4), // MDT month
    FieldSpec::unsigned(7), // CRC
    FieldSpec::reserved(1),
];

/// MMC CID layout, 128 bits.
pub static MMC_CID_LAYOUT: [FieldSpec; 12] = [
    FieldSpec::unsigned(8), // MID
    FieldSpec::reserved(6),
    FieldSpec::unsigned(2),  // CBX
    FieldSpec::unsigned(8),  // OID
    FieldSpec::ascii(48),    // PNM
    FieldSpec::unsigned(4),  // PRV major
    FieldSpec::unsigned(4),  // PRV minor
    FieldSpec::unsigned(32), // PSN
    FieldSpec::unsigned(4),  // MDT year
    FieldSpec::unsigned(4),  // MDT month
    FieldSpec::unsigned(7),  // CRC
    FieldSpec::reserved(1),
];

/// A decoded SD card identification register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SdCid {
    /// Manufacturer identifier.
    pub mid: u32,
    /// OEM/application identifier, two characters.
    pub oid: String,
    /// Product name, five characters.
    pub pnm: String,
    /// Product revision, major digit.
    pub prv_major: u32,
    /// Product revision, minor digit.
    pub prv_minor: u32,
    /// Product serial number.
    pub psn: u32,
    /// Manufacturing year offset from 2000.
    pub mdt_year: u32,
    /// Manufacturing month, 1 through 12.
    pub mdt_month: u32,
    /// CRC7 checksum as stored.
    pub crc: u32,
}

impl SdCid {
    /// Decodes an SD CID from its hex image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedInput`] when `hex` is not a
    /// hexadecimal string.
    pub fn parse(hex: &str) -> Result<Self, DecodeError> {
        let bits = Bitstream::from_hex(hex)?;
        let mut fields = Fields::extract(&bits, &SD_CID_LAYOUT);
        Ok(Self {
            mid: fields.unsigned(),
            oid: fields.ascii(),
            pnm: fields.ascii(),
            prv_major: fields.unsigned(),
            prv_minor: fields.unsigned(),
            psn: fields.unsigned(),
            mdt_year: fields.unsigned(),
            mdt_month: fields.unsigned(),
            crc: fields.unsigned(),
        })
    }

    /// Renders the register as a text report.
    #[must_use]
    pub fn report(&self, mode: ReportMode) -> Report {
        let mut out = Report::new();
        let manufacturer = manufacturer_name(BusFamily::Sd, self.mid);
        let month = month_name(self.mdt_month);

        match mode {
            ReportMode::Verbose => {
                out.push("======SD/CID======".to_string());
                out.push(format!(
                    "\tMID: 0x{:02x} ({})",
                    self.mid,
                    manufacturer.unwrap_or("Unlisted")
                ));
                out.push(format!("\tOID: {}", self.oid));
                out.push(format!("\tPNM: {}", self.pnm));
                out.push(format!(
                    "\tPRV: 0x{:x}{:x} ({}.{})",
                    self.prv_major, self.prv_minor, self.prv_major, self.prv_minor
                ));
                out.push(format!("\tPSN: 0x{:08x}", self.psn));
                out.push(format!(
                    "\tMDT: 0x{:02x}{:x} {} {}",
                    self.mdt_year,
                    self.mdt_month,
                    2000 + self.mdt_year,
                    month
                ));
                out.push(format!("\tCRC: 0x{:02x}", self.crc));
            }
            ReportMode::Terse => {
                out.push(format!(
                    "manufacturer: '{}' '{}'",
                    manufacturer.unwrap_or("Unlisted"),
                    self.oid
                ));
                out.push(format!(
                    "product: '{}' {}.{}",
                    self.pnm, self.prv_major, self.prv_minor
                ));
                out.push(format!("serial: 0x{:08x}", self.psn));
                out.push(format!(
                    "manufacturing date: {} {}",
                    2000 + self.mdt_year,
                    month
                ));
            }
        }
        out
    }
}

/// A decoded MMC card identification register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MmcCid {
    /// Manufacturer identifier.
    pub mid: u32,
    /// Device/BGA package type.
    pub cbx: u32,
    /// OEM/application identifier.
    pub oid: u32,
    /// Product name, six characters.
    pub pnm: String,
    /// Product revision, major digit.
    pub prv_major: u32,
    /// Product revision, minor digit.
    pub prv_minor: u32,
    /// Product serial number.
    pub psn: u32,
    /// Manufacturing year offset from 1997.
    pub mdt_year: u32,
    /// Manufacturing month, 1 through 12.
    pub mdt_month: u32,
    /// CRC7 checksum as stored.
    pub crc: u32,
}

impl MmcCid {
    /// Decodes an MMC CID from its hex image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedInput`] when `hex` is not a
    /// hexadecimal string.
    pub fn parse(hex: &str) -> Result<Self, DecodeError> {
        let bits = Bitstream::from_hex(hex)?;
        let mut fields = Fields::extract(&bits, &MMC_CID_LAYOUT);
        Ok(Self {
            mid: fields.unsigned(),
            cbx: fields.unsigned(),
            oid: fields.unsigned(),
            pnm: fields.ascii(),
            prv_major: fields.unsigned(),
            prv_minor: fields.unsigned(),
            psn: fields.unsigned(),
            mdt_year: fields.unsigned(),
            mdt_month: fields.unsigned(),
            crc: fields.unsigned(),
        })
    }

    /// Renders the register as a text report.
    #[must_use]
    pub fn report(&self, mode: ReportMode) -> Report {
        let mut out = Report::new();
        let manufacturer = manufacturer_name(BusFamily::Mmc, self.mid);
        let month = month_name(self.mdt_month);

        match mode {
            ReportMode::Verbose => {
                out.push("======MMC/CID======".to_string());
                out.push(format!(
                    "\tMID: 0x{:02x} ({})",
                    self.mid,
                    manufacturer.unwrap_or("Unlisted")
                ));
                out.push(format!("\tCBX: 0x{:x} ({})", self.cbx, cbx_label(self.cbx)));
                out.push(format!("\tOID: 0x{:x}", self.oid));
                out.push(format!("\tPNM: {}", self.pnm));
                out.push(format!(
                    "\tPRV: 0x{:x}{:x} ({}.{})",
                    self.prv_major, self.prv_minor, self.prv_major, self.prv_minor
                ));
                out.push(format!("\tPSN: 0x{:08x}", self.psn));
                out.push(format!(
                    "\tMDT: 0x{:x}{:x} {} {}",
                    self.mdt_month,
                    self.mdt_year,
                    1997 + self.mdt_year,
                    month
                ));
                out.push(format!("\tCRC: 0x{:02x}", self.crc));
            }
            ReportMode::Terse => {
                out.push(format!(
                    "manufacturer: 0x{:02x} ({}) oid: 0x{:x}",
                    self.mid,
                    manufacturer.unwrap_or("Unlisted"),
                    self.oid
                ));
                out.push(format!(
                    "product: '{}' {}.{}",
                    self.pnm, self.prv_major, self.prv_minor
                ));
                out.push(format!("serial: 0x{:08x}", self.psn));
                out.push(format!(
                    "manufacturing date: {} {}",
                    1997 + self.mdt_year,
                    month
                ));
            }
        }
        out
    }
}

/// Decodes a CID image for the given bus family and renders its report.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedInput`] when `hex` is not a hexadecimal
/// string.
pub fn decode_cid(bus: BusFamily, hex: &str, mode: ReportMode) -> Result<Report, DecodeError> {
    match bus {
        BusFamily::Sd => Ok(SdCid::parse(hex)?.report(mode)),
        BusFamily::Mmc => Ok(MmcCid::parse(hex)?.report(mode)),
    }
}

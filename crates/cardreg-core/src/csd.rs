//! CSD (card-specific data) register decoding for both bus families.
//!
//! The SD register carries a 2-bit structure version in its first field
//! and the remaining 126 bits are laid out differently per version, so
//! decoding probes the discriminator with a short layout first. Version 0
//! is the standard-capacity layout with an explicit capacity multiplier;
//! version 1 is the high-capacity layout with a wide block count. MMC has
//! a single layout and its structure field is informational only.

use crate::bits::Bitstream;
use crate::bus::BusFamily;
use crate::error::DecodeError;
use crate::layout::{FieldSpec, Fields};
use crate::report::{Report, ReportMode};
use crate::tables::{
    command_class_labels, command_class_numbers, default_ecc_label, ecc_label, file_format_label,
    format_taac, format_transfer_rate, mmc_block_length, mmc_csd_structure_label, scale_capacity,
    sd_block_length, spec_vers_label, vdd_max_label, vdd_min_label,
};

/// Probe layout reading only the SD structure-version discriminator.
pub static SD_CSD_VERSION_PROBE: [FieldSpec; 1] = [FieldSpec::unsigned(2)];

/// SD CSD version 0 (standard capacity) layout, 128 bits.
pub static SD_CSD_V0_LAYOUT: [FieldSpec; 39] = [
    FieldSpec::unsigned(2), // CSD_STRUCTURE
    FieldSpec::reserved(6),
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4), // TAAC time value
    FieldSpec::unsigned(3), // TAAC time unit
    FieldSpec::unsigned(8), // NSAC
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4),  // TRAN_SPEED time value
    FieldSpec::unsigned(3),  // TRAN_SPEED rate unit
    FieldSpec::unsigned(12), // CCC
    FieldSpec::unsigned(4),  // READ_BL_LEN
    FieldSpec::unsigned(1),  // READ_BL_PARTIAL
    FieldSpec::unsigned(1),  // WRITE_BLK_MISALIGN
    FieldSpec::unsigned(1),  // READ_BLK_MISALIGN
    FieldSpec::unsigned(1),  // DSR_IMP
    FieldSpec::reserved(2),
    FieldSpec::unsigned(12), // C_SIZE
    FieldSpec::unsigned(3),  // VDD_R_CURR_MIN
    FieldSpec::unsigned(3),  // VDD_R_CURR_MAX
    FieldSpec::unsigned(3),  // VDD_W_CURR_MIN
    FieldSpec::unsigned(3),  // VDD_W_CURR_MAX
    FieldSpec::unsigned(3),  // C_SIZE_MULT
    FieldSpec::unsigned(1),  // ERASE_BLK_EN
    FieldSpec::unsigned(7),  // SECTOR_SIZE
    FieldSpec::unsigned(7),  // WP_GRP_SIZE
    FieldSpec::unsigned(1),  // WP_GRP_ENABLE
    FieldSpec::reserved(2),
    FieldSpec::unsigned(3), // R2W_FACTOR
    FieldSpec::unsigned(4), // WRITE_BL_LEN
    FieldSpec::unsigned(1), // WRITE_BL_PARTIAL
    FieldSpec::reserved(5),
    FieldSpec::unsigned(1), // FILE_FORMAT_GRP
    FieldSpec::unsigned(1), // COPY
    FieldSpec::unsigned(1), // PERM_WRITE_PROTECT
    FieldSpec::unsigned(1), // TMP_WRITE_PROTECT
    FieldSpec::unsigned(2), // FILE_FORMAT
    FieldSpec::reserved(2),
    FieldSpec::unsigned(7), // CRC
    FieldSpec::reserved(1),
];

/// SD CSD version 1 (high capacity) layout, 128 bits.
pub static SD_CSD_V1_LAYOUT: [FieldSpec; 35] = [
    FieldSpec::unsigned(2), // CSD_STRUCTURE
    FieldSpec::reserved(6),
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4), // TAAC time value
    FieldSpec::unsigned(3), // TAAC time unit
    FieldSpec::unsigned(8), // NSAC
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4),  // TRAN_SPEED time value
    FieldSpec::unsigned(3),  // TRAN_SPEED rate unit
    FieldSpec::unsigned(12), // CCC
    FieldSpec::unsigned(4),  // READ_BL_LEN
    FieldSpec::unsigned(1),  // READ_BL_PARTIAL
    FieldSpec::unsigned(1),  // WRITE_BLK_MISALIGN
    FieldSpec::unsigned(1),  // READ_BLK_MISALIGN
    FieldSpec::unsigned(1),  // DSR_IMP
    FieldSpec::reserved(6),
    FieldSpec::unsigned(22), // C_SIZE
    FieldSpec::reserved(1),
    FieldSpec::unsigned(1), // ERASE_BLK_EN
    FieldSpec::unsigned(7), // SECTOR_SIZE
    FieldSpec::unsigned(7), // WP_GRP_SIZE
    FieldSpec::unsigned(1), // WP_GRP_ENABLE
    FieldSpec::reserved(2),
    FieldSpec::unsigned(3), // R2W_FACTOR
    FieldSpec::unsigned(4), // WRITE_BL_LEN
    FieldSpec::unsigned(1), // WRITE_BL_PARTIAL
    FieldSpec::reserved(5),
    FieldSpec::unsigned(1), // FILE_FORMAT_GRP
    FieldSpec::unsigned(1), // COPY
    FieldSpec::unsigned(1), // PERM_WRITE_PROTECT
    FieldSpec::unsigned(1), // TMP_WRITE_PROTECT
    FieldSpec::unsigned(2), // FILE_FORMAT
    FieldSpec::reserved(2),
    FieldSpec::unsigned(7), // CRC
    FieldSpec::reserved(1),
];

/// MMC CSD layout, 128 bits.
pub static MMC_CSD_LAYOUT: [FieldSpec; 41] = [
    FieldSpec::unsigned(2), // CSD_STRUCTURE
    FieldSpec::unsigned(4), // SPEC_VERS
    FieldSpec::reserved(2),
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4), // TAAC time value
    FieldSpec::unsigned(3), // TAAC time unit
    FieldSpec::unsigned(8), // NSAC
    FieldSpec::reserved(1),
    FieldSpec::unsigned(4),  // TRAN_SPEED time value
    FieldSpec::unsigned(3),  // TRAN_SPEED rate unit
    FieldSpec::unsigned(12), // CCC
    FieldSpec::unsigned(4),  // READ_BL_LEN
    FieldSpec::unsigned(1),  // READ_BL_PARTIAL
    FieldSpec::unsigned(1),  // WRITE_BLK_MISALIGN
    FieldSpec::unsigned(1),  // READ_BLK_MISALIGN
    FieldSpec::unsigned(1),  // DSR_IMP
    FieldSpec::reserved(2),
    FieldSpec::unsigned(12), // C_SIZE
    FieldSpec::unsigned(3),  // VDD_R_CURR_MIN
    FieldSpec::unsigned(3),  // VDD_R_CURR_MAX
    FieldSpec::unsigned(3),  // VDD_W_CURR_MIN
    FieldSpec::unsigned(3),  // VDD_W_CURR_MAX
    FieldSpec::unsigned(3),  // C_SIZE_MULT
    FieldSpec::unsigned(5),  // ERASE_GRP_SIZE
    FieldSpec::unsigned(5),  // ERASE_GRP_MULT
    FieldSpec::unsigned(5),  // WP_GRP_SIZE
    FieldSpec::unsigned(1),  // WP_GRP_ENABLE
    FieldSpec::unsigned(2),  // DEFAULT_ECC
    FieldSpec::unsigned(3),  // R2W_FACTOR
    FieldSpec::unsigned(4),  // WRITE_BL_LEN
    FieldSpec::unsigned(1),  // WRITE_BL_PARTIAL
    FieldSpec::reserved(4),
    FieldSpec::unsigned(1), // CONTENT_PROT_APP
    FieldSpec::unsigned(1), // FILE_FORMAT_GRP
    FieldSpec::unsigned(1), // COPY
    FieldSpec::unsigned(1), // PERM_WRITE_PROTECT
    FieldSpec::unsigned(1), // TMP_WRITE_PROTECT
    FieldSpec::unsigned(2), // FILE_FORMAT
    FieldSpec::unsigned(2), // ECC
    FieldSpec::unsigned(7), // CRC
    FieldSpec::reserved(1),
];

/// A derived user-data capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capacity {
    /// Total capacity in bytes.
    pub bytes: u64,
    /// Sector count.
    pub blocks: u64,
    /// Sector size in bytes.
    pub block_size: u32,
}

impl Capacity {
    /// Capacity of a standard-capacity device, derived from the block
    /// count fields and the read block length.
    #[must_use]
    pub const fn standard(c_size: u32, c_size_mult: u32, read_bl_len: u32) -> Self {
        let mult = 1u64 << (c_size_mult + 2);
        let blocks = (c_size as u64 + 1) * mult;
        let block_size = 1u32 << read_bl_len;
        Self {
            bytes: blocks * block_size as u64,
            blocks,
            block_size,
        }
    }

    /// Capacity of a high-capacity device, where each count unit stands
    /// for 512 Kbyte of user data.
    #[must_use]
    pub const fn high_capacity(c_size: u32) -> Self {
        let bytes = (c_size as u64 + 1) * 512 * 1024;
        Self {
            bytes,
            blocks: bytes / 512,
            block_size: 512,
        }
    }

    /// Renders the capacity as a scaled figure with raw totals, e.g.
    /// `3.64Gbyte (3904897024 bytes, 7626752 sectors, 512 bytes each)`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} ({} bytes, {} sectors, {} bytes each)",
            scale_capacity(self.bytes),
            self.bytes,
            self.blocks,
            self.block_size
        )
    }
}

/// Version-specific portion of a decoded SD CSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SdCsdVersion {
    /// Version 0, standard capacity.
    Standard {
        /// Device size mantissa.
        c_size: u32,
        /// Minimum read current.
        vdd_r_curr_min: u32,
        /// Maximum read current.
        vdd_r_curr_max: u32,
        /// Minimum write current.
        vdd_w_curr_min: u32,
        /// Maximum write current.
        vdd_w_curr_max: u32,
        /// Device size multiplier exponent.
        c_size_mult: u32,
    },
    /// Version 1, high capacity.
    HighCapacity {
        /// Device size in 512-Kbyte units, minus one.
        c_size: u32,
    },
}

/// A decoded SD card-specific data register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SdCsd {
    /// TAAC mantissa code.
    pub taac_timevalue: u32,
    /// TAAC unit code.
    pub taac_timeunit: u32,
    /// Data read cycles in units of 100 clocks.
    pub nsac: u32,
    /// TRAN_SPEED mantissa code.
    pub tran_speed_timevalue: u32,
    /// TRAN_SPEED rate-unit code.
    pub tran_speed_rateunit: u32,
    /// Supported command-class bitmap.
    pub ccc: u32,
    /// Maximum read block length exponent.
    pub read_bl_len: u32,
    /// Partial block reads allowed.
    pub read_bl_partial: u32,
    /// Write block misalignment allowed.
    pub write_blk_misalign: u32,
    /// Read block misalignment allowed.
    pub read_blk_misalign: u32,
    /// Driver stage register implemented.
    pub dsr_imp: u32,
    /// Version-specific capacity fields.
    pub version: SdCsdVersion,
    /// Single-block erase enabled.
    pub erase_blk_en: u32,
    /// Erasable sector size, minus one.
    pub sector_size: u32,
    /// Write protect group size, minus one.
    pub wp_grp_size: u32,
    /// Write protect groups enabled.
    pub wp_grp_enable: u32,
    /// Write to read time factor.
    pub r2w_factor: u32,
    /// Maximum write block length exponent.
    pub write_bl_len: u32,
    /// Partial block writes allowed.
    pub write_bl_partial: u32,
    /// File format group.
    pub file_format_grp: u32,
    /// Content copied flag.
    pub copy: u32,
    /// Permanent write protection.
    pub perm_write_protect: u32,
    /// Temporary write protection.
    pub tmp_write_protect: u32,
    /// File format code.
    pub file_format: u32,
    /// CRC7 checksum as stored.
    pub crc: u32,
}

impl SdCsd {
    /// Decodes an SD CSD from its hex image, probing the structure
    /// version first.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedInput`] when `hex` is not a
    /// hexadecimal string, and
    /// [`DecodeError::UnsupportedStructureVersion`] when the 2-bit
    /// version field holds a value with no known layout.
    pub fn parse(hex: &str) -> Result<Self, DecodeError> {
        let bits = Bitstream::from_hex(hex)?;
        let mut probe = Fields::extract(&bits, &SD_CSD_VERSION_PROBE);
        let structure = probe.unsigned();

        match structure {
            0 => {
                let mut f = Fields::extract(&bits, &SD_CSD_V0_LAYOUT);
                let _structure = f.unsigned();
                let taac_timevalue = f.unsigned();
                let taac_timeunit = f.unsigned();
                let nsac = f.unsigned();
                let tran_speed_timevalue = f.unsigned();
                let tran_speed_rateunit = f.unsigned();
                let ccc = f.unsigned();
                let read_bl_len = f.unsigned();
                let read_bl_partial = f.unsigned();
                let write_blk_misalign = f.unsigned();
                let read_blk_misalign = f.unsigned();
                let dsr_imp = f.unsigned();
                let c_size = f.unsigned();
                let vdd_r_curr_min = f.unsigned();
                let vdd_r_curr_max = f.unsigned();
                let vdd_w_curr_min = f.unsigned();
                let vdd_w_curr_max = f.unsigned();
                let c_size_mult = f.unsigned();
                Ok(Self {
                    taac_timevalue,
                    taac_timeunit,
                    nsac,
                    tran_speed_timevalue,
                    tran_speed_rateunit,
                    ccc,
                    read_bl_len,
                    read_bl_partial,
                    write_blk_misalign,
                    read_blk_misalign,
                    dsr_imp,
                    version: SdCsdVersion::Standard {
                        c_size,
                        vdd_r_curr_min,
                        vdd_r_curr_max,
                        vdd_w_curr_min,
                        vdd_w_curr_max,
                        c_size_mult,
                    },
                    erase_blk_en: f.unsigned(),
                    sector_size: f.unsigned(),
                    wp_grp_size: f.unsigned(),
                    wp_grp_enable: f.unsigned(),
                    r2w_factor: f.unsigned(),
                    write_bl_len: f.unsigned(),
                    write_bl_partial: f.unsigned(),
                    file_format_grp: f.unsigned(),
                    copy: f.unsigned(),
                    perm_write_protect: f.unsigned(),
                    tmp_write_protect: f.unsigned(),
                    file_format: f.unsigned(),
                    crc: f.unsigned(),
                })
            }
            1 => {
                let mut f = Fields::extract(&bits, &SD_CSD_V1_LAYOUT);
                let _structure = f.unsigned();
                let taac_timevalue = f.unsigned();
                let taac_timeunit = f.unsigned();
                let nsac = f.unsigned();
                let tran_speed_timevalue = f.unsigned();
                let tran_speed_rateunit = f.unsigned();
                let ccc = f.unsigned();
                let read_bl_len = f.unsigned();
                let read_bl_partial = f.unsigned();
                let write_blk_misalign = f.unsigned();
                let read_blk_misalign = f.unsigned();
                let dsr_imp = f.unsigned();
                let c_size = f.unsigned();
                Ok(Self {
                    taac_timevalue,
                    taac_timeunit,
                    nsac,
                    tran_speed_timevalue,
                    tran_speed_rateunit,
                    ccc,
                    read_bl_len,
                    read_bl_partial,
                    write_blk_misalign,
                    read_blk_misalign,
                    dsr_imp,
                    version: SdCsdVersion::HighCapacity { c_size },
                    erase_blk_en: f.unsigned(),
                    sector_size: f.unsigned(),
                    wp_grp_size: f.unsigned(),
                    wp_grp_enable: f.unsigned(),
                    r2w_factor: f.unsigned(),
                    write_bl_len: f.unsigned(),
                    write_bl_partial: f.unsigned(),
                    file_format_grp: f.unsigned(),
                    copy: f.unsigned(),
                    perm_write_protect: f.unsigned(),
                    tmp_write_protect: f.unsigned(),
                    file_format: f.unsigned(),
                    crc: f.unsigned(),
                })
            }
            other => Err(DecodeError::UnsupportedStructureVersion(other)),
        }
    }

    /// The TAAC code as stored, mantissa and unit combined.
    #[must_use]
    pub const fn taac(&self) -> u32 {
        (self.taac_timevalue << 3) | self.taac_timeunit
    }

    /// The TRAN_SPEED code as stored, mantissa and unit combined.
    #[must_use]
    pub const fn tran_speed(&self) -> u32 {
        (self.tran_speed_timevalue << 3) | self.tran_speed_rateunit
    }

    /// The numeric structure version.
    #[must_use]
    pub const fn structure_version(&self) -> u32 {
        match self.version {
            SdCsdVersion::Standard { .. } => 0,
            SdCsdVersion::HighCapacity { .. } => 1,
        }
    }

    /// The derived user-data capacity.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        match self.version {
            SdCsdVersion::Standard {
                c_size,
                c_size_mult,
                ..
            } => Capacity::standard(c_size, c_size_mult, self.read_bl_len),
            SdCsdVersion::HighCapacity { c_size } => Capacity::high_capacity(c_size),
        }
    }

    /// Renders the register as a text report.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn report(&self, mode: ReportMode) -> Report {
        let mut out = Report::new();

        match mode {
            ReportMode::Verbose => {
                out.push("======SD/CSD======".to_string());
                out.push(format!("\tCSD_STRUCTURE: {}", self.structure_version()));

                out.push(format!(
                    "\tTAAC: 0x{:02x} ({})",
                    self.taac(),
                    format_taac(self.taac_timevalue, self.taac_timeunit)
                ));
                if self.structure_version() == 1 && self.taac() != 0x0e {
                    out.warn("Invalid TAAC (should be 0x0e)");
                }

                out.push(format!("\tNSAC: {} clocks", self.nsac));
                if self.structure_version() == 1 && self.nsac != 0 {
                    out.warn("Invalid NSAC (should be 0x00)");
                }

                out.push(format!(
                    "\tTRAN_SPEED: 0x{:02x} ({})",
                    self.tran_speed(),
                    format_transfer_rate(
                        BusFamily::Sd,
                        self.tran_speed_timevalue,
                        self.tran_speed_rateunit
                    )
                ));
                match self.version {
                    SdCsdVersion::Standard { .. } => {
                        if !matches!(self.tran_speed(), 0x32 | 0x5a) {
                            out.warn("Invalid TRAN_SPEED (should be 0x32 or 0x5a)");
                        }
                    }
                    SdCsdVersion::HighCapacity { .. } => {
                        if !matches!(self.tran_speed(), 0x32 | 0x5a | 0x0b | 0x2b) {
                            out.warn("Invalid TRAN_SPEED (should be 0x32, 0x5a, 0x0b or 0x2b)");
                        }
                    }
                }

                out.push(format!(
                    "\tCCC: 0x{:03x} (class: {})",
                    self.ccc,
                    command_class_numbers(self.ccc)
                ));
                match self.version {
                    SdCsdVersion::Standard { .. } => {
                        if !matches!(self.ccc, 0x5b5 | 0x7b5 | 0x5f5) {
                            out.warn("Invalid CCC (should be 0x5b5, 0x7b5 or 0x5f5)");
                        }
                    }
                    SdCsdVersion::HighCapacity { .. } => {
                        if !matches!(self.ccc, 0x5b5 | 0x7b5) {
                            out.warn("Invalid CCC (should be 0x5b5 or 0x7b5)");
                        }
                    }
                }

                out.push(format!(
                    "\tREAD_BL_LEN: 0x{:x} ({})",
                    self.read_bl_len,
                    sd_block_length(self.read_bl_len)
                ));
                if self.structure_version() == 1 && self.read_bl_len != 0x9 {
                    out.warn("Invalid READ_BL_LEN (should be 0x9)");
                }

                out.push(format!("\tREAD_BL_PARTIAL: 0x{:x}", self.read_bl_partial));
                match self.version {
                    SdCsdVersion::Standard { .. } if self.read_bl_partial != 0x01 => {
                        out.warn("Invalid READ_BL_PARTIAL (should be 0x01)");
                    }
                    SdCsdVersion::HighCapacity { .. } if self.read_bl_partial != 0x00 => {
                        out.warn("Invalid READ_BL_PARTIAL (should be 0x00)");
                    }
                    _ => {}
                }

                out.push(format!(
                    "\tWRITE_BLK_MISALIGN: 0x{:x}",
                    self.write_blk_misalign
                ));
                if self.structure_version() == 1 && self.write_blk_misalign != 0 {
                    out.warn("Invalid WRITE_BLK_MISALIGN (should be 0x00)");
                }

                out.push(format!(
                    "\tREAD_BLK_MISALIGN: 0x{:x}",
                    self.read_blk_misalign
                ));
                if self.structure_version() == 1 && self.read_blk_misalign != 0 {
                    out.warn("Invalid READ_BLK_MISALIGN (should be 0x00)");
                }

                out.push(format!("\tDSR_IMP: 0x{:x}", self.dsr_imp));

                match self.version {
                    SdCsdVersion::Standard {
                        c_size,
                        vdd_r_curr_min,
                        vdd_r_curr_max,
                        vdd_w_curr_min,
                        vdd_w_curr_max,
                        c_size_mult,
                    } => {
                        out.push(format!("\tC_SIZE: 0x{c_size:03x}"));
                        out.push(format!(
                            "\tVDD_R_CURR_MIN: 0x{vdd_r_curr_min:x} ({})",
                            vdd_min_label(vdd_r_curr_min)
                        ));
                        out.push(format!(
                            "\tVDD_R_CURR_MAX: 0x{vdd_r_curr_max:x} ({})",
                            vdd_max_label(vdd_r_curr_max)
                        ));
                        out.push(format!(
                            "\tVDD_W_CURR_MIN: 0x{vdd_w_curr_min:x} ({})",
                            vdd_min_label(vdd_w_curr_min)
                        ));
                        out.push(format!(
                            "\tVDD_W_CURR_MAX: 0x{vdd_w_curr_max:x} ({})",
                            vdd_max_label(vdd_w_curr_max)
                        ));
                        out.push(format!("\tC_SIZE_MULT: 0x{c_size_mult:x}"));
                    }
                    SdCsdVersion::HighCapacity { c_size } => {
                        out.push(format!("\tC_SIZE: 0x{c_size:06x}"));

                        out.push(format!("\tERASE_BLK_EN: 0x{:x}", self.erase_blk_en));
                        if self.erase_blk_en != 0x01 {
                            out.warn("Invalid ERASE_BLK_EN (should be 0x01)");
                        }

                        out.push(format!(
                            "\tSECTOR_SIZE: 0x{:02x} (Erasable sector: {} blocks)",
                            self.sector_size,
                            self.sector_size + 1
                        ));
                        if self.sector_size != 0x7f {
                            out.warn("Invalid SECTOR_SIZE (should be 0x7f)");
                        }

                        out.push(format!(
                            "\tWP_GRP_SIZE: 0x{:02x} (Write protect group: {} blocks)",
                            self.wp_grp_size,
                            self.wp_grp_size + 1
                        ));
                        if self.wp_grp_size != 0x00 {
                            out.warn("Invalid WP_GRP_SIZE (should be 0x00)");
                        }

                        out.push(format!("\tWP_GRP_ENABLE: 0x{:x}", self.wp_grp_enable));
                        if self.wp_grp_enable != 0x00 {
                            out.warn("Invalid WP_GRP_ENABLE (should be 0x00)");
                        }

                        out.push(format!(
                            "\tR2W_FACTOR: 0x{:x} (Write {} times read)",
                            self.r2w_factor, self.r2w_factor
                        ));
                        if self.r2w_factor != 0x02 {
                            out.warn("Invalid R2W_FACTOR (should be 0x02)");
                        }

                        out.push(format!(
                            "\tWRITE_BL_LEN: 0x{:x} ({})",
                            self.write_bl_len,
                            sd_block_length(self.write_bl_len)
                        ));
                        if self.write_bl_len != 0x09 {
                            out.warn("Invalid WRITE_BL_LEN (should be 0x09)");
                        }

                        out.push(format!("\tWRITE_BL_PARTIAL: 0x{:x}", self.write_bl_partial));
                        if self.write_bl_partial != 0x00 {
                            out.warn("Invalid WRITE_BL_PARTIAL (should be 0x00)");
                        }

                        out.push(format!("\tFILE_FORMAT_GRP: 0x{:x}", self.file_format_grp));
                        if self.file_format_grp != 0x00 {
                            out.warn("Invalid FILE_FORMAT_GRP (should be 0x00)");
                        }

                        out.push(format!("\tCOPY: 0x{:x}", self.copy));
                        out.push(format!(
                            "\tPERM_WRITE_PROTECT: 0x{:x}",
                            self.perm_write_protect
                        ));
                        out.push(format!(
                            "\tTMP_WRITE_PROTECT: 0x{:x}",
                            self.tmp_write_protect
                        ));

                        out.push(format!(
                            "\tFILE_FORMAT: 0x{:x} ({})",
                            self.file_format,
                            file_format_label(self.file_format, self.file_format_grp)
                        ));
                        if self.file_format != 0x00 {
                            out.warn("Invalid FILE_FORMAT (should be 0x00)");
                        }

                        out.push(format!("\tCRC: 0x{:x}", self.crc));
                    }
                }

                out.push(format!("\tCAPACITY: {}", self.capacity().describe()));
            }
            ReportMode::Terse => {
                out.push(format!(
                    "card classes: {}",
                    command_class_labels(self.ccc)
                ));
                out.push(format!("capacity: {}", self.capacity().describe()));
            }
        }
        out
    }
}

/// A decoded MMC card-specific data register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MmcCsd {
    /// Structure version code.
    pub csd_structure: u32,
    /// Device specification version code.
    pub spec_vers: u32,
    /// TAAC mantissa code.
    pub taac_timevalue: u32,
    /// TAAC unit code.
    pub taac_timeunit: u32,
    /// Data read cycles in units of 100 clocks.
    pub nsac: u32,
    /// TRAN_SPEED mantissa code.
    pub tran_speed_timevalue: u32,
    /// TRAN_SPEED rate-unit code.
    pub tran_speed_rateunit: u32,
    /// Supported command-class bitmap.
    pub ccc: u32,
    /// Maximum read block length exponent.
    pub read_bl_len: u32,
    /// Partial block reads allowed.
    pub read_bl_partial: u32,
    /// Write block misalignment allowed.
    pub write_blk_misalign: u32,
    /// Read block misalignment allowed.
    pub read_blk_misalign: u32,
    /// Driver stage register implemented.
    pub dsr_imp: u32,
    /// Device size mantissa; 0xfff defers capacity to the extended CSD.
    pub c_size: u32,
    /// Minimum read current.
    pub vdd_r_curr_min: u32,
    /// Maximum read current.
    pub vdd_r_curr_max: u32,
    /// Minimum write current.
    pub vdd_w_curr_min: u32,
    /// Maximum write current.
    pub vdd_w_curr_max: u32,
    /// Device size multiplier exponent.
    pub c_size_mult: u32,
    /// Erase group size, minus one.
    pub erase_grp_size: u32,
    /// Erase group multiplier, minus one.
    pub erase_grp_mult: u32,
    /// Write protect group size, minus one.
    pub wp_grp_size: u32,
    /// Write protect groups enabled.
    pub wp_grp_enable: u32,
    /// Default ECC code.
    pub default_ecc: u32,
    /// Write to read time factor.
    pub r2w_factor: u32,
    /// Maximum write block length exponent.
    pub write_bl_len: u32,
    /// Partial block writes allowed.
    pub write_bl_partial: u32,
    /// Content protection application supported.
    pub content_prot_app: u32,
    /// File format group.
    pub file_format_grp: u32,
    /// Content copied flag.
    pub copy: u32,
    /// Permanent write protection.
    pub perm_write_protect: u32,
    /// Temporary write protection.
    pub tmp_write_protect: u32,
    /// File format code.
    pub file_format: u32,
    /// ECC code.
    pub ecc: u32,
    /// CRC7 checksum as stored.
    pub crc: u32,
}

impl MmcCsd {
    /// Decodes an MMC CSD from its hex image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedInput`] when `hex` is not a
    /// hexadecimal string.
    pub fn parse(hex: &str) -> Result<Self, DecodeError> {
        let bits = Bitstream::from_hex(hex)?;
        let mut f = Fields::extract(&bits, &MMC_CSD_LAYOUT);
        Ok(Self {
            csd_structure: f.unsigned(),
            spec_vers: f.unsigned(),
            taac_timevalue: f.unsigned(),
            taac_timeunit: f.unsigned(),
            nsac: f.unsigned(),
            tran_speed_timevalue: f.unsigned(),
            tran_speed_rateunit: f.unsigned(),
            ccc: f.unsigned(),
            read_bl_len: f.unsigned(),
            read_bl_partial: f.unsigned(),
            write_blk_misalign: f.unsigned(),
            read_blk_misalign: f.unsigned(),
            dsr_imp: f.unsigned(),
            c_size: f.unsigned(),
            vdd_r_curr_min: f.unsigned(),
            vdd_r_curr_max: f.unsigned(),
            vdd_w_curr_min: f.unsigned(),
            vdd_w_curr_max: f.unsigned(),
            c_size_mult: f.unsigned(),
            erase_grp_size: f.unsigned(),
            erase_grp_mult: f.unsigned(),
            wp_grp_size: f.unsigned(),
            wp_grp_enable: f.unsigned(),
            default_ecc: f.unsigned(),
            r2w_factor: f.unsigned(),
            write_bl_len: f.unsigned(),
            write_bl_partial: f.unsigned(),
            content_prot_app: f.unsigned(),
            file_format_grp: f.unsigned(),
            copy: f.unsigned(),
            perm_write_protect: f.unsigned(),
            tmp_write_protect: f.unsigned(),
            file_format: f.unsigned(),
            ecc: f.unsigned(),
            crc: f.unsigned(),
        })
    }

    /// The TAAC code as stored, mantissa and unit combined.
    #[must_use]
    pub const fn taac(&self) -> u32 {
        (self.taac_timevalue << 3) | self.taac_timeunit
    }

    /// The TRAN_SPEED code as stored, mantissa and unit combined.
    #[must_use]
    pub const fn tran_speed(&self) -> u32 {
        (self.tran_speed_timevalue << 3) | self.tran_speed_rateunit
    }

    /// The derived user-data capacity, absent when the size fields defer
    /// to the extended CSD.
    #[must_use]
    pub const fn capacity(&self) -> Option<Capacity> {
        if self.c_size == 0xfff {
            return None;
        }
        Some(Capacity::standard(
            self.c_size,
            self.c_size_mult,
            self.read_bl_len,
        ))
    }

    /// Renders the register as a text report.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn report(&self, mode: ReportMode) -> Report {
        let mut out = Report::new();

        match mode {
            ReportMode::Verbose => {
                out.push("======MMC/CSD======".to_string());
                out.push(format!(
                    "\tCSD_STRUCTURE: 0x{:x} ({})",
                    self.csd_structure,
                    mmc_csd_structure_label(self.csd_structure)
                ));
                out.push(format!(
                    "\tSPEC_VERS: 0x{:x} ({})",
                    self.spec_vers,
                    spec_vers_label(self.spec_vers)
                ));
                out.push(format!(
                    "\tTAAC: 0x{:02x} ({})",
                    self.taac(),
                    format_taac(self.taac_timevalue, self.taac_timeunit)
                ));
                out.push(format!("\tNSAC: {} clocks", self.nsac));
                out.push(format!(
                    "\tTRAN_SPEED: 0x{:02x} ({})",
                    self.tran_speed(),
                    format_transfer_rate(
                        BusFamily::Mmc,
                        self.tran_speed_timevalue,
                        self.tran_speed_rateunit
                    )
                ));
                out.push(format!(
                    "\tCCC: 0x{:03x} (class: {})",
                    self.ccc,
                    command_class_numbers(self.ccc)
                ));
                out.push(format!(
                    "\tREAD_BL_LEN: 0x{:x} ({})",
                    self.read_bl_len,
                    mmc_block_length(self.read_bl_len)
                ));
                out.push(format!(
                    "\tREAD_BL_PARTIAL: 0x{:x} ({})",
                    self.read_bl_partial,
                    if self.read_bl_partial == 0 {
                        "only 512 byte and READ_BL_LEN block size"
                    } else {
                        "less than READ_BL_LEN block size can be used"
                    }
                ));
                out.push(format!(
                    "\tWRITE_BLK_MISALIGN: 0x{:x} ({})",
                    self.write_blk_misalign,
                    if self.write_blk_misalign == 0 {
                        "writes across block boundaries are invalid"
                    } else {
                        "writes across block boundaries are allowed"
                    }
                ));
                out.push(format!(
                    "\tREAD_BLK_MISALIGN: 0x{:x} ({})",
                    self.read_blk_misalign,
                    if self.read_blk_misalign == 0 {
                        "reads across block boundaries are invalid"
                    } else {
                        "reads across block boundaries are allowed"
                    }
                ));
                out.push(format!(
                    "\tDSR_IMP: 0x{:x} ({})",
                    self.dsr_imp,
                    if self.dsr_imp == 0 {
                        "configurable driver stage not available"
                    } else {
                        "configurable driver state available"
                    }
                ));
                out.push(format!(
                    "\tVDD_R_CURR_MIN: 0x{:x} ({})",
                    self.vdd_r_curr_min,
                    vdd_min_label(self.vdd_r_curr_min)
                ));
                out.push(format!(
                    "\tVDD_R_CURR_MAX: 0x{:x} ({})",
                    self.vdd_r_curr_max,
                    vdd_max_label(self.vdd_r_curr_max)
                ));
                out.push(format!(
                    "\tVDD_W_CURR_MIN: 0x{:x} ({})",
                    self.vdd_w_curr_min,
                    vdd_min_label(self.vdd_w_curr_min)
                ));
                out.push(format!(
                    "\tVDD_W_CURR_MAX: 0x{:x} ({})",
                    self.vdd_w_curr_max,
                    vdd_max_label(self.vdd_w_curr_max)
                ));
                out.push(format!("\tERASE_GRP_SIZE: 0x{:02x}", self.erase_grp_size));
                out.push(format!(
                    "\tERASE_GRP_MULT: 0x{:02x} ({} write blocks/erase group)",
                    self.erase_grp_mult,
                    (self.erase_grp_size + 1) * (self.erase_grp_mult + 1)
                ));
                out.push(format!(
                    "\tWP_GRP_SIZE: 0x{:02x} ({} blocks/write protect group)",
                    self.wp_grp_size,
                    self.wp_grp_size + 1
                ));
                out.push(format!("\tWP_GRP_ENABLE: 0x{:x}", self.wp_grp_enable));
                out.push(format!(
                    "\tDEFAULT_ECC: 0x{:x} ({})",
                    self.default_ecc,
                    default_ecc_label(self.default_ecc)
                ));
                out.push(format!(
                    "\tR2W_FACTOR: 0x{:x} (Write {} times read)",
                    self.r2w_factor, self.r2w_factor
                ));
                out.push(format!(
                    "\tWRITE_BL_LEN: 0x{:x} ({})",
                    self.write_bl_len,
                    mmc_block_length(self.write_bl_len)
                ));
                out.push(format!(
                    "\tWRITE_BL_PARTIAL: 0x{:x} ({})",
                    self.write_bl_partial,
                    if self.write_bl_partial == 0 {
                        "only 512 byte and WRITE_BL_LEN block size"
                    } else {
                        "less than WRITE_BL_LEN block size can be used"
                    }
                ));
                out.push(format!("\tCONTENT_PROT_APP: 0x{:x}", self.content_prot_app));

                out.push(format!("\tFILE_FORMAT_GRP: 0x{:x}", self.file_format_grp));
                if self.file_format_grp != 0 {
                    out.warn("Invalid FILE_FORMAT_GRP");
                }

                out.push(format!("\tCOPY: 0x{:x}", self.copy));
                out.push(format!(
                    "\tPERM_WRITE_PROTECT: 0x{:x}",
                    self.perm_write_protect
                ));
                out.push(format!(
                    "\tTMP_WRITE_PROTECT: 0x{:x}",
                    self.tmp_write_protect
                ));

                out.push(format!(
                    "\tFILE_FORMAT: 0x{:x} ({})",
                    self.file_format,
                    file_format_label(self.file_format, self.file_format_grp)
                ));
                if self.file_format != 0 {
                    out.warn("Invalid FILE_FORMAT");
                }

                out.push(format!("\tECC: 0x{:x} ({})", self.ecc, ecc_label(self.ecc)));
                out.push(format!("\tCRC: 0x{:02x}", self.crc));

                if let Some(capacity) = self.capacity() {
                    out.push(format!("\tC_SIZE: 0x{:03x}", self.c_size));
                    out.push(format!("\tC_SIZE_MULT: 0x{:x}", self.c_size_mult));
                    out.push(format!("\tCAPACITY: {}", capacity.describe()));
                }
            }
            ReportMode::Terse => {
                out.push(format!("version: {}", spec_vers_label(self.spec_vers)));
                out.push(format!(
                    "card classes: {}",
                    command_class_labels(self.ccc)
                ));
                if let Some(capacity) = self.capacity() {
                    out.push(format!("capacity: {}", capacity.describe()));
                }
            }
        }
        out
    }
}

/// Decodes a CSD image for the given bus family and renders its report.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedInput`] when `hex` is not a hexadecimal
/// string, and for SD images
/// [`DecodeError::UnsupportedStructureVersion`] when the version field
/// holds a value with no known layout.
pub fn decode_csd(bus: BusFamily, hex: &str, mode: ReportMode) -> Result<Report, DecodeError> {
    match bus {
        BusFamily::Sd => Ok(SdCsd::parse(hex)?.report(mode)),
        BusFamily::Mmc => Ok(MmcCsd::parse(hex)?.report(mode)),
    }
}

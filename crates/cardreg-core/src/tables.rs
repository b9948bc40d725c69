//! Enumerated-value and unit lookup tables shared by the register decoders.
//!
//! Everything here is static protocol data: mantissa tables for the timing
//! codes, unit scales, current-draw steps, command-class labels, and the
//! small closed label sets for version and format fields. Unmapped values
//! render as a "reserved" token rather than failing.

use crate::bus::BusFamily;

static MONTHS: [&str; 16] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec", "invalid0",
    "invalid1", "invalid2", "invalid3",
];

/// Timing mantissas indexed by the 4-bit time value of TAAC and of the SD
/// TRAN_SPEED code.
static TIME_VALUES: [f64; 16] = [
    0.0, 1.0, 1.2, 1.3, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 7.0, 8.0,
];

/// MMC TRAN_SPEED mantissas; they differ from the SD table at 0x6 and 0xb.
static MMC_TRANSFER_VALUES: [f64; 16] = [
    0.0, 1.0, 1.2, 1.3, 1.5, 2.0, 2.6, 3.0, 3.5, 4.0, 4.5, 5.2, 5.5, 6.0, 7.0, 8.0,
];

struct UnitScale {
    multiplier: f64,
    suffix: &'static str,
}

const fn unit(multiplier: f64, suffix: &'static str) -> UnitScale {
    UnitScale { multiplier, suffix }
}

static TAAC_UNITS: [UnitScale; 8] = [
    unit(1.0, "ns"),
    unit(10.0, "ns"),
    unit(100.0, "ns"),
    unit(1.0, "us"),
    unit(10.0, "us"),
    unit(100.0, "us"),
    unit(1.0, "ms"),
    unit(10.0, "ms"),
];

static SD_TRANSFER_UNITS: [UnitScale; 4] = [
    unit(100.0, "kbit/s"),
    unit(1.0, "Mbit/s"),
    unit(10.0, "Mbit/s"),
    unit(100.0, "Mbit/s"),
];

static MMC_TRANSFER_UNITS: [UnitScale; 4] = [
    unit(100.0, "KHz/s"),
    unit(1.0, "MHz/s"),
    unit(10.0, "MHz/s"),
    unit(100.0, "MHz/s"),
];

#[allow(clippy::cast_possible_truncation)]
const fn low_nibble(value: u32) -> usize {
    (value & 0xf) as usize
}

/// Month name for a 4-bit manufacturing-date month field. Values past
/// december render an invalid marker.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    MONTHS[low_nibble(month)]
}

/// Renders a TAAC code as a scaled time, e.g. `1.00ms`.
#[must_use]
pub fn format_taac(timevalue: u32, timeunit: u32) -> String {
    let mantissa = TIME_VALUES[low_nibble(timevalue)];
    let scale = &TAAC_UNITS[low_nibble(timeunit & 0x7)];
    format!("{:.2}{}", mantissa * scale.multiplier, scale.suffix)
}

/// Renders a TRAN_SPEED code with the family's mantissa and rate-unit
/// tables; a reserved rate unit renders as `reserved`.
#[must_use]
pub fn format_transfer_rate(bus: BusFamily, timevalue: u32, rateunit: u32) -> String {
    let (mantissas, units): (&[f64; 16], &[UnitScale; 4]) = match bus {
        BusFamily::Sd => (&TIME_VALUES, &SD_TRANSFER_UNITS),
        BusFamily::Mmc => (&MMC_TRANSFER_VALUES, &MMC_TRANSFER_UNITS),
    };
    let mantissa = mantissas[low_nibble(timevalue)];
    units.get(low_nibble(rateunit)).map_or_else(
        || "reserved".to_string(),
        |scale| format!("{:.2}{}", mantissa * scale.multiplier, scale.suffix),
    )
}

static COMMAND_CLASSES: [&str; 12] = [
    "basic",
    "reserved",
    "block read",
    "reserved",
    "block write",
    "erase",
    "write protection",
    "lock card",
    "application specific",
    "I/O mode",
    "switch",
    "extension",
];

/// Set command-class bit numbers, highest first, e.g. `11, 10, 5, 0`.
#[must_use]
pub fn command_class_numbers(ccc: u32) -> String {
    let numbers: Vec<String> = (0..COMMAND_CLASSES.len())
        .rev()
        .filter(|bit| (ccc >> bit) & 1 == 1)
        .map(|bit| bit.to_string())
        .collect();
    numbers.join(", ")
}

/// Set command-class bits with labels, highest first,
/// e.g. `10 switch, 4 block write, 0 basic`.
#[must_use]
pub fn command_class_labels(ccc: u32) -> String {
    let labels: Vec<String> = (0..COMMAND_CLASSES.len())
        .rev()
        .filter(|bit| (ccc >> bit) & 1 == 1)
        .map(|bit| format!("{bit} {}", COMMAND_CLASSES[bit]))
        .collect();
    labels.join(", ")
}

static VDD_CURR_MIN: [&str; 8] = [
    "0.5mA", "1mA", "5mA", "10mA", "25mA", "35mA", "60mA", "100mA",
];

static VDD_CURR_MAX: [&str; 8] = [
    "1mA", "5mA", "10mA", "25mA", "35mA", "45mA", "80mA", "200mA",
];

/// Read/write-current minimum step for a 3-bit VDD_R_CURR_MIN or
/// VDD_W_CURR_MIN field.
#[must_use]
pub fn vdd_min_label(code: u32) -> &'static str {
    VDD_CURR_MIN[low_nibble(code & 0x7)]
}

/// Read/write-current maximum step for a 3-bit VDD_R_CURR_MAX or
/// VDD_W_CURR_MAX field.
#[must_use]
pub fn vdd_max_label(code: u32) -> &'static str {
    VDD_CURR_MAX[low_nibble(code & 0x7)]
}

/// SD block-length label for READ_BL_LEN / WRITE_BL_LEN values.
#[must_use]
pub const fn sd_block_length(len: u32) -> &'static str {
    match len {
        0x9 => "512 bytes",
        0xa => "1024 bytes",
        0xb => "2048 bytes",
        _ => "reserved bytes",
    }
}

/// MMC block-length label for READ_BL_LEN / WRITE_BL_LEN values.
#[must_use]
pub const fn mmc_block_length(len: u32) -> &'static str {
    match len {
        0x0 => "1 byte",
        0x1 => "2 byte",
        0x2 => "4 byte",
        0x3 => "8 byte",
        0x4 => "16 byte",
        0x5 => "32 byte",
        0x6 => "64 byte",
        0x7 => "128 byte",
        0x8 => "256 byte",
        0x9 => "512 bytes",
        0xa => "1024 bytes",
        0xb => "2048 bytes",
        0xc => "4096 bytes",
        0xd => "8192 bytes",
        0xe => "16K bytes",
        _ => "reserved bytes",
    }
}

/// FILE_FORMAT label; the whole field is reserved when FILE_FORMAT_GRP is
/// set.
#[must_use]
pub const fn file_format_label(file_format: u32, file_format_grp: u32) -> &'static str {
    if file_format_grp == 1 {
        return "reserved";
    }
    match file_format {
        0 => "partition table",
        1 => "no partition table",
        2 => "Universal File Format",
        _ => "Others/unknown",
    }
}

/// CBX device-type label for the 2-bit CBX field.
#[must_use]
pub const fn cbx_label(cbx: u32) -> &'static str {
    match cbx & 0x3 {
        0 => "card",
        1 => "BGA",
        2 => "PoP",
        _ => "reserved",
    }
}

/// MMC CSD_STRUCTURE version label for the 2-bit field.
#[must_use]
pub const fn mmc_csd_structure_label(code: u32) -> &'static str {
    match code & 0x3 {
        0 => "v1.0",
        1 => "v1.1",
        2 => "v1.2",
        _ => "version in ext_csd",
    }
}

/// MMC SPEC_VERS label.
#[must_use]
pub const fn spec_vers_label(spec_vers: u32) -> &'static str {
    match spec_vers {
        0x0 => "v1.0-v1.2",
        0x1 => "v1.4",
        0x2 => "v2.0-v2.2",
        0x3 => "v3.1-v3.31",
        0x4 => "v4.0-v4.3",
        _ => "reserved",
    }
}

/// MMC DEFAULT_ECC label.
#[must_use]
pub const fn default_ecc_label(default_ecc: u32) -> &'static str {
    match default_ecc {
        0 => "none",
        1 => "BCH",
        _ => "reserved",
    }
}

/// MMC ECC label.
#[must_use]
pub const fn ecc_label(ecc: u32) -> &'static str {
    match ecc {
        0 => "none",
        1 => "BCH(542,512)",
        _ => "reserved",
    }
}

/// SCR_STRUCTURE label.
#[must_use]
pub const fn scr_structure_label(scr_structure: u32) -> &'static str {
    match scr_structure {
        0 => "SCR v1.0",
        _ => "reserved",
    }
}

/// SD_SPEC physical-layer version label.
#[must_use]
pub const fn sd_spec_label(sd_spec: u32) -> &'static str {
    match sd_spec {
        0 => "SD v1.0/1.01",
        1 => "SD v1.10",
        2 => "SD v2.00/v3.0x",
        3 => "SD v4.00",
        _ => "reserved",
    }
}

/// SD_SECURITY label.
#[must_use]
pub const fn sd_security_label(sd_security: u32) -> &'static str {
    match sd_security {
        0 => "no security",
        1 => "not used",
        2 => "SDSC card/security v1.01",
        3 => "SDHC card/security v2.00",
        4 => "SDXC card/security v3.xx",
        _ => "reserved",
    }
}

/// Scales a byte count to the largest of Gbyte, Mbyte, Kbyte or byte
/// whose whole part is nonzero, rendered with two decimal places.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_capacity(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes / GIB > 0 {
        format!("{:.2}Gbyte", bytes as f64 / GIB as f64)
    } else if bytes / MIB > 0 {
        format!("{:.2}Mbyte", bytes as f64 / MIB as f64)
    } else if bytes / KIB > 0 {
        format!("{:.2}Kbyte", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes}.00byte")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        command_class_labels, command_class_numbers, file_format_label, format_taac,
        format_transfer_rate, mmc_block_length, month_name, scale_capacity, sd_block_length,
        spec_vers_label,
    };
    use crate::bus::BusFamily;
    use rstest::rstest;

    #[rstest]
    #[case(0x1, 0x6, "1.00ms")]
    #[case(0x4, 0x6, "1.50ms")]
    #[case(0x2, 0x0, "1.20ns")]
    #[case(0xf, 0x5, "800.00us")]
    #[case(0x0, 0x7, "0.00ms")]
    fn taac_codes_render_scaled_times(
        #[case] timevalue: u32,
        #[case] timeunit: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(format_taac(timevalue, timeunit), expected);
    }

    #[rstest]
    #[case(BusFamily::Sd, 0x6, 0x2, "25.00Mbit/s")]
    #[case(BusFamily::Sd, 0xb, 0x1, "5.00Mbit/s")]
    #[case(BusFamily::Mmc, 0x6, 0x2, "26.00MHz/s")]
    #[case(BusFamily::Mmc, 0xb, 0x1, "5.20MHz/s")]
    #[case(BusFamily::Sd, 0x1, 0x0, "100.00kbit/s")]
    fn transfer_rates_use_the_family_tables(
        #[case] bus: BusFamily,
        #[case] timevalue: u32,
        #[case] rateunit: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(format_transfer_rate(bus, timevalue, rateunit), expected);
    }

    #[test]
    fn reserved_transfer_rate_unit_renders_reserved() {
        assert_eq!(format_transfer_rate(BusFamily::Sd, 0x6, 0x7), "reserved");
    }

    #[test]
    fn command_classes_list_highest_first() {
        assert_eq!(command_class_numbers(0x5b5), "10, 8, 7, 5, 4, 2, 0");
        assert_eq!(
            command_class_labels(0x405),
            "10 switch, 2 block read, 0 basic"
        );
        assert_eq!(command_class_numbers(0), "");
    }

    #[test]
    fn block_length_labels_cover_reserved_values() {
        assert_eq!(sd_block_length(0x9), "512 bytes");
        assert_eq!(sd_block_length(0x5), "reserved bytes");
        assert_eq!(mmc_block_length(0x0), "1 byte");
        assert_eq!(mmc_block_length(0xe), "16K bytes");
        assert_eq!(mmc_block_length(0xf), "reserved bytes");
    }

    #[test]
    fn file_format_group_overrides_format() {
        assert_eq!(file_format_label(0, 0), "partition table");
        assert_eq!(file_format_label(2, 0), "Universal File Format");
        assert_eq!(file_format_label(0, 1), "reserved");
    }

    #[test]
    fn spec_vers_labels_close_over_reserved() {
        assert_eq!(spec_vers_label(0x4), "v4.0-v4.3");
        assert_eq!(spec_vers_label(0x7), "reserved");
    }

    #[test]
    fn months_wrap_invalid_values() {
        assert_eq!(month_name(1), "feb");
        assert_eq!(month_name(12), "invalid0");
    }

    #[rstest]
    #[case(512, "512.00byte")]
    #[case(1024, "1.00Kbyte")]
    #[case(1536, "1.50Kbyte")]
    #[case(3_284_992, "3.13Mbyte")]
    #[case(3_904_897_024, "3.64Gbyte")]
    #[case(100, "100.00byte")]
    fn capacity_scales_to_largest_unit(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(scale_capacity(bytes), expected);
    }
}

//! End-to-end decoding conformance over known register images plus
//! robustness properties over arbitrary input.

use cardreg_core::{
    decode_cid, decode_csd, decode_scr, Bitstream, BusFamily, DecodeError, ReportMode,
};
use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const SD_CID: &str = "035344535530344780325a5d0300e3db";
const MMC_CID: &str = "13014e51324a35354c07123456787200";
const SD_CSD_V0: &str = "002600325f5980642db57f800a400000";
const SD_CSD_V1: &str = "400e00325b5900001d177f800a400000";
const MMC_CSD: &str = "902701320f5981e42db7ffef92404032";
const SCR: &str = "0235800300000000";

#[rstest]
#[case(BusFamily::Sd, SD_CID, "======SD/CID======")]
#[case(BusFamily::Mmc, MMC_CID, "======MMC/CID======")]
fn cid_verbose_reports_open_with_the_register_banner(
    #[case] bus: BusFamily,
    #[case] hex: &str,
    #[case] banner: &str,
) {
    let report = decode_cid(bus, hex, ReportMode::Verbose).expect("valid image");
    assert_eq!(report.lines()[0], banner);
}

#[rstest]
#[case(BusFamily::Sd, SD_CSD_V0)]
#[case(BusFamily::Sd, SD_CSD_V1)]
#[case(BusFamily::Mmc, MMC_CSD)]
fn csd_terse_reports_end_with_a_capacity_line(#[case] bus: BusFamily, #[case] hex: &str) {
    let report = decode_csd(bus, hex, ReportMode::Terse).expect("valid image");
    let last = report.lines().last().expect("nonempty report");
    assert!(last.starts_with("capacity: "));
    assert!(last.ends_with("512 bytes each)"));
}

#[test]
fn render_terminates_every_report_with_a_newline() {
    let report = decode_scr(SCR, ReportMode::Terse).expect("valid image");
    let text = report.render();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), report.lines().len());
}

#[test]
fn sd_capacity_agrees_between_modes() {
    let verbose = decode_csd(BusFamily::Sd, SD_CSD_V1, ReportMode::Verbose).expect("valid");
    let terse = decode_csd(BusFamily::Sd, SD_CSD_V1, ReportMode::Terse).expect("valid");
    let from_verbose = verbose
        .lines()
        .iter()
        .find_map(|line| line.strip_prefix("\tCAPACITY: "))
        .expect("capacity line");
    let from_terse = terse
        .lines()
        .iter()
        .find_map(|line| line.strip_prefix("capacity: "))
        .expect("capacity line");
    assert_eq!(from_verbose, from_terse);
}

#[test]
fn unknown_sd_csd_structure_is_a_degraded_error() {
    let hex = "c02600325f5980642db57f800a400000";
    let err = decode_csd(BusFamily::Sd, hex, ReportMode::Verbose).expect_err("version 3");
    assert_eq!(err, DecodeError::UnsupportedStructureVersion(3));
    assert!(err.is_degraded());
}

proptest! {
    #[test]
    fn hex_roundtrips_through_the_bitstream(hex in "[0-9a-f]{0,64}") {
        let bits = Bitstream::from_hex(&hex).expect("valid hex");
        prop_assert_eq!(bits.to_hex(), hex);
    }

    #[test]
    fn uppercase_hex_roundtrips_lowercased(hex in "[0-9A-F]{1,32}") {
        let bits = Bitstream::from_hex(&hex).expect("valid hex");
        prop_assert_eq!(bits.to_hex(), hex.to_lowercase());
    }

    #[test]
    fn arbitrary_input_never_panics(input in ".{0,80}") {
        let _ = decode_cid(BusFamily::Sd, &input, ReportMode::Verbose);
        let _ = decode_cid(BusFamily::Mmc, &input, ReportMode::Terse);
        let _ = decode_csd(BusFamily::Sd, &input, ReportMode::Verbose);
        let _ = decode_csd(BusFamily::Mmc, &input, ReportMode::Terse);
        let _ = decode_scr(&input, ReportMode::Verbose);
    }

    #[test]
    fn truncated_images_still_decode(hex in "[0-9a-f]{0,32}") {
        let report = decode_cid(BusFamily::Sd, &hex, ReportMode::Verbose)
            .expect("hex input decodes");
        prop_assert_eq!(report.lines()[0].as_str(), "======SD/CID======");
    }

    #[test]
    fn terse_reports_never_carry_warnings(hex in "[0-9a-f]{32}") {
        for bus in [BusFamily::Sd, BusFamily::Mmc] {
            if let Ok(report) = decode_cid(bus, &hex, ReportMode::Terse) {
                prop_assert!(report.lines().iter().all(|line| !line.starts_with("Warn:")));
            }
            if let Ok(report) = decode_csd(bus, &hex, ReportMode::Terse) {
                prop_assert!(report.lines().iter().all(|line| !line.starts_with("Warn:")));
            }
        }
    }

    #[test]
    fn decoding_is_deterministic(hex in "[0-9a-f]{32}") {
        let first = decode_csd(BusFamily::Mmc, &hex, ReportMode::Verbose).expect("valid hex");
        let second = decode_csd(BusFamily::Mmc, &hex, ReportMode::Verbose).expect("valid hex");
        prop_assert_eq!(first.lines(), second.lines());
    }
}

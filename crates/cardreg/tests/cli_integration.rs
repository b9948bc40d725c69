//! Integration tests for the cardreg CLI.

use cardreg as _;
use cardreg_core as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const SD_CID_HEX: &str = "035344535530344780325a5d0300e3db";
const SD_CSD_HEX: &str = "400e00325b5900001d177f800a400000";
const SD_SCR_HEX: &str = "0235800300000000";
const MMC_CID_HEX: &str = "13014e51324a35354c07123456787200";

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("cardreg")
}

fn create_device_dir(dir: &Path, bus: &str, registers: &[(&str, &str)]) {
    fs::write(dir.join("type"), format!("{bus}\n")).unwrap();
    for (name, content) in registers {
        fs::write(dir.join(name), format!("{content}\n")).unwrap();
    }
}

#[test]
fn cid_verbose_from_device_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "SD", &[("cid", SD_CID_HEX)]);

    let result = Command::new(binary_path())
        .args(["cid", "-v", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("======SD/CID======"));
    assert!(stdout.contains("\tMID: 0x03 (SanDisk)"));
    assert!(stdout.contains("\tPNM: SU04G"));
}

#[test]
fn cid_terse_from_device_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "SD", &[("cid", SD_CID_HEX)]);

    let result = Command::new(binary_path())
        .args(["cid", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("product: 'SU04G' 8.0"));
    assert!(!stdout.contains("Warn:"));
    assert!(!stdout.contains("======"));
}

#[test]
fn csd_inline_register_value() {
    let result = Command::new(binary_path())
        .args(["csd", "-b", "sd", "-r", SD_CSD_HEX])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("capacity: 3.64Gbyte"));
}

#[test]
fn cid_inline_mmc_register_value() {
    let result = Command::new(binary_path())
        .args(["cid", "-b", "mmc", "-r", MMC_CID_HEX])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("manufacturer: 0x13 (Micron)"));
}

#[test]
fn unknown_csd_structure_reports_and_succeeds() {
    let result = Command::new(binary_path())
        .args(["csd", "-b", "sd", "-r", "c02600325f5980642db57f800a400000"])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Unknown CSD structure: 0x3"));
}

#[test]
fn scr_on_mmc_device_is_silently_skipped() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "MMC", &[("cid", MMC_CID_HEX)]);

    let result = Command::new(binary_path())
        .args(["scr", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    assert!(result.stdout.is_empty());
}

#[test]
fn scr_on_sd_device_decodes() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "SD", &[("scr", SD_SCR_HEX)]);

    let result = Command::new(binary_path())
        .args(["scr", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("version: SD 3.0x"));
    assert!(stdout.contains("bus widths: 4bit, 1bit"));
}

#[test]
fn malformed_register_content_fails() {
    let result = Command::new(binary_path())
        .args(["cid", "-b", "sd", "-r", "not-hex"])
        .output()
        .expect("failed to run cardreg");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("not a hexadecimal string"));
}

#[test]
fn missing_register_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "SD", &[]);

    let result = Command::new(binary_path())
        .args(["csd", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("could not read"));
}

#[test]
fn unknown_bus_type_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "NVME", &[("cid", SD_CID_HEX)]);

    let result = Command::new(binary_path())
        .args(["cid", temp_dir.path().to_str().unwrap()])
        .output()
        .expect("failed to run cardreg");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unknown bus type 'NVME'"));
}

#[test]
fn help_shows_usage() {
    let result = Command::new(binary_path())
        .args(["--help"])
        .output()
        .expect("failed to run cardreg");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Usage: cardreg"));
    assert!(stdout.contains("cid"));
    assert!(stdout.contains("scr"));
}

#[test]
fn unknown_register_fails() {
    let result = Command::new(binary_path())
        .args(["ocr", "/nonexistent"])
        .output()
        .expect("failed to run cardreg");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unknown register"));
}

#[test]
fn conflicting_inputs_fail() {
    let temp_dir = tempfile::tempdir().unwrap();
    create_device_dir(temp_dir.path(), "SD", &[("cid", SD_CID_HEX)]);

    let result = Command::new(binary_path())
        .args([
            "cid",
            "-b",
            "sd",
            "-r",
            SD_CID_HEX,
            temp_dir.path().to_str().unwrap(),
        ])
        .output()
        .expect("failed to run cardreg");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("not both"));
}

//! CLI entry point for the cardreg binary.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use cardreg::source::{detect_bus, read_register};
use cardreg_core::{decode_cid, decode_csd, decode_scr, BusFamily, DecodeError, ReportMode};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: cardreg <register> [options] [<device-dir>]

Registers:
  cid   Card identification
  csd   Card-specific data
  scr   SD card configuration (SD only)

Options:
  -b, --bus <sd|mmc>   Bus family for an inline register value
  -r, --reg <hex>      Inline register value instead of a device directory
  -v, --verbose        Print every field with compliance warnings
  -h, --help           Show this help message

Examples:
  cardreg cid /sys/bus/mmc/devices/mmc0:0001
  cardreg csd -v -b sd -r 400e00325b5900001d177f800a400000
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegisterKind {
    Cid,
    Csd,
    Scr,
}

impl RegisterKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "cid" => Some(Self::Cid),
            "csd" => Some(Self::Csd),
            "scr" => Some(Self::Scr),
            _ => None,
        }
    }

    const fn file_name(self) -> &'static str {
        match self {
            Self::Cid => "cid",
            Self::Csd => "csd",
            Self::Scr => "scr",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Inline { bus: BusFamily, hex: String },
    Directory(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
struct DecodeArgs {
    register: RegisterKind,
    verbose: bool,
    input: Input,
}

#[derive(Debug)]
enum ParseResult {
    Command(DecodeArgs),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing register name".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let register_str = first.to_string_lossy().to_string();
    let register = RegisterKind::from_name(&register_str)
        .ok_or_else(|| format!("unknown register: {register_str}"))?;

    let mut verbose = false;
    let mut bus: Option<BusFamily> = None;
    let mut hex: Option<String> = None;
    let mut directory: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "-b" || arg == "--bus" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -b".to_string())?;
            let name = value.to_string_lossy().to_string();
            bus = Some(
                BusFamily::from_name(&name).ok_or_else(|| format!("unknown bus type '{name}'"))?,
            );
            continue;
        }

        if arg == "-r" || arg == "--reg" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -r".to_string())?;
            hex = Some(value.to_string_lossy().to_string());
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if directory.is_some() {
            return Err("multiple device directories provided".to_string());
        }
        directory = Some(PathBuf::from(arg));
    }

    let input = match (bus, hex, directory) {
        (Some(bus), Some(hex), None) => Input::Inline { bus, hex },
        (None, None, Some(dir)) => Input::Directory(dir),
        (None, None, None) => return Err("missing device directory".to_string()),
        (Some(_), Some(_), Some(_)) => {
            return Err("either a register value or a device directory, not both".to_string())
        }
        _ => return Err("bus type and register value must be provided together".to_string()),
    };

    Ok(ParseResult::Command(DecodeArgs {
        register,
        verbose,
        input,
    }))
}

fn run(args: &DecodeArgs) -> Result<(), i32> {
    let mode = if args.verbose {
        ReportMode::Verbose
    } else {
        ReportMode::Terse
    };

    let (bus, hex) = match &args.input {
        Input::Inline { bus, hex } => (*bus, hex.clone()),
        Input::Directory(dir) => {
            let bus = detect_bus(dir).map_err(|error| {
                eprintln!("error: {error}");
                1
            })?;
            if args.register == RegisterKind::Scr && bus == BusFamily::Mmc {
                return Ok(());
            }
            let hex = read_register(dir, args.register.file_name()).map_err(|error| {
                eprintln!("error: {error}");
                1
            })?;
            (bus, hex)
        }
    };

    // The SCR register does not exist on MMC devices.
    if args.register == RegisterKind::Scr && bus == BusFamily::Mmc {
        return Ok(());
    }

    let result = match args.register {
        RegisterKind::Cid => decode_cid(bus, &hex, mode),
        RegisterKind::Csd => decode_csd(bus, &hex, mode),
        RegisterKind::Scr => decode_scr(&hex, mode),
    };

    match result {
        Ok(report) => {
            print!("{}", report.render());
            Ok(())
        }
        Err(DecodeError::UnsupportedStructureVersion(version)) => {
            println!("Unknown CSD structure: 0x{version:x}");
            Ok(())
        }
        Err(error) => {
            eprintln!("error: {error}");
            Err(1)
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<ParseResult, String> {
        parse_args(args.iter().map(OsString::from))
    }

    #[test]
    fn parses_directory_mode() {
        let result = parse(&["cid", "-v", "/sys/card"]).expect("valid args");
        let ParseResult::Command(args) = result else {
            panic!("expected a command");
        };
        assert_eq!(
            args,
            DecodeArgs {
                register: RegisterKind::Cid,
                verbose: true,
                input: Input::Directory(PathBuf::from("/sys/card")),
            }
        );
    }

    #[test]
    fn parses_inline_mode() {
        let result = parse(&["csd", "-b", "mmc", "-r", "90270132"]).expect("valid args");
        let ParseResult::Command(args) = result else {
            panic!("expected a command");
        };
        assert_eq!(
            args,
            DecodeArgs {
                register: RegisterKind::Csd,
                verbose: false,
                input: Input::Inline {
                    bus: BusFamily::Mmc,
                    hex: "90270132".to_string(),
                },
            }
        );
    }

    #[test]
    fn parses_help_flag() {
        let result = parse(&["--help"]).expect("help parses");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_unknown_register() {
        let error = parse(&["ocr", "/sys/card"]).expect_err("unknown register");
        assert!(error.contains("unknown register"));
    }

    #[test]
    fn rejects_bus_without_register_value() {
        let error = parse(&["cid", "-b", "sd"]).expect_err("incomplete inline args");
        assert!(error.contains("provided together"));
    }

    #[test]
    fn rejects_register_value_with_directory() {
        let error =
            parse(&["cid", "-b", "sd", "-r", "0353", "/sys/card"]).expect_err("conflicting args");
        assert!(error.contains("not both"));
    }

    #[test]
    fn rejects_missing_directory() {
        let error = parse(&["scr"]).expect_err("no input at all");
        assert!(error.contains("missing device directory"));
    }

    #[test]
    fn rejects_unknown_bus_type() {
        let error = parse(&["cid", "-b", "nvme", "-r", "0353"]).expect_err("bad bus type");
        assert!(error.contains("unknown bus type"));
    }

    #[test]
    fn rejects_multiple_directories() {
        let error = parse(&["cid", "/a", "/b"]).expect_err("two directories");
        assert!(error.contains("multiple device directories"));
    }

    #[test]
    fn rejects_unknown_option() {
        let error = parse(&["cid", "--json", "/sys/card"]).expect_err("unknown option");
        assert!(error.contains("unknown option"));
    }
}

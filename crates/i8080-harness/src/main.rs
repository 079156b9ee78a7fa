//! Runs the classic 8080 conformance ROMs and prints a pass/fail report.
//!
//! Usage: `i8080-conformance <rom-directory>`, where the directory holds
//! one or more of `TST8080.COM`, `CPUTEST.COM`, `8080PRE.COM`,
//! `8080EXM.COM` (the four ROMs `original_source/i8080_tests.c` runs, in
//! that order).

use std::path::Path;
use std::process::ExitCode;

use i8080_harness::cpm;

const EXPECTED_ROMS: &[&str] = &["TST8080.COM", "CPUTEST.COM", "8080PRE.COM", "8080EXM.COM"];

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(rom_dir) = args.next() else {
        eprintln!("usage: i8080-conformance <rom-directory>");
        return ExitCode::FAILURE;
    };

    let rom_dir = Path::new(&rom_dir);
    let results = cpm::run_all(rom_dir);

    if results.is_empty() {
        eprintln!(
            "no .COM ROMs found in {}; expected one or more of {EXPECTED_ROMS:?}",
            rom_dir.display()
        );
        return ExitCode::FAILURE;
    }

    let report = cpm::generate_report(&results);
    println!("{report}");

    if results
        .iter()
        .all(|r| r.status == cpm::TestStatus::Pass)
    {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

mod args;
mod json;
mod path;
mod text;

use std::env;
use std::io;
use std::path::PathBuf;

use dupdef_scan_core::scan_for_duplicate_defs_with_stats;

use crate::args::{Localization, ParsedArgs, detect_localization, parse_args, print_help, tr};
use crate::json::{JsonScanStats, map_report, write_json, write_json_file};
use crate::text::{format_scan_stats, format_text_report, format_warnings, scan_incomplete};

fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();

    let localization = match detect_localization(&argv) {
        Ok(localization) => localization,
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help(Localization::En);
            std::process::exit(2);
        }
    };

    let before_separator = argv.split(|arg| arg == "--").next().unwrap_or(&argv[..]);
    if before_separator.iter().any(|a| a == "-h" || a == "--help") {
        print_help(localization);
        return;
    }
    if before_separator.iter().any(|a| a == "-V" || a == "--version") {
        println!("dupdef-scan {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let parsed = match parse_args(&argv, localization) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help(localization);
            std::process::exit(2);
        }
    };

    let roots: Vec<PathBuf> = match parsed
        .roots
        .iter()
        .map(|p| path::resolve_path(p))
        .collect::<io::Result<Vec<_>>>()
    {
        Ok(roots) => roots,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    match run(&parsed, &roots) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(parsed: &ParsedArgs, roots: &[PathBuf]) -> io::Result<i32> {
    let outcome = scan_for_duplicate_defs_with_stats(roots, &parsed.options)?;
    let has_issues = outcome.result.has_issues();
    let report = map_report(outcome.result);
    let stats = outcome.stats;

    if let Some(json_path) = &parsed.json_out {
        write_json_file(json_path, &report)?;
    }

    if parsed.json {
        if parsed.stats {
            write_json(&serde_json::json!({
                "report": report,
                "scanStats": JsonScanStats::from(stats.clone()),
            }))?;
        } else {
            write_json(&report)?;
        }
    } else {
        print!("{}", format_text_report(parsed.localization, &report));
    }

    eprint!("{}", format_warnings(&stats));
    if parsed.stats && !parsed.json {
        eprint!("{}", format_scan_stats(parsed.localization, &stats));
    }

    if parsed.strict && (scan_incomplete(&stats) || stats.candidate_files == 0) {
        if !parsed.stats && !parsed.json {
            eprint!("{}", format_scan_stats(parsed.localization, &stats));
        }
        if stats.candidate_files == 0 {
            eprintln!(
                "{}",
                tr(
                    parsed.localization,
                    "Error: no source files matched",
                    "错误：未匹配到任何源文件",
                )
            );
        }
        return Ok(1);
    }

    if parsed.fail_on_issues && has_issues {
        return Ok(2);
    }

    Ok(0)
}

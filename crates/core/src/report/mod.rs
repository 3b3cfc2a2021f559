mod classify;


use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::scan::{
    FileRead, collect_source_files, display_path, read_source_file, validate_roots,
};
use crate::scanner::{FileDefs, scan_definitions};
use crate::types::{DupdefReport, ScanOptions, ScanOutcome, ScanStats, ScanWarning};

pub fn scan_for_duplicate_defs(
    roots: &[PathBuf],
    options: &ScanOptions,
) -> io::Result<DupdefReport> {
    Ok(scan_for_duplicate_defs_with_stats(roots, options)?.result)
}

/// Scan every candidate file independently, merge the per-file record sets,
/// and classify the merged streams exactly once. Workers share no mutable
/// state; the collected results keep candidate-list order, so the report is
/// identical for any worker count and any completion order.
pub fn scan_for_duplicate_defs_with_stats(
    roots: &[PathBuf],
    options: &ScanOptions,
) -> io::Result<ScanOutcome<DupdefReport>> {
    if roots.is_empty() {
        return Ok(ScanOutcome {
            result: DupdefReport::default(),
            stats: ScanStats::default(),
        });
    }

    validate_roots(roots)?;

    let mut stats = ScanStats::default();
    let files = collect_source_files(roots, options, &mut stats)?;
    stats.candidate_files = files.len() as u64;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.worker_count)
        .build()
        .map_err(|err| io::Error::other(format!("worker pool: {err}")))?;
    let scans: Vec<FileScan> = pool.install(|| {
        files
            .par_iter()
            .map(|path| scan_source_file(path, options))
            .collect()
    });

    let mut type_defs = Vec::new();
    let mut func_defs = Vec::new();
    for scan in scans {
        match scan {
            FileScan::Scanned { bytes, defs } => {
                stats.scanned_files = stats.scanned_files.saturating_add(1);
                stats.scanned_bytes = stats.scanned_bytes.saturating_add(bytes);
                type_defs.extend(defs.type_defs);
                func_defs.extend(defs.func_defs);
            }
            FileScan::TooLarge { path, size } => {
                stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
                stats.warnings.push(ScanWarning {
                    path,
                    detail: format!("skipped: {size} bytes exceeds the file size limit"),
                });
            }
            FileScan::Binary => {
                stats.skipped_binary = stats.skipped_binary.saturating_add(1);
            }
            FileScan::Unreadable { path, detail } => {
                stats.skipped_unreadable = stats.skipped_unreadable.saturating_add(1);
                stats.warnings.push(ScanWarning {
                    path,
                    detail: format!("could not read: {detail}"),
                });
            }
        }
    }

    let result = classify::classify(type_defs, func_defs, options.allow_inline_exemption);
    Ok(ScanOutcome { result, stats })
}

#[derive(Debug)]
enum FileScan {
    Scanned { bytes: u64, defs: FileDefs },
    TooLarge { path: String, size: u64 },
    Binary,
    Unreadable { path: String, detail: String },
}

fn scan_source_file(path: &Path, options: &ScanOptions) -> FileScan {
    let display = display_path(path);
    match read_source_file(path, options.max_file_size) {
        FileRead::Contents(bytes) => {
            let defs = scan_definitions(&bytes, &display);
            FileScan::Scanned {
                bytes: bytes.len() as u64,
                defs,
            }
        }
        FileRead::TooLarge(size) => FileScan::TooLarge {
            path: display,
            size,
        },
        FileRead::Binary => FileScan::Binary,
        FileRead::Unreadable(detail) => FileScan::Unreadable {
            path: display,
            detail,
        },
    }
}

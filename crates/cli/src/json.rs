use std::fs;
use std::io;
use std::path::Path;

use dupdef_scan_core::{DefSite, DupdefReport, ScanStats};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonScanWarning {
    pub(crate) path: String,
    pub(crate) detail: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonScanStats {
    pub(crate) candidate_files: u64,
    pub(crate) scanned_files: u64,
    pub(crate) scanned_bytes: u64,
    pub(crate) skipped_too_large: u64,
    pub(crate) skipped_unreadable: u64,
    pub(crate) skipped_binary: u64,
    pub(crate) skipped_walk_errors: u64,
    pub(crate) warnings: Vec<JsonScanWarning>,
}

impl From<ScanStats> for JsonScanStats {
    fn from(stats: ScanStats) -> Self {
        Self {
            candidate_files: stats.candidate_files,
            scanned_files: stats.scanned_files,
            scanned_bytes: stats.scanned_bytes,
            skipped_too_large: stats.skipped_too_large,
            skipped_unreadable: stats.skipped_unreadable,
            skipped_binary: stats.skipped_binary,
            skipped_walk_errors: stats.skipped_walk_errors,
            warnings: stats
                .warnings
                .into_iter()
                .map(|w| JsonScanWarning {
                    path: w.path,
                    detail: w.detail,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDefSite {
    pub(crate) file: String,
    pub(crate) line: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonTypeDupGroup {
    pub(crate) qualified_name: String,
    pub(crate) defs: Vec<JsonDefSite>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonFuncDupGroup {
    pub(crate) qualified_name: String,
    pub(crate) signature: String,
    pub(crate) kind: &'static str,
    pub(crate) defs: Vec<JsonDefSite>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonOdrVariant {
    pub(crate) fingerprint: String,
    pub(crate) defs: Vec<JsonDefSite>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonOdrConflict {
    pub(crate) qualified_name: String,
    pub(crate) signature: String,
    pub(crate) variants: Vec<JsonOdrVariant>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDupdefReport {
    pub(crate) duplicate_classes: Vec<JsonTypeDupGroup>,
    pub(crate) duplicate_functions: Vec<JsonFuncDupGroup>,
    pub(crate) odr_conflicts: Vec<JsonOdrConflict>,
}

fn map_sites(sites: Vec<DefSite>) -> Vec<JsonDefSite> {
    sites
        .into_iter()
        .map(|site| JsonDefSite {
            file: site.file,
            line: site.line,
        })
        .collect()
}

pub(crate) fn map_report(report: DupdefReport) -> JsonDupdefReport {
    JsonDupdefReport {
        duplicate_classes: report
            .duplicate_classes
            .into_iter()
            .map(|group| JsonTypeDupGroup {
                qualified_name: group.qualified_name,
                defs: map_sites(group.defs),
            })
            .collect(),
        duplicate_functions: report
            .duplicate_functions
            .into_iter()
            .map(|group| JsonFuncDupGroup {
                qualified_name: group.qualified_name,
                signature: group.signature,
                kind: group.kind.as_str(),
                defs: map_sites(group.defs),
            })
            .collect(),
        odr_conflicts: report
            .odr_conflicts
            .into_iter()
            .map(|conflict| JsonOdrConflict {
                qualified_name: conflict.qualified_name,
                signature: conflict.signature,
                variants: conflict
                    .variants
                    .into_iter()
                    .map(|variant| JsonOdrVariant {
                        fingerprint: format!("{:016x}", variant.body_fingerprint),
                        defs: map_sites(variant.defs),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub(crate) fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    println!("{json}");
    Ok(())
}

pub(crate) fn write_json_file<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    fs::write(path, json + "\n")
}

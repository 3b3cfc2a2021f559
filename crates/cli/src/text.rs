use dupdef_scan_core::ScanStats;

use crate::args::{Localization, tr};
use crate::json::JsonDupdefReport;

/// True when some candidate files never made it into the merge.
pub(crate) fn scan_incomplete(stats: &ScanStats) -> bool {
    stats.skipped_too_large > 0 || stats.skipped_unreadable > 0 || stats.skipped_walk_errors > 0
}

pub(crate) fn format_scan_stats(localization: Localization, stats: &ScanStats) -> String {
    let mut out = String::new();
    out.push_str(tr(localization, "== scan stats ==\n", "== 扫描统计 ==\n"));
    out.push_str(&format!(
        "candidates={} scanned={} bytes={}\n",
        stats.candidate_files, stats.scanned_files, stats.scanned_bytes
    ));

    let mut skips: Vec<(&str, u64)> = vec![
        ("too_large", stats.skipped_too_large),
        ("unreadable", stats.skipped_unreadable),
        ("binary", stats.skipped_binary),
        ("walk_errors", stats.skipped_walk_errors),
    ];
    skips.retain(|(_, v)| *v > 0);
    if !skips.is_empty() {
        out.push_str(tr(localization, "skipped:\n", "跳过:\n"));
        for (k, v) in skips {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}

pub(crate) fn format_warnings(stats: &ScanStats) -> String {
    let mut out = String::new();
    for warning in &stats.warnings {
        out.push_str(&format!("[WARN] {}: {}\n", warning.path, warning.detail));
    }
    out
}

pub(crate) fn format_text_report(
    localization: Localization,
    report: &JsonDupdefReport,
) -> String {
    let mut out = String::new();

    if !report.duplicate_classes.is_empty() {
        out.push_str(tr(
            localization,
            "== Duplicate class/struct/enum definitions ==\n",
            "== 重复的 class/struct/enum 定义 ==\n",
        ));
        for group in &report.duplicate_classes {
            out.push_str(&format!("  {}\n", group.qualified_name));
            for site in &group.defs {
                out.push_str(&format!("    - {}:{}\n", site.file, site.line));
            }
        }
    }

    if !report.duplicate_functions.is_empty() {
        out.push_str(tr(
            localization,
            "== Duplicate function/method definitions (identical bodies) ==\n",
            "== 重复的函数/方法定义（函数体完全相同） ==\n",
        ));
        for group in &report.duplicate_functions {
            out.push_str(&format!(
                "  {}({}) [{}]\n",
                group.qualified_name, group.signature, group.kind
            ));
            for site in &group.defs {
                out.push_str(&format!("    - {}:{}\n", site.file, site.line));
            }
        }
    }

    if !report.odr_conflicts.is_empty() {
        out.push_str(tr(
            localization,
            "== Conflicting function/method definitions (ODR risk) ==\n",
            "== 冲突的函数/方法定义（ODR 风险） ==\n",
        ));
        for conflict in &report.odr_conflicts {
            out.push_str(&format!(
                "  {}({})\n",
                conflict.qualified_name, conflict.signature
            ));
            for variant in &conflict.variants {
                out.push_str(&format!("    body {}:\n", &variant.fingerprint[..12.min(variant.fingerprint.len())]));
                for site in &variant.defs {
                    out.push_str(&format!("      - {}:{}\n", site.file, site.line));
                }
            }
        }
    }

    if out.is_empty() {
        out.push_str(tr(
            localization,
            "No duplicate definitions found.\n",
            "未发现重复定义。\n",
        ));
    }
    out
}

use std::env;
use std::path::PathBuf;

use dupdef_scan_core::ScanOptions;

const HELP_TEXT_EN: &str = concat!(
    "dupdef-scan (duplicate C/C++ definitions / ODR conflicts)\n",
    "\n",
    "Usage:\n",
    "  dupdef-scan [options] [path ...]\n",
    "\n",
    "Options:\n",
    "  --localization <en|zh>  Set output language (default: en)\n",
    "  --exclude <glob>        Exclude paths matching a glob (repeatable)\n",
    "  --ignore-dir <name>     Add an ignored directory name (repeatable)\n",
    "  --no-gitignore          Do not respect .gitignore rules\n",
    "  --gitignore             Respect .gitignore rules (default: on)\n",
    "  --json                  Output JSON\n",
    "  --json-out <file>       Write the JSON report to a file (text stays on stdout)\n",
    "  --stats                 Include scan stats (JSON) or print to stderr\n",
    "  --strict                Exit non-zero if the scan was incomplete or matched no files\n",
    "  --fail-on-issues        Exit 2 when duplicates or ODR conflicts are found\n",
    "  --allow-identical-inline     Allow identical inline/template bodies across headers (default)\n",
    "  --no-allow-identical-inline  Flag identical inline/template duplicates too\n",
    "  --max-file-size <n>     Skip files larger than n bytes (default: 5242880)\n",
    "  --jobs <n>              Number of scan workers (0 = auto)\n",
    "  -V, --version           Show version\n",
    "  -h, --help              Show help\n",
    "\n",
    "Notes:\n",
    "  - paths may be files or directories (default: current directory)\n",
    "  - In text mode, --stats prints to stderr\n",
    "\n",
    "Examples:\n",
    "  dupdef-scan .\n",
    "  dupdef-scan --exclude third_party --exclude build src include\n",
    "  dupdef-scan --json-out dup_report.json --fail-on-issues .\n",
    "  dupdef-scan --no-allow-identical-inline include\n",
    "\n"
);

const HELP_TEXT_ZH: &str = concat!(
    "dupdef-scan（重复 C/C++ 定义 / ODR 冲突）\n",
    "\n",
    "用法:\n",
    "  dupdef-scan [options] [path ...]\n",
    "\n",
    "选项:\n",
    "  --localization <en|zh>  输出语言（默认: en）\n",
    "  --exclude <glob>        排除匹配 glob 的路径（可重复）\n",
    "  --ignore-dir <name>     忽略目录名（可重复）\n",
    "  --no-gitignore          不尊重 .gitignore 规则\n",
    "  --gitignore             启用 .gitignore 过滤（默认：开启）\n",
    "  --json                  输出 JSON\n",
    "  --json-out <file>       将 JSON 报告写入文件（stdout 仍输出文本）\n",
    "  --stats                 输出扫描统计（JSON 模式合并到输出；文本模式写 stderr）\n",
    "  --strict                若扫描不完整或未匹配到任何文件则退出码非 0\n",
    "  --fail-on-issues        发现重复或 ODR 冲突时退出码 2\n",
    "  --allow-identical-inline     允许头文件间完全相同的 inline/模板函数体（默认）\n",
    "  --no-allow-identical-inline  同样标记完全相同的 inline/模板重复\n",
    "  --max-file-size <n>     跳过大于 n 字节的文件（默认: 5242880）\n",
    "  --jobs <n>              扫描工作线程数（0 = 自动）\n",
    "  -V, --version           显示版本\n",
    "  -h, --help              显示帮助\n",
    "\n",
    "说明:\n",
    "  - path 可以是文件或目录（默认：当前目录）\n",
    "  - 文本模式下 --stats 输出到 stderr\n",
    "\n",
    "示例:\n",
    "  dupdef-scan .\n",
    "  dupdef-scan --exclude third_party --exclude build src include\n",
    "  dupdef-scan --json-out dup_report.json --fail-on-issues .\n",
    "  dupdef-scan --no-allow-identical-inline include\n",
    "\n"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Localization {
    En,
    Zh,
}

impl Localization {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Some(Self::En),
            "zh" | "zh-cn" | "zh_cn" | "cn" => Some(Self::Zh),
            _ => None,
        }
    }
}

pub(crate) fn tr(localization: Localization, en: &'static str, zh: &'static str) -> &'static str {
    match localization {
        Localization::En => en,
        Localization::Zh => zh,
    }
}

pub(crate) fn print_help(localization: Localization) {
    print!(
        "{}",
        match localization {
            Localization::En => HELP_TEXT_EN,
            Localization::Zh => HELP_TEXT_ZH,
        }
    );
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) localization: Localization,
    pub(crate) json: bool,
    pub(crate) json_out: Option<PathBuf>,
    pub(crate) stats: bool,
    pub(crate) strict: bool,
    pub(crate) fail_on_issues: bool,
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) options: ScanOptions,
}

fn parse_u64(localization: Localization, name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>().map_err(|_| {
        format!(
            "{} {}",
            name,
            tr(localization, "must be an integer", "必须是整数")
        )
    })
}

fn parse_u32_in_range(
    localization: Localization,
    name: &str,
    raw: &str,
    min: u32,
    max: u32,
) -> Result<u32, String> {
    let value = raw.parse::<u32>().map_err(|_| {
        format!(
            "{} {}",
            name,
            tr(localization, "must be an integer", "必须是整数")
        )
    })?;
    if !(min..=max).contains(&value) {
        return Err(
            format!("{} {}", name, tr(localization, "must be", "必须在"),) + &format!(" {min}..{max}"),
        );
    }
    Ok(value)
}

pub(crate) fn detect_localization(argv: &[String]) -> Result<Localization, String> {
    let mut localization = Localization::En;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            break;
        }

        if let Some(raw) = arg.strip_prefix("--localization=") {
            localization = Localization::parse(raw)
                .ok_or_else(|| "--localization must be one of: en, zh (or zh-CN)".to_string())?;
            i += 1;
            continue;
        }

        if arg == "--localization" {
            let raw = argv.get(i + 1).ok_or("--localization requires a value")?;
            localization = Localization::parse(raw)
                .ok_or_else(|| "--localization must be one of: en, zh (or zh-CN)".to_string())?;
            i += 2;
            continue;
        }

        i += 1;
    }

    Ok(localization)
}

pub(crate) fn parse_args(
    argv: &[String],
    localization: Localization,
) -> Result<ParsedArgs, String> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let mut exclude: Vec<String> = Vec::new();
    let mut ignore_dirs: Vec<String> = Vec::new();
    let mut json = false;
    let mut json_out: Option<PathBuf> = None;
    let mut stats = false;
    let mut strict = false;
    let mut fail_on_issues = false;
    let mut respect_gitignore = true;
    let mut allow_inline_exemption = true;
    let mut max_file_size: Option<u64> = None;
    let mut worker_count: Option<usize> = None;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            roots.extend(argv[(i + 1)..].iter().map(PathBuf::from));
            break;
        }
        if arg.strip_prefix("--localization=").is_some() {
            i += 1;
            continue;
        }
        if arg == "--localization" {
            let _ = argv.get(i + 1).ok_or_else(|| {
                tr(
                    localization,
                    "--localization requires a value",
                    "--localization 需要一个值",
                )
                .to_string()
            })?;
            i += 2;
            continue;
        }
        if arg == "--json" {
            json = true;
            i += 1;
            continue;
        }
        if arg == "--json-out" {
            let value = argv.get(i + 1).ok_or_else(|| {
                tr(
                    localization,
                    "--json-out requires a value",
                    "--json-out 需要一个值",
                )
                .to_string()
            })?;
            json_out = Some(PathBuf::from(value));
            i += 2;
            continue;
        }
        if arg == "--stats" {
            stats = true;
            i += 1;
            continue;
        }
        if arg == "--strict" {
            strict = true;
            i += 1;
            continue;
        }
        if arg == "--fail-on-issues" {
            fail_on_issues = true;
            i += 1;
            continue;
        }
        if arg == "--no-gitignore" {
            respect_gitignore = false;
            i += 1;
            continue;
        }
        if arg == "--gitignore" {
            respect_gitignore = true;
            i += 1;
            continue;
        }
        if arg == "--allow-identical-inline" {
            allow_inline_exemption = true;
            i += 1;
            continue;
        }
        if arg == "--no-allow-identical-inline" {
            allow_inline_exemption = false;
            i += 1;
            continue;
        }
        if arg == "--max-file-size" {
            let raw = argv.get(i + 1).ok_or_else(|| {
                tr(
                    localization,
                    "--max-file-size requires a value",
                    "--max-file-size 需要一个值",
                )
                .to_string()
            })?;
            let value = parse_u64(localization, "--max-file-size", raw)?;
            max_file_size = Some(value);
            i += 2;
            continue;
        }
        if arg == "--jobs" {
            let raw = argv.get(i + 1).ok_or_else(|| {
                tr(localization, "--jobs requires a value", "--jobs 需要一个值").to_string()
            })?;
            let value = parse_u32_in_range(localization, "--jobs", raw, 0, 1024)?;
            worker_count = Some(value as usize);
            i += 2;
            continue;
        }
        if arg == "--exclude" {
            let value = argv.get(i + 1).ok_or_else(|| {
                tr(
                    localization,
                    "--exclude requires a value",
                    "--exclude 需要一个值",
                )
                .to_string()
            })?;
            exclude.push(value.to_string());
            i += 2;
            continue;
        }
        if arg == "--ignore-dir" {
            let value = argv.get(i + 1).ok_or_else(|| {
                tr(
                    localization,
                    "--ignore-dir requires a value",
                    "--ignore-dir 需要一个值",
                )
                .to_string()
            })?;
            ignore_dirs.push(value.to_string());
            i += 2;
            continue;
        }
        if arg == "-h" || arg == "--help" {
            i += 1;
            continue;
        }
        if arg == "-V" || arg == "--version" {
            i += 1;
            continue;
        }
        if arg.starts_with('-') {
            return Err(format!(
                "{} {arg}",
                tr(localization, "Unknown option:", "未知参数:"),
            ));
        }
        roots.push(PathBuf::from(arg));
        i += 1;
    }

    let mut options = ScanOptions {
        respect_gitignore,
        allow_inline_exemption,
        ..ScanOptions::default()
    };
    if let Some(max_file_size) = max_file_size {
        options.max_file_size = Some(max_file_size);
    }
    if let Some(worker_count) = worker_count {
        options.worker_count = worker_count;
    }
    options.exclude.extend(exclude);
    options.ignore_dirs.extend(ignore_dirs);

    let roots = if roots.is_empty() {
        vec![env::current_dir().map_err(|e| {
            format!(
                "{} {e}",
                tr(localization, "failed to get cwd:", "无法获取当前目录:"),
            )
        })?]
    } else {
        roots
    };

    Ok(ParsedArgs {
        localization,
        json,
        json_out,
        stats,
        strict,
        fail_on_issues,
        roots,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_option_is_rejected_en() {
        let err = parse_args(&argv(&["--bogus", "."]), Localization::En).unwrap_err();
        assert!(err.contains("Unknown option"));
    }

    #[test]
    fn unknown_option_is_rejected_zh() {
        let err = parse_args(&argv(&["--bogus", "."]), Localization::Zh).unwrap_err();
        assert!(err.contains("未知参数"));
    }

    #[test]
    fn inline_exemption_defaults_on_and_can_be_disabled() {
        let parsed = parse_args(&argv(&["."]), Localization::En).unwrap();
        assert!(parsed.options.allow_inline_exemption);

        let parsed =
            parse_args(&argv(&["--no-allow-identical-inline", "."]), Localization::En).unwrap();
        assert!(!parsed.options.allow_inline_exemption);
    }

    #[test]
    fn excludes_and_ignore_dirs_accumulate() {
        let parsed = parse_args(
            &argv(&["--exclude", "build/**", "--exclude", "*.gen.cpp", "--ignore-dir", "vendor", "."]),
            Localization::En,
        )
        .unwrap();
        assert_eq!(parsed.options.exclude, ["build/**", "*.gen.cpp"]);
        assert!(parsed.options.ignore_dirs.contains("vendor"));
        assert!(parsed.options.ignore_dirs.contains(".git"));
    }

    #[test]
    fn jobs_must_be_in_range() {
        let parsed = parse_args(&argv(&["--jobs", "8", "."]), Localization::En).unwrap();
        assert_eq!(parsed.options.worker_count, 8);

        let err = parse_args(&argv(&["--jobs", "9999"]), Localization::En).unwrap_err();
        assert!(err.contains("0..1024"));

        let err = parse_args(&argv(&["--jobs", "many"]), Localization::En).unwrap_err();
        assert!(err.contains("must be an integer"));
    }

    #[test]
    fn value_flags_require_values() {
        for flag in ["--exclude", "--ignore-dir", "--json-out", "--max-file-size", "--jobs"] {
            let err = parse_args(&argv(&[flag]), Localization::En).unwrap_err();
            assert!(err.contains("requires a value"), "missing error for {flag}");
        }
    }

    #[test]
    fn double_dash_ends_option_parsing() {
        let parsed = parse_args(&argv(&["--", "--json"]), Localization::En).unwrap();
        assert!(!parsed.json);
        assert_eq!(parsed.roots, [PathBuf::from("--json")]);
    }

    #[test]
    fn localization_is_detected_anywhere_in_argv() {
        let loc = detect_localization(&argv(&[".", "--localization", "zh"])).unwrap();
        assert_eq!(loc, Localization::Zh);

        let loc = detect_localization(&argv(&["--localization=en", "."])).unwrap();
        assert_eq!(loc, Localization::En);

        let err = detect_localization(&argv(&["--localization", "fr"])).unwrap_err();
        assert!(err.contains("must be one of"));
    }
}

use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub exclude: Vec<String>,
    pub ignore_dirs: HashSet<String>,
    pub max_file_size: Option<u64>,
    pub worker_count: usize,
    pub allow_inline_exemption: bool,
    pub respect_gitignore: bool,
}

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            ignore_dirs: default_ignore_dirs(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE_BYTES),
            worker_count: 0,
            allow_inline_exemption: true,
            respect_gitignore: true,
        }
    }
}

pub fn default_ignore_dirs() -> HashSet<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "target",
        "dist",
        "build",
        "out",
        ".cache",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub candidate_files: u64,
    pub scanned_files: u64,
    pub scanned_bytes: u64,
    pub skipped_too_large: u64,
    pub skipped_unreadable: u64,
    pub skipped_binary: u64,
    pub skipped_walk_errors: u64,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome<T> {
    pub result: T,
    pub stats: ScanStats,
}

/// One textual occurrence of a class/struct/union/enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub qualified_name: String,
    pub file: String,
    pub line: u32,
}

/// One function or method definition (a body was present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDef {
    pub qualified_name: String,
    pub signature: String,
    pub file: String,
    pub line: u32,
    pub body_fingerprint: u64,
    pub inline_or_template: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefSite {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// Identical bodies, inline exemption disabled.
    Identical,
    /// Identical bodies where at least one copy is neither inline nor a template.
    IdenticalNonInline,
}

impl DuplicateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::IdenticalNonInline => "identical_noninline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDupGroup {
    pub qualified_name: String,
    pub defs: Vec<DefSite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDupGroup {
    pub qualified_name: String,
    pub signature: String,
    pub kind: DuplicateKind,
    pub defs: Vec<DefSite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdrVariant {
    pub body_fingerprint: u64,
    pub defs: Vec<DefSite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdrConflict {
    pub qualified_name: String,
    pub signature: String,
    pub variants: Vec<OdrVariant>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DupdefReport {
    pub duplicate_classes: Vec<TypeDupGroup>,
    pub duplicate_functions: Vec<FuncDupGroup>,
    pub odr_conflicts: Vec<OdrConflict>,
}

impl DupdefReport {
    pub fn has_issues(&self) -> bool {
        !self.duplicate_classes.is_empty()
            || !self.duplicate_functions.is_empty()
            || !self.odr_conflicts.is_empty()
    }
}

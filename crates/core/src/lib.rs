mod report;
mod scan;
mod scanner;
mod scrub;
mod signature;
mod types;
mod util;

pub use report::{scan_for_duplicate_defs, scan_for_duplicate_defs_with_stats};

pub use types::{
    DEFAULT_MAX_FILE_SIZE_BYTES, DefSite, DupdefReport, DuplicateKind, FuncDef, FuncDupGroup,
    OdrConflict, OdrVariant, ScanOptions, ScanOutcome, ScanStats, ScanWarning, TypeDef,
    TypeDupGroup, default_ignore_dirs,
};

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::types::{ScanOptions, ScanStats};

use super::has_source_extension;

/// Enumerate candidate source files under each root: recognized extensions
/// only, exclusion globs and ignored directory names applied, deduplicated
/// and sorted so downstream processing is order-stable.
pub(crate) fn collect_source_files(
    roots: &[PathBuf],
    options: &ScanOptions,
    stats: &mut ScanStats,
) -> io::Result<Vec<PathBuf>> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files: Vec<PathBuf> = Vec::new();

    for root in roots {
        if root.is_file() {
            if has_source_extension(root) && seen.insert(root.clone()) {
                files.push(root.clone());
            }
            continue;
        }

        let overrides = build_exclude_overrides(root, &options.exclude)?;
        let is_git_repo = root.join(".git").exists();

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(false)
            .follow_links(false)
            .ignore(false)
            .git_ignore(options.respect_gitignore)
            .git_global(options.respect_gitignore && is_git_repo)
            .git_exclude(options.respect_gitignore && is_git_repo)
            .parents(false)
            .require_git(false)
            .overrides(overrides);

        let ignore_dirs = options.ignore_dirs.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.path_is_symlink() {
                return false;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if is_dir
                && let Some(name) = entry.file_name().to_str()
                && ignore_dirs.contains(name)
            {
                return false;
            }
            true
        });

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(_) => {
                    stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.into_path();
            if !has_source_extension(&path) {
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Exclusion globs become `!pattern` override entries: with only negated
/// globs, the walker keeps everything except matches.
fn build_exclude_overrides(
    root: &PathBuf,
    exclude: &[String],
) -> io::Result<ignore::overrides::Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in exclude {
        let negated = format!("!{pattern}");
        builder.add(&negated).map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid exclude pattern {pattern}: {err}"),
            )
        })?;
    }
    builder.build().map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid exclude patterns: {err}"),
        )
    })
}

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use super::*;
use crate::types::{ScanOptions, ScanStats};

fn temp_dir(suffix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("dupdef-scan-core-{suffix}-{nanos}"))
}

fn collect(root: &PathBuf, options: &ScanOptions) -> io::Result<Vec<String>> {
    let mut stats = ScanStats::default();
    let files = collect_source_files(std::slice::from_ref(root), options, &mut stats)?;
    Ok(files
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .map(display_path)
                .unwrap_or_else(|_| display_path(p))
        })
        .collect())
}

#[test]
fn only_recognized_extensions_are_candidates() -> io::Result<()> {
    let root = temp_dir("exts");
    fs::create_dir_all(&root)?;
    fs::write(root.join("a.cpp"), "int x;")?;
    fs::write(root.join("b.h"), "int y;")?;
    fs::write(root.join("B.HPP"), "int z;")?;
    fs::write(root.join("notes.txt"), "no")?;
    fs::write(root.join("Makefile"), "no")?;

    let names = collect(&root, &ScanOptions::default())?;
    assert_eq!(names, ["B.HPP", "a.cpp", "b.h"]);
    Ok(())
}

#[test]
fn exclude_globs_filter_files_and_directories() -> io::Result<()> {
    let root = temp_dir("exclude");
    fs::create_dir_all(root.join("generated"))?;
    fs::write(root.join("main.cpp"), "int x;")?;
    fs::write(root.join("main_test.cpp"), "int y;")?;
    fs::write(root.join("generated/gen.cpp"), "int z;")?;

    let options = ScanOptions {
        exclude: vec!["generated".to_string(), "*_test.cpp".to_string()],
        ..ScanOptions::default()
    };
    let names = collect(&root, &options)?;
    assert_eq!(names, ["main.cpp"]);
    Ok(())
}

#[test]
fn invalid_exclude_pattern_is_an_input_error() -> io::Result<()> {
    let root = temp_dir("badglob");
    fs::create_dir_all(&root)?;

    let options = ScanOptions {
        exclude: vec!["a[".to_string()],
        ..ScanOptions::default()
    };
    let mut stats = ScanStats::default();
    let err = collect_source_files(std::slice::from_ref(&root), &options, &mut stats).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    Ok(())
}

#[test]
fn default_ignore_dirs_are_skipped() -> io::Result<()> {
    let root = temp_dir("ignoredirs");
    fs::create_dir_all(root.join("build"))?;
    fs::create_dir_all(root.join("src"))?;
    fs::write(root.join("build/copy.cpp"), "int x;")?;
    fs::write(root.join("src/main.cpp"), "int x;")?;

    let names = collect(&root, &ScanOptions::default())?;
    assert_eq!(names, ["src/main.cpp"]);
    Ok(())
}

#[test]
fn gitignore_rules_are_respected_by_default() -> io::Result<()> {
    let root = temp_dir("gitignore");
    fs::create_dir_all(&root)?;
    fs::write(root.join(".gitignore"), "skipped.cpp\n")?;
    fs::write(root.join("kept.cpp"), "int x;")?;
    fs::write(root.join("skipped.cpp"), "int x;")?;

    let names = collect(&root, &ScanOptions::default())?;
    assert_eq!(names, ["kept.cpp"]);

    let options = ScanOptions {
        respect_gitignore: false,
        ..ScanOptions::default()
    };
    let names = collect(&root, &options)?;
    assert_eq!(names, ["kept.cpp", "skipped.cpp"]);
    Ok(())
}

#[test]
fn file_roots_are_accepted_and_deduplicated() -> io::Result<()> {
    let root = temp_dir("fileroot");
    fs::create_dir_all(&root)?;
    let file = root.join("one.cpp");
    fs::write(&file, "int x;")?;

    let mut stats = ScanStats::default();
    let files = collect_source_files(
        &[file.clone(), file.clone(), root.clone()],
        &ScanOptions::default(),
        &mut stats,
    )?;
    assert_eq!(files, vec![file]);
    Ok(())
}

#[test]
fn nonexistent_root_is_fatal() {
    let root = temp_dir("missing");
    let err = validate_roots(std::slice::from_ref(&root)).unwrap_err();
    assert!(err.to_string().contains("root"));
}

#[test]
fn oversized_and_binary_files_are_reported_as_such() -> io::Result<()> {
    let root = temp_dir("reads");
    fs::create_dir_all(&root)?;
    let big = root.join("big.cpp");
    let binary = root.join("bin.cpp");
    fs::write(&big, "int x; // padding padding padding")?;
    fs::write(&binary, b"int x;\0")?;

    assert!(matches!(
        read_source_file(&big, Some(4)),
        FileRead::TooLarge(_)
    ));
    assert!(matches!(read_source_file(&binary, None), FileRead::Binary));
    assert!(matches!(
        read_source_file(&root.join("absent.cpp"), None),
        FileRead::Unreadable(_)
    ));
    assert!(matches!(
        read_source_file(&big, None),
        FileRead::Contents(_)
    ));
    Ok(())
}

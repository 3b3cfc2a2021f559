use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod walker;

#[cfg(test)]
mod tests;

pub(crate) use walker::collect_source_files;

/// Extensions treated as C-family sources and headers (lowercase).
pub(crate) const SOURCE_EXTENSIONS: &[&str] = &[
    "h", "hh", "hpp", "hxx", "ipp", "c", "cc", "cpp", "cxx", "cu", "cuh",
];

pub(crate) fn validate_roots(roots: &[PathBuf]) -> io::Result<()> {
    for root in roots {
        let meta = fs::metadata(root)
            .map_err(|err| io::Error::new(err.kind(), format!("root {}: {err}", root.display())))?;
        if !meta.is_dir() && !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("root {} is not a file or directory", root.display()),
            ));
        }
    }
    Ok(())
}

pub(crate) fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SOURCE_EXTENSIONS.contains(&ext.as_str())
        })
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Debug)]
pub(crate) enum FileRead {
    Contents(Vec<u8>),
    TooLarge(u64),
    Binary,
    Unreadable(String),
}

pub(crate) fn read_source_file(path: &Path, max_file_size: Option<u64>) -> FileRead {
    let metadata = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => return FileRead::Unreadable(err.to_string()),
    };
    if let Some(max_file_size) = max_file_size
        && metadata.len() > max_file_size
    {
        return FileRead::TooLarge(metadata.len());
    }
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return FileRead::Unreadable(err.to_string()),
    };
    if bytes.contains(&0) {
        return FileRead::Binary;
    }
    FileRead::Contents(bytes)
}

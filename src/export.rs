//! Writing exported statistics to disk
//!
//! Output is written to a hidden sibling file and renamed over the
//! destination only once fully flushed, so a failed export never leaves a
//! truncated file behind and never clobbers the result of an earlier one.
//! A destination that exists but is not writable is refused up front.

use std::fs::{self, OpenOptions, Permissions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;

use crate::error::{ProfilerError, Result};

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values for spreadsheets
    Csv,
    /// JSON array for visualization tools
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Permissions the written file should end up with
///
/// An existing destination must be writable and keeps its own mode.
/// It is opened without truncation, so nothing changes on failure.
fn destination_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => {
            if meta.permissions().readonly() {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "destination is read-only",
                ));
            }
            OpenOptions::new().write(true).open(path)?;
            Ok(Some(meta.permissions()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// Replace `path` with `contents`, or leave it untouched on failure
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let export_err = |source| ProfilerError::Export {
        path: path.to_path_buf(),
        source,
    };

    let permissions = destination_permissions(path).map_err(export_err)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    // Dropping the staged file on any error path removes it
    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(export_err)?;

    let written = {
        let mut w = BufWriter::new(staged.as_file_mut());
        w.write_all(contents.as_bytes()).and_then(|()| w.flush())
    };
    written
        .and_then(|()| staged.as_file().sync_all())
        .and_then(|()| match permissions {
            Some(perms) => staged.as_file().set_permissions(perms),
            None => Ok(()),
        })
        .map_err(export_err)?;

    staged.persist(path).map_err(|e| export_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        write_atomically(&path, "first").unwrap();
        write_atomically(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(entries(dir.path()), vec!["stats.json".to_string()]);
    }

    #[test]
    fn test_read_only_destination_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        write_atomically(&path, "first").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let err = write_atomically(&path, "second").unwrap_err();

        assert!(matches!(err, ProfilerError::Export { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
        assert_eq!(entries(dir.path()), vec!["stats.csv".to_string()]);
    }

    #[test]
    fn test_directory_destination_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        fs::create_dir(&path).unwrap();

        let err = write_atomically(&path, "x").unwrap_err();
        assert!(matches!(err, ProfilerError::Export { .. }));
        assert!(path.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_mode_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        write_atomically(&path, "first").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);

        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();
        write_atomically(&path, "second").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
    }

    #[test]
    fn test_concurrent_writers_to_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");

        std::thread::scope(|s| {
            for t in 0..8 {
                let path = &path;
                s.spawn(move || {
                    for i in 0..20 {
                        write_atomically(path, &format!("writer {t} pass {i}\n")).unwrap();
                    }
                });
            }
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("writer ") && contents.ends_with(" pass 19\n"));
        assert_eq!(entries(dir.path()), vec!["stats.csv".to_string()]);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let err = write_atomically(Path::new("/nonexistent/dir/stats.csv"), "x").unwrap_err();
        assert!(matches!(err, ProfilerError::Export { .. }));
    }
}

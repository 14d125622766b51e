// BizDirectory - platform/fs.rs
//
// Filesystem helpers shared by the file store, session persistence, and
// export: atomic writes, size-capped document reads, and revealing an
// exported file in the system file manager.

use crate::util::error::StoreError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling temp path used while a file is being replaced.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` atomically (write temp, then rename).
///
/// Creates parent directories as needed. A crash between write and rename
/// leaves the previous file intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path_for(path);
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp, path).inspect_err(|_| {
        // Ignore any secondary error while cleaning up.
        let _ = std::fs::remove_file(&tmp);
    })
}

/// Read one stored document, refusing files above `max_size` bytes.
///
/// Invalid UTF-8 is replaced rather than rejected; the JSON parser reports
/// anything that is still unusable.
pub fn read_document(path: &Path, max_size: u64) -> Result<String, StoreError> {
    let io_err = |e: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_size {
        return Err(StoreError::DocumentTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Open the system file manager and highlight `path` within it.
///
/// Platform behaviour:
/// - **Windows**: `explorer.exe /select,"<path>"`
/// - **macOS**: `open -R "<path>"`
/// - **Linux**: `xdg-open "<parent>"` (no standard per-file selection API)
///
/// The subprocess is spawned detached; any launch failure is logged at WARN
/// level but never propagated.
pub fn reveal_in_file_manager(path: &Path) {
    #[cfg(target_os = "windows")]
    {
        // `/select,<path>` must be a single argument, no space after the comma.
        let arg = format!("/select,{}", path.display());
        if let Err(e) = std::process::Command::new("explorer").arg(arg).spawn() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to reveal file in Explorer");
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = std::process::Command::new("open").arg("-R").arg(path).spawn() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to reveal file in Finder");
        }
    }
    #[cfg(target_os = "linux")]
    {
        let parent = path.parent().unwrap_or(path);
        if let Err(e) = std::process::Command::new("xdg-open").arg(parent).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to open parent directory in file manager"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_atomic_write_overwrites_stale_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(temp_path_for(&path), b"garbage").unwrap();
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_read_document_size_cap() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.json");
        std::fs::write(&path, vec![b' '; 64]).unwrap();
        assert!(matches!(
            read_document(&path, 16),
            Err(StoreError::DocumentTooLarge { size: 64, max_size: 16, .. })
        ));
        assert_eq!(read_document(&path, 64).unwrap().len(), 64);
    }

    #[test]
    fn test_read_document_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_document(&dir.path().join("gone.json"), 16),
            Err(StoreError::Io { .. })
        ));
    }
}

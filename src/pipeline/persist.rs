//! Atomic file writes: temp file in the target directory, then rename.
//!
//! A crash mid-write leaves a stray temp file, never a truncated asset that
//! a later run would mistake for a cache hit.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `bytes` to `path` atomically, replacing any existing file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Blocking-pool wrapper around [`write_atomic`] for async callers.
pub async fn write_atomic_async(path: &Path, bytes: Vec<u8>) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| io::Error::other(format!("write task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // Only the target remains; the temp file was renamed away.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");
        assert!(write_atomic(&path, b"x").is_err());
    }

    #[tokio::test]
    async fn async_wrapper_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("async.bin");
        write_atomic_async(&path, vec![1, 2, 3]).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}

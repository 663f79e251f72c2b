use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::BlobStore;

/// Blob store backed by a directory: each key lives in `<dir>/<key>.json`.
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = self.dir.join(format!(".{}.json.tmp", key));

        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        file.write_all(blob.as_bytes())
            .and_then(|_| file.sync_all())
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        drop(file);

        rename_with_fallback(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))
    }
}

/// Rename `temp_path` over `destination`, removing the destination and
/// retrying on platforms where rename refuses to overwrite.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();
        assert_eq!(store.read("billRecords").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let mut store = FileBlobStore::open(dir.path().join("nested")).unwrap();

        store.write("billRecords", "[]").unwrap();
        store.write("billRecords", "[{}]").unwrap();

        assert_eq!(store.read("billRecords").unwrap().as_deref(), Some("[{}]"));
        assert!(store.path_for("billRecords").exists());
        assert!(!dir.path().join("nested/.billRecords.json.tmp").exists());
    }
}

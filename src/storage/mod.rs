mod file;
mod memory;

pub use file::*;
pub use memory::*;

use anyhow::Result;

/// Key under which the bill sequence is persisted.
pub const BILLS_KEY: &str = "billRecords";

/// Key-value persistence for serialized blobs. The ledger stores its whole
/// state as one blob under a fixed key and rewrites it on every change.
pub trait BlobStore {
    /// Read the blob stored under `key`, or `None` if nothing was written yet.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, blob: &str) -> Result<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        (**self).write(key, blob)
    }
}

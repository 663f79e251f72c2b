// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use splitbook::application::LedgerStore;
use splitbook::domain::{User, find_user};
use splitbook::storage::{FileBlobStore, MemoryBlobStore};
use tempfile::TempDir;

/// Helper to create a store over an in-memory blob store. The returned
/// handle shares slots with the store so tests can inspect what was written.
pub fn memory_store() -> Result<(LedgerStore<MemoryBlobStore>, MemoryBlobStore)> {
    let blobs = MemoryBlobStore::new();
    let store = LedgerStore::open(blobs.clone())?;
    Ok((store, blobs))
}

/// Helper to create a file-backed store in a temporary directory
pub fn file_store() -> Result<(LedgerStore<FileBlobStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let blobs = FileBlobStore::open(temp_dir.path())?;
    Ok((LedgerStore::open(blobs)?, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc> at midnight
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn day(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn zohaib() -> User {
    find_user(1).unwrap()
}

pub fn babar() -> User {
    find_user(2).unwrap()
}

pub fn mustafa() -> User {
    find_user(3).unwrap()
}

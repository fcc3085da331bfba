//! Archive corpus access
//!
//! The corpus is a large, read-only set of archive entries. Resolution only
//! needs three operations from it, captured by [`ArchiveIndex`]:
//! - look an entry up by virtual path or bare file name
//! - enumerate every entry in a stable order
//! - extract an entry's bytes
//!
//! Two implementations ship with the crate: [`MemoryArchive`] for embedding
//! callers and tests, and [`DirectoryArchive`] for a folder of loose files
//! exported from the game archives.

mod directory;
mod entry;
mod memory;

pub use directory::DirectoryArchive;
pub use entry::{ArchiveEntry, AssetKind};
pub use memory::MemoryArchive;

use std::collections::HashMap;

use crate::error::Result;

/// Read-only lookup, enumeration and extraction over an archive corpus.
///
/// Implementations must be safe to query from several threads; corpus-wide
/// scans parse entries in parallel.
pub trait ArchiveIndex: Send + Sync {
    /// Find an entry by full virtual path or by bare file name (case-insensitive)
    fn lookup(&self, path: &str) -> Option<&ArchiveEntry>;

    /// All entries in corpus order
    fn entries(&self) -> &[ArchiveEntry];

    /// Read an entry's bytes
    fn extract(&self, entry: &ArchiveEntry) -> Result<Vec<u8>>;

    /// All entries of one kind, in corpus order
    fn entries_of_kind(&self, kind: AssetKind) -> Vec<&ArchiveEntry> {
        self.entries().iter().filter(|e| e.kind() == kind).collect()
    }
}

/// Entry storage with path and file-name lookup tables
#[derive(Debug, Default)]
pub(crate) struct EntryTable {
    entries: Vec<ArchiveEntry>,
    /// Lower-cased virtual path -> index
    by_path: HashMap<String, usize>,
    /// Lower-cased file name -> index of the first entry with that name
    by_name: HashMap<String, usize>,
}

impl EntryTable {
    /// Add an entry, or replace the one with the same path.
    ///
    /// Returns the entry's index.
    pub(crate) fn insert(&mut self, entry: ArchiveEntry) -> usize {
        let key = entry.key();
        if let Some(&idx) = self.by_path.get(&key) {
            self.entries[idx] = entry;
            return idx;
        }

        let idx = self.entries.len();
        self.by_name
            .entry(entry.name().to_ascii_lowercase())
            .or_insert(idx);
        self.by_path.insert(key, idx);
        self.entries.push(entry);
        idx
    }

    pub(crate) fn position(&self, path: &str) -> Option<usize> {
        let key = path.replace('\\', "/").to_ascii_lowercase();
        self.by_path
            .get(&key)
            .or_else(|| self.by_name.get(&key))
            .copied()
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&ArchiveEntry> {
        self.entries.get(idx)
    }

    pub(crate) fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Owning archive of a virtual path: everything up to and including the last
/// `*.rpf` component, or `fallback` when the path is not inside one.
pub(crate) fn owning_archive(virtual_path: &str, fallback: &str) -> String {
    let components: Vec<&str> = virtual_path.split('/').collect();
    let dirs = &components[..components.len().saturating_sub(1)];
    match dirs
        .iter()
        .rposition(|c| c.to_ascii_lowercase().ends_with(".rpf"))
    {
        Some(idx) => dirs[..=idx].join("/"),
        None => fallback.to_string(),
    }
}

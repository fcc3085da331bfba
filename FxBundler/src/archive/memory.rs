//! In-memory archive corpus

use super::{ArchiveEntry, ArchiveIndex, EntryTable, owning_archive};
use crate::error::{Error, Result};

/// Archive used when an entry is not inside any `*.rpf` path component
const DEFAULT_ARCHIVE: &str = "memory";

/// An archive corpus held entirely in memory.
///
/// Entries keep their insertion order, which is the corpus order every scan
/// observes.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    table: EntryTable,
    data: Vec<Vec<u8>>,
}

impl MemoryArchive {
    /// Create an empty corpus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing the bytes of an existing entry with the same path
    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) -> &ArchiveEntry {
        let data = data.into();
        let path = path.replace('\\', "/");
        let archive = owning_archive(&path, DEFAULT_ARCHIVE);
        let entry = ArchiveEntry::new(path, archive, data.len() as u64);

        let idx = self.table.insert(entry);
        if idx == self.data.len() {
            self.data.push(data);
        } else {
            self.data[idx] = data;
        }
        &self.table.entries()[idx]
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Number of entries in the corpus
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the corpus has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

impl ArchiveIndex for MemoryArchive {
    fn lookup(&self, path: &str) -> Option<&ArchiveEntry> {
        self.table.position(path).and_then(|idx| self.table.get(idx))
    }

    fn entries(&self) -> &[ArchiveEntry] {
        self.table.entries()
    }

    fn extract(&self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        self.table
            .position(entry.path())
            .and_then(|idx| self.data.get(idx))
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(entry.path().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::AssetKind;

    #[test]
    fn test_insert_and_extract() {
        let archive = MemoryArchive::new()
            .with_file("x64a.rpf/props/lectern.ydr", b"model".to_vec())
            .with_file("x64a.rpf/props/lectern.ytd", b"textures".to_vec());

        assert_eq!(archive.len(), 2);
        let entry = archive.lookup("lectern.ydr").unwrap();
        assert_eq!(entry.archive(), "x64a.rpf");
        assert_eq!(entry.length(), 5);
        assert_eq!(archive.extract(entry).unwrap(), b"model");
        assert_eq!(archive.entries_of_kind(AssetKind::TextureDictionary).len(), 1);
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut archive = MemoryArchive::new();
        archive.insert("a.ydr", b"one".to_vec());
        archive.insert("b.ydr", b"two".to_vec());
        archive.insert("A.YDR", b"three".to_vec());

        let names: Vec<&str> = archive.entries().iter().map(ArchiveEntry::name).collect();
        assert_eq!(names, vec!["A.YDR", "b.ydr"]);
        let entry = archive.lookup("a.ydr").unwrap().clone();
        assert_eq!(archive.extract(&entry).unwrap(), b"three");
    }

    #[test]
    fn test_extract_unknown_entry() {
        let archive = MemoryArchive::new();
        let stray = ArchiveEntry::new("nowhere.ydr", DEFAULT_ARCHIVE, 0);
        assert!(matches!(archive.extract(&stray), Err(Error::EntryNotFound(_))));
    }
}

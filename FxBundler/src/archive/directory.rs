//! Loose-file archive corpus backed by a directory tree

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ArchiveEntry, ArchiveIndex, EntryTable, owning_archive};
use crate::error::{Error, Result};
use crate::utils::relative_path;

/// An archive corpus exported to disk as a directory tree.
///
/// Virtual paths are relative to the root with forward slashes. Directories
/// named `*.rpf` mark archive boundaries, mirroring how archive explorers
/// export nested archives; files outside any of them belong to the root.
#[derive(Debug)]
pub struct DirectoryArchive {
    root: PathBuf,
    table: EntryTable,
}

impl DirectoryArchive {
    /// Index every file below `root`.
    ///
    /// Files are enumerated sorted by name so corpus order is stable across runs.
    ///
    /// # Errors
    /// Returns an error if `root` is not a directory or cannot be walked.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::InvalidPath(format!(
                "corpus root is not a directory: {}",
                root.display()
            )));
        }

        let start = std::time::Instant::now();
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        let mut table = EntryTable::default();
        for dir_entry in WalkDir::new(&root).sort_by_file_name() {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type().is_file() {
                continue;
            }

            let Some(virtual_path) = relative_path(dir_entry.path(), root.as_path()) else {
                continue;
            };
            let length = dir_entry.metadata().map(|m| m.len()).unwrap_or(0);
            let archive = owning_archive(&virtual_path, &root_name);
            table.insert(ArchiveEntry::new(virtual_path, archive, length));
        }

        tracing::info!(
            "Indexed {} files under {} in {:.2}s",
            table.len(),
            root.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(Self { root, table })
    }

    /// Root directory of the corpus
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArchiveIndex for DirectoryArchive {
    fn lookup(&self, path: &str) -> Option<&ArchiveEntry> {
        self.table.position(path).and_then(|idx| self.table.get(idx))
    }

    fn entries(&self) -> &[ArchiveEntry] {
        self.table.entries()
    }

    fn extract(&self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let disk_path = self.root.join(entry.path());
        std::fs::read(&disk_path).map_err(|e| Error::Extraction {
            path: entry.path().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_indexes_nested_archives() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("x64a.rpf").join("props");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("lectern.ydr"), b"model").unwrap();
        fs::write(temp.path().join("loose.ytd"), b"tex").unwrap();

        let archive = DirectoryArchive::open(temp.path()).unwrap();
        assert_eq!(archive.entries().len(), 2);

        let model = archive.lookup("x64a.rpf/props/lectern.ydr").unwrap();
        assert_eq!(model.archive(), "x64a.rpf");
        assert_eq!(model.length(), 5);
        assert_eq!(archive.extract(model).unwrap(), b"model");

        let loose = archive.lookup("LOOSE.ytd").unwrap();
        assert_ne!(loose.archive(), "x64a.rpf");
    }

    #[test]
    fn test_open_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = DirectoryArchive::open(temp.path().join("missing"));
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }
}

//! Package assembly: writes the resolved set, the manifest and the loader
//! script into the package directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::{LOADER_SCRIPT, MANIFEST_FILE, Manifest};
use super::types::{BundlePhase, BundleProgress, BundleProgressCallback, PackageOptions};
use crate::archive::{ArchiveEntry, ArchiveIndex};
use crate::error::{Error, Result};
use crate::resolver::{ResolveStep, ResolvedSet, Warning};
use crate::tables::ResolverTables;

/// What a package write did
#[derive(Debug, Clone, Default)]
pub struct PackageReport {
    /// `<output_dir>/<name>`
    pub package_root: PathBuf,
    /// Path of the written manifest
    pub manifest_path: PathBuf,
    /// Path of the written loader script, if one was needed
    pub loader_script: Option<PathBuf>,
    /// Asset files written by this run
    pub written: Vec<PathBuf>,
    /// Asset files left alone because they already existed
    pub skipped_existing: Vec<PathBuf>,
    /// Entries not written because an earlier entry claimed the same file name
    pub skipped_duplicates: Vec<String>,
    /// Per-entry write failures
    pub warnings: Vec<Warning>,
}

/// Write a resolved set as a package.
///
/// Entries are written in resolved-set order under their bare file name. The
/// first entry to claim a file name wins, and a file already on disk is
/// never overwritten. The manifest and loader script are regenerated on
/// every run.
///
/// # Errors
/// Returns [`Error::PackageSetup`] if the package directories cannot be
/// created or the manifest cannot be written. Failures writing a single asset
/// are recorded as warnings instead.
pub fn assemble(
    index: &dyn ArchiveIndex,
    resolved: &ResolvedSet,
    options: &PackageOptions,
    tables: &ResolverTables,
    progress: BundleProgressCallback,
) -> Result<PackageReport> {
    let package_root = options.package_root();
    let asset_root = options.asset_root();
    create_dir(&asset_root)?;

    let mut report = PackageReport {
        package_root: package_root.clone(),
        ..Default::default()
    };

    let total = resolved.len();
    let mut claimed: HashSet<String> = HashSet::with_capacity(total);

    for (i, entry) in resolved.entries().enumerate() {
        progress(&BundleProgress::with_file(BundlePhase::Writing, i + 1, total, entry.name()));

        if !claimed.insert(entry.name().to_ascii_lowercase()) {
            tracing::debug!("{} shares its file name with an earlier entry", entry.path());
            report.skipped_duplicates.push(entry.path().to_string());
            continue;
        }

        let dest = asset_root.join(entry.name());
        if dest.exists() {
            tracing::debug!("Keeping existing {}", dest.display());
            report.skipped_existing.push(dest);
            continue;
        }

        match write_entry(index, entry, &dest) {
            Ok(()) => report.written.push(dest),
            Err(e) => {
                let warning = Warning::new(entry.path(), ResolveStep::Write, e.to_string());
                tracing::warn!("{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    progress(&BundleProgress::with_file(BundlePhase::WritingManifest, 1, 1, MANIFEST_FILE));
    let manifest = Manifest::for_resolved(options, tables, resolved);
    report.manifest_path = package_root.join(MANIFEST_FILE);
    write_file(&report.manifest_path, manifest.render().as_bytes())?;

    if let Some(script) = &manifest.loader_script {
        let path = package_root.join(script);
        write_file(&path, LOADER_SCRIPT.as_bytes())?;
        report.loader_script = Some(path);
    }

    tracing::info!(
        "Packaged {}: {} written, {} already present, {} warnings",
        package_root.display(),
        report.written.len(),
        report.skipped_existing.len(),
        report.warnings.len()
    );
    Ok(report)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::PackageSetup {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|source| Error::PackageSetup {
        path: path.to_path_buf(),
        source,
    })
}

fn write_entry(index: &dyn ArchiveIndex, entry: &ArchiveEntry, dest: &Path) -> Result<()> {
    let name = entry.name();
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidPath(entry.path().to_string()));
    }
    let data = index.extract(entry)?;
    fs::write(dest, data)?;
    Ok(())
}

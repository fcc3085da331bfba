//! Bundle runs: validate, resolve every root, write the package

use std::time::Instant;

use crate::archive::{ArchiveEntry, ArchiveIndex};
use crate::error::{Error, Result};
use crate::package::{
    BundlePhase, BundleProgress, BundleProgressCallback, PackageOptions, PackageReport, assemble,
};
use crate::resolver::{BundleContext, RootReport, Warning, resolve_root};
use crate::resource::ResourceAdapter;
use crate::tables::ResolverTables;

/// Outcome of a bundle run
#[derive(Debug, Clone)]
pub struct BundleReport {
    /// One report per root, in selection order
    pub roots: Vec<RootReport>,
    /// The resolved closure, in resolution order
    pub resolved: Vec<ArchiveEntry>,
    /// What was written
    pub package: PackageReport,
    /// Every non-fatal problem: resolution warnings first, then write warnings
    pub warnings: Vec<Warning>,
}

impl BundleReport {
    /// Whether the run finished without any warning
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Look up root selections by virtual path or bare file name
///
/// # Errors
/// Returns [`Error::Validation`] for an empty selection and
/// [`Error::EntryNotFound`] for a path the corpus does not contain.
pub fn select_roots<S: AsRef<str>>(index: &dyn ArchiveIndex, paths: &[S]) -> Result<Vec<ArchiveEntry>> {
    if paths.is_empty() {
        return Err(Error::validation("selection", "no root entries selected"));
    }
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            index
                .lookup(path)
                .cloned()
                .ok_or_else(|| Error::EntryNotFound(path.to_string()))
        })
        .collect()
}

/// Bundle `roots` and their dependencies into a package
///
/// # Errors
/// Returns an error if the request is invalid or the package directory
/// cannot be set up. Per-asset problems are returned as warnings.
pub fn bundle(
    index: &dyn ArchiveIndex,
    adapter: &dyn ResourceAdapter,
    roots: &[ArchiveEntry],
    options: &PackageOptions,
    tables: &ResolverTables,
) -> Result<BundleReport> {
    bundle_with_progress(index, adapter, roots, options, tables, &|_| {})
}

/// Bundle with progress callback
///
/// # Errors
/// Returns an error if the request is invalid or the package directory
/// cannot be set up. Per-asset problems are returned as warnings.
pub fn bundle_with_progress(
    index: &dyn ArchiveIndex,
    adapter: &dyn ResourceAdapter,
    roots: &[ArchiveEntry],
    options: &PackageOptions,
    tables: &ResolverTables,
    progress: BundleProgressCallback,
) -> Result<BundleReport> {
    options.validate()?;
    if roots.is_empty() {
        return Err(Error::validation("selection", "no root entries selected"));
    }

    let start = Instant::now();
    let total = roots.len();
    let mut ctx = BundleContext::new(index, adapter, tables);
    let mut root_reports = Vec::with_capacity(total);

    for (i, root) in roots.iter().enumerate() {
        progress(&BundleProgress::with_file(BundlePhase::Resolving, i + 1, total, root.name()));
        root_reports.push(resolve_root(&mut ctx, root));
    }

    let (resolved, mut warnings) = ctx.finish();
    let package = assemble(index, &resolved, options, tables, progress)?;
    warnings.extend(package.warnings.iter().cloned());

    progress(&BundleProgress::new(BundlePhase::Complete, total, total));
    tracing::info!(
        "Bundled {} roots into {} entries ({} warnings) in {:.2?}",
        total,
        resolved.len(),
        warnings.len(),
        start.elapsed()
    );

    Ok(BundleReport {
        roots: root_reports,
        resolved: resolved.entries().cloned().collect(),
        package,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::resource::JsonResourceAdapter;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[test]
    fn test_validation_happens_before_io() {
        let temp = TempDir::new().unwrap();
        let index = MemoryArchive::new().with_file("a.rpf/lectern.ydr", "{}");
        let roots = select_roots(&index, &["lectern.ydr"]).unwrap();
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();

        let err = bundle(&index, &adapter, &roots, &PackageOptions::new(" ", temp.path()), &tables)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));

        let err = bundle(&index, &adapter, &[], &PackageOptions::new("church", temp.path()), &tables)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "selection", .. }));

        assert!(!temp.path().join("church").exists());
    }

    #[test]
    fn test_select_roots() {
        let index = MemoryArchive::new().with_file("a.rpf/lectern.ydr", "{}");

        let roots = select_roots(&index, &["A.RPF/Lectern.ydr"]).unwrap();
        assert_eq!(roots[0].path(), "a.rpf/lectern.ydr");

        assert!(matches!(
            select_roots(&index, &["missing.ydr"]),
            Err(Error::EntryNotFound(_))
        ));
        assert!(matches!(
            select_roots::<&str>(&index, &[]),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_progress_phases_in_order() {
        let temp = TempDir::new().unwrap();
        let index = MemoryArchive::new().with_file("a.rpf/notes.txt", "hello");
        let roots = select_roots(&index, &["notes.txt"]).unwrap();
        let phases = Mutex::new(Vec::new());

        bundle_with_progress(
            &index,
            &JsonResourceAdapter::new(),
            &roots,
            &PackageOptions::new("church", temp.path()),
            &ResolverTables::default(),
            &|p| phases.lock().unwrap().push(p.phase),
        )
        .unwrap();

        let mut phases = phases.into_inner().unwrap();
        phases.dedup();
        assert_eq!(
            phases,
            vec![
                BundlePhase::Resolving,
                BundlePhase::Writing,
                BundlePhase::WritingManifest,
                BundlePhase::Complete,
            ]
        );
    }
}

//! Dependency resolution
//!
//! Computes the closure of entries one root needs to work standalone. Exact
//! cross-references (textures a model names by hash) are resolved before any
//! naming heuristic, so a noisy fuzzy match can never shadow a real one.
//!
//! Strategy by root kind:
//! - **Drawable**: textures, name candidates, fuzzy dictionary scan, shared
//!   dictionaries, collision, LOD drawables, type definitions, placement maps
//! - **Fragment**: textures, name candidates, fuzzy dictionary scan, shared
//!   dictionaries
//! - **Anything else**: copied verbatim
//!
//! Every step reports a [`StepOutcome`]; failures become [`Warning`]s on the
//! run and never stop the remaining roots.

mod context;
mod steps;

pub use context::{BundleContext, ResolvedSet};

use std::fmt;

use serde::Serialize;

use crate::archive::{ArchiveEntry, AssetKind};

/// A step of a bundle run a warning can be tied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStep {
    /// Reading and parsing the root itself
    Root,
    /// Textures referenced by hash, located through the texture locator
    Textures,
    /// Dictionaries named after the root or its textures
    NameCandidates,
    /// Corpus-wide scan for dictionaries with related texture names
    FuzzyDictionaries,
    /// Well-known shared dictionaries
    SharedDictionaries,
    /// Collision mesh
    Collision,
    /// LOD drawables stored beside the root
    LodModels,
    /// Type definitions declaring the root's archetype
    TypeDefinition,
    /// Placement maps referencing the root's archetype
    PlacementMaps,
    /// Writing a resolved entry into the package
    Write,
}

impl ResolveStep {
    /// Get a human-readable description of this step
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Textures => "texture references",
            Self::NameCandidates => "name candidates",
            Self::FuzzyDictionaries => "fuzzy dictionary scan",
            Self::SharedDictionaries => "shared dictionaries",
            Self::Collision => "collision",
            Self::LodModels => "LOD models",
            Self::TypeDefinition => "type definition",
            Self::PlacementMaps => "placement maps",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for ResolveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one discovery step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and added this many new entries (possibly zero)
    Added(usize),
    /// The step does not apply to this root
    Skipped,
    /// The step failed; the root's remaining steps still run
    Failed(String),
}

/// A non-fatal problem tied to one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Virtual path of the entry the problem concerns
    pub entry: String,
    /// Step that was running
    pub step: ResolveStep,
    /// What went wrong
    pub reason: String,
}

impl Warning {
    /// Create a warning
    #[must_use]
    pub fn new(entry: &str, step: ResolveStep, reason: impl Into<String>) -> Self {
        Self {
            entry: entry.to_string(),
            step,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.entry, self.step, self.reason)
    }
}

/// Summary of one root's resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootReport {
    /// Virtual path of the root
    pub root: String,
    /// Kind of the root
    pub kind: AssetKind,
    /// Entries this root added to the closure, itself included
    pub added: usize,
    /// Whether every step completed without a warning
    pub complete: bool,
}

/// Resolve one root into the context's closure.
///
/// Never fails: problems are recorded as warnings on the context.
pub fn resolve_root(ctx: &mut BundleContext<'_>, root: &ArchiveEntry) -> RootReport {
    let warnings_before = ctx.warnings.len();
    let kind = root.kind();
    let mut report = RootReport {
        root: root.path().to_string(),
        kind,
        added: usize::from(ctx.add(root)),
        complete: true,
    };

    if kind.is_model() {
        steps::resolve_model(ctx, root, &mut report);
    } else {
        tracing::debug!("Copying {} verbatim", root.path());
    }

    report.complete = ctx.warnings.len() == warnings_before;
    tracing::info!(
        "Resolved {} ({}): {} new entries",
        root.name(),
        kind.display_name(),
        report.added
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveIndex, MemoryArchive};
    use crate::resource::JsonResourceAdapter;
    use crate::tables::ResolverTables;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_non_model_root_is_copied_verbatim() {
        let index = MemoryArchive::new()
            .with_file("a.rpf/lectern.ymap", "not parsed")
            .with_file("a.rpf/lectern.ytd", r#"{"textures":[]}"#);
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();
        let mut ctx = BundleContext::new(&index, &adapter, &tables);

        let root = index.lookup("lectern.ymap").unwrap().clone();
        let report = resolve_root(&mut ctx, &root);

        assert_eq!(report.added, 1);
        assert!(report.complete);
        assert_eq!(ctx.resolved().len(), 1);
    }

    #[test]
    fn test_unparseable_root_is_kept_with_one_warning() {
        let index = MemoryArchive::new().with_file("a.rpf/broken.ydr", "\x00garbage");
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();
        let mut ctx = BundleContext::new(&index, &adapter, &tables);

        let root = index.lookup("broken.ydr").unwrap().clone();
        let report = resolve_root(&mut ctx, &root);

        assert!(!report.complete);
        assert!(ctx.resolved().contains(&root));
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].step, ResolveStep::Root);
        assert_eq!(ctx.warnings()[0].entry, "a.rpf/broken.ydr");
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::new("a.rpf/x.ydr", ResolveStep::Collision, "boom");
        assert_eq!(warning.to_string(), "a.rpf/x.ydr (collision): boom");
    }
}

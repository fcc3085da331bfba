//! Per-run resolution state

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use rayon::prelude::*;

use super::{ResolveStep, Warning};
use crate::archive::{ArchiveEntry, ArchiveIndex, AssetKind};
use crate::error::Result;
use crate::locator::TextureLocator;
use crate::resource::{ResourceAdapter, ResourceDescriptor};
use crate::tables::ResolverTables;

/// The accumulated dependency closure of one run
#[derive(Debug, Default, Clone)]
pub struct ResolvedSet {
    /// Lower-cased virtual path -> entry, in insertion order
    entries: IndexMap<String, ArchiveEntry>,
    /// Texture hashes already handled
    textures: HashSet<u32>,
    /// Candidate names already probed
    explored: HashSet<String>,
}

impl ResolvedSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Returns `false` if it was already present.
    pub fn insert(&mut self, entry: &ArchiveEntry) -> bool {
        let key = entry.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry.clone());
        true
    }

    /// Whether an entry is already selected
    #[must_use]
    pub fn contains(&self, entry: &ArchiveEntry) -> bool {
        self.entries.contains_key(&entry.key())
    }

    /// Mark a texture hash as handled. Returns `false` if it already was.
    pub fn mark_texture(&mut self, hash: u32) -> bool {
        self.textures.insert(hash)
    }

    /// Whether a texture hash has been handled
    #[must_use]
    pub fn has_texture(&self, hash: u32) -> bool {
        self.textures.contains(&hash)
    }

    /// Mark a candidate name as explored. Returns `false` if it already was.
    pub fn explore(&mut self, name: &str) -> bool {
        if self.explored.contains(name) {
            return false;
        }
        self.explored.insert(name.to_string())
    }

    /// Selected entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Whether any selected entry is of `kind`
    #[must_use]
    pub fn has_kind(&self, kind: AssetKind) -> bool {
        self.entries.values().any(|e| e.kind() == kind)
    }

    /// Number of selected entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of explored candidate names
    #[must_use]
    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }
}

/// Type definitions parsed from one corpus entry
#[derive(Debug)]
pub(crate) struct TypeDefinitions<'a> {
    pub entry: &'a ArchiveEntry,
    /// Lower-cased archetype names
    pub archetypes: Vec<String>,
}

/// Archetype hashes referenced by one placement map
#[derive(Debug)]
pub(crate) struct PlacementMap<'a> {
    pub entry: &'a ArchiveEntry,
    pub archetypes: HashSet<u32>,
}

/// Everything one bundle run shares between roots.
///
/// Created at run start and dropped at run end; nothing here outlives a run.
pub struct BundleContext<'a> {
    pub(crate) index: &'a dyn ArchiveIndex,
    pub(crate) adapter: &'a dyn ResourceAdapter,
    pub(crate) tables: &'a ResolverTables,
    pub(crate) resolved: ResolvedSet,
    pub(crate) locator: TextureLocator<'a>,
    pub(crate) warnings: Vec<Warning>,
    dictionaries_by_dir: Option<HashMap<String, Vec<&'a ArchiveEntry>>>,
    type_catalog: Option<Vec<TypeDefinitions<'a>>>,
    placement_catalog: Option<Vec<PlacementMap<'a>>>,
}

impl<'a> BundleContext<'a> {
    /// Create a fresh context for one run
    #[must_use]
    pub fn new(
        index: &'a dyn ArchiveIndex,
        adapter: &'a dyn ResourceAdapter,
        tables: &'a ResolverTables,
    ) -> Self {
        Self {
            index,
            adapter,
            tables,
            resolved: ResolvedSet::new(),
            locator: TextureLocator::new(index, adapter, &tables.shared_dictionaries),
            warnings: Vec::new(),
            dictionaries_by_dir: None,
            type_catalog: None,
            placement_catalog: None,
        }
    }

    /// The closure accumulated so far
    #[must_use]
    pub fn resolved(&self) -> &ResolvedSet {
        &self.resolved
    }

    /// Warnings recorded so far
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consume the context, keeping the resolved set and warnings
    #[must_use]
    pub fn finish(self) -> (ResolvedSet, Vec<Warning>) {
        (self.resolved, self.warnings)
    }

    pub(crate) fn warn(&mut self, entry: &str, step: ResolveStep, reason: impl Into<String>) {
        let warning = Warning::new(entry, step, reason);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Add an entry to the closure. Returns `true` if it was new.
    pub(crate) fn add(&mut self, entry: &ArchiveEntry) -> bool {
        let added = self.resolved.insert(entry);
        if added {
            tracing::debug!("Resolved {}", entry.path());
        }
        added
    }

    /// Look up `<name>.<extension>` in the corpus
    pub(crate) fn lookup_named(&self, name: &str, kind: AssetKind) -> Option<&'a ArchiveEntry> {
        self.index.lookup(&format!("{name}.{}", kind.extension()))
    }

    /// Extract and parse a model entry
    pub(crate) fn parse_model(&self, entry: &ArchiveEntry) -> Result<ResourceDescriptor> {
        let bytes = self.index.extract(entry)?;
        self.adapter.parse_model(entry.kind(), &bytes)
    }

    /// Texture dictionaries stored in a directory named `dir` (case-insensitive)
    pub(crate) fn dictionaries_in_dir(&mut self, dir: &str) -> Vec<&'a ArchiveEntry> {
        let index = self.index;
        let by_dir = self.dictionaries_by_dir.get_or_insert_with(|| {
            let mut map: HashMap<String, Vec<&'a ArchiveEntry>> = HashMap::new();
            for entry in index.entries_of_kind(AssetKind::TextureDictionary) {
                if let Some(parent) = entry.parent_dir() {
                    map.entry(parent).or_default().push(entry);
                }
            }
            map
        });
        by_dir
            .get(&dir.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Record corpus entries a scan could not parse as warnings of `step`
    fn report_scan_failures(&mut self, step: ResolveStep, failures: Vec<(String, String)>) {
        for (path, reason) in failures {
            self.warn(&path, step, reason);
        }
    }

    /// Turn dictionaries the locator could not parse into warnings of `step`.
    ///
    /// Each dictionary is reported once per run, by the first step that
    /// needed the catalog.
    pub(crate) fn report_dictionary_failures(&mut self, step: ResolveStep) {
        let failures = self.locator.take_failures();
        self.report_scan_failures(step, failures);
    }

    /// Every parseable type-definition entry, built on first use
    pub(crate) fn type_catalog(&mut self) -> &[TypeDefinitions<'a>] {
        if self.type_catalog.is_none() {
            let adapter = self.adapter;
            let (catalog, failures) = parse_all(self.index, AssetKind::TypeDefinitions, |entry, bytes| {
                let archetypes = adapter
                    .parse_type_definitions(bytes)?
                    .into_iter()
                    .map(|name| name.to_ascii_lowercase())
                    .collect();
                Ok(TypeDefinitions { entry, archetypes })
            });
            self.report_scan_failures(ResolveStep::TypeDefinition, failures);
            self.type_catalog = Some(catalog);
        }
        self.type_catalog.as_deref().unwrap_or_default()
    }

    /// Every parseable placement map, built on first use
    pub(crate) fn placement_catalog(&mut self) -> &[PlacementMap<'a>] {
        if self.placement_catalog.is_none() {
            let adapter = self.adapter;
            let (catalog, failures) = parse_all(self.index, AssetKind::PlacementMap, |entry, bytes| {
                let archetypes = adapter.parse_placement_map(bytes)?.into_iter().collect();
                Ok(PlacementMap { entry, archetypes })
            });
            self.report_scan_failures(ResolveStep::PlacementMaps, failures);
            self.placement_catalog = Some(catalog);
        }
        self.placement_catalog.as_deref().unwrap_or_default()
    }
}

/// Parse every corpus entry of `kind` in parallel, keeping corpus order.
///
/// Unreadable entries are left out and returned as (path, reason).
fn parse_all<'a, T, F>(
    index: &'a dyn ArchiveIndex,
    kind: AssetKind,
    parse: F,
) -> (Vec<T>, Vec<(String, String)>)
where
    T: Send,
    F: Fn(&'a ArchiveEntry, &[u8]) -> Result<T> + Sync,
{
    let entries = index.entries_of_kind(kind);
    let results: Vec<_> = entries
        .par_iter()
        .map(|&entry| (entry, index.extract(entry).and_then(|bytes| parse(entry, &bytes))))
        .collect();

    let mut parsed = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (entry, result) in results {
        match result {
            Ok(value) => parsed.push(value),
            Err(e) => {
                tracing::warn!("Skipping unreadable {} {}: {}", kind.display_name(), entry.path(), e);
                failures.push((entry.path().to_string(), e.to_string()));
            }
        }
    }

    tracing::info!(
        "Indexed {} of {} {} entries",
        parsed.len(),
        entries.len(),
        kind.display_name()
    );
    (parsed, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::resource::JsonResourceAdapter;

    #[test]
    fn test_resolved_set_dedups_case_insensitively() {
        let mut set = ResolvedSet::new();
        assert!(set.insert(&ArchiveEntry::new("a.rpf/Lectern.ydr", "a.rpf", 1)));
        assert!(!set.insert(&ArchiveEntry::new("A.RPF/lectern.YDR", "a.rpf", 1)));
        assert_eq!(set.len(), 1);
        assert!(set.has_kind(AssetKind::Drawable));
        assert!(!set.has_kind(AssetKind::Fragment));
    }

    #[test]
    fn test_explored_names_only_grow() {
        let mut set = ResolvedSet::new();
        assert!(set.explore("lectern"));
        assert!(!set.explore("lectern"));
        assert!(set.mark_texture(7));
        assert!(!set.mark_texture(7));
        assert!(set.has_texture(7));
        assert_eq!(set.explored_len(), 1);
    }

    #[test]
    fn test_dictionaries_in_dir() {
        let index = MemoryArchive::new()
            .with_file("a.rpf/Lectern/one.ytd", "{}")
            .with_file("a.rpf/lectern/two.ytd", "{}")
            .with_file("a.rpf/other/three.ytd", "{}");
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();
        let mut ctx = BundleContext::new(&index, &adapter, &tables);

        let names: Vec<&str> = ctx.dictionaries_in_dir("lectern").into_iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["one.ytd", "two.ytd"]);
        assert!(ctx.dictionaries_in_dir("missing").is_empty());
    }

    #[test]
    fn test_type_catalog_skips_unreadable() {
        let index = MemoryArchive::new()
            .with_file("a.rpf/good.ytyp", r#"{"archetypes":["Lectern"]}"#)
            .with_file("a.rpf/bad.ytyp", "garbage");
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();
        let mut ctx = BundleContext::new(&index, &adapter, &tables);

        let catalog = ctx.type_catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].archetypes, vec!["lectern"]);

        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].entry, "a.rpf/bad.ytyp");
        assert_eq!(ctx.warnings()[0].step, ResolveStep::TypeDefinition);

        // The catalog is built once, so the failure is reported once
        ctx.type_catalog();
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_placement_catalog_reports_unreadable() {
        let index = MemoryArchive::new()
            .with_file("m.rpf/good.ymap", r#"{"archetypes":["lectern"]}"#)
            .with_file("m.rpf/bad.ymap", "garbage");
        let adapter = JsonResourceAdapter::new();
        let tables = ResolverTables::default();
        let mut ctx = BundleContext::new(&index, &adapter, &tables);

        assert_eq!(ctx.placement_catalog().len(), 1);
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].entry, "m.rpf/bad.ymap");
        assert_eq!(ctx.warnings()[0].step, ResolveStep::PlacementMaps);
    }
}

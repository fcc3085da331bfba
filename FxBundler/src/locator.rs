//! Texture locator
//!
//! Maps a texture hash to the texture dictionary that owns it. Finding the
//! owner means parsing every dictionary in the corpus, so the parsed catalog is
//! built once per run and every answer is cached by hash.

use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::archive::{ArchiveEntry, ArchiveIndex, AssetKind};
use crate::resource::{ResourceAdapter, TextureDictionary};

/// A parsed texture dictionary from the corpus
#[derive(Debug)]
pub struct CatalogEntry<'a> {
    /// The dictionary entry
    pub entry: &'a ArchiveEntry,
    /// Its parsed hash table
    pub dictionary: TextureDictionary,
}

/// Run-scoped texture hash -> owning dictionary lookup
pub struct TextureLocator<'a> {
    index: &'a dyn ArchiveIndex,
    adapter: &'a dyn ResourceAdapter,
    shared: &'a [String],
    catalog: Option<Vec<CatalogEntry<'a>>>,
    /// Hash -> position in the catalog, `None` when no dictionary has it
    cache: HashMap<u32, Option<usize>>,
    /// (path, reason) of dictionaries that failed to parse, not yet reported
    failures: Vec<(String, String)>,
}

impl<'a> TextureLocator<'a> {
    /// Create a locator; nothing is parsed until the first lookup
    #[must_use]
    pub fn new(
        index: &'a dyn ArchiveIndex,
        adapter: &'a dyn ResourceAdapter,
        shared: &'a [String],
    ) -> Self {
        Self {
            index,
            adapter,
            shared,
            catalog: None,
            cache: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Find the dictionary containing `hash`.
    ///
    /// Corpus dictionaries are checked in corpus order, then the shared
    /// dictionaries that the corpus enumeration did not already cover.
    pub fn locate(&mut self, hash: u32) -> Option<&CatalogEntry<'a>> {
        if !self.cache.contains_key(&hash) {
            let found = self
                .catalog()
                .iter()
                .position(|c| c.dictionary.contains(hash));
            self.cache.insert(hash, found);
        }

        let position = self.cache.get(&hash).copied().flatten()?;
        self.catalog.as_ref().and_then(|c| c.get(position))
    }

    /// Every parseable dictionary, built on first use
    pub fn catalog(&mut self) -> &[CatalogEntry<'a>] {
        if self.catalog.is_none() {
            let (catalog, failures) = self.build_catalog();
            self.catalog = Some(catalog);
            self.failures = failures;
        }
        self.catalog.as_deref().unwrap_or_default()
    }

    /// Parsed form of a dictionary entry, `None` if it is not in the catalog
    pub fn dictionary(&mut self, entry: &ArchiveEntry) -> Option<&TextureDictionary> {
        self.catalog()
            .iter()
            .find(|c| c.entry == entry)
            .map(|c| &c.dictionary)
    }

    /// Dictionaries that failed to parse since the last call, as (path, reason).
    ///
    /// The catalog is built once per run, so each failure is handed out once.
    pub fn take_failures(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.failures)
    }

    /// Number of hashes answered so far
    #[must_use]
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }

    fn build_catalog(&self) -> (Vec<CatalogEntry<'a>>, Vec<(String, String)>) {
        let start = Instant::now();
        let mut candidates = self.index.entries_of_kind(AssetKind::TextureDictionary);
        // Shared names outside the `.ytd` enumeration (other extensions, loose files)
        for name in self.shared {
            if let Some(entry) = self.index.lookup(name)
                && !candidates.contains(&entry)
            {
                candidates.push(entry);
            }
        }

        let index = self.index;
        let adapter = self.adapter;
        let parsed: Vec<_> = candidates
            .par_iter()
            .map(|&entry| {
                let result = index
                    .extract(entry)
                    .and_then(|bytes| adapter.parse_texture_dictionary(&bytes));
                (entry, result)
            })
            .collect();

        let mut catalog = Vec::with_capacity(parsed.len());
        let mut failures = Vec::new();
        for (entry, result) in parsed {
            match result {
                Ok(dictionary) => catalog.push(CatalogEntry { entry, dictionary }),
                Err(e) => {
                    tracing::warn!("Skipping unreadable texture dictionary {}: {}", entry.path(), e);
                    failures.push((entry.path().to_string(), e.to_string()));
                }
            }
        }

        tracing::info!(
            "Indexed {} of {} texture dictionaries in {:.2?}",
            catalog.len(),
            candidates.len(),
            start.elapsed()
        );
        (catalog, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::resource::JsonResourceAdapter;
    use crate::utils::hash_name;

    fn corpus() -> MemoryArchive {
        MemoryArchive::new()
            .with_file("a.rpf/first.ytd", r#"{"textures":[{"name":"shared_tex"}]}"#)
            .with_file("b.rpf/broken.ytd", "not json")
            .with_file(
                "b.rpf/second.ytd",
                r#"{"textures":[{"name":"shared_tex"},{"name":"only_here"}]}"#,
            )
    }

    #[test]
    fn test_locate_prefers_corpus_order() {
        let index = corpus();
        let adapter = JsonResourceAdapter::new();
        let mut locator = TextureLocator::new(&index, &adapter, &[]);

        let found = locator.locate(hash_name("shared_tex")).unwrap();
        assert_eq!(found.entry.name(), "first.ytd");

        let found = locator.locate(hash_name("only_here")).unwrap();
        assert_eq!(found.entry.name(), "second.ytd");
    }

    #[test]
    fn test_missing_hash_is_cached() {
        let index = corpus();
        let adapter = JsonResourceAdapter::new();
        let mut locator = TextureLocator::new(&index, &adapter, &[]);

        assert!(locator.locate(42).is_none());
        assert!(locator.locate(42).is_none());
        assert_eq!(locator.cached_lookups(), 1);
    }

    #[test]
    fn test_unreadable_dictionaries_are_skipped() {
        let index = corpus();
        let adapter = JsonResourceAdapter::new();
        let mut locator = TextureLocator::new(&index, &adapter, &[]);

        let names: Vec<&str> = locator.catalog().iter().map(|c| c.entry.name()).collect();
        assert_eq!(names, vec!["first.ytd", "second.ytd"]);

        let failures = locator.take_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "b.rpf/broken.ytd");
        // Handed out once
        assert!(locator.take_failures().is_empty());
    }

    #[test]
    fn test_shared_names_outside_dictionary_enumeration() {
        let index = corpus().with_file(
            "c.rpf/common/vehshare_extra.dat",
            r#"{"textures":[{"name":"decal_dirt"}]}"#,
        );
        let adapter = JsonResourceAdapter::new();

        let mut locator = TextureLocator::new(&index, &adapter, &[]);
        assert!(locator.locate(hash_name("decal_dirt")).is_none());

        let shared = vec!["vehshare_extra.dat".to_string(), "first.ytd".to_string()];
        let mut locator = TextureLocator::new(&index, &adapter, &shared);
        let found = locator.locate(hash_name("decal_dirt")).unwrap();
        assert_eq!(found.entry.path(), "c.rpf/common/vehshare_extra.dat");
        // Already enumerated shared names are not listed twice
        assert_eq!(locator.catalog().len(), 3);
    }

    #[test]
    fn test_dictionary_by_entry() {
        let index = corpus();
        let adapter = JsonResourceAdapter::new();
        let mut locator = TextureLocator::new(&index, &adapter, &[]);

        let second = index.lookup("second.ytd").unwrap();
        assert_eq!(locator.dictionary(second).map(TextureDictionary::len), Some(2));
        let broken = index.lookup("broken.ytd").unwrap();
        assert!(locator.dictionary(broken).is_none());
    }
}

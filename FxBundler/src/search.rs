//! Model search over the corpus
//!
//! Finds candidate roots by file name and expands a picked drawable to the
//! files stored beside it in the same archive.
//!
//! ## Usage
//!
//! ```ignore
//! let hits = search_models(&index, "lectern", None);
//! let extra = associated_entries(&index, hits[0], &tables);
//! ```

use rayon::prelude::*;

use crate::archive::{ArchiveEntry, ArchiveIndex, AssetKind};
use crate::tables::ResolverTables;

/// Search for model entries by file name (case-insensitive substring match).
///
/// With no filter both drawables and fragments match. Results keep corpus
/// order; a blank query matches nothing.
#[must_use]
pub fn search_models<'a>(
    index: &'a dyn ArchiveIndex,
    query: &str,
    filter: Option<AssetKind>,
) -> Vec<&'a ArchiveEntry> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    index
        .entries()
        .par_iter()
        .filter(|entry| {
            let kind = entry.kind();
            filter.map_or(kind.is_model(), |f| kind == f)
        })
        .filter(|entry| entry.name().to_lowercase().contains(&query_lower))
        .collect()
}

/// Entries stored beside a drawable: texture dictionaries, collisions and LOD
/// drawables in the same owning archive whose file name starts with the
/// drawable's base name.
#[must_use]
pub fn associated_entries<'a>(
    index: &'a dyn ArchiveIndex,
    entry: &ArchiveEntry,
    tables: &ResolverTables,
) -> Vec<&'a ArchiveEntry> {
    let base = entry.base_name();
    let lod_names: Vec<String> = tables
        .lod_drawable_suffixes
        .iter()
        .map(|suffix| format!("{base}{suffix}"))
        .collect();

    index
        .entries()
        .iter()
        .filter(|other| *other != entry && other.archive().eq_ignore_ascii_case(entry.archive()))
        .filter(|other| {
            let other_base = other.base_name();
            other_base.starts_with(&base)
                && match other.kind() {
                    AssetKind::TextureDictionary | AssetKind::Collision => true,
                    AssetKind::Drawable => lod_names.contains(&other_base),
                    _ => false,
                }
        })
        .collect()
}

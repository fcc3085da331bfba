//! Name matching heuristics
//!
//! Many dependencies are only linked by naming convention. The matcher turns
//! a base name into alternate names that might identify related entries; the
//! archive index decides which of them actually exist. Output is deliberately
//! over-inclusive and must never be treated as proof of a dependency.

mod distance;

pub use distance::{edit_distance, is_related};

use indexmap::IndexSet;

use crate::tables::ResolverTables;

/// Generate candidate names for a base identifier.
///
/// Produces, in order and without duplicates:
/// 1. the base itself with every suffix and prefix variant
/// 2. the base with underscores removed
/// 3. for names with underscore segments, each segment with its own suffix
///    and prefix variants
///
/// The result holds at most `(2 + suffixes + prefixes) * (1 + segments)`
/// names. Input is lower-cased; blank input yields nothing.
pub fn candidate_names(base: &str, tables: &ResolverTables) -> Vec<String> {
    let base = base.trim().to_ascii_lowercase();
    if base.is_empty() {
        return Vec::new();
    }

    let mut names = IndexSet::new();
    push_variants(&mut names, &base, tables);

    let stripped = base.replace('_', "");
    if !stripped.is_empty() {
        names.insert(stripped);
    }

    if base.contains('_') {
        for segment in base.split('_').filter(|s| !s.is_empty()) {
            push_variants(&mut names, segment, tables);
        }
    }

    names.into_iter().collect()
}

fn push_variants(names: &mut IndexSet<String>, stem: &str, tables: &ResolverTables) {
    names.insert(stem.to_string());
    for suffix in &tables.name_suffixes {
        names.insert(format!("{stem}{suffix}"));
    }
    for prefix in &tables.name_prefixes {
        names.insert(format!("{prefix}{stem}"));
    }
}

/// Number of non-empty underscore-delimited segments in a name
pub fn segment_count(name: &str) -> usize {
    name.split('_').filter(|s| !s.is_empty()).count()
}

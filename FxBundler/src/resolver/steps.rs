//! Discovery steps for model roots

use std::collections::HashSet;
use std::iter;

use rayon::prelude::*;

use super::{BundleContext, ResolveStep, RootReport, StepOutcome};
use crate::archive::{ArchiveEntry, AssetKind};
use crate::matcher::{candidate_names, is_related};
use crate::resource::{ResourceDescriptor, TextureRef};
use crate::tables::ResolverTables;
use crate::utils::hash_name;

/// Steps run for a drawable root, in order
const DRAWABLE_STEPS: [ResolveStep; 8] = [
    ResolveStep::Textures,
    ResolveStep::NameCandidates,
    ResolveStep::FuzzyDictionaries,
    ResolveStep::SharedDictionaries,
    ResolveStep::Collision,
    ResolveStep::LodModels,
    ResolveStep::TypeDefinition,
    ResolveStep::PlacementMaps,
];

/// Steps run for a fragment root, in order
const FRAGMENT_STEPS: [ResolveStep; 4] = [
    ResolveStep::Textures,
    ResolveStep::NameCandidates,
    ResolveStep::FuzzyDictionaries,
    ResolveStep::SharedDictionaries,
];

pub(super) fn resolve_model(ctx: &mut BundleContext<'_>, root: &ArchiveEntry, report: &mut RootReport) {
    let descriptor = match ctx.parse_model(root) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            record(ctx, root, report, ResolveStep::Root, StepOutcome::Failed(e.to_string()));
            return;
        }
    };

    let base = root.base_name();
    let steps: &[ResolveStep] = if root.kind() == AssetKind::Drawable {
        &DRAWABLE_STEPS
    } else {
        &FRAGMENT_STEPS
    };

    for &step in steps {
        let outcome = match step {
            ResolveStep::Textures => resolve_textures(ctx, &descriptor),
            ResolveStep::NameCandidates => resolve_name_candidates(ctx, &base, &descriptor),
            ResolveStep::FuzzyDictionaries => resolve_fuzzy_dictionaries(ctx, &base),
            ResolveStep::SharedDictionaries => resolve_shared_dictionaries(ctx),
            ResolveStep::Collision => resolve_collision(ctx, &base),
            ResolveStep::LodModels => resolve_lod_models(ctx, &base),
            ResolveStep::TypeDefinition => resolve_type_definition(ctx, &base),
            ResolveStep::PlacementMaps => resolve_placement_maps(ctx, &base),
            ResolveStep::Root | ResolveStep::Write => StepOutcome::Skipped,
        };
        record(ctx, root, report, step, outcome);
    }
}

fn record(
    ctx: &mut BundleContext<'_>,
    root: &ArchiveEntry,
    report: &mut RootReport,
    step: ResolveStep,
    outcome: StepOutcome,
) {
    match outcome {
        StepOutcome::Added(0) | StepOutcome::Skipped => {}
        StepOutcome::Added(count) => {
            tracing::debug!("{}: {} added {} entries", root.name(), step, count);
            report.added += count;
        }
        StepOutcome::Failed(reason) => ctx.warn(root.path(), step, reason),
    }
}

/// Add every entry in `hits` not already resolved; returns how many were new
fn add_all<'a>(ctx: &mut BundleContext<'_>, hits: impl IntoIterator<Item = &'a ArchiveEntry>) -> usize {
    hits.into_iter().filter(|entry| ctx.add(entry)).count()
}

/// Add dictionaries found by a naming heuristic; returns how many were new.
///
/// A dictionary whose textures have all shipped already is left out, and the
/// textures of every added dictionary are marked handled. Empty and
/// unparseable dictionaries carry no known hashes and are added as is.
fn add_dictionaries<'a>(
    ctx: &mut BundleContext<'_>,
    hits: impl IntoIterator<Item = &'a ArchiveEntry>,
) -> usize {
    let mut added = 0;
    for entry in hits {
        if ctx.resolved.contains(entry) {
            continue;
        }

        let hashes: Vec<u32> = ctx
            .locator
            .dictionary(entry)
            .map(|d| d.textures().map(|t| t.hash).collect())
            .unwrap_or_default();
        if !hashes.is_empty() && hashes.iter().all(|&h| ctx.resolved.has_texture(h)) {
            tracing::debug!("{} only holds textures already shipped", entry.path());
            continue;
        }

        for hash in hashes {
            ctx.resolved.mark_texture(hash);
        }
        added += usize::from(ctx.add(entry));
    }
    added
}

// ==================== Exact references ====================

/// Locate the owning dictionary of every referenced texture hash
fn resolve_textures(ctx: &mut BundleContext<'_>, descriptor: &ResourceDescriptor) -> StepOutcome {
    let mut added = 0;

    for texture in descriptor.all_textures() {
        if !ctx.resolved.mark_texture(texture.hash) {
            continue;
        }

        let found = ctx.locator.locate(texture.hash).map(|c| {
            let hashes: Vec<u32> = c.dictionary.textures().map(|t| t.hash).collect();
            (c.entry, hashes)
        });
        let Some((entry, hashes)) = found else {
            tracing::debug!("Texture {:#010x} not found in any dictionary", texture.hash);
            continue;
        };

        // The whole dictionary ships, so every texture in it is handled
        for hash in hashes {
            ctx.resolved.mark_texture(hash);
        }
        added += usize::from(ctx.add(entry));
    }

    ctx.report_dictionary_failures(ResolveStep::Textures);
    StepOutcome::Added(added)
}

// ==================== Naming heuristics ====================

/// Probe dictionaries named after the base or any referenced texture
fn resolve_name_candidates(
    ctx: &mut BundleContext<'_>,
    base: &str,
    descriptor: &ResourceDescriptor,
) -> StepOutcome {
    let tables = ctx.tables;
    let seeds: Vec<String> = iter::once(base.to_string())
        .chain(descriptor.all_textures().filter_map(TextureRef::name_lower))
        .collect();

    let mut added = 0;
    for seed in &seeds {
        for candidate in candidate_names(seed, tables) {
            if ctx.resolved.explore(&candidate) {
                added += probe_dictionaries(ctx, &candidate);
            }
        }
    }
    ctx.report_dictionary_failures(ResolveStep::NameCandidates);
    StepOutcome::Added(added)
}

/// Exact name, parent directory, then suffix and prefix variants
fn probe_dictionaries(ctx: &mut BundleContext<'_>, candidate: &str) -> usize {
    let tables = ctx.tables;
    let mut hits: Vec<&ArchiveEntry> = Vec::new();

    hits.extend(ctx.lookup_named(candidate, AssetKind::TextureDictionary));
    hits.extend(ctx.dictionaries_in_dir(candidate));
    for suffix in &tables.dictionary_suffixes {
        hits.extend(ctx.lookup_named(&format!("{candidate}{suffix}"), AssetKind::TextureDictionary));
    }
    for prefix in &tables.dictionary_prefixes {
        hits.extend(ctx.lookup_named(&format!("{prefix}{candidate}"), AssetKind::TextureDictionary));
    }

    add_dictionaries(ctx, hits)
}

/// Corpus-wide scan for dictionaries holding textures named like the base
fn resolve_fuzzy_dictionaries(ctx: &mut BundleContext<'_>, base: &str) -> StepOutcome {
    let tables = ctx.tables;
    let min_length = tables.fuzzy_min_length;
    if base.chars().count() < min_length {
        return StepOutcome::Skipped;
    }

    let max_distance = tables.max_edit_distance;
    let related: Vec<&ArchiveEntry> = ctx
        .locator
        .catalog()
        .par_iter()
        .filter(|c| {
            c.dictionary
                .names()
                .any(|name| name.chars().count() >= min_length && is_related(&name, base, max_distance))
        })
        .map(|c| c.entry)
        .collect();

    let added = add_dictionaries(ctx, related);
    ctx.report_dictionary_failures(ResolveStep::FuzzyDictionaries);
    StepOutcome::Added(added)
}

fn resolve_shared_dictionaries(ctx: &mut BundleContext<'_>) -> StepOutcome {
    let tables = ctx.tables;
    if tables.shared_dictionaries.is_empty() {
        return StepOutcome::Skipped;
    }

    let index = ctx.index;
    let hits: Vec<&ArchiveEntry> = tables
        .shared_dictionaries
        .iter()
        .filter_map(|name| index.lookup(name))
        .collect();
    StepOutcome::Added(add_all(ctx, hits))
}

// ==================== Drawable-only steps ====================

/// Exact name, suffix variants, prefix variants, then the first collision
/// entry whose name contains the base
fn resolve_collision(ctx: &mut BundleContext<'_>, base: &str) -> StepOutcome {
    let tables = ctx.tables;
    let found = iter::once(base.to_string())
        .chain(tables.collision_suffixes.iter().map(|s| format!("{base}{s}")))
        .chain(tables.collision_prefixes.iter().map(|p| format!("{p}{base}")))
        .find_map(|name| ctx.lookup_named(&name, AssetKind::Collision))
        .or_else(|| {
            ctx.index
                .entries_of_kind(AssetKind::Collision)
                .into_iter()
                .find(|e| e.base_name().contains(base))
        });

    match found {
        Some(entry) => StepOutcome::Added(usize::from(ctx.add(entry))),
        None => {
            tracing::debug!("No collision found for {}", base);
            StepOutcome::Added(0)
        }
    }
}

fn resolve_lod_models(ctx: &mut BundleContext<'_>, base: &str) -> StepOutcome {
    let tables = ctx.tables;
    let hits: Vec<&ArchiveEntry> = tables
        .lod_drawable_suffixes
        .iter()
        .filter_map(|suffix| ctx.lookup_named(&format!("{base}{suffix}"), AssetKind::Drawable))
        .collect();
    StepOutcome::Added(add_all(ctx, hits))
}

/// Segments of `name` long enough to identify it, ignoring numbers and the
/// common naming prefixes
fn significant_segments<'n>(name: &'n str, tables: &'n ResolverTables) -> impl Iterator<Item = &'n str> {
    name.split('_').filter(move |segment| {
        segment.len() >= tables.min_segment_length
            && !segment.chars().all(|c| c.is_ascii_digit())
            && !tables
                .name_prefixes
                .iter()
                .any(|p| p.trim_end_matches('_') == *segment)
    })
}

/// First type-definition entry declaring the base.
///
/// An exact or LOD-suffixed archetype name beats a shared segment; within
/// each tier the first entry in corpus order wins.
fn resolve_type_definition(ctx: &mut BundleContext<'_>, base: &str) -> StepOutcome {
    let tables = ctx.tables;
    let exact: HashSet<String> = iter::once(base.to_string())
        .chain(tables.lod_suffixes.iter().map(|s| format!("{base}{s}")))
        .collect();
    let segments: HashSet<&str> = significant_segments(base, tables).collect();

    let catalog = ctx.type_catalog();
    let matched = catalog
        .iter()
        .find(|defs| defs.archetypes.iter().any(|a| exact.contains(a)))
        .or_else(|| {
            catalog.iter().find(|defs| {
                defs.archetypes
                    .iter()
                    .any(|a| significant_segments(a, tables).any(|s| segments.contains(s)))
            })
        })
        .map(|defs| defs.entry);

    match matched {
        Some(entry) => StepOutcome::Added(usize::from(ctx.add(entry))),
        None => StepOutcome::Added(0),
    }
}

/// Every placement map referencing the base archetype or a LOD variant of it
fn resolve_placement_maps(ctx: &mut BundleContext<'_>, base: &str) -> StepOutcome {
    let tables = ctx.tables;
    let targets: HashSet<u32> = iter::once(hash_name(base))
        .chain(tables.lod_suffixes.iter().map(|s| hash_name(&format!("{base}{s}"))))
        .collect();

    let hits: Vec<&ArchiveEntry> = ctx
        .placement_catalog()
        .iter()
        .filter(|map| !map.archetypes.is_disjoint(&targets))
        .map(|map| map.entry)
        .collect();
    StepOutcome::Added(add_all(ctx, hits))
}

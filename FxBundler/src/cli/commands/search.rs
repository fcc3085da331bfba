//! CLI command for searching models in a corpus

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::archive::{AssetKind, DirectoryArchive};
use crate::search::{associated_entries, search_models};

/// Search for models by file name
pub fn execute(
    corpus: &Path,
    query: &str,
    kind: Option<AssetKind>,
    associated: bool,
    tables: Option<&Path>,
) -> anyhow::Result<()> {
    let tables = super::tables::load(tables)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Indexing corpus...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let index = DirectoryArchive::open(corpus)?;
    pb.finish_and_clear();

    let results = search_models(&index, query, kind);

    if results.is_empty() {
        println!("No models found matching '{query}'");
        return Ok(());
    }

    println!("Found {} models matching '{query}':", results.len());
    for entry in results {
        println!(
            "  {} ({}) - {} bytes",
            entry.path(),
            entry.kind().display_name(),
            entry.length()
        );

        if associated && entry.kind() == AssetKind::Drawable {
            for other in associated_entries(&index, entry, &tables) {
                println!("      + {} ({})", other.path(), other.kind().display_name());
            }
        }
    }

    Ok(())
}

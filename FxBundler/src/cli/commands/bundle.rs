//! CLI command for bundling a resource

use std::path::Path;
use std::time::Instant;

use console::style;

use crate::archive::{ArchiveEntry, AssetKind, DirectoryArchive};
use crate::bundle::{bundle_with_progress, select_roots};
use crate::cli::progress::{LINK, LOOKING_GLASS, PACKAGE, WARNING, print_done, print_step, simple_bar};
use crate::package::PackageOptions;
use crate::resource::JsonResourceAdapter;
use crate::search::associated_entries;

/// Arguments of the `bundle` command
pub struct BundleArgs<'a> {
    pub corpus: &'a Path,
    pub roots: &'a [String],
    pub name: &'a str,
    pub output: &'a Path,
    pub description: Option<&'a str>,
    pub author: Option<&'a str>,
    pub asset_dir: &'a str,
    pub associated: bool,
    pub tables: Option<&'a Path>,
    pub quiet: bool,
}

/// Bundle the selected roots into a resource
pub fn execute(args: &BundleArgs<'_>) -> anyhow::Result<()> {
    let start = Instant::now();
    let tables = super::tables::load(args.tables)?;

    let mut options = PackageOptions::new(args.name, args.output)
        .with_author(args.author)
        .with_asset_dir(args.asset_dir);
    if let Some(description) = args.description {
        options = options.with_description(description);
    }
    // Reject a bad request before indexing the corpus
    options.validate()?;

    print_step(1, 3, LOOKING_GLASS, "Indexing corpus...");
    let index = DirectoryArchive::open(args.corpus)?;
    let mut roots = select_roots(&index, args.roots)?;

    if args.associated {
        let mut extra: Vec<ArchiveEntry> = Vec::new();
        for root in roots.iter().filter(|r| r.kind() == AssetKind::Drawable) {
            extra.extend(associated_entries(&index, root, &tables).into_iter().cloned());
        }
        for entry in extra {
            if !roots.contains(&entry) {
                roots.push(entry);
            }
        }
    }

    print_step(2, 3, LINK, &format!("Resolving {} roots...", roots.len()));
    let pb = simple_bar(roots.len() as u64, "Resolving", args.quiet);

    let report = bundle_with_progress(
        &index,
        &JsonResourceAdapter::new(),
        &roots,
        &options,
        &tables,
        &|progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.current as u64);
            pb.set_message(progress.phase.as_str());
        },
    )?;
    pb.finish_and_clear();

    print_step(3, 3, PACKAGE, "Package written");
    println!("  Resource: {}", report.package.package_root.display());
    println!(
        "  {} entries resolved, {} written, {} already present",
        report.resolved.len(),
        report.package.written.len(),
        report.package.skipped_existing.len()
    );
    if let Some(script) = &report.package.loader_script {
        println!("  Loader script: {}", script.display());
    }

    if !report.warnings.is_empty() {
        println!(
            "{}{}",
            WARNING,
            style(format!("{} warnings:", report.warnings.len())).yellow()
        );
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }

    print_done(start.elapsed());
    Ok(())
}

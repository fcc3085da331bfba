//! # FxBundler
//!
//! Dependency resolution and packaging for GTA V archive corpora.
//!
//! Given a selection of root assets (models, maps, anything else), `FxBundler`
//! computes the set of corpus entries those roots need to work standalone and
//! writes them out as a `FiveM` resource: a flattened `stream/` directory, a
//! generated `fxmanifest.lua` and, when needed, a loader script.
//!
//! Dependencies come from two sources:
//! - **Exact references**: textures a model names by hash, located through
//!   the texture dictionaries of the corpus
//! - **Naming heuristics**: dictionaries, collisions, type definitions and
//!   placement maps linked to a model only by naming convention
//!
//! ## Quick Start
//!
//! ```no_run
//! use fxbundler::prelude::*;
//!
//! let index = DirectoryArchive::open("exported/")?;
//! let roots = select_roots(&index, &["prop_church_lectern.ydr"])?;
//!
//! let report = bundle(
//!     &index,
//!     &JsonResourceAdapter::new(),
//!     &roots,
//!     &PackageOptions::new("church_lectern", "resources/"),
//!     &ResolverTables::default(),
//! )?;
//!
//! for warning in &report.warnings {
//!     println!("{warning}");
//! }
//! # Ok::<(), fxbundler::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `fxbundler` command-line binary

pub mod archive;
pub mod bundle;
pub mod error;
pub mod locator;
pub mod matcher;
pub mod package;
pub mod resolver;
pub mod resource;
pub mod search;
pub mod tables;
pub mod utils;

// Re-exports for convenience
pub use bundle::{BundleReport, bundle, bundle_with_progress, select_roots};
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    // Corpus access and resource parsing
    pub use crate::archive::{ArchiveEntry, ArchiveIndex, AssetKind, DirectoryArchive, MemoryArchive};
    pub use crate::resource::{
        JsonResourceAdapter, ResourceAdapter, ResourceDescriptor, TextureDictionary, TextureRef,
    };

    // Resolution
    pub use crate::matcher::{candidate_names, edit_distance, is_related};
    pub use crate::resolver::{ResolveStep, ResolvedSet, RootReport, Warning};
    pub use crate::tables::{Directive, ResolverTables};

    // Packaging
    pub use crate::bundle::{BundleReport, bundle, bundle_with_progress, select_roots};
    pub use crate::package::{BundlePhase, BundleProgress, Manifest, PackageOptions, PackageReport};

    pub use crate::search::{associated_entries, search_models};
    pub use crate::utils::hash_name;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

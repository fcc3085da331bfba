//! Package assembly
//!
//! A package is a directory `<output_dir>/<name>/` holding a flattened asset
//! directory, the resource manifest and, when needed, a loader script:
//!
//! ```text
//! church/
//! ├── fxmanifest.lua
//! ├── client.lua        (fragments or placement maps only)
//! └── stream/
//!     ├── lectern.ydr
//!     └── lectern.ytd
//! ```

mod assembler;
mod manifest;
mod types;

pub use assembler::{PackageReport, assemble};
pub use manifest::{LOADER_SCRIPT, MANIFEST_FILE, Manifest};
pub use types::{
    BundlePhase, BundleProgress, BundleProgressCallback, DEFAULT_ASSET_DIR, DEFAULT_DESCRIPTION,
    PackageOptions,
};

//! Types for bundle progress tracking and package options

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for bundle operations
pub type BundleProgressCallback<'a> = &'a (dyn Fn(&BundleProgress) + Sync + Send);

/// Progress information during a bundle run
#[derive(Debug, Clone)]
pub struct BundleProgress {
    /// Current operation phase
    pub phase: BundlePhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl BundleProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: BundlePhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(phase: BundlePhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a bundle run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlePhase {
    /// Resolving dependencies of each root
    Resolving,
    /// Writing resolved entries into the asset directory
    Writing,
    /// Writing the manifest and loader script
    WritingManifest,
    /// Operation complete
    Complete,
}

impl BundlePhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolving => "Resolving dependencies",
            Self::Writing => "Writing assets",
            Self::WritingManifest => "Writing manifest",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Options Types
// ============================================================================

/// Description used when none is given
pub const DEFAULT_DESCRIPTION: &str = "Created with FxBundler";

/// Asset directory name used when none is given
pub const DEFAULT_ASSET_DIR: &str = "stream";

/// Where and how to write a package
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Package (resource) name, also the package directory name
    pub name: String,
    /// Directory the package directory is created in
    pub output_dir: PathBuf,
    /// Manifest description
    pub description: String,
    /// Manifest author, omitted when `None`
    pub author: Option<String>,
    /// Name of the flattened asset directory inside the package
    pub asset_dir: String,
}

impl PackageOptions {
    /// Create options for a package named `name` under `output_dir`
    #[must_use]
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output_dir: output_dir.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            author: None,
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
        }
    }

    /// Set the manifest description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the manifest author
    #[must_use]
    pub fn with_author(mut self, author: Option<impl Into<String>>) -> Self {
        self.author = author.map(Into::into);
        self
    }

    /// Set the asset directory name
    #[must_use]
    pub fn with_asset_dir(mut self, asset_dir: impl Into<String>) -> Self {
        self.asset_dir = asset_dir.into();
        self
    }

    /// `<output_dir>/<name>`
    #[must_use]
    pub fn package_root(&self) -> PathBuf {
        self.output_dir.join(self.name.trim())
    }

    /// `<output_dir>/<name>/<asset_dir>`
    #[must_use]
    pub fn asset_root(&self) -> PathBuf {
        self.package_root().join(&self.asset_dir)
    }

    /// Reject options that cannot describe a package
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for a blank or path-like name, an empty
    /// output directory, or a blank or path-like asset directory.
    pub fn validate(&self) -> Result<()> {
        validate_component("name", &self.name)?;
        validate_component("asset directory", &self.asset_dir)?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::validation("output directory", "must not be empty"));
        }
        Ok(())
    }
}

/// A single, non-empty path component
fn validate_component(field: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(Error::validation(field, format!("'{value}' is not a plain directory name")));
    }
    if Path::new(value).is_absolute() {
        return Err(Error::validation(field, format!("'{value}' must be relative")));
    }
    Ok(())
}

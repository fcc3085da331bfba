//! Archive entry and asset classification types

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::utils::{file_name, parent_dir_name, split_extension};

/// Asset classification by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Static model (`.ydr`)
    Drawable,
    /// Fragment / rigged model, typically a vehicle (`.yft`)
    Fragment,
    /// Texture dictionary (`.ytd`)
    TextureDictionary,
    /// Collision bounds (`.ybn`)
    Collision,
    /// Archetype type definitions (`.ytyp`)
    TypeDefinitions,
    /// Placement map (`.ymap`)
    PlacementMap,
    /// Anything else, copied verbatim
    Other,
}

impl AssetKind {
    /// Every kind the resolver and manifest know about, in manifest order
    pub const RECOGNIZED: [AssetKind; 6] = [
        AssetKind::Drawable,
        AssetKind::Fragment,
        AssetKind::TextureDictionary,
        AssetKind::Collision,
        AssetKind::TypeDefinitions,
        AssetKind::PlacementMap,
    ];

    /// Determine asset kind from extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ydr" => AssetKind::Drawable,
            "yft" => AssetKind::Fragment,
            "ytd" => AssetKind::TextureDictionary,
            "ybn" => AssetKind::Collision,
            "ytyp" => AssetKind::TypeDefinitions,
            "ymap" => AssetKind::PlacementMap,
            _ => AssetKind::Other,
        }
    }

    /// Canonical extension (without dot), empty for [`AssetKind::Other`]
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Drawable => "ydr",
            AssetKind::Fragment => "yft",
            AssetKind::TextureDictionary => "ytd",
            AssetKind::Collision => "ybn",
            AssetKind::TypeDefinitions => "ytyp",
            AssetKind::PlacementMap => "ymap",
            AssetKind::Other => "",
        }
    }

    /// Whether roots of this kind get dependency expansion
    #[must_use]
    pub fn is_model(self) -> bool {
        matches!(self, AssetKind::Drawable | AssetKind::Fragment)
    }

    /// Get display name for CLI output
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            AssetKind::Drawable => "Drawable",
            AssetKind::Fragment => "Fragment",
            AssetKind::TextureDictionary => "Texture dictionary",
            AssetKind::Collision => "Collision",
            AssetKind::TypeDefinitions => "Type definitions",
            AssetKind::PlacementMap => "Placement map",
            AssetKind::Other => "Other",
        }
    }
}

/// A file inside the archive corpus.
///
/// Identity is the virtual path compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    path: String,
    name: String,
    extension: String,
    archive: String,
    length: u64,
}

impl ArchiveEntry {
    /// Create an entry from its virtual path, owning archive and decompressed length
    #[must_use]
    pub fn new(path: impl Into<String>, archive: impl Into<String>, length: u64) -> Self {
        let path = path.into().replace('\\', "/");
        let name = file_name(&path).to_string();
        let extension = split_extension(&name).1.to_ascii_lowercase();
        Self {
            path,
            name,
            extension,
            archive: archive.into(),
            length,
        }
    }

    /// Full virtual path within the corpus
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name only (without directories)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased extension without the dot
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Owning archive reference
    #[must_use]
    pub fn archive(&self) -> &str {
        &self.archive
    }

    /// Length in bytes
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Lower-cased virtual path, the identity key
    #[must_use]
    pub fn key(&self) -> String {
        self.path.to_ascii_lowercase()
    }

    /// Asset kind derived from the extension
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        AssetKind::from_extension(&self.extension)
    }

    /// Lower-cased file name without extension (`Props/Lectern.ydr` -> `lectern`)
    #[must_use]
    pub fn base_name(&self) -> String {
        split_extension(&self.name).0.to_ascii_lowercase()
    }

    /// Lower-cased name of the containing directory, if any
    #[must_use]
    pub fn parent_dir(&self) -> Option<String> {
        parent_dir_name(&self.path).map(str::to_ascii_lowercase)
    }
}

impl PartialEq for ArchiveEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path.eq_ignore_ascii_case(&other.path)
    }
}

impl Eq for ArchiveEntry {}

impl Hash for ArchiveEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

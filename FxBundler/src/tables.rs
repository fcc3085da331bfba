//! Resolver tables
//!
//! Every hand-curated naming list the resolver and manifest rely on lives
//! here, so callers can extend or override them from a TOML file without
//! touching the resolution code.
//!
//! ```toml
//! # Only the keys you set are overridden
//! shared_dictionaries = ["vehshare.ytd", "my_shared.ytd"]
//! max_edit_distance = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A `data_file` manifest directive: (directive, glob relative to the asset directory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Directive name (e.g. `DLC_ITYP_REQUEST`)
    pub name: String,
    /// File glob relative to the asset directory (e.g. `*.ytyp`)
    pub pattern: String,
}

impl Directive {
    /// Create a directive
    #[must_use]
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// Naming tables and thresholds used during resolution and manifest generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverTables {
    // ==================== Name Matcher ====================
    /// Suffixes appended to a base name (and each of its segments)
    pub name_suffixes: Vec<String>,
    /// Prefixes prepended to a base name (and each of its segments)
    pub name_prefixes: Vec<String>,

    // ==================== Texture Dictionaries ====================
    /// Suffixes tried on every candidate when probing for variant dictionaries
    pub dictionary_suffixes: Vec<String>,
    /// Prefixes tried on every candidate when probing for variant dictionaries
    pub dictionary_prefixes: Vec<String>,
    /// Shared dictionaries always pulled into a model's package
    pub shared_dictionaries: Vec<String>,
    /// Maximum edit distance for the corpus-wide fuzzy dictionary scan
    pub max_edit_distance: usize,
    /// Base names shorter than this skip the fuzzy dictionary scan
    pub fuzzy_min_length: usize,

    // ==================== Collision / Types / Placement ====================
    /// Collision suffix variants, tried in order after the exact name
    pub collision_suffixes: Vec<String>,
    /// Collision prefix variants, tried after the suffix variants
    pub collision_prefixes: Vec<String>,
    /// LOD/SLOD archetype suffixes
    pub lod_suffixes: Vec<String>,
    /// Underscore segments shorter than this never count as shared
    pub min_segment_length: usize,
    /// LOD drawables stored next to a model (`<base><suffix>.ydr`)
    pub lod_drawable_suffixes: Vec<String>,

    // ==================== Manifest ====================
    /// File globs listed in the manifest `files` block, relative to the asset directory
    pub file_globs: Vec<String>,
    /// File name of the generated loader script
    pub loader_script: String,
    /// Directives always emitted
    pub model_directives: Vec<Directive>,
    /// Directives emitted when a fragment is packaged
    pub vehicle_directives: Vec<Directive>,
    /// Directives emitted when a placement map is packaged
    pub placement_directives: Vec<Directive>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Default for ResolverTables {
    fn default() -> Self {
        Self {
            name_suffixes: strings(&[
                "_hi", "_diff", "_n", "_spec", "_detail", "_bump", "_normal", "_1", "_2", "_veh",
            ]),
            name_prefixes: strings(&["v_", "hei_", "prop_", "veh_"]),
            dictionary_suffixes: strings(&["+hi", "_hi", "_txd", "_textures"]),
            dictionary_prefixes: strings(&["v_", "hei_"]),
            shared_dictionaries: strings(&[
                "vehshare.ytd",
                "vehshare_worn.ytd",
                "vehshare_truck.ytd",
                "vehshare_army.ytd",
                "vehshare_tire.ytd",
            ]),
            max_edit_distance: 3,
            fuzzy_min_length: 3,
            collision_suffixes: strings(&["_hi", "_lo"]),
            collision_prefixes: strings(&["hi@", "ma_", "v_"]),
            lod_suffixes: strings(&["_lod", "_slod1", "_slod2", "_slod3", "_slod4"]),
            min_segment_length: 3,
            lod_drawable_suffixes: strings(&["_lod", "_loda", "_lodb"]),
            file_globs: strings(&[
                "*.ydr", "*_lod.ydr", "*_loda.ydr", "*_lodb.ydr", "*.yft", "*.ytd", "*.ybn",
                "*.ytyp", "*.ymap",
            ]),
            loader_script: "client.lua".to_string(),
            model_directives: vec![Directive::new("DLC_ITYP_REQUEST", "*.ytyp")],
            vehicle_directives: vec![Directive::new("VEHICLE_FILE", "*.yft")],
            placement_directives: vec![Directive::new("DLC_MAP_DATA", "*.ymap")],
        }
    }
}

impl ResolverTables {
    /// Parse tables from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or a key has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load tables from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let tables = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded resolver tables from {}", path.as_ref().display());
        Ok(tables)
    }

    /// Serialize the tables to TOML
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

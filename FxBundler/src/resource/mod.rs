//! Resource model adapter
//!
//! Binary parsing of each resource format lives outside this crate. The
//! resolver only consumes the cross-references a parser exposes, through the
//! [`ResourceAdapter`] trait.

mod json;
mod types;

pub use json::JsonResourceAdapter;
pub use types::{ResourceDescriptor, TextureDictionary, TextureRef};

use crate::archive::AssetKind;
use crate::error::{Error, Result};

/// Parses raw entry bytes into the cross-reference data the resolver needs.
pub trait ResourceAdapter: Send + Sync {
    /// Parse a drawable (`.ydr`)
    fn parse_drawable(&self, data: &[u8]) -> Result<ResourceDescriptor>;

    /// Parse a fragment (`.yft`)
    fn parse_fragment(&self, data: &[u8]) -> Result<ResourceDescriptor>;

    /// Parse a texture dictionary (`.ytd`) into its hash table
    fn parse_texture_dictionary(&self, data: &[u8]) -> Result<TextureDictionary>;

    /// Parse type definitions (`.ytyp`) into the declared archetype names
    fn parse_type_definitions(&self, data: &[u8]) -> Result<Vec<String>>;

    /// Parse a placement map (`.ymap`) into the archetype hashes its records reference
    fn parse_placement_map(&self, data: &[u8]) -> Result<Vec<u32>>;

    /// Parse a model of either kind
    fn parse_model(&self, kind: AssetKind, data: &[u8]) -> Result<ResourceDescriptor> {
        match kind {
            AssetKind::Drawable => self.parse_drawable(data),
            AssetKind::Fragment => self.parse_fragment(data),
            other => Err(Error::parse(
                "model",
                format!("{} is not a model kind", other.display_name()),
            )),
        }
    }
}

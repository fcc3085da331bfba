//! Resource adapter over JSON-exported descriptors
//!
//! Format parsers outside this crate can export the cross-reference data of
//! each resource as a small JSON document stored in place of (or next to) the
//! binary resource. The shapes are:
//!
//! ```text
//! .ydr / .yft   {"embedded_textures": [TextureRef], "shader_textures": [TextureRef]}
//! .ytd          {"textures": [TextureRef]}
//! .ytyp         {"archetypes": ["name", ...]}
//! .ymap         {"archetypes": [hash | "name", ...]}
//! ```
//!
//! A `TextureRef` is `{"hash": u32, "name": "..."}`; either field may be
//! omitted, and a missing hash is computed from the name.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ResourceAdapter, ResourceDescriptor, TextureDictionary, TextureRef};
use crate::error::{Error, Result};
use crate::utils::hash_name;

/// [`ResourceAdapter`] reading JSON-exported descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResourceAdapter;

impl JsonResourceAdapter {
    /// Create the adapter
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct DictionaryDocument {
    #[serde(default)]
    textures: Vec<TextureRef>,
}

#[derive(Deserialize)]
struct TypeDefinitionsDocument {
    #[serde(default)]
    archetypes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArchetypeRef {
    Hash(u32),
    Name(String),
}

#[derive(Deserialize)]
struct PlacementDocument {
    #[serde(default)]
    archetypes: Vec<ArchetypeRef>,
}

fn decode<T: DeserializeOwned>(kind: &'static str, data: &[u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|e| Error::parse(kind, e))
}

impl ResourceAdapter for JsonResourceAdapter {
    fn parse_drawable(&self, data: &[u8]) -> Result<ResourceDescriptor> {
        decode("drawable", data)
    }

    fn parse_fragment(&self, data: &[u8]) -> Result<ResourceDescriptor> {
        decode("fragment", data)
    }

    fn parse_texture_dictionary(&self, data: &[u8]) -> Result<TextureDictionary> {
        let doc: DictionaryDocument = decode("texture dictionary", data)?;
        Ok(doc.textures.into_iter().collect())
    }

    fn parse_type_definitions(&self, data: &[u8]) -> Result<Vec<String>> {
        let doc: TypeDefinitionsDocument = decode("type definitions", data)?;
        Ok(doc.archetypes)
    }

    fn parse_placement_map(&self, data: &[u8]) -> Result<Vec<u32>> {
        let doc: PlacementDocument = decode("placement map", data)?;
        Ok(doc
            .archetypes
            .into_iter()
            .map(|a| match a {
                ArchetypeRef::Hash(hash) => hash,
                ArchetypeRef::Name(name) => hash_name(&name),
            })
            .collect())
    }
}

//! Parsed resource descriptor types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::hash_name;

/// A texture referenced by hash, with its name when the resource carries one.
///
/// Identity is the hash: two refs with the same hash are the same texture.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTextureRef")]
pub struct TextureRef {
    /// Name hash of the texture
    pub hash: u32,
    /// Texture name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TextureRef {
    /// Create a reference from an explicit hash
    #[must_use]
    pub fn new(hash: u32, name: Option<String>) -> Self {
        Self { hash, name }
    }

    /// Create a reference from a texture name, hashing it
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            hash: hash_name(name),
            name: Some(name.to_string()),
        }
    }

    /// Lower-cased texture name, if present
    #[must_use]
    pub fn name_lower(&self) -> Option<String> {
        self.name.as_deref().map(str::to_ascii_lowercase)
    }
}

impl PartialEq for TextureRef {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl std::hash::Hash for TextureRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// Serialized form: the hash may be omitted when the name is present
#[derive(Deserialize)]
struct RawTextureRef {
    hash: Option<u32>,
    name: Option<String>,
}

impl TryFrom<RawTextureRef> for TextureRef {
    type Error = String;

    fn try_from(raw: RawTextureRef) -> Result<Self, Self::Error> {
        match (raw.hash, raw.name) {
            (Some(hash), name) => Ok(TextureRef { hash, name }),
            (None, Some(name)) => Ok(TextureRef::named(&name)),
            (None, None) => Err("texture reference needs a hash or a name".to_string()),
        }
    }
}

/// Parsed view of a drawable or fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDescriptor {
    /// Textures stored in the resource's own embedded dictionary
    pub embedded_textures: Vec<TextureRef>,
    /// Textures referenced by shader parameters, possibly living elsewhere
    pub shader_textures: Vec<TextureRef>,
}

impl ResourceDescriptor {
    /// Embedded textures followed by shader references
    pub fn all_textures(&self) -> impl Iterator<Item = &TextureRef> {
        self.embedded_textures.iter().chain(&self.shader_textures)
    }
}

/// Contents of a texture dictionary, keyed by texture hash in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureDictionary {
    textures: IndexMap<u32, TextureRef>,
}

impl TextureDictionary {
    /// Create an empty dictionary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a texture; the first texture with a given hash is kept
    pub fn insert(&mut self, texture: TextureRef) {
        self.textures.entry(texture.hash).or_insert(texture);
    }

    /// Whether the dictionary holds a texture with this hash
    #[must_use]
    pub fn contains(&self, hash: u32) -> bool {
        self.textures.contains_key(&hash)
    }

    /// Look a texture up by hash
    #[must_use]
    pub fn get(&self, hash: u32) -> Option<&TextureRef> {
        self.textures.get(&hash)
    }

    /// All textures in file order
    pub fn textures(&self) -> impl Iterator<Item = &TextureRef> {
        self.textures.values()
    }

    /// Lower-cased names of every named texture
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.textures.values().filter_map(TextureRef::name_lower)
    }

    /// Number of textures
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the dictionary is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl FromIterator<TextureRef> for TextureDictionary {
    fn from_iter<I: IntoIterator<Item = TextureRef>>(iter: I) -> Self {
        let mut dict = TextureDictionary::new();
        for texture in iter {
            dict.insert(texture);
        }
        dict
    }
}

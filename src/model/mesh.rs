//! Meshes, materials, textures, images and samplers

/// A named vertex attribute (`POSITION`, `TEXCOORD_0`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Semantic name
    pub name: String,
    /// Resolved accessor
    pub accessor: Option<usize>,
}

/// `meshes[i].primitives[j]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    /// `attributes`, in key order
    pub attributes: Vec<Attribute>,
    /// Resolved `indices`
    pub indices: Option<usize>,
    /// Resolved `material`
    pub material: Option<usize>,
    /// `mode` as declared; absent means triangles
    pub mode: Option<u64>,
    /// Morph `targets`
    pub targets: Vec<Vec<Attribute>>,
}

impl Primitive {
    /// Topology mode, defaulting to TRIANGLES (4)
    pub fn mode(&self) -> u64 {
        self.mode.unwrap_or(4)
    }

    /// Resolved accessor of a named attribute
    pub fn attribute(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.accessor)
    }

    /// Number of attributes named `<prefix>_<n>`
    pub fn count_sets(&self, prefix: &str) -> usize {
        self.attributes
            .iter()
            .filter(|a| {
                a.name
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .count()
    }
}

/// `meshes[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// `primitives`
    pub primitives: Vec<Primitive>,
}

/// `materials[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Resolved texture indices of every texture-info slot, in declaration order
    pub textures: Vec<usize>,
}

/// `textures[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    /// Resolved `source` image
    pub source: Option<usize>,
    /// Resolved `sampler`
    pub sampler: Option<usize>,
}

/// `images[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    /// `uri`
    pub uri: Option<String>,
    /// Resolved `bufferView`
    pub buffer_view: Option<usize>,
    /// `mimeType`
    pub mime_type: Option<String>,
}

/// `samplers[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sampler {
    /// `magFilter`
    pub mag_filter: Option<u64>,
    /// `minFilter`
    pub min_filter: Option<u64>,
    /// `wrapS`
    pub wrap_s: Option<u64>,
    /// `wrapT`
    pub wrap_t: Option<u64>,
}

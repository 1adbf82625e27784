//! In-memory document model
//!
//! Entities live in plain `Vec`s addressed by their array index; every
//! cross-reference is an index that the graph builder has already checked
//! against the bounds of its target array. A reference that failed that
//! check is stored as `None`, so downstream stages never need to re-check.

mod animation;
mod buffer;
mod mesh;
mod scene;

pub use animation::{Animation, AnimationSampler, Channel};
pub use buffer::{
    Accessor, Buffer, BufferView, ComponentType, ElementType, Sparse, SparseIndices, SparseValues,
};
pub use mesh::{Attribute, Image, Material, Mesh, Primitive, Sampler, Texture};
pub use scene::{Camera, Node, Scene, Skin};

use crate::pointer::Pointer;

/// The top-level arrays of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKind {
    /// `accessors`
    Accessors,
    /// `animations`
    Animations,
    /// `buffers`
    Buffers,
    /// `bufferViews`
    BufferViews,
    /// `cameras`
    Cameras,
    /// `images`
    Images,
    /// `materials`
    Materials,
    /// `meshes`
    Meshes,
    /// `nodes`
    Nodes,
    /// `samplers`
    Samplers,
    /// `scenes`
    Scenes,
    /// `skins`
    Skins,
    /// `textures`
    Textures,
}

impl ArrayKind {
    /// Every kind, in the order the builder reads them
    pub const ALL: [ArrayKind; 13] = [
        ArrayKind::Accessors,
        ArrayKind::Animations,
        ArrayKind::Buffers,
        ArrayKind::BufferViews,
        ArrayKind::Cameras,
        ArrayKind::Images,
        ArrayKind::Materials,
        ArrayKind::Meshes,
        ArrayKind::Nodes,
        ArrayKind::Samplers,
        ArrayKind::Scenes,
        ArrayKind::Skins,
        ArrayKind::Textures,
    ];

    /// JSON property name of the array
    pub fn key(&self) -> &'static str {
        match self {
            ArrayKind::Accessors => "accessors",
            ArrayKind::Animations => "animations",
            ArrayKind::Buffers => "buffers",
            ArrayKind::BufferViews => "bufferViews",
            ArrayKind::Cameras => "cameras",
            ArrayKind::Images => "images",
            ArrayKind::Materials => "materials",
            ArrayKind::Meshes => "meshes",
            ArrayKind::Nodes => "nodes",
            ArrayKind::Samplers => "samplers",
            ArrayKind::Scenes => "scenes",
            ArrayKind::Skins => "skins",
            ArrayKind::Textures => "textures",
        }
    }

    /// Kind for a JSON property name
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Pointer to the entity at `index`, e.g. `/nodes/3`
    pub fn pointer(&self, index: usize) -> Pointer {
        Pointer::root().key(self.key()).index(index)
    }
}

/// Lengths of the top-level arrays, known before any entity is parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayLengths([usize; 13]);

impl ArrayLengths {
    /// Length of the array of this kind
    pub fn get(&self, kind: ArrayKind) -> usize {
        self.0[kind as usize]
    }

    /// Set the length of the array of this kind
    pub fn set(&mut self, kind: ArrayKind, len: usize) {
        self.0[kind as usize] = len;
    }
}

/// A resolved entry of an index array, remembering its position
///
/// `position` is the entry's slot in the JSON array, used to build
/// pointers such as `/scenes/0/nodes/1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Slot in the JSON array
    pub position: usize,
    /// Resolved target index
    pub index: usize,
}

/// `asset` metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    /// Declared `version`
    pub version: Option<String>,
    /// Declared `minVersion`
    pub min_version: Option<String>,
    /// Declared `generator`
    pub generator: Option<String>,
    /// Declared `copyright`
    pub copyright: Option<String>,
}

/// A parsed document
///
/// Immutable once built; every validation stage borrows it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// `asset`, if present and an object
    pub asset: Option<Asset>,
    /// Default scene, if declared and resolved
    pub scene: Option<usize>,
    /// `extensionsUsed`
    pub extensions_used: Vec<String>,
    /// `extensionsRequired`
    pub extensions_required: Vec<String>,
    /// `accessors`
    pub accessors: Vec<Accessor>,
    /// `animations`
    pub animations: Vec<Animation>,
    /// `buffers`
    pub buffers: Vec<Buffer>,
    /// `bufferViews`
    pub buffer_views: Vec<BufferView>,
    /// `cameras`
    pub cameras: Vec<Camera>,
    /// `images`
    pub images: Vec<Image>,
    /// `materials`
    pub materials: Vec<Material>,
    /// `meshes`
    pub meshes: Vec<Mesh>,
    /// `nodes`
    pub nodes: Vec<Node>,
    /// `samplers`
    pub samplers: Vec<Sampler>,
    /// `scenes`
    pub scenes: Vec<Scene>,
    /// `skins`
    pub skins: Vec<Skin>,
    /// `textures`
    pub textures: Vec<Texture>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities of this kind
    pub fn len_of(&self, kind: ArrayKind) -> usize {
        match kind {
            ArrayKind::Accessors => self.accessors.len(),
            ArrayKind::Animations => self.animations.len(),
            ArrayKind::Buffers => self.buffers.len(),
            ArrayKind::BufferViews => self.buffer_views.len(),
            ArrayKind::Cameras => self.cameras.len(),
            ArrayKind::Images => self.images.len(),
            ArrayKind::Materials => self.materials.len(),
            ArrayKind::Meshes => self.meshes.len(),
            ArrayKind::Nodes => self.nodes.len(),
            ArrayKind::Samplers => self.samplers.len(),
            ArrayKind::Scenes => self.scenes.len(),
            ArrayKind::Skins => self.skins.len(),
            ArrayKind::Textures => self.textures.len(),
        }
    }
}

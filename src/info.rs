//! Summary statistics

use serde::Serialize;

use crate::model::{ArrayKind, Document, Primitive};
use crate::validator::usage::UsageSet;

/// Content statistics of a validated document
///
/// All zero for runs that failed to parse the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInfo {
    /// `asset.version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `asset.minVersion`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    /// `asset.generator`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// `extensionsUsed`
    pub extensions_used: Vec<String>,
    /// `extensionsRequired`
    pub extensions_required: Vec<String>,
    /// Number of animations
    pub animation_count: usize,
    /// Number of materials
    pub material_count: usize,
    /// Any primitive declares morph targets
    pub has_morph_targets: bool,
    /// The document declares skins
    pub has_skins: bool,
    /// The document declares textures
    pub has_textures: bool,
    /// The top-level `scene` resolved
    pub has_default_scene: bool,
    /// Primitives drawn by used nodes, one per node instance
    pub draw_call_count: u64,
    /// Sum of `POSITION` counts over all draw calls
    pub total_vertex_count: u64,
    /// Triangles over all draw calls
    pub total_triangle_count: u64,
    /// Largest number of `TEXCOORD_n` sets on one primitive
    pub max_uvs: usize,
    /// Largest number of joint influences on one primitive
    pub max_influences: usize,
    /// Largest number of attributes on one primitive
    pub max_attributes: usize,
}

/// Compute statistics for a document
pub fn collect(doc: &Document, usage: &UsageSet) -> ValidationInfo {
    let asset = doc.asset.as_ref();
    let mut info = ValidationInfo {
        version: asset.and_then(|a| a.version.clone()),
        min_version: asset.and_then(|a| a.min_version.clone()),
        generator: asset.and_then(|a| a.generator.clone()),
        extensions_used: doc.extensions_used.clone(),
        extensions_required: doc.extensions_required.clone(),
        animation_count: doc.animations.len(),
        material_count: doc.materials.len(),
        has_skins: !doc.skins.is_empty(),
        has_textures: !doc.textures.is_empty(),
        has_default_scene: doc.scene.is_some(),
        ..Default::default()
    };

    for primitive in doc.meshes.iter().flat_map(|m| &m.primitives) {
        info.has_morph_targets |= !primitive.targets.is_empty();
        info.max_uvs = info.max_uvs.max(primitive.count_sets("TEXCOORD"));
        info.max_influences = info.max_influences.max(4 * primitive.count_sets("JOINTS"));
        info.max_attributes = info.max_attributes.max(primitive.attributes.len());
    }

    for (n, node) in doc.nodes.iter().enumerate() {
        if !usage.is_used(ArrayKind::Nodes, n) {
            continue;
        }
        let Some(mesh) = node.mesh else {
            continue;
        };
        for primitive in &doc.meshes[mesh].primitives {
            let vertices = accessor_count(doc, primitive.attribute("POSITION"));
            info.draw_call_count = info.draw_call_count.saturating_add(1);
            info.total_vertex_count = info.total_vertex_count.saturating_add(vertices);
            info.total_triangle_count = info
                .total_triangle_count
                .saturating_add(triangle_count(doc, primitive, vertices));
        }
    }

    info
}

fn accessor_count(doc: &Document, accessor: Option<usize>) -> u64 {
    accessor
        .and_then(|a| doc.accessors[a].count)
        .unwrap_or(0)
}

fn triangle_count(doc: &Document, primitive: &Primitive, vertices: u64) -> u64 {
    let n = match primitive.indices {
        Some(_) => accessor_count(doc, primitive.indices),
        None => vertices,
    };
    match primitive.mode() {
        4 => n / 3,
        5 | 6 => n.saturating_sub(2),
        _ => 0,
    }
}

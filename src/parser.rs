//! Document graph builder
//!
//! Turns the root JSON object into a [`Document`]. The lengths of all
//! top-level arrays are collected first so that every index property can
//! be resolved while its owner is being read. Shape problems are recorded
//! and replaced by defaults; building never fails.

mod animation;
mod buffer;
mod mesh;
mod resolver;
mod scene;

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{ArrayKind, ArrayLengths, Asset, Document};
use crate::pointer::Pointer;
use resolver::Context;
pub(crate) use resolver::value_text;
use serde_json::{Map, Value};

/// Non-array top-level properties
const TOP_LEVEL_PROPERTIES: &[&str] = &[
    "asset",
    "scene",
    "extensionsUsed",
    "extensionsRequired",
    "extensions",
    "extras",
];

/// Build the document model from the root object
pub fn build_document(root: &Map<String, Value>, issues: &mut IssueAggregator) -> Document {
    let pointer = Pointer::root();
    let mut lengths = ArrayLengths::default();

    for (key, value) in root {
        if let Some(kind) = ArrayKind::from_key(key) {
            match value {
                Value::Array(items) => lengths.set(kind, items.len()),
                other => issues.add(
                    IssueCode::TypeMismatch,
                    &pointer.key(key),
                    format!(
                        "Type mismatch. Property value {} is not a 'array'.",
                        resolver::value_text(other)
                    ),
                ),
            }
        } else if !TOP_LEVEL_PROPERTIES.contains(&key.as_str()) {
            issues.add(
                IssueCode::UnexpectedProperty,
                &pointer.key(key),
                "Unexpected property.",
            );
        }
    }

    let mut cx = Context::new(lengths, issues);
    let mut doc = Document::new();

    doc.asset = cx
        .required_object(root, &pointer, "asset")
        .map(|asset| parse_asset(&mut cx, asset, &pointer.key("asset")));
    doc.scene = cx.index(root, &pointer, "scene", ArrayKind::Scenes);
    doc.extensions_used = cx.string_array(root, &pointer, "extensionsUsed");
    doc.extensions_required = cx.string_array(root, &pointer, "extensionsRequired");

    doc.accessors = parse_array(&mut cx, root, ArrayKind::Accessors, buffer::parse_accessor);
    doc.animations = parse_array(&mut cx, root, ArrayKind::Animations, animation::parse_animation);
    doc.buffers = parse_array(&mut cx, root, ArrayKind::Buffers, buffer::parse_buffer);
    doc.buffer_views = parse_array(&mut cx, root, ArrayKind::BufferViews, buffer::parse_buffer_view);
    doc.cameras = parse_array(&mut cx, root, ArrayKind::Cameras, scene::parse_camera);
    doc.images = parse_array(&mut cx, root, ArrayKind::Images, mesh::parse_image);
    doc.materials = parse_array(&mut cx, root, ArrayKind::Materials, mesh::parse_material);
    doc.meshes = parse_array(&mut cx, root, ArrayKind::Meshes, mesh::parse_mesh);
    doc.nodes = parse_array(&mut cx, root, ArrayKind::Nodes, scene::parse_node);
    doc.samplers = parse_array(&mut cx, root, ArrayKind::Samplers, mesh::parse_sampler);
    doc.scenes = parse_array(&mut cx, root, ArrayKind::Scenes, scene::parse_scene);
    doc.skins = parse_array(&mut cx, root, ArrayKind::Skins, scene::parse_skin);
    doc.textures = parse_array(&mut cx, root, ArrayKind::Textures, mesh::parse_texture);

    tracing::debug!(
        nodes = doc.nodes.len(),
        meshes = doc.meshes.len(),
        accessors = doc.accessors.len(),
        buffers = doc.buffers.len(),
        "document graph built"
    );

    doc
}

fn parse_array<T: Default>(
    cx: &mut Context<'_>,
    root: &Map<String, Value>,
    kind: ArrayKind,
    parse: fn(&mut Context<'_>, &Map<String, Value>, &Pointer) -> T,
) -> Vec<T> {
    match root.get(kind.key()) {
        Some(Value::Array(items)) => {
            cx.each_object(items, &Pointer::root().key(kind.key()), |cx, obj, p| {
                parse(cx, obj, p)
            })
        }
        _ => Vec::new(),
    }
}

fn parse_asset(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Asset {
    cx.check_properties(obj, pointer, &["copyright", "generator", "version", "minVersion"]);
    Asset {
        version: cx.required_string(obj, pointer, "version").map(str::to_string),
        min_version: cx.string(obj, pointer, "minVersion").map(str::to_string),
        generator: cx.string(obj, pointer, "generator").map(str::to_string),
        copyright: cx.string(obj, pointer, "copyright").map(str::to_string),
    }
}

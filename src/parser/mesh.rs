//! Meshes, materials, textures, images and samplers

use super::resolver::Context;
use crate::model::{ArrayKind, Attribute, Image, Material, Mesh, Primitive, Sampler, Texture};
use crate::pointer::Pointer;
use serde_json::{Map, Value};

/// Texture-info slots of a material, as (parent path, slot name)
const MATERIAL_TEXTURE_SLOTS: &[(Option<&str>, &str)] = &[
    (Some("pbrMetallicRoughness"), "baseColorTexture"),
    (Some("pbrMetallicRoughness"), "metallicRoughnessTexture"),
    (None, "normalTexture"),
    (None, "occlusionTexture"),
    (None, "emissiveTexture"),
];

pub(super) fn parse_mesh(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Mesh {
    cx.check_properties(obj, pointer, &["primitives", "weights"]);
    cx.number_array(obj, pointer, "weights");
    let primitives = match cx.required_array(obj, pointer, "primitives") {
        Some(items) => cx.each_object(items, &pointer.key("primitives"), parse_primitive),
        None => Vec::new(),
    };
    Mesh { primitives }
}

fn parse_primitive(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Primitive {
    cx.check_properties(
        obj,
        pointer,
        &["attributes", "indices", "material", "mode", "targets"],
    );

    let attributes = cx
        .required_object(obj, pointer, "attributes")
        .map(|attrs| parse_attributes(cx, attrs, &pointer.key("attributes")))
        .unwrap_or_default();

    let targets = match cx.array(obj, pointer, "targets") {
        Some(items) => {
            let targets_pointer = pointer.key("targets");
            items
                .iter()
                .enumerate()
                .map(|(i, target)| {
                    let target_pointer = targets_pointer.index(i);
                    match target {
                        Value::Object(attrs) => parse_attributes(cx, attrs, &target_pointer),
                        other => {
                            cx.type_mismatch(other, &target_pointer, "object");
                            Vec::new()
                        }
                    }
                })
                .collect()
        }
        None => Vec::new(),
    };

    Primitive {
        attributes,
        indices: cx.index(obj, pointer, "indices", ArrayKind::Accessors),
        material: cx.index(obj, pointer, "material", ArrayKind::Materials),
        mode: cx.uint(obj, pointer, "mode"),
        targets,
    }
}

fn parse_attributes(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Vec<Attribute> {
    obj.iter()
        .map(|(name, value)| Attribute {
            name: name.clone(),
            accessor: cx.resolve(value, &pointer.key(name), ArrayKind::Accessors),
        })
        .collect()
}

pub(super) fn parse_material(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Material {
    cx.check_properties(
        obj,
        pointer,
        &[
            "pbrMetallicRoughness",
            "normalTexture",
            "occlusionTexture",
            "emissiveTexture",
            "emissiveFactor",
            "alphaMode",
            "alphaCutoff",
            "doubleSided",
        ],
    );

    let pbr = cx.object(obj, pointer, "pbrMetallicRoughness");
    if let Some(pbr) = pbr {
        cx.check_properties(
            pbr,
            &pointer.key("pbrMetallicRoughness"),
            &[
                "baseColorFactor",
                "baseColorTexture",
                "metallicFactor",
                "roughnessFactor",
                "metallicRoughnessTexture",
            ],
        );
    }

    let mut textures = Vec::new();
    for (parent, slot) in MATERIAL_TEXTURE_SLOTS {
        let (owner, owner_pointer) = match parent {
            Some(parent) => match pbr {
                Some(pbr) => (pbr, pointer.key(parent)),
                None => continue,
            },
            None => (obj, pointer.clone()),
        };
        if let Some(info) = cx.object(owner, &owner_pointer, slot) {
            let info_pointer = owner_pointer.key(slot);
            cx.check_properties(info, &info_pointer, &["index", "texCoord", "scale", "strength"]);
            cx.uint(info, &info_pointer, "texCoord");
            if let Some(texture) = cx.required_index(info, &info_pointer, "index", ArrayKind::Textures)
            {
                textures.push(texture);
            }
        }
    }

    Material { textures }
}

pub(super) fn parse_texture(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Texture {
    cx.check_properties(obj, pointer, &["sampler", "source"]);
    Texture {
        source: cx.index(obj, pointer, "source", ArrayKind::Images),
        sampler: cx.index(obj, pointer, "sampler", ArrayKind::Samplers),
    }
}

pub(super) fn parse_image(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Image {
    cx.check_properties(obj, pointer, &["uri", "mimeType", "bufferView"]);
    Image {
        uri: cx.string(obj, pointer, "uri").map(str::to_string),
        buffer_view: cx.index(obj, pointer, "bufferView", ArrayKind::BufferViews),
        mime_type: cx.string(obj, pointer, "mimeType").map(str::to_string),
    }
}

pub(super) fn parse_sampler(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Sampler {
    cx.check_properties(obj, pointer, &["magFilter", "minFilter", "wrapS", "wrapT"]);
    Sampler {
        mag_filter: cx.uint(obj, pointer, "magFilter"),
        min_filter: cx.uint(obj, pointer, "minFilter"),
        wrap_s: cx.uint(obj, pointer, "wrapS"),
        wrap_t: cx.uint(obj, pointer, "wrapT"),
    }
}

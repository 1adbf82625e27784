//! Unused object reporting

use crate::common::{has, run_json};
use gltfcheck::Severity;
use serde_json::json;

fn unused_pointers(result: &gltfcheck::ValidationResult) -> Vec<String> {
    result
        .issues
        .with_code("UNUSED_OBJECT")
        .filter_map(|m| m.pointer.clone())
        .collect()
}

#[tokio::test]
async fn test_unreferenced_objects_are_reported() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }, { "camera": 0 }],
        "cameras": [{ "type": "perspective", "perspective": { "yfov": 1.0, "znear": 0.1 } }],
        "meshes": [
            { "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] },
            { "primitives": [{ "attributes": { "POSITION": 1 } }] }
        ],
        "materials": [{}, {}],
        "samplers": [{}],
        "accessors": [
            { "componentType": 5126, "count": 1, "type": "VEC3" },
            { "componentType": 5126, "count": 1, "type": "VEC3" }
        ]
    }))
    .await;

    let unused = unused_pointers(&result);
    for pointer in ["/nodes/1", "/cameras/0", "/meshes/1", "/materials/1", "/samplers/0", "/accessors/1"] {
        assert!(unused.contains(&pointer.to_string()), "{} should be unused", pointer);
    }
    for pointer in ["/nodes/0", "/meshes/0", "/materials/0", "/accessors/0", "/scenes/0"] {
        assert!(!unused.contains(&pointer.to_string()), "{} should be used", pointer);
    }
    assert!(result
        .issues
        .with_code("UNUSED_OBJECT")
        .all(|m| m.severity == Severity::Information));
}

#[tokio::test]
async fn test_animation_of_used_node_is_used() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [0] }],
        "nodes": [{}, {}],
        "accessors": [
            { "componentType": 5126, "count": 2, "type": "SCALAR" },
            { "componentType": 5126, "count": 2, "type": "VEC3" },
            { "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [
            {
                "samplers": [{ "input": 0, "output": 1 }],
                "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }]
            },
            {
                "samplers": [{ "input": 0, "output": 2 }],
                "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }]
            }
        ]
    }))
    .await;

    assert!(!has(&result, "UNUSED_OBJECT", "/animations/0"));
    assert!(!has(&result, "UNUSED_OBJECT", "/accessors/1"));
    assert!(has(&result, "UNUSED_OBJECT", "/animations/1"));
    assert!(has(&result, "UNUSED_OBJECT", "/accessors/2"));
    assert_eq!(result.info.animation_count, 2);
}

#[tokio::test]
async fn test_texture_chain_reaches_buffer() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }],
        "materials": [{ "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } }],
        "textures": [{ "source": 0, "sampler": 0 }],
        "samplers": [{}],
        "images": [{ "bufferView": 0, "mimeType": "image/png" }],
        "bufferViews": [{ "buffer": 0, "byteLength": 4 }],
        "buffers": [{ "byteLength": 4, "uri": "data:application/octet-stream;base64,AAAAAA==" }],
        "accessors": [{ "componentType": 5126, "count": 1, "type": "VEC3" }]
    }))
    .await;

    assert!(unused_pointers(&result).is_empty(), "{:?}", unused_pointers(&result));
    assert!(result.info.has_textures);
    assert_eq!(result.info.material_count, 1);
}

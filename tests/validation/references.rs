//! Document structure, typed reads, index resolution and property rules

use std::sync::Arc;

use crate::common::{codes, has, run_json};
use gltfcheck::issues::ValidationMessage;
use gltfcheck::{
    Document, IssueAggregator, PropertyRules, RuleRegistry, Severity, ValidatorConfig, validate,
};
use serde_json::json;

#[tokio::test]
async fn test_missing_asset() {
    let result = run_json(&json!({})).await;
    assert!(has(&result, "UNDEFINED_PROPERTY", "/"));
    assert!(result.info.version.is_none());
}

#[tokio::test]
async fn test_top_level_shape() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": { "0": {} },
        "lights": []
    }))
    .await;

    assert!(has(&result, "TYPE_MISMATCH", "/nodes"));
    assert!(has(&result, "UNEXPECTED_PROPERTY", "/lights"));
}

#[tokio::test]
async fn test_index_classification() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [
            { "mesh": -1 },
            { "mesh": 0.5 },
            { "mesh": "0" },
            { "mesh": 3 },
            { "mesh": 0.0 }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "accessors": [{ "componentType": 5126, "count": 1, "type": "VEC3" }]
    }))
    .await;

    assert!(has(&result, "INVALID_VALUE", "/nodes/0/mesh"));
    assert!(has(&result, "TYPE_MISMATCH", "/nodes/1/mesh"));
    assert!(has(&result, "TYPE_MISMATCH", "/nodes/2/mesh"));
    assert!(has(&result, "UNRESOLVED_REFERENCE", "/nodes/3/mesh"));
    assert!(!result.issues.messages.iter().any(|m| m.pointer.as_deref() == Some("/nodes/4/mesh")));
}

#[tokio::test]
async fn test_duplicate_children() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1, 1] }, {}]
    }))
    .await;
    assert!(has(&result, "DUPLICATE_ELEMENTS", "/nodes/0/children/1"));
}

#[tokio::test]
async fn test_unresolved_attribute_accessor() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 7 } }] }]
    }))
    .await;
    assert!(has(&result, "UNRESOLVED_REFERENCE", "/meshes/0/primitives/0/attributes/POSITION"));
}

#[tokio::test]
async fn test_unexpected_entity_property() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "name": "root", "extras": {}, "colour": "red" }]
    }))
    .await;
    assert!(has(&result, "UNEXPECTED_PROPERTY", "/nodes/0/colour"));
    assert!(!has(&result, "UNEXPECTED_PROPERTY", "/nodes/0/name"));
}

#[tokio::test]
async fn test_accessor_offset_requires_view() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "accessors": [{ "componentType": 5126, "count": 1, "type": "SCALAR", "byteOffset": 4 }]
    }))
    .await;
    assert!(has(&result, "UNSATISFIED_DEPENDENCY", "/accessors/0/byteOffset"));
}

#[tokio::test]
async fn test_animation_channel_sampler_is_local() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{}],
        "accessors": [
            { "componentType": 5126, "count": 2, "type": "SCALAR" },
            { "componentType": 5126, "count": 2, "type": "VEC4" }
        ],
        "animations": [{
            "samplers": [{ "input": 0, "output": 1 }],
            "channels": [
                { "sampler": 0, "target": { "node": 0, "path": "rotation" } },
                { "sampler": 1, "target": { "node": 0, "path": "rotation" } }
            ]
        }]
    }))
    .await;
    assert!(has(&result, "UNRESOLVED_REFERENCE", "/animations/0/channels/1/sampler"));
    assert!(!has(&result, "UNRESOLVED_REFERENCE", "/animations/0/channels/0/sampler"));
}

#[tokio::test]
async fn test_asset_version_rules() {
    let result = run_json(&json!({ "asset": { "version": "3.0" } })).await;
    assert!(has(&result, "UNKNOWN_ASSET_MAJOR_VERSION", "/asset/version"));

    let result = run_json(&json!({ "asset": { "version": "2.1" } })).await;
    assert!(has(&result, "UNKNOWN_ASSET_MINOR_VERSION", "/asset/version"));

    let result = run_json(&json!({ "asset": { "version": "two" } })).await;
    assert!(has(&result, "PATTERN_MISMATCH", "/asset/version"));

    let result = run_json(&json!({ "asset": { "version": "2.0", "minVersion": "2.1" } })).await;
    assert!(has(&result, "ASSET_MIN_VERSION_GREATER_THAN_VERSION", "/asset/minVersion"));
}

#[tokio::test]
async fn test_primitive_rules() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "meshes": [{ "primitives": [{ "attributes": { "NORMAL": 0 }, "mode": 9 }] }],
        "accessors": [{ "componentType": 5126, "count": 1, "type": "VEC3" }]
    }))
    .await;
    assert!(has(&result, "MESH_PRIMITIVE_NO_POSITION", "/meshes/0/primitives/0/attributes"));
    assert!(has(&result, "VALUE_NOT_IN_RANGE", "/meshes/0/primitives/0/mode"));
}

#[tokio::test]
async fn test_byte_stride_rules() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 512 }],
        "bufferViews": [
            { "buffer": 0, "byteLength": 64, "byteStride": 2 },
            { "buffer": 0, "byteLength": 64, "byteStride": 6 },
            { "buffer": 0, "byteLength": 64, "byteStride": 256 }
        ]
    }))
    .await;
    assert!(has(&result, "VALUE_NOT_IN_RANGE", "/bufferViews/0/byteStride"));
    assert!(has(&result, "BUFFER_VIEW_INVALID_BYTE_STRIDE", "/bufferViews/1/byteStride"));
    assert!(has(&result, "VALUE_NOT_IN_RANGE", "/bufferViews/2/byteStride"));
}

struct RequireGenerator;

impl PropertyRules for RequireGenerator {
    fn name(&self) -> &'static str {
        "require-generator"
    }

    fn validate(&self, doc: &Document, issues: &mut IssueAggregator) {
        let missing = doc.asset.as_ref().is_none_or(|a| a.generator.is_none());
        if missing {
            issues.record(ValidationMessage::custom(
                "ASSET_GENERATOR_MISSING",
                Severity::Warning,
                Some(&gltfcheck::Pointer::root().key("asset")),
                "asset.generator should name the exporter.",
            ));
        }
    }
}

#[tokio::test]
async fn test_custom_rules_run_after_defaults() {
    let config = ValidatorConfig::new().with_rule(Arc::new(RequireGenerator));
    assert_eq!(config.rules().names().last(), Some(&"require-generator"));

    let result = validate(br#"{"asset":{"version":"2.0"}}"#, &config).await;
    assert!(has(&result, "ASSET_GENERATOR_MISSING", "/asset"));
    assert_eq!(result.issues.num_warnings, 1);
}

#[tokio::test]
async fn test_empty_registry_skips_property_rules() {
    let config = ValidatorConfig::new().with_rules(RuleRegistry::new());
    let result = validate(br#"{"asset":{"version":"3.0"}}"#, &config).await;
    assert!(!codes(&result).contains(&"UNKNOWN_ASSET_MAJOR_VERSION".to_string()));
}

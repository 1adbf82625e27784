//! Accessor layout and data checks over inline buffers

use crate::common::{data_uri, f32_bytes, has, run_json, u16_bytes};
use serde_json::{Value, json};

/// Document with one inline buffer, one view over all of it and one accessor
fn single_accessor(bytes: &[u8], mut view: Value, accessor: Value) -> Value {
    view["buffer"] = json!(0);
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": bytes.len(), "uri": data_uri(bytes) }],
        "bufferViews": [view],
        "accessors": [accessor]
    })
}

#[tokio::test]
async fn test_accessor_past_view_end() {
    let bytes = f32_bytes(&[0.0, 0.0]);
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 8 }),
        json!({ "bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC3" }),
    );
    let result = run_json(&doc).await;
    assert!(has(&result, "ACCESSOR_TOO_LONG", "/accessors/0/byteOffset"));
}

#[tokio::test]
async fn test_view_past_buffer_end() {
    let bytes = vec![0u8; 8];
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 16 }),
        json!({ "bufferView": 0, "componentType": 5121, "count": 4, "type": "SCALAR" }),
    );
    let result = run_json(&doc).await;
    assert!(has(&result, "BUFFER_VIEW_TOO_LONG", "/bufferViews/0/byteLength"));
}

#[tokio::test]
async fn test_stride_smaller_than_element() {
    let bytes = vec![0u8; 64];
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 64, "byteStride": 8 }),
        json!({ "bufferView": 0, "componentType": 5126, "count": 2, "type": "VEC3" }),
    );
    let result = run_json(&doc).await;
    assert!(has(&result, "ACCESSOR_SMALL_BYTESTRIDE", "/accessors/0/bufferView"));
}

#[tokio::test]
async fn test_matrix_columns_are_padded() {
    // MAT2 of unsigned bytes: two 2-byte columns padded to 4 bytes each.
    let bytes = vec![0u8; 4];
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 4 }),
        json!({ "bufferView": 0, "componentType": 5121, "count": 1, "type": "MAT2" }),
    );
    let result = run_json(&doc).await;
    assert!(has(&result, "ACCESSOR_TOO_LONG", "/accessors/0/byteOffset"));
}

#[tokio::test]
async fn test_enum_and_flag_values() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "accessors": [
            { "componentType": 1234, "count": 1, "type": "SCALAR" },
            { "componentType": 5126, "count": 1, "type": "VEC5" },
            { "componentType": 5126, "count": 1, "type": "SCALAR", "normalized": true },
            { "componentType": 5126, "count": 1, "type": "VEC3", "min": [0.0] }
        ]
    }))
    .await;
    assert!(has(&result, "INVALID_VALUE", "/accessors/0/componentType"));
    assert!(has(&result, "INVALID_VALUE", "/accessors/1/type"));
    assert!(has(&result, "ACCESSOR_NORMALIZED_INVALID", "/accessors/2/normalized"));
    assert!(has(&result, "ACCESSOR_MIN_MISMATCH", "/accessors/3/min"));
}

#[tokio::test]
async fn test_declared_bounds_against_data() {
    let bytes = f32_bytes(&[1.0, 2.0, 3.0]);
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 12 }),
        json!({
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "SCALAR",
            "min": [0.0],
            "max": [3.0]
        }),
    );
    let result = run_json(&doc).await;
    assert!(has(&result, "ACCESSOR_MIN_MISMATCH", "/accessors/0/min/0"));
    assert!(!result.issues.contains("ACCESSOR_MAX_MISMATCH"));
}

#[tokio::test]
async fn test_float_bounds_compare_in_single_precision() {
    let bytes = f32_bytes(&[0.1, 0.2]);
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 8 }),
        json!({
            "bufferView": 0,
            "componentType": 5126,
            "count": 2,
            "type": "SCALAR",
            "min": [0.1],
            "max": [0.2]
        }),
    );
    let result = run_json(&doc).await;
    assert!(!result.issues.contains("ACCESSOR_MIN_MISMATCH"));
    assert!(!result.issues.contains("ACCESSOR_MAX_MISMATCH"));
}

#[tokio::test]
async fn test_non_finite_floats() {
    let bytes = f32_bytes(&[1.0, f32::NAN, f32::INFINITY]);
    let doc = single_accessor(
        &bytes,
        json!({ "byteLength": 12 }),
        json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "SCALAR" }),
    );
    let result = run_json(&doc).await;
    assert_eq!(result.issues.with_code("ACCESSOR_INVALID_FLOAT").count(), 2);
    assert!(has(&result, "ACCESSOR_INVALID_FLOAT", "/accessors/0"));
}

/// Accessor of four zero floats with two sparse substitutions
fn sparse_doc(indices: &[u16], count: u64, sparse_count: usize) -> Value {
    let mut bytes = u16_bytes(indices);
    bytes.extend(f32_bytes(&[5.0, 7.0]));
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": bytes.len(), "uri": data_uri(&bytes) }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 4 },
            { "buffer": 0, "byteOffset": 4, "byteLength": 8 }
        ],
        "accessors": [{
            "componentType": 5126,
            "count": count,
            "type": "SCALAR",
            "sparse": {
                "count": sparse_count,
                "indices": { "bufferView": 0, "componentType": 5123 },
                "values": { "bufferView": 1 }
            }
        }]
    })
}

#[tokio::test]
async fn test_sparse_substitutions_feed_bounds() {
    let mut doc = sparse_doc(&[1, 3], 4, 2);
    doc["accessors"][0]["min"] = json!([0.0]);
    doc["accessors"][0]["max"] = json!([7.0]);
    let result = run_json(&doc).await;
    assert_eq!(result.issues.num_errors, 0, "{:?}", result.issues.messages);
}

#[tokio::test]
async fn test_sparse_indices_order_and_range() {
    let result = run_json(&sparse_doc(&[3, 1], 4, 2)).await;
    assert!(has(&result, "ACCESSOR_SPARSE_INDICES_NON_INCREASING", "/accessors/0/sparse/indices"));

    let result = run_json(&sparse_doc(&[1, 9], 4, 2)).await;
    assert!(has(&result, "ACCESSOR_SPARSE_INDEX_OOB", "/accessors/0/sparse/indices"));
}

#[tokio::test]
async fn test_sparse_count_exceeds_accessor() {
    let result = run_json(&sparse_doc(&[0, 1], 1, 2)).await;
    assert!(has(&result, "ACCESSOR_SPARSE_COUNT_OUT_OF_RANGE", "/accessors/0/sparse/count"));
}

#[tokio::test]
async fn test_sparse_views_must_be_packed() {
    let mut doc = sparse_doc(&[0, 1], 4, 2);
    doc["bufferViews"][0]["byteStride"] = json!(4);
    let result = run_json(&doc).await;
    assert!(has(
        &result,
        "ACCESSOR_SPARSE_STRIDED_BUFFER_VIEW",
        "/accessors/0/sparse/indices/bufferView"
    ));
}

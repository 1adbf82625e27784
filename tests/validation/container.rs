//! GLB framing and JSON decoding

use crate::common::{BIN_CHUNK, JSON_CHUNK, chunk, codes, glb, glb_from_chunks, has, run_glb, run_json};
use gltfcheck::{ValidatorConfig, validate};
use serde_json::json;

fn asset_json() -> Vec<u8> {
    let mut text = br#"{"asset":{"version":"2.0"}}"#.to_vec();
    while text.len() % 4 != 0 {
        text.push(b' ');
    }
    text
}

#[tokio::test]
async fn test_truncated_header() {
    let result = run_glb(b"glTF\x02\x00").await;
    assert_eq!(codes(&result), vec!["GLB_UNEXPECTED_END_OF_HEADER"]);
    assert_eq!(result.mime_type, "model/gltf-binary");
}

#[tokio::test]
async fn test_unsupported_version() {
    let mut bytes = glb(&json!({ "asset": { "version": "2.0" } }), None);
    bytes[4] = 1;
    let result = run_glb(&bytes).await;
    assert_eq!(codes(&result), vec!["GLB_INVALID_VERSION"]);
}

#[tokio::test]
async fn test_declared_length_mismatch() {
    let mut bytes = glb(&json!({ "asset": { "version": "2.0" } }), None);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    let result = run_glb(&bytes).await;
    assert_eq!(codes(&result), vec!["GLB_LENGTH_MISMATCH"]);
}

#[tokio::test]
async fn test_bin_before_json_is_fatal() {
    let bytes = glb_from_chunks(&[chunk(BIN_CHUNK, &[0; 4]), chunk(JSON_CHUNK, &asset_json())]);
    let result = run_glb(&bytes).await;
    assert_eq!(codes(&result), vec!["GLB_UNEXPECTED_FIRST_CHUNK"]);
}

#[tokio::test]
async fn test_json_chunk_past_end_is_fatal() {
    let mut json_chunk = chunk(JSON_CHUNK, &asset_json());
    json_chunk[0] = json_chunk[0].wrapping_add(64);
    let result = run_glb(&glb_from_chunks(&[json_chunk])).await;
    assert_eq!(codes(&result), vec!["GLB_UNEXPECTED_END_OF_CHUNK_DATA"]);
}

#[tokio::test]
async fn test_truncated_bin_chunk_is_recoverable() {
    let mut bin_chunk = chunk(BIN_CHUNK, &[0; 8]);
    bin_chunk[0] = 64;
    let bytes = glb_from_chunks(&[chunk(JSON_CHUNK, &asset_json()), bin_chunk]);

    let result = run_glb(&bytes).await;

    assert!(codes(&result).contains(&"GLB_UNEXPECTED_END_OF_CHUNK_DATA".to_string()));
    assert_eq!(result.info.version.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn test_trailing_partial_chunk_header() {
    let mut chunks = vec![chunk(JSON_CHUNK, &asset_json())];
    chunks.push(vec![0; 4]);
    let result = run_glb(&glb_from_chunks(&chunks)).await;

    assert!(codes(&result).contains(&"GLB_UNEXPECTED_END_OF_CHUNK_HEADER".to_string()));
    assert_eq!(result.info.version.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn test_chunk_anomalies_are_reported() {
    let bytes = glb_from_chunks(&[
        chunk(JSON_CHUNK, &asset_json()),
        chunk(0x1234_5678, &[1, 2, 3, 4]),
        chunk(JSON_CHUNK, &asset_json()),
        chunk(BIN_CHUNK, &[0; 3]),
    ]);

    let result = run_glb(&bytes).await;
    let codes = codes(&result);

    assert!(codes.contains(&"GLB_UNKNOWN_CHUNK_TYPE".to_string()));
    assert!(codes.contains(&"GLB_DUPLICATE_CHUNK".to_string()));
    assert!(codes.contains(&"GLB_CHUNK_LENGTH_UNALIGNED".to_string()));
    assert!(codes.contains(&"GLB_UNUSED_BIN_CHUNK".to_string()));
}

#[tokio::test]
async fn test_bin_chunk_binds_first_buffer() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4 }]
    });
    let result = run_glb(&glb(&json, Some(&[1, 2, 3, 4]))).await;

    assert!(!codes(&result).contains(&"BUFFER_MISSING_GLB_DATA".to_string()));
    assert!(!codes(&result).contains(&"GLB_UNUSED_BIN_CHUNK".to_string()));
}

#[tokio::test]
async fn test_missing_bin_chunk() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4 }]
    });
    let result = run_glb(&glb(&json, None)).await;
    assert!(has(&result, "BUFFER_MISSING_GLB_DATA", "/buffers/0"));
}

#[tokio::test]
async fn test_oversized_bin_chunk() {
    let json = json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4 }]
    });
    let result = run_glb(&glb(&json, Some(&[0; 12]))).await;
    assert!(has(&result, "BUFFER_GLB_CHUNK_TOO_BIG", "/buffers/0"));
}

#[tokio::test]
async fn test_invalid_json() {
    let result = validate(b"{\"asset\":", &ValidatorConfig::new()).await;
    assert_eq!(codes(&result), vec!["INVALID_JSON"]);
    assert_eq!(result.mime_type, "model/gltf+json");
}

#[tokio::test]
async fn test_invalid_utf8() {
    let result = validate(b"{\"asset\":\"\xff\"}", &ValidatorConfig::new()).await;
    assert_eq!(codes(&result), vec!["INVALID_UTF8"]);
}

#[tokio::test]
async fn test_root_must_be_object() {
    let result = run_json(&json!([1, 2, 3])).await;
    assert_eq!(codes(&result), vec!["INVALID_JSON_ROOT_OBJECT"]);
}

#[tokio::test]
async fn test_byte_order_mark_is_accepted() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"asset":{"version":"2.0"}}"#);
    let result = validate(&bytes, &ValidatorConfig::new()).await;
    assert_eq!(result.issues.num_errors, 0);
}

#[tokio::test]
async fn test_magic_sniffing_without_uri() {
    let bytes = glb(&json!({ "asset": { "version": "2.0" } }), None);
    let result = validate(&bytes, &ValidatorConfig::new()).await;
    assert_eq!(result.mime_type, "model/gltf-binary");
    assert_eq!(result.issues.num_errors, 0);
}

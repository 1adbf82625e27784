//! Buffer resolution: data URIs, external URIs and injected loaders

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::common::{has, run_json, triangle};
use gltfcheck::{FnLoader, LoadError, ResourceLoader, Severity, Validator, ValidatorConfig};
use serde_json::json;

/// Loader over an in-memory file table
#[derive(Default)]
struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
}

impl ResourceLoader for MemoryLoader {
    async fn load(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(uri)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(uri.to_string()))
    }
}

fn external(uri: &str, byte_length: usize) -> serde_json::Value {
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": uri, "byteLength": byte_length }]
    })
}

#[tokio::test]
async fn test_external_buffer_without_loader() {
    let result = run_json(&external("mesh.bin", 4)).await;
    assert!(has(&result, "EXTERNAL_RESOURCE_SKIPPED", "/buffers/0/uri"));
    assert_eq!(result.issues.num_errors, 0);
}

#[tokio::test]
async fn test_external_triangle_through_loader() {
    let (json, bin) = triangle(Some("triangle bin/data.bin".replace(' ', "%20")));
    let loader = MemoryLoader {
        files: HashMap::from([("triangle bin/data.bin".to_string(), bin)]),
    };
    let validator = Validator::new(ValidatorConfig::new().with_uri("triangle.gltf"))
        .with_loader(loader);

    let bytes = serde_json::to_vec(&json).unwrap();
    let result = validator.validate(&bytes).await;

    assert!(
        result.issues.messages.is_empty(),
        "unexpected messages: {:?}",
        result.issues.messages
    );
    assert_eq!(result.info.total_triangle_count, 1);
}

#[tokio::test]
async fn test_loader_failure_is_io_error() {
    let validator = Validator::new(ValidatorConfig::new()).with_loader(MemoryLoader::default());
    let bytes = serde_json::to_vec(&external("missing.bin", 4)).unwrap();

    let result = validator.validate(&bytes).await;

    assert!(has(&result, "IO_ERROR", "/buffers/0/uri"));
}

#[tokio::test]
async fn test_closure_loader_and_length_mismatch() {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let loader = FnLoader::new(move |_uri: String| {
        *counter.lock().unwrap() += 1;
        async move { Ok::<_, LoadError>(vec![0u8; 6]) }
    });
    let validator = Validator::new(ValidatorConfig::new()).with_loader(loader);
    let bytes = serde_json::to_vec(&external("short.bin", 8)).unwrap();

    let result = validator.validate(&bytes).await;

    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(has(&result, "BUFFER_BYTE_LENGTH_MISMATCH", "/buffers/0/byteLength"));
}

#[tokio::test]
async fn test_absolute_uris_are_not_fetched() {
    let loader = MemoryLoader::default();
    let validator = Validator::new(ValidatorConfig::new()).with_loader(loader);
    let bytes = serde_json::to_vec(&external("https://example.com/mesh.bin", 4)).unwrap();

    let result = validator.validate(&bytes).await;

    assert!(has(&result, "UNSUPPORTED_URI_SCHEME", "/buffers/0/uri"));
}

#[tokio::test]
async fn test_data_uri_problems() {
    let result = run_json(&external("data:text/plain;base64,AAAAAA==", 4)).await;
    assert!(has(&result, "BUFFER_DATA_URI_MIME_TYPE_INVALID", "/buffers/0/uri"));

    let result = run_json(&external("data:application/octet-stream;base64,@@@@", 3)).await;
    assert!(has(&result, "INVALID_URI", "/buffers/0/uri"));

    let result = run_json(&external("data:application/gltf-buffer;base64,AAAAAA==", 8)).await;
    assert!(has(&result, "BUFFER_BYTE_LENGTH_MISMATCH", "/buffers/0/byteLength"));
}

#[tokio::test]
async fn test_buffer_without_uri_outside_glb() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 4 }]
    }))
    .await;
    assert!(has(&result, "UNDEFINED_PROPERTY", "/buffers/0/uri"));
}

#[tokio::test]
async fn test_image_uris_are_checked() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "images": [
            { "uri": "ftp://example.com/a.png" },
            { "uri": "data:image/png;base64" },
            { "uri": "textures/albedo.png" }
        ]
    }))
    .await;
    assert!(has(&result, "UNSUPPORTED_URI_SCHEME", "/images/0/uri"));
    assert!(has(&result, "INVALID_URI", "/images/1/uri"));
    assert!(!has(&result, "INVALID_URI", "/images/2/uri"));
}

#[tokio::test]
async fn test_skipped_resource_severity_can_be_raised() {
    let config = ValidatorConfig::new()
        .with_severity_override("EXTERNAL_RESOURCE_SKIPPED", Severity::Error);
    let bytes = serde_json::to_vec(&external("mesh.bin", 4)).unwrap();

    let result = gltfcheck::validate(&bytes, &config).await;

    assert_eq!(result.issues.num_errors, 1);
}

//! Severity overrides, filters, truncation and result serialization

use crate::common::run_json;
use gltfcheck::{Severity, ValidatorConfig, validate};
use serde_json::{Value, json};

/// Two unused nodes, one unresolved mesh reference and one unexpected property
fn noisy_document() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "mesh": 4 }, {}],
        "extraStuff": true
    }))
    .unwrap()
}

#[tokio::test]
async fn test_default_severities() {
    let result = validate(&noisy_document(), &ValidatorConfig::new()).await;
    assert_eq!(result.issues.num_errors, 1);
    assert_eq!(result.issues.num_warnings, 1);
    assert_eq!(result.issues.num_infos, 2);
    assert_eq!(result.issues.num_hints, 0);
    assert!(!result.issues.truncated);
}

#[tokio::test]
async fn test_severity_override() {
    let config = ValidatorConfig::new()
        .with_severity_overrides_by_name([("UNUSED_OBJECT", "hint"), ("INVALID_JSON", "bogus")]);
    let result = validate(&noisy_document(), &config).await;
    assert_eq!(result.issues.num_infos, 0);
    assert_eq!(result.issues.num_hints, 2);
    assert!(result
        .issues
        .with_code("UNUSED_OBJECT")
        .all(|m| m.severity == Severity::Hint));
}

#[tokio::test]
async fn test_only_and_ignored_filters() {
    let config = ValidatorConfig::new().with_only_issues(["UNRESOLVED_REFERENCE"]);
    let result = validate(&noisy_document(), &config).await;
    assert_eq!(result.issues.messages.len(), 1);
    assert_eq!(result.issues.messages[0].code, "UNRESOLVED_REFERENCE");

    let config = ValidatorConfig::new().with_ignored_issue("UNUSED_OBJECT");
    let result = validate(&noisy_document(), &config).await;
    assert!(!result.issues.contains("UNUSED_OBJECT"));
    assert_eq!(result.issues.messages.len(), 2);
}

#[tokio::test]
async fn test_truncation_keeps_counters_consistent() {
    let config = ValidatorConfig::new().with_max_issues(2);
    let result = validate(&noisy_document(), &config).await;

    let set = &result.issues;
    assert!(set.truncated);
    assert_eq!(set.messages.len(), 2);
    assert_eq!(
        set.num_errors + set.num_warnings + set.num_infos + set.num_hints,
        set.messages.len()
    );
}

#[tokio::test]
async fn test_filtered_messages_do_not_count_toward_limit() {
    let config = ValidatorConfig::new()
        .with_ignored_issue("UNEXPECTED_PROPERTY")
        .with_ignored_issue("UNRESOLVED_REFERENCE")
        .with_max_issues(2);
    let result = validate(&noisy_document(), &config).await;
    assert_eq!(result.issues.messages.len(), 2);
    assert!(!result.issues.truncated);
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let config = ValidatorConfig::new().with_uri("noisy.gltf");
    let first = validate(&noisy_document(), &config).await;
    let second = validate(&noisy_document(), &config).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_result_serialization() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [999] }]
    }))
    .await;

    let value: Value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["uri"], "test.gltf");
    assert_eq!(value["mimeType"], "model/gltf+json");
    assert!(value["validatorVersion"].is_string());
    assert_eq!(value["issues"]["numErrors"], 1);
    assert_eq!(value["issues"]["truncated"], false);

    let message = &value["issues"]["messages"][0];
    assert_eq!(message["code"], "UNRESOLVED_REFERENCE");
    assert_eq!(message["severity"], 0);
    assert_eq!(message["pointer"], "/scenes/0/nodes/0");
    assert!(message["message"].is_string());

    assert_eq!(value["info"]["version"], "2.0");
    assert_eq!(value["info"]["drawCallCount"], 0);
}

#[tokio::test]
async fn test_container_failure_serializes_without_pointer() {
    let result = validate(b"not json", &ValidatorConfig::new()).await;
    let value: Value = serde_json::to_value(&result).unwrap();
    assert!(value.get("uri").is_none());
    assert!(value["issues"]["messages"][0].get("pointer").is_none());
}

//! Node hierarchy, cycles and skins

use crate::common::{has, run_json};
use serde_json::json;

#[tokio::test]
async fn test_self_child_is_a_loop() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [0] }]
    }))
    .await;
    assert!(has(&result, "NODE_LOOP", "/nodes/0/children/0"));
}

#[tokio::test]
async fn test_two_node_cycle_terminates() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1] }, { "children": [0] }],
        "scenes": [{ "nodes": [0] }]
    }))
    .await;

    let loops = result.issues.with_code("NODE_LOOP").count();
    assert_eq!(loops, 1);
}

#[tokio::test]
async fn test_second_parent_overrides() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [2] }, { "children": [2] }, {}]
    }))
    .await;
    assert!(has(&result, "NODE_PARENT_OVERRIDE", "/nodes/1/children/0"));
    assert!(!has(&result, "NODE_PARENT_OVERRIDE", "/nodes/0/children/0"));
}

#[tokio::test]
async fn test_roots_checked_per_scene() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1] }, {}],
        "scenes": [{ "nodes": [0] }, { "nodes": [1] }]
    }))
    .await;
    assert!(has(&result, "SCENE_NON_ROOT_NODE", "/scenes/1/nodes/0"));
    assert!(!has(&result, "SCENE_NON_ROOT_NODE", "/scenes/0/nodes/0"));
}

#[tokio::test]
async fn test_deep_hierarchy() {
    let count = 20_000;
    let nodes: Vec<_> = (0..count)
        .map(|i| {
            if i + 1 < count {
                json!({ "children": [i + 1] })
            } else {
                json!({})
            }
        })
        .collect();
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": nodes,
        "scenes": [{ "nodes": [0] }]
    }))
    .await;
    assert_eq!(result.issues.num_errors, 0);
}

#[tokio::test]
async fn test_skeleton_must_be_joint_ancestor() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1] }, {}, {}],
        "skins": [{ "joints": [1, 2], "skeleton": 0 }]
    }))
    .await;
    assert!(!has(&result, "SKIN_SKELETON_INVALID", "/skins/0/joints/0"));
    assert!(has(&result, "SKIN_SKELETON_INVALID", "/skins/0/joints/1"));
}

#[tokio::test]
async fn test_joints_without_common_root() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1] }, {}, {}],
        "skins": [{ "joints": [1, 2] }]
    }))
    .await;
    assert!(has(&result, "SKIN_NO_COMMON_ROOT", "/skins/0/joints"));

    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "children": [1, 2] }, {}, {}],
        "skins": [{ "joints": [1, 2] }]
    }))
    .await;
    assert!(!result.issues.contains("SKIN_NO_COMMON_ROOT"));
}

#[tokio::test]
async fn test_skin_requires_joints() {
    let result = run_json(&json!({
        "asset": { "version": "2.0" },
        "skins": [{}]
    }))
    .await;
    assert!(has(&result, "UNDEFINED_PROPERTY", "/skins/0"));
}

//! Scenes, nodes, skins and cameras

use super::resolver::Context;
use crate::model::{ArrayKind, Camera, Node, Scene, Skin};
use crate::pointer::Pointer;
use serde_json::{Map, Value};

pub(super) fn parse_scene(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Scene {
    cx.check_properties(obj, pointer, &["nodes"]);
    Scene {
        nodes: cx.index_array(obj, pointer, "nodes", ArrayKind::Nodes),
    }
}

pub(super) fn parse_node(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Node {
    cx.check_properties(
        obj,
        pointer,
        &[
            "camera",
            "children",
            "skin",
            "matrix",
            "mesh",
            "rotation",
            "scale",
            "translation",
            "weights",
        ],
    );
    for key in ["matrix", "rotation", "scale", "translation", "weights"] {
        cx.number_array(obj, pointer, key);
    }
    Node {
        children: cx.index_array(obj, pointer, "children", ArrayKind::Nodes),
        mesh: cx.index(obj, pointer, "mesh", ArrayKind::Meshes),
        camera: cx.index(obj, pointer, "camera", ArrayKind::Cameras),
        skin: cx.index(obj, pointer, "skin", ArrayKind::Skins),
    }
}

pub(super) fn parse_skin(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Skin {
    cx.check_properties(obj, pointer, &["inverseBindMatrices", "skeleton", "joints"]);
    if !obj.contains_key("joints") {
        cx.undefined(pointer, "joints");
    }
    Skin {
        joints: cx.index_array(obj, pointer, "joints", ArrayKind::Nodes),
        skeleton: cx.index(obj, pointer, "skeleton", ArrayKind::Nodes),
        inverse_bind_matrices: cx.index(obj, pointer, "inverseBindMatrices", ArrayKind::Accessors),
    }
}

pub(super) fn parse_camera(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Camera {
    cx.check_properties(obj, pointer, &["orthographic", "perspective", "type"]);
    cx.object(obj, pointer, "orthographic");
    cx.object(obj, pointer, "perspective");
    Camera {
        camera_type: cx.required_string(obj, pointer, "type").map(str::to_string),
    }
}

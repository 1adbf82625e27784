//! Buffers, buffer views and accessors

use super::resolver::Context;
use crate::issues::IssueCode;
use crate::model::{
    Accessor, ArrayKind, Buffer, BufferView, ComponentType, ElementType, Sparse, SparseIndices,
    SparseValues,
};
use crate::pointer::Pointer;
use serde_json::{Map, Value};

pub(super) fn parse_buffer(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Buffer {
    cx.check_properties(obj, pointer, &["uri", "byteLength"]);
    Buffer {
        uri: cx.string(obj, pointer, "uri").map(str::to_string),
        byte_length: cx.uint_at_least(obj, pointer, "byteLength", 1, true),
    }
}

pub(super) fn parse_buffer_view(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> BufferView {
    cx.check_properties(
        obj,
        pointer,
        &["buffer", "byteOffset", "byteLength", "byteStride", "target"],
    );
    BufferView {
        buffer: cx.required_index(obj, pointer, "buffer", ArrayKind::Buffers),
        byte_offset: cx.uint(obj, pointer, "byteOffset").unwrap_or(0),
        byte_length: cx.uint_at_least(obj, pointer, "byteLength", 1, true),
        byte_stride: cx.uint(obj, pointer, "byteStride"),
        target: cx.uint(obj, pointer, "target"),
    }
}

pub(super) fn parse_accessor(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Accessor {
    cx.check_properties(
        obj,
        pointer,
        &[
            "bufferView",
            "byteOffset",
            "componentType",
            "normalized",
            "count",
            "type",
            "max",
            "min",
            "sparse",
        ],
    );

    let buffer_view = cx.index(obj, pointer, "bufferView", ArrayKind::BufferViews);
    let byte_offset = cx.uint(obj, pointer, "byteOffset");
    if byte_offset.is_some() && !obj.contains_key("bufferView") {
        cx.issues.add(
            IssueCode::UnsatisfiedDependency,
            &pointer.key("byteOffset"),
            "Dependency failed. 'bufferView' must be defined.",
        );
    }

    Accessor {
        buffer_view,
        byte_offset,
        component_type: cx
            .required_uint(obj, pointer, "componentType")
            .map(ComponentType::from_gl),
        count: cx.uint_at_least(obj, pointer, "count", 1, true),
        element_type: cx
            .required_string(obj, pointer, "type")
            .map(ElementType::parse),
        normalized: cx.boolean(obj, pointer, "normalized").unwrap_or(false),
        min: cx.number_array(obj, pointer, "min"),
        max: cx.number_array(obj, pointer, "max"),
        sparse: cx
            .object(obj, pointer, "sparse")
            .map(|sparse| parse_sparse(cx, sparse, &pointer.key("sparse"))),
    }
}

fn parse_sparse(cx: &mut Context<'_>, obj: &Map<String, Value>, pointer: &Pointer) -> Sparse {
    cx.check_properties(obj, pointer, &["count", "indices", "values"]);
    let count = cx.uint_at_least(obj, pointer, "count", 1, true);

    let indices = cx.required_object(obj, pointer, "indices").map(|indices| {
        let p = pointer.key("indices");
        cx.check_properties(indices, &p, &["bufferView", "byteOffset", "componentType"]);
        SparseIndices {
            buffer_view: cx.required_index(indices, &p, "bufferView", ArrayKind::BufferViews),
            byte_offset: cx.uint(indices, &p, "byteOffset").unwrap_or(0),
            component_type: cx
                .required_uint(indices, &p, "componentType")
                .map(ComponentType::from_gl),
        }
    });

    let values = cx.required_object(obj, pointer, "values").map(|values| {
        let p = pointer.key("values");
        cx.check_properties(values, &p, &["bufferView", "byteOffset"]);
        SparseValues {
            buffer_view: cx.required_index(values, &p, "bufferView", ArrayKind::BufferViews),
            byte_offset: cx.uint(values, &p, "byteOffset").unwrap_or(0),
        }
    });

    Sparse {
        count,
        indices,
        values,
    }
}

//! Accessor and buffer-view layout
//!
//! Byte arithmetic for every accessor: component and element sizes,
//! effective stride, required span and alignment, checked against the
//! owning buffer view and the resolved buffer window. Sparse index and
//! value descriptors go through the same checks.

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{Accessor, ArrayKind, BufferView, ComponentType, Document, ElementType};
use crate::pointer::Pointer;
use crate::resources::BufferData;

/// Size used for unrecognized component types so arithmetic stays defined
const FALLBACK_COMPONENT_SIZE: u64 = 1;

/// Byte layout of one accessor element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorLayout {
    /// Bytes per component
    pub component_size: u64,
    /// Components per element
    pub component_count: u64,
    /// Rows per matrix column; 0 for non-matrix types
    pub matrix_rows: u64,
    /// Bytes per element, including matrix column padding
    pub element_length: u64,
}

impl AccessorLayout {
    /// Layout for a component and element type
    ///
    /// Matrix columns start on 4-byte boundaries, so `MAT2` of bytes takes
    /// 8 bytes and `MAT3` of bytes or shorts 12 and 24.
    pub fn new(component: ComponentType, element: &ElementType) -> Self {
        let component_size = component.size().unwrap_or(FALLBACK_COMPONENT_SIZE);
        let component_count = element.component_count().unwrap_or(1);
        let matrix_rows = element.matrix_rows().unwrap_or(0);
        let element_length = if matrix_rows > 0 {
            let column = (matrix_rows * component_size).next_multiple_of(4);
            column * matrix_rows
        } else {
            component_size * component_count
        };
        Self {
            component_size,
            component_count,
            matrix_rows,
            element_length,
        }
    }

    /// Stride of a view, or tightly packed elements
    pub fn stride(&self, view: &BufferView) -> u64 {
        view.byte_stride.unwrap_or(self.element_length)
    }

    /// Bytes spanned by `count` elements at `stride`
    pub fn span(&self, count: u64, stride: u64) -> u64 {
        if count == 0 {
            return 0;
        }
        (count - 1)
            .saturating_mul(stride)
            .saturating_add(self.element_length)
    }

    /// Offset of component `c` within an element
    pub fn component_offset(&self, c: u64) -> u64 {
        if self.matrix_rows > 0 {
            let column = (self.matrix_rows * self.component_size).next_multiple_of(4);
            (c / self.matrix_rows) * column + (c % self.matrix_rows) * self.component_size
        } else {
            c * self.component_size
        }
    }
}

/// Layout of an accessor that declares both types
pub fn accessor_layout(accessor: &Accessor) -> Option<AccessorLayout> {
    let component = accessor.component_type?;
    let element = accessor.element_type.as_ref()?;
    Some(AccessorLayout::new(component, element))
}

/// Check every buffer view and accessor
pub fn check(doc: &Document, buffers: &BufferData, issues: &mut IssueAggregator) {
    for (i, view) in doc.buffer_views.iter().enumerate() {
        check_buffer_view(i, view, buffers, issues);
    }
    for (i, accessor) in doc.accessors.iter().enumerate() {
        check_accessor(doc, i, accessor, issues);
    }
    tracing::debug!(
        buffer_views = doc.buffer_views.len(),
        accessors = doc.accessors.len(),
        "layout checked"
    );
}

fn check_buffer_view(i: usize, view: &BufferView, buffers: &BufferData, issues: &mut IssueAggregator) {
    let (Some(buffer), Some(length)) = (view.buffer, view.byte_length) else {
        return;
    };
    let Some(available) = buffers.safe_length(buffer) else {
        return;
    };
    let end = view.byte_offset.saturating_add(length);
    if end > available {
        issues.add(
            IssueCode::BufferViewTooLong,
            &ArrayKind::BufferViews.pointer(i).key("byteLength"),
            format!(
                "BufferView does not fit buffer ({}) byteLength ({}).",
                buffer, available
            ),
        );
    }
}

fn check_accessor(doc: &Document, i: usize, accessor: &Accessor, issues: &mut IssueAggregator) {
    let pointer = ArrayKind::Accessors.pointer(i);

    if let Some(ComponentType::Unknown(value)) = accessor.component_type {
        issues.add(
            IssueCode::InvalidValue,
            &pointer.key("componentType"),
            format!("Invalid value {} for componentType.", value),
        );
    }
    if let Some(ElementType::Unknown(name)) = &accessor.element_type {
        issues.add(
            IssueCode::InvalidValue,
            &pointer.key("type"),
            format!("Invalid value '{}' for type.", name),
        );
    }

    if accessor.normalized
        && matches!(
            accessor.component_type,
            Some(ComponentType::Float | ComponentType::UnsignedInt)
        )
    {
        issues.add(
            IssueCode::AccessorNormalizedInvalid,
            &pointer.key("normalized"),
            "Only (u)byte and (u)short accessors can be normalized.",
        );
    }

    let Some(layout) = accessor_layout(accessor) else {
        return;
    };
    let types_known = accessor.component_type.and_then(|c| c.size()).is_some()
        && accessor
            .element_type
            .as_ref()
            .and_then(|e| e.component_count())
            .is_some();

    if let Some(element) = accessor.element_type.as_ref().filter(|_| types_known) {
        for (key, values, code) in [
            ("min", &accessor.min, IssueCode::AccessorMinMismatch),
            ("max", &accessor.max, IssueCode::AccessorMaxMismatch),
        ] {
            if let Some(values) = values {
                if values.len() as u64 != layout.component_count {
                    issues.add(
                        code,
                        &pointer.key(key),
                        format!(
                            "Invalid array length {} for {} accessor. Valid lengths are: {}.",
                            values.len(),
                            element.as_str(),
                            layout.component_count
                        ),
                    );
                }
            }
        }
    }

    if let Some(view_index) = accessor.buffer_view {
        let view = &doc.buffer_views[view_index];
        check_window(
            &pointer,
            view,
            accessor.offset(),
            accessor.count.unwrap_or(0),
            layout.stride(view),
            &layout,
            types_known,
            issues,
        );
        if let Some(stride) = view.byte_stride {
            if stride < layout.element_length {
                issues.add(
                    IssueCode::AccessorSmallByteStride,
                    &pointer.key("bufferView"),
                    format!(
                        "Referenced bufferView's byteStride value {} is less than accessor element's length {}.",
                        stride, layout.element_length
                    ),
                );
            }
        }
    }

    if let Some(sparse) = &accessor.sparse {
        check_sparse(doc, &pointer, accessor, sparse, &layout, types_known, issues);
    }
}

/// Alignment and bounds of `count` elements at `offset` inside `view`
///
/// A `stride` below the element length is reported elsewhere; the span is
/// computed with the element length in that case.
#[allow(clippy::too_many_arguments)]
fn check_window(
    owner: &Pointer,
    view: &BufferView,
    offset: u64,
    count: u64,
    stride: u64,
    layout: &AccessorLayout,
    aligned_check: bool,
    issues: &mut IssueAggregator,
) {
    let absolute = view.byte_offset.saturating_add(offset);
    if aligned_check && absolute % layout.component_size != 0 {
        issues.add(
            IssueCode::AccessorOffsetAlignment,
            &owner.key("byteOffset"),
            format!(
                "Offset {} is not a multiple of componentType length {}.",
                absolute, layout.component_size
            ),
        );
    }

    let Some(view_length) = view.byte_length else {
        return;
    };
    if count == 0 {
        return;
    }
    let stride = stride.max(layout.element_length);
    let required = offset.saturating_add(layout.span(count, stride));
    if required > view_length {
        issues.add(
            IssueCode::AccessorTooLong,
            &owner.key("byteOffset"),
            format!(
                "Accessor (offset: {}, length: {}) does not fit referenced bufferView byteLength {}.",
                offset,
                required - offset,
                view_length
            ),
        );
    }
}

fn check_sparse(
    doc: &Document,
    pointer: &Pointer,
    accessor: &Accessor,
    sparse: &crate::model::Sparse,
    layout: &AccessorLayout,
    types_known: bool,
    issues: &mut IssueAggregator,
) {
    let pointer = pointer.key("sparse");
    let count = sparse.count.unwrap_or(0);
    if let Some(accessor_count) = accessor.count {
        if count > accessor_count {
            issues.add(
                IssueCode::AccessorSparseCountOutOfRange,
                &pointer.key("count"),
                format!(
                    "Sparse accessor overrides more elements ({}) than the base accessor contains ({}).",
                    count, accessor_count
                ),
            );
        }
    }

    if let Some(indices) = &sparse.indices {
        let indices_pointer = pointer.key("indices");
        let component = indices.component_type;
        let valid_component = component.is_some_and(|c| c.is_unsigned_integer());
        if let Some(component) = component {
            if !valid_component {
                issues.add(
                    IssueCode::InvalidValue,
                    &indices_pointer.key("componentType"),
                    format!(
                        "Invalid value {} ({}) for sparse indices componentType; must be an unsigned integer type.",
                        component.gl(),
                        component.name()
                    ),
                );
            }
        }
        if let Some(view_index) = indices.buffer_view {
            let view = &doc.buffer_views[view_index];
            check_unstrided(view, &indices_pointer, issues);
            if let Some(component) = component.filter(|_| valid_component) {
                let index_layout = AccessorLayout::new(component, &ElementType::Scalar);
                check_window(
                    &indices_pointer,
                    view,
                    indices.byte_offset,
                    count,
                    index_layout.element_length,
                    &index_layout,
                    true,
                    issues,
                );
            }
        }
    }

    if let Some(values) = &sparse.values {
        let values_pointer = pointer.key("values");
        if let Some(view_index) = values.buffer_view {
            let view = &doc.buffer_views[view_index];
            check_unstrided(view, &values_pointer, issues);
            check_window(
                &values_pointer,
                view,
                values.byte_offset,
                count,
                layout.element_length,
                layout,
                types_known,
                issues,
            );
        }
    }
}

fn check_unstrided(view: &BufferView, pointer: &Pointer, issues: &mut IssueAggregator) {
    if view.byte_stride.is_some() {
        issues.add(
            IssueCode::AccessorSparseStridedBufferView,
            &pointer.key("bufferView"),
            "Buffer views referenced by sparse indices or values cannot have byteStride.",
        );
    }
}

//! Accessor data checks
//!
//! Runs only where an accessor's bytes are fully available: the buffer is
//! resolved and every window the accessor reads lies inside it. Anything
//! less and the accessor is skipped silently; the layout stage has already
//! reported why.

use std::collections::HashSet;

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{Accessor, ArrayKind, BufferView, ComponentType, Document, ElementType, Sparse};
use crate::pointer::Pointer;
use crate::resources::BufferData;

use super::layout::{AccessorLayout, accessor_layout};

/// Elements of one accessor (or sparse descriptor) inside a buffer view
struct Window<'a> {
    /// Bytes of the buffer view
    bytes: &'a [u8],
    start: u64,
    stride: u64,
}

impl<'a> Window<'a> {
    /// Clip a view and check that `count` elements starting at `offset` fit
    fn new(
        view: &BufferView,
        buffers: &'a BufferData,
        offset: u64,
        count: u64,
        stride: u64,
        layout: &AccessorLayout,
    ) -> Option<Self> {
        let bytes = buffers.bytes(view.buffer?)?;
        let view_length = view.byte_length?;
        if stride < layout.element_length {
            return None;
        }
        if offset.checked_add(layout.span(count, stride))? > view_length {
            return None;
        }
        let view_end = view.byte_offset.checked_add(view_length)?;
        if view_end > bytes.len() as u64 {
            return None;
        }
        Some(Window {
            bytes: &bytes[view.byte_offset as usize..view_end as usize],
            start: offset,
            stride,
        })
    }

    fn read(
        &self,
        layout: &AccessorLayout,
        component: ComponentType,
        element: u64,
        c: u64,
    ) -> Option<f64> {
        let at = self.start + element * self.stride + layout.component_offset(c);
        read_component(self.bytes, at as usize, component)
    }
}

/// Read one little-endian component as `f64`
fn read_component(bytes: &[u8], at: usize, component: ComponentType) -> Option<f64> {
    let size = component.size()? as usize;
    let raw = bytes.get(at..at.checked_add(size)?)?;
    let value = match component {
        ComponentType::Byte => raw[0] as i8 as f64,
        ComponentType::UnsignedByte => raw[0] as f64,
        ComponentType::Short => i16::from_le_bytes([raw[0], raw[1]]) as f64,
        ComponentType::UnsignedShort => u16::from_le_bytes([raw[0], raw[1]]) as f64,
        ComponentType::UnsignedInt => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
        ComponentType::Float => f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
        ComponentType::Unknown(_) => return None,
    };
    Some(value)
}

/// Running per-component extrema
struct Extrema {
    min: Vec<f64>,
    max: Vec<f64>,
    seen: bool,
}

impl Extrema {
    fn new(components: usize) -> Self {
        Self {
            min: vec![f64::INFINITY; components],
            max: vec![f64::NEG_INFINITY; components],
            seen: false,
        }
    }

    fn update(&mut self, values: &[f64]) {
        for (c, &value) in values.iter().enumerate() {
            if value.is_finite() {
                self.min[c] = self.min[c].min(value);
                self.max[c] = self.max[c].max(value);
            }
        }
        self.seen = true;
    }
}

/// Check the data of every accessor
pub fn check(doc: &Document, buffers: &BufferData, issues: &mut IssueAggregator) {
    let mut checked = 0usize;
    for (i, accessor) in doc.accessors.iter().enumerate() {
        if check_accessor(doc, buffers, i, accessor, issues) {
            checked += 1;
        }
    }
    tracing::debug!(accessors = checked, "accessor data checked");
}

/// Returns whether the accessor's data could be read
fn check_accessor(
    doc: &Document,
    buffers: &BufferData,
    i: usize,
    accessor: &Accessor,
    issues: &mut IssueAggregator,
) -> bool {
    let (Some(component), Some(element), Some(count)) = (
        accessor.component_type,
        accessor.element_type.as_ref(),
        accessor.count,
    ) else {
        return false;
    };
    if component.size().is_none() || element.component_count().is_none() {
        return false;
    }
    let Some(layout) = accessor_layout(accessor) else {
        return false;
    };
    let pointer = ArrayKind::Accessors.pointer(i);
    let components = layout.component_count as usize;

    let base = match accessor.buffer_view {
        Some(v) => {
            let view = &doc.buffer_views[v];
            match Window::new(view, buffers, accessor.offset(), count, layout.stride(view), &layout) {
                Some(window) => Some(window),
                None => return false,
            }
        }
        None => None,
    };

    // Sparse substitutions: (element index, values slot)
    let mut substitutions: Vec<(u64, u64)> = Vec::new();
    let mut sparse_values = None;
    if let Some(sparse) = &accessor.sparse {
        match read_sparse(doc, buffers, &pointer, sparse, count, &layout, issues) {
            Some((subs, values)) => {
                substitutions = subs;
                sparse_values = Some(values);
            }
            None => return false,
        }
    }
    let substituted: HashSet<u64> = substitutions.iter().map(|&(k, _)| k).collect();

    let mut extrema = Extrema::new(components);
    let mut element_values = vec![0.0; components];

    match &base {
        Some(window) => {
            for k in 0..count {
                if substituted.contains(&k) {
                    continue;
                }
                if !read_element(window, &layout, component, k, &mut element_values) {
                    return false;
                }
                check_floats(&element_values, &pointer, k, issues);
                extrema.update(&element_values);
            }
        }
        None => {
            // Elements without a buffer view are zero-initialized.
            if count > substituted.len() as u64 {
                extrema.update(&vec![0.0; components]);
            }
        }
    }

    if let Some(values) = &sparse_values {
        let values_pointer = pointer.key("sparse").key("values");
        for &(_, slot) in &substitutions {
            if !read_element(values, &layout, component, slot, &mut element_values) {
                return false;
            }
            check_floats(&element_values, &values_pointer, slot, issues);
            extrema.update(&element_values);
        }
    }

    if extrema.seen {
        compare_bounds(accessor, component, &extrema, &pointer, issues);
    }
    true
}

fn read_element(
    window: &Window<'_>,
    layout: &AccessorLayout,
    component: ComponentType,
    element: u64,
    out: &mut [f64],
) -> bool {
    for (c, slot) in out.iter_mut().enumerate() {
        match window.read(layout, component, element, c as u64) {
            Some(value) => *slot = value,
            None => return false,
        }
    }
    true
}

fn check_floats(values: &[f64], pointer: &Pointer, element: u64, issues: &mut IssueAggregator) {
    if values.iter().any(|v| !v.is_finite()) {
        issues.add(
            IssueCode::AccessorInvalidFloat,
            pointer,
            format!("Accessor element at index {} is NaN or Infinity.", element),
        );
    }
}

/// Read and check sparse indices; returns the valid substitutions and the
/// values window, or `None` when either side is unavailable
fn read_sparse<'a>(
    doc: &Document,
    buffers: &'a BufferData,
    pointer: &Pointer,
    sparse: &Sparse,
    accessor_count: u64,
    layout: &AccessorLayout,
    issues: &mut IssueAggregator,
) -> Option<(Vec<(u64, u64)>, Window<'a>)> {
    let count = sparse.count?;
    let indices = sparse.indices.as_ref()?;
    let values = sparse.values.as_ref()?;
    let index_type = indices.component_type.filter(|c| c.is_unsigned_integer())?;

    let index_layout = AccessorLayout::new(index_type, &ElementType::Scalar);
    let index_view = &doc.buffer_views[indices.buffer_view?];
    let index_window = Window::new(
        index_view,
        buffers,
        indices.byte_offset,
        count,
        index_layout.element_length,
        &index_layout,
    )?;
    let values_view = &doc.buffer_views[values.buffer_view?];
    let values_window = Window::new(
        values_view,
        buffers,
        values.byte_offset,
        count,
        layout.element_length,
        layout,
    )?;

    let indices_pointer = pointer.key("sparse").key("indices");
    let mut substitutions = Vec::with_capacity(count as usize);
    let mut previous: Option<u64> = None;
    for j in 0..count {
        let index = index_window.read(&index_layout, index_type, j, 0)? as u64;
        if previous.is_some_and(|p| index <= p) {
            issues.add(
                IssueCode::AccessorSparseIndicesNonIncreasing,
                &indices_pointer,
                format!(
                    "Accessor sparse indices element at index {} is less than or equal to previous: {}.",
                    j, index
                ),
            );
        }
        if index >= accessor_count {
            issues.add(
                IssueCode::AccessorSparseIndexOob,
                &indices_pointer,
                format!(
                    "Accessor sparse indices element at index {} is greater than or equal to the number of accessor elements: {} >= {}.",
                    j, index, accessor_count
                ),
            );
        } else {
            substitutions.push((index, j));
        }
        previous = Some(index);
    }
    Some((substitutions, values_window))
}

fn compare_bounds(
    accessor: &Accessor,
    component: ComponentType,
    extrema: &Extrema,
    pointer: &Pointer,
    issues: &mut IssueAggregator,
) {
    let differs = |declared: f64, actual: f64| {
        if component == ComponentType::Float {
            declared as f32 != actual as f32
        } else {
            declared != actual
        }
    };

    for (key, declared, actual, code, label) in [
        ("min", &accessor.min, &extrema.min, IssueCode::AccessorMinMismatch, "minimum"),
        ("max", &accessor.max, &extrema.max, IssueCode::AccessorMaxMismatch, "maximum"),
    ] {
        let Some(declared) = declared else {
            continue;
        };
        if declared.len() != actual.len() {
            continue;
        }
        for (c, (&d, &a)) in declared.iter().zip(actual.iter()).enumerate() {
            if a.is_finite() && differs(d, a) {
                issues.add(
                    code,
                    &pointer.key(key).index(c),
                    format!(
                        "Declared {} value for this component ({}) does not match actual {} ({}).",
                        label, d, label, a
                    ),
                );
            }
        }
    }
}

//! Typed property readers and the index-reference resolver
//!
//! Every property read goes through [`Context`], which pattern-matches the
//! JSON value against the expected shape and records `TYPE_MISMATCH` (or a
//! more specific code) when it does not fit. A failed read yields `None`
//! and the caller substitutes its default.

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{ArrayKind, ArrayLengths, IndexEntry};
use crate::pointer::Pointer;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

/// Properties allowed on every object
const COMMON_PROPERTIES: &[&str] = &["name", "extensions", "extras"];

const MAX_VALUE_TEXT: usize = 64;

/// Result of interpreting a JSON number as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Integer {
    /// Non-negative integral value
    NonNegative(u64),
    /// Negative integral value
    Negative,
    /// Has a fractional part or is out of range
    Fractional,
}

/// Classify a JSON number; integral floats such as `2.0` are accepted
pub(crate) fn classify_integer(n: &Number) -> Integer {
    if let Some(u) = n.as_u64() {
        return Integer::NonNegative(u);
    }
    if n.as_i64().is_some() {
        return Integer::Negative;
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < 0.0 {
                Integer::Negative
            } else {
                Integer::NonNegative(f as u64)
            }
        }
        _ => Integer::Fractional,
    }
}

/// Compact, length-limited rendering of a JSON value for messages
pub(crate) fn value_text(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= MAX_VALUE_TEXT {
        text
    } else {
        let mut short: String = text.chars().take(MAX_VALUE_TEXT - 3).collect();
        short.push_str("...");
        short
    }
}

/// Reader state shared by the whole graph build
pub(crate) struct Context<'i> {
    lengths: ArrayLengths,
    pub(crate) issues: &'i mut IssueAggregator,
}

impl<'i> Context<'i> {
    pub(crate) fn new(lengths: ArrayLengths, issues: &'i mut IssueAggregator) -> Self {
        Self { lengths, issues }
    }

    pub(crate) fn type_mismatch(&mut self, value: &Value, pointer: &Pointer, expected: &str) {
        self.issues.add(
            IssueCode::TypeMismatch,
            pointer,
            format!(
                "Type mismatch. Property value {} is not a '{}'.",
                value_text(value),
                expected
            ),
        );
    }

    pub(crate) fn undefined(&mut self, pointer: &Pointer, key: &str) {
        self.issues.add(
            IssueCode::UndefinedProperty,
            pointer,
            format!("Property '{}' must be defined.", key),
        );
    }

    /// Warn about properties outside `allowed` (and the common ones)
    pub(crate) fn check_properties(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        allowed: &[&str],
    ) {
        for key in obj.keys() {
            let key = key.as_str();
            if !allowed.contains(&key) && !COMMON_PROPERTIES.contains(&key) {
                self.issues.add(
                    IssueCode::UnexpectedProperty,
                    &pointer.key(key),
                    "Unexpected property.",
                );
            }
        }
    }

    /// Resolve an index value against a top-level array
    pub(crate) fn resolve(
        &mut self,
        value: &Value,
        pointer: &Pointer,
        kind: ArrayKind,
    ) -> Option<usize> {
        let len = self.lengths.get(kind);
        self.resolve_within(value, pointer, len)
    }

    /// Resolve an index value against an array of length `len`
    ///
    /// Non-numbers and fractional numbers are `TYPE_MISMATCH`, negative
    /// numbers `INVALID_VALUE`, and indices past the end
    /// `UNRESOLVED_REFERENCE`.
    pub(crate) fn resolve_within(
        &mut self,
        value: &Value,
        pointer: &Pointer,
        len: usize,
    ) -> Option<usize> {
        let Value::Number(n) = value else {
            self.type_mismatch(value, pointer, "integer");
            return None;
        };
        match classify_integer(n) {
            Integer::NonNegative(index) => {
                if index < len as u64 {
                    Some(index as usize)
                } else {
                    self.issues.add(
                        IssueCode::UnresolvedReference,
                        pointer,
                        format!("Unresolved reference: {}.", index),
                    );
                    None
                }
            }
            Integer::Negative => {
                self.issues.add(
                    IssueCode::InvalidValue,
                    pointer,
                    format!("Invalid value {}: index must be non-negative.", n),
                );
                None
            }
            Integer::Fractional => {
                self.type_mismatch(value, pointer, "integer");
                None
            }
        }
    }

    /// Optional index property
    pub(crate) fn index(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
        kind: ArrayKind,
    ) -> Option<usize> {
        let value = obj.get(key)?;
        self.resolve(value, &pointer.key(key), kind)
    }

    /// Required index property
    pub(crate) fn required_index(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
        kind: ArrayKind,
    ) -> Option<usize> {
        if !obj.contains_key(key) {
            self.undefined(pointer, key);
            return None;
        }
        self.index(obj, pointer, key, kind)
    }

    /// Array of indices; unresolved entries are dropped, duplicates reported
    pub(crate) fn index_array(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
        kind: ArrayKind,
    ) -> Vec<IndexEntry> {
        let Some(items) = self.array(obj, pointer, key) else {
            return Vec::new();
        };
        let array_pointer = pointer.key(key);
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let item_pointer = array_pointer.index(position);
            if let Some(index) = self.resolve(item, &item_pointer, kind) {
                if !seen.insert(index) {
                    self.issues.add(
                        IssueCode::DuplicateElements,
                        &item_pointer,
                        format!("Duplicate element: {}.", index),
                    );
                    continue;
                }
                entries.push(IndexEntry { position, index });
            }
        }
        entries
    }

    /// Optional non-negative integer property
    pub(crate) fn uint(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<u64> {
        let value = obj.get(key)?;
        let value_pointer = pointer.key(key);
        let Value::Number(n) = value else {
            self.type_mismatch(value, &value_pointer, "integer");
            return None;
        };
        match classify_integer(n) {
            Integer::NonNegative(v) => Some(v),
            Integer::Negative => {
                self.issues.add(
                    IssueCode::ValueNotInRange,
                    &value_pointer,
                    format!("Value {} is out of range.", n),
                );
                None
            }
            Integer::Fractional => {
                self.type_mismatch(value, &value_pointer, "integer");
                None
            }
        }
    }

    /// Required non-negative integer property
    pub(crate) fn required_uint(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<u64> {
        if !obj.contains_key(key) {
            self.undefined(pointer, key);
            return None;
        }
        self.uint(obj, pointer, key)
    }

    /// Integer property with a lower bound
    pub(crate) fn uint_at_least(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
        min: u64,
        required: bool,
    ) -> Option<u64> {
        let value = if required {
            self.required_uint(obj, pointer, key)?
        } else {
            self.uint(obj, pointer, key)?
        };
        if value < min {
            self.issues.add(
                IssueCode::ValueNotInRange,
                &pointer.key(key),
                format!("Value {} is out of range.", value),
            );
        }
        Some(value)
    }

    pub(crate) fn boolean(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<bool> {
        match obj.get(key)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.type_mismatch(other, &pointer.key(key), "boolean");
                None
            }
        }
    }

    pub(crate) fn string<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a str> {
        match obj.get(key)? {
            Value::String(s) => Some(s),
            other => {
                self.type_mismatch(other, &pointer.key(key), "string");
                None
            }
        }
    }

    pub(crate) fn required_string<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a str> {
        if !obj.contains_key(key) {
            self.undefined(pointer, key);
            return None;
        }
        self.string(obj, pointer, key)
    }

    pub(crate) fn object<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        match obj.get(key)? {
            Value::Object(map) => Some(map),
            other => {
                self.type_mismatch(other, &pointer.key(key), "object");
                None
            }
        }
    }

    pub(crate) fn required_object<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        if !obj.contains_key(key) {
            self.undefined(pointer, key);
            return None;
        }
        self.object(obj, pointer, key)
    }

    pub(crate) fn array<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a [Value]> {
        match obj.get(key)? {
            Value::Array(items) => Some(items),
            other => {
                self.type_mismatch(other, &pointer.key(key), "array");
                None
            }
        }
    }

    pub(crate) fn required_array<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<&'a [Value]> {
        if !obj.contains_key(key) {
            self.undefined(pointer, key);
            return None;
        }
        self.array(obj, pointer, key)
    }

    /// Array of numbers; `None` if any entry is not a number
    pub(crate) fn number_array(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Option<Vec<f64>> {
        let items = self.array(obj, pointer, key)?;
        let array_pointer = pointer.key(key);
        let mut numbers = Vec::with_capacity(items.len());
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            match item.as_f64() {
                Some(n) => numbers.push(n),
                None => {
                    self.type_mismatch(item, &array_pointer.index(i), "number");
                    valid = false;
                }
            }
        }
        valid.then_some(numbers)
    }

    /// Array of strings; non-string entries are reported and skipped
    pub(crate) fn string_array(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &Pointer,
        key: &str,
    ) -> Vec<String> {
        let Some(items) = self.array(obj, pointer, key) else {
            return Vec::new();
        };
        let array_pointer = pointer.key(key);
        let mut strings = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => strings.push(s.clone()),
                other => self.type_mismatch(other, &array_pointer.index(i), "string"),
            }
        }
        strings
    }

    /// Parse each element of an array of objects
    ///
    /// Non-object elements are reported and replaced with `T::default()` so
    /// indices stay aligned with the JSON array.
    pub(crate) fn each_object<T: Default>(
        &mut self,
        items: &[Value],
        pointer: &Pointer,
        mut parse: impl FnMut(&mut Self, &Map<String, Value>, &Pointer) -> T,
    ) -> Vec<T> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_pointer = pointer.index(i);
                match item {
                    Value::Object(obj) => parse(self, obj, &item_pointer),
                    other => {
                        self.type_mismatch(other, &item_pointer, "object");
                        T::default()
                    }
                }
            })
            .collect()
    }
}

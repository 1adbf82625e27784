//! Pluggable per-type property rules
//!
//! Property rules are simple checks over the resolved [`Document`] that
//! carry no algorithmic content of their own: enumerated values, version
//! strings and the like. Each rule set implements [`PropertyRules`] and is
//! collected in a [`RuleRegistry`]. Rules report through the same
//! [`IssueAggregator`] as the core stages.

use std::sync::Arc;

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{ArrayKind, Document};
use crate::pointer::Pointer;

/// Smallest legal `bufferView.byteStride`
pub const MIN_BYTE_STRIDE: u64 = 4;

/// Largest legal `bufferView.byteStride`
pub const MAX_BYTE_STRIDE: u64 = 252;

/// Largest legal primitive `mode` (TRIANGLE_FAN)
pub const MAX_PRIMITIVE_MODE: u64 = 6;

/// A set of property checks for one kind of entity
///
/// # Example
///
/// ```
/// use gltfcheck::{Document, IssueAggregator, PropertyRules};
///
/// struct RequireGenerator;
///
/// impl PropertyRules for RequireGenerator {
///     fn name(&self) -> &'static str {
///         "generator"
///     }
///
///     fn validate(&self, doc: &Document, issues: &mut IssueAggregator) {
///         let _ = (doc, issues);
///     }
/// }
/// ```
pub trait PropertyRules: Send + Sync {
    /// Short name, used in debug output
    fn name(&self) -> &'static str;

    /// Check the document and record any findings
    fn validate(&self, doc: &Document, issues: &mut IssueAggregator);
}

/// Ordered collection of rule sets
///
/// Rule sets run in registration order, so their messages are
/// deterministic.
#[derive(Clone)]
pub struct RuleRegistry {
    handlers: Vec<Arc<dyn PropertyRules>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a rule set
    pub fn register(&mut self, handler: Arc<dyn PropertyRules>) {
        self.handlers.push(handler);
    }

    /// Run every registered rule set
    pub fn validate_all(&self, doc: &Document, issues: &mut IssueAggregator) {
        for handler in &self.handlers {
            tracing::trace!(rules = handler.name(), "running property rules");
            handler.validate(doc, issues);
        }
    }

    /// Names of the registered rule sets, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Get all registered rule sets
    pub fn handlers(&self) -> &[Arc<dyn PropertyRules>] {
        &self.handlers
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with the built-in rule sets
pub fn create_default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Arc::new(AssetRules));
    registry.register(Arc::new(BufferViewRules));
    registry.register(Arc::new(MeshRules));
    registry
}

/// `asset.version` and `asset.minVersion`
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetRules;

/// Parse a `major.minor` version string
fn parse_version(text: &str) -> Option<(u32, u32)> {
    let (major, minor) = text.split_once('.')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(major) || !digits(minor) {
        return None;
    }
    Some((major.parse().ok()?, minor.parse().ok()?))
}

impl AssetRules {
    fn check_version(
        &self,
        text: &str,
        pointer: &Pointer,
        issues: &mut IssueAggregator,
    ) -> Option<(u32, u32)> {
        let version = parse_version(text);
        if version.is_none() {
            issues.add(
                IssueCode::PatternMismatch,
                pointer,
                format!(
                    "Value '{}' does not match regexp pattern '^([0-9]+)\\.([0-9]+)$'.",
                    text
                ),
            );
        }
        version
    }
}

impl PropertyRules for AssetRules {
    fn name(&self) -> &'static str {
        "asset"
    }

    fn validate(&self, doc: &Document, issues: &mut IssueAggregator) {
        let Some(asset) = &doc.asset else {
            return;
        };
        let pointer = Pointer::root().key("asset");

        let version = asset
            .version
            .as_deref()
            .and_then(|v| self.check_version(v, &pointer.key("version"), issues));
        if let Some((major, minor)) = version {
            if major != 2 {
                issues.add(
                    IssueCode::UnknownAssetMajorVersion,
                    &pointer.key("version"),
                    format!("Unknown glTF major asset version: {}.", major),
                );
            } else if minor > 0 {
                issues.add(
                    IssueCode::UnknownAssetMinorVersion,
                    &pointer.key("version"),
                    format!("Unknown glTF minor asset version: {}.", minor),
                );
            }
        }

        let min_version = asset
            .min_version
            .as_deref()
            .and_then(|v| self.check_version(v, &pointer.key("minVersion"), issues));
        if let (Some(min), Some(version)) = (min_version, version) {
            if min > version {
                issues.add(
                    IssueCode::AssetMinVersionGreaterThanVersion,
                    &pointer.key("minVersion"),
                    format!(
                        "Asset minVersion '{}.{}' is greater than version '{}.{}'.",
                        min.0, min.1, version.0, version.1
                    ),
                );
            }
        }
    }
}

/// `bufferView.byteStride` range and alignment
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferViewRules;

impl PropertyRules for BufferViewRules {
    fn name(&self) -> &'static str {
        "bufferView"
    }

    fn validate(&self, doc: &Document, issues: &mut IssueAggregator) {
        for (i, view) in doc.buffer_views.iter().enumerate() {
            let Some(stride) = view.byte_stride else {
                continue;
            };
            let pointer = ArrayKind::BufferViews.pointer(i).key("byteStride");
            if !(MIN_BYTE_STRIDE..=MAX_BYTE_STRIDE).contains(&stride) {
                issues.add(
                    IssueCode::ValueNotInRange,
                    &pointer,
                    format!("Value {} is out of range.", stride),
                );
            } else if stride % 4 != 0 {
                issues.add(
                    IssueCode::BufferViewInvalidByteStride,
                    &pointer,
                    format!("Only buffer views with raw vertex data can have byteStride; {} is not a multiple of 4.", stride),
                );
            }
        }
    }
}

/// Primitive `mode` and required attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRules;

impl PropertyRules for MeshRules {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn validate(&self, doc: &Document, issues: &mut IssueAggregator) {
        for (m, mesh) in doc.meshes.iter().enumerate() {
            for (p, primitive) in mesh.primitives.iter().enumerate() {
                let pointer = ArrayKind::Meshes
                    .pointer(m)
                    .key("primitives")
                    .index(p);
                if let Some(mode) = primitive.mode {
                    if mode > MAX_PRIMITIVE_MODE {
                        issues.add(
                            IssueCode::ValueNotInRange,
                            &pointer.key("mode"),
                            format!("Value {} is out of range.", mode),
                        );
                    }
                }
                if !primitive.attributes.iter().any(|a| a.name == "POSITION") {
                    issues.add(
                        IssueCode::MeshPrimitiveNoPosition,
                        &pointer.key("attributes"),
                        "No POSITION attribute found.",
                    );
                }
            }
        }
    }
}

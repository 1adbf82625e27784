//! Reachability of top-level objects
//!
//! Everything reachable from the scenes is used. Animations are used when
//! at least one of their channels targets a used node. Anything else is
//! reported as `UNUSED_OBJECT` at information level. Scenes themselves are
//! never reported.

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{Accessor, ArrayKind, Document};

/// Set of used `(kind, index)` pairs
#[derive(Debug, Clone, Default)]
pub struct UsageSet {
    used: Vec<Vec<bool>>,
}

impl UsageSet {
    fn new(doc: &Document) -> Self {
        Self {
            used: ArrayKind::ALL
                .iter()
                .map(|&kind| vec![false; doc.len_of(kind)])
                .collect(),
        }
    }

    /// Whether the entity has been reached
    pub fn is_used(&self, kind: ArrayKind, index: usize) -> bool {
        self.used
            .get(kind as usize)
            .and_then(|slots| slots.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Mark an entity; returns `true` if it was not marked before
    fn mark(&mut self, kind: ArrayKind, index: usize) -> bool {
        match self.used.get_mut(kind as usize).and_then(|s| s.get_mut(index)) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    }

    /// Number of used entities of a kind
    pub fn count(&self, kind: ArrayKind) -> usize {
        self.used
            .get(kind as usize)
            .map_or(0, |slots| slots.iter().filter(|&&u| u).count())
    }
}

/// Worklist traversal over the reference graph
struct Tracker<'d> {
    doc: &'d Document,
    usage: UsageSet,
    pending: Vec<(ArrayKind, usize)>,
}

impl<'d> Tracker<'d> {
    fn visit(&mut self, kind: ArrayKind, index: Option<usize>) {
        if let Some(index) = index {
            if self.usage.mark(kind, index) {
                self.pending.push((kind, index));
            }
        }
    }

    fn run(&mut self) {
        while let Some((kind, index)) = self.pending.pop() {
            self.expand(kind, index);
        }
    }

    fn expand(&mut self, kind: ArrayKind, index: usize) {
        let doc = self.doc;
        match kind {
            ArrayKind::Scenes => {
                for entry in &doc.scenes[index].nodes {
                    self.visit(ArrayKind::Nodes, Some(entry.index));
                }
            }
            ArrayKind::Nodes => {
                let node = &doc.nodes[index];
                for entry in &node.children {
                    self.visit(ArrayKind::Nodes, Some(entry.index));
                }
                self.visit(ArrayKind::Meshes, node.mesh);
                self.visit(ArrayKind::Cameras, node.camera);
                self.visit(ArrayKind::Skins, node.skin);
            }
            ArrayKind::Meshes => {
                for primitive in &doc.meshes[index].primitives {
                    for attribute in primitive.attributes.iter().chain(primitive.targets.iter().flatten()) {
                        self.visit(ArrayKind::Accessors, attribute.accessor);
                    }
                    self.visit(ArrayKind::Accessors, primitive.indices);
                    self.visit(ArrayKind::Materials, primitive.material);
                }
            }
            ArrayKind::Skins => {
                let skin = &doc.skins[index];
                for entry in &skin.joints {
                    self.visit(ArrayKind::Nodes, Some(entry.index));
                }
                self.visit(ArrayKind::Nodes, skin.skeleton);
                self.visit(ArrayKind::Accessors, skin.inverse_bind_matrices);
            }
            ArrayKind::Materials => {
                for &texture in &doc.materials[index].textures {
                    self.visit(ArrayKind::Textures, Some(texture));
                }
            }
            ArrayKind::Textures => {
                let texture = &doc.textures[index];
                self.visit(ArrayKind::Images, texture.source);
                self.visit(ArrayKind::Samplers, texture.sampler);
            }
            ArrayKind::Images => {
                self.visit(ArrayKind::BufferViews, doc.images[index].buffer_view);
            }
            ArrayKind::Accessors => self.expand_accessor(&doc.accessors[index]),
            ArrayKind::BufferViews => {
                self.visit(ArrayKind::Buffers, doc.buffer_views[index].buffer);
            }
            ArrayKind::Animations => {
                for sampler in &doc.animations[index].samplers {
                    self.visit(ArrayKind::Accessors, sampler.input);
                    self.visit(ArrayKind::Accessors, sampler.output);
                }
            }
            ArrayKind::Buffers | ArrayKind::Cameras | ArrayKind::Samplers => {}
        }
    }

    fn expand_accessor(&mut self, accessor: &Accessor) {
        self.visit(ArrayKind::BufferViews, accessor.buffer_view);
        if let Some(sparse) = &accessor.sparse {
            if let Some(indices) = &sparse.indices {
                self.visit(ArrayKind::BufferViews, indices.buffer_view);
            }
            if let Some(values) = &sparse.values {
                self.visit(ArrayKind::BufferViews, values.buffer_view);
            }
        }
    }
}

/// Compute the usage set
pub fn track(doc: &Document) -> UsageSet {
    let mut tracker = Tracker {
        doc,
        usage: UsageSet::new(doc),
        pending: Vec::new(),
    };

    for scene in 0..doc.scenes.len() {
        tracker.visit(ArrayKind::Scenes, Some(scene));
    }
    tracker.visit(ArrayKind::Scenes, doc.scene);
    tracker.run();

    // Channels only target nodes, and animations add no nodes, so one pass
    // after the scene traversal is enough.
    for (i, animation) in doc.animations.iter().enumerate() {
        let targets_used = animation.channels.iter().any(|channel| {
            channel
                .target_node
                .is_some_and(|node| tracker.usage.is_used(ArrayKind::Nodes, node))
        });
        if targets_used {
            tracker.visit(ArrayKind::Animations, Some(i));
        }
    }
    tracker.run();

    tracker.usage
}

/// Report every unused entity
pub fn report(doc: &Document, usage: &UsageSet, issues: &mut IssueAggregator) {
    let mut unused = 0usize;
    for kind in ArrayKind::ALL {
        if kind == ArrayKind::Scenes {
            continue;
        }
        for index in 0..doc.len_of(kind) {
            if !usage.is_used(kind, index) {
                unused += 1;
                issues.add(
                    IssueCode::UnusedObject,
                    &kind.pointer(index),
                    "This object may be unused.",
                );
            }
        }
    }
    tracing::debug!(unused, "usage tracked");
}

//! Node hierarchy analysis
//!
//! Builds the parent map from `node.children`, detects cycles, checks that
//! scene roots are not children of other nodes, and validates skin joint
//! ancestry.

use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{ArrayKind, Document};
use crate::pointer::Pointer;

/// Derived parent/child structure of the nodes
///
/// Only authoritative edges are kept: when several nodes claim the same
/// child, the first claim in document order wins. Every node therefore has
/// at most one parent.
#[derive(Debug, Clone, Default)]
struct NodeGraph {
    parents: Vec<Option<usize>>,
    /// Authoritative child edges as (child, position in `children`)
    children: Vec<Vec<(usize, usize)>>,
}

impl NodeGraph {
    /// Parent of a node, if it has one
    fn parent(&self, node: usize) -> Option<usize> {
        self.parents.get(node).copied().flatten()
    }

    /// Whether `node` is `ancestor` or one of its descendants
    ///
    /// Walks up at most `node count` steps, so cycles terminate.
    fn is_descendant_or_self(&self, node: usize, ancestor: usize) -> bool {
        let mut current = Some(node);
        for _ in 0..=self.parents.len() {
            match current {
                Some(n) if n == ancestor => return true,
                Some(n) => current = self.parent(n),
                None => return false,
            }
        }
        false
    }

    /// Topmost ancestor of a node; `None` if the walk runs into a cycle
    fn root_of(&self, node: usize) -> Option<usize> {
        let mut current = node;
        for _ in 0..=self.parents.len() {
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
        None
    }
}

/// Run the hierarchy checks
pub fn analyze(doc: &Document, issues: &mut IssueAggregator) {
    let graph = build_graph(doc, issues);
    detect_cycles(doc, &graph, issues);
    check_scene_roots(doc, &graph, issues);
    check_skins(doc, &graph, issues);

    tracing::debug!(
        nodes = doc.nodes.len(),
        roots = graph.parents.iter().filter(|p| p.is_none()).count(),
        "node hierarchy analyzed"
    );
}

fn children_pointer(node: usize, position: usize) -> Pointer {
    ArrayKind::Nodes
        .pointer(node)
        .key("children")
        .index(position)
}

fn build_graph(doc: &Document, issues: &mut IssueAggregator) -> NodeGraph {
    let count = doc.nodes.len();
    let mut graph = NodeGraph {
        parents: vec![None; count],
        children: vec![Vec::new(); count],
    };

    for (parent, node) in doc.nodes.iter().enumerate() {
        for entry in &node.children {
            let child = entry.index;
            if child == parent {
                issues.add(
                    IssueCode::NodeLoop,
                    &children_pointer(parent, entry.position),
                    "Node is a loop.",
                );
                continue;
            }
            match graph.parents[child] {
                Some(_) => issues.add(
                    IssueCode::NodeParentOverride,
                    &children_pointer(parent, entry.position),
                    format!("Value overrides parent of node {}.", child),
                ),
                None => {
                    graph.parents[child] = Some(parent);
                    graph.children[parent].push((child, entry.position));
                }
            }
        }
    }
    graph
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first walk over authoritative edges
///
/// Starts from scene roots, then from parentless nodes, then from anything
/// left (which can only be nodes on a cycle). An edge into a node that is
/// still on the current path closes a cycle and is reported, not followed.
fn detect_cycles(doc: &Document, graph: &NodeGraph, issues: &mut IssueAggregator) {
    let count = doc.nodes.len();
    let mut marks = vec![Mark::Unvisited; count];

    let starts = doc
        .scenes
        .iter()
        .flat_map(|scene| scene.nodes.iter().map(|e| e.index))
        .chain((0..count).filter(|&n| graph.parent(n).is_none()))
        .chain(0..count)
        .collect::<Vec<_>>();

    // (node, next child slot)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for start in starts {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::InProgress;
        stack.push((start, 0));

        while let Some(top) = stack.last_mut() {
            let (node, slot) = *top;
            let Some(&(child, position)) = graph.children[node].get(slot) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            match marks[child] {
                Mark::Unvisited => {
                    marks[child] = Mark::InProgress;
                    stack.push((child, 0));
                }
                Mark::InProgress => issues.add(
                    IssueCode::NodeLoop,
                    &children_pointer(node, position),
                    "Node is a loop.",
                ),
                Mark::Done => {}
            }
        }
    }
}

/// A node listed in a scene must not be another node's child
///
/// Each scene is checked on its own.
fn check_scene_roots(doc: &Document, graph: &NodeGraph, issues: &mut IssueAggregator) {
    for (s, scene) in doc.scenes.iter().enumerate() {
        for entry in &scene.nodes {
            if let Some(parent) = graph.parent(entry.index) {
                issues.add(
                    IssueCode::SceneNonRootNode,
                    &ArrayKind::Scenes.pointer(s).key("nodes").index(entry.position),
                    format!(
                        "Node {} is not a root node; it is a child of node {}.",
                        entry.index, parent
                    ),
                );
            }
        }
    }
}

fn check_skins(doc: &Document, graph: &NodeGraph, issues: &mut IssueAggregator) {
    for (s, skin) in doc.skins.iter().enumerate() {
        let pointer = ArrayKind::Skins.pointer(s);
        match skin.skeleton {
            Some(skeleton) => {
                for entry in &skin.joints {
                    if !graph.is_descendant_or_self(entry.index, skeleton) {
                        issues.add(
                            IssueCode::SkinSkeletonInvalid,
                            &pointer.key("joints").index(entry.position),
                            format!(
                                "Skeleton node {} is not a common root of joint {}.",
                                skeleton, entry.index
                            ),
                        );
                    }
                }
            }
            None => {
                let mut roots = skin.joints.iter().map(|e| graph.root_of(e.index));
                if let Some(first) = roots.next() {
                    if first.is_some() && roots.any(|root| root != first) {
                        issues.add(
                            IssueCode::SkinNoCommonRoot,
                            &pointer.key("joints"),
                            "Joints do not have a common root.",
                        );
                    }
                }
            }
        }
    }
}

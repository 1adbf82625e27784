//! Scenes, nodes, skins and cameras

use super::IndexEntry;

/// `scenes[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Resolved entries of `nodes`
    pub nodes: Vec<IndexEntry>,
}

/// `nodes[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Resolved entries of `children`
    pub children: Vec<IndexEntry>,
    /// Resolved `mesh`
    pub mesh: Option<usize>,
    /// Resolved `camera`
    pub camera: Option<usize>,
    /// Resolved `skin`
    pub skin: Option<usize>,
}

/// `skins[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
    /// Resolved entries of `joints`
    pub joints: Vec<IndexEntry>,
    /// Resolved `skeleton`
    pub skeleton: Option<usize>,
    /// Resolved `inverseBindMatrices`
    pub inverse_bind_matrices: Option<usize>,
}

/// `cameras[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    /// `type`
    pub camera_type: Option<String>,
}

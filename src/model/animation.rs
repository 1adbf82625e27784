//! Animations

/// `animations[i].channels[j]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    /// Resolved index into the owning animation's `samplers`
    pub sampler: Option<usize>,
    /// Resolved `target.node`
    pub target_node: Option<usize>,
    /// `target.path`
    pub target_path: Option<String>,
}

/// `animations[i].samplers[j]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationSampler {
    /// Resolved `input` accessor
    pub input: Option<usize>,
    /// Resolved `output` accessor
    pub output: Option<usize>,
    /// `interpolation`
    pub interpolation: Option<String>,
}

/// `animations[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    /// `channels`
    pub channels: Vec<Channel>,
    /// `samplers`
    pub samplers: Vec<AnimationSampler>,
}

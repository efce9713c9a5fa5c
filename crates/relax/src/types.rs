//! Core relax types.

use glam::Vec3;
use retopo_mesh::{EdgeId, FaceId, VertexId};
use std::collections::{HashMap, HashSet};

/// Proposed new position per vertex, produced by one relaxation pass.
pub type DisplacementMap = HashMap<VertexId, Vec3>;

/// The transient vertex/edge/face subset targeted by one relaxation pass.
///
/// `weights` holds the falloff distance per vertex: 0 is full strength,
/// 1 is no effect. Vertices without an entry count as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    pub vertices: HashSet<VertexId>,
    pub edges: HashSet<EdgeId>,
    pub faces: HashSet<FaceId>,
    pub weights: HashMap<VertexId, f32>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a pass over this set would be a no-op
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.edges.is_empty()
    }

    /// Falloff distance of a vertex (0 when unset)
    pub fn weight(&self, vertex: VertexId) -> f32 {
        self.weights.get(&vertex).copied().unwrap_or(0.0)
    }
}

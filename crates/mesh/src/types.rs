//! Type definitions for the polygon mesh.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Type-safe edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u32);

/// A vertex in the polygon mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Vec3,
    /// Edges that have this vertex as an endpoint
    pub edges: Vec<EdgeId>,
    /// Faces whose loop contains this vertex
    pub faces: Vec<FaceId>,
    pub selected: bool,
}

/// An undirected edge between two distinct vertices
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    /// Endpoints in creation order
    pub vertices: [VertexId; 2],
    /// Faces bordered by this edge (two for interior manifold edges)
    pub faces: Vec<FaceId>,
    pub selected: bool,
}

impl Edge {
    /// The endpoint opposite `vertex`, if `vertex` is an endpoint at all
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        match self.vertices {
            [a, b] if a == vertex => Some(b),
            [a, b] if b == vertex => Some(a),
            _ => None,
        }
    }
}

/// A polygon face
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// Vertex loop, at least three distinct vertices
    pub vertices: Vec<VertexId>,
    /// `edges[i]` joins `vertices[i]` and `vertices[i + 1]` (wrapping)
    pub edges: Vec<EdgeId>,
    pub selected: bool,
}

/// Errors that can occur during mesh operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("Invalid vertex handle {0:?}")]
    InvalidVertex(VertexId),
    #[error("Invalid edge handle {0:?}")]
    InvalidEdge(EdgeId),
    #[error("Invalid face handle {0:?}")]
    InvalidFace(FaceId),
    #[error("Edge endpoints must differ (got {0:?} twice)")]
    DegenerateEdge(VertexId),
    #[error("Degenerate face: {0}")]
    DegenerateFace(String),
    #[error("Vertex {vertex:?} is not an endpoint of edge {edge:?}")]
    NotIncident { edge: EdgeId, vertex: VertexId },
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
}

//! Narrow read/write facade over a mesh.

use glam::Vec3;

use super::types::{EdgeId, FaceId, MeshError, VertexId};
use super::{PolyMesh, Result};

/// Read/write access to vertex positions and element adjacency
///
/// Tools program against this trait rather than a concrete mesh type. Every
/// method fails fast on a stale or foreign handle.
pub trait MeshAccess {
    fn position(&self, vertex: VertexId) -> Result<Vec3>;

    fn set_position(&mut self, vertex: VertexId, position: Vec3) -> Result<()>;

    fn incident_edges(&self, vertex: VertexId) -> Result<&[EdgeId]>;

    fn incident_faces(&self, vertex: VertexId) -> Result<&[FaceId]>;

    /// The endpoint of `edge` opposite `vertex`
    fn other_endpoint(&self, edge: EdgeId, vertex: VertexId) -> Result<VertexId>;

    /// Both endpoints of `edge`
    fn endpoints(&self, edge: EdgeId) -> Result<[VertexId; 2]>;

    fn length(&self, edge: EdgeId) -> Result<f32>;

    /// Ordered vertex loop of `face`
    fn vertices_of(&self, face: FaceId) -> Result<&[VertexId]>;

    /// Every vertex handle, for building spatial indices
    fn vertex_handles(&self) -> Vec<VertexId>;
}

impl MeshAccess for PolyMesh {
    fn position(&self, vertex: VertexId) -> Result<Vec3> {
        self.vertex(vertex)
            .map(|v| v.position)
            .ok_or(MeshError::InvalidVertex(vertex))
    }

    fn set_position(&mut self, vertex: VertexId, position: Vec3) -> Result<()> {
        self.set_vertex_position(vertex, position)
    }

    fn incident_edges(&self, vertex: VertexId) -> Result<&[EdgeId]> {
        self.vertex(vertex)
            .map(|v| v.edges.as_slice())
            .ok_or(MeshError::InvalidVertex(vertex))
    }

    fn incident_faces(&self, vertex: VertexId) -> Result<&[FaceId]> {
        self.vertex(vertex)
            .map(|v| v.faces.as_slice())
            .ok_or(MeshError::InvalidVertex(vertex))
    }

    fn other_endpoint(&self, edge: EdgeId, vertex: VertexId) -> Result<VertexId> {
        self.edge(edge)
            .ok_or(MeshError::InvalidEdge(edge))?
            .other(vertex)
            .ok_or(MeshError::NotIncident { edge, vertex })
    }

    fn endpoints(&self, edge: EdgeId) -> Result<[VertexId; 2]> {
        self.edge(edge)
            .map(|e| e.vertices)
            .ok_or(MeshError::InvalidEdge(edge))
    }

    fn length(&self, edge: EdgeId) -> Result<f32> {
        self.edge_length(edge)
    }

    fn vertices_of(&self, face: FaceId) -> Result<&[VertexId]> {
        self.face(face)
            .map(|f| f.vertices.as_slice())
            .ok_or(MeshError::InvalidFace(face))
    }

    fn vertex_handles(&self) -> Vec<VertexId> {
        self.vertex_ids().collect()
    }
}

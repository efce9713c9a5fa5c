//! Topology query methods for PolyMesh.

use glam::Vec3;

use super::construction::edge_key;
use super::types::{Edge, EdgeId, Face, FaceId, MeshError, Vertex, VertexId};
use super::{PolyMesh, Result};

impl PolyMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0 as usize)
    }

    /// Get edge by ID
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0 as usize)
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0 as usize)
    }

    /// Get all vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get all edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get all faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(|v| v.id)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|e| e.id)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().map(|f| f.id)
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Find the edge joining two vertices, in either direction
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_map.get(&edge_key(a, b)).copied()
    }

    /// Vertices sharing an edge with `vertex_id`
    pub fn adjacent_vertices(&self, vertex_id: VertexId) -> Vec<VertexId> {
        let Some(vertex) = self.vertex(vertex_id) else {
            return Vec::new();
        };
        vertex
            .edges
            .iter()
            .filter_map(|&e| self.edge(e)?.other(vertex_id))
            .collect()
    }

    /// An edge is on the boundary when fewer than two faces use it
    pub fn is_boundary_edge(&self, edge_id: EdgeId) -> bool {
        self.edge(edge_id)
            .map(|e| e.faces.len() < 2)
            .unwrap_or(true)
    }

    /// A vertex is on the boundary if any of its edges is, or it is isolated
    pub fn is_boundary_vertex(&self, vertex_id: VertexId) -> bool {
        match self.vertex(vertex_id) {
            Some(v) => v.edges.is_empty() || v.edges.iter().any(|&e| self.is_boundary_edge(e)),
            None => false,
        }
    }

    /// Length of an edge
    pub fn edge_length(&self, edge_id: EdgeId) -> Result<f32> {
        let edge = self.edge(edge_id).ok_or(MeshError::InvalidEdge(edge_id))?;
        let [a, b] = edge.vertices;
        Ok(self.vertices[a.0 as usize]
            .position
            .distance(self.vertices[b.0 as usize].position))
    }

    /// Mean of a face's vertex positions
    pub fn face_centroid(&self, face_id: FaceId) -> Result<Vec3> {
        let face = self.face(face_id).ok_or(MeshError::InvalidFace(face_id))?;
        let sum: Vec3 = face
            .vertices
            .iter()
            .map(|v| self.vertices[v.0 as usize].position)
            .sum();
        Ok(sum / face.vertices.len() as f32)
    }

    /// Overwrite a vertex position
    pub fn set_vertex_position(&mut self, vertex_id: VertexId, position: Vec3) -> Result<()> {
        let vertex = self
            .vertices
            .get_mut(vertex_id.0 as usize)
            .ok_or(MeshError::InvalidVertex(vertex_id))?;
        vertex.position = position;
        Ok(())
    }
}

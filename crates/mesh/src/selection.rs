//! Selection flags for PolyMesh.
//!
//! Follows the usual vertex-select-mode rules of polygon editors: selecting
//! an edge or face also selects its vertices, and [`PolyMesh::select_flush`]
//! derives edge and face selection from the vertex selection.

use super::types::{EdgeId, FaceId, MeshError, VertexId};
use super::{PolyMesh, Result};

impl PolyMesh {
    /// Select a single vertex
    pub fn select_vertex(&mut self, vertex_id: VertexId) -> Result<()> {
        let vertex = self
            .vertices
            .get_mut(vertex_id.0 as usize)
            .ok_or(MeshError::InvalidVertex(vertex_id))?;
        vertex.selected = true;
        Ok(())
    }

    /// Select an edge and both its endpoints
    pub fn select_edge(&mut self, edge_id: EdgeId) -> Result<()> {
        let edge = self
            .edges
            .get_mut(edge_id.0 as usize)
            .ok_or(MeshError::InvalidEdge(edge_id))?;
        edge.selected = true;
        for v in edge.vertices {
            self.vertices[v.0 as usize].selected = true;
        }
        Ok(())
    }

    /// Select a face together with its vertices and edges
    pub fn select_face(&mut self, face_id: FaceId) -> Result<()> {
        let face = self
            .faces
            .get_mut(face_id.0 as usize)
            .ok_or(MeshError::InvalidFace(face_id))?;
        face.selected = true;
        for &v in &face.vertices {
            self.vertices[v.0 as usize].selected = true;
        }
        for &e in &face.edges {
            self.edges[e.0 as usize].selected = true;
        }
        Ok(())
    }

    /// Select every element
    pub fn select_all(&mut self) {
        self.vertices.iter_mut().for_each(|v| v.selected = true);
        self.edges.iter_mut().for_each(|e| e.selected = true);
        self.faces.iter_mut().for_each(|f| f.selected = true);
    }

    /// Clear every selection flag
    pub fn deselect_all(&mut self) {
        self.vertices.iter_mut().for_each(|v| v.selected = false);
        self.edges.iter_mut().for_each(|e| e.selected = false);
        self.faces.iter_mut().for_each(|f| f.selected = false);
    }

    /// Recompute edge and face selection from the vertex selection
    pub fn select_flush(&mut self) {
        let vertices = &self.vertices;
        for edge in &mut self.edges {
            edge.selected = edge.vertices.iter().all(|v| vertices[v.0 as usize].selected);
        }
        for face in &mut self.faces {
            face.selected = face.vertices.iter().all(|v| vertices[v.0 as usize].selected);
        }
    }

    pub fn selected_vertices(&self) -> Vec<VertexId> {
        self.vertices.iter().filter(|v| v.selected).map(|v| v.id).collect()
    }

    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.edges.iter().filter(|e| e.selected).map(|e| e.id).collect()
    }

    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.faces.iter().filter(|f| f.selected).map(|f| f.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::two_quads;
    use crate::*;

    #[test]
    fn test_select_face_selects_boundary() {
        let mut mesh = two_quads();
        mesh.select_face(FaceId(0)).unwrap();

        let mut verts = mesh.selected_vertices();
        verts.sort();
        assert_eq!(verts, vec![VertexId(0), VertexId(1), VertexId(3), VertexId(4)]);
        assert_eq!(mesh.selected_edges().len(), 4);
        assert_eq!(mesh.selected_faces(), vec![FaceId(0)]);
    }

    #[test]
    fn test_select_flush_from_vertices() {
        let mut mesh = two_quads();
        for v in [0, 1, 3] {
            mesh.select_vertex(VertexId(v)).unwrap();
        }
        mesh.select_flush();
        // Edges 0-1 and 0-3 qualify, 1-4 and 3-4 do not; no face is complete
        assert_eq!(mesh.selected_edges().len(), 2);
        assert!(mesh.selected_faces().is_empty());

        mesh.select_vertex(VertexId(4)).unwrap();
        mesh.select_flush();
        assert_eq!(mesh.selected_faces(), vec![FaceId(0)]);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut mesh = two_quads();
        mesh.select_all();
        assert_eq!(mesh.selected_vertices().len(), 6);
        assert_eq!(mesh.selected_edges().len(), 7);
        mesh.deselect_all();
        assert!(mesh.selected_vertices().is_empty());
        assert!(mesh.select_edge(EdgeId(100)).is_err());
    }
}

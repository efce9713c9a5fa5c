//! Polygon mesh data structure for retopology editing
//!
//! Vertices, edges and faces live in arenas indexed by stable `u32` handles.
//! Adjacency is stored as explicit index lists on each element (vertex →
//! incident edges/faces, edge → endpoints/faces, face → vertex loop/edges),
//! so there are no reference cycles and the whole mesh is `Clone`.
//!
//! [`MeshAccess`] is the narrow read/write facade that tools such as the
//! relax engine program against.

mod construction;
mod facade;
mod selection;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

pub use facade::MeshAccess;
pub use types::{Edge, EdgeId, Face, FaceId, MeshError, Vertex, VertexId};

/// Result alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;

/// Polygon mesh with arena storage
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    /// Map from (min, max) vertex pair to edge
    pub(crate) edge_map: HashMap<(VertexId, VertexId), EdgeId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// 2x1 grid of quads:
    ///
    /// ```text
    /// 3---4---5
    /// |   |   |
    /// 0---1---2
    /// ```
    pub(crate) fn two_quads() -> PolyMesh {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
        ];
        let polygons = [vec![0, 1, 4, 3], vec![1, 2, 5, 4]];
        PolyMesh::from_polygons(&positions, &polygons).unwrap()
    }

    #[test]
    fn test_from_polygons_counts() {
        let mesh = two_quads();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.edge_count(), 7);
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_shared_edge_has_two_faces() {
        let mesh = two_quads();
        let shared = mesh.find_edge(VertexId(1), VertexId(4)).unwrap();
        assert_eq!(mesh.edge(shared).unwrap().faces.len(), 2);
        assert!(!mesh.is_boundary_edge(shared));

        let rim = mesh.find_edge(VertexId(0), VertexId(1)).unwrap();
        assert!(mesh.is_boundary_edge(rim));
    }

    #[test]
    fn test_vertex_adjacency() {
        let mesh = two_quads();
        let v1 = mesh.vertex(VertexId(1)).unwrap();
        assert_eq!(v1.edges.len(), 3);
        assert_eq!(v1.faces.len(), 2);

        let mut neighbors = mesh.adjacent_vertices(VertexId(1));
        neighbors.sort();
        assert_eq!(neighbors, vec![VertexId(0), VertexId(2), VertexId(4)]);
    }
}

//! Validation methods for PolyMesh.
//!
//! Checks that every adjacency list agrees with its counterpart:
//! - vertex → edge lists match edge endpoints
//! - vertex → face lists match face loops
//! - edge → face lists match face edge rings
//! - the edge map indexes every edge exactly once

use super::construction::edge_key;
use super::types::MeshError;
use super::{PolyMesh, Result};

fn topology_error(msg: String) -> MeshError {
    MeshError::InvalidTopology(msg)
}

impl PolyMesh {
    /// Validate all back-references in both directions
    pub fn validate(&self) -> Result<()> {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.id.0 as usize != i {
                return Err(topology_error(format!("Vertex slot {} holds id {:?}", i, v.id)));
            }
            for &e in &v.edges {
                let edge = self
                    .edge(e)
                    .ok_or_else(|| topology_error(format!("Vertex {:?}: missing edge {:?}", v.id, e)))?;
                if !edge.vertices.contains(&v.id) {
                    return Err(topology_error(format!(
                        "Vertex {:?}: edge {:?} does not end at it",
                        v.id, e
                    )));
                }
            }
            for &f in &v.faces {
                let face = self
                    .face(f)
                    .ok_or_else(|| topology_error(format!("Vertex {:?}: missing face {:?}", v.id, f)))?;
                if !face.vertices.contains(&v.id) {
                    return Err(topology_error(format!(
                        "Vertex {:?}: face {:?} does not contain it",
                        v.id, f
                    )));
                }
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            if edge.id.0 as usize != i {
                return Err(topology_error(format!("Edge slot {} holds id {:?}", i, edge.id)));
            }
            let [a, b] = edge.vertices;
            if a == b {
                return Err(MeshError::DegenerateEdge(a));
            }
            for v in [a, b] {
                let vertex = self.vertex(v).ok_or(MeshError::InvalidVertex(v))?;
                if !vertex.edges.contains(&edge.id) {
                    return Err(topology_error(format!(
                        "Edge {:?}: endpoint {:?} does not list it",
                        edge.id, v
                    )));
                }
            }
            if self.edge_map.get(&edge_key(a, b)) != Some(&edge.id) {
                return Err(topology_error(format!("Edge {:?}: not indexed in edge map", edge.id)));
            }
            for &f in &edge.faces {
                let face = self.face(f).ok_or(MeshError::InvalidFace(f))?;
                if !face.edges.contains(&edge.id) {
                    return Err(topology_error(format!(
                        "Edge {:?}: face {:?} does not use it",
                        edge.id, f
                    )));
                }
            }
        }

        if self.edge_map.len() != self.edges.len() {
            return Err(topology_error(format!(
                "Edge map has {} entries for {} edges",
                self.edge_map.len(),
                self.edges.len()
            )));
        }

        for (i, face) in self.faces.iter().enumerate() {
            if face.id.0 as usize != i {
                return Err(topology_error(format!("Face slot {} holds id {:?}", i, face.id)));
            }
            let n = face.vertices.len();
            if n < 3 || face.edges.len() != n {
                return Err(MeshError::DegenerateFace(format!(
                    "face {:?} has {} vertices and {} edges",
                    face.id,
                    n,
                    face.edges.len()
                )));
            }
            for (k, &v) in face.vertices.iter().enumerate() {
                let vertex = self.vertex(v).ok_or(MeshError::InvalidVertex(v))?;
                if !vertex.faces.contains(&face.id) {
                    return Err(topology_error(format!(
                        "Face {:?}: vertex {:?} does not list it",
                        face.id, v
                    )));
                }
                let next = face.vertices[(k + 1) % n];
                let e = face.edges[k];
                let edge = self.edge(e).ok_or(MeshError::InvalidEdge(e))?;
                if edge_key(edge.vertices[0], edge.vertices[1]) != edge_key(v, next) {
                    return Err(topology_error(format!(
                        "Face {:?}: edge {:?} does not join {:?} and {:?}",
                        face.id, e, v, next
                    )));
                }
                if !edge.faces.contains(&face.id) {
                    return Err(topology_error(format!(
                        "Face {:?}: edge {:?} does not list it",
                        face.id, e
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::two_quads;
    use crate::*;

    #[test]
    fn test_valid_mesh_passes() {
        assert!(two_quads().validate().is_ok());
        assert!(PolyMesh::new().validate().is_ok());
    }

    #[test]
    fn test_detects_missing_back_reference() {
        let mut mesh = two_quads();
        mesh.vertices[1].faces.clear();
        assert!(matches!(mesh.validate(), Err(MeshError::InvalidTopology(_))));
    }

    #[test]
    fn test_detects_wrong_edge_endpoint() {
        let mut mesh = two_quads();
        let e = mesh.find_edge(VertexId(0), VertexId(1)).unwrap();
        mesh.vertices[2].edges.push(e);
        assert!(matches!(mesh.validate(), Err(MeshError::InvalidTopology(_))));
    }
}

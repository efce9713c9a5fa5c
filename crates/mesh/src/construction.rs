//! Construction methods for PolyMesh.

use glam::Vec3;
use std::collections::HashSet;
use tracing::debug;

use super::types::{Edge, EdgeId, Face, FaceId, MeshError, Vertex, VertexId};
use super::{PolyMesh, Result};

/// Canonical key for an undirected vertex pair
pub(crate) fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl PolyMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from vertex positions and polygon index loops
    ///
    /// Each polygon needs at least three distinct, valid vertex indices.
    /// Edges shared between polygons are created once.
    pub fn from_polygons(positions: &[Vec3], polygons: &[Vec<u32>]) -> Result<Self> {
        let mut mesh = Self::new();
        for &position in positions {
            mesh.add_vertex(position);
        }

        for (poly_idx, polygon) in polygons.iter().enumerate() {
            let loop_ids: Vec<VertexId> = polygon.iter().map(|&i| VertexId(i)).collect();
            mesh.add_face(&loop_ids).map_err(|e| match e {
                MeshError::DegenerateFace(msg) => {
                    MeshError::DegenerateFace(format!("polygon {}: {}", poly_idx, msg))
                }
                other => other,
            })?;
        }

        debug!(
            "Built PolyMesh: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );

        Ok(mesh)
    }

    /// Add an isolated vertex
    pub fn add_vertex(&mut self, position: Vec3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            position,
            edges: Vec::new(),
            faces: Vec::new(),
            selected: false,
        });
        id
    }

    /// Add an edge between two vertices, or return the existing one
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(MeshError::DegenerateEdge(a));
        }

        let key = edge_key(a, b);
        if let Some(&existing) = self.edge_map.get(&key) {
            return Ok(existing);
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            vertices: [a, b],
            faces: Vec::new(),
            selected: false,
        });
        self.edge_map.insert(key, id);
        self.vertices[a.0 as usize].edges.push(id);
        self.vertices[b.0 as usize].edges.push(id);
        Ok(id)
    }

    /// Add a polygon face over an ordered vertex loop
    ///
    /// Missing boundary edges are created; all back-references are wired.
    pub fn add_face(&mut self, loop_ids: &[VertexId]) -> Result<FaceId> {
        if loop_ids.len() < 3 {
            return Err(MeshError::DegenerateFace(format!(
                "needs at least 3 vertices, got {}",
                loop_ids.len()
            )));
        }
        let mut seen = HashSet::with_capacity(loop_ids.len());
        for &v in loop_ids {
            self.check_vertex(v)?;
            if !seen.insert(v) {
                return Err(MeshError::DegenerateFace(format!(
                    "vertex {:?} appears more than once",
                    v
                )));
            }
        }

        let id = FaceId(self.faces.len() as u32);
        let n = loop_ids.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let edge = self.add_edge(loop_ids[i], loop_ids[(i + 1) % n])?;
            self.edges[edge.0 as usize].faces.push(id);
            edges.push(edge);
        }
        for &v in loop_ids {
            self.vertices[v.0 as usize].faces.push(id);
        }

        self.faces.push(Face {
            id,
            vertices: loop_ids.to_vec(),
            edges,
            selected: false,
        });
        Ok(id)
    }

    pub(crate) fn check_vertex(&self, v: VertexId) -> Result<()> {
        if (v.0 as usize) < self.vertices.len() {
            Ok(())
        } else {
            Err(MeshError::InvalidVertex(v))
        }
    }
}

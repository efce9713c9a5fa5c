//! Reference surfaces from Bevy meshes.

use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use super::ReferenceSurface;
use crate::error::{RelaxError, Result};

impl ReferenceSurface {
    /// Snapshot a Bevy triangle-list mesh.
    ///
    /// The mesh must have position attributes and triangle indices.
    pub fn from_bevy_mesh(mesh: &Mesh) -> Result<Self> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return Err(RelaxError::InvalidReferenceMesh(
                "primitive topology is not a triangle list".to_string(),
            ));
        }

        let positions: Vec<glam::Vec3> = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .ok_or_else(|| RelaxError::InvalidReferenceMesh("no positions".to_string()))?
            .iter()
            .map(|&p| glam::Vec3::from_array(p))
            .collect();

        let indices: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(idx)) => idx.to_vec(),
            None => {
                return Err(RelaxError::InvalidReferenceMesh("no indices".to_string()));
            }
        };

        if indices.len() % 3 != 0 {
            return Err(RelaxError::InvalidReferenceMesh(
                "index count not divisible by 3".to_string(),
            ));
        }

        let triangles: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();

        tracing::debug!(
            "from_bevy_mesh: {} positions, {} triangles",
            positions.len(),
            triangles.len()
        );
        Self::from_triangles(&positions, &triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reproject::SurfaceProjector;
    use bevy::asset::RenderAssetUsages;

    fn create_test_triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        mesh.insert_indices(Indices::U32(vec![0, 1, 2]));
        mesh
    }

    #[test]
    fn test_from_bevy_mesh_single_triangle() {
        let surface = ReferenceSurface::from_bevy_mesh(&create_test_triangle_mesh()).unwrap();
        assert_eq!(surface.triangle_count(), 1);

        let hit = surface
            .nearest_point(glam::Vec3::new(0.25, 0.25, 1.0))
            .unwrap();
        assert!((hit - glam::Vec3::new(0.25, 0.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_from_bevy_mesh_requires_indices() {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0f32, 0.0, 0.0]]);
        assert!(matches!(
            ReferenceSurface::from_bevy_mesh(&mesh),
            Err(RelaxError::InvalidReferenceMesh(_))
        ));
    }
}

//! Writing a displacement map back into the mesh.

use glam::Vec3;
use retopo_mesh::{MeshAccess, VertexId};

use crate::error::Result;
use crate::reproject::SurfaceProjector;
use crate::types::DisplacementMap;

/// One vertex position change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMove {
    pub vertex: VertexId,
    pub from: Vec3,
    pub to: Vec3,
}

impl VertexMove {
    pub fn distance(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// What a commit changed, in vertex handle order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitResult {
    pub moves: Vec<VertexMove>,
    pub max_displacement: f32,
}

impl CommitResult {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }
}

/// Reproject every proposed position, then write them all.
///
/// Nothing is written unless every lookup and projection succeeds, so a
/// failure leaves the mesh exactly as it was.
pub fn commit<M, P>(mesh: &mut M, displacement: &DisplacementMap, projector: &P) -> Result<CommitResult>
where
    M: MeshAccess + ?Sized,
    P: SurfaceProjector + ?Sized,
{
    let mut staged: Vec<VertexMove> = Vec::with_capacity(displacement.len());
    for (&vertex, &target) in displacement {
        let from = mesh.position(vertex)?;
        let to = projector.nearest_point(target)?;
        staged.push(VertexMove { vertex, from, to });
    }
    staged.sort_unstable_by_key(|m| m.vertex);

    let mut max_displacement = 0.0f32;
    for mv in &staged {
        mesh.set_position(mv.vertex, mv.to)?;
        max_displacement = max_displacement.max(mv.distance());
    }

    Ok(CommitResult {
        moves: staged,
        max_displacement,
    })
}

//! Relax pass orchestration.
//!
//! One pass runs:
//! 1. Working set → displacement map (`relax`)
//! 2. Displacement map → reprojected, committed positions (`commit`)
//! 3. Committed moves → undo capture

use retopo_mesh::MeshAccess;
use serde::Serialize;
use tracing::{debug, trace};

use crate::commit::{CommitResult, commit};
use crate::error::Result;
use crate::relaxation::{RelaxParams, average_edge_length, relax};
use crate::reproject::SurfaceProjector;
use crate::types::WorkingSet;
use crate::undo::UndoProvider;

/// Summary of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RelaxStats {
    /// Number of vertices written back to the mesh.
    pub vertices_committed: usize,
    /// Working edges considered.
    pub edges: usize,
    /// Working faces considered.
    pub faces: usize,
    /// Target edge length used by the pass.
    pub average_edge_length: f32,
    /// Largest single vertex move, after reprojection.
    pub max_displacement: f32,
}

/// Result of [`run_pass`].
#[derive(Debug, Clone, Default)]
pub struct PassResult {
    pub stats: RelaxStats,
    pub commit: CommitResult,
}

/// Relax, reproject, commit, and record undo for one working set.
///
/// On error the mesh is untouched and nothing is recorded.
pub fn run_pass<M, P, U>(
    mesh: &mut M,
    set: &WorkingSet,
    params: &RelaxParams,
    projector: &P,
    undo: &mut U,
) -> Result<PassResult>
where
    M: MeshAccess + ?Sized,
    P: SurfaceProjector + ?Sized,
    U: UndoProvider + ?Sized,
{
    if set.is_empty() {
        trace!("run_pass: empty working set");
        return Ok(PassResult::default());
    }

    let avg = match params.avg_edge_len_override {
        Some(len) => len,
        None => average_edge_length(mesh, &set.edges)?.unwrap_or(0.0),
    };
    // Pin the mean so relax does not recompute it
    let params = RelaxParams {
        avg_edge_len_override: Some(avg),
        ..*params
    };

    let displacement = relax(mesh, set, &params)?;
    let committed = commit(mesh, &displacement, projector)?;

    for mv in &committed.moves {
        undo.record_original(mv.vertex, mv.from);
    }

    let stats = RelaxStats {
        vertices_committed: committed.len(),
        edges: set.edges.len(),
        faces: set.faces.len(),
        average_edge_length: avg,
        max_displacement: committed.max_displacement,
    };
    debug!(
        "Relax pass: {} vertices, {} edges, {} faces, max move {:.5}",
        stats.vertices_committed, stats.edges, stats.faces, stats.max_displacement
    );

    Ok(PassResult {
        stats,
        commit: committed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reproject::{IdentityProjector, ReferenceSurface};
    use crate::undo::UndoStack;
    use glam::Vec3;
    use retopo_mesh::{PolyMesh, VertexId};

    fn rectangle() -> PolyMesh {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        PolyMesh::from_polygons(&positions, &[vec![0, 1, 2, 3]]).unwrap()
    }

    fn full_set(mesh: &PolyMesh) -> WorkingSet {
        let mut set = WorkingSet::new();
        set.vertices.extend(mesh.vertex_ids());
        set.edges.extend(mesh.edge_ids());
        set.faces.extend(mesh.face_ids());
        set
    }

    #[test]
    fn test_pass_commits_and_records_undo() {
        let mut mesh = rectangle();
        let set = full_set(&mesh);
        let mut undo = UndoStack::default();
        undo.push_checkpoint("relax");

        let result = run_pass(
            &mut mesh,
            &set,
            &RelaxParams::default(),
            &IdentityProjector,
            &mut undo,
        )
        .unwrap();

        assert_eq!(result.stats.vertices_committed, 4);
        assert_eq!(result.stats.edges, 4);
        assert_eq!(result.stats.faces, 1);
        assert!((result.stats.average_edge_length - 1.5).abs() < 1e-6);
        assert!(result.stats.max_displacement > 0.0);

        let p0 = mesh.position(VertexId(0)).unwrap();
        assert!((p0 - Vec3::new(0.1, -0.05, 0.0)).length() < 1e-5);

        let entry = undo.cancel_to_checkpoint().unwrap();
        assert_eq!(entry.positions[&VertexId(0)], Vec3::ZERO);
        assert_eq!(entry.positions.len(), 4);
    }

    #[test]
    fn test_repeated_passes_keep_first_capture() {
        let mut mesh = rectangle();
        let set = full_set(&mesh);
        let mut undo = UndoStack::default();
        undo.push_checkpoint("relax");

        for _ in 0..3 {
            run_pass(&mut mesh, &set, &RelaxParams::default(), &IdentityProjector, &mut undo)
                .unwrap();
        }

        let entry = undo.cancel_to_checkpoint().unwrap();
        entry.restore(&mut mesh).unwrap();
        assert_eq!(mesh.position(VertexId(1)).unwrap(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(mesh.position(VertexId(2)).unwrap(), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_pass_stays_on_reference() {
        let mut mesh = rectangle();
        let surface = ReferenceSurface::from_mesh(&mesh).unwrap();
        // Lift one vertex off the plane before relaxing
        mesh.set_position(VertexId(2), Vec3::new(2.0, 1.0, 0.5)).unwrap();
        let set = full_set(&mesh);
        let mut undo = UndoStack::default();

        run_pass(&mut mesh, &set, &RelaxParams::default(), &surface, &mut undo).unwrap();
        for v in mesh.vertex_ids() {
            assert!(mesh.position(v).unwrap().z.abs() < 1e-5);
        }
    }

    #[test]
    fn test_stats_serialize() {
        let stats = RelaxStats {
            vertices_committed: 3,
            edges: 4,
            ..RelaxStats::default()
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["vertices_committed"], 3);
        assert_eq!(value["edges"], 4);
    }

    #[test]
    fn test_empty_set_is_noop() {
        let mut mesh = rectangle();
        let mut undo = UndoStack::default();
        undo.push_checkpoint("relax");
        let result = run_pass(
            &mut mesh,
            &WorkingSet::new(),
            &RelaxParams::default(),
            &IdentityProjector,
            &mut undo,
        )
        .unwrap();
        assert_eq!(result.stats, RelaxStats::default());
        assert!(result.commit.is_empty());
        assert!(undo.cancel_to_checkpoint().unwrap().is_empty());
    }
}

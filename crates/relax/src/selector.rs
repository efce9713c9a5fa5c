//! Working set selection.
//!
//! Two ways to pick what a pass relaxes:
//! - brush mode gathers vertices near the cursor plus their full edge/face
//!   neighborhood, with a falloff weight per vertex;
//! - selection mode takes the host's selection verbatim and only keeps edges
//!   and faces the user actually selected, at full strength.

use glam::Vec3;
use retopo_mesh::{EdgeId, FaceId, MeshAccess, VertexId};
use std::collections::HashMap;
use tracing::trace;

use crate::brush::FalloffCurve;
use crate::error::Result;
use crate::spatial::VertexOctree;
use crate::types::WorkingSet;

/// Build a working set from `(vertex, falloff distance)` pairs.
///
/// Each distance is recorded exactly as given; edges and faces are the union
/// of everything incident to the matched vertices.
pub fn select_from_nearest<M: MeshAccess + ?Sized>(
    mesh: &M,
    nearest: impl IntoIterator<Item = (VertexId, f32)>,
) -> Result<WorkingSet> {
    let mut set = WorkingSet::new();
    for (vertex, d) in nearest {
        set.edges.extend(mesh.incident_edges(vertex)?.iter().copied());
        set.faces.extend(mesh.incident_faces(vertex)?.iter().copied());
        set.vertices.insert(vertex);
        set.weights.insert(vertex, d);
    }
    Ok(set)
}

/// Select every vertex within `radius` of `query_point`.
///
/// Each vertex's weight is the brush falloff distance: `distance / radius`
/// for a linear curve. A non-positive or non-finite radius selects nothing.
pub fn select_by_proximity<M: MeshAccess + ?Sized>(
    mesh: &M,
    index: &VertexOctree,
    query_point: Vec3,
    radius: f32,
    falloff: FalloffCurve,
) -> Result<WorkingSet> {
    if !radius.is_finite() || radius <= 0.0 {
        return Ok(WorkingSet::new());
    }

    let hits = index.query_sphere_with_distance(query_point, radius);
    trace!(
        "select_by_proximity: {} vertices within {} of {:?}",
        hits.len(),
        radius,
        query_point
    );

    select_from_nearest(
        mesh,
        hits.into_iter()
            .map(|(v, dist)| (v, falloff.falloff_distance(dist, radius))),
    )
}

/// Build a working set from an explicit selection.
///
/// Edges are kept only when both endpoints are in `vertices`, faces only when
/// their whole loop is. Weights default to 0 (full strength) for every vertex
/// unless `weights` supplies one.
pub fn select_explicit<M: MeshAccess + ?Sized>(
    mesh: &M,
    vertices: impl IntoIterator<Item = VertexId>,
    selected_edges: impl IntoIterator<Item = EdgeId>,
    selected_faces: impl IntoIterator<Item = FaceId>,
    weights: Option<&HashMap<VertexId, f32>>,
) -> Result<WorkingSet> {
    let mut set = WorkingSet::new();
    for vertex in vertices {
        // Fail on foreign handles now rather than mid-pass
        mesh.position(vertex)?;
        let d = weights
            .and_then(|w| w.get(&vertex).copied())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        set.vertices.insert(vertex);
        set.weights.insert(vertex, d);
    }

    for edge in selected_edges {
        let [a, b] = mesh.endpoints(edge)?;
        if set.vertices.contains(&a) && set.vertices.contains(&b) {
            set.edges.insert(edge);
        }
    }

    for face in selected_faces {
        if mesh
            .vertices_of(face)?
            .iter()
            .all(|v| set.vertices.contains(v))
        {
            set.faces.insert(face);
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retopo_mesh::PolyMesh;

    /// 3x1 strip of quads along x:
    ///
    /// ```text
    /// 4---5---6---7
    /// |   |   |   |
    /// 0---1---2---3
    /// ```
    fn strip() -> PolyMesh {
        let positions: Vec<Vec3> = (0..8)
            .map(|i| Vec3::new((i % 4) as f32, (i / 4) as f32, 0.0))
            .collect();
        let polygons = [vec![0, 1, 5, 4], vec![1, 2, 6, 5], vec![2, 3, 7, 6]];
        PolyMesh::from_polygons(&positions, &polygons).unwrap()
    }

    #[test]
    fn test_zero_radius_selects_nothing() {
        let mesh = strip();
        let index = VertexOctree::from_mesh(&mesh).unwrap();
        for radius in [0.0, -1.0] {
            let set = select_by_proximity(&mesh, &index, Vec3::ZERO, radius, FalloffCurve::Linear)
                .unwrap();
            assert!(set.vertices.is_empty());
            assert!(set.edges.is_empty());
            assert!(set.faces.is_empty());
            assert!(set.weights.is_empty());
        }
    }

    #[test]
    fn test_proximity_collects_neighborhood() {
        let mesh = strip();
        let index = VertexOctree::from_mesh(&mesh).unwrap();

        // Only vertex 0 is within 0.5 of the origin
        let set =
            select_by_proximity(&mesh, &index, Vec3::new(0.25, 0.0, 0.0), 0.5, FalloffCurve::Linear)
                .unwrap();
        assert_eq!(set.vertices.len(), 1);
        assert!(set.vertices.contains(&VertexId(0)));
        assert_eq!(set.edges.len(), 2);
        assert_eq!(set.faces.len(), 1);
        assert!((set.weight(VertexId(0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_weights_grow_toward_rim() {
        let mesh = strip();
        let index = VertexOctree::from_mesh(&mesh).unwrap();
        let set =
            select_by_proximity(&mesh, &index, Vec3::new(1.0, 0.0, 0.0), 1.5, FalloffCurve::Linear)
                .unwrap();
        // 1 at center, 0/2/5 at distance 1, 4/6 at sqrt(2)
        assert_eq!(set.vertices.len(), 6);
        assert!(set.weight(VertexId(1)).abs() < 1e-6);
        assert!((set.weight(VertexId(2)) - 1.0 / 1.5).abs() < 1e-5);
        assert!((set.weight(VertexId(6)) - 2f32.sqrt() / 1.5).abs() < 1e-5);
        for d in set.weights.values() {
            assert!((0.0..=1.0).contains(d));
        }
    }

    #[test]
    fn test_explicit_respects_selected_edges() {
        let mut mesh = strip();
        mesh.select_face(retopo_mesh::FaceId(0)).unwrap();
        // Vertex 2 is selected alone: edge 1-2 has both endpoints selected but
        // was never selected itself, so it stays out
        mesh.select_vertex(VertexId(2)).unwrap();

        let set = select_explicit(
            &mesh,
            mesh.selected_vertices(),
            mesh.selected_edges(),
            mesh.selected_faces(),
            None,
        )
        .unwrap();

        assert_eq!(set.vertices.len(), 5);
        assert_eq!(set.edges.len(), 4);
        assert_eq!(set.faces.len(), 1);
        assert!(set.weights.values().all(|&d| d == 0.0));
    }

    #[test]
    fn test_explicit_drops_edges_outside_vertex_set() {
        let mesh = strip();
        let e01 = mesh.find_edge(VertexId(0), VertexId(1)).unwrap();
        let e12 = mesh.find_edge(VertexId(1), VertexId(2)).unwrap();
        let weights = HashMap::from([(VertexId(1), 0.25)]);

        let set = select_explicit(
            &mesh,
            [VertexId(0), VertexId(1)],
            [e01, e12],
            [FaceId(0)],
            Some(&weights),
        )
        .unwrap();
        assert_eq!(set.edges.len(), 1);
        assert!(set.edges.contains(&e01));
        assert!(set.faces.is_empty());
        assert_eq!(set.weight(VertexId(1)), 0.25);
        assert_eq!(set.weight(VertexId(0)), 0.0);
    }

    #[test]
    fn test_explicit_rejects_foreign_handles() {
        let mesh = strip();
        let err = select_explicit(&mesh, [VertexId(99)], [], [], None).unwrap_err();
        assert_eq!(
            err,
            crate::RelaxError::Mesh(retopo_mesh::MeshError::InvalidVertex(VertexId(99)))
        );
    }

    #[test]
    fn test_from_nearest_records_distances() {
        let mesh = strip();
        let set = select_from_nearest(&mesh, [(VertexId(5), 0.3), (VertexId(6), 1.7)]).unwrap();
        assert_eq!(set.weight(VertexId(5)), 0.3);
        assert_eq!(set.weight(VertexId(6)), 1.7);
        // 5 and 6 each touch 3 edges; the edge 5-6 is shared
        assert_eq!(set.edges.len(), 5);
        assert_eq!(set.faces.len(), 3);
    }
}

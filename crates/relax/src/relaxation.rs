//! One relaxation pass over a working set.
//!
//! Two terms push vertices toward an even mesh:
//! - edge-length equalization pulls every working edge toward the mean length;
//! - face squaring pushes each face's vertices toward a common distance from
//!   the face center.
//!
//! Like the smooth brush, all offsets are computed against the positions at
//! the start of the pass and accumulated into a separate map. The mesh is
//! never written here.

use retopo_config::{DEFAULT_EDGE_FACTOR, RelaxConfig};
use retopo_mesh::{EdgeId, MeshAccess};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

use crate::error::Result;
use crate::types::{DisplacementMap, WorkingSet};

/// Tuning for a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxParams {
    /// Overall step scale, already multiplied by brush strength and time
    pub strength: f32,
    /// Scale of the edge-length term
    pub edge_factor: f32,
    /// Target edge length; the working set mean is used when `None`
    pub avg_edge_len_override: Option<f32>,
}

impl Default for RelaxParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            edge_factor: DEFAULT_EDGE_FACTOR,
            avg_edge_len_override: None,
        }
    }
}

impl RelaxParams {
    /// Parameters for one timer tick: `base_strength * brush_strength * elapsed`.
    pub fn for_tick(config: &RelaxConfig, brush_strength: f32, elapsed_seconds: f32) -> Self {
        Self {
            strength: config.base_strength * brush_strength * elapsed_seconds,
            edge_factor: config.edge_factor,
            avg_edge_len_override: None,
        }
    }
}

/// Mean length of `edges`, or `None` for an empty set.
///
/// Edges are summed in handle order so the result does not depend on hash
/// iteration order.
pub fn average_edge_length<M: MeshAccess + ?Sized>(
    mesh: &M,
    edges: &HashSet<EdgeId>,
) -> Result<Option<f32>> {
    if edges.is_empty() {
        return Ok(None);
    }
    let mut sorted: Vec<EdgeId> = edges.iter().copied().collect();
    sorted.sort_unstable();

    let mut total = 0.0;
    for edge in &sorted {
        total += mesh.length(*edge)?;
    }
    Ok(Some(total / sorted.len() as f32))
}

/// Compute new positions for the working set's vertices.
///
/// The returned map holds an entry for every vertex of `set.vertices` that
/// touches at least one working edge or face. Neighbors outside the vertex
/// set contribute their positions but are never moved.
pub fn relax<M: MeshAccess + ?Sized>(
    mesh: &M,
    set: &WorkingSet,
    params: &RelaxParams,
) -> Result<DisplacementMap> {
    let mut map = DisplacementMap::new();
    if set.is_empty() {
        return Ok(map);
    }

    let avg = match params.avg_edge_len_override {
        Some(len) => len,
        None => average_edge_length(mesh, &set.edges)?.unwrap_or(0.0),
    };

    // Seed with every position either term may touch
    for &edge in &set.edges {
        for v in mesh.endpoints(edge)? {
            if !map.contains_key(&v) {
                map.insert(v, mesh.position(v)?);
            }
        }
    }
    for &face in &set.faces {
        for &v in mesh.vertices_of(face)? {
            if !map.contains_key(&v) {
                map.insert(v, mesh.position(v)?);
            }
        }
    }

    let mut sources: Vec<_> = set.vertices.iter().copied().collect();
    sources.sort_unstable();

    let strength = params.strength;
    let mut processed: HashSet<EdgeId> = HashSet::with_capacity(set.edges.len());

    for v0 in sources {
        let edges = mesh.incident_edges(v0)?;
        if edges.is_empty() {
            continue;
        }
        let falloff = 1.0 - set.weight(v0);
        let p0 = mesh.position(v0)?;

        for &edge in edges {
            if !set.edges.contains(&edge) || !processed.insert(edge) {
                continue;
            }
            let v1 = mesh.other_endpoint(edge, v0)?;
            let diff = mesh.position(v1)? - p0;
            let m = (avg - diff.length()) * falloff * params.edge_factor;
            let step = diff * m * strength;
            if let Some(p) = map.get_mut(&v1) {
                *p += step;
            }
            if let Some(p) = map.get_mut(&v0) {
                *p -= step;
            }
        }

        for &face in mesh.incident_faces(v0)? {
            if !set.faces.contains(&face) {
                continue;
            }
            let loop_ids = mesh.vertices_of(face)?;
            let count = loop_ids.len() as f32;
            let mut positions = Vec::with_capacity(loop_ids.len());
            for &v in loop_ids {
                positions.push((v, mesh.position(v)?));
            }

            let center = positions.iter().map(|(_, p)| *p).sum::<glam::Vec3>() / count;
            let face_dist = positions
                .iter()
                .map(|(_, p)| p.distance(center))
                .sum::<f32>()
                / count;

            for (v, p) in positions {
                let diff = p - center;
                let m = (face_dist - diff.length()) * falloff / count;
                if let Some(target) = map.get_mut(&v) {
                    *target += diff * m * strength;
                }
            }
        }
    }

    map.retain(|v, _| set.vertices.contains(v));

    trace!(
        "relax: {} vertices, {} edges, {} faces, avg edge {:.4}, strength {:.4}",
        map.len(),
        set.edges.len(),
        set.faces.len(),
        avg,
        strength
    );

    Ok(map)
}

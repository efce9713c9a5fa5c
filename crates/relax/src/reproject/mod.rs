//! Snapping relaxed positions back onto a reference surface.

use glam::Vec3;
use retopo_mesh::PolyMesh;
use tracing::debug;

use crate::error::{RelaxError, Result};
use crate::spatial::Aabb;

#[cfg(feature = "bevy")]
mod bevy_mesh;

/// Maps a point to the closest point on some surface.
///
/// Implementations must be deterministic: the same input always yields the
/// same output.
pub trait SurfaceProjector {
    fn nearest_point(&self, point: Vec3) -> Result<Vec3>;
}

/// Projector used when no reference surface is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityProjector;

impl SurfaceProjector for IdentityProjector {
    fn nearest_point(&self, point: Vec3) -> Result<Vec3> {
        Ok(point)
    }
}

/// `None` leaves points where they are.
impl<P: SurfaceProjector> SurfaceProjector for Option<P> {
    fn nearest_point(&self, point: Vec3) -> Result<Vec3> {
        match self {
            Some(projector) => projector.nearest_point(point),
            None => Ok(point),
        }
    }
}

impl<P: SurfaceProjector + ?Sized> SurfaceProjector for &P {
    fn nearest_point(&self, point: Vec3) -> Result<Vec3> {
        (**self).nearest_point(point)
    }
}

/// Triangle soup snapshot of a reference mesh.
///
/// Each triangle carries its bounding box so queries can skip triangles that
/// cannot beat the best hit found so far.
#[derive(Debug, Clone)]
pub struct ReferenceSurface {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: Vec<Aabb>,
}

impl ReferenceSurface {
    pub fn from_triangles(positions: &[Vec3], triangles: &[[u32; 3]]) -> Result<Self> {
        if triangles.is_empty() {
            return Err(RelaxError::EmptyReferenceSurface);
        }

        let mut bounds = Vec::with_capacity(triangles.len());
        for (i, tri) in triangles.iter().enumerate() {
            let mut corners = [Vec3::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(tri) {
                *corner = *positions
                    .get(index as usize)
                    .ok_or(RelaxError::InvalidReferenceIndex { triangle: i, index })?;
            }
            bounds.push(Aabb::from_points(&corners));
        }

        Ok(Self {
            positions: positions.to_vec(),
            triangles: triangles.to_vec(),
            bounds,
        })
    }

    /// Snapshot a polygon mesh, fan-triangulating each face.
    pub fn from_mesh(mesh: &PolyMesh) -> Result<Self> {
        let positions: Vec<Vec3> = mesh.vertices().iter().map(|v| v.position).collect();
        let mut triangles = Vec::new();
        for face in mesh.faces() {
            let Some((first, rest)) = face.vertices.split_first() else {
                continue;
            };
            for pair in rest.windows(2) {
                triangles.push([first.0, pair[0].0, pair[1].0]);
            }
        }
        debug!(
            "Reference surface: {} vertices, {} triangles from {} faces",
            positions.len(),
            triangles.len(),
            mesh.face_count()
        );
        Self::from_triangles(&positions, &triangles)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn corners(&self, tri: &[u32; 3]) -> (Vec3, Vec3, Vec3) {
        (
            self.positions[tri[0] as usize],
            self.positions[tri[1] as usize],
            self.positions[tri[2] as usize],
        )
    }
}

impl SurfaceProjector for ReferenceSurface {
    fn nearest_point(&self, point: Vec3) -> Result<Vec3> {
        if !point.is_finite() {
            return Err(RelaxError::Projection {
                point: point.to_array(),
                reason: "point is not finite",
            });
        }

        let mut best = None;
        let mut best_dist_sq = f32::INFINITY;
        for (tri, bounds) in self.triangles.iter().zip(&self.bounds) {
            if bounds.distance_squared(point) >= best_dist_sq {
                continue;
            }
            let (a, b, c) = self.corners(tri);
            let candidate = closest_point_on_triangle(point, a, b, c);
            let dist_sq = candidate.distance_squared(point);
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = Some(candidate);
            }
        }

        best.ok_or(RelaxError::Projection {
            point: point.to_array(),
            reason: "no triangle within reach",
        })
    }
}

/// Closest point on triangle `abc` to `p` (Voronoi region walk).
fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1.mul_add(d4, -(d3 * d2));
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5.mul_add(d2, -(d1 * d6));
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3.mul_add(d6, -(d5 * d4));
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let sum = va + vb + vc;
    if sum.abs() <= f32::EPSILON {
        // Zero-area triangle that slipped past the edge regions
        return a;
    }
    let denom = 1.0 / sum;
    a + ab * (vb * denom) + ac * (vc * denom)
}

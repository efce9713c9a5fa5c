//! Spatial index for brush queries.
//!
//! An octree over vertex positions answers "which vertices lie within the
//! brush radius" without scanning the whole mesh every tick. Positions are
//! kept in sync with the mesh by [`VertexOctree::update`] after each commit.

use glam::Vec3;
use retopo_mesh::{MeshAccess, VertexId};

use crate::error::Result;

/// Deepest level a leaf may sit at.
const MAX_DEPTH: u32 = 8;
/// Leaf capacity before it splits.
const MAX_LEAF_ITEMS: usize = 16;
/// Nodes whose longest side is below twice this never split.
const MIN_NODE_EXTENT: f32 = 0.01;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any included point replaces
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut aabb = Self::empty();
        for &p in points {
            aabb.include_point(p);
        }
        aabb
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from `point` to the box (0 inside)
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let nearest = point.max(self.min).min(self.max);
        nearest.distance_squared(point)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.distance_squared(center) <= radius * radius
    }

    /// Octant index (0-7) of `point`, one bit per axis at or above the center
    fn octant(&self, point: Vec3) -> usize {
        let above = point.cmpge(self.center());
        usize::from(above.test(0)) | (usize::from(above.test(1)) << 1) | (usize::from(above.test(2)) << 2)
    }

    fn child_bounds(&self, octant: usize) -> Aabb {
        let center = self.center();
        let pick = |bit: usize, axis: usize| {
            if octant & bit != 0 {
                (center[axis], self.max[axis])
            } else {
                (self.min[axis], center[axis])
            }
        };
        let (x0, x1) = pick(1, 0);
        let (y0, y1) = pick(2, 1);
        let (z0, z1) = pick(4, 2);
        Aabb::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        bounds: Aabb,
        items: Vec<(VertexId, Vec3)>,
    },
    Branch {
        bounds: Aabb,
        children: Box<[Option<Node>; 8]>,
    },
}

impl Node {
    fn leaf(bounds: Aabb) -> Self {
        Node::Leaf {
            bounds,
            items: Vec::new(),
        }
    }

    fn bounds(&self) -> &Aabb {
        match self {
            Node::Leaf { bounds, .. } | Node::Branch { bounds, .. } => bounds,
        }
    }

    fn insert(&mut self, vertex: VertexId, position: Vec3, depth: u32) {
        match self {
            Node::Leaf { bounds, items } => {
                items.push((vertex, position));
                // Longest side, so flat retopo patches still subdivide
                let splittable =
                    depth < MAX_DEPTH && bounds.size().max_element() > MIN_NODE_EXTENT * 2.0;
                if items.len() > MAX_LEAF_ITEMS && splittable {
                    let bounds = *bounds;
                    let moved = std::mem::take(items);
                    *self = Node::Branch {
                        bounds,
                        children: Box::default(),
                    };
                    for (v, p) in moved {
                        self.insert(v, p, depth);
                    }
                }
            }
            Node::Branch { bounds, children } => {
                let octant = bounds.octant(position);
                children[octant]
                    .get_or_insert_with(|| Node::leaf(bounds.child_bounds(octant)))
                    .insert(vertex, position, depth + 1);
            }
        }
    }

    fn remove(&mut self, vertex: VertexId, position: Vec3) -> bool {
        match self {
            Node::Leaf { items, .. } => match items.iter().position(|(v, _)| *v == vertex) {
                Some(idx) => {
                    items.swap_remove(idx);
                    true
                }
                None => false,
            },
            Node::Branch { bounds, children } => {
                let octant = bounds.octant(position);
                children[octant]
                    .as_mut()
                    .is_some_and(|child| child.remove(vertex, position))
            }
        }
    }

    fn query(&self, center: Vec3, radius: f32, out: &mut Vec<(VertexId, f32)>) {
        if !self.bounds().intersects_sphere(center, radius) {
            return;
        }
        match self {
            Node::Leaf { items, .. } => {
                let radius_sq = radius * radius;
                out.extend(items.iter().filter_map(|&(v, p)| {
                    let dist_sq = p.distance_squared(center);
                    (dist_sq <= radius_sq).then(|| (v, dist_sq.sqrt()))
                }));
            }
            Node::Branch { children, .. } => {
                for child in children.iter().flatten() {
                    child.query(center, radius, out);
                }
            }
        }
    }

    fn count(&self) -> usize {
        match self {
            Node::Leaf { items, .. } => items.len(),
            Node::Branch { children, .. } => children.iter().flatten().map(Node::count).sum(),
        }
    }
}

/// Octree of vertex positions for radius queries.
#[derive(Debug, Clone)]
pub struct VertexOctree {
    root: Node,
}

impl VertexOctree {
    /// Build an octree whose bounds enclose every given position.
    pub fn from_vertices(vertices: impl IntoIterator<Item = (VertexId, Vec3)>) -> Self {
        let items: Vec<(VertexId, Vec3)> = vertices.into_iter().collect();
        let mut bounds = if items.is_empty() {
            Aabb::new(Vec3::ZERO, Vec3::ZERO)
        } else {
            let mut b = Aabb::empty();
            items.iter().for_each(|&(_, p)| b.include_point(p));
            b
        };

        // Pad so vertices relaxed slightly outward stay indexable in place
        let padding = bounds.size() * 0.01 + Vec3::splat(0.001);
        bounds.min -= padding;
        bounds.max += padding;

        let mut root = Node::leaf(bounds);
        for (v, p) in items {
            root.insert(v, p, 0);
        }
        Self { root }
    }

    /// Build an octree over every vertex of a mesh.
    pub fn from_mesh<M: MeshAccess + ?Sized>(mesh: &M) -> Result<Self> {
        let positions = mesh
            .vertex_handles()
            .into_iter()
            .map(|v| -> Result<(VertexId, Vec3)> { Ok((v, mesh.position(v)?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_vertices(positions))
    }

    /// Bounds of the root node
    pub fn bounds(&self) -> Aabb {
        *self.root.bounds()
    }

    /// Index a vertex. Returns `false` if it lies outside the root bounds.
    pub fn insert(&mut self, vertex: VertexId, position: Vec3) -> bool {
        if !self.root.bounds().contains_point(position) {
            return false;
        }
        self.root.insert(vertex, position, 0);
        true
    }

    /// Every vertex within `radius` of `center`, with its distance.
    ///
    /// Order is unspecified.
    pub fn query_sphere_with_distance(&self, center: Vec3, radius: f32) -> Vec<(VertexId, f32)> {
        let mut results = Vec::new();
        if radius >= 0.0 {
            self.root.query(center, radius, &mut results);
        }
        results
    }

    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move a vertex within the octree.
    ///
    /// Returns `false` when the new position falls outside the root bounds;
    /// the vertex is then dropped from the index and the caller should
    /// rebuild it.
    pub fn update(&mut self, vertex: VertexId, old_position: Vec3, new_position: Vec3) -> bool {
        self.root.remove(vertex, old_position);
        self.insert(vertex, new_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retopo_mesh::PolyMesh;

    fn ids(mut hits: Vec<(VertexId, f32)>) -> Vec<VertexId> {
        hits.sort_by_key(|(v, _)| *v);
        hits.into_iter().map(|(v, _)| v).collect()
    }

    #[test]
    fn test_query_reports_distances() {
        let octree = VertexOctree::from_vertices([
            (VertexId(0), Vec3::ZERO),
            (VertexId(1), Vec3::new(3.0, 0.0, 0.0)),
            (VertexId(2), Vec3::new(0.0, 4.0, 0.0)),
        ]);

        let mut hits = octree.query_sphere_with_distance(Vec3::ZERO, 3.5);
        hits.sort_by_key(|(id, _)| *id);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, VertexId(0));
        assert!(hits[0].1.abs() < 1e-6);
        assert!((hits[1].1 - 3.0).abs() < 1e-6);

        assert!(octree.query_sphere_with_distance(Vec3::ZERO, -1.0).is_empty());
    }

    #[test]
    fn test_flat_grid_splits_and_finds_everything() {
        // 10x10 planar grid, one point per unit
        let vertices = (0..100).map(|i| {
            let (x, y) = ((i % 10) as f32, (i / 10) as f32);
            (VertexId(i), Vec3::new(x, y, 0.0))
        });
        let octree = VertexOctree::from_vertices(vertices);
        assert!(matches!(octree.root, Node::Branch { .. }));
        assert_eq!(octree.len(), 100);
        assert_eq!(
            octree
                .query_sphere_with_distance(Vec3::new(4.5, 4.5, 0.0), 20.0)
                .len(),
            100
        );
        // Radius 1 around a grid point: itself plus its 4 axis neighbors
        let hits = ids(octree.query_sphere_with_distance(Vec3::new(5.0, 5.0, 0.0), 1.0));
        assert_eq!(
            hits,
            vec![VertexId(45), VertexId(54), VertexId(55), VertexId(56), VertexId(65)]
        );
    }

    #[test]
    fn test_octree_update() {
        let mut octree =
            VertexOctree::from_vertices([(VertexId(0), Vec3::ONE), (VertexId(1), Vec3::splat(10.0))]);

        assert!(octree.update(VertexId(0), Vec3::ONE, Vec3::splat(9.0)));
        assert!(octree.query_sphere_with_distance(Vec3::ONE, 0.5).is_empty());
        assert_eq!(
            ids(octree.query_sphere_with_distance(Vec3::splat(9.0), 0.5)),
            vec![VertexId(0)]
        );

        // Outside the root bounds the vertex is dropped and the caller must rebuild
        assert!(!octree.update(VertexId(0), Vec3::splat(9.0), Vec3::splat(20.0)));
        assert_eq!(octree.len(), 1);
    }

    #[test]
    fn test_from_mesh() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = PolyMesh::from_polygons(&positions, &[vec![0, 1, 2]]).unwrap();
        let octree = VertexOctree::from_mesh(&mesh).unwrap();
        assert_eq!(octree.len(), 3);
        assert!(octree.bounds().contains_point(Vec3::X));
    }

    #[test]
    fn test_empty_octree() {
        let octree = VertexOctree::from_vertices(std::iter::empty());
        assert!(octree.is_empty());
        assert!(octree.query_sphere_with_distance(Vec3::ZERO, 1.0).is_empty());
    }

    #[test]
    fn test_aabb_octants() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.distance_squared(Vec3::splat(0.5)), 0.0);
        assert!((aabb.distance_squared(Vec3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-6);
        assert_eq!(aabb.octant(Vec3::new(0.9, 0.1, 0.9)), 0b101);
        assert_eq!(aabb.child_bounds(0b101).min, Vec3::new(0.5, 0.0, 0.5));
    }
}

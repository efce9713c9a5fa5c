//! Host input seen by the relax tool.

use glam::Vec3;
use retopo_mesh::{EdgeId, FaceId, PolyMesh, VertexId};
use std::collections::HashSet;

/// Per-frame action state from the host.
pub trait ActionProvider {
    /// `action` went down this frame
    fn pressed(&self, action: &str) -> bool;

    /// `action` went up this frame
    fn released(&self, action: &str) -> bool;

    /// Whether the tool's timer fired this frame
    fn timer_tick(&self) -> bool;

    /// Seconds since the previous tick
    fn elapsed_time(&self) -> f32;

    /// Point under the cursor on the mesh, if any
    fn hit_position(&self) -> Option<Vec3>;
}

/// The host's current selection.
pub trait SelectionProvider {
    fn selected_vertices(&self) -> Vec<VertexId>;
    fn selected_edges(&self) -> Vec<EdgeId>;
    fn selected_faces(&self) -> Vec<FaceId>;
}

impl SelectionProvider for PolyMesh {
    fn selected_vertices(&self) -> Vec<VertexId> {
        PolyMesh::selected_vertices(self)
    }

    fn selected_edges(&self) -> Vec<EdgeId> {
        PolyMesh::selected_edges(self)
    }

    fn selected_faces(&self) -> Vec<FaceId> {
        PolyMesh::selected_faces(self)
    }
}

/// Snapshot of one frame's input.
///
/// ```
/// use relax::FrameInput;
/// use glam::Vec3;
///
/// let frame = FrameInput::new().press("action").tick(0.02).hit(Vec3::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub pressed: HashSet<String>,
    pub released: HashSet<String>,
    /// Elapsed seconds when the timer fired this frame
    pub tick: Option<f32>,
    pub hit: Option<Vec3>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(mut self, action: &str) -> Self {
        self.pressed.insert(action.to_string());
        self
    }

    pub fn release(mut self, action: &str) -> Self {
        self.released.insert(action.to_string());
        self
    }

    pub fn tick(mut self, elapsed_seconds: f32) -> Self {
        self.tick = Some(elapsed_seconds);
        self
    }

    pub fn hit(mut self, position: Vec3) -> Self {
        self.hit = Some(position);
        self
    }
}

impl ActionProvider for FrameInput {
    fn pressed(&self, action: &str) -> bool {
        self.pressed.contains(action)
    }

    fn released(&self, action: &str) -> bool {
        self.released.contains(action)
    }

    fn timer_tick(&self) -> bool {
        self.tick.is_some()
    }

    fn elapsed_time(&self) -> f32 {
        self.tick.unwrap_or(0.0)
    }

    fn hit_position(&self) -> Option<Vec3> {
        self.hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_input_builder() {
        let frame = FrameInput::new()
            .press("action")
            .release("cancel")
            .tick(0.5)
            .hit(Vec3::ONE);
        assert!(frame.pressed("action"));
        assert!(!frame.pressed("cancel"));
        assert!(frame.released("cancel"));
        assert!(frame.timer_tick());
        assert_eq!(frame.elapsed_time(), 0.5);
        assert_eq!(frame.hit_position(), Some(Vec3::ONE));
    }

    #[test]
    fn test_idle_frame() {
        let frame = FrameInput::new();
        assert!(!frame.timer_tick());
        assert_eq!(frame.elapsed_time(), 0.0);
        assert!(frame.hit_position().is_none());
    }

    #[test]
    fn test_mesh_selection_provider() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mut mesh = PolyMesh::from_polygons(&positions, &[vec![0, 1, 2]]).unwrap();
        mesh.select_face(FaceId(0)).unwrap();

        let provider: &dyn SelectionProvider = &mesh;
        assert_eq!(provider.selected_vertices().len(), 3);
        assert_eq!(provider.selected_edges().len(), 3);
        assert_eq!(provider.selected_faces(), vec![FaceId(0)]);
    }
}

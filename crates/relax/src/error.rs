//! Error types for relax operations.

use retopo_mesh::MeshError;

/// Result alias for relax operations
pub type Result<T> = std::result::Result<T, RelaxError>;

/// Errors that can occur while relaxing a mesh.
///
/// Mesh facade failures pass through unchanged so the host sees the original
/// cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelaxError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("Reference surface has no triangles")]
    EmptyReferenceSurface,

    #[error("Reference mesh is unusable: {0}")]
    InvalidReferenceMesh(String),

    #[error("Reference triangle {triangle} references missing vertex {index}")]
    InvalidReferenceIndex { triangle: usize, index: u32 },

    #[error("Cannot project point {point:?}: {reason}")]
    Projection { point: [f32; 3], reason: &'static str },
}

//! Local mesh relaxation for retopology.
//!
//! This crate nudges vertices of a polygon mesh toward locally uniform edge
//! lengths and square faces, either under a brush or over a frozen selection,
//! and keeps the result on a reference surface.
//!
//! # Architecture
//!
//! Each host frame feeds one [`tool::RelaxTool::update`] call. While a relax
//! action is held, every timer tick runs one pass:
//!
//! 1. **Selector**: brush proximity (via the octree) or frozen selection → [`WorkingSet`]
//! 2. **Relaxation**: working set → displacement map, against a pre-pass snapshot
//! 3. **Reprojection**: every proposed position is snapped to the reference surface
//! 4. **Commit**: staged positions are written back; originals go to the undo stack
//!
//! ## Key Components
//!
//! - **Types**: Working sets and displacement maps
//! - **Brush**: Falloff curves and brush settings
//! - **Spatial**: Octree for brush radius queries
//! - **Relaxation**: Edge equalization and face squaring
//! - **Reproject**: Surface projectors
//! - **Pipeline**: relax → reproject → commit → undo capture
//! - **Tool**: Modal state machine driven by host input

pub mod brush;
pub mod commit;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod relaxation;
pub mod reproject;
pub mod selector;
pub mod spatial;
pub mod tool;
pub mod types;
pub mod undo;

pub use brush::{BrushProvider, BrushSettings, FalloffCurve};
pub use commit::{commit, CommitResult, VertexMove};
pub use error::{RelaxError, Result};
pub use input::{ActionProvider, FrameInput, SelectionProvider};
pub use pipeline::{run_pass, PassResult, RelaxStats};
pub use relaxation::{average_edge_length, relax, RelaxParams};
pub use reproject::{IdentityProjector, ReferenceSurface, SurfaceProjector};
pub use selector::{select_by_proximity, select_explicit, select_from_nearest};
pub use spatial::VertexOctree;
pub use tool::{RelaxTool, TickOutcome, ToolMode, ToolState};
pub use types::{DisplacementMap, WorkingSet};
pub use undo::{UndoEntry, UndoProvider, UndoStack};

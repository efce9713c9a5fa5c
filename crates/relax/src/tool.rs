//! Modal relax tool.
//!
//! - Hold the relax binding to relax under the brush on every timer tick
//! - Hold the relax-selected binding to relax the current selection
//! - Cancel while active restores the mesh to the press

use retopo_config::{ConfigError, RelaxConfig};
use retopo_mesh::MeshAccess;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::brush::BrushProvider;
use crate::error::Result;
use crate::input::{ActionProvider, SelectionProvider};
use crate::pipeline::{PassResult, RelaxStats, run_pass};
use crate::relaxation::RelaxParams;
use crate::reproject::SurfaceProjector;
use crate::selector::{select_by_proximity, select_explicit};
use crate::spatial::VertexOctree;
use crate::types::WorkingSet;
use crate::undo::UndoProvider;

const BRUSH_CHECKPOINT: &str = "relax";
const SELECTION_CHECKPOINT: &str = "relax selected";

/// Which state the tool is in, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Main,
    BrushRelax,
    SelectionRelax,
}

/// Tool state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Idle, waiting for a relax binding
    #[default]
    Main,
    /// Relaxing around the cursor each tick
    BrushRelax,
    /// Relaxing the selection captured when the action started
    SelectionRelax(WorkingSet),
}

impl ToolState {
    pub fn mode(&self) -> ToolMode {
        match self {
            ToolState::Main => ToolMode::Main,
            ToolState::BrushRelax => ToolMode::BrushRelax,
            ToolState::SelectionRelax(_) => ToolMode::SelectionRelax,
        }
    }
}

/// Result of one [`RelaxTool::update`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// State after the update
    pub mode: ToolMode,
    /// Mesh positions changed; the host should redraw
    pub dirty: bool,
    /// Present when a pass ran
    pub stats: Option<RelaxStats>,
}

/// The relax tool driver. Call [`RelaxTool::update`] once per host frame.
#[derive(Debug, Clone, Default)]
pub struct RelaxTool {
    state: ToolState,
    config: RelaxConfig,
    /// Proximity index for brush mode, built on entry
    index: Option<VertexOctree>,
}

impl RelaxTool {
    /// Create an idle tool. Fails if `config` does not validate.
    pub fn new(config: RelaxConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ToolState::Main,
            config,
            index: None,
        })
    }

    pub fn config(&self) -> &RelaxConfig {
        &self.config
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn mode(&self) -> ToolMode {
        self.state.mode()
    }

    pub fn is_active(&self) -> bool {
        self.mode() != ToolMode::Main
    }

    /// Advance the state machine by one frame.
    ///
    /// Errors from a pass leave the mesh untouched and the tool in its
    /// current state.
    pub fn update<M, A, B, U, P>(
        &mut self,
        mesh: &mut M,
        actions: &A,
        brush: &B,
        undo: &mut U,
        projector: &P,
    ) -> Result<TickOutcome>
    where
        M: MeshAccess + SelectionProvider + ?Sized,
        A: ActionProvider + ?Sized,
        B: BrushProvider + ?Sized,
        U: UndoProvider + ?Sized,
        P: SurfaceProjector + ?Sized,
    {
        let bindings = &self.config.bindings;
        let mut dirty = false;
        let mut stats = None;

        match &self.state {
            ToolState::Main => {
                if actions.pressed(&bindings.relax) {
                    let index = VertexOctree::from_mesh(mesh)?;
                    undo.push_checkpoint(BRUSH_CHECKPOINT);
                    self.index = Some(index);
                    self.state = ToolState::BrushRelax;
                    debug!("Relax: entering brush mode");
                } else if actions.pressed(&bindings.relax_selected) {
                    let set = select_explicit(
                        mesh,
                        mesh.selected_vertices(),
                        mesh.selected_edges(),
                        mesh.selected_faces(),
                        None,
                    )?;
                    undo.push_checkpoint(SELECTION_CHECKPOINT);
                    debug!(
                        "Relax: entering selection mode ({} vertices, {} edges, {} faces)",
                        set.vertices.len(),
                        set.edges.len(),
                        set.faces.len()
                    );
                    self.state = ToolState::SelectionRelax(set);
                }
            }

            ToolState::BrushRelax => {
                if actions.released(&bindings.relax) {
                    self.finish(undo);
                } else if actions.pressed(&bindings.cancel) {
                    dirty = self.rollback(mesh, undo)?;
                } else if actions.timer_tick() {
                    let (Some(hit), Some(params)) = (
                        actions.hit_position(),
                        self.tick_params(brush, actions.elapsed_time()),
                    ) else {
                        return Ok(self.outcome(false, None));
                    };

                    let index = match self.index.take() {
                        Some(index) => index,
                        None => VertexOctree::from_mesh(mesh)?,
                    };
                    let set =
                        select_by_proximity(mesh, &index, hit, brush.radius(), brush.falloff());
                    self.index = Some(index);
                    let set = set?;

                    let result = run_pass(mesh, &set, &params, projector, undo)?;
                    self.track_moves(mesh, &result)?;
                    dirty = !result.commit.is_empty();
                    stats = Some(result.stats);
                }
            }

            ToolState::SelectionRelax(set) => {
                if actions.released(&bindings.relax_selected) {
                    self.finish(undo);
                } else if actions.pressed(&bindings.cancel) {
                    dirty = self.rollback(mesh, undo)?;
                } else if actions.timer_tick() {
                    let Some(params) = self.tick_params(brush, actions.elapsed_time()) else {
                        return Ok(self.outcome(false, None));
                    };
                    let result = run_pass(mesh, set, &params, projector, undo)?;
                    dirty = !result.commit.is_empty();
                    stats = Some(result.stats);
                }
            }
        }

        Ok(self.outcome(dirty, stats))
    }

    fn outcome(&self, dirty: bool, stats: Option<RelaxStats>) -> TickOutcome {
        TickOutcome {
            mode: self.mode(),
            dirty,
            stats,
        }
    }

    fn tick_params<B: BrushProvider + ?Sized>(&self, brush: &B, elapsed: f32) -> Option<RelaxParams> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            warn!("Relax: ignoring tick with elapsed time {}", elapsed);
            return None;
        }
        Some(RelaxParams::for_tick(&self.config, brush.strength(), elapsed))
    }

    fn finish<U: UndoProvider + ?Sized>(&mut self, undo: &mut U) {
        undo.finish_checkpoint();
        debug!("Relax: {:?} finished", self.mode());
        self.leave();
    }

    /// Restore everything moved since entry. Returns whether anything moved.
    fn rollback<M, U>(&mut self, mesh: &mut M, undo: &mut U) -> Result<bool>
    where
        M: MeshAccess + ?Sized,
        U: UndoProvider + ?Sized,
    {
        let restored = match undo.cancel_to_checkpoint() {
            Some(entry) => entry.restore(mesh)?,
            None => 0,
        };
        debug!("Relax: {:?} cancelled, restored {} vertices", self.mode(), restored);
        self.leave();
        Ok(restored > 0)
    }

    fn leave(&mut self) {
        self.state = ToolState::Main;
        self.index = None;
    }

    /// Keep the proximity index in step with committed moves.
    fn track_moves<M: MeshAccess + ?Sized>(&mut self, mesh: &M, result: &PassResult) -> Result<()> {
        let Some(index) = self.index.as_mut() else {
            return Ok(());
        };
        let mut stale = false;
        for mv in &result.commit.moves {
            if !index.update(mv.vertex, mv.from, mv.to) {
                stale = true;
            }
        }
        if stale {
            debug!("Relax: vertices left index bounds, rebuilding");
            self.index = Some(VertexOctree::from_mesh(mesh)?);
        }
        Ok(())
    }
}

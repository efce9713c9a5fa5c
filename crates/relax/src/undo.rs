//! Undo checkpoints for relax actions.
//!
//! Each action (one press-to-release of a relax binding) is one checkpoint.
//! A vertex's position is captured the first time the action moves it, so
//! restoring an entry puts the mesh back exactly as it was at the press.

use glam::Vec3;
use retopo_config::{DEFAULT_MAX_UNDO_LEVELS, RelaxConfig};
use retopo_mesh::{MeshAccess, VertexId};
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;

/// Positions captured before an action moved them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoEntry {
    pub label: String,
    pub positions: HashMap<VertexId, Vec3>,
}

impl UndoEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            positions: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Write the captured positions back, returning how many were restored.
    ///
    /// Every handle is checked before the first write.
    pub fn restore<M: MeshAccess + ?Sized>(&self, mesh: &mut M) -> Result<usize> {
        let mut staged: Vec<(VertexId, Vec3)> =
            self.positions.iter().map(|(&v, &p)| (v, p)).collect();
        staged.sort_unstable_by_key(|(v, _)| *v);

        for (vertex, _) in &staged {
            mesh.position(*vertex)?;
        }
        for (vertex, position) in &staged {
            mesh.set_position(*vertex, *position)?;
        }
        Ok(staged.len())
    }
}

/// Host undo system, as seen by the relax tool.
pub trait UndoProvider {
    /// Open a new checkpoint, closing any open one
    fn push_checkpoint(&mut self, label: &str);

    /// Remember `position` as the pre-action position of `vertex`.
    ///
    /// Only the first call per vertex per checkpoint counts.
    fn record_original(&mut self, vertex: VertexId, position: Vec3);

    /// Drop the open checkpoint and hand back what it captured
    fn cancel_to_checkpoint(&mut self) -> Option<UndoEntry>;

    /// Close the open checkpoint so it becomes undoable
    fn finish_checkpoint(&mut self) {}
}

/// Bounded undo history.
#[derive(Debug, Clone)]
pub struct UndoStack {
    open: Option<UndoEntry>,
    entries: Vec<UndoEntry>,
    max_undo_levels: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_LEVELS)
    }
}

impl UndoStack {
    pub fn new(max_undo_levels: usize) -> Self {
        Self {
            open: None,
            entries: Vec::new(),
            max_undo_levels: max_undo_levels.max(1),
        }
    }

    /// Stack sized by `config.max_undo_levels`
    pub fn from_config(config: &RelaxConfig) -> Self {
        Self::new(config.max_undo_levels)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether a checkpoint is currently recording
    pub fn is_recording(&self) -> bool {
        self.open.is_some()
    }

    pub fn latest_label(&self) -> Option<&str> {
        self.entries.last().map(|e| e.label.as_str())
    }

    /// Pop the most recent finished action.
    ///
    /// The caller writes it back with [`UndoEntry::restore`].
    pub fn undo(&mut self) -> Option<UndoEntry> {
        let Some(entry) = self.entries.pop() else {
            debug!("Undo: no entries available");
            return None;
        };
        debug!(
            "Undoing '{}' ({} vertices)",
            entry.label,
            entry.positions.len()
        );
        Some(entry)
    }

    fn close_open(&mut self) {
        let Some(entry) = self.open.take() else {
            return;
        };
        if entry.is_empty() {
            debug!("Discarding empty undo checkpoint '{}'", entry.label);
            return;
        }

        debug!(
            "Saved undo entry '{}' ({} vertices)",
            entry.label,
            entry.positions.len()
        );
        self.entries.push(entry);
        while self.entries.len() > self.max_undo_levels {
            self.entries.remove(0);
        }
    }
}

impl UndoProvider for UndoStack {
    fn push_checkpoint(&mut self, label: &str) {
        self.close_open();
        self.open = Some(UndoEntry::new(label));
    }

    fn record_original(&mut self, vertex: VertexId, position: Vec3) {
        if let Some(entry) = self.open.as_mut() {
            entry.positions.entry(vertex).or_insert(position);
        }
    }

    fn cancel_to_checkpoint(&mut self) -> Option<UndoEntry> {
        self.open.take()
    }

    fn finish_checkpoint(&mut self) {
        self.close_open();
    }
}

use std::collections::VecDeque;

use crate::canvas::Bitmap;

/// Immutable copy of the persisted buffer at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSnapshot {
    pixels: Bitmap,
}

impl CanvasSnapshot {
    pub fn new(pixels: Bitmap) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &Bitmap {
        &self.pixels
    }
}

/// Bounded snapshot history for undo/redo.
///
/// Snapshots live in one arena; everything up to and including `cursor` is
/// the undo sequence (the entry at `cursor` is what the canvas shows), the
/// rest is the redo sequence. The oldest retained entry is the floor that
/// undo never goes past.
#[derive(Debug)]
pub struct HistoryManager {
    snapshots: VecDeque<CanvasSnapshot>,
    cursor: usize,
    max_depth: usize,
}

impl HistoryManager {
    /// Starts with `initial` as the only (floor) entry.
    pub fn new(initial: CanvasSnapshot, max_depth: usize) -> Self {
        let mut snapshots = VecDeque::with_capacity(max_depth.max(1));
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Record the canvas after a committed action.
    ///
    /// Discards the redo sequence and evicts the oldest snapshot once the
    /// depth limit is exceeded.
    pub fn commit_snapshot(&mut self, snapshot: CanvasSnapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.max_depth {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;
        log::debug!(
            "Snapshot committed (undo depth {}, limit {})",
            self.undo_depth(),
            self.max_depth
        );
    }

    /// Step back one snapshot, returning the one to display.
    pub fn undo(&mut self) -> Option<&CanvasSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward again after an undo, returning the one to display.
    pub fn redo(&mut self) -> Option<&CanvasSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    /// Snapshot matching the current persisted buffer
    pub fn current(&self) -> Option<&CanvasSnapshot> {
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Total snapshots retained, across both sequences
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.cursor + 1
    }

    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - self.cursor - 1
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

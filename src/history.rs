use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::event::{EditorEvent, EventBus};
use crate::surface::{PixelBlock, RasterSurface};

/// An immutable full-frame copy of the surface
#[derive(Debug)]
pub struct Snapshot {
    id: Uuid,
    sequence: usize,
    initial: bool,
    width: u32,
    height: u32,
    pixels: PixelBlock,
}

/// Snapshots are shared with hosts through undo/redo notifications
pub type SnapshotRef = Arc<Snapshot>;

impl Snapshot {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of captures made before this one since the log was started
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Whether this is the blank baseline the session started from
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &PixelBlock {
        &self.pixels
    }
}

/// Linear undo/redo chain of surface snapshots.
///
/// Entries are ordered oldest to newest and `current` points into them. A new
/// capture drops everything after `current`, so redo is lost on new edits.
/// When the distance between `current` and the first ever capture exceeds the
/// configured limit, the oldest retained entry is evicted and `cleared_count`
/// goes up by one.
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<SnapshotRef>,
    current: Option<usize>,
    cleared_count: usize,
    limit: usize,
    empty: bool,
    clean: bool,
}

impl HistoryLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current: None,
            cleared_count: 0,
            limit,
            empty: true,
            clean: true,
        }
    }

    /// Capture the whole surface as the new current entry.
    ///
    /// `initial` marks the capture as the blank baseline of a session.
    pub fn capture_state(&mut self, surface: &dyn RasterSurface, initial: bool, events: &EventBus) {
        let sequence = match self.current {
            None => {
                self.entries.clear();
                self.cleared_count = 0;
                0
            }
            Some(index) => {
                let dropped = self.entries.len() - index - 1;
                if dropped > 0 {
                    debug!("Discarding {} redo entries", dropped);
                }
                self.entries.truncate(index + 1);
                self.entries[index].sequence + 1
            }
        };

        let snapshot = Snapshot {
            id: Uuid::new_v4(),
            sequence,
            initial,
            width: surface.width(),
            height: surface.height(),
            pixels: surface.snapshot(),
        };
        debug!("Captured state #{} ({}x{})", sequence, snapshot.width, snapshot.height);
        self.entries.push_back(Arc::new(snapshot));
        self.current = Some(self.entries.len() - 1);
        self.changed(initial, events);
    }

    /// Replace the most recent capture with a fresh one.
    ///
    /// Steps back over the current entry first, so the depth does not grow.
    /// With nothing to step back to this is a plain capture.
    pub fn re_capture_state(&mut self, surface: &dyn RasterSurface, events: &EventBus) {
        if let Some(index) = self.current {
            if index > 0 {
                self.current = Some(index - 1);
            }
        }
        self.capture_state(surface, false, events);
    }

    /// Step back one entry and write it to the surface. No-op at the oldest entry
    /// or when the surface cannot be restored.
    pub fn undo_state(&mut self, surface: &mut dyn RasterSurface, events: &EventBus) -> bool {
        let Some(index) = self.current.filter(|&i| i > 0) else {
            return false;
        };
        let snapshot = self.entries[index - 1].clone();
        if !apply(&snapshot, surface) {
            return false;
        }
        self.current = Some(index - 1);
        info!("↩️ Undo to state #{}", snapshot.sequence);
        self.changed(false, events);
        events.emit(EditorEvent::Undone(snapshot));
        true
    }

    /// Step forward one entry and write it to the surface. No-op at the newest entry.
    pub fn redo_state(&mut self, surface: &mut dyn RasterSurface, events: &EventBus) -> bool {
        let Some(index) = self.current.filter(|&i| i + 1 < self.entries.len()) else {
            return false;
        };
        let snapshot = self.entries[index + 1].clone();
        if !apply(&snapshot, surface) {
            return false;
        }
        self.current = Some(index + 1);
        info!("↪️ Redo to state #{}", snapshot.sequence);
        self.changed(false, events);
        events.emit(EditorEvent::Redone(snapshot));
        true
    }

    fn changed(&mut self, initial: bool, events: &EventBus) {
        if let Some(index) = self.current {
            let depth = self.entries[index].sequence - self.cleared_count;
            if depth > self.limit && index > 0 {
                self.entries.pop_front();
                self.current = Some(index - 1);
                self.cleared_count += 1;
                debug!("History limit reached, released {} states", self.cleared_count);
            }
        }
        events.emit(EditorEvent::HistoryChanged {
            operations_done: self.operations_done(),
            released_memory_operations: self.cleared_count,
            first: self.is_first(),
            last: self.is_last(),
            initial,
        });
        self.empty = initial;
        self.clean = false;
    }

    pub fn current(&self) -> Option<&SnapshotRef> {
        self.current.map(|i| &self.entries[i])
    }

    /// Sequence number of the current entry
    pub fn operations_done(&self) -> usize {
        self.current().map_or(0, |s| s.sequence)
    }

    /// Number of oldest entries evicted so far
    pub fn cleared_count(&self) -> usize {
        self.cleared_count
    }

    /// Retained entries between the oldest one and `current`
    pub fn depth(&self) -> usize {
        self.operations_done().saturating_sub(self.cleared_count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        !self.is_first()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_last()
    }

    fn is_first(&self) -> bool {
        self.current.is_none_or(|i| i == 0)
    }

    fn is_last(&self) -> bool {
        self.current.is_none_or(|i| i + 1 == self.entries.len())
    }

    /// True while the latest capture is the blank baseline
    pub fn is_blank(&self) -> bool {
        self.empty
    }

    /// True until something is captured after construction or [`Self::mark_clean`]
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn mark_clean(&mut self) {
        self.clean = true;
    }
}

/// Write `snapshot` to `surface`. Leaves the surface untouched if it cannot take the size.
fn apply(snapshot: &Snapshot, surface: &mut dyn RasterSurface) -> bool {
    if surface.width() != snapshot.width || surface.height() != snapshot.height {
        if let Err(err) = surface.resize(snapshot.width, snapshot.height) {
            warn!("Failed to restore state #{}: {}", snapshot.sequence, err);
            return false;
        }
    }
    surface.put_block(0, 0, &snapshot.pixels);
    true
}

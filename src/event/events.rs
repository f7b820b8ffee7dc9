use crate::history::SnapshotRef;

/// Notifications the editor sends to its host
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Emitted after every capture, undo and redo
    HistoryChanged {
        /// Sequence number of the current history entry
        operations_done: usize,
        /// Number of oldest entries evicted to respect the history limit
        released_memory_operations: usize,
        /// Nothing left to undo
        first: bool,
        /// Nothing left to redo
        last: bool,
        /// The capture was the blank baseline of a session
        initial: bool,
    },
    Undone(SnapshotRef),
    Redone(SnapshotRef),
    /// Whether selection based actions (crop, pixelize) are currently usable
    SelectionChanged { usable: bool },
    ImageLoaded,
    ImageLoadFailed,
}

//! Single-slot undo buffers with passive visibility deadlines.

use taskdeck_core::TaskRecord;
use time::{Duration, OffsetDateTime};

/// Default visibility window for the delete-undo affordance.
pub const DELETE_UNDO_WINDOW: Duration = Duration::seconds(5);

/// Default visibility window for the toggle-undo affordance.
pub const TOGGLE_UNDO_WINDOW: Duration = Duration::seconds(2);

/// Which mutation a buffered snapshot reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    /// A task removal.
    Delete,
    /// A status flip.
    Toggle,
}

impl UndoKind {
    /// Message shown next to the undo affordance.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Delete => "Task deleted successfully!",
            Self::Toggle => "Task status updated successfully!",
        }
    }
}

/// Buffered snapshot of the most recent reversible action of one kind.
///
/// The deadline only decides whether the affordance is shown. It never
/// decides whether the snapshot can still be applied; a slot stays usable
/// until it is consumed or overwritten by a newer action of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoSlot {
    snapshot: TaskRecord,
    armed_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

impl UndoSlot {
    /// Capture `snapshot` and start its visibility window at `armed_at`.
    #[must_use]
    pub fn arm(snapshot: TaskRecord, armed_at: OffsetDateTime, window: Duration) -> Self {
        let expires_at = armed_at.checked_add(window).unwrap_or(armed_at);
        Self {
            snapshot,
            armed_at,
            expires_at,
        }
    }

    /// The captured record.
    #[must_use]
    pub const fn snapshot(&self) -> &TaskRecord {
        &self.snapshot
    }

    /// When the slot was armed.
    #[must_use]
    pub const fn armed_at(&self) -> OffsetDateTime {
        self.armed_at
    }

    /// Whether the affordance should still be shown at `now`.
    #[must_use]
    pub fn visible_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }

    /// Time left in the visibility window, clamped to zero.
    #[must_use]
    pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
        (self.expires_at - now).max(Duration::ZERO)
    }
}

/// What a UI needs to render the undo affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoAffordance {
    /// Which action the affordance reverses.
    pub kind: UndoKind,
    /// Message shown next to the undo control.
    pub message: &'static str,
    /// Time left before the affordance hides.
    pub remaining: Duration,
}

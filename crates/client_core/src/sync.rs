#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Dirty,
    Flushing,
}

/// Tracks whether local state has diverged from the last persisted snapshot.
///
/// Every accepted mutation bumps a revision. A flush records the revision it snapshotted;
/// when it succeeds the scheduler only returns to `Idle` if nothing changed in the meantime.
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    state: SyncState,
    revision: u64,
    persisted_revision: u64,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            revision: 0,
            persisted_revision: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.persisted_revision
    }

    pub fn mark_dirty(&mut self) {
        self.revision += 1;
        if self.state == SyncState::Idle {
            self.state = SyncState::Dirty;
        }
    }

    pub fn begin_flush(&mut self) -> Option<u64> {
        if self.state != SyncState::Dirty {
            return None;
        }
        self.state = SyncState::Flushing;
        Some(self.revision)
    }

    pub fn finish_flush(&mut self, revision: u64, ok: bool) {
        if self.state != SyncState::Flushing {
            return;
        }
        if ok {
            self.persisted_revision = self.persisted_revision.max(revision);
        }
        self.state = if self.is_dirty() {
            SyncState::Dirty
        } else {
            SyncState::Idle
        };
    }

    /// Forgets a flush whose task was cancelled before it could report back. A late
    /// `finish_flush` for that revision is ignored.
    pub fn abandon_flush(&mut self) {
        if self.state == SyncState::Flushing {
            self.state = if self.is_dirty() {
                SyncState::Dirty
            } else {
                SyncState::Idle
            };
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;

use shared::{
    domain::{DateKey, DeviceId, Grid},
    protocol::{NotesPayload, Ranking},
};

use crate::sync::SyncState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Solved,
    Incorrect,
    Incomplete,
    /// No verdict: the service was unreachable or answered with an error.
    Unreachable,
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub outcome: VerifyOutcome,
    pub elapsed_seconds: u64,
    pub ranking: Option<Ranking>,
    pub message: Option<String>,
}

impl VerificationResult {
    pub fn new(outcome: VerifyOutcome, elapsed_seconds: u64) -> Self {
        Self {
            outcome,
            elapsed_seconds,
            ranking: None,
            message: None,
        }
    }

    pub fn correct(&self) -> bool {
        self.outcome == VerifyOutcome::Solved
    }

    pub fn incomplete(&self) -> bool {
        self.outcome == VerifyOutcome::Incomplete
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub device_id: DeviceId,
    pub date_key: DateKey,
    pub seed: Grid,
    pub user_grid: Grid,
    pub notes: NotesPayload,
    pub note_mode: bool,
    pub phase: SessionPhase,
    pub elapsed_seconds: u64,
    pub completion_seconds: Option<u64>,
    pub session_active: bool,
    pub sync_state: SyncState,
    pub expired_reason: Option<String>,
}

impl SessionSnapshot {
    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    pub fn is_expired(&self) -> bool {
        self.phase == SessionPhase::Expired
    }

    pub fn is_fixed(&self, row: usize, col: usize) -> bool {
        self.seed
            .get(row)
            .and_then(|cells| cells.get(col))
            .is_some_and(|value| *value != 0)
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Changed,
    Tick { elapsed_seconds: u64 },
    NoteModeChanged(bool),
    Completed { completion_seconds: u64 },
    Expired(String),
}

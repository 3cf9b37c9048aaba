use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use shared::{
    domain::{DateKey, DeviceId, Difficulty},
    protocol::{CheckRequest, CheckResponse, PersistProgressRequest},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

use crate::{
    board::Board,
    clock::{Clock, ElapsedClock},
    error::{SessionError, ShareLinkError},
    service::{PuzzleService, ServiceError},
    share::{self, Challenge},
    sync::SyncScheduler,
    types::{SessionEvent, SessionPhase, SessionSnapshot, VerificationResult, VerifyOutcome},
};

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 256;
const UNREACHABLE_MESSAGE: &str = "Could not reach the puzzle service. Your grid was not judged.";
const NOT_JUDGED_MESSAGE: &str = "The puzzle service could not judge your grid.";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub difficulty: Difficulty,
    pub sync_interval: Duration,
    pub share_base_url: String,
    pub challenge_link: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            share_base_url: "http://localhost:5173/".into(),
            challenge_link: None,
        }
    }
}

struct SessionState {
    device_id: DeviceId,
    date_key: DateKey,
    board: Board,
    note_mode: bool,
    phase: SessionPhase,
    session_active: bool,
    clock: ElapsedClock,
    elapsed_seconds: u64,
    /// Last elapsed value that was handed to the scheduler as a change.
    ticked_elapsed: u64,
    completion_seconds: Option<u64>,
    expired_reason: Option<String>,
    scheduler: SyncScheduler,
}

impl SessionState {
    fn is_editable(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    fn refresh_elapsed(&mut self, now: Instant) -> u64 {
        if self.phase == SessionPhase::Active {
            self.elapsed_seconds = self.clock.elapsed(now);
        }
        self.elapsed_seconds
    }

    fn progress_request(&self) -> PersistProgressRequest {
        PersistProgressRequest {
            device_id: self.device_id.clone(),
            date: self.date_key.clone(),
            user_grid: *self.board.cells(),
            elapsed_time: self.elapsed_seconds,
            notes: Some(self.board.notes().to_payload()),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            device_id: self.device_id.clone(),
            date_key: self.date_key.clone(),
            seed: *self.board.seed(),
            user_grid: *self.board.cells(),
            notes: self.board.notes().to_payload(),
            note_mode: self.note_mode,
            phase: self.phase,
            elapsed_seconds: self.elapsed_seconds,
            completion_seconds: self.completion_seconds,
            session_active: self.session_active,
            sync_state: self.scheduler.state(),
            expired_reason: self.expired_reason.clone(),
        }
    }
}

pub struct SessionController {
    service: Arc<dyn PuzzleService>,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
    challenge: Option<Challenge>,
    inner: Mutex<SessionState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub async fn load(
        service: Arc<dyn PuzzleService>,
        clock: Arc<dyn Clock>,
        device_id: DeviceId,
        date_key: DateKey,
        options: SessionOptions,
    ) -> Result<Arc<Self>, SessionError> {
        let challenge = options
            .challenge_link
            .as_deref()
            .and_then(share::parse_challenge);

        let puzzle = service
            .fetch_daily(&device_id, options.difficulty)
            .await
            .map_err(|err| {
                warn!(device_id = %device_id, date = %date_key, "session: load failed: {err}");
                SessionError::from(err)
            })?;

        // The service keys the record by its own calendar day; follow it for later writes.
        let date_key = match puzzle.date.clone() {
            Some(server_date) if server_date != date_key => {
                debug!(local = %date_key, server = %server_date, "session: using server date key");
                server_date
            }
            _ => date_key,
        };

        let now = clock.now();
        let board = Board::restore(puzzle.grid, puzzle.user_grid, puzzle.notes.as_ref());
        let (phase, elapsed_clock, completion_seconds) = if puzzle.is_completed() {
            let seconds = puzzle.completion_time.unwrap_or(puzzle.elapsed_time);
            (
                SessionPhase::Completed,
                ElapsedClock::frozen_at(seconds, now),
                Some(seconds),
            )
        } else if puzzle.is_expired() {
            (
                SessionPhase::Expired,
                ElapsedClock::frozen_at(puzzle.elapsed_time, now),
                None,
            )
        } else {
            (
                SessionPhase::Active,
                ElapsedClock::resume(puzzle.elapsed_time, now),
                None,
            )
        };

        info!(
            device_id = %device_id,
            date = %date_key,
            phase = ?phase,
            elapsed = puzzle.elapsed_time,
            "session: loaded daily puzzle"
        );

        let expired_reason = (phase == SessionPhase::Expired)
            .then(|| "Your session has expired. You can only attempt each puzzle once.".to_string());

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Arc::new(Self {
            service,
            clock,
            options,
            challenge,
            inner: Mutex::new(SessionState {
                device_id,
                date_key,
                board,
                note_mode: false,
                phase,
                session_active: puzzle.session_active,
                clock: elapsed_clock,
                elapsed_seconds: completion_seconds.unwrap_or(puzzle.elapsed_time),
                ticked_elapsed: puzzle.elapsed_time,
                completion_seconds,
                expired_reason,
                scheduler: SyncScheduler::new(),
            }),
            tasks: Mutex::new(Vec::new()),
            events,
        }))
    }

    pub async fn start_background_tasks(self: &Arc<Self>) {
        if !self.inner.lock().await.is_editable() {
            return;
        }
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            return;
        }

        let ticker = Arc::downgrade(self);
        tasks.push(tokio::spawn(run_every(TICK_INTERVAL, ticker, |controller| async move {
            controller.tick().await;
        })));

        let syncer = Arc::downgrade(self);
        tasks.push(tokio::spawn(run_every(
            self.options.sync_interval,
            syncer,
            |controller| async move {
                controller.flush().await;
            },
        )));
        debug!("session: background tasks started");
    }

    async fn stop_background_tasks(&self) {
        let stopped = {
            let mut tasks = self.tasks.lock().await;
            let stopped = !tasks.is_empty();
            for task in tasks.drain(..) {
                task.abort();
            }
            stopped
        };
        if stopped {
            // An aborted sync task may have been mid-write.
            self.inner.lock().await.scheduler.abandon_flush();
        }
    }

    pub async fn has_background_tasks(&self) -> bool {
        !self.tasks.lock().await.is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn challenge(&self) -> Option<Challenge> {
        self.challenge
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.lock().await.phase
    }

    pub async fn set_cell(&self, row: usize, col: usize, digit: u8) -> bool {
        let changed = {
            let mut guard = self.inner.lock().await;
            if !guard.is_editable() {
                return false;
            }
            let note_mode = guard.note_mode;
            let changed = guard.board.set_cell(row, col, digit, note_mode);
            if changed {
                guard.scheduler.mark_dirty();
            }
            changed
        };
        if changed {
            let _ = self.events.send(SessionEvent::Changed);
        }
        changed
    }

    pub async fn delete_cell(&self, row: usize, col: usize) -> bool {
        let changed = {
            let mut guard = self.inner.lock().await;
            if !guard.is_editable() {
                return false;
            }
            let note_mode = guard.note_mode;
            let changed = guard.board.delete_cell(row, col, note_mode);
            if changed {
                guard.scheduler.mark_dirty();
            }
            changed
        };
        if changed {
            let _ = self.events.send(SessionEvent::Changed);
        }
        changed
    }

    pub async fn toggle_note_mode(&self) -> bool {
        let note_mode = {
            let mut guard = self.inner.lock().await;
            guard.note_mode = !guard.note_mode;
            guard.note_mode
        };
        let _ = self.events.send(SessionEvent::NoteModeChanged(note_mode));
        note_mode
    }

    pub async fn note_mode(&self) -> bool {
        self.inner.lock().await.note_mode
    }

    pub async fn count_digit_usage(&self, digit: u8) -> usize {
        self.inner.lock().await.board.count_digit_usage(digit)
    }

    pub async fn elapsed_seconds(&self) -> u64 {
        let now = self.clock.now();
        self.inner.lock().await.refresh_elapsed(now)
    }

    pub async fn tick(&self) -> u64 {
        let now = self.clock.now();
        let (elapsed, changed) = {
            let mut guard = self.inner.lock().await;
            if !guard.is_editable() {
                return guard.elapsed_seconds;
            }
            let elapsed = guard.refresh_elapsed(now);
            let changed = elapsed != guard.ticked_elapsed;
            if changed {
                guard.ticked_elapsed = elapsed;
                guard.scheduler.mark_dirty();
            }
            (elapsed, changed)
        };
        if changed {
            let _ = self.events.send(SessionEvent::Tick {
                elapsed_seconds: elapsed,
            });
        }
        elapsed
    }

    /// Sends the latest snapshot if anything changed since the last successful write.
    /// Returns `false` only when a write was attempted and failed.
    pub async fn flush(&self) -> bool {
        let now = self.clock.now();
        let (revision, request) = {
            let mut guard = self.inner.lock().await;
            if guard.phase == SessionPhase::Expired {
                return true;
            }
            let Some(revision) = guard.scheduler.begin_flush() else {
                return true;
            };
            guard.refresh_elapsed(now);
            (revision, guard.progress_request())
        };

        let result = self.service.persist_progress(&request).await;
        if let Err(err) = &result {
            warn!(
                device_id = %request.device_id,
                date = %request.date,
                revision,
                "sync: persisting progress failed, retrying on next tick: {err}"
            );
        } else {
            debug!(date = %request.date, revision, "sync: progress persisted");
        }

        let ok = result.is_ok();
        self.inner
            .lock()
            .await
            .scheduler
            .finish_flush(revision, ok);
        ok
    }

    pub async fn verify(&self) -> VerificationResult {
        let now = self.clock.now();
        let request = {
            let mut guard = self.inner.lock().await;
            let elapsed = guard.refresh_elapsed(now);
            match guard.phase {
                SessionPhase::Completed => {
                    return VerificationResult::new(
                        VerifyOutcome::Solved,
                        guard.completion_seconds.unwrap_or(elapsed),
                    );
                }
                SessionPhase::Expired => {
                    let mut result = VerificationResult::new(VerifyOutcome::Expired, elapsed);
                    result.message = guard.expired_reason.clone();
                    return result;
                }
                SessionPhase::Active => {}
            }
            if !guard.board.is_full() {
                return VerificationResult::new(VerifyOutcome::Incomplete, elapsed);
            }
            CheckRequest {
                device_id: guard.device_id.clone(),
                date: guard.date_key.clone(),
                grid: *guard.board.cells(),
            }
        };

        match self.service.submit_check(&request).await {
            Ok(response) if response.correct => self.complete(response).await,
            Ok(response) => {
                info!(date = %request.date, "verify: grid rejected");
                let mut result =
                    VerificationResult::new(VerifyOutcome::Incorrect, self.elapsed_seconds().await);
                result.message = response.message;
                result
            }
            Err(ServiceError::Expired(detail)) => {
                self.expire(detail.clone()).await;
                let mut result =
                    VerificationResult::new(VerifyOutcome::Expired, self.elapsed_seconds().await);
                result.message = Some(detail);
                result
            }
            Err(err) => {
                warn!(date = %request.date, "verify: no verdict from the service: {err}");
                let mut result = VerificationResult::new(
                    VerifyOutcome::Unreachable,
                    self.elapsed_seconds().await,
                );
                result.message = Some(if err.is_transport() {
                    UNREACHABLE_MESSAGE.to_string()
                } else {
                    format!("{NOT_JUDGED_MESSAGE} ({err})")
                });
                result
            }
        }
    }

    async fn complete(&self, response: CheckResponse) -> VerificationResult {
        let now = self.clock.now();
        let completion_seconds = {
            let mut guard = self.inner.lock().await;
            if guard.phase != SessionPhase::Completed {
                let seconds = guard.clock.freeze(now);
                guard.phase = SessionPhase::Completed;
                guard.elapsed_seconds = seconds;
                guard.completion_seconds = Some(seconds);
                guard.scheduler.mark_dirty();
            }
            guard.completion_seconds.unwrap_or(guard.elapsed_seconds)
        };

        self.stop_background_tasks().await;
        info!(completion_seconds, "verify: puzzle solved");
        let _ = self
            .events
            .send(SessionEvent::Completed { completion_seconds });
        self.flush().await;

        VerificationResult {
            outcome: VerifyOutcome::Solved,
            elapsed_seconds: completion_seconds,
            ranking: response.ranking,
            message: response.message,
        }
    }

    async fn expire(&self, reason: String) {
        {
            let mut guard = self.inner.lock().await;
            guard.phase = SessionPhase::Expired;
            guard.session_active = false;
            guard.expired_reason = Some(reason.clone());
        }
        self.stop_background_tasks().await;
        warn!("session: expired: {reason}");
        let _ = self.events.send(SessionEvent::Expired(reason));
    }

    pub fn build_share_link(&self, result: &VerificationResult) -> Result<String, ShareLinkError> {
        share::build_share_link(&self.options.share_base_url, result)
    }

    pub async fn teardown(&self) {
        self.stop_background_tasks().await;
        let now = self.clock.now();
        let request = {
            let mut guard = self.inner.lock().await;
            if guard.phase == SessionPhase::Expired || !guard.scheduler.is_dirty() {
                return;
            }
            guard.refresh_elapsed(now);
            guard.progress_request()
        };
        info!(date = %request.date, "session: teardown with unsaved progress, sending beacon");
        self.service.send_beacon(request);
    }
}

async fn run_every<F, Fut>(period: Duration, controller: Weak<SessionController>, step: F)
where
    F: Fn(Arc<SessionController>) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let Some(controller) = controller.upgrade() else {
            break;
        };
        step(controller).await;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

pub mod board;
pub mod clock;
pub mod error;
pub mod identity;
pub mod input;
pub mod service;
pub mod session;
pub mod share;
pub mod sync;
pub mod types;

pub use clock::{Clock, ElapsedClock, SystemClock};
pub use error::{SessionError, ShareLinkError};
pub use identity::{load_or_create_device_id, today_date_key};
pub use input::{InputKey, InteractionLayer};
pub use service::{HttpPuzzleService, PuzzleService, ServiceError};
pub use session::{SessionController, SessionOptions, DEFAULT_SYNC_INTERVAL};
pub use share::{build_share_link, parse_challenge, Challenge};
pub use sync::SyncState;
pub use types::{SessionEvent, SessionPhase, SessionSnapshot, VerificationResult, VerifyOutcome};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;

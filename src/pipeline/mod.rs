//! Processing pipeline for the bot.
//!
//! - `classify`: decide which notifications apply to one new submission
//! - `sync`: poll the scoreboard, diff against the seen-log, announce
//! - `moderate`: evaluate inbound message text and remove flagged messages

pub mod classify;
pub mod moderate;
pub mod sync;

pub use classify::{Classification, SolveClassifier};
pub use moderate::{MessageEvent, ModerationOutcome, Moderator};
pub use sync::{SyncEngine, SyncResult};

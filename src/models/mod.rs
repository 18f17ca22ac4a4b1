// src/models/mod.rs

//! Domain models for the bot.
//!
//! Wire types mirror the CTFd API payloads; everything here is plain data
//! shared between the services, the storage layer and the pipeline.

mod blocks;
mod scoreboard;
mod solve;
mod submission;

// Re-export all public types
pub use blocks::{Block, ImageAccessory, SolveMessage, Text};
pub use scoreboard::{place_emoji, Team, User, TOP10};
pub use solve::SolveRecord;
pub use submission::{Challenge, Submission};

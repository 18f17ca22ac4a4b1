// src/services/mod.rs

//! External service clients.
//!
//! Each collaborator sits behind a trait so the pipeline can be exercised
//! against in-memory fakes:
//! - `Scoreboard`: the CTFd API (submissions, users, teams)
//! - `Notifier`: the Slack Web API (post, delete, ephemeral)
//! - `ModerationApi`: the content-moderation text check

pub mod moderation;
pub mod scoreboard;
pub mod slack;

pub use moderation::{ModerateContentClient, ModerationApi, ModerationVerdict};
pub use scoreboard::{CtfdClient, Scoreboard};
pub use slack::{Notifier, SlackClient};

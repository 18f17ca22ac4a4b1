//! Correct-submission data structures.

use serde::{Deserialize, Serialize};

/// The challenge a submission was made against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    /// Challenge display name
    pub name: String,

    /// Point value awarded for solving it
    pub value: i64,
}

/// A correct submission as returned by the scoreboard.
///
/// Immutable once fetched; the remote service returns submissions in
/// arrival order and never reorders or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    /// Submission unique identifier
    pub id: u64,

    /// Identifier of the solved challenge
    pub challenge_id: u64,

    /// Embedded challenge details
    pub challenge: Challenge,

    /// Identifier of the solving user
    pub user_id: u64,

    /// Identifier of the solving team
    pub team_id: u64,
}

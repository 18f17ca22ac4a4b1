//! Composed view of a freshly classified solve.

use super::{Challenge, Team, User};

/// Everything the notification rules need about one new submission.
///
/// Built per submission and never persisted; only the underlying
/// `Submission` goes to the seen-log. `team_old` is deliberately the
/// cached pre-solve snapshot, read before the fresh fetch overwrote it.
#[derive(Debug, Clone)]
pub struct SolveRecord {
    /// The solved challenge
    pub challenge: Challenge,

    /// The solving user
    pub user: User,

    /// The solving team, freshly fetched after this solve
    pub team: Team,

    /// The solving team as cached before this solve
    pub team_old: Team,
}

//! User and team scoreboard entries.
//!
//! Rank is a label ("1st", "42nd"), not a number; top-ten membership is a
//! label comparison, never integer parsing. Hidden or unscored accounts
//! carry no label at all.

use serde::{Deserialize, Serialize};

/// The ten best rank labels, in order.
pub const TOP10: [&str; 10] = [
    "1st", "2nd", "3rd", "4th", "5th", "6th", "7th", "8th", "9th", "10th",
];

/// Medal emoji for a rank label. The podium gets dedicated medals.
pub fn place_emoji(place: &str) -> &'static str {
    match place {
        "1st" => ":first_place_medal:",
        "2nd" => ":second_place_medal:",
        "3rd" => ":third_place_medal:",
        _ => ":medal:",
    }
}

/// A user account on the scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User unique identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Rank label, absent for hidden/unscored accounts
    #[serde(default)]
    pub place: Option<String>,

    /// Current score
    #[serde(default)]
    pub score: i64,
}

/// A team on the scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    /// Team unique identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Rank label, absent for hidden/unscored teams
    #[serde(default)]
    pub place: Option<String>,

    /// Current score
    #[serde(default)]
    pub score: i64,
}

impl Team {
    /// Whether the team's current rank label is one of the top ten.
    pub fn in_top10(&self) -> bool {
        match &self.place {
            Some(place) => TOP10.contains(&place.as_str()),
            None => false,
        }
    }

    /// Rank label for display, "unranked" when absent.
    pub fn place_label(&self) -> &str {
        self.place.as_deref().unwrap_or("unranked")
    }
}

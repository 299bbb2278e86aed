//! Shared wire-protocol DTOs for the relay view.
//!
//! DESIGN
//! ======
//! Socket payloads live in `relay-protocol` and are re-exported here so
//! state modules import one path; HTTP-only payloads are defined locally.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use relay_protocol::{
    ChapterId, LogEvent, Outbound, RelayData, RelayEvent, RelayRound, RelaySync, RelayTour,
    RoundId, ServerClockMsg, ServerNodeMsg,
};

use crate::util::fen::Color;

/// Team standings of a round, as served by `/broadcast/{round_id}/teams`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTable {
    pub table: Vec<TeamMatch>,
}

/// One team-vs-team match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub teams: [TeamRow; 2],
    #[serde(default)]
    pub games: Vec<TeamGame>,
}

impl TeamMatch {
    /// Whether any board of this match is `chapter_id`.
    #[must_use]
    pub fn has_game(&self, chapter_id: &str) -> bool {
        self.games.iter().any(|g| g.id == chapter_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub name: String,
    #[serde(default)]
    pub points: f64,
}

/// A board of a team match, seen from the first team's side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamGame {
    pub id: ChapterId,
    pub pov: Color,
}

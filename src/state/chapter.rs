//! Study chapter models touched by the relay view.
//!
//! SYSTEM CONTEXT
//! ==============
//! The analysis page owns the current [`StudyChapter`] and the list of
//! [`ChapterPreview`]s rendered in the boards tab. The relay controller
//! mutates both in place as moves and clocks stream in, so they are shared as
//! `Rc<RefCell<..>>` with the rendering layer.

#[cfg(test)]
#[path = "chapter_test.rs"]
mod chapter_test;

use serde::{Deserialize, Serialize};

use crate::net::types::ChapterId;
use crate::util::fen::Color;

/// Result tag value of a game still in progress.
const ONGOING_RESULT: &str = "*";

/// Relay sub-state of a chapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyChapterRelay {
    /// Tree path of the last relayed move.
    #[serde(default)]
    pub path: String,
    /// Age of the last move when the page was served.
    #[serde(default)]
    pub seconds_since_last_move: Option<i64>,
    /// Absolute time of the last move, ms since the Unix epoch. Derived
    /// client-side from `seconds_since_last_move` when absent.
    #[serde(default)]
    pub last_move_at: Option<i64>,
}

/// Game variant of a chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

impl Default for Variant {
    fn default() -> Self {
        Self { key: "standard".to_owned(), name: "Standard".to_owned() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSetup {
    #[serde(default)]
    pub variant: Variant,
}

/// The chapter currently open in the analysis board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyChapter {
    pub id: ChapterId,
    pub name: String,
    #[serde(default)]
    pub setup: ChapterSetup,
    /// PGN tags as `(name, value)` pairs.
    #[serde(default)]
    pub tags: Vec<(String, String)>,
    #[serde(default)]
    pub relay: Option<StudyChapterRelay>,
}

impl StudyChapter {
    /// Value of the PGN tag `name`, if present.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the game has a decided result.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tag("Result").is_some_and(|r| r != ONGOING_RESULT)
    }
}

/// Player slot of a chapter preview.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPlayer {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
    /// Remaining time in centiseconds.
    #[serde(default)]
    pub clock: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPlayers {
    pub white: PreviewPlayer,
    pub black: PreviewPlayer,
}

impl PreviewPlayers {
    #[must_use]
    pub fn get(&self, color: Color) -> &PreviewPlayer {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn get_mut(&mut self, color: Color) -> &mut PreviewPlayer {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// Board-list projection of a chapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPreview {
    pub id: ChapterId,
    pub name: String,
    pub fen: String,
    /// Last move in UCI notation.
    #[serde(default)]
    pub last_move: Option<String>,
    #[serde(default)]
    pub players: Option<PreviewPlayers>,
    /// Time of the last move as served with the page. Cleared once a live
    /// move supersedes it.
    #[serde(default)]
    pub last_move_at: Option<i64>,
}

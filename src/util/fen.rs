//! Side-to-move helpers over FEN strings.
//!
//! Only the active-colour field is read; board parsing belongs to the
//! analysis engine.

#[cfg(test)]
#[path = "fen_test.rs"]
mod fen_test;

use serde::{Deserialize, Serialize};

/// Chess side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Side to move in `fen`.
///
/// Anything but an explicit `w` active-colour field reads as black.
#[must_use]
pub fn fen_color(fen: &str) -> Color {
    match fen.split_whitespace().nth(1) {
        Some("w") => Color::White,
        _ => Color::Black,
    }
}

//! Browser-facing collaborators and small pure helpers.
//!
//! DESIGN
//! ======
//! Page location, history, sound and timers are injected into the relay
//! controller as traits; each module pairs the trait with its browser
//! implementation so native builds and tests never touch `web-sys`.

pub mod browser;
pub mod fen;
pub mod sound;
pub mod timers;

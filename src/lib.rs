//! # relay-view
//!
//! Leptos + WASM controller for the live broadcast (relay) view of a chess
//! study. Keeps the broadcast snapshot, sync log, board previews and the
//! address bar in step with socket pushes and tab navigation.
//!
//! The controller is browser-agnostic; the `hydrate` feature adds the
//! `web-sys` collaborators and the [`runtime`] that mounts it on a page.

pub mod net;
#[cfg(feature = "hydrate")]
pub mod runtime;
pub mod state;
pub mod util;

//! Wire types and HTTP helpers for the relay view.

pub mod api;
pub mod types;

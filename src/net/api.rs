//! REST helpers for relay data not pushed over the socket.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Elsewhere: stubs returning `None`, since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Fetch failures surface as `None` so a missing team table degrades to an
//! empty tab instead of breaking the page.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::TeamTable;

#[cfg(any(test, feature = "hydrate"))]
fn team_table_endpoint(round_id: &str) -> String {
    format!("/broadcast/{round_id}/teams")
}

/// Fetch the team standings of a round.
/// Returns `None` on failure or outside the browser.
pub async fn fetch_team_table(round_id: &str) -> Option<TeamTable> {
    #[cfg(feature = "hydrate")]
    {
        let url = team_table_endpoint(round_id);
        let resp = gloo_net::http::Request::get(&url).send().await.ok()?;
        if !resp.ok() {
            leptos::logging::warn!("team table request failed: {}", resp.status());
            return None;
        }
        resp.json::<TeamTable>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = round_id;
        None
    }
}

//! Team-vs-team table of a round.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only tours configured with a team table get a [`RelayTeams`]. It shares
//! the relay controller's redraw trigger and chapter-selection callback, and
//! reads the round path and current variant through accessors so renamed
//! slugs or a switched chapter are picked up without rebuilding it.

#[cfg(test)]
#[path = "teams_test.rs"]
mod teams_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use relay_protocol::Outbound;

use crate::net::types::{RoundId, TeamTable};
use crate::state::relay::{Redraw, SetChapter, SocketSend};

/// Team table collaborator of the relay view.
pub struct RelayTeams {
    round_id: RoundId,
    set_chapter: SetChapter,
    round_path: Rc<dyn Fn() -> Option<String>>,
    redraw: Redraw,
    send: SocketSend,
    variant_key: Rc<dyn Fn() -> String>,
    table: Rc<RefCell<Option<TeamTable>>>,
    loading: Rc<Cell<bool>>,
}

impl RelayTeams {
    #[must_use]
    pub fn new(
        round_id: RoundId,
        set_chapter: SetChapter,
        round_path: Rc<dyn Fn() -> Option<String>>,
        redraw: Redraw,
        send: SocketSend,
        variant_key: Rc<dyn Fn() -> String>,
    ) -> Self {
        Self {
            round_id,
            set_chapter,
            round_path,
            redraw,
            send,
            variant_key,
            table: Rc::new(RefCell::new(None)),
            loading: Rc::new(Cell::new(false)),
        }
    }

    #[must_use]
    pub fn round_id(&self) -> &str {
        &self.round_id
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    /// Loaded standings, if any.
    #[must_use]
    pub fn table(&self) -> Option<TeamTable> {
        self.table.borrow().clone()
    }

    /// Fetch the standings again. Completes asynchronously in the browser.
    pub fn reload(&self) {
        self.loading.set(true);
        #[cfg(feature = "hydrate")]
        {
            let round_id = self.round_id.clone();
            let table = Rc::clone(&self.table);
            let loading = Rc::clone(&self.loading);
            let redraw = Rc::clone(&self.redraw);
            leptos::task::spawn_local(async move {
                if let Some(loaded) = crate::net::api::fetch_team_table(&round_id).await {
                    *table.borrow_mut() = Some(loaded);
                }
                loading.set(false);
                redraw();
            });
        }
    }

    /// Store freshly loaded standings.
    pub fn set_table(&self, table: TeamTable) {
        *self.table.borrow_mut() = Some(table);
        self.loading.set(false);
        (self.redraw)();
    }

    /// Link to one board of the round.
    #[must_use]
    pub fn game_path(&self, chapter_id: &str) -> Option<String> {
        (self.round_path)().map(|path| format!("{path}/{chapter_id}"))
    }

    /// Open a board in the analysis view.
    pub fn select_game(&self, chapter_id: &str) {
        (self.set_chapter)(chapter_id);
        (self.redraw)();
    }

    /// Send a message on the relay socket shared with the controller.
    pub fn send(&self, msg: Outbound) {
        (self.send)(msg);
    }

    /// Variant of the current chapter, for mini board rendering.
    #[must_use]
    pub fn variant_key(&self) -> String {
        (self.variant_key)()
    }
}

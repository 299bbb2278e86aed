//! Relay view controller for a live broadcast round.
//!
//! SYSTEM CONTEXT
//! ==============
//! The analysis page owns the socket, the current chapter and the board
//! list. `RelayCtrl` sits between them: it keeps the broadcast snapshot and
//! its sync log current from `relayData` / `relaySync` / `relayLog` pushes,
//! patches chapter previews as moves and clocks stream in, and keeps the
//! address bar in step with the selected tab.
//!
//! DESIGN
//! ======
//! Everything runs on the UI thread. Browser globals (location, history,
//! sound, timers) are injected so the controller is deterministic in tests.
//! Timer firings come back through [`RelayCtrl::on_timer`].
//!
//! The cooldown clear scheduled by a `relayLog` event is never cancelled. A
//! clear scheduled by an older event still resets the cooldown after a newer
//! event set it again; each clear carries the generation of the event that
//! scheduled it so that case is visible.

#[cfg(test)]
#[path = "relay_test.rs"]
mod relay_test;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::net::types::{
    LogEvent, Outbound, RelayData, RelayEvent, RelayRound, RelaySync, RelayTour, RoundId,
    ServerClockMsg, ServerNodeMsg,
};
use crate::state::chapter::{ChapterPreview, StudyChapter, StudyChapterRelay};
use crate::state::members::StudyMembers;
use crate::state::teams::RelayTeams;
use crate::util::browser::{PageHistory, PageLocation, fragment, path_segments};
use crate::util::fen::fen_color;
use crate::util::sound::{Sound, SoundPlayer};
use crate::util::timers::{CLOCK_TICK, COOLDOWN, Scheduler, TimerId, TimerTask};

/// Route prefix of every broadcast page.
pub const BROADCAST_ROOT: &str = "/broadcast";

/// Maximum number of sync log entries retained.
pub const SYNC_LOG_CAP: usize = 20;

/// Addresses with fewer path segments than this open on the tour view.
const TOUR_VIEW_MAX_SEGMENTS: usize = 5;

/// Asks the rendering layer to redraw.
pub type Redraw = Rc<dyn Fn()>;
/// Sends a message on the page socket.
pub type SocketSend = Rc<dyn Fn(Outbound)>;
/// Opens a chapter in the analysis board.
pub type SetChapter = Rc<dyn Fn(&str)>;
/// The chapter open in the analysis board.
pub type SharedChapter = Rc<RefCell<StudyChapter>>;
/// The board list shared with the rendering layer.
pub type ChapterPreviews = Rc<RefCell<Vec<ChapterPreview>>>;

/// Tabs of the tour view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayTab {
    #[default]
    Overview,
    Boards,
    Teams,
    Leaderboard,
}

impl RelayTab {
    pub const ALL: [Self; 4] = [Self::Overview, Self::Boards, Self::Teams, Self::Leaderboard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Boards => "boards",
            Self::Teams => "teams",
            Self::Leaderboard => "leaderboard",
        }
    }

    /// Tab named by a URL fragment, with or without its leading `#`.
    #[must_use]
    pub fn from_fragment(hash: &str) -> Option<Self> {
        let name = fragment(hash);
        Self::ALL.into_iter().find(|tab| tab.as_str() == name)
    }
}

/// Everything a [`RelayCtrl`] is built from.
pub struct RelayCtrlOpts {
    pub id: RoundId,
    pub data: RelayData,
    pub send: SocketSend,
    pub redraw: Redraw,
    pub members: StudyMembers,
    pub chapter: SharedChapter,
    pub chapters: ChapterPreviews,
    /// The broadcast was created recently and has little to show yet.
    pub looks_new: bool,
    pub set_chapter: SetChapter,
    pub location: Rc<dyn PageLocation>,
    pub history: Rc<dyn PageHistory>,
    pub sound: Rc<dyn SoundPlayer>,
    pub scheduler: Rc<dyn Scheduler>,
}

/// View state and socket handling of one relay round.
pub struct RelayCtrl {
    id: RoundId,
    data: Rc<RefCell<RelayData>>,
    send: SocketSend,
    redraw: Redraw,
    members: StudyMembers,
    chapters: ChapterPreviews,
    location: Rc<dyn PageLocation>,
    history: Rc<dyn PageHistory>,
    sound: Rc<dyn SoundPlayer>,
    scheduler: Rc<dyn Scheduler>,
    teams: Option<RelayTeams>,
    tab: RelayTab,
    tour_show: bool,
    cooldown: bool,
    /// Generation of the latest `relayLog` cooldown.
    cooldown_seq: u64,
    clock_interval: Option<TimerId>,
}

impl RelayCtrl {
    #[must_use]
    pub fn new(opts: RelayCtrlOpts) -> Self {
        let RelayCtrlOpts {
            id,
            data,
            send,
            redraw,
            members,
            chapter,
            chapters,
            looks_new,
            set_chapter,
            location,
            history,
            sound,
            scheduler,
        } = opts;

        let tour_show = path_segments(&location.pathname()) < TOUR_VIEW_MAX_SEGMENTS;
        let tab = RelayTab::from_fragment(&location.hash()).unwrap_or(if looks_new {
            RelayTab::Overview
        } else {
            RelayTab::Boards
        });

        let data = Rc::new(RefCell::new(data));
        let teams = data.borrow().tour.team_table.then(|| {
            let round_path = {
                let data = Rc::clone(&data);
                let id = id.clone();
                Rc::new(move || round_path_in(&data.borrow(), &id))
            };
            let variant_key = {
                let chapter = Rc::clone(&chapter);
                Rc::new(move || chapter.borrow().setup.variant.key.clone())
            };
            RelayTeams::new(
                id.clone(),
                set_chapter,
                round_path,
                Rc::clone(&redraw),
                Rc::clone(&send),
                variant_key,
            )
        });

        let mut ctrl = Self {
            id,
            data,
            send,
            redraw,
            members,
            chapters,
            location,
            history,
            sound,
            scheduler,
            teams,
            tab,
            tour_show,
            cooldown: false,
            cooldown_seq: 0,
            clock_interval: None,
        };

        let relay = chapter.borrow().relay.clone();
        ctrl.apply_chapter_relay(&mut chapter.borrow_mut(), relay);
        ctrl
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current broadcast snapshot.
    #[must_use]
    pub fn data(&self) -> Ref<'_, RelayData> {
        self.data.borrow()
    }

    #[must_use]
    pub fn members(&self) -> &StudyMembers {
        &self.members
    }

    #[must_use]
    pub fn teams(&self) -> Option<&RelayTeams> {
        self.teams.as_ref()
    }

    #[must_use]
    pub fn tab(&self) -> RelayTab {
        self.tab
    }

    /// Whether the tour view is shown instead of the round view.
    #[must_use]
    pub fn tour_show(&self) -> bool {
        self.tour_show
    }

    pub fn set_tour_show(&mut self, show: bool) {
        self.tour_show = show;
        self.redraw();
    }

    #[must_use]
    pub fn cooldown(&self) -> bool {
        self.cooldown
    }

    pub fn open_tab(&mut self, tab: RelayTab) {
        self.tab = tab;
        self.tour_show = true;
        self.redraw();
    }

    /// Ask the server to start or stop syncing. Local state follows the
    /// `relaySync` push.
    pub fn set_sync(&self, enabled: bool) {
        (self.send)(Outbound::RelaySync(enabled));
        self.redraw();
    }

    /// Whether a sync is in progress and worth a spinner.
    #[must_use]
    pub fn loading(&self) -> bool {
        !self.cooldown && self.data.borrow().sync.as_ref().is_some_and(|s| s.ongoing)
    }

    /// Attach relay state to `chapter` and restart the clock refresh.
    ///
    /// Only the chapter is modified; without `relay` the refresh is just
    /// stopped.
    pub fn apply_chapter_relay(&mut self, chapter: &mut StudyChapter, relay: Option<StudyChapterRelay>) {
        if let Some(interval) = self.clock_interval.take() {
            self.scheduler.clear(interval);
        }
        let Some(mut relay) = relay else {
            return;
        };
        if relay.last_move_at.is_none() {
            if let Some(seconds) = relay.seconds_since_last_move {
                let elapsed_ms = seconds.saturating_mul(1000);
                relay.last_move_at = Some(self.scheduler.now_ms().saturating_sub(elapsed_ms));
            }
        }
        chapter.relay = Some(relay);
        if !chapter.is_finished() {
            self.clock_interval = Some(self.scheduler.set_interval(CLOCK_TICK, TimerTask::ClockTick));
        }
    }

    /// Whether the clock refresh is running.
    #[must_use]
    pub fn clock_ticking(&self) -> bool {
        self.clock_interval.is_some()
    }

    /// Apply a move pushed for any board of the round to its preview.
    pub fn add_node_to_chapter_preview(&self, msg: &ServerNodeMsg) {
        let updated = {
            let mut chapters = self.chapters.borrow_mut();
            match chapters.iter_mut().find(|cp| cp.id == msg.p.chapter_id) {
                Some(cp) => {
                    cp.fen.clone_from(&msg.n.fen);
                    cp.last_move = Some(msg.n.uci.clone());
                    let moved = fen_color(&cp.fen).opposite();
                    if let Some(players) = cp.players.as_mut() {
                        players.get_mut(moved).clock = msg.n.clock;
                    }
                    // Superseded by the live move; nothing downstream reads it.
                    cp.last_move_at = None;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.redraw();
        } else {
            // The board list can lag behind broadcasts with many boards.
            leptos::logging::warn!("ChapterPreview not found for addNode {}", msg.p.chapter_id);
        }
    }

    /// Set the clock of the side that just moved on a preview. Does not
    /// redraw; a node push follows.
    pub fn set_clock_to_chapter_preview(&self, msg: &ServerClockMsg) {
        let mut chapters = self.chapters.borrow_mut();
        if let Some(cp) = chapters.iter_mut().find(|cp| cp.id == msg.p.chapter_id) {
            let moved = fen_color(&cp.fen).opposite();
            if let Some(players) = cp.players.as_mut() {
                players.get_mut(moved).clock = msg.c;
            }
        }
    }

    #[must_use]
    pub fn round_by_id(&self, id: &str) -> Option<Ref<'_, RelayRound>> {
        Ref::filter_map(self.data.borrow(), |d| d.rounds.iter().find(|r| r.id == id)).ok()
    }

    /// The round this controller was built for.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot no longer lists the controller's round.
    #[must_use]
    pub fn current_round(&self) -> Ref<'_, RelayRound> {
        self.round_by_id(&self.id)
            .unwrap_or_else(|| panic!("relay round {} missing from its own snapshot", self.id))
    }

    #[must_use]
    pub fn full_round_name(&self) -> String {
        let tour_name = self.data.borrow().tour.name.clone();
        format!("{tour_name} - {}", self.current_round().name)
    }

    #[must_use]
    pub fn tour_path(&self) -> String {
        tour_path_of(&self.data.borrow().tour)
    }

    /// Path of `round`, or of the current round when `None`.
    #[must_use]
    pub fn round_path(&self, round: Option<&RelayRound>) -> Option<String> {
        let data = self.data.borrow();
        match round {
            Some(round) => Some(round_path_of(&data.tour, round)),
            None => round_path_in(&data, &self.id),
        }
    }

    /// Point the address bar at the visible view.
    pub fn update_address_bar(&self, tour_url: &str, round_url: &str) {
        let url = if self.tour_show {
            match self.tab {
                RelayTab::Overview => tour_url.to_owned(),
                tab => format!("{tour_url}#{}", tab.as_str()),
            }
        } else {
            round_url.to_owned()
        };
        // Leaving a tour tab for a round keeps the tab reachable via back.
        if !self.tour_show && self.location.href().contains('#') {
            self.history.push_state(&url);
        } else {
            self.history.replace_state(&url);
        }
    }

    /// Handle a raw socket message. Returns whether it was consumed.
    pub fn socket_handler(&mut self, t: &str, d: Value) -> bool {
        match RelayEvent::from_message(t, d) {
            Ok(Some(event)) => self.handle(event),
            Ok(None) => false,
            Err(e) => {
                leptos::logging::warn!("relay socket message dropped: {e}");
                false
            }
        }
    }

    /// Handle a relay event. Events for other rounds are not consumed.
    pub fn handle(&mut self, event: RelayEvent) -> bool {
        if event.round_id() != self.id {
            return false;
        }
        match event {
            RelayEvent::Data(data) => self.on_relay_data(data),
            RelayEvent::Sync(sync) => self.on_relay_sync(sync),
            RelayEvent::Log(log_event) => self.on_relay_log(log_event),
        }
        true
    }

    /// Deliver a fired timer.
    pub fn on_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::ClockTick => self.redraw(),
            TimerTask::CooldownElapsed { seq } => {
                if seq != self.cooldown_seq {
                    leptos::logging::log!("relay cooldown {seq} elapsed while {} is pending", self.cooldown_seq);
                }
                self.cooldown = false;
                self.redraw();
            }
        }
    }

    fn on_relay_data(&mut self, mut data: RelayData) {
        {
            let mut held = self.data.borrow_mut();
            // The local log is richer than a snapshot push.
            if let Some(sync) = data.sync.as_mut() {
                sync.log = held
                    .sync
                    .as_mut()
                    .map(|s| std::mem::take(&mut s.log))
                    .unwrap_or_default();
            }
            *held = data;
        }
        self.redraw();
    }

    fn on_relay_sync(&mut self, mut sync: RelaySync) {
        {
            let mut held = self.data.borrow_mut();
            if let Some(previous) = held.sync.take() {
                sync.log = previous.log;
            }
            held.sync = Some(sync);
        }
        self.redraw();
    }

    fn on_relay_log(&mut self, event: LogEvent) {
        let error = event.error.clone();
        let repeated_error = {
            let mut held = self.data.borrow_mut();
            let Some(sync) = held.sync.as_mut() else {
                return;
            };
            sync.log.push(event);
            let excess = sync.log.len().saturating_sub(SYNC_LOG_CAP);
            sync.log.drain(..excess);
            sync.log.len() >= 2 && sync.log[sync.log.len() - 2..].iter().all(LogEvent::is_error)
        };

        self.cooldown = true;
        self.cooldown_seq += 1;
        self.scheduler
            .set_timeout(COOLDOWN, TimerTask::CooldownElapsed { seq: self.cooldown_seq });
        self.redraw();

        if let Some(error) = error {
            if repeated_error {
                self.sound.play(Sound::Error);
            }
            leptos::logging::warn!("relay synchronisation error: {error}");
        }
    }

    fn redraw(&self) {
        (self.redraw)();
    }
}

fn tour_path_of(tour: &RelayTour) -> String {
    format!("{BROADCAST_ROOT}/{}/{}", tour.slug, tour.id)
}

fn round_path_of(tour: &RelayTour, round: &RelayRound) -> String {
    format!("{BROADCAST_ROOT}/{}/{}/{}", tour.slug, round.slug, round.id)
}

fn round_path_in(data: &RelayData, round_id: &str) -> Option<String> {
    data.rounds
        .iter()
        .find(|r| r.id == round_id)
        .map(|round| round_path_of(&data.tour, round))
}

//! Browser wiring for the relay view.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page boot code hands over the server-rendered snapshot and shared
//! chapter state; [`mount`] builds a [`RelayCtrl`] on browser collaborators
//! and returns a [`RelayMount`] the page socket and Leptos views talk to.
//! Redraws bump `redraw_seq`, which views track to re-render. Outbound
//! messages are encoded onto a channel drained by the socket writer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::channel::mpsc;
use leptos::prelude::{RwSignal, Update};
use relay_protocol::{decode_message, encode_outbound};
use serde_json::Value;

use crate::net::types::{RelayData, RoundId};
use crate::state::members::StudyMembers;
use crate::state::relay::{
    ChapterPreviews, Redraw, RelayCtrl, RelayCtrlOpts, SetChapter, SharedChapter, SocketSend,
};
use crate::util::browser::BrowserPage;
use crate::util::sound::BrowserSound;
use crate::util::timers::{BrowserScheduler, TimerTask};

/// Page state the relay view starts from.
pub struct RelayBoot {
    pub id: RoundId,
    pub data: RelayData,
    pub members: StudyMembers,
    pub chapter: SharedChapter,
    pub chapters: ChapterPreviews,
    pub looks_new: bool,
    pub set_chapter: SetChapter,
}

/// A relay controller mounted on the current page.
pub struct RelayMount {
    pub ctrl: Rc<RefCell<RelayCtrl>>,
    /// Incremented on every redraw request.
    pub redraw_seq: RwSignal<u64>,
    /// Encoded outbound socket messages.
    pub outbound: mpsc::UnboundedReceiver<String>,
}

impl RelayMount {
    /// Route a socket message by type. Returns whether it was consumed.
    pub fn socket_handler(&self, t: &str, d: Value) -> bool {
        self.ctrl.borrow_mut().socket_handler(t, d)
    }

    /// Route raw socket text. Returns whether it was consumed.
    pub fn on_socket_text(&self, raw: &str) -> bool {
        match decode_message(raw) {
            Ok(Some(event)) => self.ctrl.borrow_mut().handle(event),
            Ok(None) => false,
            Err(e) => {
                leptos::logging::warn!("relay socket text dropped: {e}");
                false
            }
        }
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // A logger may already be installed by the host page.
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Build the relay controller for this page.
pub fn mount(boot: RelayBoot) -> RelayMount {
    init_logging();

    let redraw_seq = RwSignal::new(0_u64);
    let redraw: Redraw = Rc::new(move || redraw_seq.update(|n| *n += 1));

    let (tx, outbound) = mpsc::unbounded::<String>();
    let send: SocketSend = Rc::new(move |msg| {
        if tx.unbounded_send(encode_outbound(msg)).is_err() {
            leptos::logging::warn!("relay socket closed; dropped {}", msg.kind());
        }
    });

    // Timers fire from the event loop, never while the controller is borrowed.
    let slot: Rc<RefCell<Weak<RefCell<RelayCtrl>>>> = Rc::new(RefCell::new(Weak::new()));
    let sink = {
        let slot = Rc::clone(&slot);
        Rc::new(move |task: TimerTask| {
            if let Some(ctrl) = slot.borrow().upgrade() {
                ctrl.borrow_mut().on_timer(task);
            }
        })
    };

    let page = Rc::new(BrowserPage);
    let ctrl = Rc::new(RefCell::new(RelayCtrl::new(RelayCtrlOpts {
        id: boot.id,
        data: boot.data,
        send,
        redraw,
        members: boot.members,
        chapter: boot.chapter,
        chapters: boot.chapters,
        looks_new: boot.looks_new,
        set_chapter: boot.set_chapter,
        location: page.clone(),
        history: page,
        sound: Rc::new(BrowserSound),
        scheduler: Rc::new(BrowserScheduler::new(sink)),
    })));
    *slot.borrow_mut() = Rc::downgrade(&ctrl);

    if let Some(teams) = ctrl.borrow().teams() {
        teams.reload();
    }

    RelayMount { ctrl, redraw_seq, outbound }
}

//! Relay wire model and socket message codec.
//!
//! This crate owns the JSON representation of broadcast relay messages shared
//! by the view controller and anything that replays socket traffic in tests.
//! Inbound messages arrive as `{"t": <type>, "d": <payload>}` envelopes and are
//! decoded into the closed [`RelayEvent`] variant; unknown types are left to
//! other handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Round identifier as used in URLs and socket payloads.
pub type RoundId = String;
/// Chapter (single board) identifier.
pub type ChapterId = String;

/// Error returned while decoding a socket message.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text is not a `{t, d}` JSON envelope.
    #[error("failed to decode socket envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    /// The message type is known but its payload does not match the schema.
    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Tour-level descriptor of a broadcast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTour {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether games are grouped into a team-vs-team table.
    #[serde(default)]
    pub team_table: bool,
}

/// One round of the tour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRound {
    pub id: RoundId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub ongoing: Option<bool>,
    /// Scheduled start in milliseconds since the Unix epoch.
    #[serde(default)]
    pub starts_at: Option<i64>,
}

/// Outcome of one synchronization attempt against the upstream source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Round the attempt belongs to.
    pub id: RoundId,
    /// Number of new moves fetched.
    #[serde(default)]
    pub moves: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub at: i64,
}

impl LogEvent {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Synchronization status of a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySync {
    /// Present on `relaySync` messages; snapshots may omit it.
    #[serde(default)]
    pub id: RoundId,
    pub ongoing: bool,
    #[serde(default)]
    pub log: Vec<LogEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<String>,
    /// Broadcast delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

/// Full snapshot of a broadcast as seen from one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayData {
    /// Round this snapshot was pushed for.
    pub id: RoundId,
    pub tour: RelayTour,
    pub rounds: Vec<RelayRound>,
    #[serde(default)]
    pub sync: Option<RelaySync>,
}

/// Position reference of a node message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub chapter_id: ChapterId,
    #[serde(default)]
    pub path: String,
}

/// Tree node added by a move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerNode {
    pub fen: String,
    pub uci: String,
    /// Remaining time of the side that moved, in centiseconds.
    #[serde(default)]
    pub clock: Option<i64>,
}

/// A move was appended to a chapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerNodeMsg {
    pub p: NodePosition,
    pub n: ServerNode,
}

/// A clock value was set on a chapter's current node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerClockMsg {
    pub p: NodePosition,
    /// Clock in centiseconds.
    #[serde(default)]
    pub c: Option<i64>,
}

/// Inbound relay socket messages handled by the view controller.
#[derive(Clone, Debug, PartialEq)]
pub enum RelayEvent {
    Data(RelayData),
    Sync(RelaySync),
    Log(LogEvent),
}

impl RelayEvent {
    /// Socket message type name of each variant.
    pub const DATA: &'static str = "relayData";
    pub const SYNC: &'static str = "relaySync";
    pub const LOG: &'static str = "relayLog";

    /// Round id embedded in the payload.
    #[must_use]
    pub fn round_id(&self) -> &str {
        match self {
            Self::Data(d) => &d.id,
            Self::Sync(s) => &s.id,
            Self::Log(e) => &e.id,
        }
    }

    /// Decode a message from its type name and payload.
    ///
    /// Returns `Ok(None)` when `t` is not a relay message type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Payload`] when `t` is known but `d` does not
    /// match its schema.
    pub fn from_message(t: &str, d: Value) -> Result<Option<Self>, CodecError> {
        let event = match t {
            Self::DATA => Self::Data(payload(Self::DATA, d)?),
            Self::SYNC => Self::Sync(payload(Self::SYNC, d)?),
            Self::LOG => Self::Log(payload(Self::LOG, d)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn payload<T: serde::de::DeserializeOwned>(kind: &'static str, d: Value) -> Result<T, CodecError> {
    serde_json::from_value(d).map_err(|source| CodecError::Payload { kind, source })
}

#[derive(Deserialize)]
struct Envelope {
    t: String,
    #[serde(default)]
    d: Value,
}

/// Decode a raw socket text message.
///
/// # Errors
///
/// Returns [`CodecError::Envelope`] for text that is not a `{t, d}` object and
/// [`CodecError::Payload`] for a malformed relay payload.
pub fn decode_message(raw: &str) -> Result<Option<RelayEvent>, CodecError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(CodecError::Envelope)?;
    RelayEvent::from_message(&envelope.t, envelope.d)
}

/// Messages sent by the view controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outbound {
    /// Ask the server to start or stop synchronizing the round.
    RelaySync(bool),
}

impl Outbound {
    /// Socket message type name.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::RelaySync(_) => RelayEvent::SYNC,
        }
    }

    /// Encode as a `{t, d}` JSON value.
    #[must_use]
    pub fn to_json(self) -> Value {
        let d = match self {
            Self::RelaySync(enabled) => Value::Bool(enabled),
        };
        serde_json::json!({ "t": self.kind(), "d": d })
    }
}

/// Encode an outbound message as socket text.
#[must_use]
pub fn encode_outbound(msg: Outbound) -> String {
    msg.to_json().to_string()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

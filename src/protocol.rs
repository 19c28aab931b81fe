//! Wire protocol for the arena game server.
//!
//! One JSON object per websocket frame. Inbound frames are tagged by `type`;
//! action and street strings are parsed into sum types here and re-serialised
//! at the boundary. Fields the server may omit are `Option`s with documented
//! defaults so a sparse frame still parses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::poker::card::Street;

/// A legal action the server may offer or the bot may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet,
    RaiseTo,
}

/// Event kinds carried by `event` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    PostBlinds,
    Bet,
    Raise,
    Call,
    Check,
    Fold,
    Flop,
    Turn,
    River,
    Showdown,
    PotAward,
    Eliminated,
}

/// Partial table configuration from a `welcome` frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableConfigUpdate {
    pub seats: Option<u8>,
    pub sb: Option<u32>,
    pub bb: Option<u32>,
    pub ante: Option<u32>,
}

/// One lobby roster entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LobbyPlayer {
    pub seat: Option<u8>,
    pub team: Option<String>,
}

/// A seat's starting stack in a `start_hand` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatStack {
    pub seat: u8,
    #[serde(default)]
    pub stack: u32,
}

/// A single table event.
#[derive(Debug, Clone, Deserialize)]
pub struct GameEvent {
    pub ev: EventKind,
    pub seat: Option<u8>,
    pub amount: Option<u32>,
    /// Flop cards.
    pub cards: Option<Vec<String>>,
    /// Turn or river card.
    pub card: Option<String>,
    /// Revealed hand at showdown.
    pub hand: Option<Vec<String>>,
    /// Showdown hand rank as reported by the server.
    pub rank: Option<Value>,
    pub sb: Option<u32>,
    pub bb: Option<u32>,
    pub sb_seat: Option<u8>,
    pub bb_seat: Option<u8>,
}

/// Hero's private state inside an `act` frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouState {
    #[serde(default)]
    pub hole: Vec<String>,
    #[serde(default)]
    pub stack: u32,
    #[serde(default)]
    pub committed: u32,
    #[serde(default)]
    pub time_ms: u64,
}

/// Per-player public state inside an `act` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerState {
    pub seat: u8,
    pub stack: Option<u32>,
    pub committed: Option<u32>,
    pub has_folded: Option<bool>,
    pub is_all_in: Option<bool>,
    pub team: Option<String>,
}

fn default_street() -> Street {
    Street::PreFlop
}

/// A decision request.
#[derive(Debug, Clone, Deserialize)]
pub struct ActRequest {
    #[serde(default)]
    pub hand_id: Value,
    pub seat: u8,
    #[serde(default = "default_street")]
    pub phase: Street,
    #[serde(default)]
    pub community: Vec<String>,
    pub pot: Option<u32>,
    pub call_amount: Option<u32>,
    pub min_raise_to: Option<u32>,
    pub max_raise_to: Option<u32>,
    pub min_raise_increment: Option<u32>,
    #[serde(default)]
    pub legal: Vec<Action>,
    #[serde(default)]
    pub you: YouState,
    #[serde(default)]
    pub players: Vec<PlayerState>,
}

impl ActRequest {
    /// Amount needed to call; 0 when absent.
    pub fn call_amount(&self) -> u32 {
        self.call_amount.unwrap_or(0)
    }

    /// Minimum raise increment; 0 when absent.
    pub fn min_raise_increment(&self) -> u32 {
        self.min_raise_increment.unwrap_or(0)
    }
}

/// Every inbound frame the bot understands.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        seat: Option<u8>,
        config: Option<TableConfigUpdate>,
    },
    Lobby {
        #[serde(default)]
        players: Vec<LobbyPlayer>,
    },
    StartHand {
        #[serde(default)]
        hand_id: Value,
        button: Option<u8>,
        #[serde(default)]
        stacks: Vec<SeatStack>,
    },
    Event(GameEvent),
    Act(ActRequest),
    EndHand {
        #[serde(default)]
        hand_id: Value,
        stacks: Option<Value>,
    },
    MatchEnd {
        winner: Option<Value>,
    },
    AbStatus {
        bot: Option<Value>,
        state: Option<Value>,
    },
    Error(Value),
}

/// Outbound frames.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Hello {
        v: u8,
        team: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bot: Option<String>,
    },
    Action {
        v: u8,
        hand_id: Value,
        action: Action,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<u32>,
    },
}

/// Render a JSON id as a plain string (hand ids may arrive as numbers).
pub fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    }
}

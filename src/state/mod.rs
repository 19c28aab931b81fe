//! Table state: configuration, per-player snapshots, hand history, and the
//! event-driven tracker.

pub mod tracker;

use serde::Serialize;
use serde_json::Value;

use rustc_hash::FxHashMap;

use crate::poker::card::{Card, Street};
use crate::protocol::SeatStack;

pub use tracker::GameStateTracker;

/// Static table parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub seats: u8,
    pub sb: u32,
    pub bb: u32,
    pub ante: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 2,
            sb: 100,
            bb: 200,
            ante: 0,
        }
    }
}

/// Relative position of a seat for the current street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    InPosition,
    OutOfPosition,
    Blinds,
}

/// A seat's role in the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SmallBlind,
    BigBlind,
    Button,
    Seat(u8),
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SmallBlind => f.write_str("SB"),
            Role::BigBlind => f.write_str("BB"),
            Role::Button => f.write_str("BTN"),
            Role::Seat(n) => write!(f, "SEAT_{n}"),
        }
    }
}

/// An action recorded into the hand history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableAction {
    PostSb,
    PostBb,
    Bet,
    Raise,
    Call,
    Check,
    Fold,
}

impl TableAction {
    /// Bets and raises count as aggressive.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, TableAction::Bet | TableAction::Raise)
    }
}

/// Rolling public view of one seat.
#[derive(Debug, Clone, Default)]
pub struct PlayerSnapshot {
    pub seat: u8,
    pub name: Option<String>,
    pub stack: u32,
    pub committed: u32,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub last_action: Option<TableAction>,
    /// Times this snapshot was synced from an `act` payload.
    pub seen_hands: u32,
    pub voluntarily_played: u32,
    pub bets_or_raises: u32,
    pub calls: u32,
}

impl PlayerSnapshot {
    pub fn new(seat: u8, name: Option<String>, stack: u32) -> Self {
        Self {
            seat,
            name,
            stack,
            ..Self::default()
        }
    }
}

/// One recorded action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub hand_id: String,
    pub seat: u8,
    pub action: TableAction,
    pub amount: Option<u32>,
    pub street: Street,
    pub pot_before: u32,
    pub stack_before: u32,
    /// Unix time in seconds.
    pub timestamp: f64,
    pub resulting_stack: u32,
}

/// A revealed hand at showdown.
#[derive(Debug, Clone, Serialize)]
pub struct ShowdownEntry {
    pub seat: Option<u8>,
    pub hand: Vec<String>,
    pub rank: Option<Value>,
}

/// One pot award.
#[derive(Debug, Clone, Serialize)]
pub struct Payout {
    pub seat: Option<u8>,
    pub amount: Option<u32>,
}

/// Everything observed during one hand, frozen at hand end.
#[derive(Debug, Clone)]
pub struct HandHistory {
    pub hand_id: String,
    pub button: Option<u8>,
    pub start_stacks: Vec<SeatStack>,
    pub board_by_street: FxHashMap<Street, Vec<Card>>,
    pub actions: FxHashMap<Street, Vec<ActionRecord>>,
    pub showdowns: Vec<ShowdownEntry>,
    pub payouts: Vec<Payout>,
    pub eliminations: Vec<u8>,
}

impl HandHistory {
    pub fn new(hand_id: String, button: Option<u8>, start_stacks: Vec<SeatStack>) -> Self {
        let mut actions = FxHashMap::default();
        for street in Street::BETTING {
            actions.insert(street, Vec::new());
        }
        Self {
            hand_id,
            button,
            start_stacks,
            board_by_street: FxHashMap::default(),
            actions,
            showdowns: Vec::new(),
            payouts: Vec::new(),
            eliminations: Vec::new(),
        }
    }
}

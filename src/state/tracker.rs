//! Event-driven game state tracker.
//!
//! Consumes protocol events and maintains table config, seat map, pot,
//! street, board, per-player snapshots, and the open hand history so every
//! decision has full context. The street marker never regresses; events for
//! an earlier street are still recorded.

use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;

use crate::poker::card::{parse_cards, Card, Street};
use crate::protocol::{
    id_string, ActRequest, EventKind, GameEvent, SeatStack, TableConfigUpdate,
};
use crate::state::{
    ActionRecord, HandHistory, Payout, PlayerSnapshot, Position, Role, ShowdownEntry,
    TableAction, TableConfig,
};

fn now_unix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Tracks per-hand information across the protocol event stream.
#[derive(Debug)]
pub struct GameStateTracker {
    pub table: TableConfig,
    /// Hero's seat, once the server assigns it.
    pub seat: Option<u8>,
    seat_map: FxHashMap<u8, String>,
    pub players: FxHashMap<u8, PlayerSnapshot>,
    pub hand: Option<HandHistory>,
    pub current_hand_id: Option<String>,
    pub board: Vec<Card>,
    pub street: Street,
    pub pot: u32,
}

impl Default for GameStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateTracker {
    pub fn new() -> Self {
        Self {
            table: TableConfig::default(),
            seat: None,
            seat_map: FxHashMap::default(),
            players: FxHashMap::default(),
            hand: None,
            current_hand_id: None,
            board: Vec::new(),
            street: Street::PreFlop,
            pot: 0,
        }
    }

    // ------------------------------------------------------------------
    // Seat / lobby management
    // ------------------------------------------------------------------

    pub fn set_seat(&mut self, seat: u8) {
        self.seat = Some(seat);
    }

    /// Merge a partial config from a `welcome` frame.
    pub fn update_table_config(&mut self, config: &TableConfigUpdate) {
        self.table = TableConfig {
            seats: config.seats.unwrap_or(self.table.seats),
            sb: config.sb.unwrap_or(self.table.sb),
            bb: config.bb.unwrap_or(self.table.bb),
            ante: config.ante.unwrap_or(0),
        };
    }

    pub fn register_seat(&mut self, seat: Option<u8>, team: Option<&str>) {
        if let (Some(seat), Some(team)) = (seat, team) {
            self.seat_map.insert(seat, team.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Hand lifecycle
    // ------------------------------------------------------------------

    pub fn start_hand(
        &mut self,
        hand_id: &serde_json::Value,
        button: Option<u8>,
        stacks: &[SeatStack],
    ) {
        let hand_id = id_string(hand_id);
        self.current_hand_id = Some(hand_id.clone());
        self.street = Street::PreFlop;
        self.board.clear();
        self.pot = 0;
        self.players = stacks
            .iter()
            .map(|entry| {
                (
                    entry.seat,
                    PlayerSnapshot::new(
                        entry.seat,
                        self.seat_map.get(&entry.seat).cloned(),
                        entry.stack,
                    ),
                )
            })
            .collect();
        self.hand = Some(HandHistory::new(hand_id, button, stacks.to_vec()));
    }

    fn record_board(&mut self, street: Street, cards: Vec<Card>) {
        self.board = cards;
        if let Some(hand) = &mut self.hand {
            hand.board_by_street.insert(street, self.board.clone());
        }
    }

    fn update_street(&mut self, street: Street) {
        if street.order() >= self.street.order() {
            self.street = street;
        }
    }

    /// Close the open hand and hand it back for logging.
    pub fn finalize_hand(&mut self) -> Option<HandHistory> {
        self.hand.take()
    }

    // ------------------------------------------------------------------
    // Event ingestion
    // ------------------------------------------------------------------

    pub fn handle_event(&mut self, event: &GameEvent) {
        match event.ev {
            EventKind::PostBlinds => self.record_blinds(event),
            EventKind::Bet => self.record_action_event(event, TableAction::Bet),
            EventKind::Raise => self.record_action_event(event, TableAction::Raise),
            EventKind::Call => self.record_action_event(event, TableAction::Call),
            EventKind::Check => self.record_action_event(event, TableAction::Check),
            EventKind::Fold => self.record_action_event(event, TableAction::Fold),
            EventKind::Flop => {
                let cards = event
                    .cards
                    .as_deref()
                    .map(parse_cards)
                    .unwrap_or_default();
                self.update_street(Street::Flop);
                self.record_board(Street::Flop, cards);
            }
            EventKind::Turn => self.record_street_card(event, Street::Turn),
            EventKind::River => self.record_street_card(event, Street::River),
            EventKind::Showdown => {
                if let Some(hand) = &mut self.hand {
                    hand.showdowns.push(ShowdownEntry {
                        seat: event.seat,
                        hand: event.hand.clone().unwrap_or_default(),
                        rank: event.rank.clone(),
                    });
                }
                self.update_street(Street::Showdown);
            }
            EventKind::PotAward => {
                if let Some(hand) = &mut self.hand {
                    hand.payouts.push(Payout {
                        seat: event.seat,
                        amount: event.amount,
                    });
                }
            }
            EventKind::Eliminated => {
                if let (Some(seat), Some(hand)) = (event.seat, &mut self.hand) {
                    hand.eliminations.push(seat);
                }
            }
        }
    }

    fn record_street_card(&mut self, event: &GameEvent, street: Street) {
        if let Some(card) = event.card.as_deref().and_then(Card::parse) {
            self.board.push(card);
        }
        self.update_street(street);
        self.record_board(street, self.board.clone());
    }

    fn record_blinds(&mut self, event: &GameEvent) {
        let sb = event.sb.unwrap_or(0);
        let bb = event.bb.unwrap_or(0);
        if let Some(seat) = event.sb_seat {
            self.append_action(seat, TableAction::PostSb, Some(sb), Street::PreFlop);
        }
        if let Some(seat) = event.bb_seat {
            self.append_action(seat, TableAction::PostBb, Some(bb), Street::PreFlop);
        }
        self.pot += sb + bb + self.table.ante * self.table.seats as u32;
    }

    fn record_action_event(&mut self, event: &GameEvent, action: TableAction) {
        let Some(seat) = event.seat else {
            return;
        };
        self.append_action(seat, action, event.amount, self.street);
        if let Some(amount) = event.amount {
            self.pot += amount;
        }
        if let Some(player) = self.players.get_mut(&seat) {
            player.last_action = Some(action);
            if action.is_aggressive() {
                player.bets_or_raises += 1;
            } else if action == TableAction::Call {
                player.calls += 1;
            }
            if action != TableAction::Fold {
                player.voluntarily_played += 1;
            }
        }
    }

    fn append_action(
        &mut self,
        seat: u8,
        action: TableAction,
        amount: Option<u32>,
        street: Street,
    ) {
        let stack_before = self.players.get(&seat).map_or(0, |p| p.stack);
        let pot_before = self.pot;
        let hand_id = self
            .current_hand_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        if let Some(hand) = &mut self.hand {
            hand.actions.entry(street).or_default().push(ActionRecord {
                hand_id,
                seat,
                action,
                amount,
                street,
                pot_before,
                stack_before,
                timestamp: now_unix(),
                resulting_stack: stack_before.saturating_sub(amount.unwrap_or(0)),
            });
        }
    }

    // ------------------------------------------------------------------
    // Player snapshot updates
    // ------------------------------------------------------------------

    /// Mirror the `act` payload's per-player values into local snapshots.
    pub fn sync_from_act_payload(&mut self, payload: &ActRequest) {
        for entry in &payload.players {
            let snapshot = self.players.entry(entry.seat).or_insert_with(|| {
                PlayerSnapshot::new(entry.seat, self.seat_map.get(&entry.seat).cloned(), 0)
            });
            if let Some(stack) = entry.stack {
                snapshot.stack = stack;
            }
            if let Some(committed) = entry.committed {
                snapshot.committed = committed;
            }
            if let Some(folded) = entry.has_folded {
                snapshot.has_folded = folded;
            }
            if let Some(all_in) = entry.is_all_in {
                snapshot.is_all_in = all_in;
            }
            if let Some(team) = &entry.team {
                snapshot.name = Some(team.clone());
            }
            snapshot.seen_hands += 1;
            if let Some(name) = snapshot.name.clone() {
                self.seat_map.entry(entry.seat).or_insert(name);
            }
        }
    }

    // ------------------------------------------------------------------
    // Derived helpers
    // ------------------------------------------------------------------

    /// Display label for a seat: team name, "Hero" for self, or `Seat N`.
    pub fn seat_label(&self, seat: Option<u8>) -> String {
        let Some(seat) = seat else {
            return "Seat ?".to_string();
        };
        if Some(seat) == self.seat {
            self.seat_map
                .get(&seat)
                .cloned()
                .unwrap_or_else(|| "Hero".to_string())
        } else {
            self.seat_map
                .get(&seat)
                .cloned()
                .unwrap_or_else(|| format!("Seat {seat}"))
        }
    }

    /// Per-street actions of the open hand, empty when no hand is open.
    pub fn action_history(&self) -> FxHashMap<Street, Vec<ActionRecord>> {
        self.hand
            .as_ref()
            .map(|h| h.actions.clone())
            .unwrap_or_default()
    }

    pub fn button(&self) -> Option<u8> {
        self.hand.as_ref().and_then(|h| h.button)
    }

    pub fn position_of(&self, seat: u8, street: Street) -> Position {
        if self.table.seats <= 2 {
            if street == Street::PreFlop {
                return if Some(seat) == self.button() {
                    Position::Blinds
                } else {
                    Position::InPosition
                };
            }
            return if Some(seat) != self.button() {
                Position::InPosition
            } else {
                Position::OutOfPosition
            };
        }
        let Some(button) = self.button() else {
            return Position::OutOfPosition;
        };
        let relative = (seat as i32 - button as i32).rem_euclid(self.table.seats as i32);
        match relative {
            0 => Position::InPosition,
            1 => Position::Blinds,
            _ => Position::OutOfPosition,
        }
    }

    pub fn role_of(&self, seat: u8) -> Role {
        if self.table.seats == 2 {
            return if Some(seat) == self.button() {
                Role::SmallBlind
            } else {
                Role::BigBlind
            };
        }
        if Some(seat) == self.button() {
            return Role::Button;
        }
        let button = self.button().unwrap_or(0);
        let relative = (seat as i32 - button as i32).rem_euclid(self.table.seats as i32);
        match relative {
            1 => Role::SmallBlind,
            2 => Role::BigBlind,
            _ => Role::Seat(seat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blinds_event(sb: u32, bb: u32, sb_seat: u8, bb_seat: u8) -> GameEvent {
        serde_json::from_value(json!({
            "ev": "POST_BLINDS", "sb": sb, "bb": bb,
            "sb_seat": sb_seat, "bb_seat": bb_seat
        }))
        .unwrap()
    }

    fn action_event(ev: &str, seat: u8, amount: Option<u32>) -> GameEvent {
        serde_json::from_value(json!({"ev": ev, "seat": seat, "amount": amount})).unwrap()
    }

    fn board_event(ev: &str, cards: serde_json::Value) -> GameEvent {
        let key = if ev == "FLOP" { "cards" } else { "card" };
        serde_json::from_value(json!({"ev": ev, key: cards})).unwrap()
    }

    fn started_tracker() -> GameStateTracker {
        let mut tracker = GameStateTracker::new();
        tracker.update_table_config(&TableConfigUpdate {
            seats: Some(2),
            sb: Some(50),
            bb: Some(100),
            ante: None,
        });
        tracker.set_seat(0);
        tracker.start_hand(
            &json!("h1"),
            Some(0),
            &[
                SeatStack { seat: 0, stack: 1000 },
                SeatStack { seat: 1, stack: 1000 },
            ],
        );
        tracker
    }

    #[test]
    fn blinds_feed_the_pot_and_history() {
        let mut tracker = started_tracker();
        tracker.handle_event(&blinds_event(50, 100, 0, 1));
        assert_eq!(tracker.pot, 150);
        let preflop = &tracker.hand.as_ref().unwrap().actions[&Street::PreFlop];
        assert_eq!(preflop.len(), 2);
        assert_eq!(preflop[0].action, TableAction::PostSb);
        assert_eq!(preflop[1].action, TableAction::PostBb);
        // Blind records see the pot before posting.
        assert_eq!(preflop[0].pot_before, 0);
    }

    #[test]
    fn pot_equals_sum_of_recorded_amounts() {
        let mut tracker = started_tracker();
        tracker.handle_event(&blinds_event(50, 100, 0, 1));
        tracker.handle_event(&action_event("RAISE", 0, Some(250)));
        tracker.handle_event(&action_event("CALL", 1, Some(200)));
        assert_eq!(tracker.pot, 50 + 100 + 250 + 200);
    }

    #[test]
    fn action_events_update_snapshots() {
        let mut tracker = started_tracker();
        tracker.handle_event(&action_event("RAISE", 1, Some(300)));
        let villain = &tracker.players[&1];
        assert_eq!(villain.last_action, Some(TableAction::Raise));
        assert_eq!(villain.bets_or_raises, 1);
        assert_eq!(villain.voluntarily_played, 1);

        tracker.handle_event(&action_event("FOLD", 1, None));
        let villain = &tracker.players[&1];
        assert_eq!(villain.last_action, Some(TableAction::Fold));
        // Folds are not voluntary participation.
        assert_eq!(villain.voluntarily_played, 1);
    }

    #[test]
    fn street_never_regresses() {
        let mut tracker = started_tracker();
        tracker.handle_event(&board_event("FLOP", json!(["Ah", "Kd", "4c"])));
        assert_eq!(tracker.street, Street::Flop);
        assert_eq!(tracker.board.len(), 3);

        tracker.handle_event(&board_event("TURN", json!("2s")));
        tracker.handle_event(&board_event("RIVER", json!("9h")));
        assert_eq!(tracker.street, Street::River);
        assert_eq!(tracker.board.len(), 5);

        // A stale flop event must not roll the street marker back.
        tracker.handle_event(&board_event("FLOP", json!(["Ah", "Kd", "4c"])));
        assert_eq!(tracker.street, Street::River);
    }

    #[test]
    fn showdown_awards_and_eliminations_land_in_history() {
        let mut tracker = started_tracker();
        tracker.handle_event(
            &serde_json::from_value(json!({
                "ev": "SHOWDOWN", "seat": 1, "hand": ["Ah", "Ad"], "rank": "Pair"
            }))
            .unwrap(),
        );
        tracker.handle_event(&action_event("POT_AWARD", 1, Some(400)));
        tracker.handle_event(&action_event("ELIMINATED", 0, None));

        let hand = tracker.finalize_hand().unwrap();
        assert_eq!(hand.showdowns.len(), 1);
        assert_eq!(hand.showdowns[0].seat, Some(1));
        assert_eq!(hand.payouts.len(), 1);
        assert_eq!(hand.payouts[0].amount, Some(400));
        assert_eq!(hand.eliminations, vec![0]);
        assert!(tracker.hand.is_none());
    }

    #[test]
    fn sync_updates_snapshots_and_counts_syncs() {
        let mut tracker = started_tracker();
        let req: ActRequest = serde_json::from_value(json!({
            "hand_id": "h1", "seat": 0,
            "players": [
                {"seat": 0, "stack": 900, "committed": 100},
                {"seat": 1, "stack": 800, "committed": 200, "team": "villain",
                 "has_folded": false, "is_all_in": false}
            ]
        }))
        .unwrap();
        tracker.sync_from_act_payload(&req);
        tracker.sync_from_act_payload(&req);

        let villain = &tracker.players[&1];
        assert_eq!(villain.stack, 800);
        assert_eq!(villain.committed, 200);
        assert_eq!(villain.name.as_deref(), Some("villain"));
        assert_eq!(villain.seen_hands, 2);
        assert_eq!(tracker.seat_label(Some(1)), "villain");
    }

    #[test]
    fn heads_up_positions_and_roles() {
        let tracker = started_tracker(); // button = seat 0
        assert_eq!(tracker.position_of(0, Street::PreFlop), Position::Blinds);
        assert_eq!(tracker.position_of(1, Street::PreFlop), Position::InPosition);
        assert_eq!(tracker.position_of(0, Street::Flop), Position::OutOfPosition);
        assert_eq!(tracker.position_of(1, Street::Flop), Position::InPosition);
        assert_eq!(tracker.role_of(0), Role::SmallBlind);
        assert_eq!(tracker.role_of(1), Role::BigBlind);
    }

    #[test]
    fn seat_labels() {
        let mut tracker = started_tracker();
        assert_eq!(tracker.seat_label(None), "Seat ?");
        assert_eq!(tracker.seat_label(Some(0)), "Hero");
        assert_eq!(tracker.seat_label(Some(1)), "Seat 1");
        tracker.register_seat(Some(1), Some("rivals"));
        assert_eq!(tracker.seat_label(Some(1)), "rivals");
    }
}

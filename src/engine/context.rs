//! Decision context synthesis.
//!
//! Bundles everything one decision needs into a single self-contained value:
//! the `act` request, tracker state, analysis features, and the opponent
//! model's view of the villain.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::analysis::{
    classify_board, detect_draws, estimate_equity_vs_range, evaluate_hand, implied_odds,
    pot_odds, BoardTexture, DrawFeatures, DEFAULT_EQUITY_TRIALS,
};
use crate::model::{OpponentModel, OpponentProfile};
use crate::poker::card::{parse_cards, Card, Street};
use crate::poker::hand_eval::HandStrength;
use crate::poker::range::Combo;
use crate::protocol::{Action, ActRequest};
use crate::state::{
    ActionRecord, GameStateTracker, PlayerSnapshot, Position, Role, TableAction, TableConfig,
};

/// Everything the engine looks at for one decision.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub hand_id: Value,
    pub seat: u8,
    pub street: Street,
    pub hole: Vec<Card>,
    pub community: Vec<Card>,
    pub pot: u32,
    pub call_amount: u32,
    pub min_raise_to: Option<u32>,
    pub max_raise_to: Option<u32>,
    pub min_raise_increment: u32,
    pub legal_actions: Vec<Action>,
    pub time_ms: u64,
    pub position: Position,
    pub table: TableConfig,
    /// Non-hero snapshots, ordered by seat.
    pub opponents: Vec<PlayerSnapshot>,
    pub players: Vec<PlayerSnapshot>,
    pub action_history: FxHashMap<Street, Vec<ActionRecord>>,
    pub board_texture: BoardTexture,
    pub draws: DrawFeatures,
    pub hand_strength: HandStrength,
    pub pot_odds: f64,
    pub implied_odds: f64,
    pub opponent_profiles: FxHashMap<u8, OpponentProfile>,
    pub effective_stack: u32,
    pub effective_bb: f64,
    /// Villain combos that do not collide with known cards.
    pub opponent_range: Vec<Combo>,
    pub equity_vs_range: f64,
    pub hero_stack: u32,
    pub hero_committed: u32,
    pub hero_role: Role,
}

/// Build a [`DecisionContext`] from an `act` request.
///
/// Syncs the tracker's snapshots from the payload first, then derives
/// analysis features and the villain range estimate. Equity sampling runs
/// through `rng`.
pub fn build_context<R: Rng>(
    tracker: &mut GameStateTracker,
    model: &mut OpponentModel,
    req: &ActRequest,
    rng: &mut R,
) -> DecisionContext {
    tracker.sync_from_act_payload(req);

    let seat = req.seat;
    let street = req.phase;
    let hole = parse_cards(&req.you.hole);
    let community = parse_cards(&req.community);
    let position = tracker.position_of(seat, street);
    let hero_role = tracker.role_of(seat);
    let call_amount = req.call_amount();
    let pot = req.pot.unwrap_or(tracker.pot);
    let hero_stack = req.you.stack;
    let hero_committed = req.you.committed;

    let mut players: Vec<PlayerSnapshot> = tracker.players.values().cloned().collect();
    players.sort_by_key(|p| p.seat);
    let opponents: Vec<PlayerSnapshot> = players
        .iter()
        .filter(|p| p.seat != seat)
        .cloned()
        .collect();

    let mut opponent_profiles = FxHashMap::default();
    for opp in &opponents {
        opponent_profiles.insert(opp.seat, model.describe(opp.seat));
    }

    let mut effective_stack = hero_stack + hero_committed;
    for opp in &opponents {
        effective_stack = effective_stack.min(opp.stack + opp.committed);
    }
    let effective_bb = effective_stack as f64 / tracker.table.bb.max(1) as f64;

    let board_texture = classify_board(&community);
    let draws = detect_draws(&hole, &community);
    let hand_strength = evaluate_hand(&hole, &community);

    let dead: Vec<Card> = hole.iter().chain(&community).copied().collect();
    let mut opponent_range: Vec<Combo> = Vec::new();
    if let Some(villain) = opponents.first() {
        let villain_role = tracker.role_of(villain.seat);
        let villain_action = villain.last_action.unwrap_or(TableAction::Call);
        opponent_range = model
            .estimate_preflop_range(villain.seat, villain_role, villain_action)
            .into_iter()
            .filter(|combo| !combo.conflicts_with(&dead))
            .collect();
    }
    let equity_vs_range = estimate_equity_vs_range(
        &hole,
        &community,
        &opponent_range,
        DEFAULT_EQUITY_TRIALS,
        rng,
    );

    DecisionContext {
        hand_id: req.hand_id.clone(),
        seat,
        street,
        pot,
        call_amount,
        min_raise_to: req.min_raise_to,
        max_raise_to: req.max_raise_to,
        min_raise_increment: req.min_raise_increment(),
        legal_actions: req.legal.clone(),
        time_ms: req.you.time_ms,
        position,
        table: tracker.table,
        opponents,
        players,
        action_history: tracker.action_history(),
        board_texture,
        draws,
        hand_strength,
        pot_odds: pot_odds(call_amount, pot),
        implied_odds: implied_odds(call_amount, pot, effective_stack),
        opponent_profiles,
        effective_stack,
        effective_bb,
        opponent_range,
        equity_vs_range,
        hero_stack,
        hero_committed,
        hero_role,
        hole,
        community,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{SeatStack, TableConfigUpdate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn tracker_with_hand() -> GameStateTracker {
        let mut tracker = GameStateTracker::new();
        tracker.update_table_config(&TableConfigUpdate {
            seats: Some(2),
            sb: Some(50),
            bb: Some(100),
            ante: None,
        });
        tracker.set_seat(0);
        tracker.start_hand(
            &json!("h7"),
            Some(0),
            &[
                SeatStack { seat: 0, stack: 1000 },
                SeatStack { seat: 1, stack: 1500 },
            ],
        );
        tracker
    }

    fn act_request() -> ActRequest {
        serde_json::from_value(json!({
            "hand_id": "h7", "seat": 0, "phase": "PRE_FLOP",
            "community": [], "pot": 150, "call_amount": 50,
            "min_raise_to": 200, "max_raise_to": 1000, "min_raise_increment": 100,
            "legal": ["FOLD", "CALL", "RAISE_TO"],
            "you": {"hole": ["As", "Ks"], "stack": 950, "committed": 50, "time_ms": 1500},
            "players": [
                {"seat": 0, "stack": 950, "committed": 50},
                {"seat": 1, "stack": 1400, "committed": 100, "team": "villain"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn builds_a_complete_context() {
        let mut tracker = tracker_with_hand();
        let mut model = OpponentModel::new();
        let mut rng = StdRng::seed_from_u64(11);
        let ctx = build_context(&mut tracker, &mut model, &act_request(), &mut rng);

        assert_eq!(ctx.street, Street::PreFlop);
        assert_eq!(ctx.hole.len(), 2);
        assert_eq!(ctx.call_amount, 50);
        // Hero total 1000 vs villain total 1500.
        assert_eq!(ctx.effective_stack, 1000);
        assert!((ctx.effective_bb - 10.0).abs() < 1e-9);
        assert_eq!(ctx.opponents.len(), 1);
        assert_eq!(ctx.opponents[0].seat, 1);
        assert_eq!(ctx.hero_role, Role::SmallBlind);
        assert!(ctx.opponent_profiles.contains_key(&1));
        assert!((0.0..=1.0).contains(&ctx.equity_vs_range));
        assert!(ctx.pot_odds > 0.0);
    }

    #[test]
    fn villain_range_excludes_known_cards() {
        let mut tracker = tracker_with_hand();
        let mut model = OpponentModel::new();
        let mut rng = StdRng::seed_from_u64(12);
        let ctx = build_context(&mut tracker, &mut model, &act_request(), &mut rng);

        assert!(!ctx.opponent_range.is_empty());
        for combo in &ctx.opponent_range {
            assert!(!combo.conflicts_with(&ctx.hole));
        }
    }

    #[test]
    fn effective_stack_tracks_the_shorter_side() {
        let mut tracker = tracker_with_hand();
        let mut model = OpponentModel::new();
        let mut rng = StdRng::seed_from_u64(13);
        let mut req = act_request();
        req.players[1].stack = Some(300);
        req.players[1].committed = Some(100);
        let ctx = build_context(&mut tracker, &mut model, &req, &mut rng);
        assert_eq!(ctx.effective_stack, 400);
    }
}

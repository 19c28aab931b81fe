//! The heuristic decision engine.
//!
//! Preflop play is range-driven: push/fold at short stacks, role- and
//! depth-keyed opening ranges when unopened, three-bet/defend ranges against
//! a raise. Postflop play mixes value bets, semi-bluffs with draw equity,
//! pot-odds calls, and occasional bluff-raises, sized by street, SPR, board
//! texture, and the villain's aggression. Every proposal is sanitised
//! against the legal action set before it leaves the engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::{preflop_strength, TextureLabel};
use crate::engine::context::DecisionContext;
use crate::engine::search::MonteCarloActionSearch;
use crate::model::{Classification, OpponentProfile};
use crate::poker::card::Street;
use crate::poker::range::{
    opening_range, push_range, three_bet_range, Combo, RangePosition,
};
use crate::protocol::Action;
use crate::state::{Position, Role};

/// A chosen action, with the target amount for bets and raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub amount: Option<u32>,
}

impl Decision {
    pub fn new(action: Action, amount: Option<u32>) -> Self {
        Self { action, amount }
    }
}

/// The villain profile the heuristics key off; a neutral TAG when nothing
/// has been observed.
fn villain_profile(ctx: &DecisionContext) -> OpponentProfile {
    ctx.opponents
        .first()
        .and_then(|v| ctx.opponent_profiles.get(&v.seat))
        .cloned()
        .unwrap_or_else(OpponentProfile::default_tag)
}

/// A zero aggression sample means "no data"; treat it as neutral.
fn aggression_or_neutral(profile: &OpponentProfile) -> f64 {
    if profile.agg == 0.0 {
        1.0
    } else {
        profile.agg
    }
}

fn range_position(role: Role) -> RangePosition {
    match role {
        Role::SmallBlind | Role::Button => RangePosition::Button,
        _ => RangePosition::BigBlind,
    }
}

/// Replace illegal proposals and clamp raise targets into the legal window.
/// Idempotent.
pub fn sanitize(ctx: &DecisionContext, decision: Decision) -> Decision {
    let (action, amount) = if ctx.legal_actions.contains(&decision.action) {
        (decision.action, decision.amount)
    } else if ctx.legal_actions.contains(&Action::Check) {
        (Action::Check, None)
    } else if ctx.legal_actions.contains(&Action::Call) {
        (Action::Call, None)
    } else {
        (
            ctx.legal_actions.first().copied().unwrap_or(Action::Fold),
            None,
        )
    };

    if action != Action::RaiseTo {
        return Decision::new(action, amount);
    }

    let mut target = amount
        .filter(|&a| a > 0)
        .or(ctx.min_raise_to)
        .unwrap_or(ctx.call_amount + ctx.min_raise_increment);
    if let Some(min) = ctx.min_raise_to {
        target = target.max(min);
    }
    if let Some(max) = ctx.max_raise_to {
        target = target.min(max);
    }
    Decision::new(Action::RaiseTo, Some(target))
}

/// Heuristic action selection with Monte-Carlo refinement on big decisions.
#[derive(Debug)]
pub struct DecisionEngine {
    rng: StdRng,
    search: MonteCarloActionSearch,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic engine for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            search: MonteCarloActionSearch::new(),
        }
    }

    pub fn decide(&mut self, ctx: &DecisionContext) -> Decision {
        let proposed = if ctx.street == Street::PreFlop {
            self.preflop(ctx)
        } else {
            self.postflop(ctx)
        };
        let mut result = sanitize(ctx, proposed);
        if self.should_search(ctx, &result) {
            result = sanitize(ctx, self.search.refine(ctx, result));
        }
        sanitize(ctx, result)
    }

    // ------------------------------------------------------------------
    // Preflop
    // ------------------------------------------------------------------

    fn preflop(&mut self, ctx: &DecisionContext) -> Decision {
        let hero_combo = Combo::from_hole(&ctx.hole);
        let profile = villain_profile(ctx);
        let eff_bb = ctx.effective_bb;
        if eff_bb <= 12.0 {
            return self.short_stack_plan(ctx, hero_combo, eff_bb);
        }
        if ctx.call_amount == 0 {
            return self.open_uncontested(ctx, hero_combo, eff_bb, &profile);
        }
        self.vs_raise(ctx, hero_combo, &profile)
    }

    fn short_stack_plan(
        &mut self,
        ctx: &DecisionContext,
        hero_combo: Option<Combo>,
        eff_bb: f64,
    ) -> Decision {
        let shove_range = push_range(range_position(ctx.hero_role), eff_bb);
        let strength = preflop_strength(&ctx.hole);

        if let Some(combo) = hero_combo {
            if shove_range.contains(&combo) && ctx.legal_actions.contains(&Action::RaiseTo) {
                let amount = ctx
                    .max_raise_to
                    .unwrap_or(ctx.hero_stack + ctx.hero_committed);
                return Decision::new(Action::RaiseTo, Some(amount));
            }
        }

        if ctx.call_amount > 0 {
            if (strength >= 0.62 || ctx.equity_vs_range > 0.55)
                && ctx.legal_actions.contains(&Action::Call)
                && ctx.call_amount <= ctx.hero_stack
            {
                return Decision::new(Action::Call, None);
            }
            return Decision::new(Action::Fold, None);
        }

        if ctx.legal_actions.contains(&Action::Check) {
            return Decision::new(Action::Check, None);
        }
        Decision::new(Action::Fold, None)
    }

    fn open_uncontested(
        &mut self,
        ctx: &DecisionContext,
        hero_combo: Option<Combo>,
        eff_bb: f64,
        profile: &OpponentProfile,
    ) -> Decision {
        let range = opening_range(range_position(ctx.hero_role), eff_bb);
        let mut should_open = hero_combo.is_some_and(|c| range.contains(&c));
        if !should_open
            && matches!(
                profile.classification,
                Classification::Lag | Classification::Maniac
            )
        {
            // Mix in occasional steals against loose opposition.
            should_open = self.rng.gen::<f64>() < 0.15;
        }

        if should_open && ctx.legal_actions.contains(&Action::RaiseTo) {
            let base = if eff_bb > 25.0 { 2.5 } else { 2.2 };
            let mut target = ctx
                .min_raise_to
                .unwrap_or((ctx.table.bb as f64 * base) as u32);
            if let Some(max) = ctx.max_raise_to {
                target = target.min(max);
            }
            return Decision::new(Action::RaiseTo, Some(target));
        }
        if ctx.legal_actions.contains(&Action::Check) {
            return Decision::new(Action::Check, None);
        }
        Decision::new(Action::Call, None)
    }

    fn vs_raise(
        &mut self,
        ctx: &DecisionContext,
        hero_combo: Option<Combo>,
        profile: &OpponentProfile,
    ) -> Decision {
        let Some(combo) = hero_combo else {
            return Decision::new(Action::Fold, None);
        };
        let position = range_position(ctx.hero_role);
        let three_bet = three_bet_range(position);
        let opening = opening_range(position, ctx.effective_bb);
        let aggression = aggression_or_neutral(profile);
        let strength = preflop_strength(&ctx.hole);
        let bb = ctx.table.bb as f64;
        let call = ctx.call_amount as f64;

        if three_bet.contains(&combo) && ctx.legal_actions.contains(&Action::RaiseTo) {
            let cap = ctx.max_raise_to.map(|m| m as f64).unwrap_or(
                call + bb * if ctx.effective_bb > 40.0 { 3.0 } else { 2.2 },
            );
            let target = call + bb * if ctx.effective_bb > 60.0 { 3.5 } else { 2.5 };
            return Decision::new(Action::RaiseTo, Some(cap.min(target) as u32));
        }

        let call_threshold = if aggression > 1.2 { 0.48 } else { 0.52 };
        let defends = opening.contains(&combo) || three_bet.contains(&combo);
        if ctx.legal_actions.contains(&Action::Call) && (defends || strength >= call_threshold)
        {
            return Decision::new(Action::Call, None);
        }

        if ctx.legal_actions.contains(&Action::RaiseTo)
            && call / ctx.effective_stack.max(1) as f64 > 0.45
            && strength >= 0.7
        {
            let amount = ctx
                .max_raise_to
                .unwrap_or(ctx.hero_stack + ctx.hero_committed);
            return Decision::new(Action::RaiseTo, Some(amount));
        }

        if ctx.legal_actions.contains(&Action::Fold) {
            return Decision::new(Action::Fold, None);
        }
        Decision::new(Action::Check, None)
    }

    // ------------------------------------------------------------------
    // Postflop
    // ------------------------------------------------------------------

    fn postflop(&mut self, ctx: &DecisionContext) -> Decision {
        let value = ctx.hand_strength.normalized();
        let profile = villain_profile(ctx);
        let aggression = aggression_or_neutral(&profile);
        let draw_equity = (ctx.draws.outs as f64 / 18.0).min(1.0);
        let board_pressure: f64 = match ctx.board_texture.label {
            TextureLabel::Wet => 0.12,
            _ => -0.05,
        };
        let bet_size = self.bet_size(ctx, value);

        if ctx.call_amount == 0 {
            let can_bet = ctx.legal_actions.contains(&Action::Bet);
            if value >= 0.78 && can_bet {
                return Decision::new(Action::Bet, Some(bet_size));
            }
            if draw_equity >= 0.5 && can_bet {
                let amount = bet_size.max(ctx.min_raise_to.unwrap_or(bet_size));
                return Decision::new(Action::Bet, Some(amount));
            }
            if value >= 0.65 && self.rng.gen::<f64>() < 0.4 && can_bet {
                return Decision::new(Action::Bet, Some(bet_size));
            }
            if ctx.legal_actions.contains(&Action::Check) {
                return Decision::new(Action::Check, None);
            }
            return Decision::new(Action::Call, None);
        }

        if ctx.legal_actions.contains(&Action::RaiseTo) && value >= 0.9 {
            return Decision::new(Action::RaiseTo, Some(bet_size));
        }

        let call_threshold =
            (0.44 + board_pressure - if aggression > 1.2 { 0.05 } else { 0.0 }).max(0.32);
        if (value >= call_threshold || draw_equity >= 0.55 || ctx.equity_vs_range >= 0.55)
            && ctx.legal_actions.contains(&Action::Call)
        {
            return Decision::new(Action::Call, None);
        }

        if self.should_check_raise(ctx, aggression, value, draw_equity) {
            return Decision::new(Action::RaiseTo, Some(bet_size));
        }

        if self.bluff_spot(ctx, aggression) && ctx.legal_actions.contains(&Action::RaiseTo) {
            return Decision::new(Action::RaiseTo, Some(bet_size));
        }

        if ctx.legal_actions.contains(&Action::Fold) {
            return Decision::new(Action::Fold, None);
        }
        Decision::new(Action::Call, None)
    }

    /// Pot-fraction sizing by street, hand value, and stack-to-pot ratio,
    /// adjusted for draws, texture, and villain aggression.
    fn bet_size(&self, ctx: &DecisionContext, value: f64) -> u32 {
        let pot = ctx.pot as f64;
        let spr = ctx.effective_stack as f64 / ctx.pot.max(1) as f64;

        let mut multiplier = match ctx.street {
            Street::Flop => {
                if value >= 0.9 {
                    1.2f64.min(spr * 0.8)
                } else if value >= 0.8 {
                    0.75
                } else {
                    0.5
                }
            }
            Street::Turn => {
                if value >= 0.92 {
                    1.0f64.min(spr * 0.6)
                } else if value >= 0.85 {
                    0.8
                } else {
                    0.55
                }
            }
            _ => {
                if value >= 0.95 {
                    0.9f64.min(spr * 0.5)
                } else if value >= 0.88 {
                    0.75
                } else {
                    0.6
                }
            }
        };

        if ctx.draws.flush_draw || ctx.draws.straight_draw {
            let draw_equity = (ctx.draws.outs as f64 / 18.0).min(1.0);
            multiplier = multiplier.max(0.5 + draw_equity * 0.3);
        }

        match ctx.board_texture.label {
            TextureLabel::Wet => multiplier += 0.15,
            TextureLabel::Dry => multiplier -= 0.10,
            TextureLabel::Empty => {}
        }

        let profile = villain_profile(ctx);
        let aggression = aggression_or_neutral(&profile);
        if aggression > 1.3 {
            multiplier *= 1.1;
        } else if aggression < 0.8 {
            multiplier *= 0.9;
        }

        let bb = ctx.table.bb;
        let increment = if ctx.min_raise_increment == 0 {
            bb
        } else {
            ctx.min_raise_increment
        };
        let min_total = ctx
            .min_raise_to
            .unwrap_or(ctx.call_amount + increment.max(bb));

        let mut amount = (pot * multiplier) as u32;
        amount = amount.max(min_total);
        if let Some(max) = ctx.max_raise_to {
            amount = amount.min(max);
        }
        amount.max(ctx.call_amount + ctx.min_raise_increment.max(bb))
    }

    /// Bluff-raise frequency from board texture, villain tendencies,
    /// position, stack pressure, and street, clamped to [0.05, 0.60].
    fn bluff_spot(&mut self, ctx: &DecisionContext, aggression: f64) -> bool {
        let board_bonus: f64 = match ctx.board_texture.label {
            TextureLabel::Dry => 0.25,
            TextureLabel::Wet => -0.10,
            TextureLabel::Empty => 0.0,
        };

        let opp_bonus = if aggression > 1.5 {
            0.20
        } else if aggression < 0.7 {
            0.15
        } else {
            0.0
        };

        let position_bonus = if ctx.position == Position::InPosition {
            0.10
        } else {
            0.0
        };
        let stack_pressure = if ctx.effective_bb < 15.0 { 0.10 } else { 0.0 };

        let street_bonus = match ctx.street {
            Street::Flop => 0.05,
            Street::Turn => 0.10,
            Street::River => 0.15,
            _ => 0.0,
        };

        let frequency = (0.12 + board_bonus + opp_bonus + position_bonus + stack_pressure
            + street_bonus)
            .clamp(0.05, 0.60);
        self.rng.gen::<f64>() < frequency
    }

    fn should_check_raise(
        &self,
        ctx: &DecisionContext,
        aggression: f64,
        value: f64,
        draw_equity: f64,
    ) -> bool {
        if !ctx.legal_actions.contains(&Action::RaiseTo) {
            return false;
        }
        if value >= 0.75 {
            return true;
        }
        if draw_equity >= 0.55 && aggression > 1.1 {
            return true;
        }
        ctx.pot as f64 / ctx.effective_stack.max(1) as f64 > 0.45 && value >= 0.6
    }

    // ------------------------------------------------------------------
    // Search integration
    // ------------------------------------------------------------------

    fn should_search(&self, ctx: &DecisionContext, result: &Decision) -> bool {
        if ctx.time_ms < 300 {
            return false;
        }
        let big_pot = ctx.table.bb * 20;
        if matches!(ctx.street, Street::Turn | Street::River) && ctx.pot > big_pot {
            return true;
        }
        result.action == Action::RaiseTo && ctx.max_raise_to.unwrap_or(0) > big_pot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::sample_context;
    use crate::poker::card::Card;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|l| Card::parse(l).unwrap()).collect()
    }

    fn with_hole(ctx: &mut DecisionContext, hole: &str, community: &str) {
        ctx.hole = cards(hole);
        ctx.community = cards(community);
        ctx.board_texture = crate::analysis::classify_board(&ctx.community);
        ctx.draws = crate::analysis::detect_draws(&ctx.hole, &ctx.community);
        ctx.hand_strength = crate::analysis::evaluate_hand(&ctx.hole, &ctx.community);
    }

    #[test]
    fn short_stack_shoves_premium_suited() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "As Ks", "");
        ctx.call_amount = 50;
        ctx.max_raise_to = Some(1050);
        ctx.min_raise_to = Some(200);
        ctx.effective_stack = 1050;
        ctx.effective_bb = 10.5;
        ctx.hero_stack = 1000;
        ctx.hero_committed = 50;
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::RaiseTo);
        assert_eq!(decision.amount, Some(1050));
    }

    #[test]
    fn short_stack_folds_trash_facing_a_bet() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "7c 2d", "");
        ctx.call_amount = 300;
        ctx.max_raise_to = Some(1000);
        ctx.effective_stack = 1000;
        ctx.effective_bb = 10.0;
        ctx.equity_vs_range = 0.3;
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::Fold);
    }

    #[test]
    fn opens_suited_connectors_on_the_button() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "7h 6h", "");
        ctx.call_amount = 0;
        ctx.effective_stack = 10_000;
        ctx.effective_bb = 100.0;
        ctx.min_raise_to = None;
        ctx.max_raise_to = Some(10_000);
        ctx.legal_actions = vec![Action::Fold, Action::Check, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::RaiseTo);
        // No min_raise_to: 2.5bb open at 100bb deep.
        assert_eq!(decision.amount, Some(250));
    }

    #[test]
    fn open_respects_min_raise_to() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "7h 6h", "");
        ctx.call_amount = 0;
        ctx.effective_stack = 10_000;
        ctx.effective_bb = 100.0;
        ctx.min_raise_to = Some(300);
        ctx.max_raise_to = Some(10_000);
        ctx.legal_actions = vec![Action::Fold, Action::Check, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision, Decision::new(Action::RaiseTo, Some(300)));
    }

    #[test]
    fn folds_trash_facing_a_raise_deep() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "7c 2d", "");
        ctx.call_amount = 200;
        ctx.effective_stack = 10_000;
        ctx.effective_bb = 100.0;
        ctx.equity_vs_range = 0.3;
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::Fold);
    }

    #[test]
    fn three_bets_premiums_facing_a_raise() {
        let mut ctx = sample_context();
        with_hole(&mut ctx, "As Ah", "");
        ctx.call_amount = 250;
        ctx.effective_stack = 10_000;
        ctx.effective_bb = 100.0;
        ctx.min_raise_to = Some(400);
        ctx.max_raise_to = Some(10_000);
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::RaiseTo);
        // call + 3.5bb, capped by neither bound here, floored at min_raise_to.
        assert_eq!(decision.amount, Some(600));
    }

    #[test]
    fn semi_bluffs_a_big_draw_when_checked_to() {
        let mut ctx = sample_context();
        ctx.street = Street::Flop;
        with_hole(&mut ctx, "Ah Qh", "2h 7h 9s");
        ctx.call_amount = 0;
        ctx.pot = 400;
        ctx.min_raise_to = Some(100);
        ctx.max_raise_to = Some(2_000);
        ctx.effective_stack = 2_000;
        ctx.effective_bb = 20.0;
        ctx.legal_actions = vec![Action::Check, Action::Bet];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::Bet);
        assert!(decision.amount.unwrap() >= 100);
    }

    #[test]
    fn value_bets_a_monster_when_checked_to() {
        let mut ctx = sample_context();
        ctx.street = Street::Flop;
        // Straight flush: value comfortably over the 0.78 bet threshold.
        with_hole(&mut ctx, "9s 8s", "7s 6s 5s");
        ctx.call_amount = 0;
        ctx.pot = 400;
        ctx.min_raise_to = Some(100);
        ctx.max_raise_to = Some(2_000);
        ctx.effective_stack = 2_000;
        ctx.effective_bb = 20.0;
        ctx.legal_actions = vec![Action::Check, Action::Bet];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::Bet);
        let amount = decision.amount.unwrap() as f64;
        assert!(amount >= 400.0 * 0.7 && amount <= 400.0 * 1.1, "amount {amount}");
    }

    #[test]
    fn calls_with_a_made_flush_facing_a_bet() {
        let mut ctx = sample_context();
        ctx.street = Street::Turn;
        with_hole(&mut ctx, "Ah Qh", "2h 7h 9s Kh");
        ctx.call_amount = 200;
        ctx.pot = 400;
        ctx.min_raise_to = Some(600);
        ctx.max_raise_to = Some(2_000);
        ctx.effective_stack = 2_000;
        ctx.effective_bb = 20.0;
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::Call);
    }

    #[test]
    fn check_raises_strong_hands_when_calling_is_impossible() {
        let mut ctx = sample_context();
        ctx.street = Street::Flop;
        // Flopped straight flush, but only fold or raise are on offer.
        with_hole(&mut ctx, "9h 8h", "7h 6h 5h");
        ctx.call_amount = 200;
        ctx.pot = 400;
        ctx.min_raise_to = Some(600);
        ctx.max_raise_to = Some(2_000);
        ctx.effective_stack = 2_000;
        ctx.effective_bb = 20.0;
        ctx.legal_actions = vec![Action::Fold, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(1).decide(&ctx);
        assert_eq!(decision.action, Action::RaiseTo);
        let amount = decision.amount.unwrap();
        assert!((600..=2_000).contains(&amount));
    }

    #[test]
    fn bluffs_are_mixed_not_constant() {
        // A high-frequency bluff spot: dry river, in position, short.
        let mut fold_seen = false;
        let mut raise_seen = false;
        for seed in 0..60 {
            let mut ctx = sample_context();
            ctx.street = Street::River;
            with_hole(&mut ctx, "Jc 6d", "Ah Kd 8c 3s 2d");
            ctx.call_amount = 300;
            ctx.pot = 600;
            ctx.min_raise_to = Some(900);
            ctx.max_raise_to = Some(1_500);
            ctx.effective_stack = 1_400;
            ctx.effective_bb = 14.0;
            ctx.position = Position::InPosition;
            ctx.equity_vs_range = 0.2;
            ctx.time_ms = 100;
            ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

            match DecisionEngine::with_seed(seed).decide(&ctx).action {
                Action::Fold => fold_seen = true,
                Action::RaiseTo => raise_seen = true,
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert!(fold_seen, "bluff frequency should stay below 100%");
        assert!(raise_seen, "bluffs should fire sometimes");
    }

    #[test]
    fn search_refinement_keeps_the_action_legal() {
        let mut ctx = sample_context();
        ctx.street = Street::Turn;
        with_hole(&mut ctx, "Ah Qh", "2h 7h 9s Kd");
        ctx.call_amount = 0;
        ctx.pot = 5_000; // 50bb: qualifies for search
        ctx.time_ms = 1_000;
        ctx.min_raise_to = Some(600);
        ctx.max_raise_to = Some(2_500);
        ctx.effective_stack = 2_500;
        ctx.effective_bb = 25.0;
        ctx.equity_vs_range = 0.6;
        ctx.legal_actions = vec![Action::Check, Action::Bet, Action::RaiseTo];

        let decision = DecisionEngine::with_seed(3).decide(&ctx);
        assert!(ctx.legal_actions.contains(&decision.action));
        if decision.action == Action::RaiseTo {
            let amount = decision.amount.unwrap();
            assert!((600..=2_500).contains(&amount));
        }
    }

    #[test]
    fn sanitize_replaces_illegal_actions() {
        let mut ctx = sample_context();
        ctx.legal_actions = vec![Action::Check, Action::Call];
        let decision = sanitize(&ctx, Decision::new(Action::RaiseTo, Some(500)));
        assert_eq!(decision, Decision::new(Action::Check, None));

        ctx.legal_actions = vec![Action::Call];
        let decision = sanitize(&ctx, Decision::new(Action::Bet, Some(100)));
        assert_eq!(decision, Decision::new(Action::Call, None));
    }

    #[test]
    fn sanitize_clamps_raise_targets() {
        let mut ctx = sample_context();
        ctx.legal_actions = vec![Action::RaiseTo];
        ctx.min_raise_to = Some(400);
        ctx.max_raise_to = Some(900);

        let low = sanitize(&ctx, Decision::new(Action::RaiseTo, Some(100)));
        assert_eq!(low.amount, Some(400));
        let high = sanitize(&ctx, Decision::new(Action::RaiseTo, Some(5_000)));
        assert_eq!(high.amount, Some(900));
        let missing = sanitize(&ctx, Decision::new(Action::RaiseTo, None));
        assert_eq!(missing.amount, Some(400));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let mut ctx = sample_context();
        ctx.legal_actions = vec![Action::RaiseTo];
        ctx.min_raise_to = Some(400);
        ctx.max_raise_to = Some(900);

        for proposal in [
            Decision::new(Action::Check, None),
            Decision::new(Action::RaiseTo, Some(50)),
            Decision::new(Action::Fold, None),
        ] {
            let once = sanitize(&ctx, proposal);
            let twice = sanitize(&ctx, once);
            assert_eq!(once, twice);
        }
    }
}

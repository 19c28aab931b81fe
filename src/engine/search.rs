//! Monte-Carlo action refinement.
//!
//! A depth-1 UCB1 search over a small candidate action set. There is no tree
//! expansion and no rollout: each simulation scores the candidate with a
//! closed-form expected value built from range equity, pot geometry, and a
//! fold-probability model of the villain. The loop is wall-clock budgeted
//! against the decision deadline.

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::analysis::TextureLabel;
use crate::engine::context::DecisionContext;
use crate::engine::decision::Decision;
use crate::protocol::Action;

#[derive(Debug, Clone, Copy)]
struct ActionNode {
    action: Action,
    amount: Option<u32>,
    value_sum: f64,
    visits: u32,
}

impl ActionNode {
    fn new(action: Action, amount: Option<u32>) -> Self {
        Self {
            action,
            amount,
            value_sum: 0.0,
            visits: 0,
        }
    }

    fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.value_sum / self.visits as f64
    }
}

/// UCB1 refinement over candidate actions under a time budget.
#[derive(Debug)]
pub struct MonteCarloActionSearch {
    max_iterations: u32,
    exploration: f64,
}

impl Default for MonteCarloActionSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MonteCarloActionSearch {
    pub fn new() -> Self {
        Self {
            max_iterations: 800,
            exploration: 1.2,
        }
    }

    /// Re-evaluate the seed decision against the candidate set and return
    /// the best-scoring action.
    pub fn refine(&self, ctx: &DecisionContext, seed: Decision) -> Decision {
        let candidates = Self::candidate_actions(ctx, seed);
        if candidates.len() <= 1 {
            return seed;
        }

        let mut nodes: Vec<ActionNode> = candidates
            .into_iter()
            .map(|(action, amount)| ActionNode::new(action, amount))
            .collect();

        let start = Instant::now();
        let budget = Duration::from_secs_f64(
            ((ctx.time_ms as f64 - 200.0) / 1000.0).max(0.15),
        );
        let mut iteration = 0;
        while iteration < self.max_iterations && start.elapsed() < budget {
            let chosen = self.select(&nodes);
            let reward = Self::simulate(ctx, nodes[chosen].action, nodes[chosen].amount);
            nodes[chosen].visits += 1;
            nodes[chosen].value_sum += reward;
            iteration += 1;
        }

        let best = nodes
            .iter()
            .max_by(|a, b| {
                a.mean_value()
                    .partial_cmp(&b.mean_value())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
            .unwrap_or(ActionNode::new(seed.action, seed.amount));
        Decision::new(best.action, best.amount)
    }

    /// UCB1 selection; unvisited nodes first.
    fn select(&self, nodes: &[ActionNode]) -> usize {
        let total_visits: u32 = nodes.iter().map(|n| n.visits).sum();
        let ln_total = ((total_visits + 1) as f64).ln();

        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (index, node) in nodes.iter().enumerate() {
            if node.visits == 0 {
                return index;
            }
            let explore = (ln_total / node.visits as f64).sqrt();
            let score = node.mean_value() + self.exploration * explore;
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }
        best_index
    }

    /// The seed action, the legal passive actions, and a few raise targets.
    fn candidate_actions(
        ctx: &DecisionContext,
        seed: Decision,
    ) -> Vec<(Action, Option<u32>)> {
        let mut seen: FxHashSet<(Action, Option<u32>)> = FxHashSet::default();
        let mut options: Vec<(Action, Option<u32>)> = Vec::new();
        let mut push = |seen: &mut FxHashSet<(Action, Option<u32>)>,
                        options: &mut Vec<(Action, Option<u32>)>,
                        action: Action,
                        amount: Option<u32>| {
            if seen.insert((action, amount)) {
                options.push((action, amount));
            }
        };

        push(&mut seen, &mut options, seed.action, seed.amount);
        for action in [Action::Fold, Action::Call, Action::Check] {
            if ctx.legal_actions.contains(&action) {
                push(&mut seen, &mut options, action, None);
            }
        }
        if ctx.legal_actions.contains(&Action::RaiseTo) {
            let pot_size = ctx.pot + ctx.call_amount + ctx.table.bb;
            let targets = [
                ctx.min_raise_to,
                Some(ctx.max_raise_to.unwrap_or(pot_size).min(pot_size)),
                ctx.max_raise_to,
            ];
            for target in targets.into_iter().flatten() {
                if target > 0 {
                    push(&mut seen, &mut options, Action::RaiseTo, Some(target));
                }
            }
        }
        options
    }

    /// Closed-form reward for a candidate action.
    fn simulate(ctx: &DecisionContext, action: Action, amount: Option<u32>) -> f64 {
        let equity = ctx.equity_vs_range;
        let pot = ctx.pot as f64;
        let call = ctx.call_amount as f64;

        match action {
            Action::Fold => -call,
            Action::Check | Action::Call if ctx.call_amount == 0 => equity * pot,
            Action::Call => equity * (pot + call) - (1.0 - equity) * call,
            // A check while a bet is outstanding is not a legal line; score
            // it pessimistically.
            Action::Check => equity * pot * 0.8,
            Action::RaiseTo => {
                let target = amount
                    .filter(|&a| a > 0)
                    .or(ctx.min_raise_to)
                    .unwrap_or(ctx.call_amount);
                let hero_invest = target.saturating_sub(ctx.hero_committed) as f64;
                let villain_commit = ctx
                    .opponents
                    .first()
                    .map(|villain| {
                        target
                            .saturating_sub(villain.committed)
                            .min(villain.stack + villain.committed)
                            as f64
                    })
                    .unwrap_or(0.0);

                let fold_prob = Self::fold_probability(ctx);
                let pot_if_called = pot + hero_invest + villain_commit;
                let showdown_ev = equity * pot_if_called - (1.0 - equity) * hero_invest;
                fold_prob * pot + (1.0 - fold_prob) * showdown_ev
            }
            Action::Bet => 0.0,
        }
    }

    /// Chance the villain folds to a raise, from VPIP, aggression, and board
    /// texture.
    fn fold_probability(ctx: &DecisionContext) -> f64 {
        let Some(villain) = ctx.opponents.first() else {
            return 0.3;
        };
        let profile = ctx.opponent_profiles.get(&villain.seat);
        let vpip = profile.map_or(0.3, |p| p.vpip);
        let agg = profile.map_or(1.0, |p| p.agg);
        let texture_bonus = if ctx.board_texture.label == TextureLabel::Dry {
            0.1
        } else {
            -0.05
        };
        ((0.6 - vpip) + 0.4 / (agg + 0.5) + texture_bonus).clamp(0.05, 0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::sample_context;

    #[test]
    fn candidates_cover_passive_actions_and_raise_targets() {
        let mut ctx = sample_context();
        ctx.pot = 1_000;
        ctx.call_amount = 200;
        ctx.min_raise_to = Some(400);
        ctx.max_raise_to = Some(3_000);
        ctx.legal_actions = vec![Action::Fold, Action::Call, Action::RaiseTo];

        let seed = Decision::new(Action::Call, None);
        let candidates = MonteCarloActionSearch::candidate_actions(&ctx, seed);

        assert!(candidates.contains(&(Action::Fold, None)));
        assert!(candidates.contains(&(Action::Call, None)));
        assert!(candidates.contains(&(Action::RaiseTo, Some(400))));
        // pot + call + bb = 1300, below the cap.
        assert!(candidates.contains(&(Action::RaiseTo, Some(1_300))));
        assert!(candidates.contains(&(Action::RaiseTo, Some(3_000))));
        // No duplicates.
        let unique: FxHashSet<_> = candidates.iter().collect();
        assert_eq!(unique.len(), candidates.len());
    }

    #[test]
    fn simulate_rewards_match_the_closed_forms() {
        let mut ctx = sample_context();
        ctx.pot = 1_000;
        ctx.call_amount = 200;
        ctx.equity_vs_range = 0.6;

        let fold = MonteCarloActionSearch::simulate(&ctx, Action::Fold, None);
        assert_eq!(fold, -200.0);

        let call = MonteCarloActionSearch::simulate(&ctx, Action::Call, None);
        assert!((call - (0.6 * 1_200.0 - 0.4 * 200.0)).abs() < 1e-9);

        ctx.call_amount = 0;
        let check = MonteCarloActionSearch::simulate(&ctx, Action::Check, None);
        assert!((check - 0.6 * 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn refine_with_a_single_candidate_returns_the_seed() {
        let mut ctx = sample_context();
        ctx.legal_actions = vec![Action::Check];
        ctx.call_amount = 0;
        let seed = Decision::new(Action::Check, None);
        let refined = MonteCarloActionSearch::new().refine(&ctx, seed);
        assert_eq!(refined, seed);
    }

    #[test]
    fn refine_prefers_not_folding_with_strong_equity() {
        let mut ctx = sample_context();
        ctx.pot = 2_000;
        ctx.call_amount = 500;
        ctx.equity_vs_range = 0.8;
        ctx.time_ms = 1_000;
        ctx.legal_actions = vec![Action::Fold, Action::Call];

        let refined =
            MonteCarloActionSearch::new().refine(&ctx, Decision::new(Action::Fold, None));
        assert_eq!(refined.action, Action::Call);
    }

    #[test]
    fn refine_returns_one_of_the_candidates() {
        let mut ctx = sample_context();
        ctx.pot = 3_000;
        ctx.call_amount = 0;
        ctx.equity_vs_range = 0.55;
        ctx.time_ms = 600;
        ctx.min_raise_to = Some(400);
        ctx.max_raise_to = Some(5_000);
        ctx.legal_actions = vec![Action::Check, Action::RaiseTo];

        let seed = Decision::new(Action::Check, None);
        let candidates = MonteCarloActionSearch::candidate_actions(&ctx, seed);
        let refined = MonteCarloActionSearch::new().refine(&ctx, seed);
        assert!(candidates.contains(&(refined.action, refined.amount)));
    }
}

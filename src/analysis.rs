//! Analytic primitives feeding the decision engine.
//!
//! Hand strength, draw detection, board texture, pot and implied odds, and a
//! Monte-Carlo equity estimate against an opponent range. Everything here is
//! pure except the equity simulation, which samples through a caller-provided
//! RNG so tests can pin the sequence.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::poker::card::{Card, Deck};
use crate::poker::hand_eval::{evaluate_best, HandStrength};
use crate::poker::range::Combo;

/// Number of Monte-Carlo trials used when the caller does not choose one.
pub const DEFAULT_EQUITY_TRIALS: usize = 400;

/// Draw features over hole + community cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawFeatures {
    /// Four or more cards of one suit.
    pub flush_draw: bool,
    /// Four connected ranks in a four-card window.
    pub straight_draw: bool,
    /// Exactly three of one suit, and no flush draw.
    pub backdoor_flush: bool,
    /// Three connected ranks, and no straight draw.
    pub backdoor_straight: bool,
    /// Flush draw and straight draw together.
    pub combo_draw: bool,
    /// Rough outs: 9 per flush draw (4 backdoor), 8 per straight draw
    /// (4 backdoor).
    pub outs: u8,
}

/// Coarse board wetness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureLabel {
    Empty,
    Dry,
    Wet,
}

/// Board texture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTexture {
    pub label: TextureLabel,
    pub paired: bool,
    /// All board cards share one suit.
    pub monotone: bool,
    /// Five connected ranks on board, wheel included.
    pub straight_possible: bool,
    /// Highest board rank value, absent on an empty board.
    pub high_card: Option<u8>,
}

/// Heuristic preflop hand strength in [0, 1].
///
/// `0.6·H/14 + 0.3·L/14 + 0.2·pair + 0.05·suited − 0.02·gap` where H, L are
/// the high/low rank values and `gap = |H−L| − 1`. Anything other than two
/// cards scores 0.
pub fn preflop_strength(hole: &[Card]) -> f64 {
    let [a, b] = hole else {
        return 0.0;
    };
    let high = a.rank_value().max(b.rank_value()) as f64;
    let low = a.rank_value().min(b.rank_value()) as f64;
    let gap = (high - low) - 1.0;

    let mut strength = high / 14.0 * 0.6 + low / 14.0 * 0.3;
    if a.rank() == b.rank() {
        strength += 0.2;
    }
    if a.suit() == b.suit() {
        strength += 0.05;
    }
    strength -= gap * 0.02;
    strength.clamp(0.0, 1.0)
}

/// The strongest `ceil(n·fraction)` combos (at least one) by preflop
/// strength, descending.
pub fn select_top_fraction(combos: &[Combo], fraction: f64) -> Vec<Combo> {
    let mut sorted: Vec<Combo> = combos.to_vec();
    sorted.sort_by(|a, b| {
        preflop_strength(&b.cards())
            .partial_cmp(&preflop_strength(&a.cards()))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let count = ((sorted.len() as f64 * fraction).ceil() as usize).max(1);
    sorted.truncate(count);
    sorted
}

/// Best-hand classification over hole + community; Partial when fewer than
/// five cards are known.
pub fn evaluate_hand(hole: &[Card], community: &[Card]) -> HandStrength {
    let cards: Vec<Card> = hole.iter().chain(community).copied().collect();
    evaluate_best(&cards)
}

fn distinct_rank_values(cards: &[Card]) -> Vec<u8> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank_value()).collect();
    values.sort_unstable();
    values.dedup();
    values
}

fn has_run(values: &[u8], length: usize) -> bool {
    values
        .windows(length)
        .any(|w| w[length - 1] - w[0] == (length - 1) as u8)
}

/// Detect flush and straight draws over hole + community cards.
pub fn detect_draws(hole: &[Card], community: &[Card]) -> DrawFeatures {
    let cards: Vec<Card> = hole.iter().chain(community).copied().collect();

    let mut suit_counts = [0u8; 4];
    for card in &cards {
        suit_counts[card.suit() as usize] += 1;
    }
    let flush_draw = suit_counts.iter().any(|&c| c >= 4);
    let backdoor_flush = !flush_draw && suit_counts.iter().any(|&c| c == 3);

    let values = distinct_rank_values(&cards);
    let straight_draw = has_run(&values, 4);
    let backdoor_straight = !straight_draw && has_run(&values, 3);

    let mut outs = 0;
    if flush_draw {
        outs += 9;
    } else if backdoor_flush {
        outs += 4;
    }
    if straight_draw {
        outs += 8;
    } else if backdoor_straight {
        outs += 4;
    }

    DrawFeatures {
        flush_draw,
        straight_draw,
        backdoor_flush,
        backdoor_straight,
        combo_draw: flush_draw && straight_draw,
        outs,
    }
}

/// Classify the community cards. `Wet` iff a straight is possible, the board
/// is monotone, or it is paired.
pub fn classify_board(community: &[Card]) -> BoardTexture {
    if community.is_empty() {
        return BoardTexture {
            label: TextureLabel::Empty,
            paired: false,
            monotone: false,
            straight_possible: false,
            high_card: None,
        };
    }

    let first_suit = community[0].suit();
    let monotone = community.iter().all(|c| c.suit() == first_suit);

    let values = distinct_rank_values(community);
    let paired = values.len() != community.len();
    let wheel = [14, 2, 3, 4, 5].iter().all(|v| values.contains(v));
    let straight_possible = has_run(&values, 5) || wheel;

    let high_card = community.iter().map(|c| c.rank_value()).max();
    let label = if straight_possible || monotone || paired {
        TextureLabel::Wet
    } else {
        TextureLabel::Dry
    };

    BoardTexture {
        label,
        paired,
        monotone,
        straight_possible,
        high_card,
    }
}

/// Price of a call: `call / (pot + call)`, 0 when there is nothing to call.
pub fn pot_odds(call_amount: u32, pot: u32) -> f64 {
    if call_amount == 0 {
        return 0.0;
    }
    call_amount as f64 / (pot + call_amount).max(1) as f64
}

/// Call price against a future pot capped at `min(4·call, effective_stack)`.
pub fn implied_odds(call_amount: u32, pot: u32, effective_stack: u32) -> f64 {
    if call_amount == 0 {
        return 0.0;
    }
    let future = pot + (call_amount.saturating_mul(4)).min(effective_stack);
    call_amount as f64 / future.max(1) as f64
}

/// Monte-Carlo equity of `hole` against `opponent_range` on `community`.
///
/// Each trial samples one villain combo uniformly (two random remaining
/// cards when the range is empty), deals a random runout to five cards, and
/// scores win = 1, tie = 0.5. Returns 0 when `trials` is 0.
pub fn estimate_equity_vs_range<R: Rng>(
    hole: &[Card],
    community: &[Card],
    opponent_range: &[Combo],
    trials: usize,
    rng: &mut R,
) -> f64 {
    if trials == 0 {
        return 0.0;
    }

    let dead: Vec<Card> = hole.iter().chain(community).copied().collect();
    let deck = Deck::without(&dead);
    let mut score = 0.0;

    for _ in 0..trials {
        let villain: [Card; 2] = if opponent_range.is_empty() {
            let sampled: Vec<Card> = deck
                .cards()
                .choose_multiple(rng, 2)
                .copied()
                .collect();
            [sampled[0], sampled[1]]
        } else {
            opponent_range[rng.gen_range(0..opponent_range.len())].cards()
        };

        let mut trial_deck = deck.clone();
        trial_deck.remove(villain[0]);
        trial_deck.remove(villain[1]);
        trial_deck.shuffle(rng);

        let mut runout: Vec<Card> = community.to_vec();
        while runout.len() < 5 {
            match trial_deck.deal() {
                Some(card) => runout.push(card),
                None => break,
            }
        }

        let hero_cards: Vec<Card> = hole.iter().chain(&runout).copied().collect();
        let villain_cards: Vec<Card> = villain.iter().chain(&runout).copied().collect();
        let hero = evaluate_best(&hero_cards);
        let opp = evaluate_best(&villain_cards);
        if hero > opp {
            score += 1.0;
        } else if hero == opp {
            score += 0.5;
        }
    }

    score / trials as f64
}

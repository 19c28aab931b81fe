//! Poker hand evaluation.
//!
//! Given 5-7 cards this module finds the strongest 5-card classification and
//! a kicker vector. A [`HandStrength`] compares lexicographically on
//! (category rank, kicker vector); kickers are rank values 2-14, most
//! significant first, zero-padded to five slots. Fewer than five known cards
//! produce a "Partial" strength at rank 0 carrying the padded card ranks.

use std::cmp::Ordering;

use super::card::Card;

/// Hand rank categories, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandCategory {
    /// Integer rank 0-8.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Human-readable category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// A comparable hand classification.
#[derive(Debug, Clone, Copy)]
pub struct HandStrength {
    category: Option<HandCategory>,
    /// Category rank 0-8 (0 for both High Card and Partial).
    pub rank: u8,
    /// Kicker rank values 2-14, most significant first, zero-padded.
    pub score_vector: [u8; 5],
}

impl HandStrength {
    fn made(category: HandCategory, kickers: &[u8]) -> Self {
        let mut vector = [0u8; 5];
        for (slot, &k) in vector.iter_mut().zip(kickers.iter()) {
            *slot = k;
        }
        Self {
            category: Some(category),
            rank: category.rank(),
            score_vector: vector,
        }
    }

    /// Strength for fewer than five known cards: rank 0, card ranks
    /// descending, zero-padded.
    pub fn partial(cards: &[Card]) -> Self {
        let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank_value()).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let mut vector = [0u8; 5];
        for (slot, &r) in vector.iter_mut().zip(ranks.iter()) {
            *slot = r;
        }
        Self {
            category: None,
            rank: 0,
            score_vector: vector,
        }
    }

    /// True when the strength was built from fewer than five cards.
    pub fn is_partial(&self) -> bool {
        self.category.is_none()
    }

    /// The category name, "Partial" for incomplete hands.
    pub fn category_name(&self) -> &'static str {
        self.category.map_or("Partial", |c| c.name())
    }

    /// The made-hand category, if five or more cards were known.
    pub fn category(&self) -> Option<HandCategory> {
        self.category
    }

    /// Scalar strength in [0, 1): `(rank + sum(vector)/100) / 10`.
    pub fn normalized(&self) -> f64 {
        let kicker_sum: u32 = self.score_vector.iter().map(|&k| k as u32).sum();
        (self.rank as f64 + kicker_sum as f64 / 100.0) / 10.0
    }
}

impl PartialEq for HandStrength {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.score_vector == other.score_vector
    }
}

impl Eq for HandStrength {}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.score_vector.cmp(&other.score_vector))
    }
}

/// Evaluate the best 5-card hand from up to 7 cards.
///
/// Total for any multiset of distinct cards; fewer than five cards yield a
/// [`HandStrength::partial`].
pub fn evaluate_best(cards: &[Card]) -> HandStrength {
    match cards.len() {
        0..=4 => HandStrength::partial(cards),
        5 => evaluate_5(&[cards[0], cards[1], cards[2], cards[3], cards[4]]),
        n => {
            let mut best: Option<HandStrength> = None;
            // All C(n, 5) five-card subsets.
            for i in 0..n {
                for j in (i + 1)..n {
                    for k in (j + 1)..n {
                        for l in (k + 1)..n {
                            for m in (l + 1)..n {
                                let hand =
                                    [cards[i], cards[j], cards[k], cards[l], cards[m]];
                                let strength = evaluate_5(&hand);
                                if best.map_or(true, |b| strength > b) {
                                    best = Some(strength);
                                }
                            }
                        }
                    }
                }
            }
            // n >= 6 here, so at least one subset was evaluated.
            best.unwrap_or_else(|| HandStrength::partial(cards))
        }
    }
}

fn evaluate_5(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    let mut rank_bits = 0u16;

    for card in cards {
        rank_counts[card.rank() as usize] += 1;
        suit_counts[card.suit() as usize] += 1;
        rank_bits |= 1 << card.rank();
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = find_straight_high(rank_bits);

    if is_flush {
        if let Some(high) = straight_high {
            return HandStrength::made(HandCategory::StraightFlush, &[high]);
        }
    }

    // Group rank values by multiplicity, highest rank first.
    let mut quads = Vec::new();
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    let mut singles = Vec::new();
    for rank in (0..13u8).rev() {
        let value = rank + 2;
        match rank_counts[rank as usize] {
            4 => quads.push(value),
            3 => trips.push(value),
            2 => pairs.push(value),
            1 => singles.push(value),
            _ => {}
        }
    }

    if let Some(&quad) = quads.first() {
        let kicker = trips
            .first()
            .or_else(|| pairs.first())
            .or_else(|| singles.first())
            .copied()
            .unwrap_or(0);
        return HandStrength::made(HandCategory::FourOfAKind, &[quad, kicker]);
    }

    if let Some(&trip) = trips.first() {
        if let Some(&pair) = pairs.first() {
            return HandStrength::made(HandCategory::FullHouse, &[trip, pair]);
        }
    }

    if is_flush {
        let mut values: Vec<u8> = cards.iter().map(|c| c.rank_value()).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        return HandStrength::made(HandCategory::Flush, &values);
    }

    if let Some(high) = straight_high {
        return HandStrength::made(HandCategory::Straight, &[high]);
    }

    if let Some(&trip) = trips.first() {
        let kickers: Vec<u8> = singles.iter().take(2).copied().collect();
        let mut vector = vec![trip];
        vector.extend(kickers);
        return HandStrength::made(HandCategory::ThreeOfAKind, &vector);
    }

    if pairs.len() >= 2 {
        let kicker = singles.first().copied().unwrap_or(0);
        return HandStrength::made(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker]);
    }

    if let Some(&pair) = pairs.first() {
        let mut vector = vec![pair];
        vector.extend(singles.iter().take(3));
        return HandStrength::made(HandCategory::OnePair, &vector);
    }

    HandStrength::made(HandCategory::HighCard, &singles)
}

/// High-card rank value of a straight in the bitmask, if any. The wheel
/// (A-2-3-4-5) plays the ace low and returns 5.
fn find_straight_high(rank_bits: u16) -> Option<u8> {
    // Mirror the ace down below the deuce for the wheel.
    let bits = (rank_bits << 1) | ((rank_bits >> 12) & 1);
    // bits now indexes rank values 1..=14 at positions 0..=13.
    for high in (5..=14u8).rev() {
        let mask = 0b11111u16 << (high - 5);
        if bits & mask == mask {
            return Some(high);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|l| Card::parse(l).unwrap()).collect()
    }

    #[test]
    fn categories() {
        let cases = [
            ("As Kd Qh Jc 9s", HandCategory::HighCard),
            ("As Ad Kh Qc Js", HandCategory::OnePair),
            ("As Ad Kh Kc Js", HandCategory::TwoPair),
            ("As Ad Ah Kc Js", HandCategory::ThreeOfAKind),
            ("Ts 9d 8h 7c 6s", HandCategory::Straight),
            ("As Ks 9s 7s 2s", HandCategory::Flush),
            ("As Ad Ah Kc Kd", HandCategory::FullHouse),
            ("As Ad Ah Ac Ks", HandCategory::FourOfAKind),
            ("9s 8s 7s 6s 5s", HandCategory::StraightFlush),
        ];
        for (hand, expected) in cases {
            let strength = evaluate_best(&cards(hand));
            assert_eq!(strength.category(), Some(expected), "hand {hand}");
        }
    }

    #[test]
    fn wheel_plays_ace_low() {
        let strength = evaluate_best(&cards("5s 4d 3h 2c As"));
        assert_eq!(strength.category(), Some(HandCategory::Straight));
        assert_eq!(strength.score_vector[0], 5);

        let broadway = evaluate_best(&cards("As Kd Qh Jc Ts"));
        assert_eq!(broadway.score_vector[0], 14);
        assert!(broadway > strength);
    }

    #[test]
    fn kicker_breaks_ties() {
        let board = "Ah Ad Kc 7c 2s";
        let queen_kicker = evaluate_best(&cards(&format!("{board} Qd 3c")[..]));
        let jack_kicker = evaluate_best(&cards(&format!("{board} Jd 3h")[..]));
        assert!(queen_kicker > jack_kicker);
    }

    #[test]
    fn best_five_of_seven() {
        let strength = evaluate_best(&cards("Ah As Ad Ac Kh Qs Jd"));
        assert_eq!(strength.category(), Some(HandCategory::FourOfAKind));
        assert_eq!(strength.score_vector[0], 14);
        assert_eq!(strength.score_vector[1], 13);
    }

    #[test]
    fn full_house_over_flush_from_seven() {
        let strength = evaluate_best(&cards("Ks Kh Kd 2s 2h 9s 4s"));
        assert_eq!(strength.category(), Some(HandCategory::FullHouse));
    }

    #[test]
    fn partial_strength_for_short_hands() {
        let strength = evaluate_best(&cards("Ah Kd"));
        assert!(strength.is_partial());
        assert_eq!(strength.rank, 0);
        assert_eq!(strength.score_vector, [14, 13, 0, 0, 0]);
        assert_eq!(strength.category_name(), "Partial");
    }

    #[test]
    fn normalized_is_bounded_and_ordered() {
        let straight_flush = evaluate_best(&cards("9s 8s 7s 6s 5s"));
        let pair = evaluate_best(&cards("As Ad Kh Qc Js"));
        assert!(straight_flush.normalized() > pair.normalized());
        assert!(straight_flush.normalized() < 1.0);
        assert!(pair.normalized() > 0.0);
    }

    #[test]
    fn comparison_matches_poker_rules() {
        let flush = evaluate_best(&cards("As Ks 9s 7s 2s"));
        let straight = evaluate_best(&cards("Ts 9d 8h 7c 6s"));
        let trips = evaluate_best(&cards("As Ad Ah Kc Js"));
        assert!(flush > straight);
        assert!(straight > trips);
    }
}

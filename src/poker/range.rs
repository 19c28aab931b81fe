//! Hand ranges: textual tokens expanded into concrete two-card combos.
//!
//! Tokens follow standard range notation:
//!
//! - `"QQ"` — one pair rank; `"22+"` — all pairs of that rank and above.
//! - `"KTs"` / `"KTo"` — a suited / offsuit non-pair combo.
//! - `"A2s+"` / `"K8o+"` — with the high card fixed, the low card runs from
//!   the named rank up to (but not including) the high card.
//!
//! Expansion produces canonical unordered combos, deduplicated. The named
//! tables cover heads-up opening, defending, three-betting, and push/fold
//! ladders by seat and stack depth.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use super::card::{Card, RANK_CHARS, SUIT_CHARS};

/// A canonical unordered pair of specific cards (higher id first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    cards: [Card; 2],
}

impl Combo {
    /// Canonicalise two cards into a combo; symmetric in its arguments.
    pub fn new(a: Card, b: Card) -> Self {
        if a.id() >= b.id() {
            Self { cards: [a, b] }
        } else {
            Self { cards: [b, a] }
        }
    }

    /// Build a combo from two hole cards if exactly two are present.
    pub fn from_hole(hole: &[Card]) -> Option<Self> {
        match hole {
            [a, b] => Some(Self::new(*a, *b)),
            _ => None,
        }
    }

    /// Both cards, higher id first.
    pub fn cards(&self) -> [Card; 2] {
        self.cards
    }

    /// True when either card appears in `dead`.
    pub fn conflicts_with(&self, dead: &[Card]) -> bool {
        dead.contains(&self.cards[0]) || dead.contains(&self.cards[1])
    }
}

impl std::fmt::Display for Combo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.cards[0], self.cards[1])
    }
}

fn rank_index(ch: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&c| c == ch)
        .map(|idx| idx as u8)
}

fn pair_combos(rank: u8, out: &mut Vec<Combo>) {
    for suit_a in 0..4u8 {
        for suit_b in (suit_a + 1)..4 {
            out.push(Combo::new(Card::new(rank, suit_a), Card::new(rank, suit_b)));
        }
    }
}

fn suited_combos(high: u8, low: u8, out: &mut Vec<Combo>) {
    for suit in 0..4u8 {
        out.push(Combo::new(Card::new(high, suit), Card::new(low, suit)));
    }
}

fn offsuit_combos(high: u8, low: u8, out: &mut Vec<Combo>) {
    for suit_a in 0..4u8 {
        for suit_b in 0..4u8 {
            if suit_a != suit_b {
                out.push(Combo::new(Card::new(high, suit_a), Card::new(low, suit_b)));
            }
        }
    }
}

/// Expand one range token into combos. Unrecognised tokens contribute
/// nothing.
pub fn expand_token(token: &str) -> Vec<Combo> {
    let (body, plus) = match token.strip_suffix('+') {
        Some(body) => (body, true),
        None => (token, false),
    };
    let chars: Vec<char> = body.chars().collect();
    let mut combos = Vec::new();

    match chars.as_slice() {
        [a, b] if a == b => {
            let Some(rank) = rank_index(*a) else {
                return combos;
            };
            if plus {
                for candidate in rank..13 {
                    pair_combos(candidate, &mut combos);
                }
            } else {
                pair_combos(rank, &mut combos);
            }
        }
        [h, l, suit_flag] => {
            let (Some(high), Some(low)) = (rank_index(*h), rank_index(*l)) else {
                return combos;
            };
            let rank_pairs: Vec<(u8, u8)> = if plus && high > low {
                (low..high).map(|candidate| (high, candidate)).collect()
            } else {
                vec![(high, low)]
            };
            for (rank_high, rank_low) in rank_pairs {
                match suit_flag {
                    's' => suited_combos(rank_high, rank_low, &mut combos),
                    'o' => offsuit_combos(rank_high, rank_low, &mut combos),
                    _ => {}
                }
            }
        }
        _ => {}
    }

    combos
}

fn expand_tokens(tokens: &[&str]) -> Vec<Combo> {
    let mut seen = FxHashSet::default();
    let mut combos = Vec::new();
    for token in tokens {
        for combo in expand_token(token) {
            if seen.insert(combo) {
                combos.push(combo);
            }
        }
    }
    combos
}

/// A named list of range tokens.
#[derive(Debug, Clone)]
pub struct HandRange {
    pub name: &'static str,
    tokens: &'static [&'static str],
}

impl HandRange {
    pub const fn new(name: &'static str, tokens: &'static [&'static str]) -> Self {
        Self { name, tokens }
    }

    /// The unique combos this range expands to.
    pub fn combos(&self) -> Vec<Combo> {
        expand_tokens(self.tokens)
    }

    /// True iff the canonical combo appears in the expansion.
    pub fn contains(&self, combo: Combo) -> bool {
        self.combos().contains(&combo)
    }
}

/// Union of several ranges, deduplicated.
pub fn combine_ranges(ranges: &[&HandRange]) -> Vec<Combo> {
    let mut seen = FxHashSet::default();
    let mut combos = Vec::new();
    for range in ranges {
        for combo in range.combos() {
            if seen.insert(combo) {
                combos.push(combo);
            }
        }
    }
    combos
}

/// The named heads-up ranges the policy layers index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedRange {
    /// Button opening range at 100bb.
    HuBtn100bb,
    /// Button opening range at 20bb and below.
    HuSb20bb,
    /// Big blind defending range.
    HuBbDefend,
    /// SB open, used when modelling a villain's range.
    HuSbOpen,
    /// BB flat-call range, used when modelling a villain's range.
    HuBbDefendCall,
    /// SB three-bet range (villain model).
    HuSb3bet,
    /// BB three-bet range (villain model).
    HuBb3bet,
    /// Hero three-bet range, button vs big blind.
    HuBtnVsBb3bet,
    /// Hero three-bet range, big blind vs button.
    HuBbVsBtn3bet,
    /// Button shove ladder, 6bb and below.
    BtnShove6bb,
    /// Button shove ladder, 10bb and below.
    BtnShove10bb,
    /// Big blind shove ladder, 6bb and below.
    BbShove6bb,
    /// Big blind shove ladder, 10bb and below.
    BbShove10bb,
}

impl NamedRange {
    const ALL: [NamedRange; 13] = [
        NamedRange::HuBtn100bb,
        NamedRange::HuSb20bb,
        NamedRange::HuBbDefend,
        NamedRange::HuSbOpen,
        NamedRange::HuBbDefendCall,
        NamedRange::HuSb3bet,
        NamedRange::HuBb3bet,
        NamedRange::HuBtnVsBb3bet,
        NamedRange::HuBbVsBtn3bet,
        NamedRange::BtnShove6bb,
        NamedRange::BtnShove10bb,
        NamedRange::BbShove6bb,
        NamedRange::BbShove10bb,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&r| r == self).unwrap_or(0)
    }

    /// The token list backing this range.
    pub fn range(self) -> &'static HandRange {
        static HU_BTN_100BB: HandRange = HandRange::new(
            "HU Button 100bb",
            &[
                "22+", "A2s+", "K4s+", "Q6s+", "J7s+", "T7s+", "97s+", "87s", "76s",
                "65s", "A2o+", "K8o+", "Q9o+", "J9o+", "T9o",
            ],
        );
        static HU_SB_20BB: HandRange = HandRange::new(
            "HU Button 20bb",
            &[
                "22+", "A2s+", "K6s+", "Q8s+", "J8s+", "T8s+", "98s", "A9o+", "KTo+",
                "QJo",
            ],
        );
        static HU_BB_DEFEND: HandRange = HandRange::new(
            "HU Big Blind Defend",
            &[
                "22+", "A2s+", "K2s+", "Q5s+", "J7s+", "T7s+", "97s+", "87s", "76s",
                "A5o+", "K9o+", "Q9o+", "J9o+", "T9o", "98o",
            ],
        );
        static HU_SB_OPEN: HandRange = HandRange::new(
            "HU SB Open",
            &[
                "22+", "A2s+", "K6s+", "Q8s+", "J8s+", "T8s+", "98s", "A9o+", "KTo+",
                "QJo",
            ],
        );
        static HU_BB_DEFEND_CALL: HandRange = HandRange::new(
            "HU BB Defend Call",
            &[
                "22+", "A2s+", "K2s+", "Q5s+", "J7s+", "T7s+", "97s+", "87s", "76s",
                "A5o+", "K9o+", "Q9o+", "J9o+", "T9o", "98o",
            ],
        );
        static HU_SB_3BET: HandRange = HandRange::new(
            "HU SB 3bet",
            &["TT+", "AQ+", "A8s+", "KTs+", "QTs+", "JTs"],
        );
        static HU_BB_3BET: HandRange = HandRange::new(
            "HU BB 3bet",
            &["TT+", "AQ+", "A5s+", "KTs+", "QTs+", "JTs"],
        );
        static HU_BTN_VS_BB: HandRange = HandRange::new(
            "HU Button vs BB 3bet",
            &["TT+", "A8s+", "KTs+", "QTs+", "JTs", "AQo+"],
        );
        static HU_BB_VS_BTN: HandRange = HandRange::new(
            "HU BB vs BTN 3bet",
            &["99+", "A5s+", "KTs+", "QTs+", "JTs", "AQo+"],
        );
        static BTN_SHOVE_6BB: HandRange = HandRange::new(
            "BTN shove <=6bb",
            &[
                "22+", "A2s+", "K2s+", "Q4s+", "J5s+", "T6s+", "96s+", "86s+", "A2o+",
                "K5o+", "Q8o+", "J8o+", "T8o+", "98o",
            ],
        );
        static BTN_SHOVE_10BB: HandRange = HandRange::new(
            "BTN shove <=10bb",
            &["22+", "A2s+", "K6s+", "Q8s+", "J8s+", "T8s+", "A8o+", "KTo+", "QJo"],
        );
        static BB_SHOVE_6BB: HandRange = HandRange::new(
            "BB shove <=6bb",
            &[
                "22+", "A2s+", "K4s+", "Q6s+", "J7s+", "T7s+", "97s+", "87s", "A5o+",
                "K9o+", "Q9o+", "J9o+",
            ],
        );
        static BB_SHOVE_10BB: HandRange = HandRange::new(
            "BB shove <=10bb",
            &["33+", "A2s+", "K7s+", "Q9s+", "J9s+", "T9s", "A9o+", "KJo+"],
        );

        match self {
            NamedRange::HuBtn100bb => &HU_BTN_100BB,
            NamedRange::HuSb20bb => &HU_SB_20BB,
            NamedRange::HuBbDefend => &HU_BB_DEFEND,
            NamedRange::HuSbOpen => &HU_SB_OPEN,
            NamedRange::HuBbDefendCall => &HU_BB_DEFEND_CALL,
            NamedRange::HuSb3bet => &HU_SB_3BET,
            NamedRange::HuBb3bet => &HU_BB_3BET,
            NamedRange::HuBtnVsBb3bet => &HU_BTN_VS_BB,
            NamedRange::HuBbVsBtn3bet => &HU_BB_VS_BTN,
            NamedRange::BtnShove6bb => &BTN_SHOVE_6BB,
            NamedRange::BtnShove10bb => &BTN_SHOVE_10BB,
            NamedRange::BbShove6bb => &BB_SHOVE_6BB,
            NamedRange::BbShove10bb => &BB_SHOVE_10BB,
        }
    }

    /// The expanded combos, cached for the life of the process.
    pub fn combos(self) -> &'static [Combo] {
        static EXPANSIONS: Lazy<Vec<Vec<Combo>>> = Lazy::new(|| {
            NamedRange::ALL
                .iter()
                .map(|r| r.range().combos())
                .collect()
        });
        &EXPANSIONS[self.index()]
    }
}

/// Heads-up seat class used to key the range tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePosition {
    /// Button / small blind (first in preflop).
    Button,
    /// Big blind.
    BigBlind,
}

/// Opening range by seat and effective stack depth.
pub fn opening_range(position: RangePosition, stack_bb: f64) -> &'static [Combo] {
    match position {
        RangePosition::Button => {
            if stack_bb <= 20.0 {
                NamedRange::HuSb20bb.combos()
            } else {
                NamedRange::HuBtn100bb.combos()
            }
        }
        RangePosition::BigBlind => NamedRange::HuBbDefend.combos(),
    }
}

/// Hero three-bet range by seat.
pub fn three_bet_range(position: RangePosition) -> &'static [Combo] {
    match position {
        RangePosition::Button => NamedRange::HuBtnVsBb3bet.combos(),
        RangePosition::BigBlind => NamedRange::HuBbVsBtn3bet.combos(),
    }
}

/// Push/fold range: the first ladder rung whose threshold covers the stack,
/// widest rung when the stack exceeds every rung.
pub fn push_range(position: RangePosition, stack_bb: f64) -> &'static [Combo] {
    let ladder: &[(f64, NamedRange)] = match position {
        RangePosition::Button => &[
            (6.0, NamedRange::BtnShove6bb),
            (10.0, NamedRange::BtnShove10bb),
        ],
        RangePosition::BigBlind => &[
            (6.0, NamedRange::BbShove6bb),
            (10.0, NamedRange::BbShove10bb),
        ],
    };
    for (threshold, range) in ladder {
        if stack_bb <= *threshold {
            return range.combos();
        }
    }
    ladder[ladder.len() - 1].1.combos()
}

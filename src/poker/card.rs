//! Card primitives for the hold'em agent.
//!
//! Cards travel on the wire as two-character labels (rank then suit, e.g.
//! "As", "Td"). Internally a card is a single id 0-51 (`rank * 4 + suit`).

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Rank characters in ascending order (index 0 = deuce, 12 = ace).
pub const RANK_CHARS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Suit characters (index 0 = clubs, 3 = spades).
pub const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit.
    id: u8,
}

impl Card {
    /// Create a card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13 && suit < 4);
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its id (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52);
        Self { id }
    }

    /// Parse a two-character label like "As", "Kh", "2c".
    pub fn parse(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        let rank_ch = chars.next()?.to_ascii_uppercase();
        let suit_ch = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        let rank = RANK_CHARS.iter().position(|&c| c == rank_ch)?;
        let suit = SUIT_CHARS.iter().position(|&c| c == suit_ch)?;
        Some(Self::new(rank as u8, suit as u8))
    }

    /// The card's id (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Rank index 0-12 (0 = deuce, 12 = ace).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Rank value 2-14 (14 = ace), the scale used by kicker vectors and
    /// preflop strength.
    #[inline]
    pub fn rank_value(&self) -> u8 {
        self.rank() + 2
    }

    /// Suit index 0-3.
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// The canonical two-character label.
    pub fn label(&self) -> String {
        format!(
            "{}{}",
            RANK_CHARS[self.rank() as usize],
            SUIT_CHARS[self.suit() as usize]
        )
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_CHARS[self.rank() as usize],
            SUIT_CHARS[self.suit() as usize]
        )
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Card, D::Error> {
        let label = String::deserialize(deserializer)?;
        Card::parse(&label)
            .ok_or_else(|| de::Error::custom(format!("invalid card label: {label:?}")))
    }
}

/// Parse a sequence of labels, skipping anything malformed.
pub fn parse_cards(labels: &[String]) -> Vec<Card> {
    labels.iter().filter_map(|l| Card::parse(l)).collect()
}

/// Betting street, ordered `PRE_FLOP < FLOP < TURN < RIVER < SHOWDOWN`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Ordinal used for monotonicity checks (0-4).
    pub fn order(&self) -> u8 {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
            Street::Showdown => 4,
        }
    }

    /// The wire spelling of this street.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Street::PreFlop => "PRE_FLOP",
            Street::Flop => "FLOP",
            Street::Turn => "TURN",
            Street::River => "RIVER",
            Street::Showdown => "SHOWDOWN",
        }
    }

    /// Streets that can carry betting action, in order.
    pub const BETTING: [Street; 4] = [Street::PreFlop, Street::Flop, Street::Turn, Street::River];
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A deck of cards, optionally with dead cards removed.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A full 52-card deck in id order.
    pub fn full() -> Self {
        Self {
            cards: (0..52).map(Card::from_id).collect(),
        }
    }

    /// A deck with the given dead cards removed.
    pub fn without(dead: &[Card]) -> Self {
        Self {
            cards: (0..52)
                .map(Card::from_id)
                .filter(|c| !dead.contains(c))
                .collect(),
        }
    }

    /// Shuffle the remaining cards.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deal the next card, if any remain.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove a specific card from the deck if present.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|&c| c != card);
    }

    /// Number of cards left.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// The remaining cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn card_parse_and_display() {
        assert_eq!(Card::parse("As").unwrap().to_string(), "As");
        assert_eq!(Card::parse("kh").unwrap().to_string(), "Kh");
        assert_eq!(Card::parse("2c").unwrap().to_string(), "2c");
        assert_eq!(Card::parse("Td").unwrap().to_string(), "Td");
        assert!(Card::parse("Xx").is_none());
        assert!(Card::parse("A").is_none());
        assert!(Card::parse("Asd").is_none());
    }

    #[test]
    fn rank_values() {
        assert_eq!(Card::parse("2c").unwrap().rank_value(), 2);
        assert_eq!(Card::parse("Tc").unwrap().rank_value(), 10);
        assert_eq!(Card::parse("As").unwrap().rank_value(), 14);
    }

    #[test]
    fn card_serde_round_trip() {
        let card = Card::parse("Qd").unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Qd\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn street_ordering_and_names() {
        assert!(Street::PreFlop < Street::Flop);
        assert!(Street::River < Street::Showdown);
        assert_eq!(Street::PreFlop.wire_name(), "PRE_FLOP");
        let s: Street = serde_json::from_str("\"PRE_FLOP\"").unwrap();
        assert_eq!(s, Street::PreFlop);
    }

    #[test]
    fn deck_without_dead_cards() {
        let dead = vec![Card::parse("As").unwrap(), Card::parse("Ah").unwrap()];
        let deck = Deck::without(&dead);
        assert_eq!(deck.remaining(), 50);
        assert!(!deck.cards().contains(&dead[0]));
    }

    #[test]
    fn deck_deals_every_card_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = Deck::full();
        deck.shuffle(&mut rng);
        let mut seen = std::collections::HashSet::new();
        while let Some(card) = deck.deal() {
            assert!(seen.insert(card.id()));
        }
        assert_eq!(seen.len(), 52);
    }
}

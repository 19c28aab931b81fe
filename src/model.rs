//! Opponent model: per-seat rolling counters and range estimation.
//!
//! Counters accrue from observed actions; the derived rates (VPIP, PFR,
//! aggression factor) drive a categorical archetype which tightens or
//! loosens the named preflop ranges when estimating what a villain holds.

use rustc_hash::FxHashMap;

use crate::analysis::select_top_fraction;
use crate::poker::range::{Combo, NamedRange};
use crate::state::{Role, TableAction};

/// Playing-style archetype by VPIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Nit,
    Tag,
    Lag,
    Maniac,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Nit => f.write_str("NIT"),
            Classification::Tag => f.write_str("TAG"),
            Classification::Lag => f.write_str("LAG"),
            Classification::Maniac => f.write_str("Maniac"),
        }
    }
}

/// Rolling counters for one seat.
#[derive(Debug, Clone, Default)]
pub struct OpponentStats {
    pub seat: u8,
    pub hands_seen: u32,
    pub voluntarily_played: u32,
    pub preflop_raises: u32,
    pub bets_or_raises: u32,
    pub calls: u32,
    pub showdowns: u32,
    pub showdowns_won: u32,
    pub fold_to_cbet: u32,
    pub cbet_opportunities: u32,
    /// Last estimated range, kept for inspection.
    pub range_cache: Vec<Combo>,
}

impl OpponentStats {
    fn new(seat: u8) -> Self {
        Self {
            seat,
            ..Self::default()
        }
    }

    /// Fraction of hands voluntarily played.
    pub fn vpip(&self) -> f64 {
        if self.hands_seen == 0 {
            return 0.0;
        }
        self.voluntarily_played as f64 / self.hands_seen as f64
    }

    /// Fraction of hands raised preflop.
    pub fn pfr(&self) -> f64 {
        if self.hands_seen == 0 {
            return 0.0;
        }
        self.preflop_raises as f64 / self.hands_seen as f64
    }

    /// Bets and raises per call; the raw bet count when there are no calls.
    pub fn aggression_factor(&self) -> f64 {
        if self.calls == 0 {
            return self.bets_or_raises as f64;
        }
        self.bets_or_raises as f64 / self.calls.max(1) as f64
    }

    /// Archetype thresholds on VPIP: NIT < 0.15, TAG < 0.27, LAG < 0.40,
    /// else Maniac.
    pub fn classification(&self) -> Classification {
        let vpip = self.vpip();
        if vpip < 0.15 {
            Classification::Nit
        } else if vpip < 0.27 {
            Classification::Tag
        } else if vpip < 0.40 {
            Classification::Lag
        } else {
            Classification::Maniac
        }
    }
}

/// A point-in-time summary of one seat's tendencies.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentProfile {
    pub seat: u8,
    pub vpip: f64,
    pub pfr: f64,
    pub agg: f64,
    pub classification: Classification,
}

impl OpponentProfile {
    /// Neutral profile used when no opponent has been observed.
    pub fn default_tag() -> Self {
        Self {
            seat: 0,
            vpip: 0.0,
            pfr: 0.0,
            agg: 1.0,
            classification: Classification::Tag,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accumulates per-seat tendencies across the session.
#[derive(Debug, Default)]
pub struct OpponentModel {
    stats: FxHashMap<u8, OpponentStats>,
}

impl OpponentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, seat: u8) -> &mut OpponentStats {
        self.stats
            .entry(seat)
            .or_insert_with(|| OpponentStats::new(seat))
    }

    pub fn observe_preflop(&mut self, seat: u8, voluntarily_in_pot: bool, raised: bool) {
        let stats = self.get(seat);
        stats.hands_seen += 1;
        if voluntarily_in_pot {
            stats.voluntarily_played += 1;
        }
        if raised {
            stats.preflop_raises += 1;
        }
    }

    pub fn observe_postflop_action(&mut self, seat: u8, aggressive: bool) {
        let stats = self.get(seat);
        if aggressive {
            stats.bets_or_raises += 1;
        } else {
            stats.calls += 1;
        }
    }

    pub fn observe_cbet_opportunity(&mut self, seat: u8, folded: bool) {
        let stats = self.get(seat);
        stats.cbet_opportunities += 1;
        if folded {
            stats.fold_to_cbet += 1;
        }
    }

    pub fn observe_showdown(&mut self, seat: u8, won: bool) {
        let stats = self.get(seat);
        stats.showdowns += 1;
        if won {
            stats.showdowns_won += 1;
        }
    }

    // ------------------------------------------------------------------
    // Range estimation
    // ------------------------------------------------------------------

    /// Estimate a villain's preflop range from their role and last action,
    /// tightened or widened by archetype.
    pub fn estimate_preflop_range(
        &mut self,
        seat: u8,
        role: Role,
        action: TableAction,
    ) -> Vec<Combo> {
        let raised = action == TableAction::Raise;
        let base = match role {
            Role::BigBlind => {
                if raised {
                    NamedRange::HuBb3bet
                } else {
                    NamedRange::HuBbDefendCall
                }
            }
            Role::SmallBlind if raised => NamedRange::HuSb3bet,
            _ => NamedRange::HuSbOpen,
        };

        let combos = base.combos();
        let stats = self.get(seat);
        let combos = match stats.classification() {
            Classification::Nit => select_top_fraction(combos, 0.25),
            Classification::Tag => select_top_fraction(combos, 0.4),
            Classification::Lag => select_top_fraction(combos, 0.8),
            Classification::Maniac => {
                let fraction = (stats.vpip() * 1.2).clamp(0.3, 1.0);
                select_top_fraction(combos, fraction)
            }
        };
        stats.range_cache = combos.clone();
        combos
    }

    /// Shrink factor applied to range equity by archetype: tighter players
    /// realise more of their range's equity.
    pub fn equity_weight(&mut self, seat: u8) -> f64 {
        match self.get(seat).classification() {
            Classification::Nit => 0.85,
            Classification::Tag => 0.70,
            Classification::Lag => 0.50,
            Classification::Maniac => 0.30,
        }
    }

    /// Current derived rates and archetype, rounded for display.
    pub fn describe(&mut self, seat: u8) -> OpponentProfile {
        let stats = self.get(seat);
        OpponentProfile {
            seat,
            vpip: round2(stats.vpip()),
            pfr: round2(stats.pfr()),
            agg: round2(stats.aggression_factor()),
            classification: stats.classification(),
        }
    }
}

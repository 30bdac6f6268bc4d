use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rank {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    None,
}

impl Rank {
    pub const ALL: [Rank; 6] = [
        Rank::First,
        Rank::Second,
        Rank::Third,
        Rank::Fourth,
        Rank::Fifth,
        Rank::None,
    ];

    /// Total over every match count; anything under three matches is `None`.
    pub fn from_match(match_count: u8, has_bonus: bool) -> Rank {
        match (match_count, has_bonus) {
            (6, _) => Rank::First,
            (5, true) => Rank::Second,
            (5, false) => Rank::Third,
            (4, _) => Rank::Fourth,
            (3, _) => Rank::Fifth,
            _ => Rank::None,
        }
    }

    /// Wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Rank::First => "FIRST",
            Rank::Second => "SECOND",
            Rank::Third => "THIRD",
            Rank::Fourth => "FOURTH",
            Rank::Fifth => "FIFTH",
            Rank::None => "NONE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Rank::First => "1st",
            Rank::Second => "2nd",
            Rank::Third => "3rd",
            Rank::Fourth => "4th",
            Rank::Fifth => "5th",
            Rank::None => "no prize",
        }
    }

    pub fn is_winning(&self) -> bool {
        *self != Rank::None
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Prize paid per winning ticket, keyed by rank. Ranks without an entry pay 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable {
    prizes: BTreeMap<Rank, u64>,
}

impl PrizeTable {
    pub fn empty() -> Self {
        Self { prizes: BTreeMap::new() }
    }

    pub fn with(mut self, rank: Rank, amount: u64) -> Self {
        self.prizes.insert(rank, amount);
        self
    }

    pub fn prize(&self, rank: Rank) -> u64 {
        match rank {
            Rank::None => 0,
            _ => self.prizes.get(&rank).copied().unwrap_or(0),
        }
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        PrizeTable::empty()
            .with(Rank::First, 2_000_000_000)
            .with(Rank::Second, 50_000_000)
            .with(Rank::Third, 1_500_000)
            .with(Rank::Fourth, 50_000)
            .with(Rank::Fifth, 5_000)
    }
}

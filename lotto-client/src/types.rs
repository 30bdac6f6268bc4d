use chrono::{DateTime, NaiveDateTime};
use lotto_core::evaluate::ResultSummary;
use lotto_core::models::{Ticket, WinningDraw};
use lotto_core::rank::Rank;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub purchase_amount: u64,
}

/// Body fallback when the `Location` header does not carry the new id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPurchase {
    pub id: Option<u64>,
    pub purchase_id: Option<u64>,
}

impl CreatedPurchase {
    pub fn resolved_id(&self) -> Option<u64> {
        self.id.or(self.purchase_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedLotto {
    pub numbers: Vec<u8>,
    pub issued_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub id: u64,
    pub purchase_amount: u64,
    pub lotto_count: u32,
    pub purchased_at: String,
    pub has_result: bool,
    pub return_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchases {
    pub count: u32,
    pub purchases: Vec<PurchaseSummary>,
}

impl Purchases {
    pub fn total_amount(&self) -> u64 {
        self.purchases.iter().map(|p| p.purchase_amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    pub id: u64,
    pub purchase_amount: u64,
    pub lotto_count: u32,
    pub lottos: Vec<IssuedLotto>,
    pub purchased_at: String,
}

impl PurchaseDetail {
    /// Issued numbers as validated tickets, in issue order.
    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        let tickets = self
            .lottos
            .iter()
            .map(|l| Ticket::try_from(l.numbers.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tickets)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRequest {
    pub lotto_numbers: Vec<u8>,
    pub bonus_number: u8,
}

impl From<&WinningDraw> for ResultRequest {
    fn from(draw: &WinningDraw) -> Self {
        Self {
            lotto_numbers: draw.main().to_vec(),
            bonus_number: draw.bonus(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCount {
    pub rank: Rank,
    pub count: u32,
}

fn count_in(counts: &[RankCount], rank: Rank) -> u32 {
    counts
        .iter()
        .filter(|c| c.rank == rank)
        .map(|c| c.count)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LottoResult {
    pub purchase_id: u64,
    pub purchase_amount: u64,
    pub total_prize: u64,
    pub return_rate: f64,
    pub rank_counts: Vec<RankCount>,
}

impl LottoResult {
    pub fn rank_count(&self, rank: Rank) -> u32 {
        count_in(&self.rank_counts, rank)
    }

    pub fn net(&self) -> i128 {
        self.total_prize as i128 - self.purchase_amount as i128
    }

    /// Ranks whose counts differ from a local evaluation of the same draw.
    pub fn mismatches(&self, local: &ResultSummary) -> Vec<Rank> {
        Rank::ALL
            .into_iter()
            .filter(|&r| self.rank_count(r) != local.rank_count(r))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_samples: u64,
    pub average_return_rate: f64,
    pub accumulated_rank_counts: Vec<RankCount>,
}

impl Statistics {
    pub fn rank_count(&self, rank: Rank) -> u32 {
        count_in(&self.accumulated_rank_counts, rank)
    }

    pub fn total_tickets(&self) -> u64 {
        self.accumulated_rank_counts.iter().map(|c| c.count as u64).sum()
    }

    /// Share of winning tickets in percent; 0 when nothing was checked.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_tickets();
        if total == 0 {
            return 0.0;
        }
        let winning: u64 = Rank::ALL
            .into_iter()
            .filter(|r| r.is_winning())
            .map(|r| self.rank_count(r) as u64)
            .sum();
        winning as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

/// Renders a server timestamp as `YYYY-MM-DD HH:MM`; unknown formats pass through.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

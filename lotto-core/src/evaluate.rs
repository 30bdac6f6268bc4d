use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Ticket, WinningDraw};
use crate::rank::{PrizeTable, Rank};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResult {
    pub ticket: Ticket,
    pub match_count: u8,
    pub has_bonus: bool,
    pub rank: Rank,
    pub prize: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    /// Same order as the evaluated tickets.
    pub details: Vec<TicketResult>,
    pub ticket_count: u32,
    pub total_stake: u64,
    pub total_prize: u64,
    pub return_rate: f64,
    pub rank_counts: BTreeMap<Rank, u32>,
}

impl ResultSummary {
    pub fn rank_count(&self, rank: Rank) -> u32 {
        self.rank_counts.get(&rank).copied().unwrap_or(0)
    }

    pub fn winning_tickets(&self) -> u32 {
        Rank::ALL
            .iter()
            .filter(|r| r.is_winning())
            .map(|&r| self.rank_count(r))
            .sum()
    }

    pub fn win_rate(&self) -> f64 {
        if self.ticket_count == 0 {
            return 0.0;
        }
        self.winning_tickets() as f64 / self.ticket_count as f64 * 100.0
    }

    pub fn net(&self) -> i128 {
        self.total_prize as i128 - self.total_stake as i128
    }

    pub fn is_profit(&self) -> bool {
        self.total_prize > self.total_stake
    }
}

/// Ranks every ticket against `draw` and aggregates the outcome.
pub fn evaluate(
    tickets: &[Ticket],
    draw: &WinningDraw,
    unit_price: u64,
    prizes: &PrizeTable,
) -> ResultSummary {
    let mut rank_counts: BTreeMap<Rank, u32> = Rank::ALL.iter().map(|&r| (r, 0)).collect();

    let details: Vec<TicketResult> = tickets
        .iter()
        .map(|ticket| {
            let match_count = ticket.match_count(draw);
            let has_bonus = ticket.has_bonus(draw);
            let rank = Rank::from_match(match_count, has_bonus);
            *rank_counts.entry(rank).or_insert(0) += 1;
            TicketResult {
                ticket: *ticket,
                match_count,
                has_bonus,
                rank,
                prize: prizes.prize(rank),
            }
        })
        .collect();

    let ticket_count = details.len() as u32;
    // Totals saturate at u64::MAX.
    let total_stake = (ticket_count as u64).saturating_mul(unit_price);
    let total_prize = details
        .iter()
        .fold(0u64, |acc, d| acc.saturating_add(d.prize));

    ResultSummary {
        details,
        ticket_count,
        total_stake,
        total_prize,
        return_rate: return_rate(total_prize, total_stake),
        rank_counts,
    }
}

/// Prize over stake as a percentage; 0 when nothing was staked.
pub fn return_rate(total_prize: u64, total_stake: u64) -> f64 {
    if total_stake == 0 {
        return 0.0;
    }
    total_prize as f64 / total_stake as f64 * 100.0
}

/// Positional label for a ticket: A..Z, then AA, AB, ...
pub fn ticket_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(n: [u8; 6]) -> Ticket {
        Ticket::new(n).unwrap()
    }

    fn draw(main: [u8; 6], bonus: u8) -> WinningDraw {
        WinningDraw::new(main, bonus).unwrap()
    }

    #[test]
    fn test_empty_tickets() {
        let summary = evaluate(&[], &draw([1, 2, 3, 4, 5, 6], 7), 1000, &PrizeTable::default());
        assert_eq!(summary.total_stake, 0);
        assert_eq!(summary.total_prize, 0);
        assert_eq!(summary.return_rate, 0.0);
        assert_eq!(summary.win_rate(), 0.0);
        assert_eq!(summary.rank_counts.len(), Rank::ALL.len());
        assert!(summary.rank_counts.values().all(|&c| c == 0));
    }

    #[test]
    fn test_stake_is_count_times_price() {
        let tickets = vec![
            ticket([1, 2, 3, 4, 5, 6]),
            ticket([7, 8, 9, 10, 11, 12]),
            ticket([13, 14, 15, 16, 17, 18]),
        ];
        let summary = evaluate(&tickets, &draw([40, 41, 42, 43, 44, 45], 39), 1000, &PrizeTable::default());
        assert_eq!(summary.total_stake, 3000);
        assert_eq!(summary.ticket_count, 3);
    }

    #[test]
    fn test_second_rank_scenario() {
        let summary = evaluate(
            &[ticket([1, 2, 3, 4, 5, 6])],
            &draw([1, 2, 3, 4, 5, 7], 6),
            1000,
            &PrizeTable::default(),
        );
        let detail = &summary.details[0];
        assert_eq!(detail.match_count, 5);
        assert!(detail.has_bonus);
        assert_eq!(detail.rank, Rank::Second);
        assert_eq!(summary.rank_count(Rank::Second), 1);
    }

    #[test]
    fn test_no_match_scenario() {
        let summary = evaluate(
            &[ticket([1, 2, 3, 4, 5, 6])],
            &draw([7, 8, 9, 10, 11, 12], 13),
            1000,
            &PrizeTable::default(),
        );
        let detail = &summary.details[0];
        assert_eq!(detail.match_count, 0);
        assert_eq!(detail.rank, Rank::None);
        assert_eq!(detail.prize, 0);
        assert_eq!(summary.return_rate, 0.0);
    }

    #[test]
    fn test_mixed_purchase() {
        let tickets = vec![ticket([1, 2, 3, 7, 8, 9]), ticket([1, 2, 3, 4, 5, 6])];
        let the_draw = draw([1, 2, 3, 4, 5, 6], 7);

        let table = PrizeTable::empty()
            .with(Rank::First, 2_000_000_000)
            .with(Rank::Fourth, 50_000);
        let summary = evaluate(&tickets, &the_draw, 1000, &table);
        assert_eq!(summary.details[0].rank, Rank::Fifth);
        assert_eq!(summary.details[1].rank, Rank::First);
        assert_eq!(summary.rank_count(Rank::First), 1);
        assert_eq!(summary.rank_count(Rank::Fifth), 1);
        assert_eq!(summary.rank_count(Rank::Fourth), 0);
        assert_eq!(summary.total_stake, 2000);
        assert_eq!(summary.total_prize, 2_000_000_000);

        let table = PrizeTable::empty()
            .with(Rank::First, 2_000_000_000)
            .with(Rank::Fifth, 50_000);
        let summary = evaluate(&tickets, &the_draw, 1000, &table);
        assert_eq!(summary.total_prize, 2_000_050_000);
        assert_eq!(summary.return_rate, 100_002_500.0);
        assert_eq!(summary.winning_tickets(), 2);
        assert!(summary.is_profit());
    }

    #[test]
    fn test_details_keep_input_order() {
        let tickets = vec![
            ticket([40, 41, 42, 43, 44, 45]),
            ticket([1, 2, 3, 4, 5, 6]),
            ticket([1, 2, 3, 10, 11, 12]),
        ];
        let summary = evaluate(&tickets, &draw([1, 2, 3, 4, 5, 6], 7), 1000, &PrizeTable::default());
        let ranks: Vec<Rank> = summary.details.iter().map(|d| d.rank).collect();
        assert_eq!(ranks, vec![Rank::None, Rank::First, Rank::Fifth]);
        for (d, t) in summary.details.iter().zip(&tickets) {
            assert_eq!(&d.ticket, t);
        }
    }

    #[test]
    fn test_idempotent() {
        let tickets = vec![ticket([1, 2, 3, 4, 5, 6]), ticket([1, 2, 3, 4, 10, 11])];
        let the_draw = draw([1, 2, 3, 4, 5, 45], 6);
        let a = evaluate(&tickets, &the_draw, 1000, &PrizeTable::default());
        let b = evaluate(&tickets, &the_draw, 1000, &PrizeTable::default());
        assert_eq!(a, b);
        assert_eq!(a.return_rate.to_bits(), b.return_rate.to_bits());
    }

    #[test]
    fn test_loss_net() {
        let summary = evaluate(
            &[ticket([1, 2, 3, 10, 11, 12]), ticket([20, 21, 22, 23, 24, 25])],
            &draw([1, 2, 3, 4, 5, 6], 7),
            1000,
            &PrizeTable::default(),
        );
        assert_eq!(summary.total_prize, 5_000);
        assert_eq!(summary.net(), 3_000);
        assert_eq!(summary.win_rate(), 50.0);

        let summary = evaluate(
            &[ticket([20, 21, 22, 23, 24, 25])],
            &draw([1, 2, 3, 4, 5, 6], 7),
            1000,
            &PrizeTable::default(),
        );
        assert_eq!(summary.net(), -1000);
        assert!(!summary.is_profit());
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let t = ticket([1, 2, 3, 4, 5, 6]);
        let table = PrizeTable::empty().with(Rank::First, u64::MAX / 2 + 1);
        let summary = evaluate(&[t, t], &draw([1, 2, 3, 4, 5, 6], 7), 1000, &table);
        assert_eq!(summary.total_prize, u64::MAX);
        assert_eq!(summary.rank_count(Rank::First), 2);

        let summary = evaluate(&[t, t], &draw([1, 2, 3, 4, 5, 6], 7), u64::MAX, &table);
        assert_eq!(summary.total_stake, u64::MAX);
        assert!(summary.return_rate.is_finite());
    }

    #[test]
    fn test_break_even_is_not_profit() {
        let table = PrizeTable::empty().with(Rank::Fifth, 1000);
        let summary = evaluate(
            &[ticket([1, 2, 3, 10, 11, 12])],
            &draw([1, 2, 3, 4, 5, 6], 7),
            1000,
            &table,
        );
        assert_eq!(summary.net(), 0);
        assert!(!summary.is_profit());
        assert_eq!(summary.return_rate, 100.0);
    }

    #[test]
    fn test_return_rate_zero_stake() {
        assert_eq!(return_rate(500, 0), 0.0);
        assert_eq!(return_rate(500, 1000), 50.0);
    }

    #[test]
    fn test_ticket_label() {
        assert_eq!(ticket_label(0), "A");
        assert_eq!(ticket_label(2), "C");
        assert_eq!(ticket_label(25), "Z");
        assert_eq!(ticket_label(26), "AA");
        assert_eq!(ticket_label(27), "AB");
        assert_eq!(ticket_label(51), "AZ");
        assert_eq!(ticket_label(52), "BA");
    }
}

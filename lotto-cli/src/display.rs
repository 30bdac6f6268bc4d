use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotto_client::config::ClientConfig;
use lotto_client::types::{format_timestamp, LottoResult, PurchaseDetail, Purchases, Statistics};
use lotto_core::evaluate::{ticket_label, ResultSummary};
use lotto_core::models::{Ticket, WinningDraw};
use lotto_core::rank::Rank;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// `1234567` → `1,234,567`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_won(amount: u64) -> String {
    format!("{} won", format_amount(amount))
}

fn rank_color(rank: Rank) -> Color {
    match rank {
        Rank::First => Color::Yellow,
        Rank::Second => Color::Cyan,
        Rank::Third => Color::Magenta,
        Rank::Fourth => Color::Red,
        Rank::Fifth => Color::Grey,
        Rank::None => Color::DarkGrey,
    }
}

fn rate_cell(rate: f64) -> Cell {
    let color = if rate >= 100.0 { Color::Green } else { Color::Red };
    Cell::new(format!("{:.1}%", rate)).fg(color)
}

pub fn display_purchase_created(id: u64, amount: u64, count: u32) {
    println!("\nPurchase #{} complete: {} ({} tickets)", id, format_won(amount), count);
}

pub fn display_purchase(detail: &PurchaseDetail, tickets: &[Ticket]) {
    println!(
        "\nPurchase #{}  {}  {} ({} tickets)\n",
        detail.id,
        format_timestamp(&detail.purchased_at),
        format_won(detail.purchase_amount),
        detail.lotto_count
    );

    if tickets.is_empty() {
        println!("No tickets issued.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Numbers"]);
    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(vec![ticket_label(i), ticket.to_string()]);
    }
    println!("{table}");
}

pub fn display_history(purchases: &Purchases) {
    if purchases.purchases.is_empty() {
        println!("No purchases yet.");
        return;
    }

    println!(
        "\n{} purchases, {} spent\n",
        purchases.count,
        format_won(purchases.total_amount())
    );

    let mut table = new_table();
    table.set_header(vec!["ID", "Purchased at", "Amount", "Tickets", "Result", "Return rate"]);
    for p in &purchases.purchases {
        let rate = match p.return_rate {
            Some(rate) => rate_cell(rate),
            None => Cell::new("—"),
        };
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(format_timestamp(&p.purchased_at)),
            Cell::new(format_won(p.purchase_amount)),
            Cell::new(p.lotto_count),
            Cell::new(if p.has_result { "checked" } else { "pending" }),
            rate,
        ]);
    }
    println!("{table}");
}

pub fn display_draw(draw: &WinningDraw) {
    println!("\nWinning numbers: {}", draw);
}

pub fn display_ticket_results(summary: &ResultSummary) {
    if summary.details.is_empty() {
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Numbers", "Matches", "Bonus", "Rank", "Prize"]);
    for (i, d) in summary.details.iter().enumerate() {
        let prize = if d.prize > 0 { format_won(d.prize) } else { "—".to_string() };
        table.add_row(vec![
            Cell::new(ticket_label(i)),
            Cell::new(d.ticket.to_string()),
            Cell::new(d.match_count),
            Cell::new(if d.has_bonus { "yes" } else { "" }),
            Cell::new(d.rank.display_name()).fg(rank_color(d.rank)),
            Cell::new(prize),
        ]);
    }
    println!("{table}");
}

/// `Profit: 1,000 won`, `Loss: 1,000 won` or `Break-even`.
fn net_line(net: i128) -> String {
    let amount = format_amount(u64::try_from(net.unsigned_abs()).unwrap_or(u64::MAX));
    match net.signum() {
        1 => format!("Profit: {} won", amount),
        -1 => format!("Loss: {} won", amount),
        _ => "Break-even".to_string(),
    }
}

pub fn display_summary(summary: &ResultSummary) {
    let net_color = if summary.is_profit() { Color::Green } else { Color::Red };

    let mut table = new_table();
    table.set_header(vec!["Tickets", "Total stake", "Total prize", "Return rate", "Win rate", "Net"]);
    table.add_row(vec![
        Cell::new(summary.ticket_count),
        Cell::new(format_won(summary.total_stake)),
        Cell::new(format_won(summary.total_prize)),
        rate_cell(summary.return_rate),
        Cell::new(format!(
            "{:.1}% ({}/{})",
            summary.win_rate(),
            summary.winning_tickets(),
            summary.ticket_count
        )),
        Cell::new(net_line(summary.net())).fg(net_color),
    ]);
    println!("\n{table}");

    let counts: Vec<(Rank, u32)> = Rank::ALL.iter().map(|&r| (r, summary.rank_count(r))).collect();
    display_rank_counts(&counts, summary.ticket_count as u64);
}

pub fn display_result(result: &LottoResult) {
    println!("\nResult for purchase #{}", result.purchase_id);
    println!("Total stake : {}", format_won(result.purchase_amount));
    println!("Total prize : {}", format_won(result.total_prize));
    println!("Return rate : {:.1}%", result.return_rate);

    let counts: Vec<(Rank, u32)> = Rank::ALL.iter().map(|&r| (r, result.rank_count(r))).collect();
    let total = counts.iter().map(|(_, c)| *c as u64).sum();
    display_rank_counts(&counts, total);

    println!("{}", net_line(result.net()));
}

pub fn display_statistics(stats: &Statistics) {
    println!("\nStatistics over {} checked purchases\n", stats.total_samples);
    println!("Average return rate : {:.1}%", stats.average_return_rate);

    let counts: Vec<(Rank, u32)> = Rank::ALL.iter().map(|&r| (r, stats.rank_count(r))).collect();
    let total = stats.total_tickets();
    display_rank_counts(&counts, total);

    if total > 0 {
        println!("Win rate: {:.1}%", stats.win_rate());
    }
}

fn display_rank_counts(counts: &[(Rank, u32)], total: u64) {
    let mut table = new_table();
    table.set_header(vec!["Rank", "Count", "Share"]);
    for &(rank, count) in counts {
        let share = if total > 0 {
            format!("{:.1}%", count as f64 / total as f64 * 100.0)
        } else {
            "—".to_string()
        };
        table.add_row(vec![
            Cell::new(rank.display_name()).fg(rank_color(rank)),
            Cell::new(count),
            Cell::new(share),
        ]);
    }
    println!("{table}");
}

pub fn display_quick_picks(tickets: &[Ticket]) {
    let mut table = new_table();
    table.set_header(vec!["#", "Numbers"]);
    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(vec![ticket_label(i), ticket.to_string()]);
    }
    println!("{table}");
}

pub fn display_config(config: &ClientConfig) {
    let mut table = new_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["base_url".to_string(), config.base_url.clone()]);
    table.add_row(vec!["timeout_secs".to_string(), config.timeout_secs.to_string()]);
    table.add_row(vec!["ticket_price".to_string(), format_won(config.ticket_price)]);
    for rank in Rank::ALL.into_iter().filter(|r| r.is_winning()) {
        table.add_row(vec![
            format!("prize {}", rank.label()),
            format_won(config.prizes.prize(rank)),
        ]);
    }
    println!("{table}");
}

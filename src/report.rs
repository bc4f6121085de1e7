//! Human-readable and CSV renderings of draw results.

use std::fmt::Write as _;
use std::io;

use serde::Serialize;

use crate::config::GameConfig;
use crate::draw::DrawResult;
use crate::game::Player;
use crate::money::Money;

pub fn render_welcome(player: &Player, config: &GameConfig) -> String {
    format!(
        "Welcome to the Lottery, Player {}!\n* Your digital balance: {}\n* Ticket Price: {} each",
        player.id, player.balance, config.ticket_price
    )
}

pub fn render_other_players(cpu_players: usize) -> String {
    format!("{cpu_players} other CPU players also have purchased tickets.")
}

/// One line per paying tier, then a sign-off.
pub fn render_draw_results(result: &DrawResult) -> String {
    let mut out = String::from("Ticket Draw Results:\n\n");
    for tier in &result.tier_results {
        let _ = write!(out, "* {}: ", tier.tier_name);
        if let [only] = tier.tickets_won.as_slice() {
            let _ = write!(out, "Player {} wins {}!", only.player_id, tier.revenue_per_ticket);
        } else {
            let players: Vec<String> = tier
                .winning_players()
                .iter()
                .map(ToString::to_string)
                .collect();
            let _ = write!(
                out,
                "Players {} win {} each!, per winning ticket.",
                players.join(", "),
                tier.revenue_per_ticket
            );
        }
        out.push('\n');
    }
    out.push_str("\nCongratulations to the winners!");
    out
}

pub fn render_house_revenue(revenue: Money) -> String {
    format!("House Revenue: {revenue}")
}

pub fn render_balance(balance: Money) -> String {
    format!("Remaining Balance: {balance}")
}

#[derive(Debug, Serialize)]
struct WinningTicketRow<'a> {
    tier: &'a str,
    ticket_id: String,
    player_id: u32,
    revenue_per_ticket: Money,
}

/// Writes one CSV row per winning ticket.
pub fn write_csv<W: io::Write>(result: &DrawResult, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for tier in &result.tier_results {
        for ticket in &tier.tickets_won {
            csv_writer.serialize(WinningTicketRow {
                tier: &tier.tier_name,
                ticket_id: ticket.id.to_string(),
                player_id: ticket.player_id.0,
                revenue_per_ticket: tier.revenue_per_ticket,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

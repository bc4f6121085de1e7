//! Draw engine: runs prize tiers over a shrinking ticket pool and reconciles
//! revenue between winners and the house.
//!
//! Accounting is in whole cents. For every draw
//! `total_revenue == house_revenue + Σ tickets_won.len() * revenue_per_ticket`
//! holds exactly; split remainders fall to the house.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::GameConfig;
use crate::draw::rng::{RandomSource, Rng};
use crate::draw::tier::TierPrize;
use crate::game::{PlayerId, Ticket, TicketId};
use crate::money::{Money, FULL_SHARE_BASIS_POINTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Engine built without the configuration it needs (e.g. no tiers).
    Configuration(String),
    /// Distinct players in the pool fall outside the configured bounds.
    PlayerCountOutOfRange { players: usize, min: u32, max: u32 },
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "invalid draw configuration: {msg}"),
            Self::PlayerCountOutOfRange { min, max, .. } => write!(
                f,
                "There should only be between {min} and {max} playing at one time."
            ),
        }
    }
}

impl std::error::Error for DrawError {}

/// Winners of one tier in one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierResult {
    /// Position of the tier in the configured list.
    pub tier_index: usize,
    pub tier_name: String,
    pub tickets_won: Vec<Ticket>,
    pub revenue_per_ticket: Money,
}

impl TierResult {
    pub fn payout(&self) -> Money {
        self.revenue_per_ticket * self.tickets_won.len()
    }

    /// Distinct winning players in first-win order.
    pub fn winning_players(&self) -> Vec<PlayerId> {
        let mut seen = HashSet::new();
        self.tickets_won
            .iter()
            .map(|t| t.player_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Outcome of a draw. Tiers that picked nobody have no entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawResult {
    pub tier_results: Vec<TierResult>,
    pub total_revenue: Money,
    pub house_revenue: Money,
}

impl DrawResult {
    pub fn tier(&self, name: &str) -> Option<&TierResult> {
        self.tier_results.iter().find(|r| r.tier_name == name)
    }

    pub fn tier_at(&self, index: usize) -> Option<&TierResult> {
        self.tier_results.iter().find(|r| r.tier_index == index)
    }

    pub fn total_winnings(&self) -> Money {
        self.tier_results.iter().map(TierResult::payout).sum()
    }

    pub fn winning_ticket_count(&self) -> usize {
        self.tier_results.iter().map(|r| r.tickets_won.len()).sum()
    }
}

/// Holds the configuration for a game and runs draws against it. Keeps no
/// per-draw state, so one engine can serve any number of draws or threads.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    config: GameConfig,
    tiers: Vec<TierPrize>,
}

impl DrawEngine {
    pub fn new(config: GameConfig, tiers: Vec<TierPrize>) -> Result<Self, DrawError> {
        check_tiers(&tiers)?;
        Ok(Self { config, tiers })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tiers(&self) -> &[TierPrize] {
        &self.tiers
    }

    /// Draws with a freshly seeded generator.
    pub fn draw_winners(&self, tickets: &[Ticket]) -> Result<DrawResult, DrawError> {
        self.draw_winners_with(tickets, &mut Rng::from_entropy())
    }

    pub fn draw_winners_with<R: RandomSource>(
        &self,
        tickets: &[Ticket],
        rng: &mut R,
    ) -> Result<DrawResult, DrawError> {
        draw_winners(&self.config, &self.tiers, tickets, rng)
    }
}

pub fn distinct_player_count(tickets: &[Ticket]) -> usize {
    tickets
        .iter()
        .map(|t| t.player_id)
        .collect::<HashSet<_>>()
        .len()
}

/// Tiers must exist and their shares together may not promise more than the
/// whole pot.
fn check_tiers(tiers: &[TierPrize]) -> Result<(), DrawError> {
    if tiers.is_empty() {
        return Err(DrawError::Configuration(
            "at least one prize tier is required".to_string(),
        ));
    }
    let total: u64 = tiers.iter().map(|t| u64::from(t.share.basis_points())).sum();
    if total > u64::from(FULL_SHARE_BASIS_POINTS) {
        return Err(DrawError::Configuration(format!(
            "tier shares add up to {:.2}%, more than 100%",
            total as f64 / 100.0
        )));
    }
    Ok(())
}

/// Runs one draw over `tickets`, tiers in order, each drawing from whatever the
/// earlier tiers left behind.
pub fn draw_winners<R: RandomSource>(
    config: &GameConfig,
    tiers: &[TierPrize],
    tickets: &[Ticket],
    rng: &mut R,
) -> Result<DrawResult, DrawError> {
    check_tiers(tiers)?;

    let players = distinct_player_count(tickets);
    if players < config.min_players as usize || players > config.max_players as usize {
        return Err(DrawError::PlayerCountOutOfRange {
            players,
            min: config.min_players,
            max: config.max_players,
        });
    }

    let total_revenue = config.ticket_price * tickets.len();
    let mut pool: Vec<Ticket> = tickets.to_vec();
    let mut tier_results = Vec::new();
    let mut winnings = Money::ZERO;

    for (tier_index, tier) in tiers.iter().enumerate() {
        let winners = tier.select_winners(&pool, rng);
        if winners.is_empty() {
            continue;
        }

        let revenue_per_ticket = tier.share.split(total_revenue, winners.len());
        winnings += revenue_per_ticket * winners.len();

        let won: HashSet<TicketId> = winners.iter().map(|t| t.id).collect();
        pool.retain(|t| !won.contains(&t.id));

        tier_results.push(TierResult {
            tier_index,
            tier_name: tier.name.clone(),
            tickets_won: winners,
            revenue_per_ticket,
        });
    }

    Ok(DrawResult {
        tier_results,
        total_revenue,
        house_revenue: total_revenue - winnings,
    })
}

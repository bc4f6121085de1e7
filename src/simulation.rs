//! Monte Carlo over many independent draws: how much the house keeps and how
//! often each tier actually pays out for a given player/ticket shape.

use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::GameConfig;
use crate::draw::{draw_winners, DrawError, DrawResult, Rng, TierPrize};
use crate::game::{round_robin_tickets, GameId, Ticket};
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    pub players: u32,
    pub tickets_per_player: usize,
    pub draws: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierHitRate {
    pub tier: String,
    /// Fraction of draws in which the tier had at least one winner.
    pub hit_rate: f64,
    pub mean_winners: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub draws: usize,
    pub tickets_per_draw: usize,
    pub revenue_per_draw: Money,
    pub mean_house_revenue: f64,
    pub min_house_revenue: Money,
    pub max_house_revenue: Money,
    /// Mean of house revenue / total revenue.
    pub mean_house_edge: f64,
    pub tiers: Vec<TierHitRate>,
}

pub fn simulate_draws(
    config: &GameConfig,
    tiers: &[TierPrize],
    params: SimulationParams,
) -> Result<SimulationSummary, DrawError> {
    run_simulation(config, tiers, params, false)
}

/// Like [simulate_draws] but spreads draws across Rayon workers. Each draw gets its
/// own generator seeded from `seed + index`, so results match the sequential run.
pub fn simulate_draws_parallel(
    config: &GameConfig,
    tiers: &[TierPrize],
    params: SimulationParams,
) -> Result<SimulationSummary, DrawError> {
    run_simulation(config, tiers, params, true)
}

fn run_simulation(
    config: &GameConfig,
    tiers: &[TierPrize],
    params: SimulationParams,
    parallel: bool,
) -> Result<SimulationSummary, DrawError> {
    let tickets = simulation_tickets(&params);
    let results = if parallel {
        (0..params.draws)
            .into_par_iter()
            .map(|index| draw_at(config, tiers, &tickets, params.seed, index))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        draw_range(config, tiers, &tickets, params.seed, 0..params.draws)?
    };
    Ok(summarize(config, tiers, tickets.len(), &results))
}

/// The fixed pool every simulated draw runs over.
pub(crate) fn simulation_tickets(params: &SimulationParams) -> Vec<Ticket> {
    let ticket_count = params.players as usize * params.tickets_per_player;
    round_robin_tickets(params.players, ticket_count, GameId::new())
}

/// Draws `range` in order. Draw `i` is seeded with `seed + i` wherever it runs.
pub(crate) fn draw_range(
    config: &GameConfig,
    tiers: &[TierPrize],
    tickets: &[Ticket],
    seed: u64,
    range: Range<usize>,
) -> Result<Vec<DrawResult>, DrawError> {
    range
        .map(|index| draw_at(config, tiers, tickets, seed, index))
        .collect()
}

fn draw_at(
    config: &GameConfig,
    tiers: &[TierPrize],
    tickets: &[Ticket],
    seed: u64,
    index: usize,
) -> Result<DrawResult, DrawError> {
    let mut rng = Rng::new(seed.wrapping_add(index as u64));
    draw_winners(config, tiers, tickets, &mut rng)
}

pub(crate) fn summarize(
    config: &GameConfig,
    tiers: &[TierPrize],
    tickets_per_draw: usize,
    results: &[DrawResult],
) -> SimulationSummary {
    let revenue_per_draw = config.ticket_price * tickets_per_draw;
    let draws = results.len();
    let per_draw = |total: f64| if draws == 0 { 0.0 } else { total / draws as f64 };

    let house_total: f64 = results.iter().map(|r| r.house_revenue.as_f64()).sum();
    let edge_total: f64 = results
        .iter()
        .filter(|r| r.total_revenue > Money::ZERO)
        .map(|r| r.house_revenue.as_f64() / r.total_revenue.as_f64())
        .sum();

    let tier_rates = tiers
        .iter()
        .enumerate()
        .map(|(index, tier)| {
            let hits: Vec<usize> = results
                .iter()
                .filter_map(|r| r.tier_at(index).map(|t| t.tickets_won.len()))
                .collect();
            TierHitRate {
                tier: tier.name.clone(),
                hit_rate: per_draw(hits.len() as f64),
                mean_winners: per_draw(hits.iter().sum::<usize>() as f64),
            }
        })
        .collect();

    SimulationSummary {
        draws,
        tickets_per_draw,
        revenue_per_draw,
        mean_house_revenue: per_draw(house_total),
        min_house_revenue: results.iter().map(|r| r.house_revenue).min().unwrap_or_default(),
        max_house_revenue: results.iter().map(|r| r.house_revenue).max().unwrap_or_default(),
        mean_house_edge: per_draw(edge_total),
        tiers: tier_rates,
    }
}

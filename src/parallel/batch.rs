//! Splits a simulation into per-worker batches of draws.

use std::ops::Range;

use rayon::prelude::*;

use crate::config::GameConfig;
use crate::draw::{DrawError, TierPrize};
use crate::parallel::pool::WorkerPool;
use crate::simulation::{draw_range, simulation_tickets, summarize, SimulationParams, SimulationSummary};

/// Cuts `draws` into at most `batches` contiguous index ranges, sizes differing
/// by at most one with the larger ones first.
///
/// # Example
/// ```
/// # use lottery::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn batch_ranges(draws: usize, batches: usize) -> Vec<Range<usize>> {
    if draws == 0 || batches == 0 {
        return Vec::new();
    }
    let batches = batches.min(draws);
    let (base, extra) = (draws / batches, draws % batches);
    (0..batches)
        .scan(0, |start, batch| {
            let end = *start + base + usize::from(batch < extra);
            let range = *start..end;
            *start = end;
            Some(range)
        })
        .collect()
}

/// Runs the simulation inside `pool`, one batch of draws per worker. Seeds follow
/// the draw index, so the summary matches [crate::simulation::simulate_draws].
pub fn run_simulation_batches(
    config: &GameConfig,
    tiers: &[TierPrize],
    params: SimulationParams,
    pool: &WorkerPool,
) -> Result<SimulationSummary, DrawError> {
    let tickets = simulation_tickets(&params);
    let batches = pool.install(|| {
        batch_ranges(params.draws, rayon::current_num_threads())
            .into_par_iter()
            .map(|range| draw_range(config, tiers, &tickets, params.seed, range))
            .collect::<Result<Vec<_>, _>>()
    })?;
    let results: Vec<_> = batches.into_iter().flatten().collect();
    Ok(summarize(config, tiers, tickets.len(), &results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::simulation::simulate_draws;

    fn config() -> GameConfig {
        GameConfig {
            min_players: 1,
            max_players: 10,
            ticket_price: Money::from_cents(133),
            ..GameConfig::default()
        }
    }

    #[test]
    fn batches_cover_every_draw_once() {
        let ranges = batch_ranges(103, 4);
        assert_eq!(ranges, vec![0..26, 26..52, 52..78, 78..103]);
        assert_eq!(ranges.iter().map(ExactSizeIterator::len).sum::<usize>(), 103);
    }

    #[test]
    fn fewer_draws_than_workers_gives_single_draw_batches() {
        assert_eq!(batch_ranges(3, 8), vec![0..1, 1..2, 2..3]);
        assert!(batch_ranges(0, 8).is_empty());
        assert!(batch_ranges(5, 0).is_empty());
    }

    #[test]
    fn batched_run_matches_sequential_summary() {
        let tiers = crate::draw::TierPrize::standard_tiers();
        let params = SimulationParams {
            players: 7,
            tickets_per_player: 5,
            draws: 41,
            seed: 99,
        };
        let sequential = simulate_draws(&config(), &tiers, params).unwrap();
        for workers in [1, 3, 8] {
            let batched =
                run_simulation_batches(&config(), &tiers, params, &WorkerPool::with_workers(workers))
                    .unwrap();
            assert_eq!(batched, sequential);
        }
    }
}

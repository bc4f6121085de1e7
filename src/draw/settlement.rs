use std::collections::BTreeMap;

use crate::draw::engine::DrawResult;
use crate::game::PlayerId;
use crate::money::Money;

/// What each winning player is owed: one `revenue_per_ticket` per winning ticket,
/// summed across tiers.
pub fn player_winnings(result: &DrawResult) -> BTreeMap<PlayerId, Money> {
    let mut totals = BTreeMap::new();
    for tier in &result.tier_results {
        for ticket in &tier.tickets_won {
            *totals.entry(ticket.player_id).or_insert(Money::ZERO) += tier.revenue_per_ticket;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::engine::TierResult;
    use crate::game::{GameId, Ticket};

    #[test]
    fn sums_per_player_across_tiers() {
        let game = GameId::new();
        let p1 = Ticket::issue(PlayerId(1), game);
        let p1_again = Ticket::issue(PlayerId(1), game);
        let p2 = Ticket::issue(PlayerId(2), game);
        let result = DrawResult {
            tier_results: vec![
                TierResult {
                    tier_index: 0,
                    tier_name: "Grand Prize".to_string(),
                    tickets_won: vec![p1],
                    revenue_per_ticket: Money::from_cents(500),
                },
                TierResult {
                    tier_index: 1,
                    tier_name: "Second Prize".to_string(),
                    tickets_won: vec![p1_again, p2],
                    revenue_per_ticket: Money::from_cents(150),
                },
            ],
            total_revenue: Money::from_cents(1_000),
            house_revenue: Money::from_cents(200),
        };

        let totals = player_winnings(&result);
        assert_eq!(totals.get(&PlayerId(1)), Some(&Money::from_cents(650)));
        assert_eq!(totals.get(&PlayerId(2)), Some(&Money::from_cents(150)));
        assert_eq!(totals.values().copied().sum::<Money>(), result.total_winnings());
    }
}

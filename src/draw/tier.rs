//! Prize tiers: a revenue share plus a rule for how many tickets win.

use serde::{Deserialize, Serialize};

use crate::draw::rng::RandomSource;
use crate::game::Ticket;
use crate::money::{ShareBasisPoints, FULL_SHARE_BASIS_POINTS};

/// How many tickets a tier picks from the pool it is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerRule {
    /// Exactly `n` winners, or the whole pool if it is smaller.
    Fixed(usize),
    /// A fraction of the pool size, rounded half to even.
    PercentOfPool(ShareBasisPoints),
}

impl WinnerRule {
    pub fn winner_count(self, pool_len: usize) -> usize {
        match self {
            Self::Fixed(n) => n.min(pool_len),
            Self::PercentOfPool(share) => round_half_even(
                pool_len as u64 * share.basis_points() as u64,
                FULL_SHARE_BASIS_POINTS as u64,
            ) as usize,
        }
    }
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
fn round_half_even(numerator: u64, denominator: u64) -> u64 {
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * 2;
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// A prize bracket. Stateless: the same list can drive any number of draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPrize {
    pub name: String,
    pub share: ShareBasisPoints,
    pub rule: WinnerRule,
}

impl TierPrize {
    pub fn custom(name: impl Into<String>, share: ShareBasisPoints, rule: WinnerRule) -> Self {
        Self {
            name: name.into(),
            share,
            rule,
        }
    }

    /// 50% of revenue to a single ticket.
    pub fn grand() -> Self {
        Self::custom("Grand Prize", ShareBasisPoints::from_percent(50), WinnerRule::Fixed(1))
    }

    /// 30% of revenue shared by 10% of the remaining pool.
    pub fn second() -> Self {
        Self::custom(
            "Second Prize",
            ShareBasisPoints::from_percent(30),
            WinnerRule::PercentOfPool(ShareBasisPoints::from_percent(10)),
        )
    }

    /// 10% of revenue shared by 20% of the remaining pool.
    pub fn third() -> Self {
        Self::custom(
            "Third Prize",
            ShareBasisPoints::from_percent(10),
            WinnerRule::PercentOfPool(ShareBasisPoints::from_percent(20)),
        )
    }

    pub fn standard_tiers() -> Vec<TierPrize> {
        vec![Self::grand(), Self::second(), Self::third()]
    }

    pub fn share_percentage(&self) -> f64 {
        self.share.as_percent()
    }

    /// Picks this tier's winners from `pool`. Never mutates the pool; the result is a
    /// duplicate-free subset no larger than the pool.
    pub fn select_winners<R: RandomSource>(&self, pool: &[Ticket], rng: &mut R) -> Vec<Ticket> {
        rng.sample(pool, self.rule.winner_count(pool.len()))
    }
}

/// Serialized description of a tier as it appears in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    pub name: String,
    pub share_percent: f64,
    pub winners: WinnerSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerSpec {
    Fixed(usize),
    PercentOfPool(f64),
}

impl TierSpec {
    /// `None` when a percentage falls outside `[0, 100]`.
    pub fn to_tier(&self) -> Option<TierPrize> {
        let share = ShareBasisPoints::from_percent_f64(self.share_percent)?;
        let rule = match self.winners {
            WinnerSpec::Fixed(n) => WinnerRule::Fixed(n),
            WinnerSpec::PercentOfPool(p) => {
                WinnerRule::PercentOfPool(ShareBasisPoints::from_percent_f64(p)?)
            }
        };
        Some(TierPrize::custom(self.name.clone(), share, rule))
    }
}

impl From<&TierPrize> for TierSpec {
    fn from(tier: &TierPrize) -> Self {
        Self {
            name: tier.name.clone(),
            share_percent: tier.share.as_percent(),
            winners: match tier.rule {
                WinnerRule::Fixed(n) => WinnerSpec::Fixed(n),
                WinnerRule::PercentOfPool(share) => WinnerSpec::PercentOfPool(share.as_percent()),
            },
        }
    }
}

pub fn standard_tier_specs() -> Vec<TierSpec> {
    TierPrize::standard_tiers().iter().map(TierSpec::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::rng::Rng;
    use crate::game::{round_robin_tickets, GameId};

    #[test]
    fn percent_rule_rounds_half_to_even() {
        let ten = WinnerRule::PercentOfPool(ShareBasisPoints::from_percent(10));
        assert_eq!(ten.winner_count(5), 0);
        assert_eq!(ten.winner_count(15), 2);
        assert_eq!(ten.winner_count(25), 2);
        assert_eq!(ten.winner_count(20), 2);
        assert_eq!(ten.winner_count(4), 0);
        assert_eq!(ten.winner_count(6), 1);

        let twenty = WinnerRule::PercentOfPool(ShareBasisPoints::from_percent(20));
        assert_eq!(twenty.winner_count(20), 4);
        assert_eq!(twenty.winner_count(2), 0);
        assert_eq!(twenty.winner_count(3), 1);
    }

    #[test]
    fn fixed_rule_caps_at_pool() {
        assert_eq!(WinnerRule::Fixed(2).winner_count(1), 1);
        assert_eq!(WinnerRule::Fixed(1).winner_count(0), 0);
    }

    #[test]
    fn standard_tier_table() {
        let tiers = TierPrize::standard_tiers();
        let shares: Vec<f64> = tiers.iter().map(TierPrize::share_percentage).collect();
        assert_eq!(shares, vec![50.0, 30.0, 10.0]);
        assert_eq!(tiers[0].name, "Grand Prize");
    }

    #[test]
    fn select_winners_does_not_touch_pool() {
        let pool = round_robin_tickets(4, 20, GameId::new());
        let before = pool.clone();
        let winners = TierPrize::third().select_winners(&pool, &mut Rng::new(8));
        assert_eq!(winners.len(), 4);
        assert_eq!(pool, before);
    }

    #[test]
    fn tier_spec_round_trip_preserves_tier() {
        for tier in TierPrize::standard_tiers() {
            assert_eq!(TierSpec::from(&tier).to_tier(), Some(tier));
        }
        let bad = TierSpec {
            name: "Too Much".to_string(),
            share_percent: 120.0,
            winners: WinnerSpec::Fixed(1),
        };
        assert_eq!(bad.to_tier(), None);
    }

    #[test]
    fn tier_spec_reads_from_yaml() {
        let spec: TierSpec = serde_yaml::from_str(
            "name: Bonus\nshare_percent: 5\nwinners:\n  percent_of_pool: 2.5\n",
        )
        .unwrap();
        let tier = spec.to_tier().unwrap();
        assert_eq!(tier.share, ShareBasisPoints(500));
        assert_eq!(tier.rule, WinnerRule::PercentOfPool(ShareBasisPoints(250)));
    }
}

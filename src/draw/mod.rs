pub mod engine;
pub mod rng;
pub mod settlement;
pub mod tier;

pub use engine::{
    distinct_player_count, draw_winners, DrawEngine, DrawError, DrawResult, TierResult,
};
pub use rng::{RandomSource, Rng};
pub use settlement::player_winnings;
pub use tier::{standard_tier_specs, TierPrize, TierSpec, WinnerRule, WinnerSpec};

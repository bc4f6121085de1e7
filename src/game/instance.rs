use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::GameId;
use crate::money::Money;

/// One game's lifetime record: when it ran and what the house kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameInstance {
    pub id: GameId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub house_revenue: Money,
}

impl GameInstance {
    pub fn start() -> Self {
        Self {
            id: GameId::new(),
            started_at: Utc::now(),
            ended_at: None,
            house_revenue: Money::ZERO,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn close(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Utc::now());
        }
    }
}

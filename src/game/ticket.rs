use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub Uuid);

impl TicketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchased entry in one game. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub purchased_at: DateTime<Utc>,
}

impl Ticket {
    pub fn issue(player_id: PlayerId, game_id: GameId) -> Self {
        Self {
            id: TicketId::new(),
            game_id,
            player_id,
            purchased_at: Utc::now(),
        }
    }
}

/// Builds `count` tickets spread round-robin over players `1..=players`.
/// Handy for simulations and tests that don't go through a ticket office.
pub fn round_robin_tickets(players: u32, count: usize, game_id: GameId) -> Vec<Ticket> {
    if players == 0 {
        return Vec::new();
    }
    (0..count)
        .map(|i| Ticket::issue(PlayerId(i as u32 % players + 1), game_id))
        .collect()
}

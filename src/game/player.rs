//! In-memory player store and balance bookkeeping.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::game::PlayerId;
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidPlayerCount(usize),
    PlayerNotFound(PlayerId),
    NegativeBalance { player: PlayerId, balance: Money },
    InsufficientFunds { required: Money, balance: Money },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayerCount(n) => {
                write!(f, "the number of players must be greater than zero (got {n})")
            }
            Self::PlayerNotFound(id) => write!(f, "player {id} not found"),
            Self::NegativeBalance { player, balance } => write!(
                f,
                "player {player} balance cannot be negative (would be {balance})"
            ),
            Self::InsufficientFunds { required, balance } => write!(
                f,
                "Insufficient funds. Required: {required}, Current Balance: {balance}"
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone, Default)]
pub struct PlayerLedger {
    players: BTreeMap<PlayerId, Player>,
    next_id: u32,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_player(&mut self, balance: Money) -> Player {
        self.next_id += 1;
        let player = Player {
            id: PlayerId(self.next_id),
            balance,
        };
        self.players.insert(player.id, player.clone());
        player
    }

    pub fn create_players(&mut self, count: usize, balance: Money) -> Result<Vec<Player>, LedgerError> {
        if count == 0 {
            return Err(LedgerError::InvalidPlayerCount(count));
        }
        Ok((0..count).map(|_| self.create_player(balance)).collect())
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Applies `delta` to a balance. Rejected, leaving the balance as it was, if the
    /// result would go negative.
    pub fn update_balance(&mut self, id: PlayerId, delta: Money) -> Result<Player, LedgerError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(LedgerError::PlayerNotFound(id))?;
        let balance = player.balance + delta;
        if balance.is_negative() {
            return Err(LedgerError::NegativeBalance { player: id, balance });
        }
        player.balance = balance;
        Ok(player.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut ledger = PlayerLedger::new();
        let players = ledger.create_players(3, Money::from_cents(1_000)).unwrap();
        let ids: Vec<u32> = players.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ledger.create_player(Money::ZERO).id, PlayerId(4));
    }

    #[test]
    fn zero_players_is_rejected() {
        let mut ledger = PlayerLedger::new();
        assert_eq!(
            ledger.create_players(0, Money::ZERO),
            Err(LedgerError::InvalidPlayerCount(0))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn negative_result_leaves_balance_untouched() {
        let mut ledger = PlayerLedger::new();
        let player = ledger.create_player(Money::from_cents(100));
        let err = ledger.update_balance(player.id, Money::from_cents(-150)).unwrap_err();
        assert!(matches!(err, LedgerError::NegativeBalance { .. }));
        assert_eq!(ledger.get(player.id).unwrap().balance, Money::from_cents(100));

        let updated = ledger.update_balance(player.id, Money::from_cents(-100)).unwrap();
        assert_eq!(updated.balance, Money::ZERO);
    }

    #[test]
    fn unknown_player_is_reported() {
        let mut ledger = PlayerLedger::new();
        assert_eq!(
            ledger.update_balance(PlayerId(9), Money::from_cents(1)),
            Err(LedgerError::PlayerNotFound(PlayerId(9)))
        );
    }

    #[test]
    fn insufficient_funds_message() {
        let err = LedgerError::InsufficientFunds {
            required: Money::from_cents(100),
            balance: Money::from_cents(50),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds. Required: $1.00, Current Balance: $0.50"
        );
    }
}

use crate::game::player::{LedgerError, PlayerLedger};
use crate::game::{GameId, PlayerId, Ticket};
use crate::money::Money;

/// Issues tickets against player balances and keeps every ticket sold.
#[derive(Debug, Clone)]
pub struct TicketOffice {
    ticket_price: Money,
    issued: Vec<Ticket>,
}

impl TicketOffice {
    pub fn new(ticket_price: Money) -> Self {
        Self {
            ticket_price,
            issued: Vec::new(),
        }
    }

    pub fn ticket_price(&self) -> Money {
        self.ticket_price
    }

    /// Sells up to `requested` tickets, capped by what the player can afford, and
    /// debits the player. Fails if not even one ticket is affordable.
    pub fn buy_tickets(
        &mut self,
        ledger: &mut PlayerLedger,
        player_id: PlayerId,
        game_id: GameId,
        requested: usize,
    ) -> Result<Vec<Ticket>, LedgerError> {
        let balance = ledger
            .get(player_id)
            .ok_or(LedgerError::PlayerNotFound(player_id))?
            .balance;
        if balance < self.ticket_price {
            return Err(LedgerError::InsufficientFunds {
                required: self.ticket_price,
                balance,
            });
        }

        let count = requested.min(balance.units_affordable(self.ticket_price));
        ledger.update_balance(player_id, -(self.ticket_price * count))?;

        let tickets: Vec<Ticket> = (0..count).map(|_| Ticket::issue(player_id, game_id)).collect();
        self.issued.extend(tickets.iter().cloned());
        Ok(tickets)
    }

    pub fn tickets_for_game(&self, game_id: GameId) -> Vec<Ticket> {
        self.issued
            .iter()
            .filter(|t| t.game_id == game_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(balance_cents: i64) -> (PlayerLedger, TicketOffice, PlayerId) {
        let mut ledger = PlayerLedger::new();
        let player = ledger.create_player(Money::from_cents(balance_cents));
        (ledger, TicketOffice::new(Money::from_cents(100)), player.id)
    }

    #[test]
    fn buys_requested_tickets_and_debits() {
        let (mut ledger, mut office, player) = setup(1_000);
        let game = GameId::new();
        let tickets = office.buy_tickets(&mut ledger, player, game, 4).unwrap();
        assert_eq!(tickets.len(), 4);
        assert_eq!(ledger.get(player).unwrap().balance, Money::from_cents(600));
        assert_eq!(office.tickets_for_game(game).len(), 4);
        assert!(office.tickets_for_game(GameId::new()).is_empty());
    }

    #[test]
    fn caps_at_affordable_count() {
        let (mut ledger, mut office, player) = setup(350);
        let tickets = office.buy_tickets(&mut ledger, player, GameId::new(), 10).unwrap();
        assert_eq!(tickets.len(), 3);
        assert_eq!(ledger.get(player).unwrap().balance, Money::from_cents(50));
    }

    #[test]
    fn cannot_afford_one_ticket() {
        let (mut ledger, mut office, player) = setup(99);
        let err = office.buy_tickets(&mut ledger, player, GameId::new(), 1).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                required: Money::from_cents(100),
                balance: Money::from_cents(99),
            }
        );
        assert_eq!(ledger.get(player).unwrap().balance, Money::from_cents(99));
    }

    #[test]
    fn unknown_player() {
        let (mut ledger, mut office, _) = setup(1_000);
        let err = office.buy_tickets(&mut ledger, PlayerId(42), GameId::new(), 1).unwrap_err();
        assert_eq!(err, LedgerError::PlayerNotFound(PlayerId(42)));
    }
}

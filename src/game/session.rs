//! Game session: sells tickets to a human and CPU players, runs the draw,
//! credits winners and books the house take on the game record.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::draw::{player_winnings, DrawEngine, DrawError, DrawResult, RandomSource, Rng, TierPrize};
use crate::game::instance::GameInstance;
use crate::game::player::{LedgerError, Player, PlayerLedger};
use crate::game::tickets::TicketOffice;
use crate::game::{PlayerId, Ticket};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Draw(DrawError),
    Ledger(LedgerError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw(err) => write!(f, "{err}"),
            Self::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<DrawError> for SessionError {
    fn from(err: DrawError) -> Self {
        Self::Draw(err)
    }
}

impl From<LedgerError> for SessionError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub draw: DrawResult,
    pub winnings: BTreeMap<PlayerId, Money>,
    pub cpu_players: usize,
    pub human_balance: Money,
}

pub struct GameSession {
    engine: DrawEngine,
    ledger: PlayerLedger,
    office: TicketOffice,
    game: GameInstance,
    finished: Vec<GameInstance>,
    rng: Rng,
}

impl GameSession {
    pub fn new(config: GameConfig, tiers: Vec<TierPrize>, seed: Option<u64>) -> Result<Self, SessionError> {
        let office = TicketOffice::new(config.ticket_price);
        let engine = DrawEngine::new(config, tiers)?;
        let rng = seed.map(Rng::new).unwrap_or_else(Rng::from_entropy);
        Ok(Self {
            engine,
            ledger: PlayerLedger::new(),
            office,
            game: GameInstance::start(),
            finished: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn tiers(&self) -> &[TierPrize] {
        self.engine.tiers()
    }

    pub fn ledger(&self) -> &PlayerLedger {
        &self.ledger
    }

    pub fn current_game(&self) -> &GameInstance {
        &self.game
    }

    pub fn finished_games(&self) -> &[GameInstance] {
        &self.finished
    }

    /// Tickets sold so far in the open game.
    pub fn current_tickets(&self) -> Vec<Ticket> {
        self.office.tickets_for_game(self.game.id)
    }

    pub fn create_player(&mut self) -> Player {
        self.ledger.create_player(self.config().default_player_balance)
    }

    /// CPU opponents for a round: between `min_players` and `max_players - 1`, so the
    /// human still fits under the cap.
    pub fn random_cpu_player_count(&mut self) -> usize {
        let min = self.config().min_players as u64;
        let max = (self.config().max_players as u64).max(min + 1);
        (min + self.rng.below(max - min)) as usize
    }

    fn random_ticket_count(&mut self) -> usize {
        let min = self.config().min_tickets as u64;
        let max = (self.config().max_tickets as u64).max(min);
        (min + self.rng.below(max - min + 1)) as usize
    }

    /// Plays one round against a random number of CPU players.
    pub fn play_round(&mut self, human: PlayerId, requested: usize) -> Result<RoundOutcome, SessionError> {
        let cpu_players = self.random_cpu_player_count();
        self.play_round_with(human, requested, cpu_players)
    }

    /// Plays one round. Purchases only stick when the draw succeeds; on any error
    /// the ledger and ticket office are left as they were before the call.
    pub fn play_round_with(
        &mut self,
        human: PlayerId,
        requested: usize,
        cpu_players: usize,
    ) -> Result<RoundOutcome, SessionError> {
        let config = self.config();
        let seats = cpu_players.saturating_add(1);
        if seats < config.min_players as usize || seats > config.max_players as usize {
            return Err(DrawError::PlayerCountOutOfRange {
                players: seats,
                min: config.min_players,
                max: config.max_players,
            }
            .into());
        }

        let ledger = self.ledger.clone();
        let office = self.office.clone();
        match self.settle_round(human, requested, cpu_players) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(%err, "round abandoned, purchases rolled back");
                self.ledger = ledger;
                self.office = office;
                Err(err)
            }
        }
    }

    fn settle_round(
        &mut self,
        human: PlayerId,
        requested: usize,
        cpu_players: usize,
    ) -> Result<RoundOutcome, SessionError> {
        let game_id = self.game.id;
        self.office
            .buy_tickets(&mut self.ledger, human, game_id, requested)?;

        if cpu_players > 0 {
            let balance = self.config().default_player_balance;
            let cpus = self.ledger.create_players(cpu_players, balance)?;
            for cpu in cpus {
                let count = self.random_ticket_count();
                self.office.buy_tickets(&mut self.ledger, cpu.id, game_id, count)?;
            }
        }

        let tickets = self.office.tickets_for_game(game_id);
        let draw = self.engine.draw_winners_with(&tickets, &mut self.rng)?;
        for tier in &draw.tier_results {
            debug!(
                tier = %tier.tier_name,
                winners = tier.tickets_won.len(),
                per_ticket = %tier.revenue_per_ticket,
                "tier drawn"
            );
        }

        let winnings = player_winnings(&draw);
        for (player, amount) in &winnings {
            self.ledger.update_balance(*player, *amount)?;
        }
        self.game.house_revenue += draw.house_revenue;

        let human_balance = self
            .ledger
            .get(human)
            .map(|p| p.balance)
            .ok_or(LedgerError::PlayerNotFound(human))?;

        info!(
            game = %game_id,
            tickets = tickets.len(),
            cpu_players,
            house_revenue = %draw.house_revenue,
            "round complete"
        );

        Ok(RoundOutcome {
            draw,
            winnings,
            cpu_players,
            human_balance,
        })
    }

    /// Closes the current game and opens a fresh one. Players keep their balances.
    pub fn restart(&mut self) -> &GameInstance {
        let mut next = GameInstance::start();
        std::mem::swap(&mut self.game, &mut next);
        next.close();
        info!(game = %next.id, house_revenue = %next.house_revenue, "game closed");
        self.finished.push(next);
        &self.game
    }
}

pub mod instance;
pub mod player;
pub mod session;
pub mod ticket;
pub mod tickets;

pub use instance::GameInstance;
pub use player::{LedgerError, Player, PlayerLedger};
pub use session::{GameSession, RoundOutcome, SessionError};
pub use ticket::{round_robin_tickets, GameId, PlayerId, Ticket, TicketId};
pub use tickets::TicketOffice;

//! Interactive console game: line-oriented prompts over any reader/writer pair.

use std::io::{self, BufRead, Write};

use crate::game::{GameSession, LedgerError, PlayerId, SessionError};
use crate::report;

pub struct ConsoleUi<R, W> {
    input: R,
    output: W,
}

#[derive(Debug)]
pub enum ConsoleError {
    Io(io::Error),
    Session(SessionError),
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console I/O failed: {err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SessionError> for ConsoleError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl<R: BufRead, W: Write> ConsoleUi<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Reads integers until one parses. `None` on end of input.
    fn request_int(&mut self) -> io::Result<Option<i64>> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            match trimmed.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.show(&format!("{trimmed} is not a valid number."))?,
            }
        }
    }

    fn request_in_range(&mut self, min: i64, max: i64, complaint: &str) -> io::Result<Option<i64>> {
        loop {
            match self.request_int()? {
                Some(n) if (min..=max).contains(&n) => return Ok(Some(n)),
                Some(_) => self.show(complaint)?,
                None => return Ok(None),
            }
        }
    }

    fn request_ticket_count(&mut self, player: PlayerId, min: u32, max: u32) -> io::Result<Option<usize>> {
        self.show(&format!("How many tickets do you want to buy, Player {player}?"))?;
        let complaint = format!("Requested tickets must be between {min} and {max}.");
        Ok(self
            .request_in_range(min as i64, max as i64, &complaint)?
            .map(|n| n as usize))
    }

    fn request_replay(&mut self) -> io::Result<bool> {
        self.show("Thank you for playing, Would you like to:")?;
        self.show("1. Replay")?;
        self.show("2. Quit")?;
        Ok(self.request_in_range(1, 2, "Number must be 1 or 2.")? == Some(1))
    }

    /// Plays rounds until the player quits, runs out of input, or can't afford a ticket.
    pub fn run(&mut self, session: &mut GameSession) -> Result<(), ConsoleError> {
        let human = session.create_player();
        loop {
            let current = session
                .ledger()
                .get(human.id)
                .cloned()
                .unwrap_or_else(|| human.clone());
            self.show(&report::render_welcome(&current, session.config()))?;
            self.show("")?;

            let (min, max) = (session.config().min_tickets, session.config().max_tickets);
            let Some(requested) = self.request_ticket_count(human.id, min, max)? else {
                return Ok(());
            };

            let outcome = match session.play_round(human.id, requested) {
                Ok(outcome) => outcome,
                Err(SessionError::Ledger(err @ LedgerError::InsufficientFunds { .. })) => {
                    self.show(&err.to_string())?;
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            self.show("")?;
            self.show(&report::render_other_players(outcome.cpu_players))?;
            self.show("")?;
            self.show(&report::render_draw_results(&outcome.draw))?;
            self.show("")?;
            self.show(&report::render_house_revenue(outcome.draw.house_revenue))?;
            self.show("")?;
            self.show(&report::render_balance(outcome.human_balance))?;
            self.show("")?;

            if !self.request_replay()? {
                return Ok(());
            }
            session.restart();
        }
    }
}

use lottery::config::GameConfig;
use lottery::draw::{player_winnings, TierPrize};
use lottery::game::{GameSession, LedgerError, PlayerId, SessionError};
use lottery::money::Money;

fn session(seed: u64) -> GameSession {
    GameSession::new(GameConfig::default(), TierPrize::standard_tiers(), Some(seed)).unwrap()
}

#[test]
fn round_settles_winnings_and_keeps_money_conserved() {
    let mut session = session(21);
    let human = session.create_player();
    let starting = GameConfig::default().default_player_balance;

    let outcome = session.play_round_with(human.id, 5, 11).unwrap();

    // Every player started with the same balance; what left their pockets went
    // either back to winners or to the house.
    let players = session.ledger().len();
    assert_eq!(players, 12);
    let balances: Money = session.ledger().players().map(|p| p.balance).sum();
    assert_eq!(
        balances + session.current_game().house_revenue,
        starting * players
    );
    assert_eq!(outcome.cpu_players, 11);
    assert_eq!(outcome.draw.house_revenue, session.current_game().house_revenue);

    let expected_human = starting - Money::from_cents(500)
        + outcome.winnings.get(&human.id).copied().unwrap_or_default();
    assert_eq!(outcome.human_balance, expected_human);
    assert_eq!(outcome.winnings, player_winnings(&outcome.draw));
}

#[test]
fn random_cpu_count_leaves_room_for_the_human() {
    let mut session = session(3);
    let config = session.config().clone();
    for _ in 0..100 {
        let cpus = session.random_cpu_player_count() as u32;
        assert!(cpus >= config.min_players);
        assert!(cpus + 1 <= config.max_players);
    }
}

#[test]
fn broke_player_cannot_enter() {
    let config = GameConfig {
        default_player_balance: Money::from_cents(50),
        ..GameConfig::default()
    };
    let mut session = GameSession::new(config, TierPrize::standard_tiers(), Some(1)).unwrap();
    let human = session.create_player();

    let err = session.play_round(human.id, 3).unwrap_err();
    assert_eq!(
        err,
        SessionError::Ledger(LedgerError::InsufficientFunds {
            required: Money::from_cents(100),
            balance: Money::from_cents(50),
        })
    );
    assert_eq!(session.current_game().house_revenue, Money::ZERO);
}

#[test]
fn too_few_players_fails_the_draw_and_charges_nobody() {
    let mut session = session(5);
    let human = session.create_player();
    // 1 human + 2 CPUs is under the default minimum of 10.
    let err = session.play_round_with(human.id, 3, 2).unwrap_err();
    assert!(matches!(err, SessionError::Draw(_)));
    assert!(err.to_string().contains("between 10 and 15"));

    assert_eq!(session.ledger().len(), 1);
    assert_eq!(
        session.ledger().get(human.id).map(|p| p.balance),
        Some(GameConfig::default().default_player_balance)
    );
    assert!(session.current_tickets().is_empty());
    assert_eq!(session.current_game().house_revenue, Money::ZERO);
}

#[test]
fn retry_after_failed_round_only_draws_new_tickets() {
    let mut session = session(12);
    let human = session.create_player();
    assert!(session.play_round_with(human.id, 4, 30).is_err());

    let outcome = session.play_round_with(human.id, 2, 11).unwrap();
    let tickets = session.current_tickets();
    let human_tickets = tickets.iter().filter(|t| t.player_id == human.id).count();
    assert_eq!(human_tickets, 2);
    assert_eq!(
        outcome.draw.total_revenue,
        GameConfig::default().ticket_price * tickets.len()
    );
    assert_eq!(session.ledger().len(), 12);
}

#[test]
fn draw_failure_after_purchases_rolls_everything_back() {
    // CPUs that buy no tickets don't count as players, so the draw itself fails
    // after the human has already paid.
    let config = GameConfig {
        min_tickets: 0,
        max_tickets: 0,
        ..GameConfig::default()
    };
    let starting = config.default_player_balance;
    let mut session = GameSession::new(config, TierPrize::standard_tiers(), Some(6)).unwrap();
    let human = session.create_player();

    let err = session.play_round_with(human.id, 3, 10).unwrap_err();
    assert!(matches!(err, SessionError::Draw(_)));
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.ledger().get(human.id).map(|p| p.balance), Some(starting));
    assert!(session.current_tickets().is_empty());
}

#[test]
fn unknown_human_is_reported() {
    let mut session = session(5);
    let err = session.play_round_with(PlayerId(77), 1, 10).unwrap_err();
    assert_eq!(err, SessionError::Ledger(LedgerError::PlayerNotFound(PlayerId(77))));
}

#[test]
fn restart_archives_game_and_accumulates_separately() {
    let mut session = session(8);
    let human = session.create_player();
    session.play_round(human.id, 2).unwrap();
    let first_id = session.current_game().id;
    let first_revenue = session.current_game().house_revenue;

    let next_id = session.restart().id;
    assert_ne!(first_id, next_id);
    assert_eq!(session.current_game().house_revenue, Money::ZERO);
    assert_eq!(session.finished_games().len(), 1);
    assert_eq!(session.finished_games()[0].house_revenue, first_revenue);
    assert!(session.finished_games()[0].ended_at.is_some());

    session.play_round(human.id, 2).unwrap();
    assert!(session.current_game().is_open());
}

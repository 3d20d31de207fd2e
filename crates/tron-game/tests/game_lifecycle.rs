//! Integration tests for the game worker.
//!
//! Time is paused, so the select window and every tick resolve as soon as
//! the runtime is idle.

use std::sync::Arc;
use std::time::Duration;

use tron_arena::{Color, Direction, Obstacle, Point};
use tron_game::{
    Game, GameConfig, GameEvent, GameHandle, GameRunner, Mailbox, PlayerHandle, PlayerId,
};

// =========================================================================
// Helpers
// =========================================================================

/// Room for a full game's worth of snapshots.
const BIG_MAILBOX: usize = 1024;

fn fixed_config() -> GameConfig {
    GameConfig {
        shuffle_spawns: false,
        ..GameConfig::default()
    }
}

/// Seals a game with two players, returning its runner, handle and the
/// mailboxes in palette order.
fn two_player_game(config: GameConfig) -> (GameRunner, GameHandle, Vec<Mailbox>) {
    let mut game = Game::new(Arc::new(config), 2);
    let mut mailboxes = Vec::new();
    for id in 1..=2 {
        let (player, rx) = PlayerHandle::new(PlayerId(id), BIG_MAILBOX);
        game.add_player(player).expect("free color");
        mailboxes.push(rx);
    }
    assert!(game.is_ready());
    let handle = game.handle();
    (game.seal(), handle, mailboxes)
}

fn drain(rx: &mut Mailbox) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn trail_of(event: &GameEvent, color: Color) -> Vec<Point> {
    match event {
        GameEvent::Snapshot(snapshot) => snapshot.trails[&color].clone(),
        other => panic!("expected snapshot, got {other:?}"),
    }
}

// =========================================================================
// Running to completion
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_trail_blocking_another_wins() {
    // Both head right on y = 200; Blue runs into Red's trail at x = 666
    // on tick 332, a tick before Red would reach the wall.
    let (runner, _handle, mut mailboxes) = two_player_game(fixed_config());

    let outcome = runner.run().await;

    assert_eq!(outcome.winner, Some(Color::Red));
    assert_eq!(outcome.ticks, 332);
    assert_eq!(outcome.losers.len(), 1);
    assert_eq!(outcome.losers[0].color, Color::Blue);
    assert_eq!(outcome.losers[0].obstacle, Obstacle::Trail(Color::Red));

    for rx in &mut mailboxes {
        let events = drain(rx);
        // Initial snapshot, one per tick, then the end.
        assert_eq!(events.len(), 1 + 332 + 1);
        assert_eq!(
            events.last(),
            Some(&GameEvent::End {
                winner: Some(Color::Red)
            })
        );
        assert!(matches!(events[events.len() - 2], GameEvent::Snapshot(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_simultaneous_wall_hits_are_a_draw() {
    let config = GameConfig {
        spawn_points: vec![Point::new(997, 100), Point::new(997, 300)],
        ..fixed_config()
    };
    let (runner, _handle, mut mailboxes) = two_player_game(config);

    let outcome = runner.run().await;

    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.ticks, 2);
    assert!(outcome.losers.iter().all(|l| l.obstacle == Obstacle::Wall));
    let events = drain(&mut mailboxes[0]);
    assert_eq!(events.last(), Some(&GameEvent::End { winner: None }));
}

#[tokio::test(start_paused = true)]
async fn test_disconnected_player_keeps_playing() {
    let (runner, _handle, mut mailboxes) = two_player_game(fixed_config());
    // Red's client goes away before the game starts.
    drop(mailboxes.pop());

    let outcome = runner.run().await;

    assert_eq!(outcome.winner, Some(Color::Red));
    let events = drain(&mut mailboxes[0]);
    assert_eq!(
        events.last(),
        Some(&GameEvent::End {
            winner: Some(Color::Red)
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_finished_after_run() {
    let (runner, handle, _mailboxes) = two_player_game(fixed_config());
    assert!(!handle.is_finished());

    runner.run().await;

    assert!(handle.is_finished());
    assert!(!handle.submit(Color::Blue, Direction::Up));
}

// =========================================================================
// Direction selection
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_direction_change_is_broadcast() {
    let (runner, handle, mut mailboxes) = two_player_game(fixed_config());
    assert!(handle.submit(Color::Blue, Direction::Up));

    let outcome = runner.run().await;

    let events = drain(&mut mailboxes[0]);
    assert_eq!(
        trail_of(&events[0], Color::Blue),
        vec![Point::new(333, 200), Point::new(334, 200)]
    );
    assert_eq!(
        trail_of(&events[1], Color::Blue),
        vec![Point::new(333, 200), Point::new(333, 201)]
    );
    // Blue now climbs toward y = 600 while Red hits the right wall first.
    assert_eq!(outcome.winner, Some(Color::Blue));
    assert_eq!(outcome.losers[0].color, Color::Red);
    assert_eq!(outcome.losers[0].obstacle, Obstacle::Wall);
    assert_eq!(outcome.ticks, 333);
}

#[tokio::test(start_paused = true)]
async fn test_same_initial_direction_is_not_broadcast() {
    let (runner, handle, mut mailboxes) = two_player_game(fixed_config());
    assert!(handle.submit(Color::Red, Direction::Right));

    let outcome = runner.run().await;

    let events = drain(&mut mailboxes[1]);
    // Nothing extra between the initial snapshot and the ticks.
    assert_eq!(events.len(), 1 + outcome.ticks as usize + 1);
}

#[tokio::test(start_paused = true)]
async fn test_later_direction_in_window_wins() {
    let (runner, handle, mut mailboxes) = two_player_game(fixed_config());
    assert!(handle.submit(Color::Blue, Direction::Up));
    assert!(handle.submit(Color::Blue, Direction::Down));

    runner.run().await;

    let events = drain(&mut mailboxes[0]);
    assert_eq!(
        trail_of(&events[2], Color::Blue),
        vec![Point::new(333, 200), Point::new(333, 199)]
    );
    // The first tick continues downward.
    assert_eq!(
        trail_of(&events[3], Color::Blue),
        vec![Point::new(333, 200), Point::new(333, 198)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_intent_for_absent_color_is_ignored() {
    let (runner, handle, _mailboxes) = two_player_game(fixed_config());
    assert!(handle.submit(Color::Purple, Direction::Up));

    let outcome = runner.run().await;

    assert_eq!(outcome.winner, Some(Color::Red));
    assert_eq!(outcome.ticks, 332);
}

// =========================================================================
// Intents while running
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_running_intents_use_last_write_and_ignore_reversals() {
    let config = fixed_config();
    let select_window = config.select_window;
    let (runner, handle, mut mailboxes) = two_player_game(config);
    let game = tokio::spawn(runner.run());

    // 10ms into the first 50ms tick window.
    tokio::time::sleep(select_window + Duration::from_millis(10)).await;
    assert!(handle.submit(Color::Blue, Direction::Up));
    assert!(handle.submit(Color::Blue, Direction::Down));
    assert!(handle.submit(Color::Red, Direction::Left));

    let blue = &mut mailboxes[0];
    let mut events = Vec::new();
    for _ in 0..4 {
        events.push(blue.recv().await.expect("game still running"));
    }

    // events[0] is the spawn layout; nothing was chosen in the window.
    assert_eq!(
        trail_of(&events[1], Color::Blue),
        vec![Point::new(333, 200), Point::new(334, 200), Point::new(334, 199)]
    );
    assert_eq!(
        trail_of(&events[2], Color::Blue),
        vec![Point::new(333, 200), Point::new(334, 200), Point::new(334, 198)]
    );
    // Red's reversal was dropped and it keeps going right.
    assert_eq!(
        trail_of(&events[2], Color::Red),
        vec![Point::new(666, 200), Point::new(669, 200)]
    );
    // Nobody speaks on tick 3; both hold their heading.
    assert_eq!(
        trail_of(&events[3], Color::Blue),
        vec![Point::new(333, 200), Point::new(334, 200), Point::new(334, 197)]
    );
    assert_eq!(
        trail_of(&events[3], Color::Red),
        vec![Point::new(666, 200), Point::new(670, 200)]
    );

    let outcome = game.await.expect("runner task");
    // Blue reaches the bottom wall long before Red reaches the right one.
    assert_eq!(outcome.winner, Some(Color::Red));
    assert_eq!(outcome.losers[0].color, Color::Blue);
    assert_eq!(outcome.losers[0].obstacle, Obstacle::Wall);
}

use invaders_term::config::GameConfig;
use invaders_term::entities::*;
use invaders_term::scores::HighScores;
use invaders_term::session::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

fn new_session(rng: &mut StdRng) -> Session {
    Session::new(GameConfig::default(), HighScores::in_memory(), "ACE", rng)
}

fn killing_shot(game: &GameState) -> Projectile {
    let ship = game.player.rect;
    Projectile::fired_by_enemy(ship.center_x(), ship.y - 10, &game.config)
}

#[test]
fn starts_on_start_screen() {
    let mut rng = seeded_rng();
    let s = new_session(&mut rng);
    assert_eq!(s.screen, Screen::Start);
}

#[test]
fn confirm_starts_a_round() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    assert_eq!(s.handle(Command::Confirm, &mut rng), Flow::Continue);
    assert_eq!(s.screen, Screen::Round);
    assert_eq!(s.game.status, GameStatus::Playing);
    assert_eq!(s.game.enemies.len(), 16);
}

#[test]
fn high_scores_round_trip_from_start() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::ShowHighScores, &mut rng);
    assert_eq!(s.screen, Screen::HighScores);
    // Confirm does nothing here
    s.handle(Command::Confirm, &mut rng);
    assert_eq!(s.screen, Screen::HighScores);
    s.handle(Command::Back, &mut rng);
    assert_eq!(s.screen, Screen::Start);
}

#[test]
fn high_scores_unreachable_while_playing() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.handle(Command::ShowHighScores, &mut rng);
    s.handle(Command::Back, &mut rng);
    assert_eq!(s.screen, Screen::Round);
    assert_eq!(s.game.status, GameStatus::Playing);
}

#[test]
fn quit_from_every_screen() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    assert_eq!(s.handle(Command::Quit, &mut rng), Flow::Quit);
    s.handle(Command::ShowHighScores, &mut rng);
    assert_eq!(s.handle(Command::Quit, &mut rng), Flow::Quit);
    s.handle(Command::Back, &mut rng);
    s.handle(Command::Confirm, &mut rng);
    assert_eq!(s.handle(Command::Quit, &mut rng), Flow::Quit);
}

#[test]
fn update_idles_outside_a_round() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.update(HeldKeys { left: true, right: false, fire: true }, &mut rng);
    assert_eq!(s.game.frame, 0);
    assert!(s.game.bullets.is_empty());
}

#[test]
fn held_keys_move_and_fire() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.update(HeldKeys { left: true, right: false, fire: true }, &mut rng);
    assert_eq!(s.game.player.rect.x, 370);
    assert_eq!(s.game.bullets_of(BulletOwner::Player), 1);
    assert_eq!(s.game.frame, 1);
}

#[test]
fn last_life_records_score_once() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.game.lives = 1;
    s.game.score = 12;
    let shot = killing_shot(&s.game);
    s.game.bullets.push(shot);

    s.update(HeldKeys::default(), &mut rng);
    assert_eq!(s.game.status, GameStatus::GameOver);
    assert_eq!(s.game.lives, 0);
    assert_eq!(s.last_rank, Some(1));
    assert_eq!(s.scores.entries().len(), 1);
    assert_eq!(s.scores.entries()[0].name, "ACE");
    assert_eq!(s.scores.entries()[0].score, 12);

    // further frames neither mutate the round nor record again
    let frame = s.game.frame;
    s.update(HeldKeys { left: true, right: false, fire: true }, &mut rng);
    assert_eq!(s.game.frame, frame);
    assert!(s.game.bullets.is_empty());
    assert_eq!(s.scores.entries().len(), 1);
}

#[test]
fn confirm_after_game_over_restarts() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.game.lives = 1;
    s.game.score = 20;
    s.game.wave = 4;
    let shot = killing_shot(&s.game);
    s.game.bullets.push(shot);
    s.update(HeldKeys::default(), &mut rng);
    assert_eq!(s.game.status, GameStatus::GameOver);

    s.handle(Command::Confirm, &mut rng);
    assert_eq!(s.screen, Screen::Round);
    assert_eq!(s.game.status, GameStatus::Playing);
    assert_eq!(s.game.score, 0);
    assert_eq!(s.game.lives, 3);
    assert_eq!(s.game.wave, 1);
    assert_eq!(s.game.enemies.len(), 16);
    assert_eq!(s.game.player.rect, Rect::new(375, 540, 50, 50));
    assert_eq!(s.game.high_score, 20);
    assert_eq!(s.last_rank, None);
}

#[test]
fn back_after_game_over_returns_to_start() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.game.lives = 1;
    let shot = killing_shot(&s.game);
    s.game.bullets.push(shot);
    s.update(HeldKeys::default(), &mut rng);

    s.handle(Command::Back, &mut rng);
    assert_eq!(s.screen, Screen::Start);
}

#[test]
fn confirm_skips_wave_clear() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.game.enemies.clear();
    s.update(HeldKeys::default(), &mut rng);
    assert_eq!(s.game.status, GameStatus::WaveClear);

    s.handle(Command::Confirm, &mut rng);
    assert_eq!(s.game.status, GameStatus::Playing);
    assert_eq!(s.game.enemies.len(), 16);
    assert_eq!(s.game.wave, 2);
}

#[test]
fn zero_score_is_not_recorded() {
    let mut rng = seeded_rng();
    let mut s = new_session(&mut rng);
    s.handle(Command::Confirm, &mut rng);
    s.game.lives = 1;
    let shot = killing_shot(&s.game);
    s.game.bullets.push(shot);
    s.update(HeldKeys::default(), &mut rng);
    assert_eq!(s.game.status, GameStatus::GameOver);
    assert_eq!(s.last_rank, None);
    assert!(s.scores.entries().is_empty());
}

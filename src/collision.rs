//! Collision & scoring resolver.
//!
//! Runs once per tick after every actor has moved.  Hits only flip `alive`
//! flags while the passes run; the dead are swept at the end, so an actor
//! hit twice in one tick is removed and counted once.

use log::{debug, info};

use crate::entities::{Actor, BulletOwner, GameState, GameStatus, Player};

/// What a single resolver pass did, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitReport {
    pub enemies_destroyed: u32,
    pub player_hit: bool,
    pub absorbed_by_obstacles: u32,
    pub lives_awarded: u32,
}

/// Apply every collision rule, in order, to `state`.
pub fn resolve_collisions(state: &mut GameState) -> HitReport {
    let mut report = HitReport::default();

    // ── 1. Player bullets ↔ enemies ──────────────────────────────────────────
    for bullet in state.bullets.iter_mut() {
        if !bullet.alive || bullet.owner != BulletOwner::Player {
            continue;
        }
        for enemy in state.enemies.iter_mut() {
            if enemy.alive && bullet.rect.overlaps(&enemy.rect) {
                enemy.alive = false;
                bullet.alive = false;
                report.enemies_destroyed += 1;
            }
        }
    }
    state.score += report.enemies_destroyed;
    state.high_score = state.high_score.max(state.score);

    // ── 2. Enemy bullets / enemy contact ↔ player ────────────────────────────
    let ship = state.player.bounds();
    for bullet in state.bullets.iter_mut() {
        if bullet.alive && bullet.owner == BulletOwner::Enemy && bullet.rect.overlaps(&ship) {
            bullet.alive = false;
            report.player_hit = true;
        }
    }
    for enemy in state.enemies.iter_mut() {
        if enemy.alive && enemy.rect.overlaps(&ship) {
            enemy.alive = false;
            report.player_hit = true;
        }
    }
    if report.player_hit {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            info!("player destroyed, final score {}", state.score);
            state.status = GameStatus::GameOver;
        } else {
            debug!("player hit, {} lives left", state.lives);
            state.player = Player::spawn(&state.config);
        }
    }

    // ── 3. Any bullet ↔ obstacles ────────────────────────────────────────────
    for bullet in state.bullets.iter_mut() {
        if bullet.alive && state.obstacles.iter().any(|o| o.rect.overlaps(&bullet.rect)) {
            bullet.alive = false;
            report.absorbed_by_obstacles += 1;
        }
    }

    // ── 4. Extra lives ───────────────────────────────────────────────────────
    if state.status != GameStatus::GameOver {
        report.lives_awarded = apply_life_bonus(state);
    }

    state.bullets.retain(|b| b.is_alive());
    state.enemies.retain(|e| e.is_alive());
    report
}

/// Grant one life per newly reached multiple of `life_bonus_step`.
///
/// Edge-triggered on `bonus_credited`: a score that sits on a multiple for
/// many ticks pays out once.  Returns the number of lives granted.
pub fn apply_life_bonus(state: &mut GameState) -> u32 {
    let reached = state.score / state.config.life_bonus_step;
    if reached <= state.bonus_credited {
        return 0;
    }
    let granted = reached - state.bonus_credited;
    state.bonus_credited = reached;
    state.lives += granted;
    info!("score {} earned {} extra life(s)", state.score, granted);
    granted
}

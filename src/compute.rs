//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use log::{debug, info, trace};
use rand::Rng;

use crate::collision::{resolve_collisions, HitReport};
use crate::config::{FormationPolicy, GameConfig};
use crate::entities::{
    Actor, BulletOwner, Enemy, Field, GameState, GameStatus, Obstacle, Player, Projectile, Rect,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state of a round: full formation, obstacles, player at
/// the spawn point.
pub fn init_state(config: GameConfig, high_score: u32, rng: &mut impl Rng) -> GameState {
    let enemies = spawn_formation(&config, 0, rng);
    let obstacles = spawn_obstacles(&config);
    GameState {
        player: Player::spawn(&config),
        enemies,
        bullets: Vec::new(),
        obstacles,
        score: 0,
        lives: config.starting_lives,
        high_score,
        bonus_credited: 0,
        wave: 1,
        status: GameStatus::Playing,
        frame: 0,
        wave_clear_remaining: 0,
        config,
    }
}

/// A fresh round with the same config; only the best score carries over.
pub fn restart(state: &GameState, rng: &mut impl Rng) -> GameState {
    info!("restarting round (previous score {})", state.score);
    init_state(state.config.clone(), state.high_score, rng)
}

/// The rows × cols grid at its canonical offsets.  Each enemy's first shot
/// is scheduled one random cooldown after `now_ms`.
pub fn spawn_formation(config: &GameConfig, now_ms: u64, rng: &mut impl Rng) -> Vec<Enemy> {
    let cells = config.formation_rows.max(0) * config.formation_cols.max(0);
    let mut enemies = Vec::with_capacity(cells as usize);
    for row in 0..config.formation_rows {
        for col in 0..config.formation_cols {
            enemies.push(Enemy {
                rect: Rect::new(
                    config.formation_x + col * (config.enemy_width + config.formation_gap),
                    config.formation_y + row * (config.enemy_height + config.formation_gap),
                    config.enemy_width,
                    config.enemy_height,
                ),
                direction: 1,
                speed: config.enemy_speed,
                cooldown_ms: roll_cooldown(config, rng),
                last_shot_ms: now_ms,
                alive: true,
            });
        }
    }
    debug!("spawned formation of {} enemies", enemies.len());
    enemies
}

/// One row of obstacles, centred horizontally.
pub fn spawn_obstacles(config: &GameConfig) -> Vec<Obstacle> {
    let count = config.obstacle_count.max(0);
    let span = count * config.obstacle_width + (count - 1).max(0) * config.obstacle_spacing;
    let left = ((config.field_width - span) / 2).max(0);
    (0..count)
        .map(|i| Obstacle {
            rect: Rect::new(
                left + i * (config.obstacle_width + config.obstacle_spacing),
                config.obstacle_y,
                config.obstacle_width,
                config.obstacle_height,
            ),
        })
        .collect()
}

fn roll_cooldown(config: &GameConfig, rng: &mut impl Rng) -> u64 {
    rng.gen_range(config.enemy_cooldown_min_ms..=config.enemy_cooldown_max_ms)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.player.rect.x = (state.player.rect.x - state.player.speed).max(0);
    next
}

pub fn move_player_right(state: &GameState) -> GameState {
    let mut next = state.clone();
    let max_x = state.config.field_width - state.player.rect.width;
    next.player.rect.x = (state.player.rect.x + state.player.speed).min(max_x);
    next
}

/// Fire from the ship's nose, capped at `max_player_bullets` in flight.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.bullets_of(BulletOwner::Player) >= state.config.max_player_bullets {
        return state.clone();
    }
    let ship = state.player.rect;
    let mut next = state.clone();
    next.bullets
        .push(Projectile::fired_by_player(ship.center_x(), ship.y, &state.config));
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished round is returned unchanged.  During the wave-clear pause only
/// the countdown runs.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    match state.status {
        GameStatus::GameOver => state.clone(),
        GameStatus::WaveClear => {
            let mut next = state.clone();
            next.frame += 1;
            next.wave_clear_remaining = next.wave_clear_remaining.saturating_sub(1);
            if next.wave_clear_remaining == 0 {
                start_next_wave(&mut next, rng);
            }
            next
        }
        GameStatus::Playing => play_frame(state, rng),
    }
}

/// Leave the wave-clear pause now, whatever the countdown says.
pub fn skip_wave_clear(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    if next.status == GameStatus::WaveClear {
        start_next_wave(&mut next, rng);
    }
    next
}

fn play_frame(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.frame += 1;
    let field = next.field();

    // ── 1. Move everything ───────────────────────────────────────────────────
    next.player.advance(&field);
    for bullet in next.bullets.iter_mut() {
        bullet.advance(&field);
    }
    advance_formation(&mut next.enemies, &field, next.config.formation_policy);

    // Enemies that slip below the field are gone for good.
    next.enemies.retain(|e| e.rect.y <= field.height);

    // ── 2. Enemies shoot ─────────────────────────────────────────────────────
    enemy_fire(&mut next, rng);

    // ── 3. Collisions, scoring, lives ────────────────────────────────────────
    next.bullets.retain(|b| b.is_alive());
    let report = resolve_collisions(&mut next);
    if report != HitReport::default() {
        trace!("frame {}: {:?}", next.frame, report);
    }

    // ── 4. Wave bookkeeping ──────────────────────────────────────────────────
    if next.status == GameStatus::Playing && next.enemies.is_empty() {
        info!("wave {} cleared at score {}", next.wave, next.score);
        next.status = GameStatus::WaveClear;
        next.wave_clear_remaining = next.config.wave_clear_ticks;
        if next.wave_clear_remaining == 0 {
            start_next_wave(&mut next, rng);
        }
    }

    next
}

/// Move the formation one tick under the given edge policy.
pub fn advance_formation(enemies: &mut [Enemy], field: &Field, policy: FormationPolicy) {
    match policy {
        FormationPolicy::Independent => {
            for enemy in enemies.iter_mut() {
                enemy.advance(field);
            }
        }
        FormationPolicy::Synchronized => {
            let Some(lead) = enemies.first() else {
                return;
            };
            // One shared step, cut short by whoever is nearest the wall ahead,
            // keeps the grid rigid.
            let direction = lead.direction;
            let speed = enemies.iter().map(|e| e.speed).max().unwrap_or(0);
            let room = enemies
                .iter()
                .map(|e| {
                    if direction > 0 {
                        field.width - e.rect.right()
                    } else {
                        e.rect.x
                    }
                })
                .min()
                .unwrap_or(0)
                .max(0);
            let step = speed.min(room) * direction;
            for enemy in enemies.iter_mut() {
                enemy.rect.x += step;
            }
            if enemies.iter().any(|e| e.at_edge(field)) {
                for enemy in enemies.iter_mut() {
                    enemy.reverse_and_descend();
                }
            }
        }
    }
}

/// Each enemy whose cooldown has elapsed fires, while the enemy bullet cap
/// has room.  Enemies over the cap keep waiting.
fn enemy_fire(state: &mut GameState, rng: &mut impl Rng) {
    let now = state.now_ms();
    let mut in_flight = state.bullets_of(BulletOwner::Enemy);
    for enemy in state.enemies.iter_mut() {
        if in_flight >= state.config.max_enemy_bullets {
            break;
        }
        if now.saturating_sub(enemy.last_shot_ms) < enemy.cooldown_ms {
            continue;
        }
        state.bullets.push(Projectile::fired_by_enemy(
            enemy.rect.center_x(),
            enemy.rect.bottom(),
            &state.config,
        ));
        enemy.last_shot_ms = now;
        enemy.cooldown_ms = roll_cooldown(&state.config, rng);
        in_flight += 1;
    }
}

fn start_next_wave(state: &mut GameState, rng: &mut impl Rng) {
    state.enemies = spawn_formation(&state.config, state.now_ms(), rng);
    state.wave += 1;
    state.wave_clear_remaining = 0;
    state.status = GameStatus::Playing;
    info!("wave {} begins", state.wave);
}

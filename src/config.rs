//! Tunable game constants.
//!
//! Every value the simulation reads lives in `GameConfig`, so a round can be
//! reproduced from its config and an RNG seed alone.  Defaults match the
//! classic 800×600 layout.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// How the enemy formation reacts when one member touches a field edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormationPolicy {
    /// The whole formation reverses and steps down together.
    #[default]
    Synchronized,
    /// Each enemy bounces on its own, so columns drift apart over time.
    Independent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Field ─────────────────────────────────────────────────────────────────
    pub field_width: i32,
    pub field_height: i32,
    /// Simulation ticks per second (also the render rate).
    pub tick_rate: u32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_width: i32,
    pub player_height: i32,
    pub player_speed: i32,
    /// Spawn point, also used when the player is hit.
    pub player_x: i32,
    pub player_y: i32,
    pub starting_lives: u32,
    pub max_player_bullets: usize,

    // ── Enemies ───────────────────────────────────────────────────────────────
    pub enemy_width: i32,
    pub enemy_height: i32,
    pub enemy_speed: i32,
    pub formation_rows: i32,
    pub formation_cols: i32,
    pub formation_x: i32,
    pub formation_y: i32,
    /// Gap between neighbouring enemies, both axes.
    pub formation_gap: i32,
    pub formation_policy: FormationPolicy,
    pub enemy_cooldown_min_ms: u64,
    pub enemy_cooldown_max_ms: u64,
    pub max_enemy_bullets: usize,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_speed: i32,

    // ── Obstacles ─────────────────────────────────────────────────────────────
    pub obstacle_count: i32,
    pub obstacle_width: i32,
    pub obstacle_height: i32,
    pub obstacle_spacing: i32,
    pub obstacle_y: i32,

    // ── Scoring & pacing ──────────────────────────────────────────────────────
    /// One extra life per this many points.
    pub life_bonus_step: u32,
    /// Ticks the wave-clear banner stays up before the next formation.
    pub wave_clear_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let field_width = 800;
        let field_height = 600;
        let player_width = 50;
        let player_height = 50;
        GameConfig {
            field_width,
            field_height,
            tick_rate: 60,

            player_width,
            player_height,
            player_speed: 5,
            player_x: field_width / 2 - player_width / 2,
            player_y: field_height - player_height - 10,
            starting_lives: 3,
            max_player_bullets: 3,

            enemy_width: 50,
            enemy_height: 50,
            enemy_speed: 2,
            formation_rows: 4,
            formation_cols: 4,
            formation_x: 50,
            formation_y: 50,
            formation_gap: 10,
            formation_policy: FormationPolicy::Synchronized,
            enemy_cooldown_min_ms: 1000,
            enemy_cooldown_max_ms: 3000,
            max_enemy_bullets: 3,

            bullet_width: 5,
            bullet_height: 20,
            bullet_speed: 7,

            obstacle_count: 4,
            obstacle_width: 100,
            obstacle_height: 20,
            obstacle_spacing: 100,
            obstacle_y: field_height - 150,

            life_bonus_step: 16,
            wave_clear_ticks: 90,
        }
    }
}

impl GameConfig {
    /// Read a JSON config.  Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<GameConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject layouts the simulation cannot run.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_speed", self.enemy_speed),
            ("formation_rows", self.formation_rows),
            ("formation_cols", self.formation_cols),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
        ];
        for (name, value) in sizes {
            if value <= 0 {
                bail!("{name} must be positive, got {value}");
            }
        }
        if self.player_width > self.field_width || self.enemy_width > self.field_width {
            bail!("actors must fit inside a {}-wide field", self.field_width);
        }
        if self.obstacle_count < 0 {
            bail!("obstacle_count must not be negative, got {}", self.obstacle_count);
        }
        // A formation that spans the field would touch an edge every tick.
        let span = self.formation_x + self.formation_width();
        if self.formation_x < 0 || span >= self.field_width {
            bail!(
                "formation spans x {}..{} but the field is {} wide",
                self.formation_x,
                span,
                self.field_width
            );
        }
        if self.tick_rate == 0 {
            bail!("tick_rate must be positive");
        }
        if self.enemy_cooldown_min_ms > self.enemy_cooldown_max_ms {
            bail!(
                "enemy cooldown range is inverted: {}..{}",
                self.enemy_cooldown_min_ms,
                self.enemy_cooldown_max_ms
            );
        }
        if self.life_bonus_step == 0 {
            bail!("life_bonus_step must be positive");
        }
        Ok(())
    }

    /// Width of the full rows × cols grid, gaps included.
    pub fn formation_width(&self) -> i32 {
        self.formation_cols * self.enemy_width + (self.formation_cols - 1) * self.formation_gap
    }

    /// Simulation clock reading for a frame number.
    pub fn frame_to_ms(&self, frame: u64) -> u64 {
        frame * 1000 / self.tick_rate as u64
    }
}

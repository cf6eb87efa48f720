//! All game entity types: plain data plus the small `Actor` interface the
//! simulation and renderer share.  Field units, not terminal cells.

use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle.  `x`/`y` are the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Strict overlap: rectangles that merely share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// The play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub width: i32,
    pub height: i32,
}

impl Field {
    pub fn from_config(config: &GameConfig) -> Field {
        Field {
            width: config.field_width,
            height: config.field_height,
        }
    }
}

// ── Actor interface ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Obstacle,
}

/// What the frame loop needs from anything on the field.
pub trait Actor {
    fn bounds(&self) -> Rect;
    /// One tick of the actor's own motion.
    fn advance(&mut self, field: &Field);
    fn is_alive(&self) -> bool;
    fn kind(&self) -> ActorKind;
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// Formation destroyed; the next one spawns when the countdown runs out.
    WaveClear,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub rect: Rect,
    pub speed: i32,
    pub heading: Heading,
    pub owner: BulletOwner,
    pub alive: bool,
}

impl Projectile {
    /// Player shot: centred on `x`, top edge at `y`, travelling up.
    pub fn fired_by_player(x: i32, y: i32, config: &GameConfig) -> Projectile {
        Projectile {
            rect: Rect::new(
                x - config.bullet_width / 2,
                y,
                config.bullet_width,
                config.bullet_height,
            ),
            speed: config.bullet_speed,
            heading: Heading::Up,
            owner: BulletOwner::Player,
            alive: true,
        }
    }

    /// Enemy shot: centred on `x`, top edge at `y`, travelling down.
    pub fn fired_by_enemy(x: i32, y: i32, config: &GameConfig) -> Projectile {
        Projectile {
            heading: Heading::Down,
            owner: BulletOwner::Enemy,
            ..Projectile::fired_by_player(x, y, config)
        }
    }
}

impl Actor for Projectile {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self, field: &Field) {
        match self.heading {
            Heading::Up => self.rect.y -= self.speed,
            Heading::Down => self.rect.y += self.speed,
        }
        if self.rect.bottom() < 0 || self.rect.y > field.height {
            self.alive = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ActorKind {
        match self.owner {
            BulletOwner::Player => ActorKind::PlayerBullet,
            BulletOwner::Enemy => ActorKind::EnemyBullet,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub speed: i32,
}

impl Player {
    pub fn spawn(config: &GameConfig) -> Player {
        Player {
            rect: Rect::new(
                config.player_x,
                config.player_y,
                config.player_width,
                config.player_height,
            ),
            speed: config.player_speed,
        }
    }
}

impl Actor for Player {
    fn bounds(&self) -> Rect {
        self.rect
    }

    /// The ship only moves on input; this just keeps it on the field.
    fn advance(&mut self, field: &Field) {
        self.rect.x = self.rect.x.clamp(0, field.width - self.rect.width);
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Player
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    /// +1 moving right, −1 moving left.
    pub direction: i32,
    pub speed: i32,
    /// Time that must pass after `last_shot_ms` before the next shot.
    pub cooldown_ms: u64,
    pub last_shot_ms: u64,
    pub alive: bool,
}

impl Enemy {
    /// True once the enemy touches or passes either side of the field.
    pub fn at_edge(&self, field: &Field) -> bool {
        self.rect.x <= 0 || self.rect.x >= field.width - self.rect.width
    }

    pub fn step_sideways(&mut self, field: &Field) {
        self.rect.x = (self.rect.x + self.speed * self.direction)
            .clamp(0, field.width - self.rect.width);
    }

    pub fn reverse_and_descend(&mut self) {
        self.direction = -self.direction;
        self.rect.y += self.rect.height;
    }
}

impl Actor for Enemy {
    fn bounds(&self) -> Rect {
        self.rect
    }

    /// Independent bounce: this enemy reverses on its own edge contact.
    fn advance(&mut self, field: &Field) {
        self.step_sideways(field);
        if self.at_edge(field) {
            self.reverse_and_descend();
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Enemy
    }
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Actor for Obstacle {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn advance(&mut self, _field: &Field) {}

    fn is_alive(&self) -> bool {
        true
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Obstacle
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire round state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Projectiles from both sides.
    pub bullets: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub lives: u32,
    /// Best score seen so far, updated live during play.
    pub high_score: u32,
    /// Highest multiple of `life_bonus_step` already paid out as a life.
    pub bonus_credited: u32,
    /// 1-based formation counter.
    pub wave: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Ticks left on the wave-clear banner.
    pub wave_clear_remaining: u32,
    pub config: GameConfig,
}

impl GameState {
    pub fn field(&self) -> Field {
        Field::from_config(&self.config)
    }

    /// Simulation clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.config.frame_to_ms(self.frame)
    }

    pub fn bullets_of(&self, owner: BulletOwner) -> usize {
        self.bullets.iter().filter(|b| b.owner == owner).count()
    }

    /// Every live actor, in draw order (obstacles at the back, player last).
    pub fn actors(&self) -> Vec<&dyn Actor> {
        let mut all: Vec<&dyn Actor> = Vec::with_capacity(
            self.obstacles.len() + self.enemies.len() + self.bullets.len() + 1,
        );
        all.extend(self.obstacles.iter().map(|o| o as &dyn Actor));
        all.extend(self.enemies.iter().map(|e| e as &dyn Actor));
        all.extend(self.bullets.iter().map(|b| b as &dyn Actor));
        all.push(&self.player);
        all.retain(|a| a.is_alive());
        all
    }
}

//! Game state and core simulation types
//!
//! Everything a session needs lives in [`GameState`]; the renderer and HUD
//! only ever read it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::background::Background;
use super::lifecycle::FragmentLedger;
use super::pool::Pool;
use super::schedule::{Scheduler, TimerHandle};
use super::spatial::SpatialGrid;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{heading, wrap_coordinate, wrap_with_margin};

/// Stable enemy identifier, unique for the whole session
pub type EnemyId = u32;

/// Uniform random value in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Lives ran out; the session is frozen
    GameOver,
}

/// Where the current level is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Level banner showing, nothing spawned yet
    Intro,
    /// Originals still being spawned in waves
    Spawning,
    /// Every original spawned; waiting for the last to resolve
    WaitingForClear,
    /// Level cleared, next level pending
    Transitioning,
}

impl LevelPhase {
    /// True while a level change is in flight (blocks waves and clear checks)
    pub fn is_transition(self) -> bool {
        matches!(self, LevelPhase::Intro | LevelPhase::Transitioning)
    }
}

/// Notifications for the HUD and other observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    LevelStarted { level: u32, enemies: u32 },
    RemainingChanged(u32),
    ShipHit,
    EnemySplit { id: EnemyId, radius: f32 },
    EnemyDestroyed { id: EnemyId, radius: f32 },
    LevelCleared { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// The player's syringe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Heading (radians, 0 = pointing right, screen coordinates)
    pub angle: f32,
    pub vel: Vec2,
    pub radius: f32,
    pub invulnerable: bool,
    /// Time spent invulnerable so far
    pub invulnerable_ms: f32,
    /// Time since the last visibility toggle
    pub blink_ms: f32,
    /// Blinks off while invulnerable
    pub visible: bool,
    /// Thrust held this tick (spray effect)
    pub thrusting: bool,
    /// Medicine pulse animation phase
    pub pulse_phase: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            angle: 0.0,
            vel: Vec2::ZERO,
            radius: PLAYER_SIZE / 2.0,
            invulnerable: false,
            invulnerable_ms: 0.0,
            blink_ms: 0.0,
            visible: true,
            thrusting: false,
            pulse_phase: 0.0,
        }
    }

    /// Where droplets leave the needle
    pub fn tip(&self) -> Vec2 {
        self.pos + heading(self.angle) * (PLAYER_SIZE * 2.0)
    }

    /// Apply turn and thrust intents for one tick
    pub fn steer(&mut self, turn: f32, thrust: bool, tuning: &Tuning) {
        self.angle = crate::normalize_angle(self.angle + turn * tuning.ship_rotation_speed);
        self.thrusting = thrust;
        if thrust {
            self.vel += heading(self.angle) * tuning.ship_thrust;
        }
    }

    /// Damp, integrate and wrap at the screen edges
    pub fn integrate(&mut self, width: f32, height: f32, friction: f32) {
        self.vel *= friction;
        self.pos += self.vel;
        self.pos.x = wrap_coordinate(self.pos.x, width);
        self.pos.y = wrap_coordinate(self.pos.y, height);
    }

    /// Advance the invulnerability window and blink
    pub fn update_invulnerability(&mut self, dt_ms: f32, tuning: &Tuning) {
        self.pulse_phase = (self.pulse_phase + dt_ms * 0.002) % std::f32::consts::TAU;

        if !self.invulnerable {
            return;
        }
        self.invulnerable_ms += dt_ms;
        self.blink_ms += dt_ms;

        if self.blink_ms > tuning.blink_ms {
            self.visible = !self.visible;
            self.blink_ms = 0.0;
        }

        if self.invulnerable_ms > tuning.invulnerable_ms {
            self.invulnerable = false;
            self.visible = true;
        }
    }

    /// Respawn at `center` after a hit, protected for a while
    pub fn respawn(&mut self, center: Vec2) {
        self.invulnerable = true;
        self.invulnerable_ms = 0.0;
        self.blink_ms = 0.0;
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
    }
}

/// Lineage of an enemy for level bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Spawned by the level spawner
    Original,
    /// Produced by a split; `root` is the original it descends from
    Fragment { root: EnemyId },
}

/// Number of body colors enemies pick from
pub const ENEMY_PALETTE_SIZE: u8 = 3;

/// A drifting hemorrhoid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub origin: Origin,
    /// Decorative throbbing
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub pulse_amplitude: f32,
    /// Irregular outline: one radius multiplier per polygon vertex
    pub vertex_offsets: Vec<f32>,
    pub palette: u8,
}

impl Enemy {
    /// Build an enemy with randomized drift, spin and outline
    pub fn new(id: EnemyId, pos: Vec2, radius: f32, origin: Origin, tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let speed = random_between(rng, tuning.enemy_min_speed, tuning.enemy_max_speed);
        let direction = random_between(rng, 0.0, std::f32::consts::TAU);
        let vertex_count = random_between(rng, 6.0, 12.0) as usize;
        let vertex_offsets = (0..vertex_count)
            .map(|_| random_between(rng, 0.7, 1.3))
            .collect();

        Self {
            id,
            pos,
            vel: heading(direction) * speed,
            radius,
            rotation: 0.0,
            rotation_speed: random_between(rng, -0.02, 0.02),
            origin,
            pulse_phase: random_between(rng, 0.0, std::f32::consts::TAU),
            pulse_speed: random_between(rng, 0.01, 0.03),
            pulse_amplitude: random_between(rng, 0.04, 0.08),
            vertex_offsets,
            palette: rng.random_range(0..ENEMY_PALETTE_SIZE),
        }
    }

    pub fn is_original(&self) -> bool {
        self.origin == Origin::Original
    }

    /// The original this enemy counts toward (itself for originals)
    pub fn root(&self) -> EnemyId {
        match self.origin {
            Origin::Original => self.id,
            Origin::Fragment { root } => root,
        }
    }

    /// Drift, spin and wrap once the whole body has left the screen
    pub fn advance(&mut self, width: f32, height: f32) {
        self.pos += self.vel;
        self.rotation += self.rotation_speed;
        self.pos.x = wrap_with_margin(self.pos.x, width, self.radius);
        self.pos.y = wrap_with_margin(self.pos.y, height, self.radius);
        self.pulse_phase = (self.pulse_phase + self.pulse_speed) % std::f32::consts::TAU;
    }
}

/// A medicine droplet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub radius: f32,
    /// Ticks left before the droplet evaporates
    pub lifespan: u32,
    pub pulse_phase: f32,
}

impl Projectile {
    /// Re-aim a pooled droplet
    pub fn reset(&mut self, pos: Vec2, angle: f32, speed: f32, lifespan: u32, pulse_phase: f32) {
        self.pos = pos;
        self.vel = heading(angle) * speed;
        self.angle = angle;
        self.radius = PROJECTILE_RADIUS;
        self.lifespan = lifespan;
        self.pulse_phase = pulse_phase;
    }

    /// Move one tick. Returns false once the droplet has expired.
    pub fn advance(&mut self, width: f32, height: f32) -> bool {
        self.pos += self.vel;
        self.pos.x = wrap_coordinate(self.pos.x, width);
        self.pos.y = wrap_coordinate(self.pos.y, height);
        self.pulse_phase = (self.pulse_phase + 0.2) % std::f32::consts::TAU;
        self.lifespan = self.lifespan.saturating_sub(1);
        self.lifespan > 0
    }
}

/// Number of particle colors
pub const PARTICLE_PALETTE_SIZE: u8 = 4;

/// An explosion fleck (visual only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifespan: u32,
    pub max_lifespan: u32,
    /// 1 when fresh, fades linearly to 0
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub palette: u8,
    /// Four-pointed spark instead of a round blob
    pub spark: bool,
}

impl Particle {
    pub fn reset(&mut self, pos: Vec2, lifespan: u32, rng: &mut Pcg32) {
        self.pos = pos;
        self.vel = Vec2::new(random_between(rng, -3.0, 3.0), random_between(rng, -3.0, 3.0));
        self.radius = random_between(rng, 1.0, 3.0);
        self.lifespan = lifespan;
        self.max_lifespan = lifespan.max(1);
        self.alpha = 1.0;
        self.rotation = random_between(rng, 0.0, std::f32::consts::TAU);
        self.rotation_speed = random_between(rng, -0.1, 0.1);
        self.palette = rng.random_range(0..PARTICLE_PALETTE_SIZE);
        self.spark = rng.random::<f32>() <= 0.7;
    }

    /// Move one tick with drag and gravity, shrinking once fewer than
    /// `shrink_below` ticks remain. Returns false once faded out.
    pub fn advance(&mut self, drag: f32, gravity: f32, shrink_below: u32) -> bool {
        self.pos += self.vel;
        self.vel *= drag;
        self.vel.y += gravity;
        self.rotation += self.rotation_speed;
        self.lifespan = self.lifespan.saturating_sub(1);
        self.alpha = self.lifespan as f32 / self.max_lifespan as f32;
        if self.lifespan < shrink_below {
            self.radius *= 0.99;
        }
        self.lifespan > 0
    }
}

/// Read-only counters the HUD displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudCounters {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub enemies_remaining: u32,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Arena size in pixels
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub level_phase: LevelPhase,
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    /// Originals that must be resolved to clear the level
    pub enemies_per_level: u32,
    /// Originals not yet fully resolved
    pub enemies_remaining: u32,
    /// Originals spawned so far this level
    pub enemies_spawned: u32,
    /// Virtual clock
    pub time_ms: f64,
    pub time_ticks: u64,
    pub ship: Ship,
    /// Live enemies, ascending by id
    pub enemies: Vec<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub particles: Pool<Particle>,
    pub background: Background,
    pub(crate) fragments: FragmentLedger,
    pub(crate) scheduler: Scheduler,
    /// The one outstanding wave timer, if any
    pub(crate) wave_timer: Option<TimerHandle>,
    #[serde(skip)]
    pub(crate) grid: SpatialGrid,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: EnemyId,
}

impl GameState {
    /// New session on the default arena with default tuning, level 1 queued
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT, 300)
    }

    /// New session; `microbes` sets the background density
    pub fn with_tuning(seed: u64, tuning: Tuning, width: f32, height: f32, microbes: usize) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        let mut state = Self {
            seed,
            width,
            height,
            phase: GamePhase::Playing,
            level_phase: LevelPhase::Intro,
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            enemies_per_level: 0,
            enemies_remaining: 0,
            enemies_spawned: 0,
            time_ms: 0.0,
            time_ticks: 0,
            ship: Ship::new(center),
            enemies: Vec::new(),
            projectiles: Pool::with_capacity(tuning.projectile_pool_capacity),
            particles: Pool::with_capacity(tuning.particle_pool_capacity),
            // Separate stream so decoration density never shifts gameplay randomness
            background: Background::new(seed ^ 0x9E37_79B9_7F4A_7C15, width, height, microbes),
            fragments: FragmentLedger::default(),
            scheduler: Scheduler::new(),
            wave_timer: None,
            grid: SpatialGrid::new(tuning.cell_size(width, height)),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        };

        log::info!("Session started with seed {}", seed);
        state.start_level(1);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EnemyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Center of the arena (ship respawn point)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Canvas resized: adopt the new bounds and grid cell size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.grid.set_cell_size(self.tuning.cell_size(width, height));
        self.background.resize(width, height);
        self.ship.pos.x = wrap_coordinate(self.ship.pos.x, width);
        self.ship.pos.y = wrap_coordinate(self.ship.pos.y, height);
    }

    /// True while a level change is pending
    pub fn is_level_transition(&self) -> bool {
        self.level_phase.is_transition()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn hud(&self) -> HudCounters {
        HudCounters {
            score: self.score,
            lives: self.lives,
            level: self.level,
            enemies_remaining: self.enemies_remaining,
        }
    }

    /// Open fragment count for a split original, if it is still being tracked
    pub fn open_fragments(&self, original: EnemyId) -> Option<u32> {
        self.fragments.get(original)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|index| &self.enemies[index])
    }

    /// Take every event published since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }
}

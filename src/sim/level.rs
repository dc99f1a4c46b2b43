//! Level progression and enemy spawning
//!
//! A level runs `Intro` (banner) → `Spawning` (waves of originals) →
//! `WaitingForClear` → `Transitioning` → next level's `Intro`. Timed steps
//! go through the world's scheduler, and at most one wave timer is pending.

use glam::Vec2;
use rand::Rng;

use super::schedule::{ScheduledEvent, TimerHandle};
use super::state::{Enemy, EnemyId, GameEvent, GamePhase, GameState, LevelPhase, Origin, random_between};
use crate::ranks;

impl GameState {
    /// Reset the board for `level` and queue its banner
    pub fn start_level(&mut self, level: u32) {
        // Anything still queued belongs to the previous level
        self.wave_timer = None;
        self.scheduler.clear();
        self.enemies.clear();
        self.fragments.clear();

        self.level = level;
        self.enemies_per_level = self.tuning.enemies_for_level(level);
        self.enemies_remaining = self.enemies_per_level;
        self.enemies_spawned = 0;
        self.level_phase = LevelPhase::Intro;

        let delay = self.banner_duration_ms() + self.tuning.banner_fade_ms;
        self.scheduler
            .schedule(self.time_ms + delay as f64, ScheduledEvent::BeginSpawning { level });

        log::info!(
            "Level {} started: {} hemorrhoids ({})",
            level,
            self.enemies_per_level,
            ranks::current_rank(level).title
        );
        self.emit(GameEvent::LevelStarted {
            level,
            enemies: self.enemies_per_level,
        });
        self.emit(GameEvent::RemainingChanged(self.enemies_remaining));
    }

    /// How long the current level's banner stays fully visible
    pub fn banner_duration_ms(&self) -> f32 {
        if ranks::is_new_rank(self.level) {
            self.tuning.banner_new_rank_ms
        } else {
            self.tuning.banner_ms
        }
    }

    /// Run a scheduled event that has come due
    pub(crate) fn handle_scheduled(&mut self, handle: TimerHandle, event: ScheduledEvent) {
        match event {
            ScheduledEvent::BeginSpawning { level } => {
                if level == self.level && self.level_phase == LevelPhase::Intro {
                    self.begin_spawning();
                }
            }
            ScheduledEvent::SpawnWave { level } => {
                if self.wave_timer == Some(handle) {
                    self.wave_timer = None;
                }
                if level == self.level {
                    self.spawn_wave();
                }
            }
            ScheduledEvent::AdvanceLevel => {
                if self.level_phase == LevelPhase::Transitioning {
                    self.start_level(self.level + 1);
                }
            }
        }
    }

    fn begin_spawning(&mut self) {
        let batch = self
            .tuning
            .initial_batch(self.level)
            .min(self.enemies_per_level);
        self.spawn_originals(batch);
        self.level_phase = LevelPhase::Spawning;
        self.schedule_next_wave();
    }

    fn spawn_wave(&mut self) {
        if self.phase == GamePhase::GameOver || self.is_level_transition() {
            return;
        }
        let due = self.enemies_per_level.saturating_sub(self.enemies_spawned);
        let count = self.tuning.wave_size(self.level).min(due);
        self.spawn_originals(count);
        self.schedule_next_wave();
    }

    /// Queue the next wave while originals are still owed, otherwise wait
    /// for the board to clear
    fn schedule_next_wave(&mut self) {
        if self.enemies_spawned >= self.enemies_per_level {
            if self.level_phase == LevelPhase::Spawning {
                self.level_phase = LevelPhase::WaitingForClear;
            }
            return;
        }

        if let Some(stale) = self.wave_timer.take() {
            self.scheduler.cancel(stale);
        }
        let due = self.time_ms + self.tuning.wave_delay_ms(self.level) as f64;
        let handle = self
            .scheduler
            .schedule(due, ScheduledEvent::SpawnWave { level: self.level });
        self.wave_timer = Some(handle);
    }

    /// Spawn up to `count` originals. Returns how many were placed.
    fn spawn_originals(&mut self, count: u32) -> u32 {
        (0..count).filter(|_| self.spawn_original().is_some()).count() as u32
    }

    /// Spawn one original at a safe edge position with level scaling. Skipped
    /// (None) when no safe position is found.
    pub fn spawn_original(&mut self) -> Option<EnemyId> {
        let Some(pos) = self.find_spawn_point() else {
            log::warn!(
                "no spawn point farther than {} from the ship after {} attempts",
                self.tuning.spawn_safe_distance,
                self.tuning.max_spawn_attempts
            );
            return None;
        };
        let base = random_between(
            &mut self.rng,
            self.tuning.enemy_min_radius,
            self.tuning.enemy_max_radius,
        );
        let radius = base * self.tuning.size_scale(self.level);
        Some(self.insert_original(pos, radius))
    }

    /// Add an original enemy at `pos`, counted toward this level's spawns
    pub fn insert_original(&mut self, pos: Vec2, radius: f32) -> EnemyId {
        let id = self.next_entity_id();
        let mut enemy = Enemy::new(id, pos, radius, Origin::Original, &self.tuning, &mut self.rng);
        enemy.vel *= self.tuning.speed_scale(self.level);
        self.enemies.push(enemy);
        self.enemies_spawned += 1;
        log::debug!(
            "spawned original {} at ({:.0}, {:.0}) r={:.1} [{}/{}]",
            id,
            pos.x,
            pos.y,
            radius,
            self.enemies_spawned,
            self.enemies_per_level
        );
        id
    }

    /// Random point just off a screen edge, clear of the ship
    pub fn find_spawn_point(&mut self) -> Option<Vec2> {
        let offset = self.tuning.spawn_edge_offset;
        for _ in 0..self.tuning.max_spawn_attempts {
            let pos = if self.rng.random::<bool>() {
                let x = if self.rng.random::<bool>() {
                    -offset
                } else {
                    self.width + offset
                };
                Vec2::new(x, random_between(&mut self.rng, 0.0, self.height))
            } else {
                let y = if self.rng.random::<bool>() {
                    -offset
                } else {
                    self.height + offset
                };
                Vec2::new(random_between(&mut self.rng, 0.0, self.width), y)
            };

            if pos.distance(self.ship.pos) > self.tuning.spawn_safe_distance {
                return Some(pos);
            }
        }
        None
    }

    /// Once per tick: start the level transition the moment the board is
    /// resolved
    pub(crate) fn poll_level_clear(&mut self) {
        if self.phase != GamePhase::Playing || self.is_level_transition() {
            return;
        }
        if self.enemies_remaining > 0 {
            return;
        }

        self.level_phase = LevelPhase::Transitioning;
        if let Some(handle) = self.wave_timer.take() {
            self.scheduler.cancel(handle);
        }
        log::info!("Level {} cleared", self.level);
        self.emit(GameEvent::LevelCleared { level: self.level });
        let due = self.time_ms + self.tuning.level_clear_delay_ms as f64;
        self.scheduler.schedule(due, ScheduledEvent::AdvanceLevel);
    }

    /// Fire every scheduled event due by the current clock
    pub(crate) fn run_due_events(&mut self) {
        while let Some((handle, event)) = self.scheduler.pop_due(self.time_ms) {
            self.handle_scheduled(handle, event);
            if self.phase == GamePhase::GameOver {
                break;
            }
        }
    }
}

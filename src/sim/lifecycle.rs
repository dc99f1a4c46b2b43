//! Enemy splitting, fragment bookkeeping and ship damage
//!
//! An original enemy counts once toward `enemies_remaining` no matter how
//! many fragments it breaks into. When it first splits, its id goes into the
//! [`FragmentLedger`] with two open fragments; every further split adds one
//! (one destroyed, two created) and every terminal destruction removes one.
//! The original is finalized when its count reaches zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::state::{Enemy, EnemyId, GameEvent, GamePhase, GameState, Origin, random_between};

/// Open fragment counts keyed by the original they descend from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentLedger {
    open: BTreeMap<EnemyId, u32>,
}

impl FragmentLedger {
    /// Track a freshly split original
    pub fn open(&mut self, original: EnemyId) {
        let previous = self.open.insert(original, 2);
        debug_assert!(previous.is_none(), "original {} split twice", original);
    }

    /// A fragment split into two. Returns false if the original is unknown.
    pub fn grow(&mut self, original: EnemyId) -> bool {
        match self.open.get_mut(&original) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// A fragment was destroyed outright. Returns the fragments still open,
    /// or None if the original is unknown. Entries are dropped at zero.
    pub fn shrink(&mut self, original: EnemyId) -> Option<u32> {
        let count = self.open.get_mut(&original)?;
        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            self.open.remove(&original);
        }
        Some(remaining)
    }

    pub fn get(&self, original: EnemyId) -> Option<u32> {
        self.open.get(&original).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnemyId, u32)> + '_ {
        self.open.iter().map(|(&id, &count)| (id, count))
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}

/// What a destructive hit did to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Replaced by two half-size fragments
    Split([EnemyId; 2]),
    /// Removed with no children
    Destroyed,
}

impl GameState {
    /// Hit a live enemy by id, as a droplet would. Returns None if no such
    /// enemy is alive.
    pub fn hit_enemy(&mut self, id: EnemyId) -> Option<HitOutcome> {
        let index = self.enemies.binary_search_by_key(&id, |e| e.id).ok()?;
        let enemy = self.enemies.remove(index);
        let children = self.resolve_enemy_hit(&enemy);
        Some(match children {
            Some(children) => {
                let ids = [children[0].id, children[1].id];
                self.enemies.extend(children);
                HitOutcome::Split(ids)
            }
            None => HitOutcome::Destroyed,
        })
    }

    /// Apply a destructive hit to `enemy`, already taken out of the live
    /// set. Returns the fragments to add, if it split.
    pub(crate) fn resolve_enemy_hit(&mut self, enemy: &Enemy) -> Option<[Enemy; 2]> {
        self.spawn_burst(enemy.pos, self.tuning.burst_particles, 0.0);
        self.add_score(enemy.radius.floor() as u64);

        if enemy.radius > self.tuning.min_split_radius {
            Some(self.split_enemy(enemy))
        } else {
            self.destroy_enemy(enemy);
            None
        }
    }

    fn split_enemy(&mut self, enemy: &Enemy) -> [Enemy; 2] {
        let root = enemy.root();
        match enemy.origin {
            Origin::Original => self.fragments.open(enemy.id),
            Origin::Fragment { root } => {
                if !self.fragments.grow(root) {
                    self.report_missing_original(enemy.id, root);
                }
            }
        }

        let radius = enemy.radius / 2.0;
        let children = [self.make_fragment(enemy.pos, radius, root), self.make_fragment(enemy.pos, radius, root)];

        log::debug!(
            "enemy {} (r={:.1}) split into {} and {} under original {}",
            enemy.id,
            enemy.radius,
            children[0].id,
            children[1].id,
            root
        );
        self.emit(GameEvent::EnemySplit {
            id: enemy.id,
            radius: enemy.radius,
        });
        children
    }

    fn make_fragment(&mut self, pos: Vec2, radius: f32, root: EnemyId) -> Enemy {
        let id = self.next_entity_id();
        Enemy::new(id, pos, radius, Origin::Fragment { root }, &self.tuning, &mut self.rng)
    }

    fn destroy_enemy(&mut self, enemy: &Enemy) {
        match enemy.origin {
            Origin::Original => self.resolve_original(enemy.id),
            Origin::Fragment { root } => match self.fragments.shrink(root) {
                Some(0) => self.resolve_original(root),
                Some(_) => {}
                None => self.report_missing_original(enemy.id, root),
            },
        }
        self.emit(GameEvent::EnemyDestroyed {
            id: enemy.id,
            radius: enemy.radius,
        });
    }

    /// An original and all of its descendants are gone
    fn resolve_original(&mut self, original: EnemyId) {
        if self.enemies_remaining == 0 {
            log::warn!("original {} resolved with no enemies remaining", original);
            return;
        }
        self.enemies_remaining -= 1;
        log::debug!(
            "original {} resolved, {} remaining",
            original,
            self.enemies_remaining
        );
        self.emit(GameEvent::RemainingChanged(self.enemies_remaining));
    }

    fn report_missing_original(&self, fragment: EnemyId, root: EnemyId) {
        debug_assert!(false, "fragment {} has no ledger entry for original {}", fragment, root);
        log::warn!("fragment {} has no ledger entry for original {}", fragment, root);
    }

    /// The ship touched an enemy. Returns true if that ended the session.
    pub fn hit_ship(&mut self) -> bool {
        if self.ship.invulnerable || self.phase == GamePhase::GameOver {
            return false;
        }

        self.lives = self.lives.saturating_sub(1);
        log::info!("Ship hit, {} lives left", self.lives);
        self.emit(GameEvent::ShipHit);
        self.emit(GameEvent::LivesChanged(self.lives));

        if self.lives == 0 {
            self.end_session();
            return true;
        }

        let room = self
            .particles
            .capacity()
            .saturating_sub(self.particles.live_count());
        let count = self.tuning.ship_hit_particles.min(room);
        self.spawn_burst(self.ship.pos, count, 10.0);

        let center = self.center();
        self.ship.respawn(center);
        false
    }

    fn end_session(&mut self) {
        self.phase = GamePhase::GameOver;
        if let Some(handle) = self.wave_timer.take() {
            self.scheduler.cancel(handle);
        }
        log::info!(
            "Game over: score {} on level {}",
            self.score,
            self.level
        );
        self.emit(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
    }

    /// Spray a volley of droplets from the syringe tip
    pub fn fire(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        let tip = self.ship.tip();
        let spread = self.tuning.spray_spread;
        let speed = self.tuning.projectile_speed;
        let lifespan = self.tuning.projectile_lifespan_ticks;

        for _ in 0..self.tuning.spray_count {
            let angle = self.ship.angle + random_between(&mut self.rng, -spread, spread);
            let pulse = random_between(&mut self.rng, 0.0, std::f32::consts::TAU);
            self.projectiles
                .acquire(|p| p.reset(tip, angle, speed, lifespan, pulse));
        }
    }

    /// Emit `count` particles around `pos`, each offset by up to `jitter`
    pub(crate) fn spawn_burst(&mut self, pos: Vec2, count: usize, jitter: f32) {
        let lifespan = self.tuning.particle_lifespan_ticks;
        for _ in 0..count {
            let offset = Vec2::new(
                random_between(&mut self.rng, -jitter, jitter),
                random_between(&mut self.rng, -jitter, jitter),
            );
            let rng = &mut self.rng;
            self.particles
                .acquire(|p| p.reset(pos + offset, lifespan, rng));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_state() -> GameState {
        let mut state = GameState::new(42);
        state.ship.pos = Vec2::new(1000.0, 600.0);
        state
    }

    fn fragments_alive(state: &GameState, original: EnemyId) -> u32 {
        state
            .enemies
            .iter()
            .filter(|e| e.origin == Origin::Fragment { root: original })
            .count() as u32
    }

    #[test]
    fn test_split_radius_40_original() {
        let mut state = fresh_state();
        let remaining = state.enemies_remaining;
        let id = state.insert_original(Vec2::new(200.0, 200.0), 40.0);

        let outcome = state.hit_enemy(id).expect("enemy is alive");
        let HitOutcome::Split(children) = outcome else {
            panic!("radius 40 should split, got {:?}", outcome);
        };

        assert!(state.enemy(id).is_none(), "original leaves the live set");
        assert_eq!(state.enemies.len(), 2);
        for child in children {
            let child = state.enemy(child).expect("fragment alive");
            assert_eq!(child.radius, 20.0);
            assert_eq!(child.pos, Vec2::new(200.0, 200.0));
            assert_eq!(child.origin, Origin::Fragment { root: id });
        }
        assert_eq!(state.enemies_remaining, remaining);
        assert_eq!(state.score, 40);
        assert_eq!(state.open_fragments(id), Some(2));
    }

    #[test]
    fn test_four_leaves_resolve_original_once() {
        let mut state = fresh_state();
        let remaining = state.enemies_remaining;
        let id = state.insert_original(Vec2::new(300.0, 300.0), 40.0);

        let Some(HitOutcome::Split(halves)) = state.hit_enemy(id) else {
            panic!("original should split");
        };

        let mut leaves = Vec::new();
        for half in halves {
            let Some(HitOutcome::Split(quarters)) = state.hit_enemy(half) else {
                panic!("radius 20 fragment should split");
            };
            leaves.extend(quarters);
            assert_eq!(state.open_fragments(id), Some(fragments_alive(&state, id)));
        }
        assert_eq!(leaves.len(), 4);
        assert_eq!(state.open_fragments(id), Some(4));

        for (n, leaf) in leaves.iter().enumerate() {
            assert_eq!(state.enemy(*leaf).map(|e| e.radius), Some(10.0));
            assert_eq!(state.hit_enemy(*leaf), Some(HitOutcome::Destroyed));
            if n < 3 {
                assert_eq!(state.enemies_remaining, remaining, "not resolved before the last leaf");
                assert_eq!(state.open_fragments(id), Some(fragments_alive(&state, id)));
            }
        }

        assert_eq!(state.enemies_remaining, remaining - 1);
        assert_eq!(state.open_fragments(id), None);
        assert!(state.enemies.is_empty());
        // 40 + 2 * 20 + 4 * 10
        assert_eq!(state.score, 120);
    }

    #[test]
    fn test_small_original_destroyed_directly() {
        let mut state = fresh_state();
        let remaining = state.enemies_remaining;
        let id = state.insert_original(Vec2::new(100.0, 100.0), 15.0);

        assert_eq!(state.hit_enemy(id), Some(HitOutcome::Destroyed));
        assert_eq!(state.enemies_remaining, remaining - 1);
        assert!(state.fragments.is_empty());
        assert_eq!(state.score, 15);
    }

    #[test]
    fn test_score_floors_radius() {
        let mut state = fresh_state();
        let id = state.insert_original(Vec2::new(100.0, 100.0), 12.9);
        state.hit_enemy(id);
        assert_eq!(state.score, 12);
    }

    #[test]
    fn test_hit_emits_particle_burst() {
        let mut state = fresh_state();
        let id = state.insert_original(Vec2::new(100.0, 100.0), 30.0);
        state.hit_enemy(id);
        assert_eq!(state.particles.live_count(), state.tuning.burst_particles);
    }

    #[test]
    fn test_remaining_never_underflows() {
        let mut state = fresh_state();
        state.enemies_remaining = 0;
        let id = state.insert_original(Vec2::new(100.0, 100.0), 10.0);
        state.hit_enemy(id);
        assert_eq!(state.enemies_remaining, 0);
    }

    #[test]
    fn test_unknown_enemy() {
        let mut state = fresh_state();
        assert_eq!(state.hit_enemy(9999), None);
    }

    #[test]
    fn test_ship_hit_resets_and_protects() {
        let mut state = fresh_state();
        state.ship.pos = Vec2::new(50.0, 60.0);
        state.ship.vel = Vec2::new(3.0, -2.0);
        state.ship.angle = 1.0;

        let over = state.hit_ship();

        assert!(!over);
        assert_eq!(state.lives, 2);
        assert!(state.ship.invulnerable);
        assert_eq!(state.ship.pos, state.center());
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert_eq!(state.ship.angle, 0.0);
        assert_eq!(state.particles.live_count(), 20);
        assert!(state.drain_events().contains(&GameEvent::LivesChanged(2)));
    }

    #[test]
    fn test_ship_hit_particles_capped_by_pool() {
        let mut state = fresh_state();
        let capacity = state.particles.capacity();
        for _ in 0..capacity - 5 {
            state.spawn_burst(Vec2::ZERO, 1, 0.0);
        }
        state.hit_ship();
        assert_eq!(state.particles.live_count(), capacity);
    }

    #[test]
    fn test_invulnerable_ship_ignores_hits() {
        let mut state = fresh_state();
        state.hit_ship();
        assert!(!state.hit_ship());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut state = fresh_state();
        state.lives = 1;
        assert!(state.hit_ship());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.wave_timer.is_none());
    }

    #[test]
    fn test_fire_spawns_spread_volley() {
        let mut state = fresh_state();
        state.ship.angle = 0.5;
        state.fire();

        assert_eq!(state.projectiles.live_count(), 3);
        let tip = state.ship.tip();
        for (_, droplet) in state.projectiles.iter() {
            assert_eq!(droplet.pos, tip);
            assert!((droplet.angle - 0.5).abs() <= 0.15);
            assert!((droplet.vel.length() - 5.0).abs() < 1e-4);
            assert_eq!(droplet.lifespan, 60);
        }
    }

    #[test]
    fn test_fire_ignored_when_paused() {
        let mut state = fresh_state();
        state.phase = GamePhase::Paused;
        state.fire();
        assert_eq!(state.projectiles.live_count(), 0);
    }

    #[test]
    fn test_ledger_shrink_removes_at_zero() {
        let mut ledger = FragmentLedger::default();
        ledger.open(7);
        assert!(ledger.grow(7));
        assert_eq!(ledger.shrink(7), Some(2));
        assert_eq!(ledger.shrink(7), Some(1));
        assert_eq!(ledger.shrink(7), Some(0));
        assert_eq!(ledger.get(7), None);
        assert_eq!(ledger.shrink(7), None);
        assert!(!ledger.grow(7));
    }
}

//! Collision detection and response
//!
//! Runs once per tick after everything has moved. Enemies are bucketed into
//! the spatial grid, then each droplet and the ship test only the enemies in
//! their own cell.

use glam::Vec2;

use super::pool::PoolHandle;
use super::state::GameState;

/// True when two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Resolve droplet hits, then ship contact
///
/// Each droplet resolves at most one hit. An enemy destroyed earlier in the
/// pass can't be hit again, and fragments created here only join the grid
/// on the next tick.
pub fn resolve_collisions(state: &mut GameState) {
    let mut grid = std::mem::take(&mut state.grid);
    let cell_size = state.tuning.cell_size(state.width, state.height);
    if grid.cell_size() != cell_size {
        grid.set_cell_size(cell_size);
    } else {
        grid.clear();
    }
    for (index, enemy) in state.enemies.iter().enumerate() {
        grid.insert(index, enemy.pos);
    }

    let mut destroyed = vec![false; state.enemies.len()];
    let mut fragments = Vec::new();

    let droplets: Vec<(PoolHandle, Vec2, f32)> = state
        .projectiles
        .iter()
        .map(|(handle, p)| (handle, p.pos, p.radius))
        .collect();

    for (handle, pos, radius) in droplets {
        let hit = grid.candidates(pos).iter().copied().find(|&index| {
            let enemy = &state.enemies[index];
            !destroyed[index] && circles_overlap(pos, radius, enemy.pos, enemy.radius)
        });
        let Some(index) = hit else {
            continue;
        };

        state.projectiles.release(handle);
        destroyed[index] = true;
        let enemy = state.enemies[index].clone();
        if let Some(children) = state.resolve_enemy_hit(&enemy) {
            fragments.extend(children);
        }
    }

    if !state.ship.invulnerable {
        let ship_pos = state.ship.pos;
        let ship_radius = state.ship.radius;
        let factor = state.tuning.ship_hit_radius_factor;

        for &index in grid.candidates(ship_pos) {
            if destroyed[index] {
                continue;
            }
            let enemy = &state.enemies[index];
            if circles_overlap(ship_pos, ship_radius, enemy.pos, enemy.radius * factor) {
                state.hit_ship();
                if state.lives == 0 {
                    break;
                }
            }
        }
    }

    if destroyed.contains(&true) {
        let mut index = 0;
        state.enemies.retain(|_| {
            let keep = !destroyed[index];
            index += 1;
            keep
        });
    }
    state.enemies.extend(fragments);
    state.grid = grid;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, Origin};

    fn arena() -> GameState {
        let mut state = GameState::new(11);
        state.ship.pos = Vec2::new(1000.0, 600.0);
        state
    }

    fn droplet_at(state: &mut GameState, pos: Vec2) -> PoolHandle {
        state.projectiles.acquire(|p| p.reset(pos, 0.0, 0.0, 60, 0.0))
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 3.0, Vec2::new(22.0, 0.0), 20.0));
        assert!(!circles_overlap(Vec2::ZERO, 3.0, Vec2::new(23.0, 0.0), 20.0));
    }

    #[test]
    fn test_droplet_splits_enemy() {
        let mut state = arena();
        let id = state.insert_original(Vec2::new(120.0, 120.0), 40.0);
        let droplet = droplet_at(&mut state, Vec2::new(125.0, 125.0));

        resolve_collisions(&mut state);

        assert!(state.projectiles.get(droplet).is_none());
        assert!(state.enemy(id).is_none());
        assert_eq!(state.enemies.len(), 2);
        assert!(state.enemies.iter().all(|e| e.origin == Origin::Fragment { root: id }));
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_boundary_straddling_enemy_is_missed() {
        let mut state = arena();
        assert_eq!(state.grid.cell_size(), 50.0);
        let id = state.insert_original(Vec2::new(51.0, 10.0), 20.0);
        let droplet = droplet_at(&mut state, Vec2::new(49.0, 10.0));

        resolve_collisions(&mut state);

        assert!(state.enemy(id).is_some());
        assert!(state.projectiles.get(droplet).is_some());
    }

    #[test]
    fn test_one_hit_per_droplet() {
        let mut state = arena();
        let first = state.insert_original(Vec2::new(120.0, 120.0), 10.0);
        let second = state.insert_original(Vec2::new(121.0, 120.0), 10.0);
        droplet_at(&mut state, Vec2::new(120.0, 121.0));

        resolve_collisions(&mut state);

        assert!(state.enemy(first).is_none());
        assert!(state.enemy(second).is_some());
    }

    #[test]
    fn test_destroyed_enemy_not_hit_twice() {
        let mut state = arena();
        let id = state.insert_original(Vec2::new(120.0, 120.0), 10.0);
        let remaining = state.enemies_remaining;
        droplet_at(&mut state, Vec2::new(120.0, 120.0));
        droplet_at(&mut state, Vec2::new(121.0, 121.0));

        resolve_collisions(&mut state);

        assert!(state.enemy(id).is_none());
        assert_eq!(state.projectiles.live_count(), 1);
        assert_eq!(state.enemies_remaining, remaining - 1);
    }

    #[test]
    fn test_fragments_join_next_tick() {
        let mut state = arena();
        state.insert_original(Vec2::new(120.0, 120.0), 40.0);
        droplet_at(&mut state, Vec2::new(120.0, 120.0));
        let spare = droplet_at(&mut state, Vec2::new(120.0, 120.0));

        resolve_collisions(&mut state);
        assert_eq!(state.enemies.len(), 2);
        assert!(state.projectiles.get(spare).is_some(), "fresh fragments are not in this pass");

        resolve_collisions(&mut state);
        assert!(state.projectiles.get(spare).is_none());
    }

    #[test]
    fn test_ship_contact_uses_reduced_enemy_radius() {
        let mut state = arena();
        state.ship.pos = Vec2::new(610.0, 360.0);
        state.insert_original(Vec2::new(635.0, 360.0), 20.0);
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 3);

        state.enemies[0].pos = Vec2::new(632.0, 360.0);
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 2);
        assert!(state.ship.invulnerable);
        assert_eq!(state.ship.pos, state.center());
    }

    #[test]
    fn test_invulnerable_ship_passes_through() {
        let mut state = arena();
        state.ship.invulnerable = true;
        let pos = state.ship.pos;
        state.insert_original(pos, 30.0);
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_single_hit_per_contact() {
        let mut state = arena();
        let pos = state.ship.pos;
        state.insert_original(pos, 30.0);
        state.insert_original(pos + Vec2::new(1.0, 0.0), 30.0);
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_final_life_ends_session() {
        let mut state = arena();
        state.lives = 1;
        let pos = state.ship.pos;
        state.insert_original(pos, 30.0);
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}

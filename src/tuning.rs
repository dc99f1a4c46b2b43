//! Data-driven game balance
//!
//! Every gameplay constant lives here so levels can be rebalanced from JSON
//! without touching the simulation. Defaults reproduce the classic feel.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values. Distances are pixels, speeds are pixels per tick,
/// durations are milliseconds unless the field name says ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    /// Heading change per tick while a turn key is held (radians)
    pub ship_rotation_speed: f32,
    /// Velocity added along the heading per tick of thrust
    pub ship_thrust: f32,
    /// Velocity multiplier applied every tick
    pub ship_friction: f32,
    /// Lives at session start
    pub starting_lives: u8,
    /// Invulnerability window after a hit
    pub invulnerable_ms: f32,
    /// Visibility toggle period while invulnerable
    pub blink_ms: f32,
    /// Fraction of an enemy's radius that counts when it touches the ship
    pub ship_hit_radius_factor: f32,
    /// Particles emitted when the ship is hit
    pub ship_hit_particles: usize,

    // === Weapons ===
    pub projectile_speed: f32,
    pub projectile_lifespan_ticks: u32,
    /// Droplets per trigger pull
    pub spray_count: usize,
    /// Half-width of the random spread around the heading (radians)
    pub spray_spread: f32,

    // === Enemies ===
    pub enemy_min_radius: f32,
    pub enemy_max_radius: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    /// Enemies at or below this radius are destroyed instead of split
    pub min_split_radius: f32,
    /// Particles emitted by every destructive hit
    pub burst_particles: usize,

    // === Particles ===
    pub particle_lifespan_ticks: u32,
    pub particle_drag: f32,
    pub particle_gravity: f32,
    /// Particles start shrinking once fewer ticks than this remain
    pub particle_shrink_below_ticks: u32,

    // === Levels ===
    /// Originals in level 1
    pub base_enemies_per_level: u32,
    /// Extra originals a level may add over level 1
    pub max_extra_enemies: u32,
    /// Originals in the first batch after the banner: base, plus one
    /// every `initial_batch_level_step` levels, capped at the max
    pub initial_batch_base: u32,
    pub initial_batch_level_step: u32,
    pub initial_batch_max: u32,
    /// Originals per follow-up wave: base, plus one every
    /// `wave_size_level_step` levels
    pub wave_size_base: u32,
    pub wave_size_level_step: u32,
    /// Speed multiplier gained per level
    pub speed_increase_per_level: f32,
    /// Radius multiplier compounded per level
    pub size_scale_per_level: f32,
    /// Cap on the compounded radius multiplier
    pub max_size_scale: f32,
    /// Spawns must land farther than this from the ship
    pub spawn_safe_distance: f32,
    /// How far outside the screen edge new enemies appear
    pub spawn_edge_offset: f32,
    /// Placement attempts before a spawn is skipped
    pub max_spawn_attempts: u32,
    pub wave_base_delay_ms: f32,
    pub wave_delay_per_level_ms: f32,
    pub wave_min_delay_ms: f32,
    /// Level banner time
    pub banner_ms: f32,
    /// Level banner time when the level unlocks a new rank
    pub banner_new_rank_ms: f32,
    pub banner_fade_ms: f32,
    /// Pause between clearing a level and starting the next
    pub level_clear_delay_ms: f32,

    // === Pools ===
    pub projectile_pool_capacity: usize,
    pub particle_pool_capacity: usize,

    // === Spatial index ===
    pub min_cell_size: f32,
    /// The cell size is the smaller screen dimension divided by this
    pub cells_across: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_rotation_speed: 0.08,
            ship_thrust: 0.2,
            ship_friction: 0.98,
            starting_lives: 3,
            invulnerable_ms: 3000.0,
            blink_ms: 100.0,
            ship_hit_radius_factor: 0.7,
            ship_hit_particles: 20,

            projectile_speed: 5.0,
            projectile_lifespan_ticks: 60,
            spray_count: 3,
            spray_spread: 0.15,

            enemy_min_radius: 20.0,
            enemy_max_radius: 50.0,
            enemy_min_speed: 0.3,
            enemy_max_speed: 1.0,
            min_split_radius: 15.0,
            burst_particles: 10,

            particle_lifespan_ticks: 60,
            particle_drag: 0.97,
            particle_gravity: 0.02,
            particle_shrink_below_ticks: 30,

            base_enemies_per_level: 3,
            max_extra_enemies: 7,
            initial_batch_base: 2,
            initial_batch_level_step: 3,
            initial_batch_max: 5,
            wave_size_base: 1,
            wave_size_level_step: 2,
            speed_increase_per_level: 0.1,
            size_scale_per_level: 1.08,
            max_size_scale: 1.5,
            spawn_safe_distance: 100.0,
            spawn_edge_offset: 50.0,
            max_spawn_attempts: 32,
            wave_base_delay_ms: 8000.0,
            wave_delay_per_level_ms: 500.0,
            wave_min_delay_ms: 3000.0,
            banner_ms: 2000.0,
            banner_new_rank_ms: 3500.0,
            banner_fade_ms: 600.0,
            level_clear_delay_ms: 1000.0,

            projectile_pool_capacity: 50,
            particle_pool_capacity: 200,

            min_cell_size: 50.0,
            cells_across: 20.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Originals that must be resolved to clear `level` (1-based)
    pub fn enemies_for_level(&self, level: u32) -> u32 {
        self.base_enemies_per_level + level.saturating_sub(1).min(self.max_extra_enemies)
    }

    /// Originals spawned as soon as the level banner fades
    pub fn initial_batch(&self, level: u32) -> u32 {
        (self.initial_batch_base + level / self.initial_batch_level_step.max(1))
            .min(self.initial_batch_max)
    }

    /// Originals per follow-up wave
    pub fn wave_size(&self, level: u32) -> u32 {
        self.wave_size_base + level / self.wave_size_level_step.max(1)
    }

    /// Delay before the next wave; shrinks with level down to a floor
    pub fn wave_delay_ms(&self, level: u32) -> f32 {
        (self.wave_base_delay_ms - level as f32 * self.wave_delay_per_level_ms)
            .max(self.wave_min_delay_ms)
    }

    /// Speed multiplier for originals spawned on `level`
    pub fn speed_scale(&self, level: u32) -> f32 {
        1.0 + self.speed_increase_per_level * level.saturating_sub(1) as f32
    }

    /// Radius multiplier for originals spawned on `level`
    pub fn size_scale(&self, level: u32) -> f32 {
        self.size_scale_per_level
            .powi(level.saturating_sub(1) as i32)
            .min(self.max_size_scale)
    }

    /// Spatial index cell size for an arena
    pub fn cell_size(&self, width: f32, height: f32) -> f32 {
        (width.min(height) / self.cells_across).max(self.min_cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemies_per_level_caps_at_ten() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemies_for_level(1), 3);
        assert_eq!(tuning.enemies_for_level(4), 6);
        assert_eq!(tuning.enemies_for_level(8), 10);
        assert_eq!(tuning.enemies_for_level(30), 10);
    }

    #[test]
    fn test_batch_and_wave_sizes() {
        let tuning = Tuning::default();
        assert_eq!(tuning.initial_batch(1), 2);
        assert_eq!(tuning.initial_batch(3), 3);
        assert_eq!(tuning.initial_batch(9), 5);
        assert_eq!(tuning.initial_batch(30), 5);
        assert_eq!(tuning.wave_size(1), 1);
        assert_eq!(tuning.wave_size(2), 2);
        assert_eq!(tuning.wave_size(7), 4);
    }

    #[test]
    fn test_batch_and_wave_sizes_from_json() {
        let tuning = Tuning::from_json(
            r#"{ "initial_batch_base": 1, "initial_batch_max": 2, "wave_size_base": 3, "wave_size_level_step": 0 }"#,
        )
        .expect("valid tuning json");
        assert_eq!(tuning.initial_batch(1), 1);
        assert_eq!(tuning.initial_batch(30), 2);
        // A zero step is treated as one
        assert_eq!(tuning.wave_size(4), 7);
    }

    #[test]
    fn test_wave_delay_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.wave_delay_ms(1), 7500.0);
        assert_eq!(tuning.wave_delay_ms(10), 3000.0);
        assert_eq!(tuning.wave_delay_ms(20), 3000.0);
    }

    #[test]
    fn test_size_scale_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.size_scale(1), 1.0);
        assert!((tuning.size_scale(2) - 1.08).abs() < 1e-6);
        assert_eq!(tuning.size_scale(40), 1.5);
    }

    #[test]
    fn test_cell_size() {
        let tuning = Tuning::default();
        assert_eq!(tuning.cell_size(1920.0, 1080.0), 54.0);
        assert_eq!(tuning.cell_size(640.0, 480.0), 50.0);
    }

    #[test]
    fn test_from_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5, "min_split_radius": 10.0 }"#)
            .expect("valid tuning json");
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.min_split_radius, 10.0);
        assert_eq!(tuning.ship_friction, Tuning::default().ship_friction);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}

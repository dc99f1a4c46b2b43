//! Hemorrhoids - a medical-themed Asteroids-style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, entity lifecycle, levels)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input mapping
//! - `tuning`: Data-driven game balance
//! - `ranks`: Career ranks unlocked by level
//! - `hud`: HUD text and level banner

pub mod hud;
pub mod platform;
pub mod ranks;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (the original game ran one
    /// physics step per 60 Hz animation frame)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena size used when no canvas size is known (headless runs, tests)
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

    /// Player ship size; radius is half of it, the syringe tip is twice it
    pub const PLAYER_SIZE: f32 = 20.0;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 3.0;
}

/// Wrap a coordinate into `[0, max)`, re-entering at the opposite edge.
#[inline]
pub fn wrap_coordinate(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(max);
    // rem_euclid can round up to exactly `max` for tiny negative inputs
    if wrapped >= max { 0.0 } else { wrapped }
}

/// Wrap a coordinate that may travel `margin` past either edge before
/// reappearing on the other side.
#[inline]
pub fn wrap_with_margin(value: f32, max: f32, margin: f32) -> f32 {
    if value < -margin {
        max + margin
    } else if value > max + margin {
        -margin
    } else {
        value
    }
}

/// Unit vector pointing along `angle` (radians, screen coordinates)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(-1.0, 100.0), 99.0);
        assert_eq!(wrap_coordinate(100.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(50.0, 100.0), 50.0);
        assert_eq!(wrap_coordinate(-1e-9, 100.0), 0.0);
    }

    #[test]
    fn test_wrap_with_margin() {
        assert_eq!(wrap_with_margin(-31.0, 800.0, 30.0), 830.0);
        assert_eq!(wrap_with_margin(831.0, 800.0, 30.0), -30.0);
        assert_eq!(wrap_with_margin(-29.0, 800.0, 30.0), -29.0);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);
        // 3π rounds to either end of the range in f32
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        for k in -4..=4 {
            let angle = normalize_angle(0.3 + k as f32 * 2.0 * PI);
            assert!((-PI..PI).contains(&angle));
        }
    }
}

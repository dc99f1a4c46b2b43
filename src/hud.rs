//! HUD text and level banner
//!
//! Pure formatting over the counters the simulation publishes. The browser
//! driver copies these strings into the DOM; nothing here touches it.

use crate::ranks::{self, Rank};
use crate::sim::{GameEvent, GameState, HudCounters};

/// Fade-in delay before the banner starts appearing
const BANNER_FADE_IN_DELAY_MS: f64 = 100.0;
/// Banner fade-in time
const BANNER_FADE_IN_MS: f64 = 500.0;

/// Score as six zero-padded digits
pub fn padded_score(score: u64) -> String {
    format!("{:06}", score)
}

pub fn score_text(score: u64) -> String {
    format!("SCORE: {}", padded_score(score))
}

pub fn lives_text(lives: u8) -> String {
    format!("LIVES: {}", lives)
}

pub fn level_text(level: u32) -> String {
    format!("LEVEL: {}", level)
}

pub fn remaining_text(remaining: u32) -> String {
    format!("REMAINING: {}", remaining)
}

/// Level-start message
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBanner {
    pub heading: String,
    pub rank: &'static Rank,
    pub subtitle: String,
    /// Time fully shown before fading out
    pub display_ms: f64,
    pub fade_ms: f64,
    /// Virtual time the level started
    pub started_ms: f64,
}

impl LevelBanner {
    pub fn new(level: u32, enemies: u32, display_ms: f64, fade_ms: f64, started_ms: f64) -> Self {
        Self {
            heading: format!("LEVEL {}", level),
            rank: ranks::current_rank(level),
            subtitle: format!("{} Hemorrhoids to Treat", enemies),
            display_ms,
            fade_ms,
            started_ms,
        }
    }

    /// Banner for the state's current level
    pub fn for_state(state: &GameState) -> Self {
        Self::new(
            state.level,
            state.enemies_per_level,
            state.banner_duration_ms() as f64,
            state.tuning.banner_fade_ms as f64,
            state.time_ms,
        )
    }

    /// Opacity at virtual time `now_ms`; without motion it simply snaps on
    /// and off
    pub fn opacity(&self, now_ms: f64, reduced_motion: bool) -> f32 {
        let elapsed = now_ms - self.started_ms;
        if elapsed < 0.0 || elapsed >= self.display_ms + self.fade_ms {
            return 0.0;
        }
        if reduced_motion {
            return if elapsed < self.display_ms { 1.0 } else { 0.0 };
        }

        if elapsed < BANNER_FADE_IN_DELAY_MS {
            0.0
        } else if elapsed < self.display_ms {
            ((elapsed - BANNER_FADE_IN_DELAY_MS) / BANNER_FADE_IN_MS).min(1.0) as f32
        } else {
            (1.0 - (elapsed - self.display_ms) / self.fade_ms).max(0.0) as f32
        }
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= self.display_ms + self.fade_ms
    }
}

/// What the HUD currently shows; the driver redraws the DOM only for the
/// parts that changed
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub counters: HudCounters,
    pub banner: Option<LevelBanner>,
    /// Final score once the session has ended
    pub final_score: Option<u64>,
}

/// Which HUD parts changed after applying events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudChanges {
    pub counters: bool,
    pub banner: bool,
    pub game_over: bool,
}

impl Hud {
    pub fn new(state: &GameState) -> Self {
        Self {
            counters: state.hud(),
            banner: Some(LevelBanner::for_state(state)),
            final_score: None,
        }
    }

    /// Fold drained simulation events into the displayed values
    pub fn apply(&mut self, state: &GameState, events: &[GameEvent]) -> HudChanges {
        let mut changes = HudChanges::default();
        for event in events {
            match *event {
                GameEvent::ScoreChanged(_)
                | GameEvent::LivesChanged(_)
                | GameEvent::RemainingChanged(_) => changes.counters = true,
                GameEvent::LevelStarted { .. } => {
                    self.banner = Some(LevelBanner::for_state(state));
                    changes.banner = true;
                    changes.counters = true;
                }
                GameEvent::GameOver { score, .. } => {
                    self.final_score = Some(score);
                    changes.game_over = true;
                }
                GameEvent::ShipHit
                | GameEvent::EnemySplit { .. }
                | GameEvent::EnemyDestroyed { .. }
                | GameEvent::LevelCleared { .. } => {}
            }
        }

        if changes.counters {
            self.counters = state.hud();
        }
        if let Some(banner) = &self.banner {
            if banner.is_finished(state.time_ms) {
                self.banner = None;
                changes.banner = true;
            }
        }
        changes
    }

    pub fn score_text(&self) -> String {
        score_text(self.counters.score)
    }

    pub fn lives_text(&self) -> String {
        lives_text(self.counters.lives)
    }

    pub fn level_text(&self) -> String {
        level_text(self.counters.level)
    }

    pub fn remaining_text(&self) -> String {
        remaining_text(self.counters.enemies_remaining)
    }

    /// Rank shown next to the level
    pub fn rank(&self) -> &'static Rank {
        ranks::current_rank(self.counters.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_score_padding() {
        assert_eq!(padded_score(0), "000000");
        assert_eq!(padded_score(120), "000120");
        assert_eq!(padded_score(1_234_567), "1234567");
        assert_eq!(score_text(42), "SCORE: 000042");
    }

    #[test]
    fn test_counter_text() {
        assert_eq!(lives_text(3), "LIVES: 3");
        assert_eq!(level_text(12), "LEVEL: 12");
        assert_eq!(remaining_text(0), "REMAINING: 0");
    }

    #[test]
    fn test_banner_text() {
        let banner = LevelBanner::new(7, 9, 3500.0, 600.0, 0.0);
        assert_eq!(banner.heading, "LEVEL 7");
        assert_eq!(banner.rank.title, "Proctology Resident");
        assert_eq!(banner.subtitle, "9 Hemorrhoids to Treat");
    }

    #[test]
    fn test_banner_opacity_curve() {
        let banner = LevelBanner::new(2, 4, 2000.0, 600.0, 1000.0);
        assert_eq!(banner.opacity(1050.0, false), 0.0);
        assert!((banner.opacity(1350.0, false) - 0.5).abs() < 1e-6);
        assert_eq!(banner.opacity(2500.0, false), 1.0);
        assert!((banner.opacity(3300.0, false) - 0.5).abs() < 1e-6);
        assert_eq!(banner.opacity(3600.0, false), 0.0);
        assert!(banner.is_finished(3600.0));

        assert_eq!(banner.opacity(1050.0, true), 1.0);
        assert_eq!(banner.opacity(3100.0, true), 0.0);
    }

    #[test]
    fn test_hud_tracks_events() {
        let mut state = GameState::new(3);
        let mut hud = Hud::new(&state);
        state.drain_events();
        assert_eq!(hud.counters.enemies_remaining, 3);

        let id = state.insert_original(Vec2::new(100.0, 100.0), 10.0);
        state.hit_enemy(id);
        let events = state.drain_events();
        let changes = hud.apply(&state, &events);

        assert!(changes.counters);
        assert_eq!(hud.score_text(), "SCORE: 000010");
        assert_eq!(hud.remaining_text(), "REMAINING: 2");
        assert_eq!(hud.rank().title, "Medical Volunteer");
    }

    #[test]
    fn test_hud_game_over() {
        let mut state = GameState::new(4);
        let mut hud = Hud::new(&state);
        state.drain_events();
        state.score = 1500;
        state.lives = 1;
        state.hit_ship();

        let events = state.drain_events();
        let changes = hud.apply(&state, &events);
        assert!(changes.game_over);
        assert_eq!(hud.final_score.map(padded_score), Some("001500".to_string()));
        assert_eq!(hud.lives_text(), "LIVES: 0");
    }
}

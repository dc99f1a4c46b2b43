//! Game settings and preferences
//!
//! Persisted in LocalStorage. Quality trades effect density for speed; it
//! never changes how the game plays.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low → Medium → High → Low cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Particle pool size for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 80,
            QualityPreset::Medium => 150,
            QualityPreset::High => 200,
        }
    }

    /// Particles per enemy hit
    pub fn burst_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 5,
            QualityPreset::Medium => 8,
            QualityPreset::High => 10,
        }
    }

    /// Drifting microbes in the backdrop
    pub fn microbe_count(&self) -> usize {
        match self {
            QualityPreset::Low => 80,
            QualityPreset::Medium => 180,
            QualityPreset::High => 300,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Explosion particles
    pub particles: bool,
    /// Microbe backdrop
    pub background: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Pause when the tab is hidden or loses focus
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing, no banner fade)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,
            background: true,
            show_fps: false,
            pause_on_blur: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        // Low preset drops the backdrop entirely
        self.background = preset != QualityPreset::Low;
    }

    /// Step to the next preset. Particle budgets take effect with the next
    /// session; the backdrop toggles immediately.
    pub fn cycle_quality(&mut self) -> QualityPreset {
        let preset = self.quality.next();
        self.apply_preset(preset);
        preset
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective microbe count
    pub fn microbe_count(&self) -> usize {
        if !self.background {
            0
        } else {
            self.quality.microbe_count()
        }
    }

    /// Decorative pulsing (respects reduced_motion)
    pub fn effective_pulse(&self) -> bool {
        !self.reduced_motion
    }

    /// Fit effect budgets into the gameplay tuning
    pub fn apply_to_tuning(&self, tuning: &mut Tuning) {
        tuning.particle_pool_capacity = self.max_particles();
        if self.particles {
            tuning.burst_particles = tuning.burst_particles.min(self.quality.burst_particles());
        } else {
            tuning.burst_particles = 0;
            tuning.ship_hit_particles = 0;
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hemorrhoids_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_quality_wraps() {
        let mut settings = Settings::default();
        assert_eq!(settings.cycle_quality(), QualityPreset::Low);
        assert!(!settings.background);
        assert_eq!(settings.microbe_count(), 0);

        assert_eq!(settings.cycle_quality(), QualityPreset::Medium);
        assert!(settings.background);
        assert_eq!(settings.microbe_count(), 180);

        assert_eq!(settings.cycle_quality(), QualityPreset::High);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.quality.as_str(), "High");
    }

    #[test]
    fn test_cycled_settings_survive_storage_format() {
        let mut settings = Settings::default();
        settings.cycle_quality();
        let json = serde_json::to_string(&settings).expect("serializable settings");
        let restored: Settings = serde_json::from_str(&json).expect("valid settings json");
        assert_eq!(restored, settings);
        assert_eq!(restored.quality, QualityPreset::Low);
    }

    #[test]
    fn test_high_matches_classic_budgets() {
        let settings = Settings::default();
        let mut tuning = Tuning::default();
        settings.apply_to_tuning(&mut tuning);
        assert_eq!(tuning, Tuning::default());
        assert_eq!(settings.microbe_count(), 300);
    }

    #[test]
    fn test_low_preset_trims_effects() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        let mut tuning = Tuning::default();
        settings.apply_to_tuning(&mut tuning);
        assert_eq!(tuning.particle_pool_capacity, 80);
        assert_eq!(tuning.burst_particles, 5);
        assert_eq!(settings.microbe_count(), 0);
    }

    #[test]
    fn test_particles_off() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        let mut tuning = Tuning::default();
        settings.apply_to_tuning(&mut tuning);
        assert_eq!(tuning.particle_pool_capacity, 0);
        assert_eq!(tuning.burst_particles, 0);
        assert_eq!(tuning.ship_hit_particles, 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "reduced_motion": true }"#).expect("valid settings json");
        assert!(settings.reduced_motion);
        assert!(!settings.effective_pulse());
        assert_eq!(settings.quality, QualityPreset::High);
    }
}

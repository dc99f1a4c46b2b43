//! Drifting microbe backdrop
//!
//! Purely decorative. It draws from its own generator so the number of
//! microbes never changes the gameplay random sequence.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::random_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MicrobeKind {
    Bacteria,
    Virus,
    BloodCell,
    WhiteCell,
    Platelet,
}

impl MicrobeKind {
    pub const ALL: [MicrobeKind; 5] = [
        MicrobeKind::Bacteria,
        MicrobeKind::Virus,
        MicrobeKind::BloodCell,
        MicrobeKind::WhiteCell,
        MicrobeKind::Platelet,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Microbe {
    pub kind: MicrobeKind,
    pub pos: Vec2,
    pub size: f32,
    /// Downward drift per tick
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Per-microbe color variation in [0, 1)
    pub tint: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub microbes: Vec<Microbe>,
    width: f32,
    height: f32,
    rng: Pcg32,
}

impl Background {
    pub fn new(seed: u64, width: f32, height: f32, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let microbes = (0..count)
            .map(|_| {
                let kind = MicrobeKind::ALL[rng.random_range(0..MicrobeKind::ALL.len())];
                Microbe {
                    kind,
                    pos: Vec2::new(
                        random_between(&mut rng, 0.0, width),
                        random_between(&mut rng, 0.0, height),
                    ),
                    size: random_between(&mut rng, 0.8, 2.8),
                    speed: random_between(&mut rng, 0.1, 0.4),
                    rotation: random_between(&mut rng, 0.0, std::f32::consts::TAU),
                    rotation_speed: random_between(&mut rng, -0.01, 0.01),
                    tint: rng.random(),
                    alpha: random_between(&mut rng, 0.5, 1.0),
                }
            })
            .collect();

        Self {
            microbes,
            width,
            height,
            rng,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Drift every microbe down; ones that leave the bottom restart at the
    /// top at a random column
    pub fn update(&mut self) {
        for microbe in &mut self.microbes {
            microbe.pos.y += microbe.speed;
            microbe.rotation += microbe.rotation_speed;
            if microbe.pos.y > self.height {
                microbe.pos.y = 0.0;
                microbe.pos.x = random_between(&mut self.rng, 0.0, self.width);
            }
        }
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Timers run on the virtual clock through the scheduler
//! - No rendering or platform dependencies

pub mod background;
pub mod collision;
pub mod level;
pub mod lifecycle;
pub mod pool;
pub mod schedule;
pub mod spatial;
pub mod state;
pub mod tick;

pub use background::{Background, Microbe, MicrobeKind};
pub use collision::{circles_overlap, resolve_collisions};
pub use lifecycle::{FragmentLedger, HitOutcome};
pub use pool::{Pool, PoolHandle};
pub use schedule::{ScheduledEvent, Scheduler, TimerHandle};
pub use spatial::SpatialGrid;
pub use state::{
    Enemy, EnemyId, GameEvent, GamePhase, GameState, HudCounters, LevelPhase, Origin, Particle,
    Projectile, Ship,
};
pub use tick::{TickInput, tick};
